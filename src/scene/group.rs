//! Render group holding point-cloud drawables.

use std::sync::{Arc, RwLock};

use super::points::PointsObject;
use crate::core::Id;

/// An ordered set of shared point-cloud drawables.
///
/// The render pass walks `children` each frame; renderers attach a drawable
/// on initialize and detach it by id on dispose.
#[derive(Default)]
pub struct RenderGroup {
    children: Vec<Arc<RwLock<PointsObject>>>,
}

impl RenderGroup {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a drawable.
    pub fn add(&mut self, object: Arc<RwLock<PointsObject>>) {
        self.children.push(object);
    }

    /// Detach a drawable by id, returning it if present.
    pub fn remove_by_id(&mut self, id: Id) -> Option<Arc<RwLock<PointsObject>>> {
        let index = self.children.iter().position(|c| {
            c.read().map(|guard| guard.id() == id).unwrap_or(false)
        })?;
        Some(self.children.remove(index))
    }

    /// The attached drawables.
    #[inline]
    pub fn children(&self) -> &[Arc<RwLock<PointsObject>>] {
        &self.children
    }

    /// Number of attached drawables.
    #[inline]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// True if nothing is attached.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Detach everything.
    pub fn clear(&mut self) {
        self.children.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{PointsGeometry, PointsMaterial};

    fn drawable() -> Arc<RwLock<PointsObject>> {
        Arc::new(RwLock::new(PointsObject::new(
            PointsGeometry::new(4),
            PointsMaterial::new(),
        )))
    }

    #[test]
    fn test_add_and_remove() {
        let mut group = RenderGroup::new();
        let obj = drawable();
        let id = obj.read().unwrap().id();

        group.add(obj);
        assert_eq!(group.len(), 1);

        assert!(group.remove_by_id(id).is_some());
        assert!(group.is_empty());
    }

    #[test]
    fn test_remove_missing_is_none() {
        let mut group = RenderGroup::new();
        group.add(drawable());
        assert!(group.remove_by_id(Id::new()).is_none());
        assert_eq!(group.len(), 1);
    }
}
