//! GPU-facing particle renderer.

use std::sync::{Arc, RwLock};

use super::emitter::EmitterParams;
use super::particle::Particle;
use crate::scene::{PointsGeometry, PointsMaterial, PointsObject, RenderGroup};

/// Creation parameters for a [`ParticleRenderer`].
pub struct ParticleRendererParams {
    /// Hard buffer capacity in particles.
    pub max_particles: usize,
    /// Group the drawable is attached to.
    pub group: Arc<RwLock<RenderGroup>>,
}

impl ParticleRendererParams {
    /// Create parameters for a capacity and target group.
    pub fn new(max_particles: usize, group: Arc<RwLock<RenderGroup>>) -> Self {
        Self {
            max_particles,
            group,
        }
    }
}

impl Default for ParticleRendererParams {
    fn default() -> Self {
        Self {
            max_particles: 100,
            group: Arc::new(RwLock::new(RenderGroup::new())),
        }
    }
}

/// Scoped owner of the GPU-facing particle buffers.
///
/// `initialize` builds fixed-capacity point geometry, pairs it with the
/// supplied material and attaches the drawable to the render group. Each
/// frame, `update_from_particles` repacks the buffers from the current
/// particle snapshot. `dispose` detaches and releases everything;
/// repeating it is a no-op.
#[derive(Default)]
pub struct ParticleRenderer {
    points: Option<Arc<RwLock<PointsObject>>>,
    group: Option<Arc<RwLock<RenderGroup>>>,
}

impl ParticleRenderer {
    /// Create an uninitialized renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the fixed-capacity buffers and attach the drawable to
    /// `params.group`.
    pub fn initialize(&mut self, material: PointsMaterial, params: &ParticleRendererParams) {
        let geometry = PointsGeometry::new(params.max_particles);
        let points = Arc::new(RwLock::new(PointsObject::new(geometry, material)));

        if let Ok(mut group) = params.group.write() {
            group.add(Arc::clone(&points));
        }

        self.points = Some(points);
        self.group = Some(Arc::clone(&params.group));
    }

    /// True once initialized and not yet disposed.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.points.is_some()
    }

    /// The attached drawable, if any.
    #[inline]
    pub fn points(&self) -> Option<&Arc<RwLock<PointsObject>>> {
        self.points.as_ref()
    }

    /// Allocate the GPU side of the geometry and material.
    pub fn allocate_gpu(&mut self, device: &wgpu::Device) {
        if let Some(points) = &self.points {
            if let Ok(mut points) = points.write() {
                points.geometry.allocate_gpu(device);
                points.material.allocate_gpu(device);
            }
        }
    }

    /// Upload whatever staging data is dirty.
    pub fn upload(&mut self, queue: &wgpu::Queue) {
        if let Some(points) = &self.points {
            if let Ok(mut points) = points.write() {
                points.geometry.upload(queue);
                points.material.upload(queue);
            }
        }
    }

    /// Repack the buffers from the frame's particle snapshot.
    ///
    /// Packs positions and (age fraction, id) pairs in collection order,
    /// sets the draw range to the live count so unused capacity is never
    /// drawn, marks both buffers for re-upload and publishes `total_time`
    /// and the emitter's spin rate through the material.
    ///
    /// Precondition: `particles.len()` must not exceed the capacity
    /// declared at initialize.
    pub fn update_from_particles(
        &mut self,
        particles: &[Particle],
        params: &EmitterParams,
        total_time: f32,
    ) {
        let Some(points) = &self.points else {
            return;
        };
        let Ok(mut points) = points.write() else {
            return;
        };

        assert!(
            particles.len() <= points.geometry.capacity(),
            "particle count {} exceeds renderer capacity {}",
            particles.len(),
            points.geometry.capacity()
        );

        points.material.set_time(total_time);
        points.material.set_spin_speed(params.spin_speed);

        for (i, particle) in particles.iter().enumerate() {
            points.geometry.set_point(
                i,
                particle.position.to_array(),
                [particle.age_fraction(), particle.id],
            );
        }

        points.geometry.set_draw_range(particles.len());
    }

    /// Detach the drawable from its group and release all resources.
    /// Safe to call more than once.
    pub fn dispose(&mut self) {
        let points = self.points.take();
        let group = self.group.take();

        if let (Some(points), Some(group)) = (points, group) {
            let id = points.read().map(|p| p.id()).ok();
            if let (Some(id), Ok(mut group)) = (id, group.write()) {
                group.remove_by_id(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector3;

    fn initialized(capacity: usize) -> (ParticleRenderer, Arc<RwLock<RenderGroup>>) {
        let group = Arc::new(RwLock::new(RenderGroup::new()));
        let params = ParticleRendererParams::new(capacity, Arc::clone(&group));
        let mut renderer = ParticleRenderer::new();
        renderer.initialize(PointsMaterial::new(), &params);
        (renderer, group)
    }

    fn particle(x: f32, age: f32, max_life: f32, id: f32) -> Particle {
        let mut p = Particle::new(id);
        p.position = Vector3::new(x, 0.0, 0.0);
        p.age = age;
        p.max_life = max_life;
        p
    }

    #[test]
    fn test_initialize_attaches_to_group() {
        let (renderer, group) = initialized(8);
        assert!(renderer.is_initialized());
        assert_eq!(group.read().unwrap().len(), 1);
    }

    #[test]
    fn test_packing_layout_and_draw_range() {
        let (mut renderer, _group) = initialized(4);
        let particles = vec![
            particle(1.0, 1.0, 4.0, 0.5),
            particle(2.0, 2.0, 4.0, 0.75),
        ];

        renderer.update_from_particles(&particles, &EmitterParams::default(), 9.0);

        let points = renderer.points().unwrap().read().unwrap();
        assert_eq!(&points.geometry.positions()[0..6], &[1.0, 0.0, 0.0, 2.0, 0.0, 0.0]);
        assert_eq!(&points.geometry.point_data()[0..4], &[0.25, 0.5, 0.5, 0.75]);
        assert_eq!(points.geometry.draw_count(), 2);
        assert!(points.geometry.is_dirty());
        assert_eq!(points.material.uniforms().time, 9.0);
    }

    #[test]
    fn test_spin_speed_is_published() {
        let (mut renderer, _group) = initialized(4);
        let params = EmitterParams {
            spin_speed: 3.5,
            ..Default::default()
        };

        renderer.update_from_particles(&[], &params, 1.0);

        let points = renderer.points().unwrap().read().unwrap();
        assert_eq!(points.material.uniforms().spin_speed, 3.5);
        assert_eq!(points.geometry.draw_count(), 0);
    }

    #[test]
    #[should_panic(expected = "exceeds renderer capacity")]
    fn test_overfull_snapshot_panics() {
        let (mut renderer, _group) = initialized(1);
        let particles = vec![
            particle(0.0, 0.0, 1.0, 0.1),
            particle(1.0, 0.0, 1.0, 0.2),
        ];
        renderer.update_from_particles(&particles, &EmitterParams::default(), 0.0);
    }

    #[test]
    fn test_dispose_detaches_and_is_idempotent() {
        let (mut renderer, group) = initialized(4);
        assert_eq!(group.read().unwrap().len(), 1);

        renderer.dispose();
        assert!(!renderer.is_initialized());
        assert!(group.read().unwrap().is_empty());

        // Second dispose finds nothing to release.
        renderer.dispose();
        assert!(group.read().unwrap().is_empty());
    }

    #[test]
    fn test_update_before_initialize_is_a_noop() {
        let mut renderer = ParticleRenderer::new();
        renderer.update_from_particles(&[], &EmitterParams::default(), 0.0);
        assert!(!renderer.is_initialized());
    }
}
