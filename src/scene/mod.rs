//! # Scene Module
//!
//! The render-group attachment point the particle renderer publishes into.
//! A [`RenderGroup`] holds shared point-cloud drawables; a [`PointsObject`]
//! pairs fixed-capacity point geometry with a points material whose time
//! and spin-speed uniforms the shader consumes.

mod group;
mod points;

pub use group::RenderGroup;
pub use points::{PointsGeometry, PointsMaterial, PointsObject, PointsUniforms};
