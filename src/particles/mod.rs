//! # Particles Module
//!
//! CPU particle simulation feeding a GPU point renderer.
//!
//! A [`ParticleSystem`] owns [`Emitter`]s. Each frame an emitter schedules
//! emission against its rate, capacity and lifetime quota, integrates its
//! live particles with semi-implicit Euler, drops the expired ones, and
//! packs the survivors into its [`ParticleRenderer`]'s fixed-capacity
//! buffers. Emitters that can no longer contribute anything are disposed
//! and removed by the system.

mod emitter;
mod particle;
mod particle_system;
mod renderer;
mod shape;

pub use emitter::{Emitter, EmitterParams, ParticleCallback};
pub use particle::Particle;
pub use particle_system::ParticleSystem;
pub use renderer::{ParticleRenderer, ParticleRendererParams};
pub use shape::{EmitterShape, PointShape};
