//! # Wisp - CPU Particle Simulation with GPU Point Rendering
//!
//! Wisp simulates particles on the CPU every frame and packs them into
//! fixed-capacity, GPU-facing point buffers, alongside a curve baker that
//! turns sparse keyframes into 1D lookup textures for shader consumption.
//!
//! ## Features
//!
//! - **Particles**: emitters with rate/quota/capacity scheduling,
//!   semi-implicit Euler integration, lifecycle hooks and scoped renderers
//! - **Curves**: piecewise-linear keyframe interpolants baked onto uniform
//!   grids sized from the finest keyframe spacing
//! - **Scene**: a render-group attachment point with point-cloud drawables
//! - **Textures**: sampler configuration and layered atlas assembly
//! - **Math**: the vectors, quaternions and colors the simulation needs,
//!   plus a seeded deterministic random source
//!
//! ## Example
//!
//! ```
//! use wisp::prelude::*;
//!
//! let mut system = ParticleSystem::new();
//! system.add_emitter(Emitter::new(
//!     EmitterParams {
//!         emission_rate: 30.0,
//!         max_emission: 60,
//!         velocity_magnitude: 2.0,
//!         gravity: true,
//!         max_life: 1.0,
//!         ..Default::default()
//!     },
//!     RandomSource::default(),
//! ));
//!
//! let mut elapsed = 0.0;
//! while system.still_active() {
//!     let dt = 1.0 / 60.0;
//!     elapsed += dt;
//!     system.step(dt, elapsed);
//! }
//!
//! // Bake a scale-over-life curve for the shader.
//! let mut scale = FloatInterpolant::new(&[
//!     Keyframe::new(0.0, 0.0),
//!     Keyframe::new(0.25, 1.0),
//!     Keyframe::new(1.0, 0.0),
//! ]);
//! let table = scale.to_table().unwrap();
//! assert_eq!(table.width(), 5);
//! ```

#![warn(missing_docs)]

pub mod core;
pub mod curve;
pub mod math;
pub mod particles;
pub mod scene;
pub mod texture;

// Re-export commonly used types
pub mod prelude {
    //! Convenient re-exports of commonly used types.

    pub use crate::core::*;
    pub use crate::curve::*;
    pub use crate::math::*;
    pub use crate::particles::*;
    pub use crate::scene::*;
    pub use crate::texture::*;
}

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = "Wisp";
