//! # Curve Module
//!
//! Keyframe curves for driving particle appearance over normalized age.
//!
//! Authored keyframes are sparse and irregularly spaced; shaders want a
//! uniformly sampled lookup. [`FloatInterpolant`], [`Vec3Interpolant`] and
//! [`ColorInterpolant`] evaluate piecewise-linear curves at arbitrary times,
//! and the baker resamples scalar and color curves onto a grid sized from
//! the finest keyframe spacing ([`CurveTable`]), uploadable as a 1D texture
//! with edge-clamped linear sampling ([`LookupTexture`]).

mod interpolant;
mod lookup;

pub use interpolant::{ColorInterpolant, FloatInterpolant, Keyframe, Vec3Interpolant};
pub use lookup::{CurveError, CurveTable, LookupTexture};
