//! Piecewise-linear keyframe interpolation.

use crate::math::{lerp, Color, Vector3};

/// A keyframe pairing a time in seconds with a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe<T: Copy> {
    /// Time in seconds.
    pub time: f32,
    /// Value at this keyframe.
    pub value: T,
}

impl<T: Copy> Keyframe<T> {
    /// Create a new keyframe.
    pub fn new(time: f32, value: T) -> Self {
        Self { time, value }
    }
}

/// Stride-generic interpolation core shared by the typed curve fronts.
///
/// Keyframe times are non-decreasing by convention (not enforced). The
/// stride is fixed per instance and matches every keyframe's value arity.
/// Evaluation writes into a reusable scratch buffer of length = stride;
/// times outside the keyframe range clamp to the boundary keyframe.
#[derive(Debug, Clone)]
struct Interpolant {
    times: Vec<f32>,
    values: Vec<f32>,
    stride: usize,
    scratch: Vec<f32>,
}

impl Interpolant {
    fn new(times: Vec<f32>, values: Vec<f32>, stride: usize) -> Self {
        debug_assert_eq!(values.len(), times.len() * stride);
        Self {
            times,
            values,
            stride,
            scratch: vec![0.0; stride],
        }
    }

    fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Time of the last keyframe, or 0.0 for an empty curve.
    fn last_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    fn frame(&self, index: usize) -> &[f32] {
        &self.values[index * self.stride..(index + 1) * self.stride]
    }

    /// Evaluate at `time`, filling and returning the scratch buffer.
    fn evaluate(&mut self, time: f32) -> &[f32] {
        let n = self.times.len();

        if n == 0 {
            self.scratch.fill(0.0);
            return &self.scratch;
        }

        if n == 1 || time <= self.times[0] {
            self.scratch.copy_from_slice(&self.values[..self.stride]);
            return &self.scratch;
        }

        let last = n - 1;
        if time >= self.times[last] {
            let start = last * self.stride;
            self.scratch.copy_from_slice(&self.values[start..start + self.stride]);
            return &self.scratch;
        }

        // Find the segment containing `time`.
        let hi = self
            .times
            .iter()
            .position(|&t| t > time)
            .unwrap_or(last);
        let lo = hi - 1;

        let span = self.times[hi] - self.times[lo];
        let alpha = if span > 0.0 {
            (time - self.times[lo]) / span
        } else {
            0.0
        };

        for c in 0..self.stride {
            let a = self.values[lo * self.stride + c];
            let b = self.values[hi * self.stride + c];
            self.scratch[c] = lerp(a, b, alpha);
        }
        &self.scratch
    }
}

/// A scalar keyframe curve.
#[derive(Debug, Clone)]
pub struct FloatInterpolant {
    inner: Interpolant,
}

impl FloatInterpolant {
    /// Create from keyframes (times non-decreasing by convention).
    pub fn new(frames: &[Keyframe<f32>]) -> Self {
        let times = frames.iter().map(|f| f.time).collect();
        let values = frames.iter().map(|f| f.value).collect();
        Self {
            inner: Interpolant::new(times, values, 1),
        }
    }

    /// Keyframe times.
    pub fn times(&self) -> &[f32] {
        &self.inner.times
    }

    /// True if the curve has no keyframes.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Time of the last keyframe, or 0.0 for an empty curve.
    pub fn last_time(&self) -> f32 {
        self.inner.last_time()
    }

    /// Evaluate at `time`. An empty curve evaluates to 0.0.
    pub fn evaluate(&mut self, time: f32) -> f32 {
        self.inner.evaluate(time)[0]
    }
}

/// A 3-vector keyframe curve.
#[derive(Debug, Clone)]
pub struct Vec3Interpolant {
    inner: Interpolant,
}

impl Vec3Interpolant {
    /// Create from keyframes (times non-decreasing by convention).
    pub fn new(frames: &[Keyframe<Vector3>]) -> Self {
        let times = frames.iter().map(|f| f.time).collect();
        let values = frames
            .iter()
            .flat_map(|f| f.value.to_array())
            .collect();
        Self {
            inner: Interpolant::new(times, values, 3),
        }
    }

    /// Keyframe times.
    pub fn times(&self) -> &[f32] {
        &self.inner.times
    }

    /// True if the curve has no keyframes.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Time of the last keyframe, or 0.0 for an empty curve.
    pub fn last_time(&self) -> f32 {
        self.inner.last_time()
    }

    /// Evaluate at `time`. An empty curve evaluates to the zero vector.
    pub fn evaluate(&mut self, time: f32) -> Vector3 {
        let r = self.inner.evaluate(time);
        Vector3::new(r[0], r[1], r[2])
    }
}

/// An RGB color keyframe curve.
#[derive(Debug, Clone)]
pub struct ColorInterpolant {
    inner: Interpolant,
}

impl ColorInterpolant {
    /// Create from keyframes (times non-decreasing by convention).
    pub fn new(frames: &[Keyframe<Color>]) -> Self {
        let times = frames.iter().map(|f| f.time).collect();
        let values = frames
            .iter()
            .flat_map(|f| f.value.to_array())
            .collect();
        Self {
            inner: Interpolant::new(times, values, 3),
        }
    }

    /// Keyframe times.
    pub fn times(&self) -> &[f32] {
        &self.inner.times
    }

    /// True if the curve has no keyframes.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Time of the last keyframe, or 0.0 for an empty curve.
    pub fn last_time(&self) -> f32 {
        self.inner.last_time()
    }

    /// Evaluate at `time`. An empty curve evaluates to black.
    pub fn evaluate(&mut self, time: f32) -> Color {
        let r = self.inner.evaluate(time);
        Color::new(r[0], r[1], r[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> FloatInterpolant {
        FloatInterpolant::new(&[
            Keyframe::new(0.0, 0.0),
            Keyframe::new(1.0, 2.0),
        ])
    }

    #[test]
    fn test_midpoint() {
        let mut curve = ramp();
        assert!((curve.evaluate(0.5) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_clamps_outside_range() {
        let mut curve = ramp();
        assert_eq!(curve.evaluate(-5.0), 0.0);
        assert_eq!(curve.evaluate(5.0), 2.0);
    }

    #[test]
    fn test_single_keyframe_is_constant() {
        let mut curve = FloatInterpolant::new(&[Keyframe::new(0.5, 3.0)]);
        assert_eq!(curve.evaluate(0.0), 3.0);
        assert_eq!(curve.evaluate(0.5), 3.0);
        assert_eq!(curve.evaluate(9.0), 3.0);
    }

    #[test]
    fn test_empty_curve_evaluates_to_zero() {
        let mut curve = FloatInterpolant::new(&[]);
        assert_eq!(curve.evaluate(0.3), 0.0);
    }

    #[test]
    fn test_vec3_projection() {
        let mut curve = Vec3Interpolant::new(&[
            Keyframe::new(0.0, Vector3::ZERO),
            Keyframe::new(2.0, Vector3::new(2.0, 4.0, 6.0)),
        ]);
        let v = curve.evaluate(1.0);
        assert!(v.approx_eq(&Vector3::new(1.0, 2.0, 3.0), 1e-6));
    }

    #[test]
    fn test_color_projection() {
        let mut curve = ColorInterpolant::new(&[
            Keyframe::new(0.0, Color::BLACK),
            Keyframe::new(1.0, Color::WHITE),
        ]);
        let c = curve.evaluate(0.25);
        assert!(c.approx_eq(&Color::splat(0.25), 1e-6));
    }

    #[test]
    fn test_scratch_reuse_between_evaluations() {
        let mut curve = ramp();
        let a = curve.evaluate(0.25);
        let b = curve.evaluate(0.75);
        assert!((a - 0.5).abs() < 1e-6);
        assert!((b - 1.5).abs() < 1e-6);
    }
}
