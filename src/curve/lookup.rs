//! Baking keyframe curves into uniformly sampled lookup tables.

use thiserror::Error;
use wgpu::util::DeviceExt;

use super::interpolant::{ColorInterpolant, FloatInterpolant};
use crate::math::{clamp, lerp};
use crate::texture::{Sampler, SamplerDescriptor};

/// Errors produced while baking a curve.
#[derive(Error, Debug)]
pub enum CurveError {
    /// The curve has no keyframes to resample.
    #[error("cannot bake a curve with no keyframes")]
    NoKeyframes,
}

/// A curve resampled onto a uniform grid.
///
/// `data` holds `width * channels` floats; sample index i corresponds to
/// normalized position `i / (width - 1)` across the curve's time span.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveTable {
    data: Vec<f32>,
    width: usize,
    channels: usize,
}

impl CurveTable {
    /// The flat sample buffer.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Number of samples along the curve.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Channels per sample (1 scalar, 4 color+alpha).
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Sample one channel at normalized position `u` in [0, 1].
    ///
    /// Linear filtering with edge clamp, the CPU twin of how a shader reads
    /// the uploaded table.
    pub fn sample(&self, u: f32, channel: usize) -> f32 {
        debug_assert!(channel < self.channels);

        let x = clamp(u, 0.0, 1.0) * (self.width - 1) as f32;
        let lo = x.floor() as usize;
        let hi = (lo + 1).min(self.width - 1);
        let frac = x - lo as f32;

        let a = self.data[lo * self.channels + channel];
        let b = self.data[hi * self.channels + channel];
        lerp(a, b, frac)
    }
}

/// Smallest keyframe spacing as a fraction of `max_time`, folded onto an
/// initial bound. Pairs coarser than the bound never widen the result.
fn smallest_step(initial: f32, times: &[f32], max_time: f32) -> f32 {
    times
        .windows(2)
        .map(|w| (w[1] - w[0]) / max_time)
        .fold(initial, f32::min)
}

/// Grid width resolving the densest keyframe interval with at least one
/// discrete sample.
fn grid_width(smallest: f32) -> usize {
    (1.0 / smallest).ceil() as usize + 1
}

impl FloatInterpolant {
    /// Resample this curve onto a uniform grid (1 channel per sample).
    pub fn to_table(&mut self) -> Result<CurveTable, CurveError> {
        if self.is_empty() {
            return Err(CurveError::NoKeyframes);
        }

        let max_time = self.last_time();
        let smallest = smallest_step(0.5, self.times(), max_time);
        let width = grid_width(smallest);

        let mut data = Vec::with_capacity(width);
        for i in 0..width {
            let t = i as f32 / (width - 1) as f32;
            data.push(self.evaluate(t * max_time));
        }

        Ok(CurveTable {
            data,
            width,
            channels: 1,
        })
    }
}

impl ColorInterpolant {
    /// Resample this color curve and a paired alpha curve onto one uniform
    /// RGBA grid (4 channels per sample).
    ///
    /// The grid spans the later of the two curves' end times and resolves
    /// the densest keyframe interval of either curve.
    pub fn to_table(&mut self, alpha: &mut FloatInterpolant) -> Result<CurveTable, CurveError> {
        if self.is_empty() || alpha.is_empty() {
            return Err(CurveError::NoKeyframes);
        }

        let max_time = self.last_time().max(alpha.last_time());
        let smallest = smallest_step(0.5, self.times(), max_time);
        let smallest = smallest_step(smallest, alpha.times(), max_time);
        let width = grid_width(smallest);

        let mut data = Vec::with_capacity(width * 4);
        for i in 0..width {
            let t = i as f32 / (width - 1) as f32 * max_time;
            let color = self.evaluate(t);
            let a = alpha.evaluate(t);
            data.extend_from_slice(&[color.r, color.g, color.b, a]);
        }

        Ok(CurveTable {
            data,
            width,
            channels: 4,
        })
    }
}

/// A baked curve uploaded as a 1D lookup texture.
///
/// Edge-clamped addressing and linear filtering; shaders index it by
/// normalized particle age.
pub struct LookupTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: Sampler,
    width: u32,
}

impl LookupTexture {
    /// Upload a baked table.
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, table: &CurveTable) -> Self {
        let format = match table.channels() {
            1 => wgpu::TextureFormat::R32Float,
            4 => wgpu::TextureFormat::Rgba32Float,
            n => unreachable!("no 1D lookup format with {n} channels"),
        };

        let width = table.width() as u32;
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("Curve Lookup Texture"),
                size: wgpu::Extent3d {
                    width,
                    height: 1,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D1,
                format,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            bytemuck::cast_slice(table.data()),
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = Sampler::new(device, &SamplerDescriptor::default());

        Self {
            texture,
            view,
            sampler,
            width,
        }
    }

    /// Number of samples along the texture.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the underlying wgpu texture.
    #[inline]
    pub fn wgpu_texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    /// Get the texture view.
    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Get the sampler (edge clamp, linear filter).
    #[inline]
    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }
}
