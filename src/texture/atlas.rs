//! Assembly of image frames into a layered atlas texture.

use thiserror::Error;
use wgpu::util::DeviceExt;

use super::sampler::{Sampler, SamplerDescriptor};

/// Errors produced while assembling an atlas.
#[derive(Error, Debug)]
pub enum AtlasError {
    /// The atlas has no frames to assemble.
    #[error("atlas has no frames")]
    Empty,

    /// A frame's dimensions differ from the first frame's.
    #[error("frame {index} is {width}x{height}, expected {expected_width}x{expected_height}")]
    DimensionMismatch {
        /// Index of the offending frame.
        index: usize,
        /// Offending frame width.
        width: u32,
        /// Offending frame height.
        height: u32,
        /// Width established by the first frame.
        expected_width: u32,
        /// Height established by the first frame.
        expected_height: u32,
    },

    /// Encoded image bytes could not be decoded.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// One atlas frame of raw RGBA8 pixels.
#[derive(Debug, Clone)]
pub struct AtlasFrame {
    /// Pixel data, `4 * width * height` bytes.
    pub rgba8: Vec<u8>,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
}

/// An assembled atlas: all frames stacked as layers in one flat buffer.
#[derive(Debug, Clone)]
pub struct AtlasData {
    data: Vec<u8>,
    width: u32,
    height: u32,
    layers: u32,
}

impl AtlasData {
    /// The stacked pixel payload, `layers * 4 * width * height` bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Layer width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Layer height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of layers.
    #[inline]
    pub fn layers(&self) -> u32 {
        self.layers
    }

    /// One layer's slice of the payload.
    pub fn layer(&self, index: u32) -> &[u8] {
        let size = (4 * self.width * self.height) as usize;
        let offset = index as usize * size;
        &self.data[offset..offset + size]
    }
}

/// Collects frames and assembles them into an [`AtlasData`].
///
/// Every frame must match the first frame's dimensions; a mismatch aborts
/// that atlas's build and the builder's frames are left untouched for the
/// caller to inspect.
#[derive(Debug, Default)]
pub struct AtlasBuilder {
    frames: Vec<AtlasFrame>,
}

impl AtlasBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a frame of raw RGBA8 pixels.
    pub fn push_frame(&mut self, frame: AtlasFrame) {
        self.frames.push(frame);
    }

    /// Decode encoded image bytes (PNG, JPEG, …) and add the result.
    pub fn push_encoded(&mut self, bytes: &[u8]) -> Result<(), AtlasError> {
        use image::GenericImageView;

        let img = image::load_from_memory(bytes)?;
        let (width, height) = img.dimensions();
        let rgba8 = img.to_rgba8().into_raw();

        self.push_frame(AtlasFrame {
            rgba8,
            width,
            height,
        });
        Ok(())
    }

    /// Number of collected frames.
    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True if no frames were collected.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Stack the collected frames into one layered payload.
    pub fn build(&self) -> Result<AtlasData, AtlasError> {
        let first = self.frames.first().ok_or(AtlasError::Empty)?;
        let (width, height) = (first.width, first.height);
        let layer_size = (4 * width * height) as usize;

        let mut data = vec![0u8; self.frames.len() * layer_size];

        for (index, frame) in self.frames.iter().enumerate() {
            if frame.width != width || frame.height != height {
                return Err(AtlasError::DimensionMismatch {
                    index,
                    width: frame.width,
                    height: frame.height,
                    expected_width: width,
                    expected_height: height,
                });
            }

            let offset = index * layer_size;
            data[offset..offset + layer_size].copy_from_slice(&frame.rgba8);
        }

        log::debug!(
            "assembled atlas: {}x{}, {} layers",
            width,
            height,
            self.frames.len()
        );

        Ok(AtlasData {
            data,
            width,
            height,
            layers: self.frames.len() as u32,
        })
    }
}

/// An atlas uploaded as a layered GPU texture.
pub struct AtlasTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: Sampler,
}

impl AtlasTexture {
    /// Upload an assembled atlas as an `Rgba8UnormSrgb` array texture.
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, atlas: &AtlasData) -> Self {
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("Atlas Texture"),
                size: wgpu::Extent3d {
                    width: atlas.width(),
                    height: atlas.height(),
                    depth_or_array_layers: atlas.layers(),
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            atlas.data(),
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            dimension: Some(wgpu::TextureViewDimension::D2Array),
            ..Default::default()
        });

        let sampler = Sampler::new(device, &SamplerDescriptor::default());

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Get the underlying wgpu texture.
    #[inline]
    pub fn wgpu_texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    /// Get the array texture view.
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

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(width: u32, height: u32, fill: u8) -> AtlasFrame {
        AtlasFrame {
            rgba8: vec![fill; (4 * width * height) as usize],
            width,
            height,
        }
    }

    #[test]
    fn test_build_stacks_layers_in_order() {
        let mut builder = AtlasBuilder::new();
        builder.push_frame(frame(2, 2, 10));
        builder.push_frame(frame(2, 2, 20));

        let atlas = builder.build().unwrap();
        assert_eq!(atlas.width(), 2);
        assert_eq!(atlas.height(), 2);
        assert_eq!(atlas.layers(), 2);
        assert!(atlas.layer(0).iter().all(|&b| b == 10));
        assert!(atlas.layer(1).iter().all(|&b| b == 20));
    }

    #[test]
    fn test_dimension_mismatch_aborts_build() {
        let mut builder = AtlasBuilder::new();
        builder.push_frame(frame(2, 2, 0));
        builder.push_frame(frame(4, 2, 0));

        match builder.build() {
            Err(AtlasError::DimensionMismatch { index, width, .. }) => {
                assert_eq!(index, 1);
                assert_eq!(width, 4);
            }
            other => panic!("expected dimension mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_builder_errors() {
        let builder = AtlasBuilder::new();
        assert!(matches!(builder.build(), Err(AtlasError::Empty)));
    }

    #[test]
    fn test_undecodable_bytes_error() {
        let mut builder = AtlasBuilder::new();
        assert!(matches!(
            builder.push_encoded(&[0, 1, 2, 3]),
            Err(AtlasError::Decode(_))
        ));
        assert!(builder.is_empty());
    }
}
