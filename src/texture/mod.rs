//! # Texture Module
//!
//! Sampler configuration shared by lookup curves and atlases, and the
//! assembly of same-sized image frames into a layered atlas texture.

mod atlas;
mod sampler;

pub use atlas::{AtlasBuilder, AtlasData, AtlasError, AtlasFrame, AtlasTexture};
pub use sampler::{AddressMode, FilterMode, Sampler, SamplerDescriptor};
