use uuid::Uuid;
use wgpu::{AddressMode, TextureFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureSampler {
    pub address_mode_u: wgpu::AddressMode,
    pub address_mode_v: wgpu::AddressMode,
    pub mag_filter: wgpu::FilterMode,
    pub min_filter: wgpu::FilterMode,
    pub mipmap_filter: wgpu::MipmapFilterMode,
}

impl Default for TextureSampler {
    fn default() -> Self {
        Self {
            address_mode_u: AddressMode::Repeat,
            address_mode_v: AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Linear,
        }
    }
}

// ============================================================================
// Texture Asset
// ============================================================================

/// A decoded brush texture, ready for upload by the host renderer.
///
/// Brush textures are stored with a top-left origin, so `flip_y` is always
/// `false` for textures the loader produces.
#[derive(Debug)]
pub struct Texture {
    pub uuid: Uuid,
    /// Debug name, `<brush>_<slot>` for brush textures.
    pub name: String,

    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    /// Tightly packed pixel rows.
    pub data: Vec<u8>,

    pub sampler: TextureSampler,
    pub flip_y: bool,
    pub generate_mipmaps: bool,
}

impl Texture {
    /// 2D RGBA8 texture with repeat wrapping and no vertical flip.
    pub fn new_2d(name: &str, width: u32, height: u32, data: Vec<u8>, format: TextureFormat) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.to_string(),
            width,
            height,
            format,
            data,
            sampler: TextureSampler::default(),
            flip_y: false,
            generate_mipmaps: true,
        }
    }
}
