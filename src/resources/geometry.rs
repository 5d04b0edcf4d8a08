use std::sync::Arc;

use glam::{Vec3, Vec4};
use rustc_hash::FxHashMap;
use uuid::Uuid;
use wgpu::VertexFormat;

/// A named vertex channel: CPU-side bytes plus layout metadata.
///
/// The byte buffer is shared through `Arc`, so copying an attribute into a
/// second slot (or interleaving several attributes over one buffer) never
/// duplicates vertex data.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub data: Arc<Vec<u8>>,
    pub format: VertexFormat,
    pub offset: u64,
    pub count: u32,
    pub stride: u64,
}

impl Attribute {
    /// Planar (non-interleaved) attribute over a typed slice.
    pub fn new_planar<T: bytemuck::Pod>(data: &[T], format: VertexFormat) -> Self {
        Self {
            data: Arc::new(bytemuck::cast_slice(data).to_vec()),
            format,
            offset: 0,
            count: data.len() as u32,
            stride: std::mem::size_of::<T>() as u64,
        }
    }

    /// One channel of an interleaved buffer shared with other attributes.
    pub fn new_interleaved(
        data: Arc<Vec<u8>>,
        format: VertexFormat,
        offset: u64,
        count: u32,
        stride: u64,
    ) -> Self {
        Self {
            data,
            format,
            offset,
            count,
            stride,
        }
    }

    /// Returns `true` if both attributes view the same byte buffer.
    #[must_use]
    pub fn shares_buffer_with(&self, other: &Attribute) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    pub fn read<T>(&self, i: u32) -> Option<T>
    where
        T: bytemuck::Pod,
    {
        let offset = self.offset as usize + (i as usize) * self.stride as usize;
        let size = std::mem::size_of::<T>();
        let bytes = self.data.get(offset..offset + size)?;
        Some(bytemuck::pod_read_unaligned(bytes))
    }

    pub fn read_vec3(&self, i: u32) -> Option<Vec3> {
        if self.format != VertexFormat::Float32x3 {
            return None;
        }
        self.read::<[f32; 3]>(i).map(Vec3::from_array)
    }

    /// Reads a color-like value in any supported format, as floats.
    ///
    /// `Float32x3` gets alpha 1.0 and `Unorm8x4` is divided by 255.
    pub fn read_vec4(&self, i: u32) -> Option<Vec4> {
        match self.format {
            VertexFormat::Float32x4 => self.read::<[f32; 4]>(i).map(Vec4::from_array),
            VertexFormat::Float32x3 => self.read_vec3(i).map(|v| v.extend(1.0)),
            VertexFormat::Unorm8x4 => self
                .read::<[u8; 4]>(i)
                .map(|c| Vec4::from_array(c.map(|b| f32::from(b) / 255.0))),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Geometry {
    pub uuid: Uuid,
    pub name: Option<String>,

    attributes: FxHashMap<String, Attribute>,
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new()
    }
}

impl Geometry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: None,
            attributes: FxHashMap::default(),
        }
    }

    /// Builder-style attribute insertion.
    #[must_use]
    pub fn with_attribute(mut self, name: &str, attr: Attribute) -> Self {
        self.set_attribute(name, attr);
        self
    }

    pub fn attributes(&self) -> &FxHashMap<String, Attribute> {
        &self.attributes
    }

    pub fn set_attribute(&mut self, name: &str, attr: Attribute) {
        self.attributes.insert(name.to_string(), attr);
    }

    pub fn get_attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }
}
