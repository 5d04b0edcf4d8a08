//! Shared fixtures: an in-memory brush resource tree built from the catalog.

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use sketch_brushes::assets::MemoryAssetReader;
use sketch_brushes::brushes::{BrushCatalog, BrushDescriptor};

pub const VERTEX_SOURCE: &str = "in vec3 a_position;\nvoid main() { gl_Position = vec4(a_position, 1.0); }\n";
pub const FRAGMENT_SOURCE: &str = "out vec4 fragColor;\nvoid main() { fragColor = vec4(1.0); }\n";

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Encodes a solid-color PNG.
pub fn png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba(color));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

/// Writes shaders and 2x2 textures for one brush.
pub fn install_brush(reader: &MemoryAssetReader, descriptor: &BrushDescriptor) {
    reader.insert(descriptor.shaders.vertex.clone(), VERTEX_SOURCE);
    reader.insert(descriptor.shaders.fragment.clone(), FRAGMENT_SOURCE);
    for (_, path) in descriptor.texture_slots() {
        reader.insert(path, png(2, 2, [255, 128, 0, 255]));
    }
}

/// A reader holding the resources of the named brushes.
pub fn reader_with(catalog: &BrushCatalog, brushes: &[&str]) -> Arc<MemoryAssetReader> {
    let reader = Arc::new(MemoryAssetReader::new());
    for name in brushes {
        install_brush(&reader, catalog.lookup(name).unwrap());
    }
    reader
}

/// A reader holding every brush in the catalog.
pub fn full_reader(catalog: &BrushCatalog) -> Arc<MemoryAssetReader> {
    let reader = Arc::new(MemoryAssetReader::new());
    for descriptor in catalog.iter() {
        install_brush(&reader, descriptor);
    }
    reader
}
