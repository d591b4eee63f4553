#![allow(dead_code)]

use gm1_core::container::{Gm1Header, ImageDescriptor};
use gm1_core::palette::{PALETTE_COUNT, PALETTE_SIZE};

pub const WHITE: u16 = 0x7FFF;
pub const RED: u16 = 0x7C00;
pub const GREEN: u16 = 0x03E0;

pub fn desc(width: u16, height: u16) -> ImageDescriptor {
    ImageDescriptor {
        width,
        height,
        ..Default::default()
    }
}

pub fn tile_desc(width: u16, height: u16, part: u8, parts: u8, tile_y: u16) -> ImageDescriptor {
    ImageDescriptor {
        width,
        height,
        part,
        parts,
        tile_position_y: tile_y,
        ..Default::default()
    }
}

fn descriptor_bytes(d: &ImageDescriptor) -> Vec<u8> {
    let mut b = Vec::with_capacity(16);
    b.extend_from_slice(&d.width.to_le_bytes());
    b.extend_from_slice(&d.height.to_le_bytes());
    b.extend_from_slice(&d.position_x.to_le_bytes());
    b.extend_from_slice(&d.position_y.to_le_bytes());
    b.push(d.part);
    b.push(d.parts);
    b.extend_from_slice(&d.tile_position_y.to_le_bytes());
    b.push(d.tile_placement_alignment);
    b.push(d.horizontal_offset);
    b.push(d.drawing_box_width);
    b.push(d.performance_id);
    b
}

/// Palette table where palette `p`, entry `i` holds `p * 256 + i`.
pub fn numbered_palette() -> Vec<u16> {
    (0..PALETTE_COUNT * PALETTE_SIZE).map(|v| v as u16).collect()
}

/// Serializes a container. `image_count` and `data_size` are filled in from
/// `images`; the rest of `header` is written as given.
pub fn build_container(
    mut header: Gm1Header,
    palette: &[u16],
    images: &[(ImageDescriptor, Vec<u8>)],
) -> Vec<u8> {
    header.image_count = images.len() as u32;
    header.data_size = images.iter().map(|(_, d)| d.len() as u32).sum();

    let mut out = header.to_le_bytes().to_vec();
    for v in palette {
        out.extend_from_slice(&v.to_le_bytes());
    }
    let mut offset = 0u32;
    for (_, data) in images {
        out.extend_from_slice(&offset.to_le_bytes());
        offset += data.len() as u32;
    }
    for (_, data) in images {
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    }
    for (d, _) in images {
        out.extend(descriptor_bytes(d));
    }
    for (_, data) in images {
        out.extend_from_slice(data);
    }
    out
}

pub fn container_of(data_type: u32, images: &[(ImageDescriptor, Vec<u8>)]) -> Vec<u8> {
    let header = Gm1Header {
        data_type,
        ..Default::default()
    };
    build_container(header, &numbered_palette(), images)
}

/// Token stream painting every row of a `width x height` image in `color`.
pub fn solid_stream(width: u32, height: u32, color: u16) -> Vec<u8> {
    let mut s = Vec::new();
    for _ in 0..height {
        let mut left = width;
        while left > 0 {
            let n = left.min(32);
            s.push(0x40 | (n - 1) as u8);
            s.extend_from_slice(&color.to_le_bytes());
            left -= n;
        }
        s.push(0x80);
    }
    s
}

/// Same as [`solid_stream`] with one palette index byte per color.
pub fn solid_indexed_stream(width: u32, height: u32, index: u8) -> Vec<u8> {
    let mut s = Vec::new();
    for _ in 0..height {
        let mut left = width;
        while left > 0 {
            let n = left.min(32);
            s.push(0x40 | (n - 1) as u8);
            s.push(index);
            left -= n;
        }
        s.push(0x80);
    }
    s
}

/// 512-byte diamond block of one color.
pub fn tile_block(color: u16) -> Vec<u8> {
    color.to_le_bytes().repeat(256)
}

pub fn bitmap(pixels: usize, color: u16) -> Vec<u8> {
    color.to_le_bytes().repeat(pixels)
}
