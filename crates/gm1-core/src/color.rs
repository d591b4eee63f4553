use image::Rgba;

pub const MASK_BLUE: u16 = 0x001F;
pub const MASK_GREEN: u16 = 0x03E0;
pub const MASK_RED: u16 = 0x7C00;

pub const OPAQUE: u8 = 0xFF;
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Expands a 15-bit `xRRRRRGGGGGBBBBB` color into an opaque RGBA pixel.
///
/// Channels are shifted into the high bits of each byte, the low three bits
/// stay zero. This is the exact conversion the game uses; do not replace it
/// with a rescale.
#[inline]
pub fn expand_color(v: u16) -> Rgba<u8> {
    let r = ((v & MASK_RED) >> 7) as u8;
    let g = ((v & MASK_GREEN) >> 2) as u8;
    let b = ((v & MASK_BLUE) << 3) as u8;
    Rgba([r, g, b, OPAQUE])
}

/// Inverse of [`expand_color`] for the 15 significant bits. The top bit is
/// not carried by the pixel and comes back as zero.
#[inline]
pub fn pack_color(px: Rgba<u8>) -> u16 {
    let [r, g, b, _] = px.0;
    ((r as u16) << 7) & MASK_RED | ((g as u16) << 2) & MASK_GREEN | ((b as u16) >> 3) & MASK_BLUE
}

/// Reads one little-endian 16-bit color from the first two bytes of `bytes`.
#[inline]
pub fn read_color(bytes: &[u8]) -> Option<u16> {
    match bytes {
        [lo, hi, ..] => Some(u16::from_le_bytes([*lo, *hi])),
        _ => None,
    }
}
