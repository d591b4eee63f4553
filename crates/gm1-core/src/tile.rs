use crate::color::{expand_color, read_color};
use crate::container::{TILE_HEIGHT, TILE_WIDTH};
use crate::error::{Gm1Error, Result};
use image::RgbaImage;

/// Size of the diamond block: 256 pixels, two bytes each.
pub const TILE_BYTES: usize = 512;

/// Row widths of the diamond, top to bottom: 2, 6, .., 30, 30, 26, .., 2.
pub fn row_widths() -> impl Iterator<Item = u32> {
    let half = TILE_HEIGHT / 2;
    (0..half)
        .map(|r| 2 + 4 * r)
        .chain((0..half).map(move |r| 2 + 4 * (half - 1 - r)))
}

/// Draws the 30x16 ground diamond stored in the first [`TILE_BYTES`] of
/// `data` with its bounding box's top-left at `(ax, ay)`.
///
/// Rows are stored one after another, each centered horizontally. Colors
/// are raw 16-bit values; every pixel written is opaque.
pub fn decode_tile(canvas: &mut RgbaImage, ax: u32, ay: u32, data: &[u8]) -> Result<()> {
    if data.len() < TILE_BYTES {
        return Err(Gm1Error::Size {
            needed: TILE_BYTES,
            actual: data.len(),
        });
    }
    if ax + TILE_WIDTH > canvas.width() || ay + TILE_HEIGHT > canvas.height() {
        return Err(Gm1Error::Range(format!(
            "tile at ({ax}, {ay}) outside {}x{} canvas",
            canvas.width(),
            canvas.height()
        )));
    }

    let mut colors = data[..TILE_BYTES].chunks_exact(2).filter_map(read_color);
    let mid = ax + TILE_WIDTH / 2;
    for (row, w) in row_widths().enumerate() {
        let y = ay + row as u32;
        for x in mid - w / 2..mid + w / 2 {
            // 512 bytes hold exactly one color per diamond pixel
            let Some(c) = colors.next() else {
                return Ok(());
            };
            canvas.put_pixel(x, y, expand_color(c));
        }
    }
    Ok(())
}
