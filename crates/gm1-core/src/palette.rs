use crate::color::expand_color;
use crate::error::{Gm1Error, Result};
use image::RgbaImage;

pub const PALETTE_SIZE: usize = 256;
pub const PALETTE_COUNT: usize = 10;

/// Palette used for animations when the caller does not pick one.
pub const DEFAULT_PALETTE: usize = 1;

/// Returns palette `index` (256 colors) from a full palette table.
pub fn resolve(table: &[u16], index: usize) -> Result<&[u16]> {
    if index >= PALETTE_COUNT {
        return Err(Gm1Error::Range(format!(
            "palette {index}, expected 0..{PALETTE_COUNT}"
        )));
    }
    let start = index * PALETTE_SIZE;
    table.get(start..start + PALETTE_SIZE).ok_or_else(|| {
        Gm1Error::Range(format!(
            "palette {index} needs {} entries, table has {}",
            start + PALETTE_SIZE,
            table.len()
        ))
    })
}

/// Renders every palette of `table` as a swatch sheet: each palette is a
/// 16x16 grid of `swatch`-pixel squares, palettes stacked top to bottom.
pub fn palette_image(table: &[u16], swatch: u32) -> Result<RgbaImage> {
    let swatch = swatch.max(1);
    let per_row = 16u32;
    let mut img = RgbaImage::new(per_row * swatch, PALETTE_COUNT as u32 * per_row * swatch);
    for p in 0..PALETTE_COUNT {
        let colors = resolve(table, p)?;
        for (i, &c) in colors.iter().enumerate() {
            let cx = (i as u32 % per_row) * swatch;
            let cy = (p as u32 * per_row + i as u32 / per_row) * swatch;
            let px = expand_color(c);
            for y in cy..cy + swatch {
                for x in cx..cx + swatch {
                    img.put_pixel(x, y, px);
                }
            }
        }
    }
    Ok(img)
}
