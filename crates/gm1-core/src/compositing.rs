use image::{Rgba, RgbaImage};

/// Copies `src` into `canvas` with its top-left at `(dx, dy)`, clipping at
/// the canvas edges. Pixels are replaced, not blended.
///
/// With `outlines`, a red 1px frame is drawn over the copied area.
pub fn blit_rgba(src: &RgbaImage, canvas: &mut RgbaImage, dx: u32, dy: u32, outlines: bool) {
    let (cw, ch) = canvas.dimensions();
    let (sw, sh) = src.dimensions();

    for yy in 0..sh {
        if dy + yy >= ch {
            break;
        }
        for xx in 0..sw {
            if dx + xx >= cw {
                break;
            }
            canvas.put_pixel(dx + xx, dy + yy, *src.get_pixel(xx, yy));
        }
    }

    if outlines && sw > 0 && sh > 0 {
        let red = Rgba([255, 0, 0, 255]);
        let rx = dx + sw - 1;
        let by = dy + sh - 1;
        for xx in dx..=rx {
            if xx < cw && dy < ch {
                canvas.put_pixel(xx, dy, red);
            }
            if xx < cw && by < ch {
                canvas.put_pixel(xx, by, red);
            }
        }
        for yy in dy..=by {
            if dx < cw && yy < ch {
                canvas.put_pixel(dx, yy, red);
            }
            if rx < cw && yy < ch {
                canvas.put_pixel(rx, yy, red);
            }
        }
    }
}
