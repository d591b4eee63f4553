//! Shelf packing of a decoded image list into one atlas canvas.
//!
//! Images are placed left to right with a 1px gap; a new shelf starts one
//! pixel below the tallest image of the previous shelf when the next image
//! would cross `max_width`.

use crate::compositing::blit_rgba;
use crate::config::ConvertConfig;
use crate::error::{Gm1Error, Result};
use crate::model::{ImageList, ListData, Rect};
use image::{RgbaImage, imageops};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Measured atlas geometry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AtlasLayout {
    /// Widest shelf, including the trailing 1px gap.
    pub used_width: u32,
    /// Canvas width: `max_width`, or half of it when the shelves fit there.
    pub width: u32,
    pub height: u32,
}

/// Packed atlas canvas and its geometry.
pub struct AtlasOutput {
    pub rgba: RgbaImage,
    pub layout: AtlasLayout,
}

/// Tight box around every pixel that is not fully transparent.
pub fn bounding_box(img: &RgbaImage) -> Option<Rect> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, px) in img.enumerate_pixels() {
        if px[3] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x1, y1, x2, y2)) => (x1.min(x), y1.min(y), x2.max(x), y2.max(y)),
        });
    }
    bounds.map(|(x1, y1, x2, y2)| Rect::new(x1, y1, x2 - x1 + 1, y2 - y1 + 1))
}

/// Crops every animation frame to its bounding box and moves the frame's
/// center by the crop offset. Fully transparent frames shrink to 0x0 and
/// keep their center. No-op for other lists.
pub fn shrink_animation_frames(list: &mut ImageList) {
    let ListData::Animation { frames } = &mut list.data else {
        return;
    };
    for (image, frame) in list.images.iter_mut().zip(frames.iter_mut()) {
        match bounding_box(&image.pixels) {
            Some(b) => {
                image.pixels = imageops::crop_imm(&image.pixels, b.x, b.y, b.w, b.h).to_image();
                frame.center.x -= b.x as i32;
                frame.center.y -= b.y as i32;
            }
            None => image.pixels = RgbaImage::new(0, 0),
        }
    }
}

/// Assigns atlas positions to every image of `list` and moves tile part
/// rectangles along with their images.
///
/// With `sort`, images are visited by ascending height (stable); animation
/// frames always keep their sequence order.
pub fn layout(list: &mut ImageList, max_width: u32, sort: bool) -> Result<AtlasLayout> {
    let mut order: Vec<usize> = (0..list.images.len()).collect();
    if sort && !list.is_animation() {
        order.sort_by_key(|&i| list.images[i].height());
    }

    let mut posx = 0u32;
    let mut posy = 0u32;
    let mut maxy = 0u32;
    let mut used_width = 0u32;
    let mut on_shelf = 0usize;
    for &i in &order {
        let image = &mut list.images[i];
        let (w, h) = (image.width(), image.height());
        if posx + w + 1 > max_width && on_shelf > 0 {
            on_shelf = 0;
            posx = 0;
            posy = maxy + 1;
        }
        if posx + w + 1 > max_width {
            return Err(Gm1Error::Layout {
                index: i,
                width: w,
                max_width,
            });
        }
        on_shelf += 1;
        image.x = posx;
        image.y = posy;
        posx += w + 1;
        used_width = used_width.max(posx);
        maxy = maxy.max(posy + h);
    }

    if let ListData::Tiles { objects, assembled } = &mut list.data {
        if *assembled {
            for (object, image) in objects.iter_mut().zip(&list.images) {
                for part in &mut object.parts {
                    part.rect.x += image.x;
                    part.rect.y += image.y;
                }
            }
        } else {
            let parts = objects.iter_mut().flat_map(|o| o.parts.iter_mut());
            for (part, image) in parts.zip(&list.images) {
                part.rect.x += image.x;
                part.rect.y += image.y;
            }
        }
    }

    let width = if used_width <= max_width / 2 {
        max_width / 2
    } else {
        max_width
    };
    Ok(AtlasLayout {
        used_width,
        width,
        height: maxy,
    })
}

#[instrument(skip_all)]
/// Crops animation frames, lays out `list` and composes the atlas canvas.
pub fn create_atlas(list: &mut ImageList, cfg: &ConvertConfig) -> Result<AtlasOutput> {
    shrink_animation_frames(list);
    let layout = layout(list, cfg.max_width, cfg.sort)?;
    debug!(
        images = list.images.len(),
        width = layout.width,
        height = layout.height,
        used_width = layout.used_width,
        "atlas layout"
    );

    let mut rgba = RgbaImage::new(layout.width, layout.height);
    for image in &list.images {
        blit_rgba(&image.pixels, &mut rgba, image.x, image.y, cfg.outlines);
    }
    Ok(AtlasOutput { rgba, layout })
}
