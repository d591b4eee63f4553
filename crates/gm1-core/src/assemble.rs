use crate::arena::PixelArena;
use crate::color::{expand_color, read_color};
use crate::config::ConvertConfig;
use crate::container::{Container, DataType};
use crate::error::{Gm1Error, Result};
use crate::model::{AnimationFrame, DecodedImage, ImageList, ListData, Point};
use crate::{tgx, tile_object};
use tracing::debug;

/// Unpacks a raw bitmap: densely packed 16-bit colors, row-major, all opaque.
///
/// `data` may describe fewer pixels than `width * height`; the rest stay
/// transparent. More pixels than fit is an error.
pub fn decode_bitmap(width: u32, height: u32, data: &[u8]) -> Result<DecodedImage> {
    let pixels = data.len() / 2;
    let capacity = width as usize * height as usize;
    if pixels > capacity {
        return Err(Gm1Error::Range(format!(
            "bitmap carries {pixels} pixels for a {width}x{height} image"
        )));
    }
    let mut image = DecodedImage::new(width, height);
    for (i, c) in data.chunks_exact(2).filter_map(read_color).enumerate() {
        let (x, y) = (i as u32 % width, i as u32 / width);
        image.pixels.put_pixel(x, y, expand_color(c));
    }
    Ok(image)
}

fn decode_each<F>(
    container: &Container,
    arena: &mut Option<&mut PixelArena>,
    decode: F,
) -> Result<Vec<DecodedImage>>
where
    F: Fn(u32, u32, &[u8]) -> Result<DecodedImage>,
{
    let mut images = Vec::with_capacity(container.image_count());
    for (i, d) in container.descriptors.iter().enumerate() {
        let (w, h) = (d.width as u32, d.height as u32);
        let slot = match arena.as_deref_mut() {
            Some(a) => Some(a.alloc(w, h)?),
            None => None,
        };
        let mut image = decode(w, h, container.image_data(i)?)?;
        image.slot = slot;
        images.push(image);
    }
    Ok(images)
}

/// Decodes every image of `container` according to its data type.
///
/// Any failing image fails the whole list. Tile containers are grouped into
/// tile objects and, when `cfg.assemble` is set, composed one canvas per
/// object.
pub fn create_image_list(
    container: &Container,
    cfg: &ConvertConfig,
    mut arena: Option<&mut PixelArena>,
) -> Result<ImageList> {
    let data_type = container.data_type()?;
    debug!(?data_type, images = container.image_count(), "decoding images");

    match data_type {
        DataType::Tgx | DataType::TgxFont | DataType::TgxConstSize => {
            let images = decode_each(container, &mut arena, |w, h, data| {
                tgx::decode_image(w, h, data, None)
            })?;
            Ok(ImageList {
                images,
                data: ListData::Plain,
            })
        }
        DataType::Animation => {
            let palette = container.palette(cfg.palette as usize)?;
            let images = decode_each(container, &mut arena, |w, h, data| {
                tgx::decode_image(w, h, data, Some(palette))
            })?;
            let center = Point {
                x: container.header.center_x as i32,
                y: container.header.center_y as i32,
            };
            let frames = (0..images.len())
                .map(|id| AnimationFrame { id, center })
                .collect();
            Ok(ImageList {
                images,
                data: ListData::Animation { frames },
            })
        }
        DataType::TgxAndTile => {
            if cfg.assemble {
                tile_object::assemble_objects(container, arena)
            } else {
                tile_object::decode_parts(container, arena)
            }
        }
        DataType::Bitmap | DataType::BitmapOther => {
            let images = decode_each(container, &mut arena, decode_bitmap)?;
            Ok(ImageList {
                images,
                data: ListData::Plain,
            })
        }
    }
}
