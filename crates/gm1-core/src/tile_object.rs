//! Tile objects: runs of "tgx and tile" descriptors that together form one
//! isometric building footprint.
//!
//! The parts of an object are laid out on a diamond grid whose rows grow by
//! one cell up to `floor(sqrt(parts))` and then shrink again. The layout is
//! computed front row first and flipped vertically once the canvas height
//! is known.

use crate::arena::PixelArena;
use crate::container::{Container, ImageDescriptor, TILE_HEIGHT, TILE_WIDTH};
use crate::error::{Gm1Error, Result};
use crate::model::{DecodedImage, ImageList, ListData, Rect, TileObject, TilePart};
use crate::tgx;
use crate::tile::{self, TILE_BYTES};
use image::RgbaImage;
use std::ops::Range;
use tracing::{debug, trace};

/// Horizontal distance between neighbouring cells of one grid row.
const CELL_STRIDE: u32 = TILE_WIDTH + 2;

/// Splits descriptors into objects. An object ends at the first descriptor
/// with `part == parts - 1`; a trailing run without that marker becomes the
/// last object.
pub fn group_objects(descriptors: &[ImageDescriptor]) -> Vec<Range<usize>> {
    let mut objects = Vec::new();
    let mut start = 0;
    for (i, d) in descriptors.iter().enumerate() {
        if d.is_last_part() {
            objects.push(start..i + 1);
            start = i + 1;
        }
    }
    if start < descriptors.len() {
        objects.push(start..descriptors.len());
    }
    objects
}

/// Largest `m` with `m * m <= n`.
pub fn max_row_length(part_count: usize) -> u32 {
    let mut m = 0u32;
    while ((m + 1) as usize) * ((m + 1) as usize) <= part_count {
        m += 1;
    }
    m
}

/// One visited cell of the diamond grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub xtile: u32,
    pub ytile: u32,
    /// Number of cells in this cell's row.
    pub row_len: u32,
}

/// Walks the diamond grid for `part_count` parts, front row first.
///
/// Row lengths never drop below one, so part counts that are not perfect
/// squares continue with single-cell rows.
#[derive(Debug, Clone)]
pub struct DiamondGrid {
    remaining: usize,
    max_len: u32,
    xtile: u32,
    ytile: u32,
    row_len: u32,
}

impl DiamondGrid {
    pub fn new(part_count: usize) -> Self {
        Self {
            remaining: part_count,
            max_len: max_row_length(part_count),
            xtile: 0,
            ytile: 0,
            row_len: 1,
        }
    }
}

impl Iterator for DiamondGrid {
    type Item = GridCell;

    fn next(&mut self) -> Option<GridCell> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let cell = GridCell {
            xtile: self.xtile,
            ytile: self.ytile,
            row_len: self.row_len,
        };
        self.xtile += 1;
        if self.xtile >= self.row_len {
            self.xtile = 0;
            self.ytile += 1;
            if self.ytile < self.max_len {
                self.row_len += 1;
            } else {
                self.row_len = self.row_len.saturating_sub(1).max(1);
            }
        }
        Some(cell)
    }
}

/// Part placement of one object inside its composite canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLayout {
    pub width: u32,
    pub height: u32,
    pub parts: Vec<TilePart>,
}

/// Lays out the parts of one object. `first_id` is the descriptor index of
/// the object's first part.
pub fn layout_object(descriptors: &[ImageDescriptor], first_id: usize) -> ObjectLayout {
    let max_len = max_row_length(descriptors.len());
    let width = (max_len * CELL_STRIDE).saturating_sub(2);
    let mut height = 0u32;
    let mut parts = Vec::with_capacity(descriptors.len());

    for (i, (d, cell)) in descriptors
        .iter()
        .zip(DiamondGrid::new(descriptors.len()))
        .enumerate()
    {
        let x = (width / 2 + 1 + cell.xtile * CELL_STRIDE)
            .saturating_sub(cell.row_len * CELL_STRIDE / 2);
        let y = cell.ytile * TILE_HEIGHT / 2;
        let h = d.height as u32;
        height = height.max(y + h);
        parts.push(TilePart {
            id: first_id + i,
            xtile: cell.xtile,
            ytile: cell.ytile,
            rect: Rect::new(x, y, d.width as u32, h),
        });
    }

    // rows were stacked upwards from y = 0
    for p in &mut parts {
        p.rect.y = height - (p.rect.y + p.rect.h);
    }

    ObjectLayout {
        width,
        height,
        parts,
    }
}

/// Decodes one part into `rect` of `canvas`: the token stream after the
/// diamond block fills the rectangle, then the diamond is drawn
/// `tile_position_y` rows below the rectangle's top.
pub fn decode_part(
    canvas: &mut RgbaImage,
    rect: Rect,
    tile_position_y: u32,
    data: &[u8],
) -> Result<()> {
    if data.len() < TILE_BYTES {
        return Err(Gm1Error::Size {
            needed: TILE_BYTES,
            actual: data.len(),
        });
    }
    if data.len() > TILE_BYTES {
        tgx::decode_into(canvas, rect, &data[TILE_BYTES..], None)?;
    }
    tile::decode_tile(canvas, rect.x, rect.y + tile_position_y, data)
}

fn reserve(arena: &mut Option<&mut PixelArena>, width: u32, height: u32) -> Result<DecodedImage> {
    let slot = match arena.as_deref_mut() {
        Some(a) => Some(a.alloc(width, height)?),
        None => None,
    };
    let mut image = DecodedImage::new(width, height);
    image.slot = slot;
    Ok(image)
}

/// Decodes every object into its own composite canvas.
pub fn assemble_objects(
    container: &Container,
    mut arena: Option<&mut PixelArena>,
) -> Result<ImageList> {
    let groups = group_objects(&container.descriptors);
    let mut images = Vec::with_capacity(groups.len());
    let mut objects = Vec::with_capacity(groups.len());

    for (id, range) in groups.into_iter().enumerate() {
        let layout = layout_object(&container.descriptors[range.clone()], range.start);
        trace!(
            object = id,
            parts = layout.parts.len(),
            width = layout.width,
            height = layout.height,
            "tile object layout"
        );
        let mut image = reserve(&mut arena, layout.width, layout.height)?;
        for part in &layout.parts {
            let d = &container.descriptors[part.id];
            decode_part(
                &mut image.pixels,
                part.rect,
                d.tile_position_y as u32,
                container.image_data(part.id)?,
            )?;
        }
        images.push(image);
        objects.push(TileObject {
            id,
            parts: layout.parts,
        });
    }

    debug!(objects = objects.len(), "assembled tile objects");
    Ok(ImageList {
        images,
        data: ListData::Tiles {
            objects,
            assembled: true,
        },
    })
}

/// Decodes every part as a standalone image while still grouping parts
/// into objects and assigning grid cells.
pub fn decode_parts(container: &Container, mut arena: Option<&mut PixelArena>) -> Result<ImageList> {
    let groups = group_objects(&container.descriptors);
    let mut images = Vec::with_capacity(container.image_count());
    let mut objects = Vec::with_capacity(groups.len());

    for (id, range) in groups.into_iter().enumerate() {
        let descriptors = &container.descriptors[range.clone()];
        let mut parts = Vec::with_capacity(descriptors.len());
        for ((i, d), cell) in range
            .clone()
            .zip(descriptors)
            .zip(DiamondGrid::new(descriptors.len()))
        {
            let (w, h) = (d.width as u32, d.height as u32);
            let rect = Rect::new(0, 0, w, h);
            let mut image = reserve(&mut arena, w, h)?;
            decode_part(
                &mut image.pixels,
                rect,
                d.tile_position_y as u32,
                container.image_data(i)?,
            )?;
            images.push(image);
            parts.push(TilePart {
                id: i,
                xtile: cell.xtile,
                ytile: cell.ytile,
                rect,
            });
        }
        objects.push(TileObject { id, parts });
    }

    debug!(
        objects = objects.len(),
        parts = images.len(),
        "decoded tile parts"
    );
    Ok(ImageList {
        images,
        data: ListData::Tiles {
            objects,
            assembled: false,
        },
    })
}
