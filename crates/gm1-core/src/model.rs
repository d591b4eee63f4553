use crate::arena::PixelSlot;
use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Exclusive right edge (`x + w`).
    pub fn right(&self) -> u32 {
        self.x + self.w
    }
    /// Exclusive bottom edge (`y + h`).
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }
    /// Returns true if the rectangle lies inside a `width x height` canvas.
    pub fn fits_in(&self, width: u32, height: u32) -> bool {
        self.right() <= width && self.bottom() <= height
    }
}

/// Signed point; animation centers may move past the image origin after cropping.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// One decoded picture plus its placement inside an atlas (`(0,0)` until packed).
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub pixels: RgbaImage,
    pub x: u32,
    pub y: u32,
    /// Where this image was charged against the pixel budget, when decoded for atlas output.
    pub slot: Option<PixelSlot>,
}

impl DecodedImage {
    /// Fully transparent image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
            x: 0,
            y: 0,
            slot: None,
        }
    }

    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self {
            pixels,
            x: 0,
            y: 0,
            slot: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Placed rectangle within the atlas.
    pub fn frame(&self) -> Rect {
        Rect::new(self.x, self.y, self.width(), self.height())
    }
}

/// One diamond ground piece of a tile object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TilePart {
    /// Index of the descriptor this part was decoded from.
    pub id: usize,
    /// Cell in the concentric diamond grid.
    pub xtile: u32,
    pub ytile: u32,
    /// Placement in the backing canvas; atlas coordinates once packed.
    pub rect: Rect,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TileObject {
    pub id: usize,
    pub parts: Vec<TilePart>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnimationFrame {
    pub id: usize,
    pub center: Point,
}

/// What the images of an [`ImageList`] represent.
#[derive(Debug, Clone)]
pub enum ListData {
    /// Independent images.
    Plain,
    /// Tile objects. With `assembled`, image `i` is the composite canvas of
    /// object `i`; otherwise there is one image per part, in part order.
    Tiles {
        objects: Vec<TileObject>,
        assembled: bool,
    },
    /// Animation frames, one per image, in sequence order.
    Animation { frames: Vec<AnimationFrame> },
}

/// Result of decoding a whole container.
#[derive(Debug, Clone)]
pub struct ImageList {
    pub images: Vec<DecodedImage>,
    pub data: ListData,
}

impl ImageList {
    pub fn is_animation(&self) -> bool {
        matches!(self.data, ListData::Animation { .. })
    }

    pub fn is_tiles(&self) -> bool {
        matches!(self.data, ListData::Tiles { .. })
    }

    /// Short tag used by the metadata formats: `tile`, `anim` or `other`.
    pub fn type_tag(&self) -> &'static str {
        match self.data {
            ListData::Plain => "other",
            ListData::Tiles { .. } => "tile",
            ListData::Animation { .. } => "anim",
        }
    }

    /// Total number of tile parts across all objects (0 for non-tile lists).
    pub fn part_count(&self) -> usize {
        match &self.data {
            ListData::Tiles { objects, .. } => objects.iter().map(|o| o.parts.len()).sum(),
            _ => 0,
        }
    }
}
