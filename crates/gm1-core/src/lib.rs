//! Core library for decoding GM1 sprite containers.
//!
//! - Container: header, 10 x 256 color palette table, offset/size/descriptor tables, image blob
//! - Codecs: TGX token streams (direct and palette-indexed), 30x16 ground diamonds, raw bitmaps
//! - Tile objects: multi-part ground tiles composed on a diamond grid
//! - Atlas: shelf packing of the decoded images into one RGBA canvas
//!
//! Quick example:
//! ```ignore
//! use gm1_core::{ConvertConfig, convert_gm1, to_json};
//! # fn main() -> anyhow::Result<()> {
//! let bytes = std::fs::read("tile_castle.gm1")?;
//! let cfg = ConvertConfig::builder().assemble(true).pack(true).build();
//! let out = convert_gm1(&bytes, &cfg)?;
//! if let Some(atlas) = &out.atlas {
//!     atlas.rgba.save("tile_castle.png")?;
//! }
//! println!("{}", to_json(&out.list));
//! # Ok(()) }
//! ```

pub mod arena;
pub mod assemble;
pub mod atlas;
pub mod color;
pub mod compositing;
pub mod config;
pub mod container;
pub mod error;
pub mod export;
pub mod model;
pub mod palette;
pub mod pipeline;
pub mod tgx;
pub mod tile;
pub mod tile_object;

pub use arena::*;
pub use assemble::*;
pub use atlas::*;
pub use config::*;
pub use container::*;
pub use error::*;
pub use export::*;
pub use model::*;
pub use pipeline::*;

/// Convenience prelude for common types and functions.
/// Importing `gm1_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::arena::{PixelArena, PixelSlot};
    pub use crate::atlas::{AtlasLayout, AtlasOutput, create_atlas};
    pub use crate::config::{ConvertConfig, ConvertConfigBuilder, MetadataFormat};
    pub use crate::container::{Container, DataType, Gm1Header, ImageDescriptor, SizeType};
    pub use crate::error::{Gm1Error, Result};
    pub use crate::model::{
        AnimationFrame, DecodedImage, ImageList, ListData, Point, Rect, TileObject, TilePart,
    };
    pub use crate::tgx::Tgx;
    pub use crate::{ConvertOutput, convert_gm1, create_image_list, to_data_text, to_json};
}
