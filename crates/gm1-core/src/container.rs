//! GM1 container structure: header, palette table, offset/size tables,
//! per-image descriptors and the raw image blob.
//!
//! Layout (little-endian):
//! - 22 x u32 header fields (88 bytes)
//! - 2560 x u16 palette table (10 palettes of 256 colors)
//! - `image_count` x u32 offsets into the blob
//! - `image_count` x u32 sizes
//! - `image_count` x 16-byte [`ImageDescriptor`]
//! - everything left over is the blob

use crate::error::{Gm1Error, Result};
use crate::palette::{self, PALETTE_COUNT, PALETTE_SIZE};
use nom::{
    IResult, Parser,
    combinator::map,
    multi::count,
    number::complete::{le_u8, le_u16, le_u32},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

pub const HEADER_FIELDS: usize = 22;
pub const HEADER_BYTES: usize = HEADER_FIELDS * 4;
pub const DESCRIPTOR_BYTES: usize = 16;

/// Width and height of one isometric ground diamond.
pub const TILE_WIDTH: u32 = 30;
pub const TILE_HEIGHT: u32 = 16;

/// The fixed file header. Fields without known meaning are kept verbatim so
/// they can be written back out unchanged.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Gm1Header {
    pub unknown1: u32,
    pub unknown2: u32,
    pub unknown3: u32,
    pub image_count: u32,
    pub unknown4: u32,
    pub data_type: u32,
    pub unknown5: u32,
    pub unknown6: u32,
    pub size_type: u32,
    pub unknown7: u32,
    pub unknown8: u32,
    pub unknown9: u32,
    pub width: u32,
    pub height: u32,
    pub unknown10: u32,
    pub unknown11: u32,
    pub unknown12: u32,
    pub unknown13: u32,
    pub center_x: u32,
    pub center_y: u32,
    /// Bytes of image data following the tables.
    pub data_size: u32,
    pub unknown14: u32,
}

impl Gm1Header {
    pub fn from_fields(f: [u32; HEADER_FIELDS]) -> Self {
        Self {
            unknown1: f[0],
            unknown2: f[1],
            unknown3: f[2],
            image_count: f[3],
            unknown4: f[4],
            data_type: f[5],
            unknown5: f[6],
            unknown6: f[7],
            size_type: f[8],
            unknown7: f[9],
            unknown8: f[10],
            unknown9: f[11],
            width: f[12],
            height: f[13],
            unknown10: f[14],
            unknown11: f[15],
            unknown12: f[16],
            unknown13: f[17],
            center_x: f[18],
            center_y: f[19],
            data_size: f[20],
            unknown14: f[21],
        }
    }

    /// Fields in file order.
    pub fn to_fields(&self) -> [u32; HEADER_FIELDS] {
        [
            self.unknown1,
            self.unknown2,
            self.unknown3,
            self.image_count,
            self.unknown4,
            self.data_type,
            self.unknown5,
            self.unknown6,
            self.size_type,
            self.unknown7,
            self.unknown8,
            self.unknown9,
            self.width,
            self.height,
            self.unknown10,
            self.unknown11,
            self.unknown12,
            self.unknown13,
            self.center_x,
            self.center_y,
            self.data_size,
            self.unknown14,
        ]
    }

    /// The 88 header bytes exactly as they appear in the file.
    pub fn to_le_bytes(&self) -> [u8; HEADER_BYTES] {
        let mut out = [0u8; HEADER_BYTES];
        for (chunk, v) in out.chunks_exact_mut(4).zip(self.to_fields()) {
            chunk.copy_from_slice(&v.to_le_bytes());
        }
        out
    }
}

/// How the images of a container are encoded.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Tgx,
    Animation,
    TgxAndTile,
    TgxFont,
    Bitmap,
    TgxConstSize,
    BitmapOther,
}

impl TryFrom<u32> for DataType {
    type Error = Gm1Error;
    fn try_from(v: u32) -> Result<Self> {
        match v {
            1 => Ok(Self::Tgx),
            2 => Ok(Self::Animation),
            3 => Ok(Self::TgxAndTile),
            4 => Ok(Self::TgxFont),
            5 => Ok(Self::Bitmap),
            6 => Ok(Self::TgxConstSize),
            7 => Ok(Self::BitmapOther),
            value => Err(Gm1Error::UnsupportedFormat {
                field: "data type",
                value,
            }),
        }
    }
}

/// Nominal image size class. Informational only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SizeType {
    Undefined,
    S30x30,
    S55x55,
    S75x75,
    Unknown4,
    S100x100,
    S110x110,
    S130x130,
    Unknown8,
    S185x185,
    S250x250,
    S180x180,
}

impl SizeType {
    pub fn dimensions(self) -> Option<(u32, u32)> {
        match self {
            Self::S30x30 => Some((30, 30)),
            Self::S55x55 => Some((55, 55)),
            Self::S75x75 => Some((75, 75)),
            Self::S100x100 => Some((100, 100)),
            Self::S110x110 => Some((110, 110)),
            Self::S130x130 => Some((130, 130)),
            Self::S185x185 => Some((185, 185)),
            Self::S250x250 => Some((250, 250)),
            Self::S180x180 => Some((180, 180)),
            Self::Undefined | Self::Unknown4 | Self::Unknown8 => None,
        }
    }
}

impl TryFrom<u32> for SizeType {
    type Error = Gm1Error;
    fn try_from(v: u32) -> Result<Self> {
        match v {
            0 => Ok(Self::Undefined),
            1 => Ok(Self::S30x30),
            2 => Ok(Self::S55x55),
            3 => Ok(Self::S75x75),
            4 => Ok(Self::Unknown4),
            5 => Ok(Self::S100x100),
            6 => Ok(Self::S110x110),
            7 => Ok(Self::S130x130),
            8 => Ok(Self::Unknown8),
            9 => Ok(Self::S185x185),
            10 => Ok(Self::S250x250),
            11 => Ok(Self::S180x180),
            value => Err(Gm1Error::UnsupportedFormat {
                field: "size type",
                value,
            }),
        }
    }
}

/// Per-image 16-byte record.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageDescriptor {
    pub width: u16,
    pub height: u16,
    pub position_x: u16,
    pub position_y: u16,
    /// Index of this part within its tile object.
    pub part: u8,
    /// Number of parts in the tile object; the last part has `part == parts - 1`.
    pub parts: u8,
    pub tile_position_y: u16,
    pub tile_placement_alignment: u8,
    pub horizontal_offset: u8,
    pub drawing_box_width: u8,
    pub performance_id: u8,
}

impl ImageDescriptor {
    pub fn is_last_part(&self) -> bool {
        self.part as u16 + 1 == self.parts as u16
    }
}

/// A parsed container. Immutable once built.
#[derive(Debug, Clone)]
pub struct Container {
    pub header: Gm1Header,
    /// `PALETTE_COUNT * PALETTE_SIZE` colors.
    pub palette: Vec<u16>,
    pub offsets: Vec<u32>,
    pub sizes: Vec<u32>,
    pub descriptors: Vec<ImageDescriptor>,
    pub data: Vec<u8>,
}

type PResult<'a, T> = IResult<&'a [u8], T>;

fn parse_header(i: &[u8]) -> PResult<'_, Gm1Header> {
    map(count(le_u32, HEADER_FIELDS), |v: Vec<u32>| {
        let mut fields = [0u32; HEADER_FIELDS];
        fields.copy_from_slice(&v);
        Gm1Header::from_fields(fields)
    })
    .parse(i)
}

fn parse_descriptor(i: &[u8]) -> PResult<'_, ImageDescriptor> {
    map(
        (
            le_u16, le_u16, le_u16, le_u16, le_u8, le_u8, le_u16, le_u8, le_u8, le_u8, le_u8,
        ),
        |(
            width,
            height,
            position_x,
            position_y,
            part,
            parts,
            tile_position_y,
            tile_placement_alignment,
            horizontal_offset,
            drawing_box_width,
            performance_id,
        )| ImageDescriptor {
            width,
            height,
            position_x,
            position_y,
            part,
            parts,
            tile_position_y,
            tile_placement_alignment,
            horizontal_offset,
            drawing_box_width,
            performance_id,
        },
    )
    .parse(i)
}

fn short_read(what: &'static str) -> impl Fn(nom::Err<nom::error::Error<&[u8]>>) -> Gm1Error {
    move |e| {
        let remaining = match e {
            nom::Err::Error(e) | nom::Err::Failure(e) => e.input.len(),
            nom::Err::Incomplete(_) => 0,
        };
        Gm1Error::Format(format!("short read in {what} ({remaining} bytes left)"))
    }
}

/// Requires `n` records of `record` bytes to be present before allocating for them.
fn ensure_table(i: &[u8], what: &'static str, n: usize, record: usize) -> Result<()> {
    let needed = n.saturating_mul(record);
    if i.len() < needed {
        return Err(Gm1Error::Format(format!(
            "short read in {what}: need {needed} bytes, {} left",
            i.len()
        )));
    }
    Ok(())
}

impl Container {
    /// Parses a whole container from memory.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let (i, header) = parse_header(bytes).map_err(short_read("header"))?;

        let palette_len = PALETTE_COUNT * PALETTE_SIZE;
        ensure_table(i, "palette table", palette_len, 2)?;
        let (i, palette) = count(le_u16, palette_len)
            .parse(i)
            .map_err(short_read("palette table"))?;

        let n = header.image_count as usize;
        ensure_table(i, "offset table", n, 4)?;
        let (i, offsets) = count(le_u32, n).parse(i).map_err(short_read("offset table"))?;
        ensure_table(i, "size table", n, 4)?;
        let (i, sizes) = count(le_u32, n).parse(i).map_err(short_read("size table"))?;
        ensure_table(i, "descriptor table", n, DESCRIPTOR_BYTES)?;
        let (i, descriptors) = count(parse_descriptor, n)
            .parse(i)
            .map_err(short_read("descriptor table"))?;

        if i.len() < header.data_size as usize {
            return Err(Gm1Error::Format(format!(
                "image data is {} bytes, header declares {}",
                i.len(),
                header.data_size
            )));
        }

        debug!(
            images = n,
            data_type = header.data_type,
            size_type = header.size_type,
            data_bytes = i.len(),
            "parsed gm1 container"
        );

        Ok(Self {
            header,
            palette,
            offsets,
            sizes,
            descriptors,
            data: i.to_vec(),
        })
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::parse(&bytes)
    }

    pub fn image_count(&self) -> usize {
        self.descriptors.len()
    }

    pub fn data_type(&self) -> Result<DataType> {
        DataType::try_from(self.header.data_type)
    }

    pub fn size_type(&self) -> Result<SizeType> {
        SizeType::try_from(self.header.size_type)
    }

    /// Encoded bytes of image `index`, bounds-checked against the blob.
    pub fn image_data(&self, index: usize) -> Result<&[u8]> {
        let (Some(&offset), Some(&size)) = (self.offsets.get(index), self.sizes.get(index)) else {
            return Err(Gm1Error::Range(format!(
                "image {index} of {}",
                self.image_count()
            )));
        };
        let start = offset as usize;
        let end = start.checked_add(size as usize);
        match end {
            Some(end) if end <= self.data.len() => Ok(&self.data[start..end]),
            _ => Err(Gm1Error::Range(format!(
                "image {index} spans {start}+{size}, blob is {} bytes",
                self.data.len()
            ))),
        }
    }

    /// One 256-color palette out of the table.
    pub fn palette(&self, index: usize) -> Result<&[u16]> {
        palette::resolve(&self.palette, index)
    }
}
