//! TGX token-stream codec.
//!
//! Every token starts with one control byte: the top three bits are the
//! token kind, the low five bits are `length - 1`. Pixel tokens carry their
//! colors inline, either as raw little-endian 16-bit values or, in indexed
//! mode, as one palette index byte each.

use crate::color::{TRANSPARENT, expand_color, read_color};
use crate::error::{Gm1Error, Result};
use crate::model::{DecodedImage, Rect};
use image::{Rgba, RgbaImage};
use nom::{Parser, number::complete::le_u32};

const KIND_MASK: u8 = 0xE0;
const LENGTH_MASK: u8 = 0x1F;

/// Token kinds understood by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    PixelStream(usize),
    TransparentRun(usize),
    RepeatingPixel(usize),
    NewLine,
}

impl Token {
    /// Splits a control byte. `None` for kinds the format does not define.
    pub fn from_control(byte: u8) -> Option<Self> {
        let len = (byte & LENGTH_MASK) as usize + 1;
        match byte & KIND_MASK {
            0x00 => Some(Self::PixelStream(len)),
            0x20 => Some(Self::TransparentRun(len)),
            0x40 => Some(Self::RepeatingPixel(len)),
            0x80 => Some(Self::NewLine),
            _ => None,
        }
    }
}

/// Write cursor confined to one destination rectangle.
struct Cursor<'a> {
    canvas: &'a mut RgbaImage,
    left: u32,
    right: u32,
    bottom: u32,
    x: u32,
    y: u32,
}

impl Cursor<'_> {
    fn put(&mut self, px: Rgba<u8>) -> Result<()> {
        if self.x >= self.right || self.y >= self.bottom {
            return Err(Gm1Error::Range(format!(
                "pixel ({}, {}) outside rectangle ending at ({}, {})",
                self.x, self.y, self.right, self.bottom
            )));
        }
        self.canvas.put_pixel(self.x, self.y, px);
        self.x += 1;
        Ok(())
    }

    /// Clears the rest of the row. Returns false when already on the last row.
    fn new_line(&mut self) -> bool {
        if self.y < self.bottom {
            for x in self.x..self.right {
                self.canvas.put_pixel(x, self.y, TRANSPARENT);
            }
        }
        if self.y + 1 < self.bottom {
            self.y += 1;
            self.x = self.left;
            true
        } else {
            false
        }
    }
}

struct Stream<'a> {
    data: &'a [u8],
    pos: usize,
    palette: Option<&'a [u16]>,
}

impl Stream<'_> {
    fn color(&mut self) -> Result<Rgba<u8>> {
        let at = self.pos;
        let raw = match self.palette {
            Some(palette) => {
                let idx = *self.data.get(at).ok_or_else(|| truncated(at))?;
                self.pos += 1;
                *palette.get(idx as usize).ok_or_else(|| {
                    Gm1Error::Range(format!("palette index {idx} of {}", palette.len()))
                })?
            }
            None => {
                let v = self.data.get(at..).and_then(read_color).ok_or_else(|| truncated(at))?;
                self.pos += 2;
                v
            }
        };
        Ok(expand_color(raw))
    }
}

fn truncated(offset: usize) -> Gm1Error {
    Gm1Error::Decode {
        offset,
        reason: "stream ends inside a pixel token".into(),
    }
}

/// Decodes `data` into `rect` of `canvas`.
///
/// With a palette, pixel colors are one-byte indices into it; otherwise
/// they are raw 16-bit colors. Decoding stops successfully at the end of the
/// stream or at a new-line token on the rectangle's last row, whatever
/// bytes follow it.
pub fn decode_into(
    canvas: &mut RgbaImage,
    rect: Rect,
    data: &[u8],
    palette: Option<&[u16]>,
) -> Result<()> {
    if !rect.fits_in(canvas.width(), canvas.height()) {
        return Err(Gm1Error::Range(format!(
            "rectangle {rect:?} outside {}x{} canvas",
            canvas.width(),
            canvas.height()
        )));
    }
    let mut cur = Cursor {
        canvas,
        left: rect.x,
        right: rect.right(),
        bottom: rect.bottom(),
        x: rect.x,
        y: rect.y,
    };
    let mut stream = Stream {
        data,
        pos: 0,
        palette,
    };

    while let Some(&control) = stream.data.get(stream.pos) {
        let at = stream.pos;
        stream.pos += 1;
        let token = Token::from_control(control).ok_or_else(|| Gm1Error::Decode {
            offset: at,
            reason: format!("unknown token kind 0x{:02x}", control & KIND_MASK),
        })?;
        match token {
            Token::NewLine => {
                if !cur.new_line() {
                    return Ok(());
                }
            }
            Token::PixelStream(n) => {
                for _ in 0..n {
                    let px = stream.color()?;
                    cur.put(px)?;
                }
            }
            Token::RepeatingPixel(n) => {
                let px = stream.color()?;
                for _ in 0..n {
                    cur.put(px)?;
                }
            }
            Token::TransparentRun(n) => {
                for _ in 0..n {
                    cur.put(TRANSPARENT)?;
                }
            }
        }
    }
    Ok(())
}

/// Decodes a stream covering a whole `width x height` image.
pub fn decode_image(
    width: u32,
    height: u32,
    data: &[u8],
    palette: Option<&[u16]>,
) -> Result<DecodedImage> {
    let mut image = DecodedImage::new(width, height);
    decode_into(
        &mut image.pixels,
        Rect::new(0, 0, width, height),
        data,
        palette,
    )?;
    Ok(image)
}

/// A standalone TGX file: `u32 width`, `u32 height`, then one direct-color stream.
#[derive(Debug, Clone)]
pub struct Tgx {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Tgx {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let (rest, (width, height)) = (le_u32, le_u32)
            .parse(bytes)
            .map_err(|_: nom::Err<nom::error::Error<&[u8]>>| {
                Gm1Error::Format(format!(
                    "tgx header needs 8 bytes, file has {}",
                    bytes.len()
                ))
            })?;
        Ok(Self {
            width,
            height,
            data: rest.to_vec(),
        })
    }

    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::parse(&bytes)
    }

    pub fn decode(&self) -> Result<DecodedImage> {
        decode_image(self.width, self.height, &self.data, None)
    }
}
