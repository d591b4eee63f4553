use thiserror::Error;

#[derive(Debug, Error)]
pub enum Gm1Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    /// A fixed-size structural read came up short.
    #[error("Malformed container: {0}")]
    Format(String),
    #[error("Tile block needs at least {needed} bytes, got {actual}")]
    Size { needed: usize, actual: usize },
    /// A write or lookup would leave its destination (rectangle, canvas, palette table, blob).
    #[error("Out of range: {0}")]
    Range(String),
    #[error("Corrupt token stream at byte {offset}: {reason}")]
    Decode { offset: usize, reason: String },
    #[error("Unsupported {field} {value}")]
    UnsupportedFormat { field: &'static str, value: u32 },
    #[error("Pixel arena exhausted: requested {requested} bytes, {available} available")]
    Allocation { requested: usize, available: usize },
    #[error("Image {index} is {width}px wide and cannot be placed in an atlas {max_width}px wide")]
    Layout {
        index: usize,
        width: u32,
        max_width: u32,
    },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Gm1Error>;
