use crate::palette::{DEFAULT_PALETTE, PALETTE_COUNT};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Metadata output formats.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MetadataFormat {
    /// Structured JSON (`export::to_json`).
    Json,
    /// Line-oriented `.data` tables (`export::to_data_text`).
    Data,
}

impl FromStr for MetadataFormat {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "data" => Ok(Self::Data),
            _ => Err(()),
        }
    }
}

impl MetadataFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Data => "data",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConvertConfig {
    /// Palette used for animation containers (0..10).
    #[serde(default = "default_palette")]
    pub palette: u8,
    /// Compose tile parts into one canvas per tile object.
    #[serde(default)]
    pub assemble: bool,
    /// Pack all images into one atlas.
    #[serde(default)]
    pub pack: bool,
    /// Order atlas entries by ascending height (ignored for animations).
    #[serde(default)]
    pub sort: bool,
    /// Atlas width limit in pixels.
    #[serde(default = "default_max_width")]
    pub max_width: u32,
    /// Pixel arena capacity in bytes, used when packing.
    #[serde(default = "default_arena_bytes")]
    pub arena_bytes: usize,
    /// Draw red outlines around packed images (debug).
    #[serde(default)]
    pub outlines: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            palette: default_palette(),
            assemble: false,
            pack: false,
            sort: false,
            max_width: default_max_width(),
            arena_bytes: default_arena_bytes(),
            outlines: false,
        }
    }
}

impl ConvertConfig {
    /// Validates the configuration parameters.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::Gm1Error;

        if self.palette as usize >= PALETTE_COUNT {
            return Err(Gm1Error::InvalidConfig(format!(
                "palette has to be between 0 and {}, got {}",
                PALETTE_COUNT - 1,
                self.palette
            )));
        }
        if self.max_width == 0 {
            return Err(Gm1Error::InvalidConfig("max_width must be > 0".into()));
        }
        if self.arena_bytes == 0 {
            return Err(Gm1Error::InvalidConfig("arena_bytes must be > 0".into()));
        }
        Ok(())
    }

    /// Create a fluent builder for `ConvertConfig`.
    pub fn builder() -> ConvertConfigBuilder {
        ConvertConfigBuilder::new()
    }
}

fn default_palette() -> u8 {
    DEFAULT_PALETTE as u8
}
fn default_max_width() -> u32 {
    1024
}
fn default_arena_bytes() -> usize {
    100 * 1024 * 1024
}

/// Builder for `ConvertConfig`.
#[derive(Debug, Default, Clone)]
pub struct ConvertConfigBuilder {
    cfg: ConvertConfig,
}

impl ConvertConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: ConvertConfig::default(),
        }
    }
    pub fn palette(mut self, v: u8) -> Self {
        self.cfg.palette = v;
        self
    }
    pub fn assemble(mut self, v: bool) -> Self {
        self.cfg.assemble = v;
        self
    }
    pub fn pack(mut self, v: bool) -> Self {
        self.cfg.pack = v;
        self
    }
    pub fn sort(mut self, v: bool) -> Self {
        self.cfg.sort = v;
        self
    }
    pub fn max_width(mut self, v: u32) -> Self {
        self.cfg.max_width = v;
        self
    }
    pub fn arena_bytes(mut self, v: usize) -> Self {
        self.cfg.arena_bytes = v;
        self
    }
    pub fn outlines(mut self, v: bool) -> Self {
        self.cfg.outlines = v;
        self
    }
    pub fn build(self) -> ConvertConfig {
        self.cfg
    }
}
