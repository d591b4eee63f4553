use crate::arena::PixelArena;
use crate::assemble::create_image_list;
use crate::atlas::{AtlasOutput, create_atlas};
use crate::config::ConvertConfig;
use crate::container::Container;
use crate::error::Result;
use crate::model::ImageList;
use tracing::{debug, instrument};

/// Output of one conversion run.
pub struct ConvertOutput {
    pub container: Container,
    /// Decoded images; placements are atlas coordinates when `atlas` is set.
    pub list: ImageList,
    pub atlas: Option<AtlasOutput>,
}

#[instrument(skip_all)]
/// Parses a GM1 container, decodes its images and, with `cfg.pack`, packs
/// them into one atlas.
///
/// Notes:
/// - Any error aborts the whole run; no partial image list is returned.
/// - Pixel buffers are reserved from a `cfg.arena_bytes` arena when packing.
pub fn convert_gm1(bytes: &[u8], cfg: &ConvertConfig) -> Result<ConvertOutput> {
    cfg.validate()?;

    let container = Container::parse(bytes)?;
    let mut arena = cfg.pack.then(|| PixelArena::new(cfg.arena_bytes));
    let mut list = create_image_list(&container, cfg, arena.as_mut())?;
    if let Some(a) = &arena {
        debug!(used = a.used(), capacity = a.capacity(), "pixel arena");
    }

    let atlas = if cfg.pack {
        Some(create_atlas(&mut list, cfg)?)
    } else {
        None
    };

    Ok(ConvertOutput {
        container,
        list,
        atlas,
    })
}
