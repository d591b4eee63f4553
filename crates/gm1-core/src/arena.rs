use crate::error::{Gm1Error, Result};
use serde::{Deserialize, Serialize};

const BYTES_PER_PIXEL: usize = 4;

/// Byte range charged against a [`PixelArena`] budget for one image.
///
/// The arena hands out no memory: pixels stay in the image's own
/// `RgbaImage`. Slots only record where in the budget each image was counted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PixelSlot {
    pub offset: usize,
    pub len: usize,
}

/// Fixed byte budget for the RGBA buffers of one conversion run, charged in
/// bump order.
///
/// Reservations are never returned. Running out is fatal for the run that
/// owns the arena; callers must not retry with a partial image list.
#[derive(Debug, Clone)]
pub struct PixelArena {
    capacity: usize,
    next: usize,
}

impl PixelArena {
    pub fn new(capacity: usize) -> Self {
        Self { capacity, next: 0 }
    }

    /// Reserves room for a `width x height` RGBA buffer.
    pub fn alloc(&mut self, width: u32, height: u32) -> Result<PixelSlot> {
        let available = self.remaining();
        let requested = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
            .ok_or(Gm1Error::Allocation {
                requested: usize::MAX,
                available,
            })?;
        if requested > available {
            return Err(Gm1Error::Allocation {
                requested,
                available,
            });
        }
        let slot = PixelSlot {
            offset: self.next,
            len: requested,
        };
        self.next += requested;
        Ok(slot)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn used(&self) -> usize {
        self.next
    }

    pub fn remaining(&self) -> usize {
        self.capacity - self.next
    }
}
