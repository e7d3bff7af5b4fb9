//! Sub-frame store
//!
//! Four 1-bit-per-pixel planes, one per refresh slot of the dither cycle.
//! These are the only bytes the scanout hardware ever reads. Pixels are
//! packed most significant bit first, rows padded to a whole byte.
//!
//! Each plane is split into two contiguous halves: the upper lane streams
//! the first `height / 2` rows and the lower lane the rest. Planes are
//! word aligned so each half can be fed to a 32-bit transfer channel.

use crate::config::{plane_len, plane_stride, PIXELS_PER_PLANE_BYTE};
use crate::traits::LaneHalves;

/// Refresh slots per dither cycle
pub const SLOTS: usize = 4;

/// One 1-bit sub-frame
#[derive(Clone)]
#[repr(C, align(4))]
pub struct SubFramePlane<const LEN: usize> {
    data: [u8; LEN],
}

impl<const LEN: usize> SubFramePlane<LEN> {
    /// Create a dark plane
    pub const fn new() -> Self {
        Self { data: [0; LEN] }
    }

    /// Raw plane bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw plane bytes
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Bytes streamed by the (upper, lower) lanes
    pub fn halves(&self) -> (&[u8], &[u8]) {
        self.data.split_at(LEN / 2)
    }

    /// Base addresses of the two halves for the transfer channels
    pub fn lane_halves(&self) -> LaneHalves {
        let (upper, lower) = self.halves();
        LaneHalves {
            upper: upper.as_ptr() as usize,
            lower: lower.as_ptr() as usize,
        }
    }
}

impl<const LEN: usize> Default for SubFramePlane<LEN> {
    fn default() -> Self {
        Self::new()
    }
}

/// The four planes of one dither cycle
#[derive(Clone)]
pub struct SubFrameCycle<const LEN: usize> {
    width: u16,
    height: u16,
    stride: usize,
    planes: [SubFramePlane<LEN>; SLOTS],
}

impl<const LEN: usize> SubFrameCycle<LEN> {
    /// Create an all-dark cycle
    ///
    /// `LEN` must equal [`plane_len`] for the dimensions. Word-aligned lane
    /// halves additionally need a validated [`PanelConfig`].
    ///
    /// [`PanelConfig`]: crate::config::PanelConfig
    pub const fn new(width: u16, height: u16) -> Self {
        assert!(
            LEN == plane_len(width as usize, height as usize),
            "plane storage does not match dimensions"
        );
        Self {
            width,
            height,
            stride: plane_stride(width as usize),
            planes: [
                SubFramePlane::new(),
                SubFramePlane::new(),
                SubFramePlane::new(),
                SubFramePlane::new(),
            ],
        }
    }

    /// Plane width in pixels
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Plane height in pixels
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Bytes per plane row
    pub const fn stride(&self) -> usize {
        self.stride
    }

    /// Plane for a refresh slot
    ///
    /// # Panics
    /// If `slot >= SLOTS`.
    pub fn plane(&self, slot: usize) -> &SubFramePlane<LEN> {
        &self.planes[slot]
    }

    /// All four planes, mutably
    pub fn planes_mut(&mut self) -> &mut [SubFramePlane<LEN>; SLOTS] {
        &mut self.planes
    }

    /// Whether a pixel is lit in a slot; false outside the plane
    pub fn is_lit(&self, slot: usize, x: i32, y: i32) -> bool {
        if slot >= SLOTS
            || x < 0
            || y < 0
            || x >= self.width as i32
            || y >= self.height as i32
        {
            return false;
        }
        let (x, y) = (x as usize, y as usize);
        let byte = self.planes[slot].data[y * self.stride + x / PIXELS_PER_PLANE_BYTE];
        byte & (0x80 >> (x % PIXELS_PER_PLANE_BYTE)) != 0
    }

    /// Number of slots in which a pixel is lit
    pub fn lit_count(&self, x: i32, y: i32) -> usize {
        (0..SLOTS).filter(|&slot| self.is_lit(slot, x, y)).count()
    }

    /// Lane addresses for every slot, indexed by slot
    ///
    /// Taken once at startup; the store never moves afterwards.
    pub fn lane_addresses(&self) -> [LaneHalves; SLOTS] {
        core::array::from_fn(|slot| self.planes[slot].lane_halves())
    }
}
