//! Serializer lane trait
//!
//! The panel is fed by two serializer lanes, each streaming one contiguous
//! half of a sub-frame plane. A lane is a line-transfer channel (DMA) feeding
//! a pixel-clock-synchronous shifter (PIO state machine on the RP2040).
//!
//! The scanout engine drives the lanes through the steps below on every
//! refresh-complete interrupt, in this order:
//!
//! 1. [`ScanoutLanes::rewind`] - point both channels at the new plane halves
//! 2. [`ScanoutLanes::reset`] - stop, flush and restart both shifters, then
//!    reload their per-refresh counts
//! 3. [`ScanoutLanes::resume`] - start both channels and release both
//!    shifters on the same clock edge
//!
//! None of these may block: they run in interrupt context with a deadline
//! of one sub-frame.

use crate::config::RefreshGeometry;

/// Base addresses of the two halves of one sub-frame plane
///
/// Addresses are plain integers, which is what the DMA engine consumes.
/// They point into the statically allocated sub-frame store and stay valid
/// for the life of the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LaneHalves {
    /// First byte of the half scanned by the upper lane
    pub upper: usize,
    /// First byte of the half scanned by the lower lane
    pub lower: usize,
}

/// Two lock-stepped serializer lanes
pub trait ScanoutLanes {
    /// Reset both channels' read pointers to the start of the given halves
    ///
    /// Must not start the transfer.
    fn rewind(&mut self, halves: LaneHalves);

    /// Disable, flush and restart both shifters and reload their counts
    fn reset(&mut self, geometry: &RefreshGeometry);

    /// Start both channels and enable both shifters in lock-step
    fn resume(&mut self);
}
