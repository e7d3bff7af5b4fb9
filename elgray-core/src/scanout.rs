//! Scanout state machine
//!
//! The scanout engine runs once per hardware refresh-complete interrupt and
//! moves the panel to the next sub-frame of the dither cycle:
//!
//! ```text
//!   ┌──────▶ Slot0 ──▶ Slot1 ──▶ Slot2 ──▶ Slot3 ──┐
//!   └──────────────────────────────────────────────┘
//!            ▲
//!            └─ pending swap released here, and only here
//! ```
//!
//! [`CycleState`] is the only data shared with the producer. It is written
//! by the engine alone, except for the swap request flag, and holds no lock:
//! the interrupt side must never wait on the producer.

use portable_atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use crate::config::RefreshGeometry;
use crate::plane::SLOTS;
use crate::traits::{LaneHalves, ScanoutLanes};

/// Refresh slot of the 4-sub-frame dither cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Slot {
    Slot0 = 0,
    Slot1 = 1,
    Slot2 = 2,
    Slot3 = 3,
}

impl Slot {
    /// Slot for an index, wrapping modulo 4
    pub const fn from_index(index: u8) -> Self {
        match index % SLOTS as u8 {
            0 => Slot::Slot0,
            1 => Slot::Slot1,
            2 => Slot::Slot2,
            _ => Slot::Slot3,
        }
    }

    /// Plane index for this slot
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The slot scanned after this one
    pub const fn next(self) -> Self {
        Self::from_index(self as u8 + 1)
    }

    /// Whether this slot opens a new cycle
    pub const fn is_cycle_start(self) -> bool {
        matches!(self, Slot::Slot0)
    }
}

/// Cycle position and swap handshake shared by producer and scanout
///
/// Only loads and stores are used, so this works on cores without atomic
/// read-modify-write (Cortex-M0+). All writers other than
/// [`CycleState::request_swap`] run in the scanout context.
pub struct CycleState {
    /// Slot currently being scanned out
    index: AtomicU8,
    /// Set by the producer, cleared by scanout on entry to Slot0
    swap_pending: AtomicBool,
    /// Number of times the cycle has wrapped back to Slot0
    cycles: AtomicU32,
}

impl Default for CycleState {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleState {
    /// Create a state at Slot0 with no swap pending
    pub const fn new() -> Self {
        Self {
            index: AtomicU8::new(0),
            swap_pending: AtomicBool::new(false),
            cycles: AtomicU32::new(0),
        }
    }

    /// Slot currently being scanned out
    pub fn current_slot(&self) -> Slot {
        Slot::from_index(self.index.load(Ordering::Acquire))
    }

    /// Whether a swap request is still waiting for a cycle boundary
    pub fn is_swap_pending(&self) -> bool {
        self.swap_pending.load(Ordering::Acquire)
    }

    /// Completed 4-slot cycles since start
    pub fn completed_cycles(&self) -> u32 {
        self.cycles.load(Ordering::Acquire)
    }

    /// Publish a swap request (producer side)
    ///
    /// Release ordering makes every sub-frame write that precedes this call
    /// visible before the flag is.
    pub(crate) fn request_swap(&self) {
        self.swap_pending.store(true, Ordering::Release);
    }

    /// Step to the next slot (scanout side)
    fn advance(&self) -> Slot {
        let next = self.current_slot().next();
        self.index.store(next as u8, Ordering::Release);
        next
    }

    /// Close a cycle: count it and release any pending swap (scanout side)
    ///
    /// Returns true if a swap was released.
    fn finish_cycle(&self) -> bool {
        let cycles = self.cycles.load(Ordering::Relaxed);
        self.cycles.store(cycles.wrapping_add(1), Ordering::Release);

        if self.swap_pending.load(Ordering::Acquire) {
            self.swap_pending.store(false, Ordering::Release);
            true
        } else {
            false
        }
    }
}

/// Scanout driver logic
///
/// Owns the plane addresses and refresh geometry; the lanes are passed in
/// on every call so the same engine drives real hardware or a test double.
pub struct ScanoutEngine<'a> {
    state: &'a CycleState,
    planes: [LaneHalves; SLOTS],
    geometry: RefreshGeometry,
}

impl<'a> ScanoutEngine<'a> {
    /// Create a new engine
    ///
    /// `planes` comes from [`SubFrameCycle::lane_addresses`] on the static
    /// sub-frame store.
    ///
    /// [`SubFrameCycle::lane_addresses`]: crate::plane::SubFrameCycle::lane_addresses
    pub fn new(state: &'a CycleState, planes: [LaneHalves; SLOTS], geometry: RefreshGeometry) -> Self {
        Self {
            state,
            planes,
            geometry,
        }
    }

    /// Shared cycle state
    pub fn state(&self) -> &'a CycleState {
        self.state
    }

    /// Refresh geometry
    pub fn geometry(&self) -> &RefreshGeometry {
        &self.geometry
    }

    /// Arm the lanes for the current slot without advancing
    ///
    /// Called once to prime scanout; after that the refresh interrupt keeps
    /// it running.
    pub fn start<L: ScanoutLanes>(&mut self, lanes: &mut L) -> Slot {
        let slot = self.state.current_slot();
        self.arm(slot, lanes);
        slot
    }

    /// Handle one refresh-complete interrupt
    ///
    /// Moves to the next slot, re-arms both lanes on its plane and, when a
    /// new cycle begins, releases a pending swap. Returns the slot now being
    /// scanned out.
    pub fn on_refresh_complete<L: ScanoutLanes>(&mut self, lanes: &mut L) -> Slot {
        let slot = self.state.advance();
        self.arm(slot, lanes);

        if slot.is_cycle_start() {
            self.state.finish_cycle();
        }
        slot
    }

    fn arm<L: ScanoutLanes>(&self, slot: Slot, lanes: &mut L) {
        lanes.rewind(self.planes[slot.index()]);
        lanes.reset(&self.geometry);
        lanes.resume();
    }
}
