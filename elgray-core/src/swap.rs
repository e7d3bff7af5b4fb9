//! Producer side of the frame handshake
//!
//! The producer draws into the packed frame, encodes it into the sub-frame
//! store and then waits for scanout to reach a cycle boundary:
//!
//! ```text
//! producer:  draw ── encode ── request ──── wait ─────────── return
//! scanout:   S1 ── S2 ── S3 ── S0 ── S1 ── S2 ── S3 ── S0 ── ...
//!                                                      ▲
//!                                     pending cleared on the first S0
//! ```
//!
//! Only one swap can be in flight: [`SwapCoordinator`] borrows the frame
//! and store mutably, so a second request cannot start until the first
//! call has returned.
//!
//! There is a single sub-frame store, and scanout keeps reading it while
//! [`SwapCoordinator::update`] rewrites it. Planes of the cycle in progress
//! may therefore mix old and new content, for at most one cycle, until the
//! swap is released on the next Slot0.

use crate::dither;
use crate::frame::PackedFrame;
use crate::plane::SubFrameCycle;
use crate::scanout::CycleState;

/// Couples the producer's frame and the sub-frame store to the cycle state
pub struct SwapCoordinator<'a, const P: usize, const S: usize> {
    frame: &'a mut PackedFrame<P>,
    cycle: &'a mut SubFrameCycle<S>,
    state: &'a CycleState,
}

impl<'a, const P: usize, const S: usize> SwapCoordinator<'a, P, S> {
    /// Create a new coordinator
    ///
    /// # Panics
    /// If the frame and store dimensions differ.
    pub fn new(
        frame: &'a mut PackedFrame<P>,
        cycle: &'a mut SubFrameCycle<S>,
        state: &'a CycleState,
    ) -> Self {
        assert_eq!(
            (frame.width(), frame.height()),
            (cycle.width(), cycle.height()),
            "frame and sub-frame dimensions differ"
        );
        Self {
            frame,
            cycle,
            state,
        }
    }

    /// The frame the producer is currently allowed to draw into
    pub fn frame_mut(&mut self) -> &mut PackedFrame<P> {
        &mut *self.frame
    }

    /// Read-only view of the producer's frame
    pub fn frame(&self) -> &PackedFrame<P> {
        &*self.frame
    }

    /// Shared cycle state
    pub fn state(&self) -> &'a CycleState {
        self.state
    }

    /// Re-encode the frame into all four planes
    pub fn update(&mut self) {
        dither::encode(&*self.frame, &mut *self.cycle);
    }

    /// Request a swap and spin until scanout releases it
    ///
    /// Returns once a new cycle has started. Never call this from the
    /// scanout context: it would wait on itself.
    pub fn swap(&mut self) {
        self.state.request_swap();
        while self.state.is_swap_pending() {
            core::hint::spin_loop();
        }
    }

    /// Encode the frame, publish it, and wait for the cycle boundary
    ///
    /// The encode completes before the request flag is raised, so scanout
    /// can never observe a pending swap over a half-written store.
    pub fn request_update_and_swap(&mut self) {
        self.update();
        self.swap();
    }

    /// Same as [`Self::request_update_and_swap`], yielding to other tasks
    /// on the same executor while waiting
    pub async fn request_update_and_swap_async(&mut self) {
        self.update();
        self.state.request_swap();
        while self.state.is_swap_pending() {
            embassy_futures::yield_now().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{packed_len, plane_len};
    use crate::plane::SLOTS;
    use crate::traits::GrayCanvas;

    const W: u16 = 32;
    const H: u16 = 4;

    type Frame = PackedFrame<{ packed_len(W as usize, H as usize) }>;
    type Cycle = SubFrameCycle<{ plane_len(W as usize, H as usize) }>;

    #[test]
    fn test_update_encodes_without_swapping() {
        let mut frame = Frame::new(W, H);
        let mut cycle = Cycle::new(W, H);
        let state = CycleState::new();

        let mut swap = SwapCoordinator::new(&mut frame, &mut cycle, &state);
        swap.frame_mut().clear(3);
        swap.update();

        assert!(!state.is_swap_pending());
        drop(swap);
        for slot in 0..SLOTS {
            assert!(cycle.plane(slot).as_bytes().iter().all(|&b| b == 0xFF));
        }
    }

    #[test]
    fn test_frame_access() {
        let mut frame = Frame::new(W, H);
        let mut cycle = Cycle::new(W, H);
        let state = CycleState::new();

        let mut swap = SwapCoordinator::new(&mut frame, &mut cycle, &state);
        swap.frame_mut().set_pixel(3, 2, 2);
        assert_eq!(swap.frame().get_pixel(3, 2), 2);
        assert_eq!(GrayCanvas::size(swap.frame()), (W, H));
    }

    #[test]
    #[should_panic(expected = "dimensions differ")]
    fn test_mismatched_dimensions_panic() {
        let mut frame = Frame::new(W, H);
        let mut cycle = SubFrameCycle::<{ plane_len(32, 2) }>::new(32, 2);
        let state = CycleState::new();
        let _ = SwapCoordinator::new(&mut frame, &mut cycle, &state);
    }
}
