//! Temporal dither encoder
//!
//! Turns a packed grayscale frame into the four 1-bit sub-frames of one
//! refresh cycle. Averaged over the cycle, a pixel at level `L` is lit for
//! roughly `L / 3` of the time:
//!
//! | level | lit slots | rule                                   |
//! |-------|-----------|----------------------------------------|
//! | 0     | none      |                                        |
//! | 1     | 1 of 4    | slot `(x + y) mod 4`                   |
//! | 2     | 2 of 4    | slots 0 and 2, for every pixel          |
//! | 3     | 4 of 4    | all                                    |
//!
//! Level 1 rotates its slot with position so neighbouring pixels do not all
//! flash in the same refresh. Level 2 deliberately has no spatial rotation.
//!
//! Every call regenerates all four planes from scratch.

use crate::config::PIXELS_PER_PLANE_BYTE;
use crate::frame::PackedFrame;
use crate::plane::{SubFrameCycle, SLOTS};

/// Slot mask for level 2: lit in slots 0 and 2
const HALF_MASK: u8 = 0b0101;

/// Slot mask for level 3: lit in every slot
const FULL_MASK: u8 = 0b1111;

/// Slots in which a pixel is lit, as a mask (bit `n` = slot `n`)
#[inline]
pub const fn slot_mask(level: u8, x: usize, y: usize) -> u8 {
    match level {
        0 => 0,
        1 => 1 << ((x + y) % SLOTS),
        2 => HALF_MASK,
        _ => FULL_MASK,
    }
}

/// Whether a pixel at `level` is lit during `slot`
pub const fn is_lit(level: u8, x: usize, y: usize, slot: usize) -> bool {
    slot < SLOTS && slot_mask(level, x, y) & (1 << slot) != 0
}

/// Encode `frame` into all four planes of `cycle`
///
/// Both must have the same dimensions. Each plane byte (eight pixels) is
/// assembled in registers and stored once, so no clearing pass is needed.
///
/// # Panics
/// If the frame and cycle dimensions differ.
pub fn encode<const P: usize, const S: usize>(frame: &PackedFrame<P>, cycle: &mut SubFrameCycle<S>) {
    assert_eq!(
        (frame.width(), frame.height()),
        (cycle.width(), cycle.height()),
        "frame and sub-frame dimensions differ"
    );

    let width = frame.width() as usize;
    let plane_stride = cycle.stride();
    let planes = cycle.planes_mut();

    for y in 0..frame.height() as usize {
        let row = frame.row(y);
        for byte_x in 0..plane_stride {
            let mut out = [0u8; SLOTS];
            let first = byte_x * PIXELS_PER_PLANE_BYTE;
            let last = (first + PIXELS_PER_PLANE_BYTE).min(width);

            for x in first..last {
                let level = (row[x / 4] >> ((3 - x % 4) * 2)) & 0b11;
                let mask = slot_mask(level, x, y);
                let bit = 0x80 >> (x % PIXELS_PER_PLANE_BYTE);
                for (slot, byte) in out.iter_mut().enumerate() {
                    if mask & (1 << slot) != 0 {
                        *byte |= bit;
                    }
                }
            }

            let index = y * plane_stride + byte_x;
            for (plane, byte) in planes.iter_mut().zip(out) {
                plane.as_bytes_mut()[index] = byte;
            }
        }
    }
}
