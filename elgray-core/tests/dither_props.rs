//! Property tests for the framebuffer, drawing primitives and dither encoder

use elgray_core::config::{packed_len, plane_len};
use elgray_core::dither::encode;
use elgray_core::{DrawExt, PackedFrame, SubFrameCycle, SLOTS};
use proptest::prelude::*;

const W: u16 = 64;
const H: u16 = 16;

type Frame = PackedFrame<{ packed_len(W as usize, H as usize) }>;
type Cycle = SubFrameCycle<{ plane_len(W as usize, H as usize) }>;

/// Width with two unused pixels of padding at the end of every row
const PADDED_W: u16 = 62;

type PaddedFrame = PackedFrame<{ packed_len(PADDED_W as usize, H as usize) }>;

/// Row padding bits must never be written
fn padding_untouched(frame: &PaddedFrame) -> bool {
    (0..H as usize).all(|y| frame.row(y)[frame.stride() - 1] & 0b1111 == 0)
}

fn expected_lit(level: u8) -> usize {
    match level {
        0 => 0,
        1 => 1,
        2 => 2,
        _ => 4,
    }
}

fn arb_pixels() -> impl Strategy<Value = Vec<(i32, i32, u8)>> {
    prop::collection::vec((0..W as i32, 0..H as i32, 0u8..4), 0..200)
}

proptest! {
    #[test]
    fn lit_slot_count_matches_level(pixels in arb_pixels()) {
        let mut frame = Frame::new(W, H);
        for &(x, y, level) in &pixels {
            frame.set_pixel(x, y, level);
        }
        let mut cycle = Cycle::new(W, H);
        encode(&frame, &mut cycle);

        for y in 0..H as i32 {
            for x in 0..W as i32 {
                let level = frame.get_pixel(x, y);
                prop_assert_eq!(cycle.lit_count(x, y), expected_lit(level));
            }
        }
    }

    #[test]
    fn quarter_level_slot_follows_diagonal(
        x1 in 0..W as i32, y1 in 0..H as i32,
        x2 in 0..W as i32, y2 in 0..H as i32
    ) {
        let mut frame = Frame::new(W, H);
        frame.clear(1);
        let mut cycle = Cycle::new(W, H);
        encode(&frame, &mut cycle);

        let slot_of = |x: i32, y: i32| (0..SLOTS).find(|&s| cycle.is_lit(s, x, y));
        let same_slot = slot_of(x1, y1) == slot_of(x2, y2);
        prop_assert_eq!(same_slot, (x1 + y1) % 4 == (x2 + y2) % 4);
        prop_assert_eq!(slot_of(x1, y1), Some(((x1 + y1) % 4) as usize));
    }

    #[test]
    fn encode_is_idempotent(pixels in arb_pixels()) {
        let mut frame = Frame::new(W, H);
        for &(x, y, level) in &pixels {
            frame.set_pixel(x, y, level);
        }
        let mut first = Cycle::new(W, H);
        encode(&frame, &mut first);
        let mut second = first.clone();
        encode(&frame, &mut second);

        for slot in 0..SLOTS {
            prop_assert_eq!(first.plane(slot).as_bytes(), second.plane(slot).as_bytes());
        }
    }

    #[test]
    fn out_of_bounds_access_is_ignored(
        x in prop_oneof![i32::MIN..0, W as i32..i32::MAX],
        y in any::<i32>(),
        level in any::<u8>()
    ) {
        let mut frame = Frame::new(W, H);
        frame.clear(2);
        let before = frame.as_bytes().to_vec();

        frame.set_pixel(x, y, level);
        frame.set_pixel(y, x, level);

        prop_assert_eq!(frame.get_pixel(x, y), 0);
        prop_assert_eq!(frame.as_bytes(), &before[..]);
    }

    #[test]
    fn primitives_accept_any_coordinates(
        x0 in any::<i32>(), y0 in any::<i32>(),
        x1 in any::<i32>(), y1 in any::<i32>(),
        radius in any::<i32>()
    ) {
        let mut frame = PaddedFrame::new(PADDED_W, H);
        frame.draw_line(x0, y0, x1, y1, 3);
        frame.draw_rect(x0, y0, x1, y1, 3);
        frame.fill_rect(x0, y0, x1, y1, 3);
        frame.draw_circle(x0, y0, radius, 3);
        frame.fill_circle(x1, y1, radius, 3);
        prop_assert!(padding_untouched(&frame));
    }

    #[test]
    fn primitives_near_the_surface_stay_inside(
        x0 in -100..162i32, y0 in -100..116i32,
        x1 in -100..162i32, y1 in -100..116i32,
        radius in -10..200i32
    ) {
        let mut frame = PaddedFrame::new(PADDED_W, H);
        frame.draw_line(x0, y0, x1, y1, 1);
        frame.draw_rect(x0, y0, x1, y1, 2);
        frame.draw_circle(x0, y1, radius, 3);
        frame.fill_circle(x1, y0, radius, 1);
        prop_assert!(padding_untouched(&frame));
    }

    #[test]
    fn stored_levels_are_clamped(x in 0..W as i32, y in 0..H as i32, level in any::<u8>()) {
        let mut frame = Frame::new(W, H);
        frame.set_pixel(x, y, level);
        prop_assert_eq!(frame.get_pixel(x, y), level.min(3));
    }

    #[test]
    fn line_plots_max_delta_plus_one(
        x0 in 0..W as i32, y0 in 0..H as i32,
        x1 in 0..W as i32, y1 in 0..H as i32
    ) {
        let mut frame = Frame::new(W, H);
        frame.draw_line(x0, y0, x1, y1, 3);

        let lit = (0..H as i32)
            .flat_map(|y| (0..W as i32).map(move |x| (x, y)))
            .filter(|&(x, y)| frame.get_pixel(x, y) != 0)
            .count();
        let expected = (x1 - x0).abs().max((y1 - y0).abs()) + 1;
        prop_assert_eq!(lit as i32, expected);
        prop_assert_eq!(frame.get_pixel(x0, y0), 3);
        prop_assert_eq!(frame.get_pixel(x1, y1), 3);
    }
}

/// Four vertical bars at levels 0..3, checked plane by plane
#[test]
fn vertical_bars_closed_form() {
    const BAR: i32 = W as i32 / 4;

    let mut frame = Frame::new(W, H);
    frame.clear(0);
    for level in 0..4u8 {
        frame.fill_rect(level as i32 * BAR, 0, BAR, H as i32, level);
    }
    let mut cycle = Cycle::new(W, H);
    encode(&frame, &mut cycle);

    for slot in 0..SLOTS {
        for y in 0..H as i32 {
            for x in 0..W as i32 {
                let lit = match x / BAR {
                    0 => false,
                    1 => (x + y) as usize % 4 == slot,
                    2 => slot == 0 || slot == 2,
                    _ => true,
                };
                assert_eq!(cycle.is_lit(slot, x, y), lit, "slot {slot} at ({x}, {y})");
            }
        }
    }
}

#[test]
fn diagonal_line_scenario() {
    let mut frame = Frame::new(W, H);
    frame.draw_line(0, 0, 9, 9, 3);

    for y in 0..H as i32 {
        for x in 0..W as i32 {
            let on_diagonal = x == y && x < 10;
            assert_eq!(frame.get_pixel(x, y) != 0, on_diagonal, "({x}, {y})");
        }
    }
}
