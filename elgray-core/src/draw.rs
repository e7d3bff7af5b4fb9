//! Drawing primitives
//!
//! Everything here is layered on [`GrayCanvas::set_pixel`], which clips and
//! clamps, so callers may pass any `i32` coordinates. Each primitive only
//! walks the part that can land on the surface, so work is bounded by the
//! surface size however far off screen the shape reaches. Arithmetic is done
//! in `i64` so far-apart endpoints cannot overflow.
//!
//! None of this is on a timing-critical path.

use core::ops::RangeInclusive;

use crate::traits::GrayCanvas;

/// Drawing helpers available on every [`GrayCanvas`]
pub trait DrawExt: GrayCanvas {
    /// Fill a `w` x `h` rectangle with its top-left corner at (x, y)
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, level: u8) {
        let (width, height) = self.size();
        // Clip to the surface so huge rectangles cost only what is visible
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(w).min(width as i32);
        let y1 = y.saturating_add(h).min(height as i32);

        for j in y0..y1 {
            for i in x0..x1 {
                self.set_pixel(i, j, level);
            }
        }
    }

    /// Draw a one-pixel rectangle outline
    fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, level: u8) {
        if w <= 0 || h <= 0 {
            return;
        }
        // A saturated edge is past i32::MAX and off the surface anyway
        let right = x.saturating_add(w - 1);
        let bottom = y.saturating_add(h - 1);
        self.fill_rect(x, y, w, 1, level);
        self.fill_rect(x, bottom, w, 1, level);
        self.fill_rect(x, y, 1, h, level);
        self.fill_rect(right, y, 1, h, level);
    }

    /// Draw a line from (x0, y0) to (x1, y1) inclusive (Bresenham)
    ///
    /// Plots the same points as the `err = dx - dy` stepping walk, exactly
    /// `max(|dx|, |dy|) + 1` of them, but jumps straight to the steps whose
    /// major-axis coordinate is on the surface.
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, level: u8) {
        let (width, height) = self.size();
        let (x0, y0) = (i64::from(x0), i64::from(y0));
        let (x1, y1) = (i64::from(x1), i64::from(y1));
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };

        if dx >= dy {
            for t in visible_steps(x0, sx, dx, i64::from(width)) {
                plot(self, x0 + sx * t, y0 + sy * minor_offset(t, dx, dy), level);
            }
        } else {
            for t in visible_steps(y0, sy, dy, i64::from(height)) {
                plot(self, x0 + sx * minor_offset(t, dy, dx), y0 + sy * t, level);
            }
        }
    }

    /// Draw a circle outline centred on (cx, cy) (midpoint, 8-way symmetry)
    ///
    /// The octant walk starts at (r, 0) and runs while x >= y. Only the
    /// octant rows whose mirrored points can reach the surface are visited.
    fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, level: u8) {
        if radius < 0 {
            return;
        }
        let (width, height) = self.size();
        let (w, h) = (i64::from(width), i64::from(height));
        let (cx, cy, r) = (i64::from(cx), i64::from(cy), i64::from(radius));

        // Octant row y is mirrored to rows cy ± y and columns cx ± y
        let bands = [
            (-cy, h - 1 - cy),
            (cy - h + 1, cy),
            (-cx, w - 1 - cx),
            (cx - w + 1, cx),
        ];
        for (lo, hi) in bands {
            for y in lo.max(0)..=hi.min(r) {
                let inner = octant_x(r, y);
                let outer = if y == 0 {
                    r
                } else {
                    inner.max(octant_x(r, y - 1) - 1)
                };
                for x in inner.max(y)..=outer {
                    plot_octants(self, cx, cy, x, y, level);
                }
            }
        }
    }

    /// Fill a disc of every pixel within `radius` of (cx, cy)
    fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, level: u8) {
        if radius < 0 {
            return;
        }
        let (width, height) = self.size();
        let (cx, cy, r) = (i64::from(cx), i64::from(cy), i64::from(radius));

        for y in (cy - r).max(0)..=(cy + r).min(i64::from(height) - 1) {
            let dy = y - cy;
            let half = isqrt(r * r - dy * dy);
            for x in (cx - half).max(0)..=(cx + half).min(i64::from(width) - 1) {
                plot(self, x, y, level);
            }
        }
    }
}

/// Set a pixel given wide coordinates; anything outside `i32` is off surface
fn plot<C: GrayCanvas + ?Sized>(canvas: &mut C, x: i64, y: i64, level: u8) {
    if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
        canvas.set_pixel(x, y, level);
    }
}

/// Plot an octant point and its seven mirror images
fn plot_octants<C: GrayCanvas + ?Sized>(
    canvas: &mut C,
    cx: i64,
    cy: i64,
    x: i64,
    y: i64,
    level: u8,
) {
    plot(canvas, cx + x, cy + y, level);
    plot(canvas, cx + y, cy + x, level);
    plot(canvas, cx - y, cy + x, level);
    plot(canvas, cx - x, cy + y, level);
    plot(canvas, cx - x, cy - y, level);
    plot(canvas, cx - y, cy - x, level);
    plot(canvas, cx + y, cy - x, level);
    plot(canvas, cx + x, cy - y, level);
}

/// Steps `t` in `0..=delta` for which `start + step * t` lies in `0..limit`
fn visible_steps(start: i64, step: i64, delta: i64, limit: i64) -> RangeInclusive<i64> {
    let (lo, hi) = if step > 0 {
        (-start, limit - 1 - start)
    } else {
        (start - limit + 1, start)
    };
    lo.max(0)..=hi.min(delta)
}

/// Minor-axis offset after `t` major steps of the `err = dx - dy` walk
///
/// The walk takes a minor step at `t` exactly when
/// `(2k + 1) * major < 2 * minor * t` for `k` minor steps taken so far,
/// which sums to `ceil((2 * minor * t + major) / (2 * major)) - 1`.
fn minor_offset(t: i64, major: i64, minor: i64) -> i64 {
    if major == 0 {
        return 0;
    }
    let (t, major, minor) = (i128::from(t), i128::from(major), i128::from(minor));
    ((2 * minor * t + major - 1) / (2 * major)) as i64
}

/// Smallest x the midpoint walk reaches on octant row y
///
/// The walk keeps `err = x^2 + y^2 + 2y - r^2` and steps x down while
/// `err > 0`, so it settles on `floor(sqrt(r^2 - y^2 - 2y))`.
fn octant_x(r: i64, y: i64) -> i64 {
    isqrt(r * r - y * y - 2 * y)
}

/// Integer square root, 0 for negative input
fn isqrt(n: i64) -> i64 {
    if n <= 0 {
        return 0;
    }
    let n = n as u64;
    let mut rem = n;
    let mut root = 0u64;
    let mut bit = 1u64 << 62;
    while bit > n {
        bit >>= 2;
    }
    while bit != 0 {
        if rem >= root + bit {
            rem -= root + bit;
            root = (root >> 1) + bit;
        } else {
            root >>= 1;
        }
        bit >>= 2;
    }
    root as i64
}

// Blanket implementation for all canvases
impl<T: GrayCanvas + ?Sized> DrawExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::packed_len;
    use crate::frame::PackedFrame;

    type Frame = PackedFrame<{ packed_len(16, 16) }>;

    fn lit_pixels(frame: &Frame) -> usize {
        let mut count = 0;
        for y in 0..16 {
            for x in 0..16 {
                if frame.get_pixel(x, y) != 0 {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn test_diagonal_line() {
        let mut frame = Frame::new(16, 16);
        frame.draw_line(0, 0, 9, 9, 3);

        assert_eq!(lit_pixels(&frame), 10);
        for i in 0..10 {
            assert_eq!(frame.get_pixel(i, i), 3);
        }
    }

    #[test]
    fn test_line_step_count() {
        let mut frame = Frame::new(16, 16);
        frame.draw_line(12, 2, 1, 7, 1);
        // max(|dx|, |dy|) + 1
        assert_eq!(lit_pixels(&frame), 12);
        assert_eq!(frame.get_pixel(12, 2), 1);
        assert_eq!(frame.get_pixel(1, 7), 1);
    }

    #[test]
    fn test_line_single_point() {
        let mut frame = Frame::new(16, 16);
        frame.draw_line(4, 4, 4, 4, 2);
        assert_eq!(lit_pixels(&frame), 1);
    }

    #[test]
    fn test_line_clipped_off_surface() {
        let mut frame = Frame::new(16, 16);
        frame.draw_line(-10, 3, 30, 3, 3);
        assert_eq!(lit_pixels(&frame), 16);
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut frame = Frame::new(16, 16);
        frame.fill_rect(-2, -2, 5, 4, 2);
        assert_eq!(lit_pixels(&frame), 3 * 2);
        assert_eq!(frame.get_pixel(2, 1), 2);
        assert_eq!(frame.get_pixel(3, 1), 0);

        frame.fill_rect(10, 10, i32::MAX, i32::MAX, 1);
        assert_eq!(frame.get_pixel(15, 15), 1);
    }

    #[test]
    fn test_fill_rect_empty() {
        let mut frame = Frame::new(16, 16);
        frame.fill_rect(4, 4, 0, 5, 3);
        frame.fill_rect(4, 4, -3, 5, 3);
        assert_eq!(lit_pixels(&frame), 0);
    }

    #[test]
    fn test_draw_rect_outline() {
        let mut frame = Frame::new(16, 16);
        frame.draw_rect(2, 2, 5, 4, 3);
        // Perimeter of 5x4 box
        assert_eq!(lit_pixels(&frame), 2 * 5 + 2 * 2);
        assert_eq!(frame.get_pixel(4, 4), 0);
        assert_eq!(frame.get_pixel(6, 5), 3);
    }

    #[test]
    fn test_circle_symmetry() {
        let mut frame = Frame::new(16, 16);
        frame.draw_circle(8, 8, 5, 3);

        for y in 0..16 {
            for x in 0..16 {
                let p = frame.get_pixel(x, y);
                assert_eq!(p, frame.get_pixel(16 - x, y), "mirror x at ({x}, {y})");
                assert_eq!(p, frame.get_pixel(y, x), "transpose at ({x}, {y})");
            }
        }
        assert_eq!(frame.get_pixel(13, 8), 3);
        assert_eq!(frame.get_pixel(8, 3), 3);
        assert_eq!(frame.get_pixel(8, 8), 0);
    }

    /// Stepping Bresenham walk the clipped line must agree with
    fn stepped_line(frame: &mut Frame, x0: i32, y0: i32, x1: i32, y1: i32) {
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx - dy;
        let (mut x, mut y) = (x0, y0);
        loop {
            frame.set_pixel(x, y, 3);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += sx;
            }
            if e2 < dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Stepping midpoint walk the row-indexed circle must agree with
    fn stepped_circle(frame: &mut Frame, cx: i32, cy: i32, r: i32) {
        let (mut x, mut y, mut err) = (r, 0, 0);
        while x >= y {
            for (px, py) in [
                (cx + x, cy + y),
                (cx + y, cy + x),
                (cx - y, cy + x),
                (cx - x, cy + y),
                (cx - x, cy - y),
                (cx - y, cy - x),
                (cx + y, cy - x),
                (cx + x, cy - y),
            ] {
                frame.set_pixel(px, py, 3);
            }
            if err <= 0 {
                y += 1;
                err += 2 * y + 1;
            }
            if err > 0 {
                x -= 1;
                err -= 2 * x + 1;
            }
        }
    }

    #[test]
    fn test_line_matches_stepping_walk() {
        let coords = [-7, -2, 0, 3, 8, 15, 16, 22];
        for &x0 in &coords {
            for &y0 in &coords {
                for &x1 in &coords {
                    for &y1 in &coords {
                        let mut expected = Frame::new(16, 16);
                        stepped_line(&mut expected, x0, y0, x1, y1);
                        let mut frame = Frame::new(16, 16);
                        frame.draw_line(x0, y0, x1, y1, 3);
                        assert_eq!(
                            frame.as_bytes(),
                            expected.as_bytes(),
                            "({x0}, {y0}) -> ({x1}, {y1})"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_circle_matches_stepping_walk() {
        for r in 0..40 {
            for &(cx, cy) in &[(8, 8), (0, 0), (-5, 12), (20, 3), (8, 30)] {
                let mut expected = Frame::new(16, 16);
                stepped_circle(&mut expected, cx, cy, r);
                let mut frame = Frame::new(16, 16);
                frame.draw_circle(cx, cy, r, 3);
                assert_eq!(
                    frame.as_bytes(),
                    expected.as_bytes(),
                    "centre ({cx}, {cy}) radius {r}"
                );
            }
        }
    }

    #[test]
    fn test_far_line_endpoints() {
        let mut frame = Frame::new(16, 16);
        frame.draw_line(-2_000_000_000, 3, 2_000_000_000, 3, 3);
        assert_eq!(lit_pixels(&frame), 16);
        for x in 0..16 {
            assert_eq!(frame.get_pixel(x, 3), 3);
        }

        let mut frame = Frame::new(16, 16);
        frame.draw_line(i32::MIN, i32::MIN, i32::MAX, i32::MAX, 2);
        // Exact diagonal through the origin
        for i in 0..16 {
            assert_eq!(frame.get_pixel(i, i), 2);
        }
        assert_eq!(lit_pixels(&frame), 16);
    }

    #[test]
    fn test_rect_near_i32_limits() {
        let mut frame = Frame::new(16, 16);
        frame.draw_rect(i32::MAX - 1, 0, 10, 4, 3);
        frame.draw_rect(i32::MIN, i32::MIN, i32::MAX, i32::MAX, 3);
        assert_eq!(lit_pixels(&frame), 0);

        // Left and top edges visible, the rest far away
        frame.draw_rect(2, 5, i32::MAX, i32::MAX, 1);
        assert_eq!(frame.get_pixel(2, 15), 1);
        assert_eq!(frame.get_pixel(15, 5), 1);
        assert_eq!(frame.get_pixel(3, 6), 0);
        assert_eq!(lit_pixels(&frame), 14 + 10);
    }

    #[test]
    fn test_huge_circles() {
        let mut frame = Frame::new(16, 16);
        frame.fill_circle(8, 8, 50_000, 3);
        assert_eq!(lit_pixels(&frame), 256);

        let mut frame = Frame::new(16, 16);
        frame.draw_circle(8, 8, 50_000, 3);
        frame.draw_circle(i32::MAX, i32::MIN, i32::MAX, 3);
        frame.fill_circle(i32::MIN, 0, i32::MAX, 3);
        assert_eq!(lit_pixels(&frame), 0);

        // Top of a huge circle grazes row 8
        frame.draw_circle(8, 50_008, 50_000, 2);
        assert_eq!(frame.get_pixel(8, 8), 2);
        for y in 0..8 {
            for x in 0..16 {
                assert_eq!(frame.get_pixel(x, y), 0, "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_fill_circle() {
        let mut frame = Frame::new(16, 16);
        frame.fill_circle(8, 8, 2, 1);
        // Lattice points with x^2 + y^2 <= 4
        assert_eq!(lit_pixels(&frame), 13);
        assert_eq!(frame.get_pixel(8, 8), 1);
        assert_eq!(frame.get_pixel(10, 8), 1);
        assert_eq!(frame.get_pixel(10, 9), 0);
    }
}
