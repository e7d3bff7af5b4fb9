//! Panel test patterns
//!
//! Fixed images for checking every gray level on real glass. Each pattern
//! renders onto any [`GrayCanvas`] and scales with its size, except the
//! cell, border and grid spacings, which are in pixels.

use crate::draw::DrawExt;
use crate::frame::MAX_LEVEL;
use crate::traits::GrayCanvas;

/// Checkerboard cell size in pixels
pub const CHECKER_CELL: i32 = 40;

/// Inset between concentric rectangles in pixels
pub const RECT_BORDER: i32 = 50;

/// Grid line spacing in pixels
pub const GRID_SPACING: i32 = 80;

/// A grayscale test pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TestPattern {
    /// Four vertical bars, levels 0 to 3 left to right
    VerticalBars,
    /// Four horizontal bands, levels 0 to 3 top to bottom
    HorizontalBands,
    /// Square cells whose level steps along both axes
    Checkerboard,
    /// Nested rectangles, brightest outside
    ConcentricRects,
    /// Full-level grid lines on black
    Grid,
    /// Whole surface at one level
    Solid(u8),
}

/// Rotation used by the demo firmware
pub const SEQUENCE: [TestPattern; 9] = [
    TestPattern::VerticalBars,
    TestPattern::HorizontalBands,
    TestPattern::Checkerboard,
    TestPattern::ConcentricRects,
    TestPattern::Grid,
    TestPattern::Solid(0),
    TestPattern::Solid(1),
    TestPattern::Solid(2),
    TestPattern::Solid(3),
];

impl TestPattern {
    /// Short human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            TestPattern::VerticalBars => "bars",
            TestPattern::HorizontalBands => "bands",
            TestPattern::Checkerboard => "checker",
            TestPattern::ConcentricRects => "rects",
            TestPattern::Grid => "grid",
            TestPattern::Solid(0) => "solid 0",
            TestPattern::Solid(1) => "solid 1",
            TestPattern::Solid(2) => "solid 2",
            TestPattern::Solid(_) => "solid 3",
        }
    }

    /// Pattern at a position in [`SEQUENCE`], wrapping
    pub fn from_sequence(index: usize) -> Self {
        SEQUENCE[index % SEQUENCE.len()]
    }

    /// Replace the whole canvas with this pattern
    pub fn render<C: GrayCanvas + ?Sized>(&self, canvas: &mut C) {
        let (width, height) = canvas.size();
        let (width, height) = (width as i32, height as i32);
        canvas.clear(0);

        match *self {
            TestPattern::VerticalBars => {
                let bar = width / 4;
                for level in 0..=MAX_LEVEL {
                    canvas.fill_rect(level as i32 * bar, 0, bar, height, level);
                }
            }
            TestPattern::HorizontalBands => {
                let band = height / 4;
                for level in 0..=MAX_LEVEL {
                    canvas.fill_rect(0, level as i32 * band, width, band, level);
                }
            }
            TestPattern::Checkerboard => {
                for y in 0..height {
                    for x in 0..width {
                        let level = (x / CHECKER_CELL + y / CHECKER_CELL) % 4;
                        canvas.set_pixel(x, y, level as u8);
                    }
                }
            }
            TestPattern::ConcentricRects => {
                for step in 0..=MAX_LEVEL as i32 {
                    let inset = step * RECT_BORDER;
                    let w = width - 2 * inset;
                    let h = height - 2 * inset;
                    if w > 0 && h > 0 {
                        canvas.fill_rect(inset, inset, w, h, MAX_LEVEL - step as u8);
                    }
                }
            }
            TestPattern::Grid => {
                for x in (0..width).step_by(GRID_SPACING as usize) {
                    canvas.draw_line(x, 0, x, height - 1, MAX_LEVEL);
                }
                for y in (0..height).step_by(GRID_SPACING as usize) {
                    canvas.draw_line(0, y, width - 1, y, MAX_LEVEL);
                }
            }
            TestPattern::Solid(level) => canvas.clear(level),
        }
    }
}
