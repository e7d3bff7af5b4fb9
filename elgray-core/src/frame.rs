//! Packed grayscale framebuffer
//!
//! The single writable surface the application draws into. Pixels are
//! 2 bits each, four to a byte, most significant pair first, rows padded
//! to a whole byte:
//!
//! ```text
//! byte:  [ p0 p0 | p1 p1 | p2 p2 | p3 p3 ]
//! bit:     7  6    5  4    3  2    1  0
//! ```

use core::convert::Infallible;

use embedded_graphics::pixelcolor::{Gray2, GrayColor};
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Pixel, Size};

use crate::config::{packed_len, packed_stride, PIXELS_PER_PACKED_BYTE};
use crate::traits::GrayCanvas;

/// Brightest representable level
pub const MAX_LEVEL: u8 = 3;

/// Clamp a requested level to the representable range
pub const fn clamp_level(level: u8) -> u8 {
    if level > MAX_LEVEL {
        MAX_LEVEL
    } else {
        level
    }
}

/// Byte with all four pixels at `level`
pub const fn fill_pattern(level: u8) -> u8 {
    let level = clamp_level(level);
    (level << 6) | (level << 4) | (level << 2) | level
}

/// 2-bit-per-pixel framebuffer with `LEN` bytes of storage
///
/// `LEN` must equal [`packed_len`] for the dimensions; this is checked when
/// the frame is constructed, at compile time for statics.
#[derive(Clone)]
pub struct PackedFrame<const LEN: usize> {
    width: u16,
    height: u16,
    stride: usize,
    data: [u8; LEN],
}

impl<const LEN: usize> PackedFrame<LEN> {
    /// Create a new frame with every pixel at level 0
    pub const fn new(width: u16, height: u16) -> Self {
        assert!(
            LEN == packed_len(width as usize, height as usize),
            "frame storage does not match dimensions"
        );
        Self {
            width,
            height,
            stride: packed_stride(width as usize),
            data: [0; LEN],
        }
    }

    /// Frame width in pixels
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Frame height in pixels
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Bytes per row
    pub const fn stride(&self) -> usize {
        self.stride
    }

    /// Raw packed bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// One packed row, or an empty slice past the bottom edge
    pub fn row(&self, y: usize) -> &[u8] {
        if y >= self.height as usize {
            return &[];
        }
        let start = y * self.stride;
        &self.data[start..start + self.stride]
    }

    /// Byte index and shift for an in-bounds pixel
    fn locate(&self, x: usize, y: usize) -> (usize, u32) {
        let index = y * self.stride + x / PIXELS_PER_PACKED_BYTE;
        let shift = ((PIXELS_PER_PACKED_BYTE - 1 - x % PIXELS_PER_PACKED_BYTE) * 2) as u32;
        (index, shift)
    }

    /// Set a pixel (see [`GrayCanvas::set_pixel`])
    pub fn set_pixel(&mut self, x: i32, y: i32, level: u8) {
        if !self.contains(x, y) {
            return;
        }
        let (index, shift) = self.locate(x as usize, y as usize);
        let byte = &mut self.data[index];
        *byte = (*byte & !(0b11 << shift)) | (clamp_level(level) << shift);
    }

    /// Read a pixel (see [`GrayCanvas::get_pixel`])
    pub fn get_pixel(&self, x: i32, y: i32) -> u8 {
        if !self.contains(x, y) {
            return 0;
        }
        let (index, shift) = self.locate(x as usize, y as usize);
        (self.data[index] >> shift) & 0b11
    }

    /// Fill the whole frame a byte at a time
    pub fn clear(&mut self, level: u8) {
        self.data.fill(fill_pattern(level));
    }

    /// Check whether a coordinate lies on the frame
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32
    }
}

impl<const LEN: usize> GrayCanvas for PackedFrame<LEN> {
    fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn set_pixel(&mut self, x: i32, y: i32, level: u8) {
        PackedFrame::set_pixel(self, x, y, level);
    }

    fn get_pixel(&self, x: i32, y: i32) -> u8 {
        PackedFrame::get_pixel(self, x, y)
    }

    fn clear(&mut self, level: u8) {
        PackedFrame::clear(self, level);
    }

    fn contains(&self, x: i32, y: i32) -> bool {
        PackedFrame::contains(self, x, y)
    }
}

impl<const LEN: usize> OriginDimensions for PackedFrame<LEN> {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl<const LEN: usize> DrawTarget for PackedFrame<LEN> {
    type Color = Gray2;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            PackedFrame::set_pixel(self, point.x, point.y, color.luma());
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        PackedFrame::clear(self, color.luma());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::packed_len;

    type SmallFrame = PackedFrame<{ packed_len(10, 4) }>;

    #[test]
    fn test_new_frame_is_blank() {
        let frame = SmallFrame::new(10, 4);
        assert_eq!(frame.stride(), 3);
        assert!(frame.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_set_get_pixel() {
        let mut frame = SmallFrame::new(10, 4);
        frame.set_pixel(0, 0, 3);
        frame.set_pixel(1, 0, 1);
        frame.set_pixel(9, 3, 2);

        assert_eq!(frame.get_pixel(0, 0), 3);
        assert_eq!(frame.get_pixel(1, 0), 1);
        assert_eq!(frame.get_pixel(2, 0), 0);
        assert_eq!(frame.get_pixel(9, 3), 2);

        // Most significant pair is the leftmost pixel
        assert_eq!(frame.as_bytes()[0], 0b1101_0000);
    }

    #[test]
    fn test_set_pixel_overwrites_neighbours_untouched() {
        let mut frame = SmallFrame::new(10, 4);
        frame.clear(3);
        frame.set_pixel(5, 1, 0);
        assert_eq!(frame.get_pixel(4, 1), 3);
        assert_eq!(frame.get_pixel(5, 1), 0);
        assert_eq!(frame.get_pixel(6, 1), 3);
    }

    #[test]
    fn test_level_clamped() {
        let mut frame = SmallFrame::new(10, 4);
        frame.set_pixel(2, 2, 200);
        assert_eq!(frame.get_pixel(2, 2), MAX_LEVEL);
    }

    #[test]
    fn test_out_of_bounds_ignored() {
        let mut frame = SmallFrame::new(10, 4);
        frame.set_pixel(-1, 0, 3);
        frame.set_pixel(0, -1, 3);
        frame.set_pixel(10, 0, 3);
        frame.set_pixel(0, 4, 3);
        frame.set_pixel(i32::MAX, i32::MIN, 3);

        assert!(frame.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(frame.get_pixel(-5, 2), 0);
        assert_eq!(frame.get_pixel(10, 0), 0);
    }

    #[test]
    fn test_clear_fills_pattern() {
        let mut frame = SmallFrame::new(10, 4);
        frame.clear(2);
        assert!(frame.as_bytes().iter().all(|&b| b == 0b1010_1010));
        for y in 0..4 {
            for x in 0..10 {
                assert_eq!(frame.get_pixel(x, y), 2);
            }
        }

        frame.clear(9);
        assert_eq!(frame.get_pixel(3, 3), MAX_LEVEL);
    }

    #[test]
    fn test_row_slices() {
        let mut frame = SmallFrame::new(10, 4);
        frame.set_pixel(4, 2, 1);
        assert_eq!(frame.row(2), &[0, 0b0100_0000, 0]);
        assert!(frame.row(4).is_empty());
    }

    #[test]
    fn test_embedded_graphics_target() {
        use embedded_graphics::prelude::*;
        use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

        let mut frame = SmallFrame::new(10, 4);
        Rectangle::new(Point::new(8, 2), Size::new(4, 4))
            .into_styled(PrimitiveStyle::with_fill(Gray2::new(2)))
            .draw(&mut frame)
            .unwrap();

        assert_eq!(frame.get_pixel(8, 2), 2);
        assert_eq!(frame.get_pixel(9, 3), 2);
        assert_eq!(frame.get_pixel(7, 2), 0);
        assert_eq!(OriginDimensions::size(&frame), Size::new(10, 4));
    }
}
