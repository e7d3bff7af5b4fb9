//! Grayscale drawing surface trait

/// A surface of 2-bit grayscale pixels
///
/// Coordinates are signed so that drawing primitives can run partly off
/// screen. Implementations must ignore writes outside the surface and read
/// back 0 there; callers never bounds-check.
pub trait GrayCanvas {
    /// Surface dimensions as (width, height) in pixels
    fn size(&self) -> (u16, u16);

    /// Set a pixel; `level` above the maximum is clamped
    fn set_pixel(&mut self, x: i32, y: i32, level: u8);

    /// Read a pixel; out-of-bounds reads return 0
    fn get_pixel(&self, x: i32, y: i32) -> u8;

    /// Fill the whole surface with one level
    fn clear(&mut self, level: u8);

    /// Check whether a coordinate lies on the surface
    fn contains(&self, x: i32, y: i32) -> bool {
        let (width, height) = self.size();
        x >= 0 && y >= 0 && x < width as i32 && y < height as i32
    }
}
