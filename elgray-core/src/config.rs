//! Panel configuration
//!
//! Geometry and timing constants for the attached panel. These are fixed at
//! compile time by the board configuration; nothing here is negotiated with
//! the panel at runtime.
//!
//! The panel is split horizontally into two halves. Each half is fed by its
//! own serializer lane, so one refresh scans `height / 2` lines per lane.

/// Pixels packed into one framebuffer byte (2 bits each)
pub const PIXELS_PER_PACKED_BYTE: usize = 4;

/// Pixels packed into one sub-frame plane byte (1 bit each)
pub const PIXELS_PER_PLANE_BYTE: usize = 8;

/// Pixels shifted out per lane transfer (4 data pins per lane)
pub const PIXELS_PER_TRANSFER: usize = 4;

/// Number of serializer lanes
pub const LANES: usize = 2;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Width or height is zero
    EmptyPanel,
    /// Height must split evenly between the two lanes
    OddHeight,
    /// Each lane line must be a whole number of 32-bit words
    UnalignedWidth,
    /// Pixel clock must be non-zero
    NoPixelClock,
}

/// Panel geometry and timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelConfig {
    /// Visible width in pixels
    pub width: u16,
    /// Visible height in pixels
    pub height: u16,
    /// Target pixel clock in Hz
    pub pixel_clock_hz: u32,
}

/// EL640.400 panel at roughly 120 sub-frames per second
pub const EL640_400: PanelConfig = PanelConfig::new(640, 400, 4_000_000);

impl PanelConfig {
    /// Create a new panel config
    pub const fn new(width: u16, height: u16, pixel_clock_hz: u32) -> Self {
        Self {
            width,
            height,
            pixel_clock_hz,
        }
    }

    /// Check that the geometry can be scanned out by two word-aligned lanes
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyPanel);
        }
        if self.height % 2 != 0 {
            return Err(ConfigError::OddHeight);
        }
        if self.width % 32 != 0 {
            return Err(ConfigError::UnalignedWidth);
        }
        if self.pixel_clock_hz == 0 {
            return Err(ConfigError::NoPixelClock);
        }
        Ok(())
    }

    /// Bytes per row of the packed grayscale framebuffer
    pub const fn packed_stride(&self) -> usize {
        packed_stride(self.width as usize)
    }

    /// Total bytes of the packed grayscale framebuffer
    pub const fn packed_len(&self) -> usize {
        packed_len(self.width as usize, self.height as usize)
    }

    /// Bytes per row of one sub-frame plane
    pub const fn plane_stride(&self) -> usize {
        plane_stride(self.width as usize)
    }

    /// Total bytes of one sub-frame plane
    pub const fn plane_len(&self) -> usize {
        plane_len(self.width as usize, self.height as usize)
    }

    /// Per-refresh counts handed to the serializer lanes
    pub const fn geometry(&self) -> RefreshGeometry {
        let lines = self.height as u32 / LANES as u32;
        RefreshGeometry {
            lines_per_refresh: lines,
            transfers_per_line: self.width as u32 / PIXELS_PER_TRANSFER as u32,
            words_per_lane: (self.plane_len() / LANES / 4) as u32,
        }
    }
}

/// Counts a lane needs to scan out one sub-frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RefreshGeometry {
    /// Lines scanned by each lane per refresh
    pub lines_per_refresh: u32,
    /// 4-pixel transfers per line
    pub transfers_per_line: u32,
    /// 32-bit words streamed into each lane per refresh
    pub words_per_lane: u32,
}

/// Bytes per packed grayscale row: `ceil(width / 4)`
pub const fn packed_stride(width: usize) -> usize {
    width.div_ceil(PIXELS_PER_PACKED_BYTE)
}

/// Bytes of a packed grayscale framebuffer
pub const fn packed_len(width: usize, height: usize) -> usize {
    packed_stride(width) * height
}

/// Bytes per sub-frame plane row: `ceil(width / 8)`
pub const fn plane_stride(width: usize) -> usize {
    width.div_ceil(PIXELS_PER_PLANE_BYTE)
}

/// Bytes of one sub-frame plane
pub const fn plane_len(width: usize, height: usize) -> usize {
    plane_stride(width) * height
}
