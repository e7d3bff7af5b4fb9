//! Compile-time panel configuration
//!
//! `PANEL` is generated by build.rs from panel.toml; the buffer types below
//! are sized from it so every static is checked against the panel at
//! compile time.

use elgray_core::{PackedFrame, SubFrameCycle, SwapCoordinator};

include!(concat!(env!("OUT_DIR"), "/panel.rs"));

const _: () = assert!(PANEL.validate().is_ok(), "invalid panel configuration");

/// Bytes of the packed grayscale framebuffer
pub const FRAME_LEN: usize = PANEL.packed_len();

/// Bytes of one sub-frame plane
pub const PLANE_LEN: usize = PANEL.plane_len();

/// The producer's framebuffer
pub type Frame = PackedFrame<FRAME_LEN>;

/// The four sub-frame planes streamed by the lanes
pub type Planes = SubFrameCycle<PLANE_LEN>;

/// Swap coordinator over the static buffers
pub type PanelSwap = SwapCoordinator<'static, FRAME_LEN, PLANE_LEN>;
