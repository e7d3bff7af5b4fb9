//! Board-agnostic core logic for the grayscale EL panel firmware
//!
//! This crate contains everything that does not depend on a specific
//! microcontroller:
//!
//! - Panel configuration and derived geometry
//! - Packed 2-bit grayscale framebuffer and drawing primitives
//! - Sub-frame store and the temporal dither encoder
//! - Cycle state, scanout state machine and swap coordinator
//! - Panel test patterns
//! - The serializer lane trait implemented by chip HALs
//!
//! # Data flow
//!
//! ```text
//! producer ──draw──▶ PackedFrame ──encode──▶ SubFrameCycle ──DMA──▶ lanes
//!     │                                            ▲
//!     └── request_update_and_swap ──▶ CycleState ◀─┴─ refresh IRQ
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod dither;
pub mod draw;
pub mod frame;
pub mod patterns;
pub mod plane;
pub mod scanout;
pub mod swap;
pub mod traits;

// Re-export key types
pub use config::{ConfigError, PanelConfig, RefreshGeometry};
pub use draw::DrawExt;
pub use frame::{PackedFrame, MAX_LEVEL};
pub use patterns::TestPattern;
pub use plane::{SubFrameCycle, SubFramePlane, SLOTS};
pub use scanout::{CycleState, ScanoutEngine, Slot};
pub use swap::SwapCoordinator;
pub use traits::{GrayCanvas, LaneHalves, ScanoutLanes};
