//! Hardware abstraction traits
//!
//! These traits define the seams between the board-agnostic core and
//! chip-specific code. Implementations live in the HAL crates (real
//! serializer lanes) or in tests (recording mocks).

pub mod canvas;
pub mod lanes;

pub use canvas::GrayCanvas;
pub use lanes::{LaneHalves, ScanoutLanes};
