//! Embassy async tasks
//!
//! The scanout task runs on the high-priority interrupt executor; the
//! pattern producer runs in thread mode.

pub mod patterns;
pub mod scanout;

pub use patterns::pattern_task;
pub use scanout::scanout_task;
