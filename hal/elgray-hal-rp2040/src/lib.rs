//! RP2040 serializer lanes for bit-plane EL panels
//!
//! Implements [`elgray_core::ScanoutLanes`] on the RP2040:
//!
//! - PIO programs for the two pixel-aligned data lanes
//! - Pixel clock divider calculation
//! - DMA channel programming and lock-step lane start

#![no_std]

pub mod lanes;
pub mod pio;

pub use lanes::{ElLanes, LanePins, LOWER_SM, UPPER_SM};
