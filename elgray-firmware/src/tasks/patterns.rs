//! Test pattern producer
//!
//! Draws the grayscale test patterns in turn, captions each with its name
//! and publishes it through the swap coordinator.

use defmt::*;
use elgray_core::patterns::SEQUENCE;
use elgray_core::{DrawExt, TestPattern, MAX_LEVEL};
use embassy_time::{Duration, Ticker};
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Gray2;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

use crate::panel::{Frame, PanelSwap};

/// Time each pattern stays on the panel
pub const PATTERN_INTERVAL_SECS: u64 = 5;

/// Caption box origin and height in pixels
const CAPTION_X: i32 = 4;
const CAPTION_Y: i32 = 4;
const CAPTION_HEIGHT: i32 = 12;

/// Pattern task - cycles through the test patterns forever
#[embassy_executor::task]
pub async fn pattern_task(mut swap: PanelSwap) {
    info!("Pattern task started");

    let mut ticker = Ticker::every(Duration::from_secs(PATTERN_INTERVAL_SECS));
    let mut index = 0;

    loop {
        let pattern = TestPattern::from_sequence(index);
        pattern.render(swap.frame_mut());
        draw_caption(swap.frame_mut(), pattern.name());

        swap.request_update_and_swap_async().await;
        info!(
            "Showing pattern {}/{}: {}",
            index + 1,
            SEQUENCE.len(),
            pattern.name()
        );

        index = (index + 1) % SEQUENCE.len();
        ticker.next().await;
    }
}

/// Pattern name in white on a black box, top left
fn draw_caption(frame: &mut Frame, name: &str) {
    let width = (name.len() as i32 + 2) * FONT_6X10.character_size.width as i32;
    frame.fill_rect(CAPTION_X, CAPTION_Y, width, CAPTION_HEIGHT, 0);

    let style = MonoTextStyle::new(&FONT_6X10, Gray2::new(MAX_LEVEL));
    let origin = Point::new(
        CAPTION_X + FONT_6X10.character_size.width as i32,
        CAPTION_Y + 1,
    );
    // Drawing into the framebuffer cannot fail
    let _ = Text::with_baseline(name, origin, style, Baseline::Top).draw(frame);
}
