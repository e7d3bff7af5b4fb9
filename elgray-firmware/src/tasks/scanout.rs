//! Scanout task
//!
//! Stands in for the refresh-complete interrupt handler. It runs on the
//! interrupt executor, so it preempts the producer as soon as the upper
//! lane raises its end-of-refresh IRQ, and it never awaits anything else.

use defmt::*;
use elgray_core::ScanoutEngine;
use elgray_hal_rp2040::ElLanes;
use embassy_rp::peripherals::PIO0;
use embassy_rp::pio::Irq;

/// Completed cycles between trace messages (about 10 s at 30 cycles/s)
const TRACE_EVERY_CYCLES: u32 = 300;

/// Scanout task - re-arms the lanes after every refresh
#[embassy_executor::task]
pub async fn scanout_task(
    mut engine: ScanoutEngine<'static>,
    mut lanes: ElLanes<'static>,
    mut refresh: Irq<'static, PIO0, 1>,
) {
    let geometry = *engine.geometry();
    info!(
        "Scanout task started: {} lines x {} transfers per lane, {} words",
        geometry.lines_per_refresh, geometry.transfers_per_line, geometry.words_per_lane
    );

    engine.start(&mut lanes);

    loop {
        // Also clears the flag, so the upper lane can raise it again
        refresh.wait().await;

        let slot = engine.on_refresh_complete(&mut lanes);

        if slot.is_cycle_start() {
            let cycles = engine.state().completed_cycles();
            if cycles % TRACE_EVERY_CYCLES == 0 {
                trace!("Scanout: {} cycles", cycles);
            }
        }
    }
}
