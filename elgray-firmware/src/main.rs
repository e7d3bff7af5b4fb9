//! Elgray - Grayscale EL Panel Firmware
//!
//! Main firmware binary for RP2040 boards driving a bit-plane EL panel.
//! Four 1-bit sub-frames are scanned out per logical frame, giving four
//! gray levels through temporal dithering.
//!
//! Execution contexts:
//! - Interrupt executor (SWI_IRQ_1): scanout, woken by the PIO refresh IRQ
//! - Thread executor: the test pattern producer

#![no_std]
#![no_main]

use defmt::*;
use elgray_core::{CycleState, ScanoutEngine};
use elgray_hal_rp2040::pio::clock_divider;
use elgray_hal_rp2040::{ElLanes, LanePins};
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::bind_interrupts;
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::PIO0;
use embassy_rp::pio::Pio;
use static_cell::ConstStaticCell;
use {defmt_rtt as _, panic_probe as _};

use crate::panel::{Frame, PanelSwap, Planes, PANEL};

mod panel;
mod tasks;

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => embassy_rp::pio::InterruptHandler<PIO0>;
});

// Buffers are placed in RAM once and never move; the DMA channels hold
// their addresses for the life of the program
static FRAME: ConstStaticCell<Frame> = ConstStaticCell::new(Frame::new(PANEL.width, PANEL.height));
static PLANES: ConstStaticCell<Planes> =
    ConstStaticCell::new(Planes::new(PANEL.width, PANEL.height));

/// Cycle position and swap flag shared by scanout and producer
static CYCLE_STATE: CycleState = CycleState::new();

/// Executor for the scanout task
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Elgray firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    info!(
        "Panel: {}x{} @ {} Hz pixel clock",
        PANEL.width, PANEL.height, PANEL.pixel_clock_hz
    );

    // Setup PIO0 for the panel lanes
    // Pin assignments are board-specific (see panel.toml)
    let Pio {
        mut common,
        irq1,
        sm0,
        sm1,
        ..
    } = Pio::new(p.PIO0, Irqs);

    let pins = LanePins {
        upper_data: [
            common.make_pio_pin(p.PIN_2),
            common.make_pio_pin(p.PIN_3),
            common.make_pio_pin(p.PIN_4),
            common.make_pio_pin(p.PIN_5),
        ],
        lower_data: [
            common.make_pio_pin(p.PIN_6),
            common.make_pio_pin(p.PIN_7),
            common.make_pio_pin(p.PIN_8),
            common.make_pio_pin(p.PIN_9),
        ],
        pixel_clock: common.make_pio_pin(p.PIN_10),
        hsync: common.make_pio_pin(p.PIN_11),
        vsync: common.make_pio_pin(p.PIN_12),
    };

    let sys_clk_hz = embassy_rp::clocks::clk_sys_freq();
    let divider = clock_divider(sys_clk_hz, PANEL.pixel_clock_hz);
    debug!("PIO clock divider: {}", divider.to_bits());

    let lanes = ElLanes::new(common, sm0, sm1, p.DMA_CH0, p.DMA_CH1, pins, divider);
    info!("PIO lanes initialized");

    let frame = FRAME.take();
    let planes = PLANES.take();

    // Plane addresses are taken once; the store is static
    let engine = ScanoutEngine::new(&CYCLE_STATE, planes.lane_addresses(), PANEL.geometry());
    let swap: PanelSwap = PanelSwap::new(frame, planes, &CYCLE_STATE);

    // Scanout preempts everything in thread mode
    interrupt::SWI_IRQ_1.set_priority(Priority::P1);
    let high_spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);

    // Spawn tasks
    high_spawner
        .spawn(tasks::scanout_task(engine, lanes, irq1))
        .unwrap();
    spawner.spawn(tasks::pattern_task(swap)).unwrap();

    info!("All tasks spawned, firmware running");
}
