//! PIO + DMA serializer lanes
//!
//! Two state machines on PIO0 shift the two plane halves onto the panel,
//! each fed by its own DMA channel. The DMA channels are programmed through
//! the register block directly: the transfer has to be armed and started
//! from the scanout interrupt without holding a borrow of the plane, and
//! both channels must be running before the state machines are released.
//!
//! Channel setup that never changes (write address, data size, DREQ) is
//! done once in [`ElLanes::new`]; each refresh only rewrites the read
//! address and the count trigger.

use core::sync::atomic::{compiler_fence, Ordering};

use elgray_core::config::RefreshGeometry;
use elgray_core::traits::{LaneHalves, ScanoutLanes};
use embassy_rp::pac;
use embassy_rp::pac::dma::vals::{DataSize, TreqSel};
use embassy_rp::peripherals::{DMA_CH0, DMA_CH1, PIO0};
use embassy_rp::pio::{
    Common, Config, Direction as PioDirection, FifoJoin, Pin, ShiftConfig, ShiftDirection,
    StateMachine,
};
use embassy_rp::Peri;
use fixed::types::U24F8;
use pio::OutDestination;

use crate::pio::{
    line_count, lower_lane_program, out_all, pull_noblock, transfer_count, upper_lane_program,
};

/// State machine index of the upper lane
pub const UPPER_SM: usize = 0;

/// State machine index of the lower lane
pub const LOWER_SM: usize = 1;

/// DMA channel feeding the upper lane
const UPPER_DMA: usize = 0;

/// DMA channel feeding the lower lane
const LOWER_DMA: usize = 1;

/// Panel pins, already handed to PIO0
///
/// Each data group must be four consecutive GPIOs.
pub struct LanePins<'d> {
    /// UD0..UD3
    pub upper_data: [Pin<'d, PIO0>; 4],
    /// LD0..LD3
    pub lower_data: [Pin<'d, PIO0>; 4],
    /// PIXCLK, side-set of the upper lane
    pub pixel_clock: Pin<'d, PIO0>,
    /// HSYNC, side-set of the lower lane
    pub hsync: Pin<'d, PIO0>,
    /// VSYNC, set pin of the upper lane
    pub vsync: Pin<'d, PIO0>,
}

/// The two panel lanes on PIO0 state machines 0 and 1
pub struct ElLanes<'d> {
    common: Common<'d, PIO0>,
    upper: StateMachine<'d, PIO0, UPPER_SM>,
    lower: StateMachine<'d, PIO0, LOWER_SM>,
    upper_origin: u8,
    lower_origin: u8,
    words_per_lane: u32,
    // Held so the pins and channels stay ours
    _pins: LanePins<'d>,
    _upper_dma: Peri<'d, DMA_CH0>,
    _lower_dma: Peri<'d, DMA_CH1>,
}

impl<'d> ElLanes<'d> {
    /// Load both programs, configure the state machines and DMA channels
    ///
    /// Nothing runs until the first rewind/reset/resume sequence.
    pub fn new(
        mut common: Common<'d, PIO0>,
        mut upper: StateMachine<'d, PIO0, UPPER_SM>,
        mut lower: StateMachine<'d, PIO0, LOWER_SM>,
        upper_dma: Peri<'d, DMA_CH0>,
        lower_dma: Peri<'d, DMA_CH1>,
        pins: LanePins<'d>,
        clock_divider: U24F8,
    ) -> Self {
        let shift_out = ShiftConfig {
            threshold: 32,
            direction: ShiftDirection::Right,
            auto_fill: true,
        };

        let upper_prg = upper_lane_program();
        let upper_loaded = common.load_program(&upper_prg);
        let upper_data = pins.upper_data.each_ref();

        let mut cfg = Config::default();
        cfg.use_program(&upper_loaded, &[&pins.pixel_clock]);
        cfg.set_out_pins(&upper_data);
        cfg.set_set_pins(&[&pins.vsync]);
        cfg.fifo_join = FifoJoin::TxOnly;
        cfg.shift_out = shift_out;
        cfg.clock_divider = clock_divider;
        upper.set_config(&cfg);
        upper.set_pin_dirs(PioDirection::Out, &upper_data);
        upper.set_pin_dirs(PioDirection::Out, &[&pins.pixel_clock, &pins.vsync]);

        let lower_prg = lower_lane_program();
        let lower_loaded = common.load_program(&lower_prg);
        let lower_data = pins.lower_data.each_ref();

        let mut cfg = Config::default();
        cfg.use_program(&lower_loaded, &[&pins.hsync]);
        cfg.set_out_pins(&lower_data);
        cfg.fifo_join = FifoJoin::TxOnly;
        cfg.shift_out = shift_out;
        cfg.clock_divider = clock_divider;
        lower.set_config(&cfg);
        lower.set_pin_dirs(PioDirection::Out, &lower_data);
        lower.set_pin_dirs(PioDirection::Out, &[&pins.hsync]);

        init_channel(UPPER_DMA, UPPER_SM);
        init_channel(LOWER_DMA, LOWER_SM);

        Self {
            common,
            upper,
            lower,
            upper_origin: upper_loaded.origin,
            lower_origin: lower_loaded.origin,
            words_per_lane: 0,
            _pins: pins,
            _upper_dma: upper_dma,
            _lower_dma: lower_dma,
        }
    }
}

/// Fixed part of a lane's DMA setup: 32-bit words, read-increment,
/// write to the lane's TX FIFO, paced by its DREQ
fn init_channel(channel: usize, sm: usize) {
    let ch = pac::DMA.ch(channel);
    ch.write_addr().write_value(pac::PIO0.txf(sm).as_ptr() as u32);
    ch.trans_count().write_value(0);
    ch.ctrl_trig().write(|w| {
        w.set_data_size(DataSize::SIZE_WORD);
        w.set_incr_read(true);
        w.set_incr_write(false);
        // PIO0 TX DREQs are numbered by state machine
        w.set_treq_sel(TreqSel::from(sm as u8));
        // Chaining to itself disables chaining
        w.set_chain_to(channel as u8);
        w.set_irq_quiet(true);
        w.set_en(true);
    });
}

/// Stop a channel if it is still moving data
fn abort_channel(channel: usize) {
    let ch = pac::DMA.ch(channel);
    if ch.ctrl_trig().read().busy() {
        pac::DMA
            .chan_abort()
            .write(|w| w.set_chan_abort(1 << channel));
        while ch.ctrl_trig().read().busy() {}
    }
}

/// Load one scratch register while the state machine is stopped
fn load_register<const SM: usize>(
    sm: &mut StateMachine<'_, PIO0, SM>,
    destination: OutDestination,
    value: u32,
) {
    // FIFOs were just cleared, so there is room
    let pushed = sm.tx().try_push(value);
    debug_assert!(pushed);
    unsafe {
        sm.exec_instr(pull_noblock());
        sm.exec_instr(out_all(destination));
    }
}

impl ScanoutLanes for ElLanes<'_> {
    fn rewind(&mut self, halves: LaneHalves) {
        abort_channel(UPPER_DMA);
        abort_channel(LOWER_DMA);
        pac::DMA.ch(UPPER_DMA).read_addr().write_value(halves.upper as u32);
        pac::DMA.ch(LOWER_DMA).read_addr().write_value(halves.lower as u32);
    }

    fn reset(&mut self, geometry: &RefreshGeometry) {
        self.upper.set_enable(false);
        self.lower.set_enable(false);

        self.upper.clear_fifos();
        self.lower.clear_fifos();

        self.upper.restart();
        self.lower.restart();

        let transfers = transfer_count(geometry.transfers_per_line);
        load_register(&mut self.upper, OutDestination::Y, line_count(geometry.lines_per_refresh));
        load_register(&mut self.upper, OutDestination::ISR, transfers);
        load_register(&mut self.lower, OutDestination::ISR, transfers);

        unsafe {
            self.upper.exec_jmp(self.upper_origin);
            self.lower.exec_jmp(self.lower_origin);
        }

        self.words_per_lane = geometry.words_per_lane;
    }

    fn resume(&mut self) {
        // Read addresses must land before the trigger
        compiler_fence(Ordering::SeqCst);
        pac::DMA
            .ch(UPPER_DMA)
            .al1_trans_count_trig()
            .write_value(self.words_per_lane);
        pac::DMA
            .ch(LOWER_DMA)
            .al1_trans_count_trig()
            .write_value(self.words_per_lane);

        let (upper, lower) = (&mut self.upper, &mut self.lower);
        self.common.apply_sm_batch(|batch| {
            batch.restart_clockdiv(upper);
            batch.restart_clockdiv(lower);
            batch.set_enable(upper, true);
            batch.set_enable(lower, true);
        });
    }
}
