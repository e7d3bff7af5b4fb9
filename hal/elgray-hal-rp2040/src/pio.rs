//! PIO programs and timing for the panel serializer lanes
//!
//! Each lane shifts 4 pixels per transfer onto its data pins. The upper lane
//! also drives the pixel clock (side-set) and VSYNC (set pin) and raises PIO
//! IRQ 1 after its last line. The lower lane drives HSYNC (side-set).
//!
//! Both programs spend `2 * transfers + 3` cycles per line and one cycle of
//! preamble, so two state machines enabled on the same clock edge stay
//! pixel-aligned for the whole refresh:
//!
//! | upper                   | lower                   |
//! |:------------------------|:------------------------|
//! | `set pins, 1`           | `nop`                   |
//! | `mov x, isr`            | `mov x, isr` (HSYNC)    |
//! | `out pins, 4` (clk hi)  | `out pins, 4`           |
//! | `jmp x-- pixel`         | `jmp x-- pixel`         |
//! | `set pins, 0`           | `nop`                   |
//! | `jmp y-- line`          | `nop`                   |
//!
//! Counts are loaded into scratch registers while the state machines are
//! stopped: Y holds `lines - 1` (upper only) and ISR holds `transfers - 1`.

use fixed::types::U24F8;
use pio::{InstructionOperands, OutDestination};

/// System clock frequency (RP2040 default)
pub const SYS_CLK_HZ: u32 = 125_000_000;

/// PIO cycles per pixel clock period
pub const CYCLES_PER_PIXEL_CLOCK: u32 = 2;

/// Relative PIO IRQ flag raised by the upper lane at end of refresh
pub const REFRESH_IRQ: u8 = 1;

/// Calculate the clock divider for a target pixel clock
///
/// The lane programs toggle the pixel clock every PIO cycle, so:
/// pixel_clock = sys_clk / (divider * 2)
///
/// Therefore: divider = sys_clk / (pixel_clock * 2)
///
/// Returns (integer_part, fractional_part) for the 16.8 fixed-point divider.
pub fn calc_clock_divider(sys_clk_hz: u32, pixel_clock_hz: u32) -> (u16, u8) {
    if pixel_clock_hz == 0 {
        return (0xFFFF, 0xFF); // Maximum divider = slowest
    }

    // divider * 256 = (sys_clk * 256) / (pixel_clock * 2)
    let divisor = pixel_clock_hz as u64 * CYCLES_PER_PIXEL_CLOCK as u64;
    let divider_x256 = (sys_clk_hz as u64 * 256) / divisor;

    let int_part = (divider_x256 / 256).clamp(1, 0xFFFF) as u16;
    // An integer divider of 1 runs at full speed; the fraction must be 0 then
    let frac_part = if divider_x256 < 256 {
        0
    } else {
        (divider_x256 % 256) as u8
    };

    (int_part, frac_part)
}

/// Clock divider as the fixed-point value the PIO config takes
pub fn clock_divider(sys_clk_hz: u32, pixel_clock_hz: u32) -> U24F8 {
    let (int_part, frac_part) = calc_clock_divider(sys_clk_hz, pixel_clock_hz);
    U24F8::from_bits(((int_part as u32) << 8) | frac_part as u32)
}

/// Value loaded into ISR: the per-line transfer loop counter
pub fn transfer_count(transfers_per_line: u32) -> u32 {
    transfers_per_line.saturating_sub(1)
}

/// Value loaded into the upper lane's Y: the line loop counter
pub fn line_count(lines_per_refresh: u32) -> u32 {
    lines_per_refresh.saturating_sub(1)
}

/// `pull noblock`, executed to move a pushed count into OSR
pub fn pull_noblock() -> u16 {
    InstructionOperands::PULL {
        if_empty: false,
        block: false,
    }
    .encode()
}

/// `out <dest>, 32`, executed to move OSR into a scratch register
pub fn out_all(destination: OutDestination) -> u16 {
    InstructionOperands::OUT {
        destination,
        bit_count: 32,
    }
    .encode()
}

/// Upper lane: data, pixel clock, VSYNC, end-of-refresh IRQ
pub fn upper_lane_program() -> pio::Program<32> {
    pio::pio_asm!(
        ".side_set 1",
        "    set pins, 1       side 0", // VSYNC for the first line
        "line:",
        "    mov x, isr        side 0",
        "pixel:",
        "    out pins, 4       side 1", // 4 pixels, clock high
        "    jmp x-- pixel     side 0",
        "    set pins, 0       side 0",
        "    jmp y-- line      side 0",
        "    irq 1             side 0", // refresh complete
        "end:",
        "    jmp end           side 0",
    )
    .program
}

/// Lower lane: data and HSYNC
pub fn lower_lane_program() -> pio::Program<32> {
    pio::pio_asm!(
        ".side_set 1",
        "    nop               side 0", // match the upper preamble
        ".wrap_target",
        "    mov x, isr        side 1", // HSYNC
        "pixel:",
        "    out pins, 4       side 0",
        "    jmp x-- pixel     side 0",
        "    nop               side 0",
        "    nop               side 0",
        ".wrap",
    )
    .program
}
