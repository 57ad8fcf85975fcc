/// Total addressable memory in bytes.
pub const MEMORY_SIZE: usize = 4096;

/// Address programs are loaded at; everything below it belongs to the
/// interpreter (font table included).
pub const PROGRAM_START: usize = 0x200;

/// Largest program that fits between `PROGRAM_START` and the end of memory.
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Return-address slots available to `2nnn`/`00EE`.
pub const STACK_DEPTH: usize = 16;

/// Bytes per font glyph; `Fx29` computes glyph addresses as multiples of this.
pub const FONT_GLYPH_SIZE: u16 = 5;

/// Nanoseconds per CPU cycle (500Hz).
pub const CLOCK_SPEED: u32 = 2_000_000;

/// Timer decrements per second, independent of the CPU clock.
pub const TIMER_RATE: u32 = 60;

/// Glyphs for the hex digits 0..F, 5 bytes each, copied to address 0x000
/// when a machine is constructed.
pub const FONT_TABLE: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
