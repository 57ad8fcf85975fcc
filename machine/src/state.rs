use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_TABLE, MEMORY_SIZE, PROGRAM_START};

/// The frame buffer is indexed as `[y][x]`, one byte (0 or 1) per pixel.
pub type FrameBuffer = [[u8; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// A snapshot of all machine storage.
///
/// ## CPU
/// - (v) 16 primary 8-bit registers V0..VF; VF doubles as the
///   carry/borrow/collision flag of the last arithmetic or draw
///   instruction, a contractual property of the instruction set
/// - (i) a 16-bit memory address register, 12 significant bits
/// - (pc) a 16-bit program counter, always even by construction
/// - (sp) the number of return addresses currently on the stack
///
/// ## Timers
/// - two 8-bit countdown timers (delay & sound), decremented at 60Hz by
///   the frontend, never below zero
/// - a nonzero sound timer is the frontend's cue to emit a tone
///
/// ## Memory
/// - 4096 bytes of addressable memory; 0x000..0x200 belongs to the
///   interpreter, with the font table at 0x000
/// - a 16-deep stack of subroutine return addresses
/// - a 64x32 frame buffer holding the next frame to be drawn
///
/// ## Input
/// - `awaiting_key` records the register that should receive the next
///   key press; no instruction executes while it is set
#[derive(Copy, Clone)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; 16],
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub awaiting_key: Option<u8>,
}

impl State {
    pub fn new() -> Self {
        // the font table is resident below the program area
        let mut memory = [0; MEMORY_SIZE];
        memory[0..FONT_TABLE.len()].copy_from_slice(&FONT_TABLE);

        State {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START as u16,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; 16],
            memory,
            frame_buffer: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            draw_flag: false,
            awaiting_key: None,
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
