use std::io::Read;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::{MAX_PROGRAM_SIZE, PROGRAM_START};
use crate::disasm;
use crate::error::MachineError;
use crate::instruction;
use crate::operations::Inputs;
use crate::state::{FrameBuffer, State};

/// # Machine
/// The virtual machine: all storage, the key latches, and a private
/// random-byte source.
///
/// Supplies interfaces for:
/// - loading programs
/// - executing one instruction at a time
/// - ticking the countdown timers at the frontend's cadence
/// - pressing and releasing keys, and resolving a key wait
/// - taking the frame buffer for rendering when it has changed
pub struct Machine {
    state: State,
    pressed_keys: [u8; 16],
    rng: StdRng,
    program_len: usize,
}

impl Machine {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// A machine with a deterministic random sequence.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Machine {
            state: State::new(),
            pressed_keys: [0; 16],
            rng,
            program_len: 0,
        }
    }

    /// Copy a program into memory at 0x200.
    ///
    /// Fails without touching memory when the source is unreadable or
    /// the program doesn't fit; returns the program length otherwise.
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> Result<usize, MachineError> {
        let mut program = Vec::new();
        reader.read_to_end(&mut program)?;
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(MachineError::ProgramTooLarge {
                size: program.len(),
            });
        }
        self.state.memory[PROGRAM_START..PROGRAM_START + program.len()]
            .copy_from_slice(&program);
        self.program_len = program.len();
        Ok(program.len())
    }

    /// Execute one instruction.
    ///
    /// A no-op while a key wait is latched. An unrecognized instruction
    /// surfaces as an error with the machine otherwise untouched, so
    /// the caller chooses whether to halt.
    pub fn step(&mut self) -> Result<(), MachineError> {
        if self.state.awaiting_key.is_some() {
            return Ok(());
        }
        let op = self.fetch();
        let operation = instruction::from_op(&op)?;
        let inputs = Inputs {
            pressed_keys: self.pressed_keys,
            random_byte: self.rng.gen(),
        };
        self.state = operation(&op, &self.state, inputs)?;
        Ok(())
    }

    /// One 60Hz tick: decrement each nonzero timer.
    pub fn tick_timers(&mut self) {
        if self.state.delay_timer > 0 {
            self.state.delay_timer -= 1;
        }
        if self.state.sound_timer > 0 {
            self.state.sound_timer -= 1;
        }
    }

    /// Set the pressed status of a keypad key (0x0..0xF).
    pub fn set_key(&mut self, key: u8, pressed: bool) {
        self.pressed_keys[key as usize] = if pressed { 0x1 } else { 0x0 };
    }

    /// The register latched by a `waitkey`, if execution is suspended.
    pub fn awaiting_key(&self) -> Option<u8> {
        self.state.awaiting_key
    }

    /// Deliver a key press to a latched `waitkey`: writes the key into
    /// the latched register and resumes execution. Ignored when the
    /// machine isn't waiting.
    pub fn resolve_key(&mut self, key: u8) {
        if let Some(register) = self.state.awaiting_key.take() {
            self.state.v[register as usize] = key;
        }
    }

    /// The frame buffer if the display should be redrawn; taking it
    /// clears the redraw flag.
    pub fn take_frame(&mut self) -> Option<FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(self.state.frame_buffer)
        } else {
            None
        }
    }

    /// Whether the frontend should be emitting a tone.
    pub fn sound_active(&self) -> bool {
        self.state.sound_timer > 0
    }

    /// A mnemonic listing of the loaded program.
    pub fn disassemble(&self) -> String {
        disasm::listing(&self.state.memory, PROGRAM_START, self.program_len)
    }

    /// The instruction word at PC. Memory is stored as bytes, but
    /// instructions are 16 bits, so combine two subsequent bytes. Both
    /// indices wrap to 12 bits, matching the indirect-access policy, so
    /// a jump to the last byte of memory can't index past the end.
    fn fetch(&self) -> u16 {
        let pc = self.state.pc as usize & 0xFFF;
        let left = u16::from(self.state.memory[pc]);
        let right = u16::from(self.state.memory[(pc + 1) & 0xFFF]);
        left << 8 | right
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}
