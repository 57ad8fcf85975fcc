use std::io;

use thiserror::Error;

/// Everything that can go wrong while loading or running a program.
///
/// Load failures are recoverable by the caller; execution failures halt
/// the machine, and whether to abort is the caller's decision.
#[derive(Debug, Error)]
pub enum MachineError {
    #[error("program is too large ({size} bytes, max {})", crate::constants::MAX_PROGRAM_SIZE)]
    ProgramTooLarge { size: usize },

    #[error("program source is unreadable")]
    ProgramUnreadable(#[from] io::Error),

    #[error("unrecognized instruction {opcode:#06X}")]
    UnrecognizedInstruction { opcode: u16 },

    #[error("call stack overflow")]
    StackOverflow,

    #[error("return with empty call stack")]
    StackUnderflow,
}
