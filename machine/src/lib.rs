pub use error::MachineError;
pub use machine::Machine;

pub mod constants;
pub mod disasm;
mod error;
mod instruction;
mod machine;
mod opcode;
mod operations;
pub mod state;
