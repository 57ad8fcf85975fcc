//! Decode-to-text for diagnostic output.
//!
//! The instruction set has no official assembly syntax; the mnemonics
//! here match the operation names in the engine. The output is for
//! humans reading a listing, not for reassembly. Unmatched words render
//! as `unknown` rather than failing.

use crate::opcode::Opcode;

/// The mnemonic and operands for one instruction word.
pub fn decode(op: u16) -> String {
    let (x, y, n, kk, addr) = (op.x(), op.y(), op.n(), op.kk(), op.addr());
    match op.nibbles() {
        (0x0, 0x0, 0xE, 0x0) => "clear".to_string(),
        (0x0, 0x0, 0xE, 0xE) => "ret".to_string(),
        (0x1, ..) => format!("jmp 0x{:03x}", addr),
        (0x2, ..) => format!("call 0x{:03x}", addr),
        (0x3, ..) => format!("jeq V{:01X}, 0x{:02x}", x, kk),
        (0x4, ..) => format!("jneq V{:01X}, 0x{:02x}", x, kk),
        (0x5, .., 0x0) => format!("jeqr V{:01X}, V{:01X}", x, y),
        (0x6, ..) => format!("mov V{:01X}, 0x{:02x}", x, kk),
        (0x7, ..) => format!("add V{:01X}, 0x{:02x}", x, kk),
        (0x8, .., 0x0) => format!("movr V{:01X}, V{:01X}", x, y),
        (0x8, .., 0x1) => format!("or V{:01X}, V{:01X}", x, y),
        (0x8, .., 0x2) => format!("and V{:01X}, V{:01X}", x, y),
        (0x8, .., 0x3) => format!("xor V{:01X}, V{:01X}", x, y),
        (0x8, .., 0x4) => format!("addr V{:01X}, V{:01X}", x, y),
        (0x8, .., 0x5) => format!("sub V{:01X}, V{:01X}", x, y),
        (0x8, .., 0x6) => format!("shr V{:01X}", x),
        (0x8, .., 0x7) => format!("subb V{:01X}, V{:01X}", x, y),
        (0x8, .., 0xE) => format!("shl V{:01X}", x),
        (0x9, .., 0x0) => format!("jneqr V{:01X}, V{:01X}", x, y),
        (0xA, ..) => format!("movi 0x{:03x}", addr),
        (0xB, ..) => format!("jmpv0 0x{:03x}", addr),
        (0xC, ..) => format!("rnd V{:01X}, 0x{:02x}", x, kk),
        (0xD, ..) => format!("draw V{:01X}, V{:01X}, 0x{:01x}", x, y, n),
        (0xE, .., 0x9, 0xE) => format!("jkey V{:01X}", x),
        (0xE, .., 0xA, 0x1) => format!("jnkey V{:01X}", x),
        (0xF, .., 0x0, 0x7) => format!("getdelay V{:01X}", x),
        (0xF, .., 0x0, 0xA) => format!("waitkey V{:01X}", x),
        (0xF, .., 0x1, 0x5) => format!("setdelay V{:01X}", x),
        (0xF, .., 0x1, 0x8) => format!("setsound V{:01X}", x),
        (0xF, .., 0x1, 0xE) => format!("addi V{:01X}", x),
        (0xF, .., 0x2, 0x9) => format!("spritei V{:01X}", x),
        (0xF, .., 0x3, 0x3) => format!("bcd V{:01X}", x),
        (0xF, .., 0x5, 0x5) => format!("dump V{:01X}", x),
        (0xF, .., 0x6, 0x5) => format!("fill V{:01X}", x),
        _ => "unknown".to_string(),
    }
}

/// One listing line: address, raw bytes, decoded text.
fn line(addr: usize, hi: u8, lo: u8) -> String {
    let op = u16::from(hi) << 8 | u16::from(lo);
    format!("{:04x}:  {:02x} {:02x}  =>  {}", addr, hi, lo, decode(op))
}

/// A listing of `len` bytes of memory starting at `start`, one line per
/// instruction word.
pub fn listing(memory: &[u8], start: usize, len: usize) -> String {
    let end = (start + len).min(memory.len());
    (start..end)
        .step_by(2)
        .map(|addr| {
            let hi = memory[addr];
            let lo = if addr + 1 < end { memory[addr + 1] } else { 0 };
            line(addr, hi, lo)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
