/// # Opcodes
///
/// Instruction words are 16 bits each. Their behavior is cased on some
/// combination of:
/// - `(n, _, _, _)` broad categorization; applies to all opcodes
/// - `(_, _, _, n)` specific behavior within a category
/// - `(_, _, n, n)` more specific behavior within a category
/// - `(_, n, n, n)` some fixed function that doesn't take variables
///
/// Nibbles not used to select the operation usually carry operands:
/// - `(_, n, n, n)` a 12-bit address
/// - `(_, _, n, n)` a byte assigned to and/or compared with Vx
/// - `(_, n, _, _)` the register Vx, or the register range V0..Vx
/// - `(_, _, n, _)` the register Vy
///
/// Both the execution dispatch and the disassembler read fields through
/// this trait, so the bit extraction lives in exactly one place.
pub trait Opcode {
    /// The opcode's component nibbles, most significant first.
    fn nibbles(&self) -> (u8, u8, u8, u8);

    /// The opcode's second nibble.
    /// `[_x__]`
    fn x(&self) -> u8;

    /// The opcode's third nibble.
    /// `[__y_]`
    fn y(&self) -> u8;

    /// The opcode's fourth nibble.
    /// `[___n]`
    fn n(&self) -> u8;

    /// The opcode's least significant byte.
    /// `[__kk]`
    fn kk(&self) -> u8;

    /// The opcode without its most significant nibble.
    /// `[_adr]`
    fn addr(&self) -> u16;
}

impl Opcode for u16 {
    fn nibbles(&self) -> (u8, u8, u8, u8) {
        (((self & 0xF000) >> 12) as u8, self.x(), self.y(), self.n())
    }

    fn x(&self) -> u8 {
        ((self & 0x0F00) >> 8) as u8
    }

    fn y(&self) -> u8 {
        ((self & 0x00F0) >> 4) as u8
    }

    fn n(&self) -> u8 {
        (self & 0x000F) as u8
    }

    fn kk(&self) -> u8 {
        (self & 0x00FF) as u8
    }

    fn addr(&self) -> u16 {
        self & 0x0FFF
    }
}
