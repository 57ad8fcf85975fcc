use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_GLYPH_SIZE, STACK_DEPTH};
use crate::error::MachineError;
use crate::opcode::Opcode;
use crate::state::State;

/// Per-step inputs the engine feeds every operation: the frontend's key
/// latches and one pre-drawn random byte, so the operations themselves
/// stay pure and deterministic.
#[derive(Copy, Clone)]
pub struct Inputs {
    pub pressed_keys: [u8; 16],
    pub random_byte: u8,
}

/// An `I + offset` memory pointer; all indirect accesses wrap to the
/// 12 significant bits of I.
fn pointer(i: u16, offset: u16) -> usize {
    (i.wrapping_add(offset) & 0x0FFF) as usize
}

/// 00E0: clear the frame buffer
pub fn clear(_op: &dyn Opcode, state: &State, _inputs: Inputs) -> Result<State, MachineError> {
    Ok(State {
        pc: state.pc + 0x2,
        frame_buffer: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
        draw_flag: true,
        ..*state
    })
}

/// 00EE: PC = STACK.pop()
pub fn ret(_op: &dyn Opcode, state: &State, _inputs: Inputs) -> Result<State, MachineError> {
    if state.sp == 0 {
        return Err(MachineError::StackUnderflow);
    }
    let sp = state.sp - 0x1;
    Ok(State {
        pc: state.stack[sp as usize] + 0x2,
        sp,
        ..*state
    })
}

/// 1nnn: PC = addr
pub fn jmp(op: &dyn Opcode, state: &State, _inputs: Inputs) -> Result<State, MachineError> {
    Ok(State {
        pc: op.addr(),
        ..*state
    })
}

/// 2nnn: STACK.push(PC); PC = addr
pub fn call(op: &dyn Opcode, state: &State, _inputs: Inputs) -> Result<State, MachineError> {
    if state.sp as usize == STACK_DEPTH {
        return Err(MachineError::StackOverflow);
    }
    let mut stack = state.stack;
    stack[state.sp as usize] = state.pc;
    Ok(State {
        pc: op.addr(),
        sp: state.sp + 0x1,
        stack,
        ..*state
    })
}

/// 3xkk: if Vx == kk then skip
pub fn jeq(op: &dyn Opcode, state: &State, _inputs: Inputs) -> Result<State, MachineError> {
    let pc = if state.v[op.x() as usize] == op.kk() {
        state.pc + 0x4
    } else {
        state.pc + 0x2
    };
    Ok(State { pc, ..*state })
}

/// 4xkk: if Vx != kk then skip
pub fn jneq(op: &dyn Opcode, state: &State, _inputs: Inputs) -> Result<State, MachineError> {
    let pc = if state.v[op.x() as usize] != op.kk() {
        state.pc + 0x4
    } else {
        state.pc + 0x2
    };
    Ok(State { pc, ..*state })
}

/// 5xy0: if Vx == Vy then skip
pub fn jeqr(op: &dyn Opcode, state: &State, _inputs: Inputs) -> Result<State, MachineError> {
    let pc = if state.v[op.x() as usize] == state.v[op.y() as usize] {
        state.pc + 0x4
    } else {
        state.pc + 0x2
    };
    Ok(State { pc, ..*state })
}

/// 6xkk: Vx = kk
pub fn mov(op: &dyn Opcode, state: &State, _inputs: Inputs) -> Result<State, MachineError> {
    let mut v = state.v;
    v[op.x() as usize] = op.kk();
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// 7xkk: Vx += kk, overflow dropped
pub fn add(op: &dyn Opcode, state: &State, _inputs: Inputs) -> Result<State, MachineError> {
    let mut v = state.v;
    v[op.x() as usize] = v[op.x() as usize].wrapping_add(op.kk());
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// 8xy0: Vx = Vy
pub fn movr(op: &dyn Opcode, state: &State, _inputs: Inputs) -> Result<State, MachineError> {
    let mut v = state.v;
    v[op.x() as usize] = v[op.y() as usize];
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// 8xy1: Vx |= Vy
pub fn or(op: &dyn Opcode, state: &State, _inputs: Inputs) -> Result<State, MachineError> {
    let mut v = state.v;
    v[op.x() as usize] |= v[op.y() as usize];
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// 8xy2: Vx &= Vy
pub fn and(op: &dyn Opcode, state: &State, _inputs: Inputs) -> Result<State, MachineError> {
    let mut v = state.v;
    v[op.x() as usize] &= v[op.y() as usize];
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// 8xy3: Vx ^= Vy
pub fn xor(op: &dyn Opcode, state: &State, _inputs: Inputs) -> Result<State, MachineError> {
    let mut v = state.v;
    v[op.x() as usize] ^= v[op.y() as usize];
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// 8xy4: Vx += Vy; VF = carry
pub fn addr(op: &dyn Opcode, state: &State, _inputs: Inputs) -> Result<State, MachineError> {
    let (res, over) = state.v[op.x() as usize].overflowing_add(state.v[op.y() as usize]);
    let mut v = state.v;
    v[0xF] = if over { 0x1 } else { 0x0 };
    v[op.x() as usize] = res;
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// 8xy5: Vx -= Vy; VF = 1 iff Vx > Vy before the subtraction, so equal
/// operands clear the flag
pub fn sub(op: &dyn Opcode, state: &State, _inputs: Inputs) -> Result<State, MachineError> {
    let res = state.v[op.x() as usize].wrapping_sub(state.v[op.y() as usize]);
    let mut v = state.v;
    v[0xF] = if state.v[op.x() as usize] > state.v[op.y() as usize] {
        0x1
    } else {
        0x0
    };
    v[op.x() as usize] = res;
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// 8xy6: Vx >>= 1; VF = the bit shifted out
pub fn shr(op: &dyn Opcode, state: &State, _inputs: Inputs) -> Result<State, MachineError> {
    let mut v = state.v;
    v[0xF] = v[op.x() as usize] & 0x1;
    v[op.x() as usize] >>= 1;
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// 8xy7: Vy -= Vx; VF = 1 iff Vy > Vx before the subtraction, so equal
/// operands clear the flag
pub fn subb(op: &dyn Opcode, state: &State, _inputs: Inputs) -> Result<State, MachineError> {
    let res = state.v[op.y() as usize].wrapping_sub(state.v[op.x() as usize]);
    let mut v = state.v;
    v[0xF] = if state.v[op.y() as usize] > state.v[op.x() as usize] {
        0x1
    } else {
        0x0
    };
    v[op.y() as usize] = res;
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// 8xyE: Vx <<= 1; VF = the bit shifted out
pub fn shl(op: &dyn Opcode, state: &State, _inputs: Inputs) -> Result<State, MachineError> {
    let (res, over) = state.v[op.x() as usize].overflowing_mul(2);
    let mut v = state.v;
    v[0xF] = if over { 0x1 } else { 0x0 };
    v[op.x() as usize] = res;
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// 9xy0: if Vx != Vy then skip
pub fn jneqr(op: &dyn Opcode, state: &State, _inputs: Inputs) -> Result<State, MachineError> {
    let pc = if state.v[op.x() as usize] != state.v[op.y() as usize] {
        state.pc + 0x4
    } else {
        state.pc + 0x2
    };
    Ok(State { pc, ..*state })
}

/// Annn: I = addr
pub fn movi(op: &dyn Opcode, state: &State, _inputs: Inputs) -> Result<State, MachineError> {
    Ok(State {
        pc: state.pc + 0x2,
        i: op.addr(),
        ..*state
    })
}

/// Bnnn: PC = V0 + addr
pub fn jmpv0(op: &dyn Opcode, state: &State, _inputs: Inputs) -> Result<State, MachineError> {
    Ok(State {
        pc: u16::from(state.v[0x0]) + op.addr(),
        ..*state
    })
}

/// Cxkk: Vx = random byte & kk
pub fn rnd(op: &dyn Opcode, state: &State, inputs: Inputs) -> Result<State, MachineError> {
    let mut v = state.v;
    v[op.x() as usize] = inputs.random_byte & op.kk();
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// Dxyn: XOR the n-row sprite at I onto the frame buffer at (Vx, Vy),
/// wrapping both coordinates; VF = 1 if any set pixel was cleared
pub fn draw(op: &dyn Opcode, state: &State, _inputs: Inputs) -> Result<State, MachineError> {
    let mut v = state.v;
    let mut frame_buffer = state.frame_buffer;

    v[0xF] = 0x0;

    for row in 0..op.n() as usize {
        let y = (state.v[op.y() as usize] as usize + row) % DISPLAY_HEIGHT;
        let sprite_byte = state.memory[pointer(state.i, row as u16)];
        for bit in 0..8 {
            let x = (state.v[op.x() as usize] as usize + bit) % DISPLAY_WIDTH;
            let pixel = (sprite_byte >> (7 - bit)) & 1;
            v[0xF] |= pixel & state.frame_buffer[y][x];
            frame_buffer[y][x] ^= pixel;
        }
    }

    Ok(State {
        pc: state.pc + 0x2,
        draw_flag: true,
        v,
        frame_buffer,
        ..*state
    })
}

/// Ex9E: if key[Vx] pressed then skip
pub fn jkey(op: &dyn Opcode, state: &State, inputs: Inputs) -> Result<State, MachineError> {
    let pc = if inputs.pressed_keys[state.v[op.x() as usize] as usize] == 0x1 {
        state.pc + 0x4
    } else {
        state.pc + 0x2
    };
    Ok(State { pc, ..*state })
}

/// ExA1: if key[Vx] not pressed then skip
pub fn jnkey(op: &dyn Opcode, state: &State, inputs: Inputs) -> Result<State, MachineError> {
    let pc = if inputs.pressed_keys[state.v[op.x() as usize] as usize] == 0x0 {
        state.pc + 0x4
    } else {
        state.pc + 0x2
    };
    Ok(State { pc, ..*state })
}

/// Fx07: Vx = DT
pub fn getdelay(op: &dyn Opcode, state: &State, _inputs: Inputs) -> Result<State, MachineError> {
    let mut v = state.v;
    v[op.x() as usize] = state.delay_timer;
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// Fx0A: latch register x to receive the next key press; no further
/// instruction executes until the latch is resolved
pub fn waitkey(op: &dyn Opcode, state: &State, _inputs: Inputs) -> Result<State, MachineError> {
    Ok(State {
        pc: state.pc + 0x2,
        awaiting_key: Some(op.x()),
        ..*state
    })
}

/// Fx15: DT = Vx
pub fn setdelay(op: &dyn Opcode, state: &State, _inputs: Inputs) -> Result<State, MachineError> {
    Ok(State {
        pc: state.pc + 0x2,
        delay_timer: state.v[op.x() as usize],
        ..*state
    })
}

/// Fx18: ST = Vx
pub fn setsound(op: &dyn Opcode, state: &State, _inputs: Inputs) -> Result<State, MachineError> {
    Ok(State {
        pc: state.pc + 0x2,
        sound_timer: state.v[op.x() as usize],
        ..*state
    })
}

/// Fx1E: I += Vx
pub fn addi(op: &dyn Opcode, state: &State, _inputs: Inputs) -> Result<State, MachineError> {
    Ok(State {
        pc: state.pc + 0x2,
        i: state.i.wrapping_add(u16::from(state.v[op.x() as usize])),
        ..*state
    })
}

/// Fx29: I = the font glyph address for the digit Vx
pub fn spritei(op: &dyn Opcode, state: &State, _inputs: Inputs) -> Result<State, MachineError> {
    Ok(State {
        pc: state.pc + 0x2,
        i: u16::from(state.v[op.x() as usize]) * FONT_GLYPH_SIZE,
        ..*state
    })
}

/// Fx33: mem[I..I+3] = the decimal digits of Vx
pub fn bcd(op: &dyn Opcode, state: &State, _inputs: Inputs) -> Result<State, MachineError> {
    let value = state.v[op.x() as usize];
    let mut memory = state.memory;
    memory[pointer(state.i, 0)] = value / 100 % 10;
    memory[pointer(state.i, 1)] = value / 10 % 10;
    memory[pointer(state.i, 2)] = value % 10;
    Ok(State {
        pc: state.pc + 0x2,
        memory,
        ..*state
    })
}

/// Fx55: mem[I..=I+x] = V0..=Vx
pub fn dump(op: &dyn Opcode, state: &State, _inputs: Inputs) -> Result<State, MachineError> {
    let mut memory = state.memory;
    for offset in 0..=op.x() as u16 {
        memory[pointer(state.i, offset)] = state.v[offset as usize];
    }
    Ok(State {
        pc: state.pc + 0x2,
        memory,
        ..*state
    })
}

/// Fx65: V0..=Vx = mem[I..=I+x]
pub fn fill(op: &dyn Opcode, state: &State, _inputs: Inputs) -> Result<State, MachineError> {
    let mut v = state.v;
    for offset in 0..=op.x() as u16 {
        v[offset as usize] = state.memory[pointer(state.i, offset)];
    }
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}
