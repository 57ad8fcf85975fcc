use crate::error::MachineError;
use crate::opcode::Opcode;
use crate::operations::{self, Inputs};
use crate::state::State;

/// An executable operation: decoded fields in, the successor state out.
pub type Operation = fn(&dyn Opcode, &State, Inputs) -> Result<State, MachineError>;

/// Selects the operation for an opcode.
///
/// Dispatch is on the top nibble, then on a secondary nibble for the
/// shared top nibbles (0x0, 0x8, 0xE, 0xF). A word that matches no
/// pattern is an `UnrecognizedInstruction`; the caller decides whether
/// that halts the session.
pub fn from_op(op: &dyn Opcode) -> Result<Operation, MachineError> {
    let operation: Operation = match op.nibbles() {
        (0x0, 0x0, 0xE, 0x0) => operations::clear,
        (0x0, 0x0, 0xE, 0xE) => operations::ret,
        (0x1, ..) => operations::jmp,
        (0x2, ..) => operations::call,
        (0x3, ..) => operations::jeq,
        (0x4, ..) => operations::jneq,
        (0x5, .., 0x0) => operations::jeqr,
        (0x6, ..) => operations::mov,
        (0x7, ..) => operations::add,
        (0x8, .., 0x0) => operations::movr,
        (0x8, .., 0x1) => operations::or,
        (0x8, .., 0x2) => operations::and,
        (0x8, .., 0x3) => operations::xor,
        (0x8, .., 0x4) => operations::addr,
        (0x8, .., 0x5) => operations::sub,
        (0x8, .., 0x6) => operations::shr,
        (0x8, .., 0x7) => operations::subb,
        (0x8, .., 0xE) => operations::shl,
        (0x9, .., 0x0) => operations::jneqr,
        (0xA, ..) => operations::movi,
        (0xB, ..) => operations::jmpv0,
        (0xC, ..) => operations::rnd,
        (0xD, ..) => operations::draw,
        (0xE, .., 0x9, 0xE) => operations::jkey,
        (0xE, .., 0xA, 0x1) => operations::jnkey,
        (0xF, .., 0x0, 0x7) => operations::getdelay,
        (0xF, .., 0x0, 0xA) => operations::waitkey,
        (0xF, .., 0x1, 0x5) => operations::setdelay,
        (0xF, .., 0x1, 0x8) => operations::setsound,
        (0xF, .., 0x1, 0xE) => operations::addi,
        (0xF, .., 0x2, 0x9) => operations::spritei,
        (0xF, .., 0x3, 0x3) => operations::bcd,
        (0xF, .., 0x5, 0x5) => operations::dump,
        (0xF, .., 0x6, 0x5) => operations::fill,
        (a, b, c, d) => {
            let opcode = u16::from(a) << 12 | u16::from(b) << 8 | u16::from(c) << 4 | u16::from(d);
            return Err(MachineError::UnrecognizedInstruction { opcode });
        }
    };
    Ok(operation)
}

#[cfg(test)]
mod test_instruction {
    use super::*;
    use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, STACK_DEPTH};

    fn quiet() -> Inputs {
        Inputs {
            pressed_keys: [0; 16],
            random_byte: 0,
        }
    }

    fn exec(op: u16, state: &State) -> State {
        exec_with(op, state, quiet())
    }

    fn exec_with(op: u16, state: &State, inputs: Inputs) -> State {
        from_op(&op).unwrap()(&op, state, inputs).unwrap()
    }

    #[test]
    fn test_00e0_clear() {
        let mut state = State::new();
        state.frame_buffer[0][0] = 1;
        let state = exec(0x00E0, &state);
        assert_eq!(state.frame_buffer[0][0], 0);
        assert!(state.draw_flag);
    }

    #[test]
    fn test_00ee_ret() {
        let mut state = State::new();
        state.sp = 0x1;
        state.stack[0] = 0xABC;
        let state = exec(0x00EE, &state);
        assert_eq!(state.sp, 0x0);
        // the return address points at the call; resume just past it
        assert_eq!(state.pc, 0xABC + 0x2);
    }

    #[test]
    fn test_00ee_ret_with_empty_stack_underflows() {
        let state = State::new();
        let result = from_op(&0x00EEu16).unwrap()(&0x00EEu16, &state, quiet());
        assert!(matches!(result, Err(MachineError::StackUnderflow)));
    }

    #[test]
    fn test_1nnn_jmp() {
        let state = exec(0x1ABC, &State::new());
        assert_eq!(state.pc, 0x0ABC);
    }

    #[test]
    fn test_2nnn_call() {
        let mut state = State::new();
        state.pc = 0xABC;
        let state = exec(0x2123, &state);
        assert_eq!(state.sp, 0x1);
        assert_eq!(state.stack[0], 0xABC);
        assert_eq!(state.pc, 0x0123);
    }

    #[test]
    fn test_2nnn_call_at_full_depth_overflows() {
        let mut state = State::new();
        state.sp = STACK_DEPTH as u8;
        let result = from_op(&0x2123u16).unwrap()(&0x2123u16, &state, quiet());
        assert!(matches!(result, Err(MachineError::StackOverflow)));
    }

    #[test]
    fn test_call_then_ret_round_trips() {
        let state = State::new();
        let depth_before = state.sp;
        let call_site = state.pc;
        let state = exec(0x2456, &state);
        let state = exec(0x00EE, &state);
        assert_eq!(state.pc, call_site + 0x2);
        assert_eq!(state.sp, depth_before);
    }

    #[test]
    fn test_3xkk_jeq_skips() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        let state = exec(0x3111, &state);
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_3xkk_jeq_doesnt_skip() {
        let state = exec(0x3111, &State::new());
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_4xkk_jneq_skips() {
        let state = exec(0x4111, &State::new());
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_4xkk_jneq_doesnt_skip() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        let state = exec(0x4111, &state);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_5xy0_jeqr_skips() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x11;
        let state = exec(0x5120, &state);
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_5xy0_jeqr_doesnt_skip() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        let state = exec(0x5120, &state);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_6xkk_mov() {
        let state = exec(0x6122, &State::new());
        assert_eq!(state.v[0x1], 0x22);
    }

    #[test]
    fn test_7xkk_add() {
        let mut state = State::new();
        state.v[0x1] = 0x1;
        let state = exec(0x7122, &state);
        assert_eq!(state.v[0x1], 0x23);
    }

    #[test]
    fn test_7xkk_add_wraps() {
        let mut state = State::new();
        state.v[0x1] = 0xFF;
        let state = exec(0x7102, &state);
        assert_eq!(state.v[0x1], 0x1);
    }

    #[test]
    fn test_8xy0_movr() {
        let mut state = State::new();
        state.v[0x2] = 0x1;
        let state = exec(0x8120, &state);
        assert_eq!(state.v[0x1], 0x1);
    }

    #[test]
    fn test_8xy1_or() {
        let mut state = State::new();
        state.v[0x1] = 0x6;
        state.v[0x2] = 0x3;
        let state = exec(0x8121, &state);
        assert_eq!(state.v[0x1], 0x7);
    }

    #[test]
    fn test_8xy2_and() {
        let mut state = State::new();
        state.v[0x1] = 0x6;
        state.v[0x2] = 0x3;
        let state = exec(0x8122, &state);
        assert_eq!(state.v[0x1], 0x2);
    }

    #[test]
    fn test_8xy3_xor() {
        let mut state = State::new();
        state.v[0x1] = 0x6;
        state.v[0x2] = 0x3;
        let state = exec(0x8123, &state);
        assert_eq!(state.v[0x1], 0x5);
    }

    #[test]
    fn test_8xy4_addr_no_carry() {
        let mut state = State::new();
        state.v[0x1] = 0xEE;
        state.v[0x2] = 0x11;
        let state = exec(0x8124, &state);
        assert_eq!(state.v[0x1], 0xFF);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy4_addr_carry() {
        let mut state = State::new();
        state.v[0x1] = 0xFF;
        state.v[0x2] = 0x11;
        let state = exec(0x8124, &state);
        assert_eq!(state.v[0x1], 0x10);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy5_sub_no_borrow() {
        let mut state = State::new();
        state.v[0x1] = 0x33;
        state.v[0x2] = 0x11;
        let state = exec(0x8125, &state);
        assert_eq!(state.v[0x1], 0x22);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy5_sub_borrow() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x12;
        let state = exec(0x8125, &state);
        assert_eq!(state.v[0x1], 0xFF);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy5_sub_equal_operands_clear_vf() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x11;
        let state = exec(0x8125, &state);
        assert_eq!(state.v[0x1], 0x0);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy6_shr_lsb() {
        let mut state = State::new();
        state.v[0x1] = 0x5;
        let state = exec(0x8106, &state);
        assert_eq!(state.v[0x1], 0x2);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy6_shr_no_lsb() {
        let mut state = State::new();
        state.v[0x1] = 0x4;
        let state = exec(0x8106, &state);
        assert_eq!(state.v[0x1], 0x2);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy7_subb_no_borrow() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x33;
        let state = exec(0x8127, &state);
        assert_eq!(state.v[0x2], 0x22);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy7_subb_borrow() {
        let mut state = State::new();
        state.v[0x1] = 0x12;
        state.v[0x2] = 0x11;
        let state = exec(0x8127, &state);
        assert_eq!(state.v[0x2], 0xFF);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy7_subb_equal_operands_clear_vf() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x11;
        let state = exec(0x8127, &state);
        assert_eq!(state.v[0x2], 0x0);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xye_shl_msb() {
        let mut state = State::new();
        state.v[0x1] = 0xFF;
        let state = exec(0x810E, &state);
        // 0xFF * 2 = 0x01FE
        assert_eq!(state.v[0x1], 0xFE);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xye_shl_no_msb() {
        let mut state = State::new();
        state.v[0x1] = 0x4;
        let state = exec(0x810E, &state);
        assert_eq!(state.v[0x1], 0x8);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_9xy0_jneqr_skips() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        let state = exec(0x9120, &state);
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_9xy0_jneqr_doesnt_skip() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x11;
        let state = exec(0x9120, &state);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_annn_movi() {
        let state = exec(0xAABC, &State::new());
        assert_eq!(state.i, 0xABC);
    }

    #[test]
    fn test_bnnn_jmpv0() {
        let mut state = State::new();
        state.v[0x0] = 0x2;
        let state = exec(0xBABC, &state);
        assert_eq!(state.pc, 0xABE);
    }

    #[test]
    fn test_cxkk_rnd_masks_the_injected_byte() {
        let inputs = Inputs {
            pressed_keys: [0; 16],
            random_byte: 0b1010_1100,
        };
        let state = exec_with(0xC10F, &State::new(), inputs);
        assert_eq!(state.v[0x1], 0b0000_1100);
    }

    #[test]
    fn test_dxyn_draw_draws() {
        let mut state = State::new();
        state.v[0x0] = 0x1;
        // the 0x0 font glyph with a 1x 1y offset
        let state = exec(0xD005, &state);
        let mut expected = [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
        expected[1][1..5].copy_from_slice(&[1, 1, 1, 1]);
        expected[2][1..5].copy_from_slice(&[1, 0, 0, 1]);
        expected[3][1..5].copy_from_slice(&[1, 0, 0, 1]);
        expected[4][1..5].copy_from_slice(&[1, 0, 0, 1]);
        expected[5][1..5].copy_from_slice(&[1, 1, 1, 1]);
        assert!(state
            .frame_buffer
            .iter()
            .zip(expected.iter())
            .all(|(a, b)| a[..] == b[..]));
        assert!(state.draw_flag);
    }

    #[test]
    fn test_dxyn_draw_collides() {
        let mut state = State::new();
        state.frame_buffer[0][0] = 1;
        let state = exec(0xD001, &state);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_dxyn_draw_xors() {
        let mut state = State::new();
        // 0 1 0 1 -> set
        state.frame_buffer[0][2..6].copy_from_slice(&[0, 1, 0, 1]);
        // 1 1 0 0 -> draw xor
        let state = exec(0xD005, &state);
        assert_eq!(state.frame_buffer[0][2..6], [1, 0, 0, 1]);
    }

    #[test]
    fn test_dxyn_draw_twice_restores_and_collides() {
        let before = State::new();
        let once = exec(0xD005, &before);
        assert_eq!(once.v[0xF], 0x0);
        let twice = exec(0xD005, &once);
        assert_eq!(twice.v[0xF], 0x1);
        assert!(twice
            .frame_buffer
            .iter()
            .zip(before.frame_buffer.iter())
            .all(|(a, b)| a[..] == b[..]));
    }

    #[test]
    fn test_dxyn_draw_wraps_coordinates() {
        let mut state = State::new();
        state.v[0x0] = 62;
        state.v[0x1] = 31;
        state.memory[0x300] = 0xFF;
        state.i = 0x300;
        let state = exec(0xD012, &state);
        // 8 columns from x=62 wrap to 0..6; 2 rows from y=31 wrap to 0
        assert_eq!(state.frame_buffer[31][62..64], [1, 1]);
        assert_eq!(state.frame_buffer[31][0..6], [1, 1, 1, 1, 1, 1]);
        assert_eq!(state.frame_buffer[0][62..64], [0, 0]);
    }

    #[test]
    fn test_ex9e_jkey_skips() {
        let mut state = State::new();
        let mut inputs = quiet();
        inputs.pressed_keys[0xE] = 0x1;
        state.v[0x1] = 0xE;
        let state = exec_with(0xE19E, &state, inputs);
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_ex9e_jkey_doesnt_skip() {
        let state = exec(0xE19E, &State::new());
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_exa1_jnkey_skips() {
        let state = exec(0xE1A1, &State::new());
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_exa1_jnkey_doesnt_skip() {
        let mut state = State::new();
        let mut inputs = quiet();
        inputs.pressed_keys[0xE] = 0x1;
        state.v[0x1] = 0xE;
        let state = exec_with(0xE1A1, &state, inputs);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_fx07_getdelay() {
        let mut state = State::new();
        state.delay_timer = 0xF;
        let state = exec(0xF107, &state);
        assert_eq!(state.v[0x1], 0xF);
    }

    #[test]
    fn test_fx0a_waitkey_latches_the_register() {
        let state = exec(0xF10A, &State::new());
        assert_eq!(state.awaiting_key, Some(0x1));
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_fx15_setdelay() {
        let mut state = State::new();
        state.v[0x1] = 0xF;
        let state = exec(0xF115, &state);
        assert_eq!(state.delay_timer, 0xF);
    }

    #[test]
    fn test_fx18_setsound() {
        let mut state = State::new();
        state.v[0x1] = 0xF;
        let state = exec(0xF118, &state);
        assert_eq!(state.sound_timer, 0xF);
    }

    #[test]
    fn test_fx1e_addi() {
        let mut state = State::new();
        state.i = 0x1;
        state.v[0x1] = 0x1;
        let state = exec(0xF11E, &state);
        assert_eq!(state.i, 0x2);
    }

    #[test]
    fn test_fx29_spritei() {
        let mut state = State::new();
        state.v[0x1] = 0x2;
        let state = exec(0xF129, &state);
        assert_eq!(state.i, 0xA);
    }

    #[test]
    fn test_fx33_bcd() {
        let mut state = State::new();
        // 0x7B -> 123
        state.v[0x1] = 0x7B;
        state.i = 0x300;
        let state = exec(0xF133, &state);
        assert_eq!(state.memory[0x300..0x303], [0x1, 0x2, 0x3]);
    }

    #[test]
    fn test_fx55_dump() {
        let mut state = State::new();
        state.i = 0x300;
        state.v[0x0..0x5].copy_from_slice(&[0x1, 0x2, 0x3, 0x4, 0x5]);
        let state = exec(0xF455, &state);
        assert_eq!(state.memory[0x300..0x305], [0x1, 0x2, 0x3, 0x4, 0x5]);
    }

    #[test]
    fn test_fx65_fill() {
        let mut state = State::new();
        state.i = 0x300;
        state.memory[0x300..0x305].copy_from_slice(&[0x1, 0x2, 0x3, 0x4, 0x5]);
        let state = exec(0xF465, &state);
        assert_eq!(state.v[0x0..0x5], [0x1, 0x2, 0x3, 0x4, 0x5]);
    }

    #[test]
    fn test_fx55_then_fx65_round_trips() {
        let mut state = State::new();
        state.i = 0x300;
        state.v[0x0..0x8].copy_from_slice(&[9, 8, 7, 6, 5, 4, 3, 2]);
        let expected = state.v;
        let state = exec(0xF755, &state);
        let mut state = state;
        state.v = [0; 16];
        state.i = 0x300;
        let state = exec(0xF765, &state);
        assert_eq!(state.v[0x0..0x8], expected[0x0..0x8]);
    }

    #[test]
    fn test_unmatched_word_is_an_error() {
        let result = from_op(&0xE1FFu16);
        assert!(
            matches!(result, Err(MachineError::UnrecognizedInstruction { opcode }) if opcode == 0xE1FF)
        );
    }
}
