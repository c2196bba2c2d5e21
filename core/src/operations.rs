//! One handler per instruction, each mutating [`State`] in place.
//!
//! Handlers never touch the default program-counter advance; the dispatcher
//! applies it afterward. Skip instructions add their own extra `+2`, and the
//! jump family rewrites `pc` outright. Handlers that can fault validate
//! before their first write so a failed instruction leaves state untouched.

use rand::Rng;

use crate::bits;
use crate::constants::{FONT_GLYPH_SIZE, FONT_START, MEMORY_SIZE, STACK_DEPTH};
use crate::cpu::KeyWait;
use crate::error::Chip8Error;
use crate::opcode::Opcode;
use crate::state::State;

/// clear the display
pub fn clear(state: &mut State) {
    state.frame_buffer.clear();
    state.draw_flag = true;
}

/// PC = stack.pop()
pub fn ret(state: &mut State, op: Opcode) -> Result<(), Chip8Error> {
    if state.sp == 0 {
        return Err(Chip8Error::StackUnderflow {
            opcode: op.word(),
            pc: state.pc,
        });
    }
    state.sp -= 1;
    state.pc = state.stack[state.sp as usize];
    Ok(())
}

/// PC = nnn
pub fn jump(state: &mut State, op: Opcode) {
    state.pc = op.nnn();
}

/// stack.push(PC); PC = nnn
pub fn call(state: &mut State, op: Opcode) -> Result<(), Chip8Error> {
    if state.sp as usize == STACK_DEPTH {
        return Err(Chip8Error::StackOverflow {
            opcode: op.word(),
            pc: state.pc,
        });
    }
    state.stack[state.sp as usize] = state.pc;
    state.sp += 1;
    state.pc = op.nnn();
    Ok(())
}

/// if Vx == nn then skip the next instruction
pub fn skip_eq(state: &mut State, op: Opcode) {
    if state.v[op.x() as usize] == op.nn() {
        state.pc += 2;
    }
}

/// if Vx != nn then skip the next instruction
pub fn skip_ne(state: &mut State, op: Opcode) {
    if state.v[op.x() as usize] != op.nn() {
        state.pc += 2;
    }
}

/// if Vx == Vy then skip the next instruction
pub fn skip_eq_reg(state: &mut State, op: Opcode) {
    if state.v[op.x() as usize] == state.v[op.y() as usize] {
        state.pc += 2;
    }
}

/// Vx = nn
pub fn load(state: &mut State, op: Opcode) {
    state.v[op.x() as usize] = op.nn();
}

/// Vx += nn; any carry is dropped and VF is left alone
pub fn add(state: &mut State, op: Opcode) {
    let (sum, _) = bits::add(8, u16::from(state.v[op.x() as usize]), u16::from(op.nn()));
    state.v[op.x() as usize] = sum as u8;
}

/// Vx = Vy
pub fn copy(state: &mut State, op: Opcode) {
    state.v[op.x() as usize] = state.v[op.y() as usize];
}

/// Vx |= Vy
pub fn or(state: &mut State, op: Opcode) {
    state.v[op.x() as usize] |= state.v[op.y() as usize];
}

/// Vx &= Vy
pub fn and(state: &mut State, op: Opcode) {
    state.v[op.x() as usize] &= state.v[op.y() as usize];
}

/// Vx ^= Vy
pub fn xor(state: &mut State, op: Opcode) {
    state.v[op.x() as usize] ^= state.v[op.y() as usize];
}

/// Vx += Vy; VF = carry
pub fn add_reg(state: &mut State, op: Opcode) {
    let (sum, carry) = bits::add(
        8,
        u16::from(state.v[op.x() as usize]),
        u16::from(state.v[op.y() as usize]),
    );
    // value first, flag second: the flag wins when x is 0xF
    state.v[op.x() as usize] = sum as u8;
    state.v[0xF] = u8::from(carry);
}

/// Vx -= Vy; VF = !borrow
pub fn sub_reg(state: &mut State, op: Opcode) {
    let (difference, no_borrow) = bits::sub(
        8,
        u16::from(state.v[op.x() as usize]),
        u16::from(state.v[op.y() as usize]),
    );
    state.v[op.x() as usize] = difference as u8;
    state.v[0xF] = u8::from(no_borrow);
}

/// VF = Vx & 1; Vx >>= 1
pub fn shift_right(state: &mut State, op: Opcode) {
    let x = op.x() as usize;
    // flag first: when x is 0xF the shift below then reads the flag back
    state.v[0xF] = state.v[x] & 0x1;
    state.v[x] >>= 1;
}

/// Vx = Vy - Vx; VF = !borrow
pub fn rsub_reg(state: &mut State, op: Opcode) {
    let (difference, no_borrow) = bits::sub(
        8,
        u16::from(state.v[op.y() as usize]),
        u16::from(state.v[op.x() as usize]),
    );
    state.v[op.x() as usize] = difference as u8;
    state.v[0xF] = u8::from(no_borrow);
}

/// VF = Vx >> 7; Vx <<= 1
pub fn shift_left(state: &mut State, op: Opcode) {
    let x = op.x() as usize;
    state.v[0xF] = state.v[x] >> 7;
    state.v[x] <<= 1;
}

/// if Vx != Vy then skip the next instruction
pub fn skip_ne_reg(state: &mut State, op: Opcode) {
    if state.v[op.x() as usize] != state.v[op.y() as usize] {
        state.pc += 2;
    }
}

/// I = nnn
pub fn load_index(state: &mut State, op: Opcode) {
    state.i = op.nnn();
}

/// PC = nnn + V0, wrapped to 12 bits
pub fn jump_offset(state: &mut State, op: Opcode) {
    let (pc, _) = bits::add(12, op.nnn(), u16::from(state.v[0x0]));
    state.pc = pc;
}

/// Vx = random byte & nn
pub fn random(state: &mut State, op: Opcode, rng: &mut impl Rng) {
    state.v[op.x() as usize] = rng.gen::<u8>() & op.nn();
}

/// XOR-blit the n-row sprite at mem[I] onto (Vx, Vy); VF = collision
pub fn draw(state: &mut State, op: Opcode) -> Result<(), Chip8Error> {
    let start = state.i as usize;
    let height = op.n() as usize;
    if start + height > MEMORY_SIZE {
        return Err(Chip8Error::AddressOutOfRange {
            addr: state.i,
            len: height,
            opcode: op.word(),
            pc: state.pc,
        });
    }
    // the collision flag is zeroed before the base coordinates are read, so
    // a draw whose x operand is 0xF positions itself with the cleared value
    state.v[0xF] = 0x0;
    let x = state.v[op.x() as usize];
    let y = state.v[op.y() as usize];
    let collision = state.frame_buffer.blit(x, y, &state.memory[start..start + height]);
    state.v[0xF] = u8::from(collision);
    state.draw_flag = true;
    Ok(())
}

/// if key Vx is pressed then skip the next instruction
pub fn skip_key_pressed(state: &mut State, op: Opcode) {
    // only the low nibble of Vx selects among the 16 keys
    let key = (state.v[op.x() as usize] & 0xF) as usize;
    if state.pressed_keys[key] {
        state.pc += 2;
    }
}

/// if key Vx is not pressed then skip the next instruction
pub fn skip_key_not_pressed(state: &mut State, op: Opcode) {
    let key = (state.v[op.x() as usize] & 0xF) as usize;
    if !state.pressed_keys[key] {
        state.pc += 2;
    }
}

/// Vx = delay timer
pub fn load_delay(state: &mut State, op: Opcode) {
    state.v[op.x() as usize] = state.timers.delay;
}

/// park execution until a key press lands in Vx ([`KeyWait::Block`] only)
pub fn wait_key(state: &mut State, op: Opcode, mode: KeyWait) {
    if mode == KeyWait::Block {
        state.register_needing_key = Some(op.x());
    }
}

/// delay timer = Vx
pub fn store_delay(state: &mut State, op: Opcode) {
    state.timers.delay = state.v[op.x() as usize];
}

/// sound timer = Vx
pub fn store_sound(state: &mut State, op: Opcode) {
    state.timers.sound = state.v[op.x() as usize];
}

/// I += Vx, wrapped to 12 bits; VF = overflow
pub fn add_index(state: &mut State, op: Opcode) {
    let (i, overflow) = bits::add(12, state.i, u16::from(state.v[op.x() as usize]));
    state.i = i;
    state.v[0xF] = u8::from(overflow);
}

/// I = the address of the 5-byte glyph for digit Vx
pub fn load_font(state: &mut State, op: Opcode) {
    state.i = FONT_START + FONT_GLYPH_SIZE * u16::from(state.v[op.x() as usize]);
}

/// mem[I..I+3] = the decimal digits of Vx, hundreds first
pub fn store_bcd(state: &mut State, op: Opcode) -> Result<(), Chip8Error> {
    let start = state.i as usize;
    if start + 3 > MEMORY_SIZE {
        return Err(Chip8Error::AddressOutOfRange {
            addr: state.i,
            len: 3,
            opcode: op.word(),
            pc: state.pc,
        });
    }
    let value = state.v[op.x() as usize];
    let digits = [value / 100, value / 10 % 10, value % 10];
    state.memory[start..start + 3].copy_from_slice(&digits);
    Ok(())
}

/// mem[I..=I+x] = V0..=Vx
pub fn store_regs(state: &mut State, op: Opcode) -> Result<(), Chip8Error> {
    let x = op.x() as usize;
    let start = state.i as usize;
    if start + x + 1 > MEMORY_SIZE {
        return Err(Chip8Error::AddressOutOfRange {
            addr: state.i,
            len: x + 1,
            opcode: op.word(),
            pc: state.pc,
        });
    }
    state.memory[start..=start + x].copy_from_slice(&state.v[..=x]);
    Ok(())
}

/// V0..=Vx = mem[I..=I+x]
pub fn load_regs(state: &mut State, op: Opcode) -> Result<(), Chip8Error> {
    let x = op.x() as usize;
    let start = state.i as usize;
    if start + x + 1 > MEMORY_SIZE {
        return Err(Chip8Error::AddressOutOfRange {
            addr: state.i,
            len: x + 1,
            opcode: op.word(),
            pc: state.pc,
        });
    }
    state.v[..=x].copy_from_slice(&state.memory[start..=start + x]);
    Ok(())
}
