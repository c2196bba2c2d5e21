use std::io::Read;
use std::time::Instant;

use rand::rngs::ThreadRng;

use crate::constants::{MEMORY_SIZE, PROGRAM_START};
use crate::error::Chip8Error;
use crate::framebuffer::FrameBuffer;
use crate::opcode::Opcode;
use crate::operations;
use crate::state::State;

/// How Fx0A (wait for key) behaves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyWait {
    /// Fx0A falls through as a no-op: execution continues and no key is
    /// stored.
    #[default]
    Ignore,
    /// Fx0A parks the CPU until the host reports a key press, which is then
    /// captured into Vx.
    Block,
}

/// Whether an instruction already redirected the program counter or the
/// default advance still applies.
enum Flow {
    Advance,
    Jumped,
}

/// # Chip-8
/// A Chip-8 virtual machine: a small interpreted CPU with a 16-bit
/// instruction set, hexadecimal keypad, and monochrome display.
///
/// Owns the complete machine [`State`] for one emulation session and
/// supplies interfaces for:
/// - loading ROMs
/// - pressing and releasing keypad keys
/// - advancing the CPU one fetch/decode/execute cycle at a time
/// - handing changed frames to whatever renders them
/// - polling whether the sound timer asks for a tone
pub struct Chip8 {
    state: State,
    rng: ThreadRng,
    key_wait: KeyWait,
}

impl Chip8 {
    pub fn new() -> Self {
        Chip8 {
            state: State::new(),
            rng: rand::thread_rng(),
            key_wait: KeyWait::default(),
        }
    }

    /// Selects how Fx0A behaves; see [`KeyWait`].
    pub fn set_key_wait(&mut self, mode: KeyWait) {
        self.key_wait = mode;
    }

    /// Reads a ROM stream to its end and loads it at the program address.
    /// Returns the number of bytes loaded.
    ///
    /// # Arguments
    /// * `reader` a reader over a raw ROM image
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> Result<usize, Chip8Error> {
        let mut rom = Vec::new();
        reader.read_to_end(&mut rom)?;
        self.state.load(&rom, PROGRAM_START)?;
        Ok(rom.len())
    }

    /// Advances the CPU by a single cycle:
    /// - skips fetch and execute while parked on Fx0A
    /// - otherwise fetches, dispatches, and applies the default pc advance
    ///   unless the instruction branched
    /// - always gives the timers a chance to decay
    ///
    /// A failed cycle reports the fault and leaves the machine as it was
    /// before the instruction.
    pub fn step(&mut self) -> Result<(), Chip8Error> {
        if self.state.register_needing_key.is_none() {
            let op = self.fetch()?;
            log::trace!(
                "{:04X} v{:02X?} i{:04X} pc{:04X}",
                op.word(),
                self.state.v,
                self.state.i,
                self.state.pc
            );
            if let Flow::Advance = self.execute(op)? {
                self.state.pc += 2;
            }
        }
        self.state.timers.tick(Instant::now());
        Ok(())
    }

    /// Read-only view of the machine for diagnostics and tests.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Returns the frame buffer if the display changed since the host last
    /// consumed a frame.
    pub fn frame(&self) -> Option<&FrameBuffer> {
        if self.state.draw_flag {
            Some(&self.state.frame_buffer)
        } else {
            None
        }
    }

    /// Acknowledges the frame returned by [`Chip8::frame`].
    pub fn clear_draw_flag(&mut self) {
        self.state.draw_flag = false;
    }

    /// Whether the sound timer is live and the host should play a tone.
    pub fn sound_active(&self) -> bool {
        self.state.timers.sound > 0
    }

    /// Set the pressed status of a key, and capture it if an Fx0A is parked
    /// waiting for one.
    ///
    /// # Arguments
    /// * `key` the hex keypad key 0x0..=0xF
    pub fn key_press(&mut self, key: u8) {
        let key = key & 0xF;
        self.state.pressed_keys[key as usize] = true;
        if let Some(register) = self.state.register_needing_key {
            self.state.v[register as usize] = key;
            self.state.register_needing_key = None;
        }
    }

    /// Unset the pressed status of a key.
    ///
    /// # Arguments
    /// * `key` the hex keypad key 0x0..=0xF
    pub fn key_release(&mut self, key: u8) {
        self.state.pressed_keys[(key & 0xF) as usize] = false;
    }

    /// Reads the two instruction bytes at the pc as one big-endian word.
    fn fetch(&self) -> Result<Opcode, Chip8Error> {
        let pc = self.state.pc as usize;
        if pc + 1 >= MEMORY_SIZE {
            return Err(Chip8Error::PcOutOfRange { pc: self.state.pc });
        }
        let high = u16::from(self.state.memory[pc]);
        let low = u16::from(self.state.memory[pc + 1]);
        Ok(Opcode::new(high << 8 | low))
    }

    /// Executes exactly one instruction against the machine state.
    ///
    /// The most significant nibble selects the instruction family; the 0x0,
    /// 0x8, 0xE, and 0xF families case again on the low nibble or byte. Any
    /// word without a matching arm is a decode fault, never a silent no-op.
    fn execute(&mut self, op: Opcode) -> Result<Flow, Chip8Error> {
        let state = &mut self.state;
        let flow = match op.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => {
                operations::clear(state);
                Flow::Advance
            }
            (0x0, 0x0, 0xE, 0xE) => {
                operations::ret(state, op)?;
                Flow::Advance
            }
            (0x1, ..) => {
                operations::jump(state, op);
                Flow::Jumped
            }
            (0x2, ..) => {
                operations::call(state, op)?;
                Flow::Jumped
            }
            (0x3, ..) => {
                operations::skip_eq(state, op);
                Flow::Advance
            }
            (0x4, ..) => {
                operations::skip_ne(state, op);
                Flow::Advance
            }
            (0x5, .., 0x0) => {
                operations::skip_eq_reg(state, op);
                Flow::Advance
            }
            (0x6, ..) => {
                operations::load(state, op);
                Flow::Advance
            }
            (0x7, ..) => {
                operations::add(state, op);
                Flow::Advance
            }
            (0x8, .., 0x0) => {
                operations::copy(state, op);
                Flow::Advance
            }
            (0x8, .., 0x1) => {
                operations::or(state, op);
                Flow::Advance
            }
            (0x8, .., 0x2) => {
                operations::and(state, op);
                Flow::Advance
            }
            (0x8, .., 0x3) => {
                operations::xor(state, op);
                Flow::Advance
            }
            (0x8, .., 0x4) => {
                operations::add_reg(state, op);
                Flow::Advance
            }
            (0x8, .., 0x5) => {
                operations::sub_reg(state, op);
                Flow::Advance
            }
            (0x8, .., 0x6) => {
                operations::shift_right(state, op);
                Flow::Advance
            }
            (0x8, .., 0x7) => {
                operations::rsub_reg(state, op);
                Flow::Advance
            }
            (0x8, .., 0xE) => {
                operations::shift_left(state, op);
                Flow::Advance
            }
            (0x9, .., 0x0) => {
                operations::skip_ne_reg(state, op);
                Flow::Advance
            }
            (0xA, ..) => {
                operations::load_index(state, op);
                Flow::Advance
            }
            (0xB, ..) => {
                operations::jump_offset(state, op);
                Flow::Jumped
            }
            (0xC, ..) => {
                operations::random(state, op, &mut self.rng);
                Flow::Advance
            }
            (0xD, ..) => {
                operations::draw(state, op)?;
                Flow::Advance
            }
            (0xE, .., 0x9, 0xE) => {
                operations::skip_key_pressed(state, op);
                Flow::Advance
            }
            (0xE, .., 0xA, 0x1) => {
                operations::skip_key_not_pressed(state, op);
                Flow::Advance
            }
            (0xF, .., 0x0, 0x7) => {
                operations::load_delay(state, op);
                Flow::Advance
            }
            (0xF, .., 0x0, 0xA) => {
                operations::wait_key(state, op, self.key_wait);
                Flow::Advance
            }
            (0xF, .., 0x1, 0x5) => {
                operations::store_delay(state, op);
                Flow::Advance
            }
            (0xF, .., 0x1, 0x8) => {
                operations::store_sound(state, op);
                Flow::Advance
            }
            (0xF, .., 0x1, 0xE) => {
                operations::add_index(state, op);
                Flow::Advance
            }
            (0xF, .., 0x2, 0x9) => {
                operations::load_font(state, op);
                Flow::Advance
            }
            (0xF, .., 0x3, 0x3) => {
                operations::store_bcd(state, op)?;
                Flow::Advance
            }
            (0xF, .., 0x5, 0x5) => {
                operations::store_regs(state, op)?;
                Flow::Advance
            }
            (0xF, .., 0x6, 0x5) => {
                operations::load_regs(state, op)?;
                Flow::Advance
            }
            _ => {
                return Err(Chip8Error::UnknownOpcode {
                    opcode: op.word(),
                    pc: state.pc,
                })
            }
        };
        Ok(flow)
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_fetches_big_endian_words() {
        let mut chip8 = Chip8::new();
        chip8.state.memory[0x200..0x202].copy_from_slice(&[0xAA, 0xBB]);
        assert_eq!(chip8.fetch().unwrap().word(), 0xAABB);
    }

    #[test]
    fn test_fetch_rejects_pc_past_the_last_boundary() {
        let mut chip8 = Chip8::new();
        chip8.state.pc = 0xFFF;
        assert!(matches!(
            chip8.fetch(),
            Err(Chip8Error::PcOutOfRange { pc: 0xFFF })
        ));
    }

    #[test]
    fn test_step_applies_the_default_advance() {
        let mut chip8 = Chip8::new();
        chip8.state.memory[0x200..0x202].copy_from_slice(&[0x00, 0xE0]);
        chip8.step().unwrap();
        assert_eq!(chip8.state.pc, 0x202);
    }

    #[test]
    fn test_step_suppresses_the_advance_on_jump() {
        let mut chip8 = Chip8::new();
        chip8.state.memory[0x200..0x202].copy_from_slice(&[0x1A, 0xBC]);
        chip8.step().unwrap();
        assert_eq!(chip8.state.pc, 0x0ABC);
    }

    #[test]
    fn test_step_suppresses_the_advance_on_call() {
        let mut chip8 = Chip8::new();
        chip8.state.memory[0x200..0x202].copy_from_slice(&[0x23, 0x00]);
        chip8.step().unwrap();
        assert_eq!(chip8.state.pc, 0x300);
        assert_eq!(chip8.state.sp, 1);
    }

    #[test]
    fn test_step_suppresses_the_advance_on_jump_offset() {
        let mut chip8 = Chip8::new();
        chip8.state.memory[0x200..0x202].copy_from_slice(&[0xB3, 0x00]);
        chip8.state.v[0x0] = 0x10;
        chip8.step().unwrap();
        assert_eq!(chip8.state.pc, 0x310);
    }

    #[test]
    fn test_step_advances_twice_on_a_taken_skip() {
        let mut chip8 = Chip8::new();
        chip8.state.memory[0x200..0x202].copy_from_slice(&[0x30, 0x00]);
        chip8.step().unwrap();
        assert_eq!(chip8.state.pc, 0x204);
    }

    #[test]
    fn test_step_errors_on_an_unknown_opcode() {
        let mut chip8 = Chip8::new();
        chip8.state.memory[0x200..0x202].copy_from_slice(&[0xFF, 0xFF]);
        assert!(matches!(
            chip8.step(),
            Err(Chip8Error::UnknownOpcode { opcode: 0xFFFF, pc: 0x200 })
        ));
        assert_eq!(chip8.state.pc, 0x200);
    }

    #[test]
    fn test_step_errors_on_a_machine_code_call() {
        let mut chip8 = Chip8::new();
        chip8.state.memory[0x200..0x202].copy_from_slice(&[0x01, 0x23]);
        assert!(matches!(
            chip8.step(),
            Err(Chip8Error::UnknownOpcode { opcode: 0x0123, pc: 0x200 })
        ));
    }

    #[test]
    fn test_step_errors_on_a_malformed_register_skip() {
        let mut chip8 = Chip8::new();
        chip8.state.memory[0x200..0x202].copy_from_slice(&[0x51, 0x21]);
        assert!(matches!(
            chip8.step(),
            Err(Chip8Error::UnknownOpcode { opcode: 0x5121, .. })
        ));
    }

    #[test]
    fn test_step_holds_while_a_register_needs_a_key() {
        let mut chip8 = Chip8::new();
        chip8.state.register_needing_key = Some(0x1);
        chip8.step().unwrap();
        assert_eq!(chip8.state.pc, 0x200);
    }

    #[test]
    fn test_key_press_feeds_a_parked_register() {
        let mut chip8 = Chip8::new();
        chip8.state.register_needing_key = Some(0x1);
        chip8.key_press(0xE);
        assert_eq!(chip8.state.register_needing_key, None);
        assert_eq!(chip8.state.v[0x1], 0xE);
        assert!(chip8.state.pressed_keys[0xE]);
    }

    #[test]
    fn test_key_press_and_release_are_masked_to_the_keypad() {
        let mut chip8 = Chip8::new();
        chip8.key_press(0x13);
        assert!(chip8.state.pressed_keys[0x3]);
        chip8.key_release(0x13);
        assert!(!chip8.state.pressed_keys[0x3]);
    }

    #[test]
    fn test_fx0a_ignore_mode_never_parks() {
        let mut chip8 = Chip8::new();
        chip8.state.memory[0x200..0x202].copy_from_slice(&[0xF1, 0x0A]);
        chip8.step().unwrap();
        assert_eq!(chip8.state.register_needing_key, None);
        assert_eq!(chip8.state.pc, 0x202);
    }

    #[test]
    fn test_fx0a_block_mode_parks_until_a_key() {
        let mut chip8 = Chip8::new();
        chip8.set_key_wait(KeyWait::Block);
        chip8.state.memory[0x200..0x204].copy_from_slice(&[0xF1, 0x0A, 0x00, 0xE0]);
        chip8.step().unwrap();
        assert_eq!(chip8.state.register_needing_key, Some(0x1));
        assert_eq!(chip8.state.pc, 0x202);
        chip8.step().unwrap();
        assert_eq!(chip8.state.pc, 0x202);
        chip8.key_press(0x9);
        assert_eq!(chip8.state.v[0x1], 0x9);
        chip8.step().unwrap();
        assert_eq!(chip8.state.pc, 0x204);
    }

    #[test]
    fn test_load_rom_loads_at_the_program_address() {
        let mut chip8 = Chip8::new();
        let loaded = chip8.load_rom(&mut Cursor::new([0xAA, 0xBB])).unwrap();
        assert_eq!(loaded, 2);
        assert_eq!(chip8.state.memory[0x200..0x202], [0xAA, 0xBB]);
    }

    #[test]
    fn test_load_rom_rejects_an_oversized_image() {
        let mut chip8 = Chip8::new();
        let rom = vec![0xAB; MEMORY_SIZE - 0x200 + 1];
        assert!(matches!(
            chip8.load_rom(&mut Cursor::new(rom)),
            Err(Chip8Error::RomTooLarge { addr: 0x200, .. })
        ));
    }

    #[test]
    fn test_frame_is_gated_by_the_draw_flag() {
        let mut chip8 = Chip8::new();
        assert!(chip8.frame().is_none());
        chip8.state.memory[0x200..0x202].copy_from_slice(&[0x00, 0xE0]);
        chip8.step().unwrap();
        assert!(chip8.frame().is_some());
        chip8.clear_draw_flag();
        assert!(chip8.frame().is_none());
    }

    #[test]
    fn test_sound_active_tracks_the_sound_timer() {
        let mut chip8 = Chip8::new();
        assert!(!chip8.sound_active());
        chip8.state.timers.sound = 2;
        assert!(chip8.sound_active());
    }
}
