use crate::constants::{
    FONT_SPRITES, FONT_START, KEY_COUNT, MEMORY_SIZE, PROGRAM_START, REGISTER_COUNT, STACK_DEPTH,
};
use crate::error::Chip8Error;
use crate::framebuffer::FrameBuffer;
use crate::timer::Timers;

/// # State
/// The complete machine state, owned by one interpreter for the lifetime of
/// an emulation session.
///
/// ## CPU
/// - (v) 16 primary 8-bit registers V0..VF
///     - V0..VE are general purpose
///     - VF doubles as the carry/borrow/collision flag and is overwritten
///       by arithmetic, shift, and draw instructions
/// - (i) a 16-bit address register, used 12 bits at a time
/// - (pc) a 16-bit program counter; instructions are two bytes
/// - (sp) an 8-bit stack pointer, one past the newest frame
///
/// ## Memory
/// - 4096 bytes of addressable memory
///     - `0x050..0x0A0` holds the built-in hex glyphs
///     - `0x200` onward holds the loaded ROM
/// - a 16-frame stack of return addresses
/// - the 64x32 frame buffer, plus a dirty flag the host clears after drawing
///
/// ## Input
/// - the pressed status of keypad keys 0..F; written only by the host
/// - `register_needing_key` parks execution until a key press is captured
///
/// ## Timing
/// - delay and sound counters decaying at 60 Hz of wall-clock time
pub struct State {
    pub v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub stack: [u16; STACK_DEPTH],
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub pressed_keys: [bool; KEY_COUNT],
    pub register_needing_key: Option<u8>,
    pub timers: Timers,
}

impl State {
    pub fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        let font = FONT_START as usize;
        memory[font..font + FONT_SPRITES.len()].copy_from_slice(&FONT_SPRITES);

        State {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            stack: [0; STACK_DEPTH],
            memory,
            frame_buffer: FrameBuffer::new(),
            draw_flag: false,
            pressed_keys: [false; KEY_COUNT],
            register_needing_key: None,
            timers: Timers::new(),
        }
    }

    /// Copies `data` into memory starting at `addr`.
    /// Fails without writing anything if the bytes would run past the end of
    /// memory.
    pub fn load(&mut self, data: &[u8], addr: u16) -> Result<(), Chip8Error> {
        let start = addr as usize;
        if start + data.len() > MEMORY_SIZE {
            return Err(Chip8Error::RomTooLarge {
                addr,
                len: data.len(),
            });
        }
        self.memory[start..start + data.len()].copy_from_slice(data);
        Ok(())
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
