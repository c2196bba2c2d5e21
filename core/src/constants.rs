use std::time::Duration;

/// Bytes of addressable memory.
pub const MEMORY_SIZE: usize = 4096;

/// Number of primary registers (V0..VF).
pub const REGISTER_COUNT: usize = 16;

/// Call stack depth in return addresses.
pub const STACK_DEPTH: usize = 16;

/// Keys on the hexadecimal keypad.
pub const KEY_COUNT: usize = 16;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Sprites are always eight pixels wide, one memory byte per row.
pub const SPRITE_WIDTH: usize = 8;

/// Where ROMs are loaded and execution starts.
pub const PROGRAM_START: u16 = 0x200;

/// Where the built-in hexadecimal glyphs live.
pub const FONT_START: u16 = 0x050;

/// Bytes per glyph in [`FONT_SPRITES`].
pub const FONT_GLYPH_SIZE: u16 = 5;

/// Both timers decay at 60 Hz of wall-clock time.
pub const TIMER_HZ: u64 = 60;

/// Minimum wall-clock gap between timer decrements.
pub const TIMER_INTERVAL: Duration = Duration::from_nanos(1_000_000_000 / TIMER_HZ);

/// Sprites for the hexadecimal digits 0..F.
///
/// Each glyph is five rows tall and four pixels wide, stored as five bytes
/// with the image in the high nibble. ROMs address them through Fx29.
pub const FONT_SPRITES: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
