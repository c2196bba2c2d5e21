use crate::bits;
use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, SPRITE_WIDTH};

/// # FrameBuffer
/// The 64x32 monochrome display, indexed as `[y][x]` with one byte per cell
/// holding 0 or 1.
///
/// Cells change in exactly two ways: a whole-buffer clear, or an XOR blit of
/// an 8-pixel-wide sprite. Blitting reports collisions so the draw
/// instruction can set the flag register.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    cells: [[u8; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer {
            cells: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
        }
    }

    /// Zeroes every cell.
    pub fn clear(&mut self) {
        self.cells = [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
    }

    /// XORs a sprite onto the buffer at `(x, y)`: one byte per row, most
    /// significant bit leftmost. Coordinates wrap at both edges rather than
    /// clipping. Returns whether any lit cell was erased by the blit.
    pub fn blit(&mut self, x: u8, y: u8, rows: &[u8]) -> bool {
        let mut collision = false;
        for (dy, &row) in rows.iter().enumerate() {
            let y = (y as usize + dy) % DISPLAY_HEIGHT;
            for dx in 0..SPRITE_WIDTH {
                let x = (x as usize + dx) % DISPLAY_WIDTH;
                let bit = bits::extract_bit((SPRITE_WIDTH - 1 - dx) as u32, row);
                collision |= bit & self.cells[y][x] == 1;
                self.cells[y][x] ^= bit;
            }
        }
        collision
    }

    /// The raw cells, indexed `[y][x]`.
    pub fn rows(&self) -> &[[u8; DISPLAY_WIDTH]; DISPLAY_HEIGHT] {
        &self.cells
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
