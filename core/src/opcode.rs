use std::fmt;

/// # Opcode
/// One 16-bit instruction word.
///
/// Dispatch is cased on some combination of nibbles:
/// - `(n, _, _, _)` selects the instruction family
/// - `(_, _, _, n)`, `(_, _, n, n)`, or `(_, n, n, n)` select behavior
///   within a family
///
/// Nibbles not used for dispatch carry operands:
/// - `(_, n, n, n)` a 12-bit address (`nnn`)
/// - `(_, _, n, n)` an immediate byte (`nn`)
/// - `(_, n, _, _)` the register index `x`
/// - `(_, _, n, _)` the register index `y`
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Opcode(u16);

impl Opcode {
    pub fn new(word: u16) -> Self {
        Opcode(word)
    }

    /// The raw instruction word.
    pub fn word(self) -> u16 {
        self.0
    }

    /// The component nibbles, most significant first.
    pub fn nibbles(self) -> (u8, u8, u8, u8) {
        (((self.0 & 0xF000) >> 12) as u8, self.x(), self.y(), self.n())
    }

    /// The register index in the second nibble.
    /// `[_x__]`
    pub fn x(self) -> u8 {
        ((self.0 & 0x0F00) >> 8) as u8
    }

    /// The register index in the third nibble.
    /// `[__y_]`
    pub fn y(self) -> u8 {
        ((self.0 & 0x00F0) >> 4) as u8
    }

    /// The low nibble.
    /// `[___n]`
    pub fn n(self) -> u8 {
        (self.0 & 0x000F) as u8
    }

    /// The low byte.
    /// `[__nn]`
    pub fn nn(self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    /// The low twelve bits.
    /// `[_nnn]`
    pub fn nnn(self) -> u16 {
        self.0 & 0x0FFF
    }
}

impl fmt::Debug for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opcode({:04X})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nibbles() {
        assert_eq!(Opcode::new(0xABCD).nibbles(), (0xA, 0xB, 0xC, 0xD));
    }

    #[test]
    fn test_x() {
        assert_eq!(Opcode::new(0xABCD).x(), 0xB);
    }

    #[test]
    fn test_y() {
        assert_eq!(Opcode::new(0xABCD).y(), 0xC);
    }

    #[test]
    fn test_n() {
        assert_eq!(Opcode::new(0xABCD).n(), 0xD);
    }

    #[test]
    fn test_nn() {
        assert_eq!(Opcode::new(0xABCD).nn(), 0xCD);
    }

    #[test]
    fn test_nnn() {
        assert_eq!(Opcode::new(0xABCD).nnn(), 0x0BCD);
    }
}
