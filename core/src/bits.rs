//! Width-parameterized arithmetic with explicit carry and borrow reporting.
//!
//! Register math is 8 bits wide and address math is 12; both need the
//! overflow behavior of the original hardware, so the width is always an
//! explicit argument rather than a property of the integer type.

/// Adds `x` and `y`, keeping `width` bits of the sum.
/// Also returns whether the unmasked sum overflowed the width.
pub fn add(width: u32, x: u16, y: u16) -> (u16, bool) {
    let max = (1u32 << width) - 1;
    let sum = u32::from(x) + u32::from(y);
    ((sum & max) as u16, sum > max)
}

/// Subtracts `y` from `x`, keeping `width` bits of the difference.
/// Also returns whether the subtraction completed without borrowing.
pub fn sub(width: u32, x: u16, y: u16) -> (u16, bool) {
    let max = (1i32 << width) - 1;
    let difference = i32::from(x) - i32::from(y);
    ((difference & max) as u16, difference >= 0)
}

/// Isolates the bit of `value` at `place` (0 is the least significant).
pub fn extract_bit(place: u32, value: u8) -> u8 {
    (value >> place) & 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_8bit_masks_and_carries() {
        assert_eq!(add(8, 0xAB, 0xCD), (0x78, true));
        assert_eq!(add(8, 0x01, 0x02), (0x03, false));
        assert_eq!(add(8, 0xFF, 0x01), (0x00, true));
    }

    #[test]
    fn test_add_12bit_wraps_addresses() {
        assert_eq!(add(12, 0xFFE, 0x0FF), (0x0FD, true));
        assert_eq!(add(12, 0xFF0, 0x0FF), (0x0EF, true));
        assert_eq!(add(12, 0x200, 0x0FF), (0x2FF, false));
    }

    #[test]
    fn test_add_8bit_matches_modular_arithmetic() {
        for x in 0..=0xFFu16 {
            for y in 0..=0xFFu16 {
                assert_eq!(add(8, x, y), ((x + y) % 0x100, x + y > 0xFF));
            }
        }
    }

    #[test]
    fn test_sub_8bit_reports_no_borrow() {
        assert_eq!(sub(8, 0xCD, 0xAB), (0x22, true));
        assert_eq!(sub(8, 0xAB, 0xCD), (0xDE, false));
        assert_eq!(sub(8, 0x10, 0x10), (0x00, true));
    }

    #[test]
    fn test_sub_8bit_matches_modular_arithmetic() {
        for x in 0..=0xFFi32 {
            for y in 0..=0xFFi32 {
                let expected = ((x - y).rem_euclid(0x100) as u16, x >= y);
                assert_eq!(sub(8, x as u16, y as u16), expected);
            }
        }
    }

    #[test]
    fn test_extract_bit() {
        assert_eq!(extract_bit(0, 0b0000_0001), 1);
        assert_eq!(extract_bit(7, 0b1000_0000), 1);
        assert_eq!(extract_bit(3, 0b1111_0111), 0);
        assert_eq!(extract_bit(6, 0b0100_0000), 1);
    }
}
