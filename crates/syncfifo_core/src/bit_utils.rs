/// Single-word bit operations for shift registers and flag vectors.
pub struct BitPack;

impl BitPack {
    #[inline(always)]
    pub fn get(word: u64, index: u32) -> bool {
        (word >> index) & 1 == 1
    }

    /// Mask with the low `width` bits set. `width` may be 64.
    #[inline(always)]
    pub fn low_mask(width: u32) -> u64 {
        if width >= 64 { u64::MAX } else { (1u64 << width) - 1 }
    }

    /// Shifts `bit` into position 0 of a `width`-bit register.
    ///
    /// Returns the bit that falls out of position `width - 1`.
    #[inline(always)]
    pub fn shift_in(word: &mut u64, width: u32, bit: bool) -> bool {
        let out = Self::get(*word, width - 1);
        *word = ((*word << 1) | bit as u64) & Self::low_mask(width);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::BitPack;

    #[test]
    fn get_reads_single_bits() {
        assert!(BitPack::get(0b1000, 3));
        assert!(!BitPack::get(0b1000, 2));
        assert!(BitPack::get(u64::MAX, 63));
    }

    #[test]
    fn shift_in_drops_oldest_bit() {
        let mut w = 0u64;
        assert!(!BitPack::shift_in(&mut w, 3, true));
        assert!(!BitPack::shift_in(&mut w, 3, false));
        assert!(!BitPack::shift_in(&mut w, 3, false));
        assert_eq!(w, 0b100);
        assert!(BitPack::shift_in(&mut w, 3, false));
        assert_eq!(w, 0);
    }

    #[test]
    fn full_width_register() {
        let mut w = u64::MAX;
        assert_eq!(BitPack::low_mask(64), u64::MAX);
        assert!(BitPack::shift_in(&mut w, 64, false));
        assert_eq!(w, u64::MAX - 1);
    }
}
