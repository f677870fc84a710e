//! Byte, word and bit reordering applied uniformly to every buffer access.

/// Combination of reordering transforms between a logical big-endian buffer
/// and the physical bytes the hardware expects.
///
/// A mode must stay the same for every access to a given buffer; packing with
/// one mode and unpacking with another reads garbage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutMode {
    /// Swap the four bytes inside each 32-bit word.
    pub little_endian: bool,
    /// Mirror bit positions inside every byte (bit 7 becomes bit 0).
    pub msb_on_the_right: bool,
    /// Reverse the order of the 32-bit words across the buffer.
    pub lsw32_is_first: bool,
}

impl LayoutMode {
    /// Plain big-endian, no transform.
    pub const BIG_ENDIAN: LayoutMode = LayoutMode {
        little_endian: false,
        msb_on_the_right: false,
        lsw32_is_first: false,
    };

    /// Memory convention of the SJA1105 static configuration area.
    pub const SJA1105: LayoutMode = LayoutMode {
        little_endian: false,
        msb_on_the_right: false,
        lsw32_is_first: true,
    };

    pub const fn with_little_endian(mut self, on: bool) -> Self {
        self.little_endian = on;
        self
    }

    pub const fn with_msb_on_the_right(mut self, on: bool) -> Self {
        self.msb_on_the_right = on;
        self
    }

    pub const fn with_lsw32_is_first(mut self, on: bool) -> Self {
        self.lsw32_is_first = on;
        self
    }

    /// All eight combinations, mostly useful for exhaustive tests.
    pub fn all() -> impl Iterator<Item = LayoutMode> {
        (0u8..8).map(|bits| LayoutMode {
            little_endian: bits & 1 != 0,
            msb_on_the_right: bits & 2 != 0,
            lsw32_is_first: bits & 4 != 0,
        })
    }

    /// Whether the mode reorders whole 32-bit words or bytes inside them,
    /// which only makes sense on buffers that are a multiple of 4 bytes.
    pub const fn is_word_based(&self) -> bool {
        self.little_endian || self.lsw32_is_first
    }

    /// Maps the logical byte address of a big-endian buffer to the physical one.
    pub(crate) fn physical_address(&self, logical: usize, len: usize) -> usize {
        let mut addr = logical;

        if self.little_endian {
            let word = addr / 4 * 4;
            addr = word + (3 - (addr - word));
        }

        if self.lsw32_is_first {
            let word_index = addr / 4;
            let within = addr % 4;
            addr = (len / 4 - word_index - 1) * 4 + within;
        }

        addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let mode = LayoutMode::BIG_ENDIAN;
        for i in 0..8 {
            assert_eq!(mode.physical_address(i, 8), i);
        }
    }

    #[test]
    fn test_little_endian_swaps_within_word() {
        let mode = LayoutMode::BIG_ENDIAN.with_little_endian(true);
        let mapped: Vec<usize> = (0..8).map(|i| mode.physical_address(i, 8)).collect();
        assert_eq!(mapped, vec![3, 2, 1, 0, 7, 6, 5, 4]);
    }

    #[test]
    fn test_lsw32_reverses_words() {
        let mode = LayoutMode::SJA1105;
        let mapped: Vec<usize> = (0..12).map(|i| mode.physical_address(i, 12)).collect();
        assert_eq!(mapped, vec![8, 9, 10, 11, 4, 5, 6, 7, 0, 1, 2, 3]);
    }

    #[test]
    fn test_both_word_transforms() {
        let mode = LayoutMode::SJA1105.with_little_endian(true);
        let mapped: Vec<usize> = (0..8).map(|i| mode.physical_address(i, 8)).collect();
        assert_eq!(mapped, vec![7, 6, 5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_all_modes_distinct() {
        let modes: Vec<LayoutMode> = LayoutMode::all().collect();
        assert_eq!(modes.len(), 8);
        for (i, a) in modes.iter().enumerate() {
            for b in &modes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
