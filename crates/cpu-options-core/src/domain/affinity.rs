//! Affinity mask arithmetic.
//!
//! An affinity mask is a bitset where bit `n` set means "logical core `n` may
//! run this process".  Windows exposes it as a pointer-sized integer; Linux as
//! a `cpu_set_t`.  The plugin only ever cares about the first 64 cores, so a
//! `u64` covers both.

use std::fmt;

/// A bitset of logical CPU cores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AffinityMask(pub u64);

impl AffinityMask {
    /// Mask with only `core` set.  Cores at or above 64 are not representable
    /// and yield an empty mask.
    pub fn single(core: u32) -> Self {
        Self(1u64.checked_shl(core).unwrap_or(0))
    }

    pub fn bits(self) -> u64 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of cores in the mask.
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    pub fn contains(self, core: u32) -> bool {
        core < u64::BITS && self.0 & (1u64 << core) != 0
    }

    /// Returns a mask containing only the lowest-numbered core of `self`,
    /// or `None` for an empty mask.
    ///
    /// `0b1010` yields `0b0010`.  Two's complement makes `x & -x` isolate the
    /// lowest set bit.
    pub fn lowest_set_bit(self) -> Option<AffinityMask> {
        if self.is_empty() {
            None
        } else {
            Some(Self(self.0 & self.0.wrapping_neg()))
        }
    }

    /// Iterates over the core indices in ascending order.
    pub fn cores(self) -> impl Iterator<Item = u32> {
        (0..u64::BITS).filter(move |&core| self.contains(core))
    }
}

impl From<u64> for AffinityMask {
    fn from(bits: u64) -> Self {
        Self(bits)
    }
}

impl FromIterator<u32> for AffinityMask {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self(iter.into_iter().fold(0, |acc, core| acc | Self::single(core).0))
    }
}

impl fmt::Display for AffinityMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#b}", self.0)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowest_set_bit_picks_first_available_core() {
        // Cores 1 and 3 available -> core 1.
        assert_eq!(
            AffinityMask(0b1010).lowest_set_bit(),
            Some(AffinityMask(0b0010))
        );
    }

    #[test]
    fn test_lowest_set_bit_of_empty_mask_is_none() {
        assert_eq!(AffinityMask(0).lowest_set_bit(), None);
    }

    #[test]
    fn test_lowest_set_bit_handles_top_bit() {
        let top = AffinityMask(1 << 63);
        assert_eq!(top.lowest_set_bit(), Some(top));
    }

    #[test]
    fn test_lowest_set_bit_always_yields_single_core_inside_mask() {
        // Exhaustive over the first 16 bits plus a few wide masks.
        let wide = [u64::MAX, 0xFFFF_0000_0000_0000, 0x8000_0000_0000_0001];
        for bits in (1u64..=0xFFFF).chain(wide) {
            let mask = AffinityMask(bits);
            let chosen = mask.lowest_set_bit().unwrap();
            assert_eq!(chosen.count(), 1, "mask {mask}");
            assert_eq!(chosen.0 & bits, chosen.0, "mask {mask}");
            assert_eq!(chosen.0.trailing_zeros(), bits.trailing_zeros(), "mask {mask}");
        }
    }

    #[test]
    fn test_single_out_of_range_is_empty() {
        assert!(AffinityMask::single(64).is_empty());
        assert_eq!(AffinityMask::single(5), AffinityMask(0b100000));
    }

    #[test]
    fn test_cores_and_from_iter_agree() {
        let mask: AffinityMask = [0u32, 2, 7].into_iter().collect();
        assert_eq!(mask, AffinityMask(0b1000_0101));
        assert_eq!(mask.cores().collect::<Vec<_>>(), vec![0, 2, 7]);
        assert!(mask.contains(2));
        assert!(!mask.contains(1));
        assert!(!mask.contains(64));
    }
}
