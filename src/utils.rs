/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

/// The hasher builder used when a caller does not supply their own (see
/// [`NaturalAdapter`](crate::adapter::NaturalAdapter)).
#[cfg(feature = "std")]
pub type DefaultBuildHasher = std::collections::hash_map::RandomState;

#[cfg(not(feature = "std"))]
pub type DefaultBuildHasher = core::hash::BuildHasherDefault<ahash_substitute::FnvHasher>;

#[cfg(not(feature = "std"))]
mod ahash_substitute {
    //! A tiny FNV-1a fallback so the crate still has *a* `BuildHasher`
    //! without `std`. Callers that care about DoS-resistant hashing
    //! should supply their own `BuildHasher` via
    //! `NaturalAdapter::with_hasher` regardless of this default.
    use core::hash::Hasher;

    #[derive(Default)]
    pub struct FnvHasher(u64);

    impl Hasher for FnvHasher {
        fn finish(&self) -> u64 {
            self.0
        }

        fn write(&mut self, bytes: &[u8]) {
            const FNV_PRIME: u64 = 0x0000_0100_0000_01B3;
            let mut hash = if self.0 == 0 { 0xcbf2_9ce4_8422_2325 } else { self.0 };
            for byte in bytes {
                hash ^= u64::from(*byte);
                hash = hash.wrapping_mul(FNV_PRIME);
            }
            self.0 = hash;
        }
    }
}

/// Mixes a per-dimension hash with the current trie level so that every
/// `(dimension, level)` pair draws from an effectively independent 64-bit
/// stream. This is what lets the trie keep slicing 3 fresh bits per level
/// indefinitely instead of exhausting the dimension's raw hash after about
/// ten levels (spec's Open Question, option (b); see `DESIGN.md`).
///
/// This is the public-domain SplitMix64 finalizer (Steele, Lea & Flood,
/// 2014), applied to `hash ^ (level's own avalanche)` rather than to a
/// monotonic counter.
#[inline]
pub(crate) fn mix_with_level(hash: u64, level: usize) -> u64 {
    let mut z = hash ^ splitmix64(level as u64);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[inline]
fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn mix_with_level_is_deterministic() {
        assert_eq!(mix_with_level(42, 3), mix_with_level(42, 3));
    }

    #[test]
    fn mix_with_level_separates_levels() {
        assert_ne!(mix_with_level(42, 3), mix_with_level(42, 4));
    }

    #[test]
    fn mix_with_level_separates_hashes() {
        assert_ne!(mix_with_level(42, 3), mix_with_level(43, 3));
    }
}
