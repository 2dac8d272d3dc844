/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use crate::adapter::TupleAdapter;

/// A per-dimension predicate used to express a partial key.
///
/// A full key is an array of `rank` matchers, one per dimension; a fully
/// wildcarded array (`[ItemMatcher::Any; rank]`) is equivalent to
/// enumerating every stored tuple (spec.md §4.6).
#[derive(Debug, Clone)]
pub enum ItemMatcher<T> {
    /// Matches any value in this dimension.
    Any,
    /// Matches only tuples whose value at this dimension equals the
    /// corresponding dimension of `example`. Only `example`'s own
    /// dimension is ever inspected; the rest of `example` is carried
    /// along purely so the matcher owns a real `T` to hand to the
    /// adapter.
    Equals(T),
}

impl<T> ItemMatcher<T> {
    /// `true` for [`ItemMatcher::Any`].
    #[must_use]
    pub fn matches_everything(&self) -> bool {
        matches!(self, ItemMatcher::Any)
    }

    /// The hash a non-wildcard matcher's dimension would produce, i.e.
    /// `adapter.item_hash(example, dim)`.
    ///
    /// # Panics
    ///
    /// Panics if called on [`ItemMatcher::Any`] — a wildcard has no single
    /// bucket to key on, so callers must check
    /// [`ItemMatcher::matches_everything`] first (this mirrors how the
    /// trie itself always branches on that check before ever computing a
    /// key hash).
    pub fn key_hash<A: TupleAdapter<T>>(&self, dim: usize, adapter: &A) -> u64 {
        match self {
            ItemMatcher::Any => panic!("key_hash() called on a wildcard matcher"),
            ItemMatcher::Equals(example) => adapter.item_hash(example, dim),
        }
    }

    /// `true` for a wildcard; for `Equals(example)`, whether `tuple`
    /// agrees with `example` at dimension `dim` under `adapter`.
    pub fn matches<A: TupleAdapter<T>>(&self, tuple: &T, dim: usize, adapter: &A) -> bool {
        match self {
            ItemMatcher::Any => true,
            ItemMatcher::Equals(example) => adapter.item_equals(tuple, example, dim),
        }
    }
}

/// Returns `true` if `tuple` satisfies every matcher in `matchers`, across
/// all dimensions (not just one). Used by `find` to filter the inline
/// tuple of a visited bucket, and by the partial-key `remove` to decide
/// whether a bucket's inline tuple must be evicted.
pub(crate) fn matches_all<T, A: TupleAdapter<T>>(
    matchers: &[ItemMatcher<T>],
    tuple: &T,
    adapter: &A,
) -> bool {
    matchers.iter().enumerate().all(|(dim, m)| m.matches(tuple, dim, adapter))
}

#[cfg(test)]
mod test {
    use alloc::vec;

    use super::*;
    use crate::adapter::NaturalAdapter;

    #[test]
    fn any_matches_everything() {
        let m: ItemMatcher<(i32, i32)> = ItemMatcher::Any;
        assert!(m.matches_everything());
    }

    #[test]
    fn equals_matches_only_its_dimension() {
        let adapter = NaturalAdapter::new();
        let m = ItemMatcher::Equals((1, 999));
        assert!(!m.matches_everything());
        assert!(m.matches(&(1, 2), 0, &adapter));
        assert!(!m.matches(&(2, 2), 0, &adapter));
    }

    #[test]
    fn matches_all_requires_every_dimension() {
        let adapter = NaturalAdapter::new();
        let matchers = vec![ItemMatcher::Equals((1, 0)), ItemMatcher::Any];
        assert!(matches_all(&matchers, &(1, 5), &adapter));
        assert!(!matches_all(&matchers, &(2, 5), &adapter));
    }

    #[test]
    #[should_panic(expected = "wildcard matcher")]
    fn key_hash_on_any_panics() {
        let adapter = NaturalAdapter::new();
        let m: ItemMatcher<(i32, i32)> = ItemMatcher::Any;
        m.key_hash(0, &adapter);
    }
}
