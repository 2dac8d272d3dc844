/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

mod iter;
mod node;

#[cfg(test)]
mod test;

use alloc::vec::Vec;
use core::fmt::{self, Display};

use archery::{ArcK, RcK, SharedPointer, SharedPointerKind};

use crate::adapter::TupleAdapter;
use crate::error::{assert_matcher_len, RelationError};
use crate::matcher::ItemMatcher;
use node::Node;

pub use iter::FindIter;

/// A persistent, structurally-shared n-ary relation with partial-key
/// lookup (spec.md §1-§4). This is a multi-dimensional hash trie: each
/// level discriminates on one tuple dimension, rotating round-robin
/// through all of them, so a lookup that fixes any subset of dimensions
/// can prune whole branches instead of scanning every stored tuple.
///
/// # Complexity
///
/// Let *n* be the number of tuples stored and *R* the rank.
///
/// | Operation                     | Average    |
/// |:------------------------------|-----------:|
/// | `create()`                    |       Θ(1) |
/// | `add()` / `remove()`          |  Θ(log₈ n) |
/// | `find()` (one dimension fixed)|  Θ(log₈ n) |
/// | `find()` (all wildcards)      |       Θ(n) |
/// | `count()` / `is_empty()`      |       Θ(1) |
/// | `clone()`                     |       Θ(1) |
///
/// # Implementation details
///
/// See `DESIGN.md` for how this generalizes the teacher's single-dimension
/// hash array mapped trie (`HashTrieMap`) to *R* rotating dimensions with
/// an explicit-wildcard partial-key lookup, and for how the spec's
/// "mutability token" for bulk batches maps onto `SharedPointer::make_mut`.
pub struct Relation<T, A, P = RcK>
where
    A: TupleAdapter<T>,
    P: SharedPointerKind,
{
    root: SharedPointer<Node<T, P>, P>,
    adapter: A,
}

/// A [`Relation`] backed by `Arc`, safe to share its frozen snapshots
/// across threads (spec.md §5). Mirrors the teacher's `HashTrieMapSync`.
pub type RelationSync<T, A> = Relation<T, A, ArcK>;

impl<T, A> Relation<T, A, RcK>
where
    A: TupleAdapter<T>,
{
    /// Creates an empty, frozen relation over `adapter`.
    ///
    /// # Errors
    ///
    /// Returns [`RelationError::InvalidArgument`] if `adapter.rank() == 0`
    /// — a relation needs at least one dimension to rotate through
    /// (spec.md §3: "a tuple ... of `R` element values, `R ≥ 1`").
    pub fn create(adapter: A) -> Result<Relation<T, A, RcK>, RelationError> {
        Relation::create_with_ptr_kind(adapter)
    }
}

impl<T, A> RelationSync<T, A>
where
    A: TupleAdapter<T>,
{
    /// Creates an empty, frozen, `Arc`-backed relation over `adapter`. See
    /// [`Relation::create`].
    pub fn create_sync(adapter: A) -> Result<RelationSync<T, A>, RelationError> {
        Relation::create_with_ptr_kind(adapter)
    }
}

impl<T, A, P> Relation<T, A, P>
where
    A: TupleAdapter<T>,
    P: SharedPointerKind,
{
    /// Creates an empty, frozen relation with an explicit
    /// [`SharedPointerKind`]. [`Relation::create`] and
    /// [`RelationSync::create_sync`] are thin wrappers around this for the
    /// two kinds this crate names; a downstream crate supplying its own
    /// `SharedPointerKind` can call this directly.
    pub fn create_with_ptr_kind(adapter: A) -> Result<Relation<T, A, P>, RelationError> {
        if adapter.rank() == 0 {
            return Err(RelationError::InvalidArgument(alloc::string::String::from(
                "adapter rank must be at least 1",
            )));
        }

        Ok(Relation { root: SharedPointer::new(Node::empty()), adapter })
    }

    /// The adapter's rank (number of dimensions in every stored tuple).
    #[must_use]
    pub fn rank(&self) -> usize {
        self.adapter.rank()
    }

    /// Number of tuples currently stored (spec.md §4.8).
    #[must_use]
    #[inline]
    pub fn count(&self) -> usize {
        self.root.count
    }

    /// `true` if [`Relation::count`] is zero.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Returns a new relation containing every tuple of `self` plus `t`.
    /// If `t` was already present, returns a relation identical to (and,
    /// per spec.md §4.4's "Result freshness", sharing the same root
    /// allocation as) `self`.
    #[must_use]
    pub fn add(&self, t: T) -> Relation<T, A, P>
    where
        A: Clone,
    {
        let mut new_rel = self.clone();
        if new_rel.add_mut(t) {
            new_rel
        } else {
            self.clone()
        }
    }

    /// In-place version of [`Relation::add`]. Returns `true` if `t` was
    /// not already present. Used both by [`Relation::add`] (applied to a
    /// throwaway clone, the "outside a batch" case of spec.md §4.9) and
    /// directly inside a [`Relation::bulk`] callback (the "inside a
    /// batch" case) — the two share one code path because
    /// `SharedPointer::make_mut`'s refcount check already tells them apart
    /// (see `DESIGN.md`).
    pub fn add_mut(&mut self, t: T) -> bool {
        let rank = self.rank();
        SharedPointer::make_mut(&mut self.root).add_mut(t, 0, rank, &self.adapter)
    }

    /// Returns a new relation with `t` removed, if present (spec.md §4.5).
    #[must_use]
    pub fn remove(&self, t: &T) -> Relation<T, A, P>
    where
        A: Clone,
    {
        let mut new_rel = self.clone();
        if new_rel.remove_mut(t) {
            new_rel
        } else {
            self.clone()
        }
    }

    /// In-place version of [`Relation::remove`]. Returns `true` if `t` was
    /// present.
    pub fn remove_mut(&mut self, t: &T) -> bool {
        let rank = self.rank();
        SharedPointer::make_mut(&mut self.root).remove_mut(t, 0, rank, &self.adapter)
    }

    /// Returns a new relation with every tuple matched by `matchers`
    /// removed (spec.md §4.7). `matchers` must have exactly
    /// [`Relation::rank`] entries.
    #[must_use]
    pub fn remove_matching(&self, matchers: Vec<ItemMatcher<T>>) -> Relation<T, A, P>
    where
        A: Clone,
    {
        let mut new_rel = self.clone();
        if new_rel.remove_matching_mut(matchers) {
            new_rel
        } else {
            self.clone()
        }
    }

    /// In-place version of [`Relation::remove_matching`]. Returns `true`
    /// if anything was removed.
    pub fn remove_matching_mut(&mut self, matchers: Vec<ItemMatcher<T>>) -> bool {
        let rank = self.rank();
        assert_matcher_len(matchers.len(), rank);
        SharedPointer::make_mut(&mut self.root).remove_matching_mut(
            &matchers,
            0,
            rank,
            &self.adapter,
        )
    }

    /// Lazily yields every stored tuple matched by `matchers` (spec.md
    /// §4.6). `matchers` must have exactly [`Relation::rank`] entries; a
    /// fully-wildcard array is equivalent to [`Relation::iter`].
    #[must_use]
    pub fn find<'a>(&'a self, matchers: Vec<ItemMatcher<T>>) -> FindIter<'a, T, A, P> {
        FindIter::new(&self.root, &self.adapter, matchers)
    }

    /// Lazily yields every stored tuple, in this instance's stable (but
    /// otherwise unspecified) enumeration order (spec.md §4.8). Equivalent
    /// to `find(all wildcards)` (spec.md §4.6).
    #[must_use]
    pub fn iter(&self) -> FindIter<'_, T, A, P> {
        let matchers = (0..self.rank()).map(|_| ItemMatcher::Any).collect();
        FindIter::new(&self.root, &self.adapter, matchers)
    }

    /// Indexed access into this instance's stable enumeration order
    /// (spec.md §4.8).
    ///
    /// # Errors
    ///
    /// Returns [`RelationError::IndexOutOfRange`] if `i >= self.count()`.
    pub fn get(&self, i: usize) -> Result<&T, RelationError> {
        if i >= self.count() {
            return Err(RelationError::index_out_of_range(i, self.count()));
        }
        Ok(self.root.index(i))
    }

    /// Runs `f` against a temporarily-mutable view of this relation and
    /// returns the (re-frozen) result, leaving `self` untouched (spec.md
    /// §4.9). Inside `f`, call [`Relation::add_mut`],
    /// [`Relation::remove_mut`], and [`Relation::remove_matching_mut`]
    /// freely — the clone below is O(1) (a `SharedPointer` refcount bump),
    /// and every node `f` goes on to touch becomes uniquely owned by the
    /// scratch relation on first write, so subsequent writes to that same
    /// node mutate in place for the rest of the batch.
    #[must_use]
    pub fn bulk<F>(&self, f: F) -> Relation<T, A, P>
    where
        A: Clone,
        F: FnOnce(&mut Relation<T, A, P>),
    {
        let mut transient = self.clone();
        f(&mut transient);
        transient
    }
}

impl<T, A, P> Clone for Relation<T, A, P>
where
    A: TupleAdapter<T> + Clone,
    P: SharedPointerKind,
{
    /// Θ(1): clones the root pointer (a refcount bump) and the adapter
    /// (which carries no per-tuple state). This is what makes
    /// [`Relation::add`]/[`Relation::remove`]/[`Relation::bulk`] cheap to
    /// start from.
    fn clone(&self) -> Relation<T, A, P> {
        Relation { root: SharedPointer::clone(&self.root), adapter: self.adapter.clone() }
    }
}

impl<'a, T, A, P> IntoIterator for &'a Relation<T, A, P>
where
    A: TupleAdapter<T>,
    P: SharedPointerKind,
{
    type Item = &'a T;
    type IntoIter = FindIter<'a, T, A, P>;

    fn into_iter(self) -> FindIter<'a, T, A, P> {
        self.iter()
    }
}

impl<T, A, P> core::ops::Index<usize> for Relation<T, A, P>
where
    A: TupleAdapter<T>,
    P: SharedPointerKind,
{
    type Output = T;

    /// Panics with the same condition as [`Relation::get`] — mirrors the
    /// teacher's `Index` impl, which similarly turns a `None` result from
    /// its checked accessor into an `.expect()` panic.
    fn index(&self, i: usize) -> &T {
        self.get(i).expect("index out of range")
    }
}

impl<T, A, P, AO, PO> PartialEq<Relation<T, AO, PO>> for Relation<T, A, P>
where
    A: TupleAdapter<T>,
    AO: TupleAdapter<T>,
    P: SharedPointerKind,
    PO: SharedPointerKind,
{
    /// Set-equality (spec.md §8 properties are phrased in terms of
    /// "set-equal", not tuple-order-equal): same count, and every tuple of
    /// `self` is matched (by `self`'s adapter) by some tuple of `other`.
    fn eq(&self, other: &Relation<T, AO, PO>) -> bool {
        if self.count() != other.count() {
            return false;
        }

        self.iter().all(|t| other.iter().any(|o| self.adapter.equals(t, o)))
    }
}

impl<T, A, P> Eq for Relation<T, A, P>
where
    A: TupleAdapter<T>,
    P: SharedPointerKind,
{
}

impl<T, A, P> Display for Relation<T, A, P>
where
    T: Display,
    A: TupleAdapter<T>,
    P: SharedPointerKind,
{
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str("{")?;
        let mut first = true;
        for t in self.iter() {
            if !first {
                fmt.write_str(", ")?;
            }
            t.fmt(fmt)?;
            first = false;
        }
        fmt.write_str("}")
    }
}

impl<T, A, P> core::fmt::Debug for Relation<T, A, P>
where
    T: core::fmt::Debug,
    A: TupleAdapter<T>,
    P: SharedPointerKind,
{
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_list().entries(self.iter()).finish()
    }
}

impl<T, A> FromIterator<T> for Relation<T, A, RcK>
where
    A: TupleAdapter<T> + Clone + Default,
{
    /// Builds a relation from an iterator via [`Relation::bulk`], mirroring
    /// the teacher's `FromIterator` impl (a loop of `insert_mut` over a
    /// fresh map).
    fn from_iter<I: IntoIterator<Item = T>>(into_iter: I) -> Relation<T, A, RcK> {
        let empty = Relation::create(A::default()).expect("Default adapter must have rank >= 1");
        empty.bulk(|rel| {
            for t in into_iter {
                rel.add_mut(t);
            }
        })
    }
}

#[cfg(feature = "serde")]
pub mod serde {
    //! `Serialize`/`Deserialize` for [`Relation`](super::Relation), as a
    //! plain sequence of its tuples (set membership order is not part of
    //! the wire format).

    use core::fmt;
    use core::marker::PhantomData;

    use ::serde::de::{Deserialize, Deserializer, SeqAccess, Visitor};
    use ::serde::ser::{Serialize, Serializer};
    use archery::SharedPointerKind;

    use super::*;

    impl<T, A, P> Serialize for Relation<T, A, P>
    where
        T: Serialize,
        A: TupleAdapter<T>,
        P: SharedPointerKind,
    {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(self.iter())
        }
    }

    impl<'de, T, A, P> Deserialize<'de> for Relation<T, A, P>
    where
        T: Deserialize<'de>,
        A: TupleAdapter<T> + Clone + Default,
        P: SharedPointerKind,
    {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Relation<T, A, P>, D::Error> {
            deserializer.deserialize_seq(RelationVisitor {
                _phantom_t: PhantomData,
                _phantom_a: PhantomData,
                _phantom_p: PhantomData,
            })
        }
    }

    struct RelationVisitor<T, A, P: SharedPointerKind> {
        _phantom_t: PhantomData<T>,
        _phantom_a: PhantomData<A>,
        _phantom_p: PhantomData<P>,
    }

    impl<'de, T, A, P> Visitor<'de> for RelationVisitor<T, A, P>
    where
        T: Deserialize<'de>,
        A: TupleAdapter<T> + Clone + Default,
        P: SharedPointerKind,
    {
        type Value = Relation<T, A, P>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a sequence of tuples")
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Relation<T, A, P>, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut relation = Relation::create_with_ptr_kind(A::default())
                .map_err(|e| <S::Error as ::serde::de::Error>::custom(e))?;

            while let Some(t) = seq.next_element()? {
                relation.add_mut(t);
            }

            Ok(relation)
        }
    }
}
