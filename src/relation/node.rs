/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use alloc::vec::Vec;

use archery::{SharedPointer, SharedPointerKind};

use crate::adapter::TupleAdapter;
use crate::matcher::{matches_all, ItemMatcher};
use crate::utils::mix_with_level;

/// Branching factor (spec.md §4.3: `B = 8`, `log2 B = 3` hash bits consumed
/// per level within a dimension).
pub(crate) const BRANCHING: usize = 8;

/// `dim` at recursion depth `depth` for a relation of the given `rank`
/// (spec.md §4.3's rotation rule, stated as a pure function of depth
/// instead of a field stored on every node — see `DESIGN.md`).
#[inline]
pub(crate) fn dim_at(depth: usize, rank: usize) -> usize {
    depth % rank
}

/// `level` at recursion depth `depth` for a relation of the given `rank`.
#[inline]
pub(crate) fn level_at(depth: usize, rank: usize) -> usize {
    depth / rank
}

#[inline]
pub(crate) fn bucket_index(dim_hash: u64, level: usize) -> usize {
    // spec.md §4.3: `(hash >> (S * level)) mod B`. Here `level` is folded
    // into the hash itself first (see `mix_with_level`), this crate's
    // resolution of the hash-exhaustion Open Question, so the
    // shift-by-level of the original formula collapses to a plain mask of
    // the mixed hash's low bits.
    let mixed = mix_with_level(dim_hash, level);
    (mixed as usize) % BRANCHING
}

/// One bucket of a [`Node`]: an optional inline tuple and an optional child
/// subtree (spec.md §3, "Relation node").
pub(crate) struct Bucket<T, P: SharedPointerKind> {
    pub(crate) item: Option<SharedPointer<T, P>>,
    pub(crate) child: Option<SharedPointer<Node<T, P>, P>>,
}

impl<T, P: SharedPointerKind> Bucket<T, P> {
    const fn empty() -> Self {
        Bucket { item: None, child: None }
    }
}

impl<T, P: SharedPointerKind> Clone for Bucket<T, P> {
    fn clone(&self) -> Self {
        Bucket { item: self.item.clone(), child: self.child.clone() }
    }
}

/// A node of the persistent relation trie (spec.md §3, "Relation node").
///
/// `dim` and `level` are deliberately absent as fields — see
/// [`dim_at`]/[`level_at`] and `DESIGN.md`. Every recursive method below
/// takes the current `depth` and the relation's fixed `rank` explicitly,
/// mirroring how the teacher's `Node::insert`/`Node::remove` thread
/// `depth` and `degree` through instead of storing them.
///
/// Tuples are always held behind `SharedPointer<T, P>` and moved between
/// buckets by cloning that pointer (a refcount bump), never by cloning
/// `T` itself — the same discipline the teacher uses for `Entry<K, V>` —
/// so `T` need not implement `Clone` for any operation here.
pub(crate) struct Node<T, P: SharedPointerKind> {
    pub(crate) count: usize,
    buckets: [Bucket<T, P>; BRANCHING],
}

impl<T, P: SharedPointerKind> Node<T, P> {
    pub(crate) fn empty() -> Self {
        Node {
            count: 0,
            buckets: [
                Bucket::empty(),
                Bucket::empty(),
                Bucket::empty(),
                Bucket::empty(),
                Bucket::empty(),
                Bucket::empty(),
                Bucket::empty(),
                Bucket::empty(),
            ],
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub(crate) fn buckets(&self) -> &[Bucket<T, P>; BRANCHING] {
        &self.buckets
    }

    /// Indexed access into this subtree (spec.md §4.8): buckets
    /// `0..BRANCHING`, inline tuple first, then the child's tuples in the
    /// same order.
    pub(crate) fn index(&self, mut i: usize) -> &T {
        for bucket in &self.buckets {
            if let Some(item) = &bucket.item {
                if i == 0 {
                    return item;
                }
                i -= 1;
            }
            if let Some(child) = &bucket.child {
                if i < child.count {
                    return child.index(i);
                }
                i -= child.count;
            }
        }
        panic!("index out of range (caller must check against count first)")
    }

    /// Removes and returns the first tuple in indexed order from this
    /// subtree, if any, moving only the `SharedPointer` (never cloning
    /// `T`). Used to promote a survivor into a bucket whose inline slot
    /// was just vacated (spec.md §4.5, §4.7 — "pick any tuple from the
    /// child... the design uses the child's indexed element `[0]`").
    fn take_first(&mut self) -> Option<SharedPointer<T, P>> {
        for bucket in &mut self.buckets {
            if let Some(item) = bucket.item.take() {
                self.count -= 1;
                return Some(item);
            }
            if let Some(child_ptr) = &mut bucket.child {
                let child = SharedPointer::make_mut(child_ptr);
                if let Some(promoted) = child.take_first() {
                    self.count -= 1;
                    if child.is_empty() {
                        bucket.child = None;
                    }
                    return Some(promoted);
                }
            }
        }
        None
    }
}

impl<T, P: SharedPointerKind> Clone for Node<T, P> {
    fn clone(&self) -> Self {
        Node { count: self.count, buckets: self.buckets.clone() }
    }
}

impl<T, P: SharedPointerKind> Node<T, P> {
    /// Adds `t` to the subtree rooted at `self`. Returns `true` if the
    /// tuple was not already present (spec.md §4.4).
    pub(crate) fn add_mut<A: TupleAdapter<T>>(
        &mut self,
        t: T,
        depth: usize,
        rank: usize,
        adapter: &A,
    ) -> bool {
        let dim = dim_at(depth, rank);
        let level = level_at(depth, rank);
        let idx = bucket_index(adapter.item_hash(&t, dim), level);
        let bucket = &mut self.buckets[idx];

        match &bucket.item {
            None => {
                bucket.item = Some(SharedPointer::new(t));
                self.count += 1;
                true
            }
            Some(existing) if adapter.equals(existing, &t) => false,
            Some(_) => {
                let grew = match &mut bucket.child {
                    None => {
                        // Inline-displacement rule: the existing inline
                        // tuple is never moved; the *new* tuple goes into
                        // a freshly-created child (spec.md §4.4).
                        let mut child = Node::empty();
                        child.add_mut(t, depth + 1, rank, adapter);
                        bucket.child = Some(SharedPointer::new(child));
                        true
                    }
                    Some(child_ptr) => {
                        SharedPointer::make_mut(child_ptr).add_mut(t, depth + 1, rank, adapter)
                    }
                };

                if grew {
                    self.count += 1;
                }

                grew
            }
        }
    }

    /// Removes `t` from the subtree rooted at `self` if present. Returns
    /// `true` if it was (spec.md §4.5).
    pub(crate) fn remove_mut<A: TupleAdapter<T>>(
        &mut self,
        t: &T,
        depth: usize,
        rank: usize,
        adapter: &A,
    ) -> bool {
        let dim = dim_at(depth, rank);
        let level = level_at(depth, rank);
        let idx = bucket_index(adapter.item_hash(t, dim), level);
        let bucket = &mut self.buckets[idx];

        let is_target = match &bucket.item {
            None => return false,
            Some(existing) => adapter.equals(existing, t),
        };

        if is_target {
            match &mut bucket.child {
                None => {
                    bucket.item = None;
                }
                Some(child_ptr) => {
                    let child = SharedPointer::make_mut(child_ptr);
                    bucket.item = child.take_first();

                    if child.is_empty() {
                        bucket.child = None;
                    }
                }
            }

            self.count -= 1;
            true
        } else {
            match &mut bucket.child {
                None => false,
                Some(child_ptr) => {
                    let child = SharedPointer::make_mut(child_ptr);
                    let removed = child.remove_mut(t, depth + 1, rank, adapter);

                    if removed {
                        if child.is_empty() {
                            bucket.child = None;
                        }
                        self.count -= 1;
                    }

                    removed
                }
            }
        }
    }

    /// Applies a partial-key removal at this node, recursing into every
    /// bucket the matcher for this node's dimension selects (spec.md
    /// §4.7). Returns `true` if anything was removed from this subtree.
    pub(crate) fn remove_matching_mut<A: TupleAdapter<T>>(
        &mut self,
        matchers: &[ItemMatcher<T>],
        depth: usize,
        rank: usize,
        adapter: &A,
    ) -> bool {
        let old_count = self.count;
        let dim = dim_at(depth, rank);
        let level = level_at(depth, rank);
        let m = &matchers[dim];

        let indices: Vec<usize> = if m.matches_everything() {
            (0..BRANCHING).collect()
        } else {
            alloc::vec![bucket_index(m.key_hash(dim, adapter), level)]
        };

        for idx in indices {
            let bucket = &mut self.buckets[idx];

            let fully_matches = match &bucket.item {
                Some(item) => matches_all(matchers, item, adapter),
                None => false,
            };

            if fully_matches {
                match &mut bucket.child {
                    None => {
                        bucket.item = None;
                    }
                    Some(child_ptr) => {
                        let child = SharedPointer::make_mut(child_ptr);
                        child.remove_matching_mut(matchers, depth + 1, rank, adapter);
                        bucket.item = child.take_first();

                        if child.is_empty() {
                            bucket.child = None;
                        }
                    }
                }
            } else if let Some(child_ptr) = &mut bucket.child {
                let child = SharedPointer::make_mut(child_ptr);
                child.remove_matching_mut(matchers, depth + 1, rank, adapter);

                if child.is_empty() {
                    bucket.child = None;
                }
            }
        }

        // Recomputed rather than tracked incrementally: a partial-key
        // remove can touch every bucket at this level in one call, and
        // rebuilding from spec.md §3 invariant 1 directly (`count == sum
        // of occupied buckets + child counts`) is both cheap (B = 8) and
        // immune to the off-by-one bugs that incremental diffing across a
        // promotion invites.
        self.count = self
            .buckets
            .iter()
            .map(|b| usize::from(b.item.is_some()) + b.child.as_ref().map_or(0, |c| c.count))
            .sum();

        self.count != old_count
    }
}
