/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use core::hash::{BuildHasher, Hash, Hasher};

use crate::error::assert_dim_in_range;
use crate::utils::DefaultBuildHasher;

/// Per-dimension equality and hashing for a caller-chosen tuple type `T`.
///
/// A relation never compares or hashes a whole tuple except through this
/// trait (Design Notes, "Adapter variance"): callers may supply a
/// comparer that makes distinct-object tuples equal, and the trie must
/// honor that everywhere, never falling back to `T`'s own `PartialEq`/
/// `Hash` impl (which may not even exist).
///
/// # Invariant
///
/// For any `a`, `b`: `equals(a, b)` implies `item_equals(a, b, d)` and
/// `item_hash(a, d) == item_hash(b, d)` for every `d` in `[0, rank())`.
/// Implementations that break this invariant will not corrupt the trie
/// (it never assumes whole-tuple consistency beyond what it observes) but
/// will make `find`/`remove` behave as if two "equal" tuples were
/// distinct.
pub trait TupleAdapter<T> {
    /// The tuple's arity. Must be at least 1 and must never change for a
    /// given adapter value — a [`Relation`](crate::Relation) calls this
    /// once at construction and assumes it is stable for the adapter's
    /// lifetime.
    fn rank(&self) -> usize;

    /// Full-tuple equality.
    fn equals(&self, a: &T, b: &T) -> bool;

    /// Equality restricted to dimension `dim`.
    ///
    /// # Panics
    ///
    /// Implementations should panic (conventionally via
    /// [`RelationError::InvalidDimension`](crate::error::RelationError))
    /// if `dim >= self.rank()`; the trie itself never calls with an
    /// out-of-range dimension, so this only guards misuse from a
    /// hand-written caller of the trait.
    fn item_equals(&self, a: &T, b: &T, dim: usize) -> bool;

    /// Hash of dimension `dim` alone.
    ///
    /// # Panics
    ///
    /// See [`TupleAdapter::item_equals`].
    fn item_hash(&self, a: &T, dim: usize) -> u64;
}

/// A [`TupleAdapter`] built from "natural" equality and hashing
/// (`T: Eq + Hash`) for every dimension, generated for tuples of rank 1
/// through 4 by the macro below. This is the default most callers reach
/// for; anything needing a custom per-dimension comparer (case-insensitive
/// strings, floating point with an epsilon, ...) implements
/// [`TupleAdapter`] directly instead of using this type.
#[derive(Debug, Clone, Default)]
pub struct NaturalAdapter<H = DefaultBuildHasher> {
    hasher_builder: H,
}

impl NaturalAdapter<DefaultBuildHasher> {
    #[must_use]
    pub fn new() -> Self {
        NaturalAdapter { hasher_builder: DefaultBuildHasher::default() }
    }
}

impl<H: BuildHasher> NaturalAdapter<H> {
    #[must_use]
    pub fn with_hasher(hasher_builder: H) -> Self {
        NaturalAdapter { hasher_builder }
    }

    fn hash_of<V: ?Sized + Hash>(&self, v: &V) -> u64 {
        let mut hasher = self.hasher_builder.build_hasher();
        v.hash(&mut hasher);
        hasher.finish()
    }
}

macro_rules! natural_adapter_for_tuple {
    ($rank:expr; $( ($idx:tt, $ty:ident) ),+ ) => {
        impl<H, $( $ty ),+> TupleAdapter<( $( $ty, )+ )> for NaturalAdapter<H>
        where
            H: BuildHasher,
            $( $ty: Eq + Hash ),+
        {
            fn rank(&self) -> usize {
                $rank
            }

            fn equals(&self, a: &( $( $ty, )+ ), b: &( $( $ty, )+ )) -> bool {
                a == b
            }

            fn item_equals(&self, a: &( $( $ty, )+ ), b: &( $( $ty, )+ ), dim: usize) -> bool {
                assert_dim_in_range(dim, $rank);
                match dim {
                    $( $idx => a.$idx == b.$idx, )+
                    _ => unreachable!("checked above"),
                }
            }

            fn item_hash(&self, a: &( $( $ty, )+ ), dim: usize) -> u64 {
                assert_dim_in_range(dim, $rank);
                match dim {
                    $( $idx => self.hash_of(&a.$idx), )+
                    _ => unreachable!("checked above"),
                }
            }
        }
    };
}

natural_adapter_for_tuple!(1; (0, A));
natural_adapter_for_tuple!(2; (0, A), (1, B));
natural_adapter_for_tuple!(3; (0, A), (1, B), (2, C));
natural_adapter_for_tuple!(4; (0, A), (1, B), (2, C), (3, D));
