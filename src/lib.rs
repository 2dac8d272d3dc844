/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! A persistent (immutable, structurally-shared) n-ary relation with
//! partial-key lookup, backed by a hash trie that rotates which tuple
//! dimension it discriminates on from one trie level to the next.
//!
//! This generalizes the single-key hash array mapped trie that backs an
//! ordinary persistent map (one dimension, the key) to a fixed-rank tuple
//! where *any* dimension, or any combination of dimensions, can drive a
//! lookup that prunes branches instead of scanning every stored tuple.
//!
//! ```
//! use reltrie::{ItemMatcher, NaturalAdapter, Relation};
//!
//! let r0 = Relation::create(NaturalAdapter::new()).unwrap();
//! let r1 = r0.add((1, "sloth"));
//! let r2 = r1.add((2, "toucan"));
//!
//! assert_eq!(r0.count(), 0);
//! assert_eq!(r2.count(), 2);
//!
//! let found: Vec<_> =
//!     r2.find(vec![ItemMatcher::Equals((1, "")), ItemMatcher::Any]).collect();
//! assert_eq!(found, vec![&(1, "sloth")]);
//! ```
//!
//! # Feature flags
//!
//! * `std` (default): use `std`'s `RandomState` as the default hasher
//!   builder for [`NaturalAdapter`]. Without it, a small FNV-1a fallback is
//!   used instead (see `utils::ahash_substitute`); either way, a caller can
//!   always supply their own `BuildHasher` via
//!   [`NaturalAdapter::with_hasher`].
//! * `serde`: `Serialize`/`Deserialize` for [`Relation`].

#![no_std]
#![warn(missing_docs)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod adapter;
mod error;
mod matcher;
mod relation;
mod utils;

pub use adapter::{NaturalAdapter, TupleAdapter};
pub use error::RelationError;
pub use matcher::ItemMatcher;
pub use relation::{FindIter, Relation, RelationSync};
