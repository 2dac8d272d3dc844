/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

/// The three misuse conditions a [`Relation`](crate::Relation) can report.
///
/// None of these are recoverable runtime errors in the usual sense — there
/// is no I/O and no external resource behind this crate, so every variant
/// here corresponds to a programmer mistake (a malformed adapter, a
/// mismatched matcher array, or an index past the end). Most call sites
/// raise these through a `panic!` carrying this type's `Display` text
/// rather than threading a `Result` through every recursive trie call;
/// the exceptions are the handful of entry points (`Relation::create`,
/// indexed `get`) where returning a `Result` costs nothing and spares the
/// caller a panic for an input they may not control (e.g. an index read
/// from user input).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RelationError {
    /// A constructor or call received an argument that can never be valid,
    /// independent of any particular tuple (an adapter of rank 0, a
    /// matcher array whose length does not equal the adapter's rank, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(alloc::string::String),

    /// A [`TupleAdapter`](crate::TupleAdapter) method was asked about a
    /// dimension outside `[0, rank)`.
    #[error("dimension {dim} out of range for rank {rank}")]
    InvalidDimension {
        /// The dimension index that was requested.
        dim: usize,
        /// The adapter's rank (number of valid dimensions is `[0, rank)`).
        rank: usize,
    },

    /// Indexed access (`relation[i]`) was attempted with `i` outside
    /// `[0, count)`.
    #[error("index {index} out of range for relation of length {count}")]
    IndexOutOfRange {
        /// The index that was requested.
        index: usize,
        /// The number of tuples currently stored in the relation.
        count: usize,
    },
}

impl RelationError {
    pub(crate) fn invalid_dimension(dim: usize, rank: usize) -> Self {
        RelationError::InvalidDimension { dim, rank }
    }

    pub(crate) fn index_out_of_range(index: usize, count: usize) -> Self {
        RelationError::IndexOutOfRange { index, count }
    }

    fn matcher_len_mismatch(len: usize, rank: usize) -> Self {
        RelationError::InvalidArgument(alloc::format!(
            "matcher array length ({len}) must equal the adapter's rank ({rank})"
        ))
    }
}

/// Helper used at the few points where a precondition violation can only
/// come from a caller-written [`TupleAdapter`](crate::TupleAdapter) (never
/// from this crate's own recursion, which always calls with a dimension it
/// derived from the adapter's own declared rank).
#[inline]
pub(crate) fn assert_dim_in_range(dim: usize, rank: usize) {
    if dim >= rank {
        panic!("{}", RelationError::invalid_dimension(dim, rank));
    }
}

/// Helper used wherever a caller-supplied matcher array must have exactly
/// one entry per dimension — a hand-built array, not this crate's own
/// recursion, is the only way this can be violated.
#[inline]
pub(crate) fn assert_matcher_len(len: usize, rank: usize) {
    if len != rank {
        panic!("{}", RelationError::matcher_len_mismatch(len, rank));
    }
}
