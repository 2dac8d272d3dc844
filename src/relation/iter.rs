/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use archery::SharedPointerKind;

use super::node::{bucket_index, dim_at, level_at, Node, BRANCHING};
use crate::adapter::TupleAdapter;
use crate::error::assert_matcher_len;
use crate::matcher::ItemMatcher;

/// Lazy, partial-key lookup over a [`Relation`](crate::Relation) (spec.md
/// §4.6). Built with an explicit work stack rather than recursion so a
/// deep trie cannot blow the call stack, mirroring the teacher's
/// `IterPtr`, which drives its own stack-based descent for the very same
/// reason.
pub struct FindIter<'a, T, A, P: SharedPointerKind> {
    adapter: &'a A,
    // Owned rather than borrowed: `find`/`iter` hand this iterator a
    // freshly-built matcher array (a full-wildcard one for plain
    // enumeration), so there is no caller-owned slice to borrow from.
    matchers: Vec<ItemMatcher<T>>,
    rank: usize,
    // Nodes still to be visited, paired with their depth (dim/level are
    // derived from depth — see `dim_at`/`level_at`).
    stack: Vec<(&'a Node<T, P>, usize)>,
    // Tuples already found at the current bucket but not yet yielded. A
    // single bucket visit can surface at most one match, but a small queue
    // keeps `next()` uniform regardless of how many buckets a wildcard
    // dimension fans out to in one step.
    pending: VecDeque<&'a T>,
}

impl<'a, T, A, P> FindIter<'a, T, A, P>
where
    A: TupleAdapter<T>,
    P: SharedPointerKind,
{
    pub(crate) fn new(root: &'a Node<T, P>, adapter: &'a A, matchers: Vec<ItemMatcher<T>>) -> Self {
        let rank = adapter.rank();
        assert_matcher_len(matchers.len(), rank);

        let mut stack = Vec::new();
        if root.count > 0 {
            stack.push((root, 0));
        }

        FindIter { adapter, matchers, rank, stack, pending: VecDeque::new() }
    }

    fn visit_next_node(&mut self) {
        let (node, depth) = match self.stack.pop() {
            Some(top) => top,
            None => return,
        };

        let dim = dim_at(depth, self.rank);
        let level = level_at(depth, self.rank);
        let m = &self.matchers[dim];

        let indices: Vec<usize> = if m.matches_everything() {
            (0..BRANCHING).collect()
        } else {
            // Single-bucket pruning: the whole point of the structure
            // (spec.md §4.6).
            alloc::vec![bucket_index(m.key_hash(dim, self.adapter), level)]
        };

        for idx in indices {
            let bucket = &node.buckets()[idx];

            if let Some(item) = &bucket.item {
                if self.matchers.iter().enumerate().all(|(d, mm)| mm.matches(item, d, self.adapter))
                {
                    self.pending.push_back(item);
                }
            }

            if let Some(child) = &bucket.child {
                self.stack.push((child, depth + 1));
            }
        }
    }
}

impl<'a, T, A, P> Iterator for FindIter<'a, T, A, P>
where
    A: TupleAdapter<T>,
    P: SharedPointerKind,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        loop {
            if let Some(t) = self.pending.pop_front() {
                return Some(t);
            }
            if self.stack.is_empty() {
                return None;
            }
            self.visit_next_node();
        }
    }
}
