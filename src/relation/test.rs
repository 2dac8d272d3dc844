/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use alloc::vec;
use alloc::vec::Vec;

use archery::RcK;
use pretty_assertions::{assert_eq, assert_ne};

use super::*;
use crate::adapter::NaturalAdapter;

fn empty_pairs() -> Relation<(i32, i32), NaturalAdapter> {
    Relation::create(NaturalAdapter::new()).unwrap()
}

#[test]
fn create_rejects_rank_zero() {
    struct RankZero;
    impl TupleAdapter<()> for RankZero {
        fn rank(&self) -> usize {
            0
        }
        fn equals(&self, _a: &(), _b: &()) -> bool {
            true
        }
        fn item_equals(&self, _a: &(), _b: &(), _dim: usize) -> bool {
            true
        }
        fn item_hash(&self, _a: &(), _dim: usize) -> u64 {
            0
        }
    }

    assert!(Relation::<(), RankZero, RcK>::create_with_ptr_kind(RankZero).is_err());
}

#[test]
fn create_is_empty() {
    let r = empty_pairs();
    assert_eq!(r.count(), 0);
    assert!(r.is_empty());
}

#[test]
fn add_is_persistent() {
    let r0 = empty_pairs();
    let r1 = r0.add((1, 2));

    assert_eq!(r0.count(), 0, "r0 must be unaffected by r1's creation");
    assert_eq!(r1.count(), 1);
    assert_eq!(r1.get(0).unwrap(), &(1, 2));
}

#[test]
fn add_duplicate_is_a_no_op() {
    let r0 = empty_pairs().add((1, 2));
    let r1 = r0.add((1, 2));
    assert_eq!(r1.count(), 1);
}

#[test]
fn add_many_and_remove_one() {
    let mut r = empty_pairs();
    for i in 0..200 {
        r.add_mut((i, i * 2));
    }
    assert_eq!(r.count(), 200);

    let removed = r.remove(&(57, 114));
    assert_eq!(removed.count(), 199);
    assert!(removed.find(vec![ItemMatcher::Equals((57, 0)), ItemMatcher::Any]).next().is_none());
    // original untouched
    assert_eq!(r.count(), 200);
}

#[test]
fn remove_absent_is_a_no_op() {
    let r0 = empty_pairs().add((1, 2));
    let r1 = r0.remove(&(9, 9));
    assert_eq!(r1.count(), 1);
}

#[test]
fn find_prunes_on_either_dimension() {
    let mut r = empty_pairs();
    for i in 0..50 {
        r.add_mut((i % 5, i));
    }

    let by_first: Vec<_> = r.find(vec![ItemMatcher::Equals((2, 0)), ItemMatcher::Any]).collect();
    assert_eq!(by_first.len(), 10);
    assert!(by_first.iter().all(|t| t.0 == 2));

    let by_second: Vec<_> = r.find(vec![ItemMatcher::Any, ItemMatcher::Equals((0, 17))]).collect();
    assert_eq!(by_second, vec![&(2, 17)]);
}

#[test]
fn find_all_wildcards_matches_iter() {
    let mut r = empty_pairs();
    for i in 0..30 {
        r.add_mut((i, -i));
    }

    let mut via_find: Vec<_> =
        r.find(vec![ItemMatcher::Any, ItemMatcher::Any]).map(|t| *t).collect();
    let mut via_iter: Vec<_> = r.iter().map(|t| *t).collect();
    via_find.sort_unstable();
    via_iter.sort_unstable();
    assert_eq!(via_find, via_iter);
}

#[test]
fn remove_matching_removes_a_whole_slice() {
    let mut r = empty_pairs();
    for i in 0..40 {
        r.add_mut((i % 4, i));
    }

    let trimmed = r.remove_matching(vec![ItemMatcher::Equals((1, 0)), ItemMatcher::Any]);
    assert_eq!(trimmed.count(), 30);
    assert!(trimmed.find(vec![ItemMatcher::Equals((1, 0)), ItemMatcher::Any]).next().is_none());
}

#[test]
fn bulk_does_not_affect_the_source_relation() {
    let base = empty_pairs().add((1, 1)).add((2, 2));

    let grown = base.bulk(|rel| {
        rel.add_mut((3, 3));
        rel.add_mut((4, 4));
        rel.remove_mut(&(1, 1));
    });

    assert_eq!(base.count(), 2);
    assert_eq!(grown.count(), 3);
    assert!(grown.find(vec![ItemMatcher::Equals((1, 0)), ItemMatcher::Any]).next().is_none());
}

#[test]
fn get_and_index_agree_and_cover_the_whole_count() {
    let mut r = empty_pairs();
    for i in 0..25 {
        r.add_mut((i, i));
    }

    let mut seen: Vec<(i32, i32)> = (0..r.count()).map(|i| r[i]).collect();
    seen.sort_unstable();
    let expected: Vec<(i32, i32)> = (0..25).map(|i| (i, i)).collect();
    assert_eq!(seen, expected);
}

#[test]
fn get_out_of_range_errors() {
    let r = empty_pairs().add((1, 1));
    assert!(r.get(1).is_err());
    assert!(r.get(0).is_ok());
}

#[test]
#[should_panic(expected = "index out of range")]
fn index_out_of_range_panics() {
    let r = empty_pairs().add((1, 1));
    let _ = r[5];
}

#[test]
fn clone_is_cheap_and_independent() {
    let r0 = empty_pairs().add((1, 1));
    let r1 = r0.clone();
    let r2 = r1.add((2, 2));

    assert_eq!(r0.count(), 1);
    assert_eq!(r1.count(), 1);
    assert_eq!(r2.count(), 2);
}

#[test]
fn equality_is_set_equality() {
    let mut a = empty_pairs();
    let mut b = empty_pairs();
    for i in 0..10 {
        a.add_mut((i, i * i));
    }
    for i in (0..10).rev() {
        b.add_mut((i, i * i));
    }
    assert_eq!(a, b);

    let c = b.add((99, 99));
    assert_ne!(a, c);
}

#[test]
fn from_iterator_builds_the_same_relation_as_manual_adds() {
    let from_iter: Relation<(i32, i32), NaturalAdapter> =
        (0..20).map(|i| (i, i + 1)).collect();
    let mut manual = empty_pairs();
    for i in 0..20 {
        manual.add_mut((i, i + 1));
    }
    assert_eq!(from_iter, manual);
}

#[test]
fn display_lists_every_tuple() {
    let r = empty_pairs().add((1, 2));
    let rendered = alloc::format!("{}", r);
    assert_eq!(rendered, "{(1, 2)}");
}
