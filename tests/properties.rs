/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use std::collections::BTreeSet;

use quickcheck_macros::quickcheck;
use reltrie::{ItemMatcher, NaturalAdapter, Relation};

type Pair = (i32, i32);

fn relation_of(tuples: &[Pair]) -> Relation<Pair, NaturalAdapter> {
    let mut r = Relation::create(NaturalAdapter::new()).unwrap();
    for &t in tuples {
        r.add_mut(t);
    }
    r
}

fn as_set(tuples: &[Pair]) -> BTreeSet<Pair> {
    tuples.iter().copied().collect()
}

#[quickcheck]
fn add_is_idempotent(tuples: Vec<Pair>, t: Pair) -> bool {
    let r = relation_of(&tuples);
    let once = r.add(t);
    let twice = once.add(t);
    once.count() == twice.count() && once == twice
}

#[quickcheck]
fn remove_is_idempotent(tuples: Vec<Pair>, t: Pair) -> bool {
    let r = relation_of(&tuples);
    let once = r.remove(&t);
    let twice = once.remove(&t);
    once == twice
}

#[quickcheck]
fn add_then_remove_is_identity_when_absent(tuples: Vec<Pair>, t: Pair) -> bool {
    if as_set(&tuples).contains(&t) {
        return true; // precondition not met, vacuously fine
    }

    let r = relation_of(&tuples);
    let round_tripped = r.add(t).remove(&t);
    round_tripped == r
}

#[quickcheck]
fn wildcard_find_is_full_enumeration(tuples: Vec<Pair>) -> bool {
    let r = relation_of(&tuples);
    let via_find: BTreeSet<Pair> =
        r.find(vec![ItemMatcher::Any, ItemMatcher::Any]).copied().collect();
    let via_iter: BTreeSet<Pair> = r.iter().copied().collect();
    via_find == via_iter && via_find == as_set(&tuples)
}

#[quickcheck]
fn partial_find_is_sound_and_complete(tuples: Vec<Pair>, pivot: i32) -> bool {
    let r = relation_of(&tuples);
    let matchers = vec![ItemMatcher::Equals((pivot, 0)), ItemMatcher::Any];
    let found: BTreeSet<Pair> = r.find(matchers).copied().collect();

    let expected: BTreeSet<Pair> =
        as_set(&tuples).into_iter().filter(|t| t.0 == pivot).collect();

    found == expected
}

#[quickcheck]
fn partial_remove_equals_set_difference_with_find(tuples: Vec<Pair>, pivot: i32) -> bool {
    let r = relation_of(&tuples);
    let matchers = || vec![ItemMatcher::Equals((pivot, 0)), ItemMatcher::Any];

    let matched: BTreeSet<Pair> = r.find(matchers()).copied().collect();
    let removed = r.remove_matching(matchers());
    let remaining: BTreeSet<Pair> = removed.iter().copied().collect();

    let expected: BTreeSet<Pair> =
        as_set(&tuples).difference(&matched).copied().collect();

    remaining == expected
}

#[quickcheck]
fn count_matches_enumeration_length(tuples: Vec<Pair>) -> bool {
    let r = relation_of(&tuples);
    r.count() == r.iter().count() && r.is_empty() == (r.count() == 0)
}

#[quickcheck]
fn add_does_not_mutate_the_source(tuples: Vec<Pair>, t: Pair) -> bool {
    let r = relation_of(&tuples);
    let before: BTreeSet<Pair> = r.iter().copied().collect();
    let _ = r.add(t);
    let after: BTreeSet<Pair> = r.iter().copied().collect();
    before == after
}

#[quickcheck]
fn bulk_matches_sequential_adds(tuples: Vec<Pair>, extra: Vec<Pair>) -> bool {
    let r0 = relation_of(&tuples);

    let bulked = r0.bulk(|r| {
        for &t in &extra {
            r.add_mut(t);
        }
    });

    let mut sequential = r0.clone();
    for &t in &extra {
        sequential = sequential.add(t);
    }

    bulked == sequential
}
