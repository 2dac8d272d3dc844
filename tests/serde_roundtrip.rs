/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

#![cfg(feature = "serde")]

use reltrie::{NaturalAdapter, Relation};

#[test]
fn round_trips_through_json_as_a_set_of_tuples() {
    let mut built = Relation::create(NaturalAdapter::new()).unwrap();
    for i in 0..40 {
        built.add_mut((i, i * i));
    }

    let json = serde_json::to_string(&built).unwrap();
    let restored: Relation<(i32, i32), NaturalAdapter> = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, built);
    assert_eq!(restored.count(), built.count());
}

#[test]
fn empty_relation_round_trips() {
    let empty: Relation<(i32, i32), NaturalAdapter> =
        Relation::create(NaturalAdapter::new()).unwrap();

    let json = serde_json::to_string(&empty).unwrap();
    assert_eq!(json, "[]");

    let restored: Relation<(i32, i32), NaturalAdapter> = serde_json::from_str(&json).unwrap();
    assert!(restored.is_empty());
}
