//! End-to-end tests covering the map and ranking facade's public API:
//! overwrite-in-place, rewinding across inserts and deletes, sortedness and
//! red-black validity under deletion, and rollback on the ranking facade.

use rbtree_history::{PersistentMap, PlayerRegistry, UNKNOWN_RATING};

fn in_order(map: &PersistentMap<i32, i32>) -> Vec<i32> {
    // Point queries only: reconstruct order via repeated min-above-last-seen,
    // since range iteration is out of scope for the public API.
    let mut out = Vec::new();
    let mut floor: Option<i32> = None;
    loop {
        let next = match floor {
            None => map.min().map(|(k, _)| *k),
            Some(f) => smallest_above(map, f),
        };
        match next {
            Some(k) => {
                out.push(k);
                floor = Some(k);
            }
            None => break,
        }
    }
    out
}

/// Smallest key strictly greater than `floor`, found by probing upward one
/// key at a time starting from `floor + 1` -- adequate for these small,
/// densely-keyed test scenarios.
fn smallest_above(map: &PersistentMap<i32, i32>, floor: i32) -> Option<i32> {
    let max = map.max()?.0;
    let mut candidate = floor + 1;
    while candidate <= *max {
        if map.search(&candidate).is_some() {
            return Some(candidate);
        }
        candidate += 1;
    }
    None
}

#[test]
fn insert_overwrite_then_rewind_twice() {
    let mut map: PersistentMap<String, i32> = PersistentMap::new();
    *map.insert("1".to_string()) = 100;
    *map.insert("1".to_string()) = 200;
    assert_eq!(map.search(&"1".to_string()), Some(&200));

    map.rewind(1).unwrap();
    assert_eq!(map.search(&"1".to_string()), Some(&100));

    map.rewind(1).unwrap();
    assert_eq!(map.search(&"1".to_string()), None);
}

#[test]
fn interleaved_inserts_rewind_to_empty() {
    let mut map: PersistentMap<String, i32> = PersistentMap::new();
    *map.insert("2".to_string()) = 300;
    *map.insert("1".to_string()) = 400;
    assert_eq!(map.search(&"1".to_string()), Some(&400));
    assert_eq!(map.search(&"2".to_string()), Some(&300));

    map.rewind(2).unwrap();
    assert_eq!(map.search(&"1".to_string()), None);
    assert_eq!(map.search(&"2".to_string()), None);
}

#[test]
fn sorted_after_mixed_inserts_and_rewind() {
    let mut map: PersistentMap<i32, i32> = PersistentMap::new();
    for k in [16, 8, 4, 12, 24, 20, 28] {
        *map.insert(k) = k;
    }
    assert_eq!(in_order(&map), vec![4, 8, 12, 16, 20, 24, 28]);

    // rewind(4) from version 7 lands on version 3, i.e. right after the
    // first three inserts (16, 8, 4).
    map.rewind(4).unwrap();
    assert_eq!(in_order(&map), vec![4, 8, 16]);
}

#[test]
fn delete_half_then_rewind_restores_full_map() {
    let mut map: PersistentMap<i32, i32> = PersistentMap::new();
    for k in [16, 8, 12, 4, 24, 20, 28] {
        *map.insert(k) = k;
    }
    for k in [4, 20, 24, 28] {
        assert!(map.delete(&k));
        assert!(map.debug_check_sorted());
        assert!(map.debug_check_red_black());
        assert_eq!(in_order(&map), {
            let mut remaining: Vec<i32> = [16, 8, 12, 4, 24, 20, 28]
                .into_iter()
                .filter(|rem| map.search(rem).is_some())
                .collect();
            remaining.sort_unstable();
            remaining.dedup();
            remaining
        });
    }

    map.rewind(4).unwrap();
    assert_eq!(in_order(&map), vec![4, 8, 12, 16, 20, 24, 28]);
}

#[test]
fn delete_and_reinsert_across_rewind() {
    let mut map: PersistentMap<i32, i32> = PersistentMap::new();
    *map.insert(1) = 1;
    *map.insert(2) = 2;
    assert!(map.delete(&1));
    assert!(map.delete(&2));

    map.rewind(1).unwrap();
    assert_eq!(map.search(&1), None);
    assert_eq!(map.search(&2), Some(&2));

    *map.insert(2) = 22;
    map.rewind(4).unwrap();
    assert_eq!(map.search(&1), None);
    assert_eq!(map.search(&2), None);

    *map.insert(2) = 222;
    assert_eq!(map.search(&2), Some(&222));
}

#[test]
fn ranking_facade_rollback_restores_earlier_ratings() {
    let mut registry = PlayerRegistry::new();
    registry.register_player_result("A", 1000);
    registry.register_player_result("B", 2000);

    registry.rollback(1).unwrap();
    assert_eq!(registry.get_player_rating("A"), 1000);
    assert_eq!(registry.get_player_rating("B"), UNKNOWN_RATING);

    registry.register_player_result("A", 3000);
    registry.register_player_result("B", 4000);

    registry.rollback(1).unwrap();
    assert_eq!(registry.get_player_rating("A"), 3000);
    assert_eq!(registry.get_player_rating("B"), UNKNOWN_RATING);

    registry.rollback(2).unwrap();
    assert_eq!(registry.get_player_rating("A"), UNKNOWN_RATING);
    assert_eq!(registry.get_player_rating("B"), UNKNOWN_RATING);
}
