//! Writes: set, add, insert_at, move_to, remove and remove_all.

use std::collections::BTreeMap;

use propbag::{Store, StoreError, Value};

use crate::helpers::*;

#[test]
fn test_set_appends_new_keys_in_order() {
    let store = Store::new();
    store.set("b", 1);
    store.set("a", 2);
    store.set("b", 3);
    assert_keys(&store, &["b", "a"]);
    assert_eq!(store.get("b"), 3);
}

#[test]
fn test_set_returns_resulting_value() {
    let store = Store::new();
    assert_eq!(store.set("name", "Alice"), "Alice");
}

#[test]
fn test_set_many_applies_in_order() {
    let store = Store::new();
    let returned = store.set_many([("x", 1), ("y", 2), ("x", 3)]);
    assert_eq!(returned, &store);
    assert_keys(&store, &["x", "y"]);
    assert_eq!(store.get("x"), 3);
}

#[test]
fn test_set_by_position() {
    let store = store_with(&[("a", 1), ("b", 2)]);
    store.set(1, 20);
    assert_eq!(store.get("b"), 20);
    assert_keys(&store, &["a", "b"]);

    // Out of range positions become keys of their own
    store.set(7, "seven");
    assert_keys(&store, &["a", "b", "7"]);
}

#[test]
fn test_set_empty_name_is_ignored() {
    let store = Store::new();
    store.set("", 1);
    store.set("   ", 1);
    store.set("..", 1);
    assert!(store.is_empty());
}

#[test]
fn test_set_nested_path_writes_into_containers() {
    let child = Store::from_pairs([("name", "Alice")]);
    let mut meta = BTreeMap::new();
    meta.insert("kind".to_string(), Value::from("user"));

    let store = Store::new();
    store.set("child", &child);
    store.set("meta", meta);
    store.set("tags", vec!["a", "b"]);

    store.set("child.name", "Bob");
    store.set("meta.owner", "root");
    store.set("tags[0]", "z");
    store.set("tags[2]", "c");

    assert_eq!(child.get("name"), "Bob");
    assert_eq!(store.get("meta.owner"), "root");
    assert_eq!(store.get("meta.kind"), "user");
    assert_eq!(store.get("tags"), Value::from(vec!["z", "b", "c"]));
    assert_keys(&store, &["child", "meta", "tags"]);
}

#[test]
fn test_set_nested_path_with_missing_parent_is_dropped() {
    let store = store_with(&[("a", 1)]);
    store.set("missing.key", 1);
    store.set("tags[5]", 1);
    store.set("a.deeper", 2);
    assert_keys(&store, &["a"]);
    assert_eq!(store.get("a"), 1);
}

#[test]
fn test_add_mints_increasing_keys() {
    let store = Store::new();
    store.add(["a", "b"]);
    assert_keys(&store, &["0", "1"]);
    assert_eq!(store.get("0"), "a");
    assert_eq!(store.get(1), "b");
}

#[test]
fn test_minted_keys_are_never_reused() {
    let store = Store::new();
    store.add(["first"]);
    store.add(["second"]);
    store.remove(["0"]);
    store.add(["third"]);
    assert_keys(&store, &["1", "2"]);
}

#[test]
fn test_reserve_minted_keys_skips_saved_range() {
    let store = store_with(&[("0", 1), ("5", 2)]);
    store.reserve_minted_keys(6);
    store.add(["next"]);
    assert_keys(&store, &["0", "5", "6"]);

    store.reserve_minted_keys(2);
    store.add(["after"]);
    assert_keys(&store, &["0", "5", "6", "7"]);
}

#[test]
fn test_minted_keys_skip_names_in_use() {
    let store = Store::new();
    store.set("1", "named");
    store.add(["minted"]);
    assert_keys(&store, &["1", "2"]);
    assert_eq!(store.get("1"), "named");
}

#[test]
fn test_insert_at_position_and_key() {
    let store = store_with(&[("a", 1), ("b", 2), ("c", 3)]);
    store.insert_at(1, ["x", "y"]);
    assert_keys(&store, &["a", "3", "4", "b", "c"]);

    store.insert_at("c", ["z"]);
    assert_keys(&store, &["a", "3", "4", "b", "5", "c"]);
    assert_eq!(store.get("5"), "z");
}

#[test]
fn test_insert_at_unresolvable_appends() {
    let store = store_with(&[("a", 1)]);
    store.insert_at(10, ["x"]);
    store.insert_at(-1, ["y"]);
    store.insert_at("nope", ["z"]);
    assert_keys(&store, &["a", "1", "2", "3"]);
}

#[test]
fn test_move_to() {
    let store = store_with(&[("a", 1), ("b", 2), ("c", 3), ("d", 4)]);

    store.move_to("a", 2).expect("Failed to move a");
    assert_keys(&store, &["b", "c", "a", "d"]);

    store.move_to(-1, 0).expect("Failed to move last");
    assert_keys(&store, &["d", "b", "c", "a"]);

    store.move_to("b", "a").expect("Failed to move b");
    assert_keys(&store, &["d", "c", "a", "b"]);
}

#[test]
fn test_move_to_unresolvable_target() {
    let store = store_with(&[("a", 1), ("b", 2), ("c", 3)]);

    store.move_to("a", 99).expect("Failed to move to end");
    assert_keys(&store, &["b", "c", "a"]);

    store.move_to("a", -99).expect("Failed to move to front");
    assert_keys(&store, &["a", "b", "c"]);

    store.move_to("b", "nope").expect("Failed to move to end");
    assert_keys(&store, &["a", "c", "b"]);
}

#[test]
fn test_move_to_same_position_is_noop() {
    let store = store_with(&[("a", 1), ("b", 2)]);
    store.move_to("b", -1).expect("Failed to move");
    assert_keys(&store, &["a", "b"]);
}

#[test]
fn test_move_to_invalid_source_fails() {
    let store = store_with(&[("a", 1)]);
    let err = store.move_to("nope", 0).unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(
        err,
        propbag::Error::Store(StoreError::IndexNotFound { ref index }) if index == "nope"
    ));
    assert!(store.move_to(5, 0).unwrap_err().is_not_found());
    assert_keys(&store, &["a"]);
}

#[test]
fn test_move_to_extreme_positions() {
    let store = store_with(&[("a", 1), ("b", 2)]);
    assert!(store.move_to(i64::MIN, 0).unwrap_err().is_not_found());
    assert!(store.move_to(i64::MAX, 0).unwrap_err().is_not_found());

    store.move_to("a", i64::MIN).expect("Failed to move to front");
    assert_keys(&store, &["a", "b"]);
    store.move_to("a", i64::MAX).expect("Failed to move to end");
    assert_keys(&store, &["b", "a"]);
}

#[test]
fn test_insert_then_move_to_end() {
    let store = store_with(&[("a", 1), ("b", 2)]);
    store.insert_at(0, ["z"]);
    assert_keys(&store, &["2", "a", "b"]);
    store.move_to(0, -1).expect("Failed to move");
    assert_keys(&store, &["a", "b", "2"]);
    assert_eq!(store.get(2), "z");
}

#[test]
fn test_move_does_not_fire_listeners() {
    let store = store_with(&[("a", 1), ("b", 2)]);
    let (hook, calls) = recording_listener();
    store
        .add_listener_with(propbag::Targets::Global, hook, false)
        .expect("Failed to add listener");
    store.move_to("a", "b").expect("Failed to move");
    assert!(calls.borrow().is_empty());
}

#[test]
fn test_remove_by_name_and_position() {
    let store = store_with(&[("a", 1), ("b", 2), ("c", 3), ("d", 4)]);
    store.remove(["b"]);
    assert_keys(&store, &["a", "c", "d"]);

    store.remove([0]);
    assert_keys(&store, &["c", "d"]);

    store.remove(["c", "d", "missing"]);
    assert!(store.is_empty());
}

#[test]
fn test_remove_absent_is_noop() {
    let store = store_with(&[("a", 1)]);
    let (hook, calls) = recording_listener();
    store
        .add_listener_with(propbag::Targets::Global, hook, false)
        .expect("Failed to add listener");
    store.remove(["missing"]);
    store.remove([9]);
    assert_keys(&store, &["a"]);
    assert!(calls.borrow().is_empty());
}

#[test]
fn test_remove_all_keeps_counter() {
    let store = Store::new();
    store.add(["a", "b", "c"]);
    store.remove_all();
    assert!(store.is_empty());
    assert_eq!(store.get("0"), "");

    store.add(["d"]);
    assert_keys(&store, &["3"]);
}
