//! Write hooks: listener chains, replay on registration and removal vetoes.

use std::{cell::RefCell, rc::Rc};

use propbag::{Locator, Store, Targets, Value, store::listener};

use crate::helpers::*;

fn uppercase() -> Rc<dyn propbag::Listener> {
    listener(|_, _, _, new| new.as_text().map(|s| Value::from(s.to_uppercase())))
}

/// Restores the previous value whenever an empty value is written
fn veto() -> Rc<dyn propbag::Listener> {
    listener(|_, _, old, new| new.is_empty().then(|| old.clone()))
}

#[test]
fn test_listener_sees_old_and_new_values() {
    let store = Store::new();
    let (hook, calls) = recording_listener();
    store.add_listener("k", hook).expect("Failed to add listener");

    store.set("k", 1);
    store.set("k", 2);
    store.set("other", 3);

    assert_eq!(
        *calls.borrow(),
        vec![
            ("k".to_string(), Value::empty(), Value::from(1)),
            ("k".to_string(), Value::from(1), Value::from(2)),
        ]
    );
}

#[test]
fn test_listener_replaces_stored_value() {
    let store = Store::new();
    store.add_listener("name", uppercase()).expect("Failed to add listener");

    assert_eq!(store.set("name", "alice"), "ALICE");
    assert_raw(&store, "name", "ALICE");
    store.set("other", "bob");
    assert_raw(&store, "other", "bob");
}

#[test]
fn test_chain_runs_specific_then_global_in_registration_order() {
    let store = Store::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    store
        .add_listener(Targets::Global, tagging_listener("global1", &log))
        .expect("Failed to add listener");
    store
        .add_listener("a", tagging_listener("own1", &log))
        .expect("Failed to add listener");
    store
        .add_listener(Targets::Global, tagging_listener("global2", &log))
        .expect("Failed to add listener");
    store
        .add_listener("a", tagging_listener("own2", &log))
        .expect("Failed to add listener");

    store.set("a", 1);
    store.set("b", 2);

    assert_eq!(
        *log.borrow(),
        vec!["own1:a", "own2:a", "global1:a", "global2:a", "global1:b", "global2:b"]
    );
}

#[test]
fn test_chain_folds_replacements() {
    let store = Store::new();
    store
        .add_listener("n", listener(|_, _, _, new| new.as_int().map(|n| Value::from(n + 1))))
        .expect("Failed to add listener");
    store
        .add_listener(
            Targets::Global,
            listener(|_, _, _, new| new.as_int().map(|n| Value::from(n * 10))),
        )
        .expect("Failed to add listener");

    assert_eq!(store.set("n", 1), 20);
}

#[test]
fn test_unchanged_replacement_does_not_resurrect_removed_key() {
    let store = Store::new();
    store
        .add_listener(
            "x",
            listener(|store, property, _, new| {
                if new == "drop" {
                    store.remove([property]);
                }
                Some(new.clone())
            }),
        )
        .expect("Failed to add listener");

    store.set("x", "drop");
    assert!(!store.exists("x"));
}

#[test]
fn test_changed_replacement_after_removal_is_not_stored() {
    let store = Store::new();
    store
        .add_listener(
            "x",
            listener(|store, property, _, new| {
                if new == "drop" {
                    store.remove([property]);
                }
                None
            }),
        )
        .expect("Failed to add listener");
    store
        .add_listener("x", uppercase())
        .expect("Failed to add listener");

    store.set("x", "drop");
    assert!(!store.exists("x"));
    assert_keys(&store, &[]);
}

#[test]
fn test_apply_to_existing_replays_current_values() {
    let store = Store::from_pairs([("name", "alice"), ("city", "oslo")]);
    let (hook, calls) = recording_listener();
    store.add_listener("name", hook).expect("Failed to add listener");
    assert_eq!(
        *calls.borrow(),
        vec![("name".to_string(), Value::empty(), Value::from("alice"))]
    );

    store
        .add_listener(Targets::Global, uppercase())
        .expect("Failed to add listener");
    assert_raw(&store, "name", "ALICE");
    assert_raw(&store, "city", "OSLO");
}

#[test]
fn test_apply_to_existing_skips_rest_of_chain() {
    let store = Store::from_pairs([("a", 1)]);
    let (global, calls) = recording_listener();
    store
        .add_listener(Targets::Global, global)
        .expect("Failed to add listener");
    calls.borrow_mut().clear();

    store
        .add_listener("a", listener(|_, _, _, _| Some(Value::from(99))))
        .expect("Failed to add listener");
    assert_raw(&store, "a", 99);
    assert!(calls.borrow().is_empty());
}

#[test]
fn test_apply_to_existing_can_be_disabled() {
    let store = Store::from_pairs([("a", "x")]);
    store
        .add_listener_with("a", uppercase(), false)
        .expect("Failed to add listener");
    assert_raw(&store, "a", "x");
    store.set("a", "y");
    assert_raw(&store, "a", "Y");
}

#[test]
fn test_replay_ignores_missing_targets() {
    let store = Store::new();
    let (hook, calls) = recording_listener();
    store.add_listener("later", hook).expect("Failed to add listener");
    assert!(calls.borrow().is_empty());
    store.set("later", 1);
    assert_eq!(calls.borrow().len(), 1);
}

#[test]
fn test_duplicate_registration_is_ignored() {
    let store = Store::new();
    let (hook, calls) = recording_listener();
    let first = store.add_listener("a", hook.clone()).expect("Failed to add listener");
    let second = store.add_listener("a", hook).expect("Failed to add listener");
    assert_eq!(first, second);

    store.set("a", 1);
    assert_eq!(calls.borrow().len(), 1);
}

#[test]
fn test_comma_separated_and_positional_targets() {
    let store = store_with(&[("a", 1), ("b", 2), ("c", 3)]);
    let (hook, calls) = recording_listener();
    store
        .add_listener_with("a, b", hook.clone(), false)
        .expect("Failed to add listener");
    store
        .add_listener_with(vec![Locator::from(2)], hook, false)
        .expect("Failed to add listener");

    store.set_many([("a", 10), ("b", 20), ("c", 30)]);
    let touched: Vec<String> = calls.borrow().iter().map(|(p, _, _)| p.clone()).collect();
    assert_eq!(touched, vec!["a", "b", "c"]);
}

#[test]
fn test_invalid_targets_are_rejected() {
    let store = store_with(&[("a", 1)]);
    let (hook, _) = recording_listener();

    let err = store
        .add_listener(Targets::Properties(vec![]), hook.clone())
        .unwrap_err();
    assert!(err.is_validation_error());

    let err = store
        .add_listener(vec![Locator::from("a"), Locator::from(5)], hook.clone())
        .unwrap_err();
    assert!(err.is_validation_error());

    let err = store.add_listener(i64::MIN, hook).unwrap_err();
    assert!(err.is_validation_error());
    assert_eq!(store.listener_count(), 0);
}

#[test]
fn test_remove_listener() {
    let store = Store::new();
    let (hook, calls) = recording_listener();
    let id = store.add_listener_with("a,b", hook, false).expect("Failed to add listener");

    assert!(store.remove_listener("a", id).expect("Failed to remove listener"));
    assert!(!store.remove_listener("a", id).expect("Failed to remove listener"));
    store.set("a", 1);
    store.set("b", 1);
    assert_eq!(calls.borrow().len(), 1);

    assert!(store.remove_listener(Targets::Global, id).expect("Failed to remove listener"));
    store.set("b", 2);
    assert_eq!(calls.borrow().len(), 1);
    assert_eq!(store.listener_count(), 0);
}

#[test]
fn test_remove_honors_listener_veto() {
    let store = store_with(&[("x", 1), ("y", 2)]);
    store.add_listener("x", veto()).expect("Failed to add listener");

    store.remove(["x", "y"]);
    assert_keys(&store, &["x"]);
    assert_eq!(store.get("x"), 1);
}

#[test]
fn test_remove_all_ignores_listener_veto() {
    let store = store_with(&[("x", 1), ("y", 2)]);
    let (observer, calls) = recording_listener();
    store.add_listener("x", veto()).expect("Failed to add listener");
    store
        .add_listener_with(Targets::Global, observer, false)
        .expect("Failed to add listener");

    store.remove_all();
    assert!(store.is_empty());
    assert!(!store.exists("x"));
    // Listeners still observe the clearing writes
    assert_eq!(calls.borrow().len(), 2);
}

#[test]
fn test_listener_may_write_other_keys() {
    let store = Store::new();
    store
        .add_listener(
            "celsius",
            listener(|store, _, _, new| {
                if let Some(c) = new.as_float() {
                    store.set("fahrenheit", c * 9.0 / 5.0 + 32.0);
                }
                None
            }),
        )
        .expect("Failed to add listener");

    store.set("celsius", 100.0);
    assert_eq!(store.get("fahrenheit"), Value::Float(212.0));
    assert_keys(&store, &["celsius", "fahrenheit"]);
}
