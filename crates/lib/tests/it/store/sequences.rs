//! Arbitrary sequences of structural writes checked against a plain key list.

use std::collections::HashSet;

use propbag::{Locator, Store};
use proptest::prelude::*;

const NAMES: &[&str] = &["a", "b", "c", "0", "1", "2", "7"];

#[derive(Debug, Clone)]
enum Op {
    Set(&'static str),
    Add(usize),
    Insert(Locator, usize),
    Remove(Locator),
    Move(Locator, Locator),
}

/// Reference key order, kept as a bare vector plus the minting counter
#[derive(Debug, Default)]
struct KeyModel {
    keys: Vec<String>,
    counter: u64,
}

impl KeyModel {
    fn resolve(&self, locator: &Locator) -> Option<usize> {
        let len = self.keys.len();
        match locator {
            Locator::Name(name) => self.keys.iter().position(|k| k == name),
            Locator::Position(n) if *n >= 0 => usize::try_from(*n).ok().filter(|i| *i < len),
            Locator::Position(n) => usize::try_from(n.unsigned_abs())
                .ok()
                .filter(|m| *m < len)
                .map(|m| len - m),
        }
    }

    fn mint(&mut self) -> String {
        loop {
            let candidate = self.counter.to_string();
            self.counter += 1;
            if !self.keys.contains(&candidate) {
                return candidate;
            }
        }
    }

    fn set(&mut self, name: &str) {
        if !self.keys.iter().any(|k| k == name) {
            self.keys.push(name.to_string());
            self.counter += 1;
        }
    }

    fn insert(&mut self, at: Option<usize>, count: usize) {
        let mut at = at;
        for _ in 0..count {
            let key = self.mint();
            match at {
                Some(index) => {
                    self.keys.insert(index.min(self.keys.len()), key);
                    at = Some(index + 1);
                }
                None => self.keys.push(key),
            }
        }
    }

    fn remove(&mut self, locator: &Locator) {
        let key = match locator {
            Locator::Name(name) => Some(name.trim().to_string()),
            Locator::Position(n) => usize::try_from(*n)
                .ok()
                .and_then(|i| self.keys.get(i).cloned()),
        };
        if let Some(key) = key {
            self.keys.retain(|k| *k != key);
        }
    }

    fn move_to(&mut self, from: &Locator, to: &Locator) -> bool {
        let Some(from) = self.resolve(from) else {
            return false;
        };
        let len = self.keys.len();
        let to = self.resolve(to).unwrap_or(match to {
            Locator::Position(n) if *n < 0 => 0,
            _ => len,
        });
        let key = self.keys.remove(from);
        self.keys.insert(to.min(len - 1), key);
        true
    }
}

fn locator_strategy() -> impl Strategy<Value = Locator> {
    prop_oneof![
        (-6i64..6).prop_map(Locator::Position),
        prop::sample::select(NAMES.to_vec()).prop_map(Locator::from),
        Just(Locator::Position(i64::MIN)),
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        prop::sample::select(NAMES.to_vec()).prop_map(Op::Set),
        (1usize..4).prop_map(Op::Add),
        (locator_strategy(), 1usize..3).prop_map(|(at, count)| Op::Insert(at, count)),
        locator_strategy().prop_map(Op::Remove),
        (locator_strategy(), locator_strategy()).prop_map(|(from, to)| Op::Move(from, to)),
    ]
}

fn values(count: usize) -> Vec<i64> {
    (1..=count as i64).collect()
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn key_order_follows_reference_model(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let store = Store::new();
        let mut model = KeyModel::default();
        let mut minted: HashSet<String> = HashSet::new();

        for op in &ops {
            let before = store.keys();
            match op {
                Op::Set(name) => {
                    store.set(*name, 1);
                    model.set(name);
                }
                Op::Add(count) => {
                    store.add(values(*count));
                    model.insert(None, *count);
                }
                Op::Insert(at, count) => {
                    store.insert_at(at, values(*count));
                    let index = match at {
                        Locator::Position(n) if *n < 0 => None,
                        _ => model.resolve(at),
                    };
                    model.insert(index, *count);
                }
                Op::Remove(target) => {
                    store.remove([target]);
                    model.remove(target);
                }
                Op::Move(from, to) => {
                    let moved = model.move_to(from, to);
                    let result = store.move_to(from, to);
                    prop_assert_eq!(result.is_ok(), moved, "move {:?} -> {:?}", from, to);
                    if let Err(err) = result {
                        prop_assert!(err.is_not_found());
                    }
                }
            }

            let keys = store.keys();
            prop_assert_eq!(&keys, &model.keys, "after {:?}", op);

            let unique: HashSet<&String> = keys.iter().collect();
            prop_assert_eq!(unique.len(), keys.len(), "duplicate keys after {:?}", op);

            if matches!(op, Op::Add(_) | Op::Insert(..)) {
                for key in keys.iter().filter(|key| !before.contains(key)) {
                    prop_assert!(minted.insert(key.clone()), "minted key {} handed out twice", key);
                }
            }
        }
    }
}
