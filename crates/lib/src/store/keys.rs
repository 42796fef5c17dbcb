//! Ordered key management.
//!
//! [`KeySequence`] keeps the unique keys of a store in order together with the
//! counter used to mint synthetic keys for positional inserts. [`Locator`] is the
//! address type accepted wherever a key can be named either by its text or by
//! its position.

use std::fmt;

/// Addresses a single entry of a store, by key or by position.
///
/// Strings convert to [`Locator::Name`] and integers to [`Locator::Position`].
/// A name never falls back to a position: `"0"` is the key named `"0"`, not
/// the first entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    /// A key, matched exactly
    Name(String),
    /// A zero-based position; negative values count from the end where accepted
    Position(i64),
}

impl Locator {
    /// Returns the name if this locator is a [`Locator::Name`].
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Locator::Name(name) => Some(name),
            Locator::Position(_) => None,
        }
    }

    /// Returns true for a negative [`Locator::Position`].
    pub fn is_negative_position(&self) -> bool {
        matches!(self, Locator::Position(n) if *n < 0)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Name(name) => write!(f, "{name}"),
            Locator::Position(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for Locator {
    fn from(value: &str) -> Self {
        Locator::Name(value.to_string())
    }
}

impl From<String> for Locator {
    fn from(value: String) -> Self {
        Locator::Name(value)
    }
}

impl From<&String> for Locator {
    fn from(value: &String) -> Self {
        Locator::Name(value.clone())
    }
}

impl From<i64> for Locator {
    fn from(value: i64) -> Self {
        Locator::Position(value)
    }
}

impl From<i32> for Locator {
    fn from(value: i32) -> Self {
        Locator::Position(value as i64)
    }
}

impl From<usize> for Locator {
    /// Saturates at `i64::MAX`, which never resolves.
    fn from(value: usize) -> Self {
        Locator::Position(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<&Locator> for Locator {
    fn from(value: &Locator) -> Self {
        value.clone()
    }
}

/// Ordered list of unique keys plus the synthetic-key counter.
///
/// The counter only moves forward. It advances for every key that enters the
/// sequence, minted or named, and is never reset, so a minted key is never
/// handed out twice even after the key that carried it was removed.
#[derive(Debug, Default, Clone)]
pub(crate) struct KeySequence {
    keys: Vec<String>,
    next_uid: u64,
}

impl KeySequence {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.keys.len()
    }

    pub(crate) fn get(&self, index: usize) -> Option<&str> {
        self.keys.get(index).map(String::as_str)
    }

    pub(crate) fn position(&self, key: &str) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// Copy of the current order, for visiting while callbacks mutate the store.
    pub(crate) fn snapshot(&self) -> Vec<String> {
        self.keys.clone()
    }

    /// Returns the next synthetic key, skipping numbers already in use as names.
    pub(crate) fn mint(&mut self) -> String {
        loop {
            let candidate = self.next_uid.to_string();
            self.next_uid += 1;
            if !self.contains(&candidate) {
                return candidate;
            }
        }
    }

    /// Raises the counter to at least `next`. Never lowers it.
    pub(crate) fn reserve_through(&mut self, next: u64) {
        self.next_uid = self.next_uid.max(next);
    }

    /// Appends a caller-named key. The caller checks uniqueness.
    pub(crate) fn push(&mut self, key: String) {
        debug_assert!(!self.contains(&key));
        self.next_uid += 1;
        self.keys.push(key);
    }

    /// Splices an already-minted key in at `index`, appending when past the end.
    pub(crate) fn insert_minted(&mut self, index: usize, key: String) {
        let index = index.min(self.keys.len());
        self.keys.insert(index, key);
    }

    /// Appends an already-minted key.
    pub(crate) fn push_minted(&mut self, key: String) {
        self.keys.push(key);
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<usize> {
        let index = self.position(key)?;
        self.keys.remove(index);
        Some(index)
    }

    /// Drops every key. The counter is kept.
    pub(crate) fn clear(&mut self) {
        self.keys.clear();
    }

    /// Resolves a locator to a position.
    ///
    /// Names match exactly. Positions are accepted when `|n| < len`; negative
    /// positions count from the end.
    pub(crate) fn resolve(&self, locator: &Locator) -> Option<usize> {
        match locator {
            Locator::Name(name) => self.position(name),
            Locator::Position(n) => {
                let len = self.keys.len();
                let magnitude = usize::try_from(n.unsigned_abs()).ok().filter(|m| *m < len)?;
                if *n < 0 {
                    Some(len - magnitude)
                } else {
                    Some(magnitude)
                }
            }
        }
    }

    /// Resolves a locator to a key without checking that a named key exists.
    ///
    /// Names are trimmed. A position outside `0..len` yields the empty string.
    pub(crate) fn key_for(&self, locator: &Locator) -> String {
        match locator {
            Locator::Name(name) => name.trim().to_string(),
            Locator::Position(n) => usize::try_from(*n)
                .ok()
                .and_then(|index| self.get(index))
                .map(str::to_string)
                .unwrap_or_default(),
        }
    }

    /// Moves the key at `from` so that it ends up at position `to`.
    ///
    /// `to` is clamped to the last position. Returns false when nothing moved.
    pub(crate) fn move_key(&mut self, from: usize, to: usize) -> bool {
        if from >= self.keys.len() {
            return false;
        }
        let to = to.min(self.keys.len() - 1);
        if from == to {
            return false;
        }
        let key = self.keys.remove(from);
        self.keys.insert(to, key);
        true
    }
}
