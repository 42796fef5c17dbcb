//! Write and read hooks for stores.
//!
//! A [`Listener`] is folded over every write to the properties it is registered
//! for and may replace the value being stored. A [`Filter`] is folded over every
//! read and may replace the value being returned, without touching storage.
//!
//! Hooks are kept in per-property buckets. The bucket named by the empty string
//! is the global bucket: its hooks run for every property, after the hooks
//! registered for that property specifically. Within a bucket hooks run in
//! registration order and a given hook (by `Rc` identity) appears at most once.

use std::{collections::HashMap, fmt, rc::Rc};

use super::{Locator, Store, Value};

/// Name of the bucket whose hooks apply to every property.
pub(crate) const GLOBAL: &str = "";

/// Hook invoked after a value is written.
///
/// `old` is the value the property held before the write, or empty text if it
/// was absent. `new` is the value currently proposed for storage, which earlier
/// listeners in the chain may already have replaced. Returning `Some(v)` with a
/// `v` different from `new` stores `v` instead.
///
/// Any `Fn(&Store, &str, &Value, &Value) -> Option<Value>` closure is a listener;
/// implement the trait directly when the hook carries its own state.
pub trait Listener {
    fn on_set(&self, store: &Store, property: &str, old: &Value, new: &Value) -> Option<Value>;
}

impl<F> Listener for F
where
    F: Fn(&Store, &str, &Value, &Value) -> Option<Value>,
{
    fn on_set(&self, store: &Store, property: &str, old: &Value, new: &Value) -> Option<Value> {
        self(store, property, old, new)
    }
}

/// Hook invoked when a value is read.
///
/// `value` is the resolved value, or `None` when the address did not resolve.
/// Returning `Some(v)` makes `v` the value seen by the next filter and,
/// eventually, the caller.
pub trait Filter {
    fn on_get(&self, store: &Store, property: &str, value: Option<&Value>) -> Option<Value>;
}

impl<F> Filter for F
where
    F: Fn(&Store, &str, Option<&Value>) -> Option<Value>,
{
    fn on_get(&self, store: &Store, property: &str, value: Option<&Value>) -> Option<Value> {
        self(store, property, value)
    }
}

/// Wraps a closure as a shareable listener handle.
///
/// Keep the returned handle to register the same listener on more properties
/// without duplicating it.
pub fn listener<F>(f: F) -> Rc<dyn Listener>
where
    F: Fn(&Store, &str, &Value, &Value) -> Option<Value> + 'static,
{
    Rc::new(f)
}

/// Wraps a closure as a shareable filter handle.
pub fn filter<F>(f: F) -> Rc<dyn Filter>
where
    F: Fn(&Store, &str, Option<&Value>) -> Option<Value> + 'static,
{
    Rc::new(f)
}

/// Token identifying a registered hook, used to remove it again.
///
/// Registering the same hook handle twice yields the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistrationId(u64);

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The properties a hook registration applies to.
///
/// - [`Targets::Global`]: every property.
/// - From a string: a comma-separated list of names, e.g. `"name,email"`. An
///   empty item selects the global bucket, so `""` is the same as `Global`.
/// - From locators: an explicit list mixing names and positions. Positions must
///   refer to existing entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Targets {
    Global,
    Properties(Vec<Locator>),
}

impl Targets {
    pub fn global() -> Self {
        Targets::Global
    }
}

impl From<&str> for Targets {
    fn from(value: &str) -> Self {
        Targets::Properties(value.split(',').map(Locator::from).collect())
    }
}

impl From<String> for Targets {
    fn from(value: String) -> Self {
        Targets::from(value.as_str())
    }
}

impl From<Locator> for Targets {
    fn from(value: Locator) -> Self {
        Targets::Properties(vec![value])
    }
}

impl From<Vec<Locator>> for Targets {
    fn from(value: Vec<Locator>) -> Self {
        Targets::Properties(value)
    }
}

impl From<&[&str]> for Targets {
    fn from(value: &[&str]) -> Self {
        Targets::Properties(value.iter().map(|name| Locator::from(*name)).collect())
    }
}

impl From<i64> for Targets {
    fn from(value: i64) -> Self {
        Targets::Properties(vec![Locator::Position(value)])
    }
}

impl From<i32> for Targets {
    fn from(value: i32) -> Self {
        Targets::Properties(vec![Locator::Position(value as i64)])
    }
}

impl From<usize> for Targets {
    fn from(value: usize) -> Self {
        Targets::Properties(vec![Locator::from(value)])
    }
}

struct Entry<H: ?Sized> {
    id: RegistrationId,
    handler: Rc<H>,
}

/// Per-property buckets of hooks of one kind.
pub(crate) struct Registry<H: ?Sized> {
    buckets: HashMap<String, Vec<Entry<H>>>,
}

impl<H: ?Sized> Default for Registry<H> {
    fn default() -> Self {
        Self {
            buckets: HashMap::new(),
        }
    }
}

impl<H: ?Sized> Registry<H> {
    /// Returns the id already assigned to `handler`, if it is registered anywhere.
    pub(crate) fn find_id(&self, handler: &Rc<H>) -> Option<RegistrationId> {
        self.buckets
            .values()
            .flatten()
            .find(|entry| Rc::ptr_eq(&entry.handler, handler))
            .map(|entry| entry.id)
    }

    /// Appends `handler` to `bucket`. Returns false if it was already there.
    pub(crate) fn insert(&mut self, bucket: &str, id: RegistrationId, handler: Rc<H>) -> bool {
        let entries = self.buckets.entry(bucket.to_string()).or_default();
        if entries.iter().any(|entry| Rc::ptr_eq(&entry.handler, &handler)) {
            return false;
        }
        entries.push(Entry { id, handler });
        true
    }

    /// Removes the entry with `id` from `bucket`.
    pub(crate) fn remove(&mut self, bucket: &str, id: RegistrationId) -> bool {
        let Some(entries) = self.buckets.get_mut(bucket) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        before != entries.len()
    }

    /// Removes the entry with `id` from every bucket.
    pub(crate) fn remove_everywhere(&mut self, id: RegistrationId) -> bool {
        let mut removed = false;
        for entries in self.buckets.values_mut() {
            let before = entries.len();
            entries.retain(|entry| entry.id != id);
            removed |= before != entries.len();
        }
        removed
    }

    /// Hooks to run for `property`: its own bucket, then the global bucket.
    ///
    /// Returned as owned handles so the caller can invoke them without holding
    /// a borrow of the store.
    pub(crate) fn chain(&self, property: &str) -> Vec<Rc<H>> {
        let own = if property == GLOBAL {
            None
        } else {
            self.buckets.get(property)
        };
        own.into_iter()
            .chain(self.buckets.get(GLOBAL))
            .flatten()
            .map(|entry| entry.handler.clone())
            .collect()
    }

    /// Number of entries across all buckets.
    pub(crate) fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub(crate) fn clear(&mut self) {
        self.buckets.clear();
    }
}

/// Mints registration ids for one store.
#[derive(Debug, Default)]
pub(crate) struct IdSource {
    next: u64,
}

impl IdSource {
    pub(crate) fn next(&mut self) -> RegistrationId {
        let id = RegistrationId(self.next);
        self.next += 1;
        id
    }
}
