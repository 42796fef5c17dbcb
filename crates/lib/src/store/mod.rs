//! The ordered property store.
//!
//! [`Store`] is a shared handle to an ordered set of unique string keys and their
//! [`Value`]s. Writes run through the listener chain of the written property and
//! reads run through its filter chain (see [`registry`]). Values can nest other
//! stores, maps and lists, which are addressed with paths (see [`path`]).
//!
//! # Usage
//!
//! ```
//! use propbag::{Store, Value, store::listener};
//!
//! let store = Store::new();
//! store.set("name", "Alice");
//! store.add(["first", "second"]);
//! assert_eq!(store.property_list(None), "name,1,2");
//!
//! // Listeners may rewrite what gets stored
//! store
//!     .add_listener("name", listener(|_, _, _, new| {
//!         new.as_text().map(|s| Value::from(s.to_uppercase()))
//!     }))
//!     .unwrap();
//! assert_eq!(store.get("name"), "ALICE");
//! ```
//!
//! # Re-entrancy
//!
//! Listeners, filters and `each` callbacks receive the store and may call back
//! into it, including structural changes. The store never holds an internal
//! borrow while a callback runs, and operations that visit several keys work
//! from a snapshot of the key order taken before the first callback.

use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use chrono::Datelike;
use tracing::{debug, trace, warn};

use crate::{Clock, Result, SystemClock};

mod errors;
mod json;
mod keys;
pub mod path;
pub mod registry;
pub mod value;

pub use errors::StoreError;
pub use keys::Locator;
pub use registry::{Filter, Listener, RegistrationId, Targets, filter, listener};
pub use value::Value;

use keys::KeySequence;
use path::{Descent, Placement};
use registry::{GLOBAL, IdSource, Registry};

/// State behind a [`Store`] handle.
struct Inner {
    keys: KeySequence,
    values: HashMap<String, Value>,
    listeners: Registry<dyn Listener>,
    filters: Registry<dyn Filter>,
    registrations: IdSource,
    clock: Rc<dyn Clock>,
    uid: Option<String>,
    destroyed: bool,
}

/// An ordered, dynamically-typed property store.
///
/// Cloning a `Store` clones the handle: both handles address the same keys and
/// values. Two handles are equal when they address the same store. A store can
/// be held as a [`Value::Store`] by several containers at once, including
/// itself; such reference cycles are released by [`Store::destroy`].
///
/// `Store` is single-threaded (`!Send`, `!Sync`).
#[derive(Clone)]
pub struct Store {
    inner: Rc<RefCell<Inner>>,
}

impl Store {
    /// Creates an empty store using the system clock.
    pub fn new() -> Self {
        Self::with_clock(Rc::new(SystemClock))
    }

    /// Creates an empty store reading time from `clock`.
    pub fn with_clock(clock: Rc<dyn Clock>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                keys: KeySequence::new(),
                values: HashMap::new(),
                listeners: Registry::default(),
                filters: Registry::default(),
                registrations: IdSource::default(),
                clock,
                uid: None,
                destroyed: false,
            })),
        }
    }

    /// Creates a store holding `values` under minted keys, like [`Store::add`].
    pub fn from_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let store = Self::new();
        store.add(values);
        store
    }

    /// Creates a store from name/value pairs, like [`Store::set_many`].
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Locator>,
        V: Into<Value>,
    {
        let store = Self::new();
        store.set_many(pairs);
        store
    }

    // ===== ADDRESSING =====

    /// Returns the number of keys.
    pub fn len(&self) -> usize {
        self.inner.borrow().keys.len()
    }

    /// Returns true if the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the key for a locator.
    ///
    /// A position yields the key stored there, or the empty string if the
    /// position is negative or out of range. A name is returned trimmed,
    /// whether or not such a key exists.
    pub fn get_property(&self, locator: impl Into<Locator>) -> String {
        self.inner.borrow().keys.key_for(&locator.into())
    }

    /// Returns the position of a key, or of a position if it is in range.
    ///
    /// Names are matched exactly and never reinterpreted as positions.
    /// Positions `n` are accepted when `|n| < len`; negative ones count from
    /// the end and are returned normalized.
    pub fn get_index(&self, locator: impl Into<Locator>) -> Option<usize> {
        self.inner.borrow().keys.resolve(&locator.into())
    }

    /// Returns the keys in order.
    pub fn keys(&self) -> Vec<String> {
        self.inner.borrow().keys.snapshot()
    }

    /// Without a name: the comma-joined list of keys.
    ///
    /// With a name: for each entry in order, the value found under `name` inside
    /// it, comma-joined. Nested stores are read with [`Store::get`] (filters
    /// apply), maps by key and lists by index; other entries contribute an empty
    /// item.
    pub fn property_list(&self, name: Option<&str>) -> String {
        let Some(name) = name.filter(|name| !name.is_empty()) else {
            let inner = self.inner.borrow();
            return inner.keys.iter().collect::<Vec<_>>().join(",");
        };

        self.sub_values(name)
            .iter()
            .map(Value::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// For each entry in order, the value found under `name` inside it.
    ///
    /// Entries that are not containers, or do not hold `name`, yield empty text.
    pub fn sub_values(&self, name: &str) -> Vec<Value> {
        self.get_values()
            .into_iter()
            .map(|(_, entry)| match entry {
                Value::Store(store) => store.get(name),
                Value::Map(map) => map.get(name).cloned().unwrap_or_else(Value::empty),
                Value::List(items) => path::list_index(name)
                    .and_then(|index| items.get(index).cloned())
                    .unwrap_or_else(Value::empty),
                _ => Value::empty(),
            })
            .collect()
    }

    // ===== READS =====

    /// Reads a value, returning empty text if the address does not resolve.
    ///
    /// See [`Store::get_or`].
    pub fn get(&self, address: impl Into<Locator>) -> Value {
        self.get_or(address, Value::empty())
    }

    /// Reads a value through the filter chain, falling back to `default`.
    ///
    /// A name is parsed as a path (`a.b[0]`); a position reads the entry at that
    /// position. The resolved value, or `None` if nothing resolved, is passed
    /// through the filters registered for the address and then the global
    /// filters. Filters never change what is stored.
    pub fn get_or(&self, address: impl Into<Locator>, default: impl Into<Value>) -> Value {
        let address = address.into();
        if !self.is_live("get") {
            return default.into();
        }

        let (property, candidate) = match &address {
            Locator::Position(_) => {
                let key = self.get_property(&address);
                let candidate = self.raw(&key);
                (key, candidate)
            }
            Locator::Name(text) => {
                let tokens = path::tokenize(text);
                (text.trim().to_string(), self.resolve(&tokens))
            }
        };
        trace!(property = %property, found = candidate.is_some(), "Resolved address");

        self.apply_filters(&property, candidate)
            .unwrap_or_else(|| default.into())
    }

    /// Returns true if the locator names an existing key.
    pub fn exists(&self, locator: impl Into<Locator>) -> bool {
        let inner = self.inner.borrow();
        let key = inner.keys.key_for(&locator.into());
        !key.is_empty() && inner.keys.contains(&key)
    }

    /// Returns every key with its stored value, in order.
    ///
    /// Filters are not applied. Nested containers are shared handles or clones
    /// of the stored values; changing them does not write through.
    pub fn get_values(&self) -> Vec<(String, Value)> {
        let inner = self.inner.borrow();
        inner
            .keys
            .iter()
            .filter_map(|key| {
                inner
                    .values
                    .get(key)
                    .map(|value| (key.to_string(), value.clone()))
            })
            .collect()
    }

    /// Returns the store's time-based identifier, creating it on first use.
    ///
    /// The identifier is the local year, zero-based month, day of month and
    /// Unix milliseconds of the first call, concatenated as decimal text. The
    /// calendar fields follow [`Clock::now_local`].
    pub fn uid(&self) -> String {
        if let Some(uid) = self.inner.borrow().uid.clone() {
            return uid;
        }
        let clock = self.inner.borrow().clock.clone();
        let now = clock.now_local();
        let uid = format!(
            "{}{}{}{}",
            now.year(),
            now.month0(),
            now.day(),
            now.timestamp_millis()
        );
        self.inner.borrow_mut().uid = Some(uid.clone());
        uid
    }

    /// The stored value of a key, unfiltered.
    fn raw(&self, key: &str) -> Option<Value> {
        self.inner.borrow().values.get(key).cloned()
    }

    /// Resolves address tokens against this store, unfiltered at the root.
    fn resolve(&self, tokens: &[&str]) -> Option<Value> {
        let (root, rest) = tokens.split_first()?;
        let descent = {
            let inner = self.inner.borrow();
            let value = inner.values.get(root.trim())?;
            path::descend(value, rest)
        };
        Self::follow(descent)
    }

    /// Resolves tokens that continue inside this store from a parent container.
    ///
    /// The first token is matched as a key and read through this store's filters.
    fn resolve_nested(&self, tokens: &[&str]) -> Option<Value> {
        let (key, rest) = tokens.split_first()?;
        if !self.exists(*key) {
            return None;
        }
        let value = self.apply_filters(key, self.raw(key))?;
        Self::follow(path::descend(&value, rest))
    }

    fn follow(descent: Descent<'_, '_>) -> Option<Value> {
        match descent {
            Descent::Found(value) => Some(value),
            Descent::Missing => None,
            Descent::Enter(store, rest) => store.resolve_nested(rest),
        }
    }

    fn apply_filters(&self, property: &str, candidate: Option<Value>) -> Option<Value> {
        let chain = self.inner.borrow().filters.chain(property);
        chain.into_iter().fold(candidate, |current, filter| {
            filter
                .on_get(self, property, current.as_ref())
                .or(current)
        })
    }

    // ===== WRITES =====

    /// Writes a single value and returns what [`Store::get`] now reads for it.
    ///
    /// A name containing `.` or brackets writes inside the container found at its
    /// parent path instead of creating a key: a nested store receives a `set` of
    /// the last token, a map gets the key assigned, a list gets the element
    /// replaced (or pushed, one past the end). If the parent does not resolve the
    /// write is dropped.
    ///
    /// Otherwise the key is created at the end if new, the value stored, and the
    /// listener chain of the key run over it.
    pub fn set(&self, name: impl Into<Locator>, value: impl Into<Value>) -> Value {
        let name = name.into();
        self.write(&name, value.into());
        self.get(name)
    }

    /// Writes several values in iteration order, with the semantics of
    /// [`Store::set`].
    pub fn set_many<I, K, V>(&self, pairs: I) -> &Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Locator>,
        V: Into<Value>,
    {
        for (name, value) in pairs {
            self.write(&name.into(), value.into());
        }
        self
    }

    /// Appends values under freshly minted keys.
    pub fn add<I, V>(&self, values: I) -> &Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.insert_values(None, values)
    }

    /// Inserts values under freshly minted keys, starting at `position`.
    ///
    /// `position` may be a key or a non-negative position; the values are placed
    /// before it, in order. A negative or unresolvable position appends.
    pub fn insert_at<I, V>(&self, position: impl Into<Locator>, values: I) -> &Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let position = position.into();
        let index = if position.is_negative_position() {
            None
        } else {
            self.get_index(&position)
        };
        self.insert_values(index, values)
    }

    /// Ensures no key below `next` is minted from now on.
    ///
    /// The counter never goes backwards, so a smaller `next` has no effect.
    /// Useful when a store is rebuilt from a saved copy and keys minted before
    /// the save must not be handed out again.
    pub fn reserve_minted_keys(&self, next: u64) -> &Self {
        if self.is_live("reserve_minted_keys") {
            self.inner.borrow_mut().keys.reserve_through(next);
        }
        self
    }

    fn insert_values<I, V>(&self, mut index: Option<usize>, values: I) -> &Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if !self.is_live("add") {
            return self;
        }

        let pairs: Vec<(String, Value)> = {
            let mut inner = self.inner.borrow_mut();
            values
                .into_iter()
                .map(|value| {
                    let key = inner.keys.mint();
                    match index {
                        Some(at) => {
                            inner.keys.insert_minted(at, key.clone());
                            index = Some(at + 1);
                        }
                        None => inner.keys.push_minted(key.clone()),
                    }
                    (key, value)
                })
                .collect()
        };
        debug!(keys = ?pairs.iter().map(|(key, _)| key).collect::<Vec<_>>(), "Minted keys");

        for (key, value) in pairs {
            self.assign(key, value);
        }
        self
    }

    /// Moves an entry so that it ends up at position `new`.
    ///
    /// Both arguments accept keys or positions, negative positions counting from
    /// the end. If `new` does not resolve, the entry moves to the front for a
    /// negative position and to the end otherwise. Values do not change, so no
    /// listeners fire.
    ///
    /// # Errors
    ///
    /// [`StoreError::IndexNotFound`] if `old` does not resolve.
    pub fn move_to(&self, old: impl Into<Locator>, new: impl Into<Locator>) -> Result<&Self> {
        let (old, new) = (old.into(), new.into());
        let mut inner = self.inner.borrow_mut();
        if inner.destroyed {
            return Err(StoreError::Destroyed { operation: "move_to" }.into());
        }

        let from = inner
            .keys
            .resolve(&old)
            .ok_or_else(|| StoreError::IndexNotFound {
                index: old.to_string(),
            })?;
        let len = inner.keys.len();
        let to = inner.keys.resolve(&new).unwrap_or(if new.is_negative_position() {
            0
        } else {
            len
        });

        if inner.keys.move_key(from, to) {
            debug!(from, to, "Moved property");
        }
        Ok(self)
    }

    /// Removes entries, letting listeners veto each removal.
    ///
    /// Every target that currently holds a value is first written with empty
    /// text through the listener chain. Targets still empty afterwards are
    /// deleted; a listener that restored a non-empty value keeps the entry.
    /// Targets that do not exist are ignored.
    pub fn remove<I, L>(&self, targets: I) -> &Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Locator>,
    {
        let targets: Vec<Locator> = targets.into_iter().map(Into::into).collect();
        if !self.is_live("remove") {
            return self;
        }

        let mut doomed: Vec<String> = Vec::new();
        {
            let inner = self.inner.borrow();
            for target in &targets {
                let key = inner.keys.key_for(target);
                if inner.values.contains_key(&key) && !doomed.contains(&key) {
                    doomed.push(key);
                }
            }
        }

        for key in &doomed {
            self.assign(key.clone(), Value::empty());
        }

        let mut inner = self.inner.borrow_mut();
        for key in &doomed {
            if inner.values.get(key).is_some_and(Value::is_empty) {
                inner.values.remove(key);
                inner.keys.remove(key);
                debug!(key = %key, "Removed property");
            } else if inner.values.contains_key(key) {
                debug!(key = %key, "Removal vetoed by listener");
            }
        }
        self
    }

    /// Removes every entry, ignoring listener vetoes.
    ///
    /// Listeners still observe an empty write for each key, but whatever they
    /// return, all keys and values are discarded. The store stays usable and the
    /// key counter is not reset.
    pub fn remove_all(&self) -> &Self {
        if !self.is_live("remove_all") {
            return self;
        }

        let snapshot = self.keys();
        for key in snapshot {
            if self.inner.borrow().values.contains_key(&key) {
                self.assign(key, Value::empty());
            }
        }

        let discarded = {
            let mut inner = self.inner.borrow_mut();
            inner.keys.clear();
            std::mem::take(&mut inner.values)
        };
        debug!(count = discarded.len(), "Removed all properties");
        self
    }

    fn is_live(&self, operation: &'static str) -> bool {
        if self.inner.borrow().destroyed {
            warn!(operation, "Ignoring operation on a destroyed store");
            return false;
        }
        true
    }

    fn write(&self, name: &Locator, value: Value) {
        match name {
            Locator::Name(text) => self.write_tokens(&path::tokenize(text), value),
            Locator::Position(n) => {
                if !self.is_live("set") {
                    return;
                }
                let mut key = self.get_property(name);
                if key.is_empty() {
                    key = n.to_string();
                }
                self.assign(key, value);
            }
        }
    }

    fn write_tokens(&self, tokens: &[&str], value: Value) {
        if !self.is_live("set") {
            return;
        }
        match tokens {
            [key] if !key.trim().is_empty() => self.assign(key.trim().to_string(), value),
            [] | [_] => warn!("Ignoring write to an empty property name"),
            [root, rest @ ..] => {
                let placement = {
                    let mut inner = self.inner.borrow_mut();
                    match inner.values.get_mut(root.trim()) {
                        Some(target) => path::place(target, rest, value),
                        None => Placement::Missing,
                    }
                };
                match placement {
                    Placement::Done => trace!(path = ?tokens, "Wrote nested value"),
                    Placement::Missing => {
                        warn!(path = ?tokens, "Ignoring write to an unresolvable path")
                    }
                    Placement::Enter(store, rest, value) => store.write_tokens(rest, value),
                }
            }
        }
    }

    /// Stores `value` under `key`, creating the key if needed, and runs the
    /// listener chain.
    fn assign(&self, key: String, value: Value) {
        let (old, chain) = {
            let mut inner = self.inner.borrow_mut();
            if !inner.keys.contains(&key) {
                inner.keys.push(key.clone());
                debug!(key = %key, "Added property");
            }
            let old = inner
                .values
                .insert(key.clone(), value.clone())
                .unwrap_or_else(Value::empty);
            (old, inner.listeners.chain(&key))
        };

        let mut proposed = value;
        for listener in chain {
            let Some(replacement) = listener.on_set(self, &key, &old, &proposed) else {
                continue;
            };
            // An unchanged result must not overwrite a removal made meanwhile
            if replacement != proposed {
                proposed = replacement;
                self.store_existing(&key, proposed.clone());
            }
        }
    }

    /// Overwrites the value of a key only if the key is still present.
    fn store_existing(&self, key: &str, value: Value) {
        let mut inner = self.inner.borrow_mut();
        if inner.keys.contains(key) {
            inner.values.insert(key.to_string(), value);
        }
    }

    // ===== HOOKS =====

    /// Registers a listener and replays it against the values already stored.
    ///
    /// Equivalent to [`Store::add_listener_with`] with `apply_to_existing` set.
    pub fn add_listener(
        &self,
        targets: impl Into<Targets>,
        listener: Rc<dyn Listener>,
    ) -> Result<RegistrationId> {
        self.add_listener_with(targets, listener, true)
    }

    /// Registers a listener for the targeted properties.
    ///
    /// A listener already present in a target bucket is not added again there.
    /// With `apply_to_existing`, each bucket the listener was newly added to is
    /// replayed: the listener is called with empty text as the old value for the
    /// targeted property, or for every property when the target is global, and a
    /// returned value is stored directly without running the rest of the chain.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidParameter`] if the targets are empty or name a
    /// position that does not exist; nothing is registered in that case.
    pub fn add_listener_with(
        &self,
        targets: impl Into<Targets>,
        listener: Rc<dyn Listener>,
        apply_to_existing: bool,
    ) -> Result<RegistrationId> {
        let buckets = self.buckets(targets.into(), "add_listener")?;

        let (id, added) = {
            let mut inner = self.inner.borrow_mut();
            let existing = inner.listeners.find_id(&listener);
            let id = existing.unwrap_or_else(|| inner.registrations.next());
            let added: Vec<String> = buckets
                .into_iter()
                .filter(|bucket| inner.listeners.insert(bucket, id, listener.clone()))
                .collect();
            (id, added)
        };
        debug!(id = %id, buckets = ?added, "Registered listener");

        if apply_to_existing && !added.is_empty() {
            self.replay(&listener, &added);
        }
        Ok(id)
    }

    /// Calls a newly registered listener once per stored value it applies to.
    fn replay(&self, listener: &Rc<dyn Listener>, buckets: &[String]) {
        let keys: Vec<String> = if buckets.iter().any(|bucket| bucket == GLOBAL) {
            self.keys()
        } else {
            buckets.to_vec()
        };

        let empty = Value::empty();
        for key in keys {
            let Some(current) = self.raw(&key) else {
                continue;
            };
            if let Some(replacement) = listener.on_set(self, &key, &empty, &current) {
                self.store_existing(&key, replacement);
            }
        }
    }

    /// Removes a listener from the targeted properties.
    ///
    /// A global target removes it from every bucket. Returns whether anything
    /// was removed.
    pub fn remove_listener(&self, targets: impl Into<Targets>, id: RegistrationId) -> Result<bool> {
        let buckets = self.buckets(targets.into(), "remove_listener")?;
        let mut inner = self.inner.borrow_mut();
        let removed = buckets.iter().fold(false, |removed, bucket| {
            let hit = if bucket == GLOBAL {
                inner.listeners.remove_everywhere(id)
            } else {
                inner.listeners.remove(bucket, id)
            };
            removed | hit
        });
        debug!(id = %id, removed, "Removed listener");
        Ok(removed)
    }

    /// Registers a filter for the targeted properties.
    ///
    /// A filter registered for a path such as `"user.name"` runs when that exact
    /// address is read.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidParameter`] if the targets are empty or name a
    /// position that does not exist; nothing is registered in that case.
    pub fn add_filter(&self, targets: impl Into<Targets>, filter: Rc<dyn Filter>) -> Result<RegistrationId> {
        let buckets = self.buckets(targets.into(), "add_filter")?;
        let mut inner = self.inner.borrow_mut();
        let existing = inner.filters.find_id(&filter);
        let id = existing.unwrap_or_else(|| inner.registrations.next());
        for bucket in &buckets {
            inner.filters.insert(bucket, id, filter.clone());
        }
        debug!(id = %id, buckets = ?buckets, "Registered filter");
        Ok(id)
    }

    /// Removes a filter from the targeted properties.
    ///
    /// A global target removes it from every bucket. Returns whether anything
    /// was removed.
    pub fn remove_filter(&self, targets: impl Into<Targets>, id: RegistrationId) -> Result<bool> {
        let buckets = self.buckets(targets.into(), "remove_filter")?;
        let mut inner = self.inner.borrow_mut();
        let removed = buckets.iter().fold(false, |removed, bucket| {
            let hit = if bucket == GLOBAL {
                inner.filters.remove_everywhere(id)
            } else {
                inner.filters.remove(bucket, id)
            };
            removed | hit
        });
        debug!(id = %id, removed, "Removed filter");
        Ok(removed)
    }

    /// Resolves registration targets to bucket names, deduplicated in order.
    fn buckets(&self, targets: Targets, operation: &'static str) -> Result<Vec<String>> {
        let inner = self.inner.borrow();
        if inner.destroyed {
            return Err(StoreError::Destroyed { operation }.into());
        }

        let locators = match targets {
            Targets::Global => return Ok(vec![GLOBAL.to_string()]),
            Targets::Properties(locators) => locators,
        };
        if locators.is_empty() {
            return Err(StoreError::InvalidParameter {
                parameter: "property",
                operation,
                reason: "the property list is empty".to_string(),
            }
            .into());
        }

        let mut buckets: Vec<String> = Vec::with_capacity(locators.len());
        for locator in &locators {
            let bucket = match locator {
                Locator::Position(n) => {
                    let index = inner.keys.resolve(locator).filter(|_| *n >= 0).ok_or_else(|| {
                        StoreError::InvalidParameter {
                            parameter: "property",
                            operation,
                            reason: format!("position {n} does not refer to an existing property"),
                        }
                    })?;
                    inner.keys.get(index).map(str::to_string).unwrap_or_default()
                }
                Locator::Name(_) => inner.keys.key_for(locator),
            };
            if !buckets.contains(&bucket) {
                buckets.push(bucket);
            }
        }
        Ok(buckets)
    }

    /// Number of registered listener entries across all buckets.
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Number of registered filter entries across all buckets.
    pub fn filter_count(&self) -> usize {
        self.inner.borrow().filters.len()
    }

    // ===== ITERATION & LIFECYCLE =====

    /// Calls `f` with each key and its stored value, in order, until it returns
    /// `Some`.
    ///
    /// The key order is snapshotted first. Keys removed while iterating are
    /// skipped when their turn comes; keys added while iterating are not
    /// visited. Returns the first `Some` produced by `f`.
    pub fn each<T, F>(&self, mut f: F) -> Option<T>
    where
        F: FnMut(&Store, &str, &Value) -> Option<T>,
    {
        for key in self.keys() {
            let Some(value) = self.raw(&key) else {
                continue;
            };
            if let Some(result) = f(self, &key, &value) {
                return Some(result);
            }
        }
        None
    }

    /// Tears the store down.
    ///
    /// Releases all keys, values and hooks. Later reads return their default,
    /// writes are ignored and fallible operations return
    /// [`StoreError::Destroyed`]. Nested stores are released, not destroyed.
    pub fn destroy(&self) {
        let released = {
            let mut inner = self.inner.borrow_mut();
            inner.keys.clear();
            inner.listeners.clear();
            inner.filters.clear();
            inner.uid = None;
            inner.destroyed = true;
            std::mem::take(&mut inner.values)
        };
        debug!(count = released.len(), "Destroyed store");
    }

    /// Returns true once [`Store::destroy`] has been called.
    pub fn is_destroyed(&self) -> bool {
        self.inner.borrow().destroyed
    }

    /// Address of the shared state, used to detect cycles.
    pub(crate) fn id(&self) -> *const () {
        Rc::as_ptr(&self.inner) as *const ()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Store {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(inner) => f
                .debug_struct("Store")
                .field("keys", &inner.keys.snapshot())
                .field("destroyed", &inner.destroyed)
                .finish(),
            Err(_) => f.debug_struct("Store").finish_non_exhaustive(),
        }
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}
