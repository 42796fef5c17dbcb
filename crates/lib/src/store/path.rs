//! Address parsing and container traversal.
//!
//! An address such as `user.emails[1]` or `rows[0][name]` names a value inside
//! nested containers. It is split into tokens on `.`, `[` and `]`, with empty
//! tokens dropped:
//!
//! ```rust
//! # use propbag::store::path::tokenize;
//! assert_eq!(tokenize("user.emails[1]"), vec!["user", "emails", "1"]);
//! assert_eq!(tokenize("rows[0][name]"), vec!["rows", "0", "name"]);
//! assert_eq!(tokenize("..a..b"), vec!["a", "b"]);
//! assert!(tokenize("").is_empty());
//! ```
//!
//! The first token names a key of the store being addressed. Every later token
//! descends one level:
//!
//! - into a [`Value::List`] by index; the token must be the canonical decimal
//!   form of the index, so `"01"` or `"+1"` do not match;
//! - into a [`Value::Map`] by key;
//! - into a nested [`Value::Store`] by key, through that store's own read path.
//!
//! Reaching a scalar stops the descent; the scalar is the result.

use super::{Store, Value};

/// Splits an address into its tokens.
pub fn tokenize(address: &str) -> Vec<&str> {
    address
        .split(['.', '[', ']'])
        .filter(|token| !token.is_empty())
        .collect()
}

/// Parses a list index token, accepting only its canonical decimal form.
///
/// ```rust
/// # use propbag::store::path::list_index;
/// assert_eq!(list_index("2"), Some(2));
/// assert_eq!(list_index("02"), None);
/// assert_eq!(list_index("-1"), None);
/// assert_eq!(list_index("x"), None);
/// ```
pub fn list_index(token: &str) -> Option<usize> {
    let index: usize = token.parse().ok()?;
    (index.to_string() == token).then_some(index)
}

/// Outcome of walking tokens through values held by one store.
pub(crate) enum Descent<'a, 'b> {
    /// The walk finished on this value
    Found(Value),
    /// A token did not match anything
    Missing,
    /// The walk reached a nested store; the remaining tokens are resolved there
    Enter(Store, &'a [&'b str]),
}

/// Walks `tokens` down from `value`, stopping at nested stores.
///
/// Nested stores are returned rather than entered so the caller can release
/// its borrow of the current store first.
pub(crate) fn descend<'a, 'b>(value: &Value, tokens: &'a [&'b str]) -> Descent<'a, 'b> {
    let mut current = value;
    for (i, token) in tokens.iter().enumerate() {
        current = match current {
            Value::Store(store) => return Descent::Enter(store.clone(), &tokens[i..]),
            Value::List(items) => match list_index(token).and_then(|index| items.get(index)) {
                Some(next) => next,
                None => return Descent::Missing,
            },
            Value::Map(map) => match map.get(*token) {
                Some(next) => next,
                None => return Descent::Missing,
            },
            scalar => return Descent::Found(scalar.clone()),
        };
    }
    Descent::Found(current.clone())
}

/// Outcome of writing through containers held by one store.
pub(crate) enum Placement<'a, 'b> {
    /// The value was written in place
    Done,
    /// The parent path did not resolve, or the final slot was out of range
    Missing,
    /// The write continues in a nested store with the remaining tokens
    Enter(Store, &'a [&'b str], Value),
}

/// Writes `value` at `tokens` below `target`.
///
/// The last token names the slot to write; the ones before it name the parents.
/// Lists accept replacing an element or pushing one element past the end.
pub(crate) fn place<'a, 'b>(target: &mut Value, tokens: &'a [&'b str], value: Value) -> Placement<'a, 'b> {
    let Some((head, rest)) = tokens.split_first() else {
        return Placement::Missing;
    };
    match target {
        Value::Store(store) => Placement::Enter(store.clone(), tokens, value),
        Value::List(items) => {
            let Some(index) = list_index(head) else {
                return Placement::Missing;
            };
            if !rest.is_empty() {
                return match items.get_mut(index) {
                    Some(next) => place(next, rest, value),
                    None => Placement::Missing,
                };
            }
            if index < items.len() {
                items[index] = value;
            } else if index == items.len() {
                items.push(value);
            } else {
                return Placement::Missing;
            }
            Placement::Done
        }
        Value::Map(map) => {
            if rest.is_empty() {
                map.insert(head.to_string(), value);
                return Placement::Done;
            }
            match map.get_mut(*head) {
                Some(next) => place(next, rest, value),
                None => Placement::Missing,
            }
        }
        _ => Placement::Missing,
    }
}
