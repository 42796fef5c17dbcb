//! JSON import and export.
//!
//! Objects become [`Value::Map`] and arrays [`Value::List`]. Integral numbers
//! that fit an `i64` become [`Value::Int`], every other number a
//! [`Value::Float`]. A top-level object loaded with [`Store::from_json`] keeps
//! its member order as key order. Nested objects become maps and are exported
//! with their members sorted by name.
//!
//! Exported stores render as objects in key order. A store reached again while
//! it is still being rendered (a reference cycle) renders as `null`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value as Json};
use tracing::warn;

use super::{Store, StoreError, Value};
use crate::Result;

impl Value {
    /// Converts a JSON document into a value.
    pub fn from_json(json: Json) -> Self {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Value::Text(s),
            Json::Array(items) => Value::List(items.into_iter().map(Value::from_json).collect()),
            Json::Object(members) => Value::Map(
                members
                    .into_iter()
                    .map(|(key, member)| (key, Value::from_json(member)))
                    .collect(),
            ),
        }
    }

    /// Renders this value as JSON.
    ///
    /// Non-finite floats render as `null`.
    pub fn to_json(&self) -> Json {
        render(self, &mut Vec::new())
    }
}

impl Store {
    /// Builds a store from a JSON object or array.
    ///
    /// Object members are set in document order; array elements are added under
    /// minted keys.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidParameter`] if `json` is neither an object nor an
    /// array.
    pub fn from_json(json: Json) -> Result<Self> {
        let store = Store::new();
        match json {
            Json::Object(members) => {
                store.set_many(
                    members
                        .into_iter()
                        .map(|(key, member)| (key, Value::from_json(member))),
                );
            }
            Json::Array(items) => {
                store.add(items.into_iter().map(Value::from_json));
            }
            other => {
                return Err(StoreError::InvalidParameter {
                    parameter: "json",
                    operation: "from_json",
                    reason: format!("expected an object or an array, found {}", json_kind(&other)),
                }
                .into());
            }
        }
        Ok(store)
    }

    /// Parses JSON text and builds a store from it, like [`Store::from_json`].
    pub fn from_json_str(text: &str) -> Result<Self> {
        let json: Json = serde_json::from_str(text)?;
        Self::from_json(json)
    }

    /// Renders the stored values as a JSON object in key order.
    ///
    /// Filters are not applied.
    pub fn to_json(&self) -> Json {
        render_store(self, &mut Vec::new())
    }

    /// Renders the store as indented JSON text.
    pub fn to_json_string_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_json())?)
    }
}

fn render(value: &Value, visiting: &mut Vec<*const ()>) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(n) => Json::Number((*n).into()),
        Value::Float(n) => Number::from_f64(*n).map(Json::Number).unwrap_or(Json::Null),
        Value::Text(s) => Json::String(s.clone()),
        Value::Store(store) => render_store(store, visiting),
        Value::Map(map) => Json::Object(
            map.iter()
                .map(|(key, item)| (key.clone(), render(item, visiting)))
                .collect(),
        ),
        Value::List(items) => Json::Array(items.iter().map(|item| render(item, visiting)).collect()),
    }
}

fn render_store(store: &Store, visiting: &mut Vec<*const ()>) -> Json {
    let id = store.id();
    if visiting.contains(&id) {
        warn!("Store reference cycle rendered as null");
        return Json::Null;
    }

    visiting.push(id);
    let mut object = Map::new();
    for (key, value) in store.get_values() {
        let rendered = render(&value, visiting);
        object.insert(key, rendered);
    }
    visiting.pop();
    Json::Object(object)
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(_) => "an object",
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Json::deserialize(deserializer).map(Value::from_json)
    }
}

impl Serialize for Store {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
