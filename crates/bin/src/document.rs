//! Loading and saving stores as JSON files.

use std::{fs, io, path::Path};

use propbag::{Locator, Store, Value};

/// Load a store from `path`, starting empty if the file does not exist.
///
/// Minting resumes after the largest numeric key in the file. The counter
/// itself is not saved, so keys minted and removed past that point can recur.
pub fn load(path: &Path) -> propbag::Result<Store> {
    match fs::read_to_string(path) {
        Ok(text) => {
            let store = Store::from_json_str(&text)?;
            if let Some(next) = next_minted_key(&store) {
                store.reserve_minted_keys(next);
            }
            tracing::debug!("Loaded {} entries from {}", store.len(), path.display());
            Ok(store)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::info!("No store at {}; starting empty", path.display());
            Ok(Store::new())
        }
        Err(e) => Err(e.into()),
    }
}

fn next_minted_key(store: &Store) -> Option<u64> {
    store
        .keys()
        .iter()
        .filter_map(|key| key.parse::<u64>().ok())
        .max()
        .map(|largest| largest.saturating_add(1))
}

/// Save a store to `path` as indented JSON
pub fn save(store: &Store, path: &Path) -> propbag::Result<()> {
    let text = store.to_json_string_pretty()?;
    fs::write(path, text + "\n")?;
    tracing::info!("Saved {} entries to {}", store.len(), path.display());
    Ok(())
}

/// Parse a command-line value as JSON, falling back to plain text
pub fn parse_value(text: &str) -> Value {
    serde_json::from_str(text)
        .map(Value::from_json)
        .unwrap_or_else(|_| Value::from(text))
}

/// Interpret a command-line locator against `store`.
///
/// Existing keys win; otherwise integers are positions and anything else is a name.
pub fn parse_locator(store: &Store, text: &str) -> Locator {
    if store.exists(text) {
        return Locator::from(text);
    }
    match text.trim().parse::<i64>() {
        Ok(position) => Locator::Position(position),
        Err(_) => Locator::from(text),
    }
}
