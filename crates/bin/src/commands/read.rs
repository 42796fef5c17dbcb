//! Read-only commands: get, keys and dump.

use propbag::{Store, Value};

use crate::cli::{GetArgs, KeysArgs};
use crate::document::parse_locator;
use crate::output::{OutputFormat, print_table, print_value};

/// Run the get command
pub fn get(args: &GetArgs, store: &Store, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let locator = parse_locator(store, &args.address);
    let default = args
        .default
        .as_deref()
        .map(Value::from)
        .unwrap_or_else(Value::empty);
    let value = store.get_or(locator, default);
    print_value(&value, format)
}

/// Run the keys command
pub fn keys(args: &KeysArgs, store: &Store, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Human => println!("{}", store.property_list(args.name.as_deref())),
        OutputFormat::Json => {
            let items = match &args.name {
                None => serde_json::to_string(&store.keys())?,
                Some(name) => serde_json::to_string(&store.sub_values(name))?,
            };
            println!("{items}");
        }
    }
    Ok(())
}

/// Run the dump command
pub fn dump(store: &Store, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Human => {
            if store.is_empty() {
                println!("Store is empty.");
                return Ok(());
            }
            let rows: Vec<Vec<String>> = store
                .get_values()
                .into_iter()
                .enumerate()
                .map(|(position, (key, value))| {
                    vec![
                        position.to_string(),
                        key,
                        value.type_name().to_string(),
                        value.to_string(),
                    ]
                })
                .collect();
            print_table(&["POS", "KEY", "TYPE", "VALUE"], &rows);
        }
        OutputFormat::Json => println!("{}", store.to_json_string_pretty()?),
    }
    Ok(())
}
