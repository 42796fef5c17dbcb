//! Mutating commands: set, add, insert, move and remove.

use propbag::Store;

use crate::cli::{AddArgs, InsertArgs, MoveArgs, RemoveArgs, SetArgs};
use crate::document::{parse_locator, parse_value};
use crate::output::{OutputFormat, print_value};

/// Run the set command
pub fn set(args: &SetArgs, store: &Store, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let value = store.set(args.name.as_str(), parse_value(&args.value));
    print_value(&value, format)
}

/// Run the add command
pub fn add(args: &AddArgs, store: &Store, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let before = store.keys();
    store.add(args.values.iter().map(|text| parse_value(text)));
    print_new_keys(store, &before, format)
}

/// Run the insert command
pub fn insert(args: &InsertArgs, store: &Store, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let before = store.keys();
    let position = parse_locator(store, &args.position);
    store.insert_at(position, args.values.iter().map(|text| parse_value(text)));
    print_new_keys(store, &before, format)
}

/// Run the move command
pub fn move_to(args: &MoveArgs, store: &Store, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let from = parse_locator(store, &args.from);
    let to = parse_locator(store, &args.to);
    store.move_to(from, to)?;
    print_order(store, format)
}

/// Run the remove command
pub fn remove(args: &RemoveArgs, store: &Store, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let targets: Vec<_> = args
        .targets
        .iter()
        .map(|text| parse_locator(store, text))
        .collect();
    store.remove(targets);
    print_order(store, format)
}

fn print_new_keys(store: &Store, before: &[String], format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let minted: Vec<String> = store
        .keys()
        .into_iter()
        .filter(|key| !before.contains(key))
        .collect();
    match format {
        OutputFormat::Human => println!("{}", minted.join(",")),
        OutputFormat::Json => println!("{}", serde_json::to_string(&minted)?),
    }
    Ok(())
}

fn print_order(store: &Store, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Human => println!("{}", store.property_list(None)),
        OutputFormat::Json => println!("{}", serde_json::to_string(&store.keys())?),
    }
    Ok(())
}
