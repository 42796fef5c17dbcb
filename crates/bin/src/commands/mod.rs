//! Command implementations.
//!
//! Each command works on a loaded store. Mutating commands return `true` so
//! the caller knows there is something to save.

pub mod read;
pub mod write;

use propbag::Store;

use crate::cli::Commands;
use crate::output::OutputFormat;

/// Run a parsed command against `store`, returning whether it changed the store
pub fn run(
    command: &Commands,
    store: &Store,
    format: OutputFormat,
) -> Result<bool, Box<dyn std::error::Error>> {
    match command {
        Commands::Get(args) => read::get(args, store, format).map(|_| false),
        Commands::Keys(args) => read::keys(args, store, format).map(|_| false),
        Commands::Dump => read::dump(store, format).map(|_| false),
        Commands::Set(args) => write::set(args, store, format).map(|_| true),
        Commands::Add(args) => write::add(args, store, format).map(|_| true),
        Commands::Insert(args) => write::insert(args, store, format).map(|_| true),
        Commands::Move(args) => write::move_to(args, store, format).map(|_| true),
        Commands::Remove(args) => write::remove(args, store, format).map(|_| true),
    }
}
