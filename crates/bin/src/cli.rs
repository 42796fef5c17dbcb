//! CLI argument definitions for the propbag binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::output::OutputFormat;

/// Output format selection on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Format {
    /// Plain text and aligned tables
    Human,
    /// One JSON document per command
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Human => OutputFormat::Human,
            Format::Json => OutputFormat::Json,
        }
    }
}

/// Inspect and edit ordered property stores kept in JSON files
#[derive(Parser, Debug)]
#[command(name = "propbag")]
#[command(about = "propbag: ordered property stores on the command line")]
#[command(version)]
pub struct Cli {
    /// JSON file holding the store; a missing file starts an empty store
    #[arg(short, long, global = true, default_value = "propbag.json", env = "PROPBAG_FILE")]
    pub file: PathBuf,

    /// Output format
    #[arg(long, global = true, default_value = "human", env = "PROPBAG_FORMAT")]
    pub format: Format,

    /// Save changes made by mutating commands back to the file
    #[arg(short, long, global = true)]
    pub write: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read a value by key, position or path
    Get(GetArgs),
    /// Write a value by key or path
    Set(SetArgs),
    /// Append values under minted keys
    ///
    /// Minting resumes after the largest numeric key in the file. Keys removed
    /// above that point are not remembered between runs and may be minted again.
    Add(AddArgs),
    /// Insert values under minted keys before a key or position
    ///
    /// Keys are minted as for `add`.
    Insert(InsertArgs),
    /// Move an entry to a new position
    Move(MoveArgs),
    /// Remove entries by key or position
    Remove(RemoveArgs),
    /// List keys, or a named sub-value of every entry
    Keys(KeysArgs),
    /// Print every entry in order
    Dump,
}

/// Arguments for the get command
#[derive(clap::Args, Debug)]
pub struct GetArgs {
    /// Key, position or path such as `user.emails[0]`
    #[arg(allow_hyphen_values = true)]
    pub address: String,

    /// Value printed when the address does not resolve
    #[arg(short, long)]
    pub default: Option<String>,
}

/// Arguments for the set command
#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Key or path to write
    pub name: String,

    /// JSON value; text that is not valid JSON is stored as a string
    #[arg(allow_hyphen_values = true)]
    pub value: String,
}

/// Arguments for the add command
#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// JSON values; text that is not valid JSON is stored as a string
    #[arg(required = true, allow_hyphen_values = true)]
    pub values: Vec<String>,
}

/// Arguments for the insert command
#[derive(clap::Args, Debug)]
pub struct InsertArgs {
    /// Key or position to insert before
    #[arg(allow_hyphen_values = true)]
    pub position: String,

    /// JSON values; text that is not valid JSON is stored as a string
    #[arg(required = true, allow_hyphen_values = true)]
    pub values: Vec<String>,
}

/// Arguments for the move command
#[derive(clap::Args, Debug)]
pub struct MoveArgs {
    /// Key or position of the entry to move
    #[arg(allow_hyphen_values = true)]
    pub from: String,

    /// Key or position the entry should end up at
    #[arg(allow_hyphen_values = true)]
    pub to: String,
}

/// Arguments for the remove command
#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Keys or positions to remove
    #[arg(required = true, allow_hyphen_values = true)]
    pub targets: Vec<String>,
}

/// Arguments for the keys command
#[derive(clap::Args, Debug)]
pub struct KeysArgs {
    /// Sub-value to collect from every entry instead of listing keys
    pub name: Option<String>,
}
