use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod document;
mod output;

use cli::Cli;
use output::OutputFormat;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing; logs go to stderr so command output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("propbag=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let format = OutputFormat::from(cli.format);
    let store = document::load(&cli.file)?;

    let changed = commands::run(&cli.command, &store, format)?;

    if changed && cli.write {
        document::save(&store, &cli.file)?;
    } else if changed {
        tracing::debug!("Changes not saved; pass --write to update {}", cli.file.display());
    }

    Ok(())
}
