//! CLI command definitions and dispatch.

mod hooks;
mod search;
mod show;
mod version;
mod versions;

use clap::{Parser, Subcommand};

/// Please - containerized command-line tools on demand.
#[derive(Parser)]
#[command(name = "please", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Command {
    /// Search the package catalogs
    Search(search::SearchArgs),
    /// Show information about a package
    Show(show::ShowArgs),
    /// List the available versions of a package
    Versions(versions::VersionsArgs),
    /// Print the install hooks of a package
    Hooks(hooks::HooksArgs),
    /// Show version information
    Version(version::VersionArgs),
}

/// Dispatch a parsed CLI to the appropriate command handler.
pub async fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Search(args) => search::execute(args).await,
        Command::Show(args) => show::execute(args).await,
        Command::Versions(args) => versions::execute(args).await,
        Command::Hooks(args) => hooks::execute(args).await,
        Command::Version(args) => version::execute(args).await,
    }
}
