//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::commands::{endpoint, get, search, write};

/// SuiteTalk web services explorer.
#[derive(Parser, Debug)]
#[command(name = "suitetalk")]
#[command(author, version = env!("SUITETALK_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides applied on top of the `NETSUITE_*` environment.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Web services host (overrides NETSUITE_HOST)
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Endpoint version, e.g. 2019_1 (overrides NETSUITE_ENDPOINT)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Write every request and response into this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve and print the account's web services endpoint
    Endpoint(endpoint::EndpointArgs),

    /// Fetch a single record
    Get(get::GetArgs),

    /// Add a record read from a JSON file
    Add(write::WriteArgs),

    /// Update a record read from a JSON file
    Update(write::WriteArgs),

    /// Add or update a record read from a JSON file
    Upsert(write::WriteArgs),

    /// Delete a record
    Delete(get::RefArgs),

    /// Run a search and print every matching record
    Search(search::SearchArgs),
}
