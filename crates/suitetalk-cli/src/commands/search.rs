//! Search command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use futures_util::StreamExt;
use serde_json::{Map, Value};
use suitetalk_core::{Record, SearchRecord, SessionClient};
use tracing::info;

use crate::output;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search type, e.g. CustomerSearchBasic
    pub search_type: String,

    /// Search criteria as a JSON object of fields
    #[arg(long)]
    pub criteria: Option<String>,

    /// Only print the number of matching records
    #[arg(long)]
    pub count: bool,

    /// Records fetched per page
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Stop after this many records
    #[arg(long)]
    pub limit: Option<usize>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(client: &SessionClient, args: SearchArgs) -> Result<()> {
    let fields = match &args.criteria {
        Some(text) => serde_json::from_str(text).context("--criteria is not valid JSON")?,
        None => Value::Object(Map::new()),
    };
    let criteria = Record::with_type(&args.search_type, fields)
        .map(SearchRecord::from)
        .context("Invalid search criteria")?;

    let mut session = client.search_session(criteria);
    if let Some(page_size) = args.page_size {
        session = session.with_page_size(page_size);
    }

    if args.count {
        let total = session.count().await.context("Search failed")?;
        println!("{}", total);
        return Ok(());
    }

    let total = session.count().await.context("Search failed")?;
    info!(total, "Search started");

    let limit = args.limit.unwrap_or(usize::MAX);
    let mut records = session.into_stream().take(limit);
    let mut printed = 0usize;
    while let Some(record) = records.next().await {
        let record = record.context("Failed to fetch next page")?;
        if args.pretty {
            output::json_pretty(record.as_value())?;
        } else {
            output::json(record.as_value())?;
        }
        printed += 1;
    }

    if printed == 0 {
        eprintln!("{}", "No records found.".dimmed());
    } else {
        eprintln!("{}: {} of {}", "Records".dimmed(), printed, total);
    }

    Ok(())
}
