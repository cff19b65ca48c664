//! Add, update and upsert command implementations.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use suitetalk_core::{Record, RecordRef, SessionClient};
use tokio::io::AsyncReadExt;

use crate::output;

#[derive(Args, Debug)]
pub struct WriteArgs {
    /// JSON file holding the record, or - for stdin
    pub file: PathBuf,

    /// Record type, if the JSON has no $type field
    #[arg(long = "type")]
    pub record_type: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub enum Mode {
    Add,
    Update,
    Upsert,
}

pub async fn run(client: &SessionClient, mode: Mode, args: WriteArgs) -> Result<()> {
    let value = read_json(&args.file).await?;
    let record = match &args.record_type {
        Some(record_type) => Record::with_type(record_type, value),
        None => Record::new(value),
    }
    .context("Invalid record")?;

    let (written, verb) = match mode {
        Mode::Add => (client.add(&record).await, "Added"),
        Mode::Update => (client.update(&record).await, "Updated"),
        Mode::Upsert => (client.upsert(&record).await, "Upserted"),
    };
    let written = written.with_context(|| format!("Failed to write {}", record.record_type()))?;

    output::success(&format!("{} {}", verb, record.record_type()));
    print_ref(&written);

    Ok(())
}

fn print_ref(record_ref: &RecordRef) {
    if let Some(id) = &record_ref.internal_id {
        output::field("Internal id", id);
    }
    if let Some(id) = &record_ref.external_id {
        output::field("External id", id);
    }
}

async fn read_json(path: &Path) -> Result<Value> {
    let text = if path.as_os_str() == "-" {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("Failed to read stdin")?;
        text
    } else {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?
    };

    serde_json::from_str(&text).context("Record is not valid JSON")
}
