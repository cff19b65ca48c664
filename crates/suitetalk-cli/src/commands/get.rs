//! Get and delete command implementations.

use anyhow::{Context, Result};
use clap::Args;
use suitetalk_core::{RecordRef, SessionClient};

use crate::output;

/// Identifies one record.
#[derive(Args, Debug)]
pub struct RefArgs {
    /// Record id (internal unless --external is given)
    pub id: String,

    /// Record type, e.g. customer
    #[arg(long = "type")]
    pub record_type: String,

    /// Treat the id as an external id
    #[arg(long)]
    pub external: bool,
}

impl RefArgs {
    fn record_ref(&self) -> RecordRef {
        let record_ref = if self.external {
            RecordRef::external(&self.id)
        } else {
            RecordRef::internal(&self.id)
        };
        record_ref.with_type(&self.record_type)
    }
}

#[derive(Args, Debug)]
pub struct GetArgs {
    #[command(flatten)]
    pub record: RefArgs,

    /// Print compact JSON
    #[arg(long)]
    pub compact: bool,
}

pub async fn run(client: &SessionClient, args: GetArgs) -> Result<()> {
    let record = client
        .get(&args.record.record_ref())
        .await
        .context("Failed to get record")?;

    if args.compact {
        output::json(record.as_value())
    } else {
        output::json_pretty(record.as_value())
    }
}

pub async fn delete(client: &SessionClient, args: RefArgs) -> Result<()> {
    let deleted = client
        .delete(&args.record_ref())
        .await
        .context("Failed to delete record")?;

    output::success(&format!("Deleted {} {}", args.record_type, args.id));
    if let Some(id) = &deleted.internal_id {
        output::field("Internal id", id);
    }

    Ok(())
}
