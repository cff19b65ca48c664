//! Endpoint command implementation.

use anyhow::{Context, Result};
use clap::Args;
use suitetalk_core::SessionClient;

use crate::output;

#[derive(Args, Debug)]
pub struct EndpointArgs {
    /// Print the data center domains for this account instead
    #[arg(long)]
    pub data_center: bool,
}

pub async fn run(client: &SessionClient, args: EndpointArgs) -> Result<()> {
    let config = client.config();

    if args.data_center {
        let urls = client
            .get_data_center_urls(config.account())
            .await
            .context("Failed to look up data center")?;
        output::field("Web services", &urls.webservices_domain);
        if let Some(rest) = &urls.rest_domain {
            output::field("REST", rest);
        }
        if let Some(system) = &urls.system_domain {
            output::field("System", system);
        }
        return Ok(());
    }

    let location = client
        .resolve_endpoint()
        .await
        .context("Failed to resolve endpoint")?;

    output::field("Account", config.account());
    output::field("Host", config.host().as_str());
    output::field("Endpoint", location);

    Ok(())
}
