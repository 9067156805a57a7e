//! The `lens providers` command.

use super::KeyArgs;
use clap::Args;
use lens_core::{AuthType, Config, ProviderConfig, VisionClient};
use serde::Serialize;

/// Arguments for the `providers` command.
#[derive(Args, Debug)]
pub struct ProvidersArgs {
    /// Output as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub keys: KeyArgs,
}

#[derive(Serialize)]
struct ProviderRow<'a> {
    priority: usize,
    name: &'a str,
    model: Option<&'a str>,
    auth: AuthType,
    timeout_ms: u64,
    max_retries: u32,
    endpoint: &'a str,
}

impl<'a> ProviderRow<'a> {
    fn new(priority: usize, provider: &'a ProviderConfig) -> Self {
        Self {
            priority,
            name: &provider.name,
            model: provider.model.as_deref(),
            auth: provider.auth_type,
            timeout_ms: provider.timeout_ms,
            max_retries: provider.max_retries,
            endpoint: &provider.endpoint,
        }
    }
}

/// Execute the providers command.
pub fn execute(args: ProvidersArgs, config: &Config) -> anyhow::Result<()> {
    let keys = args.keys.key_store(config);
    let families = keys.configured_families();
    let client = VisionClient::from_config(config, keys);

    let rows: Vec<ProviderRow<'_>> = client
        .providers()
        .iter()
        .enumerate()
        .map(|(i, p)| ProviderRow::new(i + 1, p))
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if families.is_empty() {
        println!("Credentials: none (free tier only)");
    } else {
        println!("Credentials: {}", families.join(", "));
    }
    println!();
    println!(
        "{:>3}  {:<30} {:<12} {:>8} {:>7}  MODEL",
        "#", "NAME", "AUTH", "TIMEOUT", "RETRIES"
    );
    for row in &rows {
        println!(
            "{:>3}  {:<30} {:<12} {:>7}s {:>7}  {}",
            row.priority,
            row.name,
            row.auth.to_string(),
            row.timeout_ms / 1000,
            row.max_retries,
            row.model.unwrap_or("-"),
        );
    }

    Ok(())
}
