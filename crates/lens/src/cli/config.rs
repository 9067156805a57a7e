//! The `lens config` command for configuration management.

use clap::{Args, Subcommand};
use lens_core::credentials::resolve_env_var;
use lens_core::Config;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display current configuration (literal keys are masked)
    Show,

    /// Show config file path
    Path,

    /// Initialize a new config file with defaults
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Report which credential families resolve to a key
    Credentials,
}

/// Execute the config command.
pub async fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = masked(Config::load()?);
            println!("{}", config.to_toml()?);
        }

        ConfigCommand::Path => {
            println!("{}", Config::default_path().display());
        }

        ConfigCommand::Init { force } => {
            let path = Config::default_path();

            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at: {}\nUse --force to overwrite.",
                    path.display()
                );
            }

            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&path, Config::default().to_toml()?).await?;

            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }

        ConfigCommand::Credentials => {
            let config = Config::load()?;
            let mut families: Vec<_> = config.credentials.iter().collect();
            families.sort();
            for (family, value) in families {
                let status = if resolve_env_var(value).is_some() {
                    "configured"
                } else {
                    "missing"
                };
                println!("{family:<12} {status}");
            }
        }
    }

    Ok(())
}

/// Replace literal key values with a mask; `${ENV_VAR}` references stay visible.
fn masked(mut config: Config) -> Config {
    for value in config.credentials.values_mut() {
        if !value.is_empty() && !value.starts_with("${") {
            *value = "********".to_string();
        }
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_hides_literal_keys_only() {
        let mut config = Config::default();
        config
            .credentials
            .insert("openrouter".into(), "sk-or-secret".into());

        let config = masked(config);
        assert_eq!(config.credentials["openrouter"], "********");
        assert_eq!(config.credentials["google"], "${GOOGLE_GEMINI_API_KEY}");
    }
}
