//! Client for the [ExchangeRate-API](https://www.exchangerate-api.com) pair
//! endpoints, plus the `xrate` command line built on it.

pub mod cli;
pub mod core;
pub mod error;
pub mod providers;

pub use crate::core::{Amount, Currency, CurrencyRateProvider, Rate};
pub use error::Error;
pub use providers::{ApiError, Client, ClientBuilder};

use anyhow::Result;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub enum AppCommand {
    Rate {
        base: Currency,
        target: Currency,
    },
    Convert {
        base: Currency,
        target: Currency,
        amount: Amount,
    },
}

/// Runs `command` with settings from `config_path` (or the default config
/// location). `api_key` takes precedence over any configured key.
pub async fn run_command(
    command: AppCommand,
    config_path: Option<&str>,
    api_key: Option<&str>,
) -> Result<()> {
    info!("xrate starting...");

    let config = match config_path {
        Some(path) => crate::core::config::AppConfig::load_from_path(path)?,
        None => crate::core::config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let mut builder = config.client_builder();
    if let Some(key) = api_key {
        builder = builder.api_key(key);
    }
    let client = builder.build()?;

    match command {
        AppCommand::Rate { base, target } => cli::convert::run_rate(&client, &base, &target).await,
        AppCommand::Convert {
            base,
            target,
            amount,
        } => cli::convert::run_convert(&client, &base, &target, amount).await,
    }
}
