use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use xrate::core::log::init_logging;
use xrate::{Amount, Currency};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// API key, overrides the configuration file and EXCHANGE_RATE_API_KEY
    #[arg(short = 'k', long, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show the exchange rate from BASE to TARGET
    Rate { base: Currency, target: Currency },
    /// Convert AMOUNT of BASE into TARGET
    Convert {
        base: Currency,
        target: Currency,
        amount: Amount,
    },
}

impl From<Commands> for xrate::AppCommand {
    fn from(cmd: Commands) -> xrate::AppCommand {
        match cmd {
            Commands::Rate { base, target } => xrate::AppCommand::Rate { base, target },
            Commands::Convert {
                base,
                target,
                amount,
            } => xrate::AppCommand::Convert {
                base,
                target,
                amount,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => xrate::cli::setup::setup(),
        Some(cmd) => {
            xrate::run_command(
                cmd.into(),
                cli.config_path.as_deref(),
                cli.api_key.as_deref(),
            )
            .await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
