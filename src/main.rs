use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxview::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Run the rate service
    Serve,
    /// Start the interactive rate client
    Client,
    /// Convert an amount between two currencies
    Convert {
        amount: String,
        from: String,
        to: String,
    },
}

impl From<Commands> for fxview::AppCommand {
    fn from(cmd: Commands) -> fxview::AppCommand {
        match cmd {
            Commands::Serve => fxview::AppCommand::Serve,
            Commands::Client => fxview::AppCommand::Client,
            Commands::Convert { amount, from, to } => {
                fxview::AppCommand::Convert { amount, from, to }
            }
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    let result = match cli.command {
        Some(Commands::Setup) => fxview::cli::setup::setup(),
        Some(cmd) => fxview::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
