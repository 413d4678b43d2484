pub mod cli;
pub mod client;
pub mod core;
pub mod providers;
pub mod server;

use crate::cli::TerminalView;
use crate::client::{HttpRateApi, RateClient};
use crate::core::config::AppConfig;
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    /// Run the HTTP rate service.
    Serve,
    /// Run the interactive terminal client.
    Client,
    /// Convert once and exit.
    Convert {
        amount: String,
        from: String,
        to: String,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxview starting...");

    let config = AppConfig::load(config_path)?;
    debug!(
        port = config.server.port,
        live_upstream = config.live_upstream().is_some(),
        server_url = %config.client.server_url,
        "Loaded config"
    );

    match command {
        AppCommand::Serve => server::serve(&config).await,
        AppCommand::Client => {
            let api = HttpRateApi::new(&config.client.server_url)?;
            let mut client = RateClient::new(api, TerminalView::new());
            cli::interactive::run(&mut client).await
        }
        AppCommand::Convert { amount, from, to } => {
            let api = HttpRateApi::new(&config.client.server_url)?;
            let mut client = RateClient::new(api, TerminalView::new());
            client.convert_amount(&amount, &from, &to).await?;
            Ok(())
        }
    }
}
