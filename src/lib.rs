pub mod cli;
pub mod config;
pub mod core;
pub mod providers;
pub mod store;
pub mod update;

use anyhow::Result;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy)]
pub enum AppCommand {
    Update,
    Show,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("ETF share tracker starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let store = store::SeriesStore::new(config.data_dir()?);
    let renderer = cli::chart::TerminalChart::new();

    match command {
        AppCommand::Update => {
            let provider = providers::jisilu::JisiluProvider::new(
                &config.provider.base_url,
                config.market_close_hour,
            );
            update::update_funds(&config.funds, &provider, &store, &renderer).await
        }
        AppCommand::Show => update::show_funds(&config.funds, &store, &renderer),
    }
}
