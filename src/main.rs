// Entrypoint for the CLI application.
// - Keeps `main` small: load config, set up logging, build the API client
//   and hand it to the UI loop.
// - Returns `anyhow::Result` so an aborted action is reported on exit.

use quizdrive_cli::{api::ApiClient, config::Config, menu::Terminal, ui::{main_menu, Spinning}};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    // Logs go to stderr so they never mix with the menus on stdout.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let api = ApiClient::new(&config.base_url)?;
    info!(base_url = api.base_url(), "client ready");

    // Blocks until the operator picks "Exit".
    main_menu(&Spinning::new(api), &mut Terminal)?;
    Ok(())
}
