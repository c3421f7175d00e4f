use std::error::Error;

mod app;
mod automation;
mod cli;
mod config;
mod error;
mod models;
mod scanning;
mod shutdown;
mod store;
mod validity;

use app::App;
use cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli_args = CliArgs::parse_args();

    cli_args.validate()?;

    let log_level = match cli_args.log_level.as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .init();

    tracing::info!("Starting AlohaQ appointment scan");

    let shutdown_manager = shutdown::setup_shutdown_handler();

    let config = config::AppConfig::load_with_cli_args(&cli_args)?;

    let app = App::new(config);

    match app.run(&shutdown_manager).await {
        Ok(Some(record)) => {
            tracing::info!(
                code = %record.confirmation_code,
                location = %record.location_name,
                "Booked an earlier appointment, stopping"
            );
        }
        Ok(None) => {
            tracing::info!("Scan interrupted before a booking was made");
        }
        Err(e) => {
            tracing::error!("Scan failed: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
