mod bootstrap;

use color_eyre::eyre::Result;
use dotenv::dotenv;
use gymbook_api::config::ApiConfig;
use gymbook_socket::config::SocketConfig;
use tracing::info;

/// Runs the HTTP API and the line-protocol server side by side over one set
/// of stores, so both see the same slots even on the in-memory backend.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    let config = ApiConfig::from_env()?;
    let socket_config = SocketConfig::from_env()?;
    bootstrap::init_tracing(config.log_level)?;

    info!("Starting GymBook {}", env!("CARGO_PKG_VERSION"));
    let stores =
        bootstrap::prepare_stores(config.database_url.as_deref(), config.lock_timeout).await?;

    tokio::try_join!(
        gymbook_api::start_server(config, stores.clone()),
        gymbook_socket::start_server(socket_config, stores),
    )?;

    Ok(())
}
