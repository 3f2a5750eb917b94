mod bootstrap;

use color_eyre::eyre::Result;
use dotenv::dotenv;
use gymbook_api::config::parse_log_level;
use gymbook_socket::config::SocketConfig;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    bootstrap::init_tracing(parse_log_level(
        &std::env::var("LOG_LEVEL").unwrap_or_default(),
    ))?;

    let config = SocketConfig::from_env()?;
    let stores =
        bootstrap::prepare_stores(config.database_url.as_deref(), config.lock_timeout).await?;

    info!("Starting GymBook socket server");
    if let Err(e) = gymbook_socket::start_server(config, stores).await {
        error!("Socket server error: {:?}", e);
        return Err(e);
    }

    Ok(())
}
