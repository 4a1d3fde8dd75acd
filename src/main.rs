use color_eyre::eyre::Result;
use dotenv::dotenv;
use slotbook_api::config::ApiConfig;
use slotbook_store::open_store;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;

    // Initialize tracing for logging
    slotbook_api::init_tracing(config.log_level)?;

    // Open the configured data source
    let store = open_store(config.store_backend, &config.data_dir).await?;

    // Start API server
    slotbook_api::start_server(config, store).await?;

    Ok(())
}
