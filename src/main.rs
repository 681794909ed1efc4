use std::sync::Arc;

use paintbridge::{
    logger::{self, LoggerConfig},
    server, Config, ImageClient, ImageModel, UploadClient,
};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    logger::init_with_config(LoggerConfig::from_env())?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let config = Config::from_env();
    if let Err(e) = config.validate() {
        log::error!("❌ {}", e);
        log::error!("❌ Set CF_ACCOUNT_ID and CF_API_TOKEN to reach Workers AI");
        return Err(e.into());
    }

    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), &config);

    log::info!("🖼️  Available image generation models:");
    for (key, id, description) in ImageModel::supported_models() {
        log::info!("  {} -> {} ({})", key, id, description);
    }

    let inference = Arc::new(ImageClient::new(&config.workers_ai)?);
    let uploader = Arc::new(UploadClient::new(&config.image_host));

    server::run(&config, inference, uploader).await?;

    log::info!("👋 Server stopped");
    Ok(())
}
