//! `pepil gateway`: Start the HTTP API server.

use pepil_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("페필이 Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Datasets:  {}", config.knowledge.data_dir.display());
    println!("   Origins:   {}", config.gateway.allowed_origins.join(", "));

    pepil_gateway::start(config).await?;

    Ok(())
}
