//! `pepil status`: Show the effective configuration.

use pepil_config::AppConfig;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("페필이 Status");
    println!("============");
    println!("  Config dir:   {}", AppConfig::config_dir().display());
    println!("  Provider:     {}", config.default_provider);
    println!("  Model:        {}", config.default_model);
    println!("  Temperature:  {}", config.default_temperature);
    println!("  Max tokens:   {}", config.default_max_tokens);
    println!("  API key:      {}", if config.has_api_key() { "configured" } else { "missing" });
    println!("  Gateway:      {}:{}", config.gateway.host, config.gateway.port);
    println!("  CORS origins: {}", config.gateway.allowed_origins.join(", "));
    println!("  Datasets:     {}", config.knowledge.data_dir.display());

    let mut providers: Vec<&str> = config.providers.keys().map(|s| s.as_str()).collect();
    providers.sort_unstable();
    if !providers.is_empty() {
        println!("  Providers:    {}", providers.join(", "));
    }

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file, using defaults and environment");
    }

    Ok(())
}
