//! `pepil chat`: Ask one question through the same pipeline the gateway uses.

use std::path::PathBuf;

use pepil_config::AppConfig;
use pepil_core::error::ProviderError;
use pepil_core::message::Message;
use pepil_gateway::ChatService;
use pepil_knowledge::DirectorySource;

pub async fn run(
    message: String,
    data_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(data_dir)?;

    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    PEPIL_API_KEY   = 'sk-...'");
        eprintln!("    OPENAI_API_KEY  = 'sk-...'");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let router = pepil_providers::build_from_config(&config);
    let provider = router
        .default()
        .ok_or_else(|| ProviderError::NotConfigured(config.default_provider.clone()))?;

    let chat = ChatService::new(
        provider,
        DirectorySource::new(config.knowledge.data_dir.clone()),
        &config.default_model,
    )
    .with_temperature(config.default_temperature)
    .with_max_tokens(config.default_max_tokens);

    tracing::debug!(provider = %chat.provider_name(), model = %chat.model(), "Asking");
    let reply = chat.reply(&[Message::user(message)]).await?;
    println!("{reply}");

    Ok(())
}
