pub mod chat;
pub mod compile;
pub mod doctor;
pub mod gateway;
pub mod prompt;
pub mod status;

use std::path::PathBuf;

use pepil_config::AppConfig;

/// Load the config and apply a `--data-dir` override.
pub fn load_config(data_dir: Option<PathBuf>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    if let Some(dir) = data_dir {
        config.knowledge.data_dir = dir;
    }
    Ok(config)
}
