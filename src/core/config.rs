use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

fn default_swipe_threshold() -> f32 {
    50.0
}

fn default_autoplay_retry_delay_ms() -> u64 {
    100
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Origin uploaded media is served from, e.g. "https://cdn.example.com".
    /// `None` keeps hosted paths site-relative so a dev proxy can rewrite them.
    #[serde(default)]
    pub media_base_url: Option<String>,
    /// Minimum horizontal drag (in px) that counts as a swipe.
    #[serde(default = "default_swipe_threshold")]
    pub swipe_threshold: f32,
    /// How long after loaded-metadata the deferred autoplay retry fires.
    #[serde(default = "default_autoplay_retry_delay_ms")]
    pub autoplay_retry_delay_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            media_base_url: None,
            swipe_threshold: default_swipe_threshold(),
            autoplay_retry_delay_ms: default_autoplay_retry_delay_ms(),
        }
    }
}

impl PlayerConfig {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path).map_err(|e| {
                anyhow::anyhow!(
                    "Failed to read config file at {}: {}",
                    config_path.display(),
                    e
                )
            })?;

            // If the file exists but no longer parses, rewrite it with defaults
            // rather than refusing to start.
            match serde_json::from_str::<Self>(&content) {
                Ok(config) => {
                    log::info!("Loaded existing config from {}", config_path.display());
                    Ok(config)
                }
                Err(e) => {
                    log::warn!(
                        "Config file exists but has issues ({}), creating new one with defaults",
                        e
                    );
                    let new_config = Self::default();
                    new_config
                        .save()
                        .map_err(|save_err| anyhow::anyhow!("Failed to save new config: {}", save_err))?;
                    log::info!("Created new config file at {}", config_path.display());
                    Ok(new_config)
                }
            }
        } else {
            log::info!("No config file found, creating default config");
            let config = Self::default();
            config
                .save()
                .map_err(|e| anyhow::anyhow!("Failed to save default config: {}", e))?;
            log::info!("Created new config file at {}", config_path.display());
            Ok(config)
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("immersive-player")
            .join("config.json")
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.autoplay_retry_delay_ms)
    }
}
