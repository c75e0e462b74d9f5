use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use quickfill_analytics::AnalyticsConfig;
use quickfill_suggest::{Directory, EngineConfig, Member};

const CONFIG_DIR_NAME: &str = "quickfill";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    /// Assignee directory; the built-in one is used when empty.
    #[serde(default)]
    pub directory: Vec<Member>,
}

/// OpenAI-compatible completion endpoint used for external suggestions.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "ProviderConfig::default_base_url")]
    pub base_url: String,
    #[serde(default = "ProviderConfig::default_model")]
    pub model: String,
    #[serde(default = "ProviderConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: String::new(),
            base_url: Self::default_base_url(),
            model: Self::default_model(),
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

impl ProviderConfig {
    fn default_base_url() -> String {
        "https://api.openai.com/v1".to_string()
    }

    fn default_model() -> String {
        "gpt-4o-mini".to_string()
    }

    const fn default_timeout_secs() -> u64 {
        8
    }

    /// Enabled and carrying a key.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.enabled && !self.api_key.trim().is_empty()
    }
}

impl Config {
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join(CONFIG_DIR_NAME))
    }

    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            anyhow::bail!(
                "Config file not found at: {}. Please run 'quickfill init' to create config.",
                config_path.display()
            );
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load the config file, or fall back to defaults when there is none.
    /// A file that exists but cannot be parsed is still an error.
    pub fn load_or_default() -> anyhow::Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            info!("No config at {}, using defaults", config_path.display());
            Ok(Self::default())
        }
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    /// Directory holding persisted analytics.
    pub fn data_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.analytics.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::config_dir()?.join("data")),
        }
    }

    #[must_use]
    pub fn assignee_directory(&self) -> Directory {
        if self.directory.is_empty() {
            Directory::default()
        } else {
            Directory::new(self.directory.clone())
        }
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        std::fs::write(&config_path, CONFIG_TEMPLATE)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Optionally set provider.api_key and provider.enabled for external suggestions");
        println!("   2. Run 'quickfill analyze \"call Mike tomorrow at 2pm\"' to try it out");
        println!();
        println!("🔧 Configuration options:");
        println!("   - provider.base_url: any OpenAI-compatible endpoint");
        println!("   - engine.template_min_score: how closely text must match before a template is merged");
        println!("   - analytics.autosave: persist usage counters after every command");
        println!("   - directory: people that can be suggested as assignees");
        println!();
        Ok(())
    }
}

const CONFIG_TEMPLATE: &str = r#"{
  "provider": {
    "enabled": false,
    "api_key": "your-api-key-here",
    "base_url": "https://api.openai.com/v1",
    "model": "gpt-4o-mini",
    "timeout_secs": 8
  },
  "engine": {
    "use_external": true,
    "template_min_score": 0.25,
    "max_templates": 3,
    "min_confidence": 0.0
  },
  "analytics": {
    "enabled": true,
    "autosave": true
  },
  "directory": [
    { "handle": "mike", "name": "Mike Chen" },
    { "handle": "sarah", "name": "Sarah Miller" }
  ]
}"#;
