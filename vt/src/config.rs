//! Ventask configuration types and loading

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::llm::Provider;

/// Main ventask configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Prompt template configuration
    pub prompt: PromptConfig,

    /// Recurrence timing
    pub recurrence: RecurrenceConfig,

    /// Storage locations
    pub storage: StorageConfig,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Validate configuration before use
    ///
    /// The API key is not checked here: it may come from saved settings
    /// rather than the environment, and most commands never need it.
    pub fn validate(&self) -> Result<()> {
        self.llm
            .provider
            .parse::<Provider>()
            .map_err(|e| eyre::eyre!("{}. Supported: openai, anthropic", e))?;

        if self.llm.max_tokens == 0 {
            return Err(eyre::eyre!("llm.max-tokens must be greater than zero"));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(eyre::eyre!(
                "llm.temperature must be between 0 and 2, got {}",
                self.llm.temperature
            ));
        }
        if self.recurrence.sweep_interval_secs == 0 {
            return Err(eyre::eyre!("recurrence.sweep-interval-secs must be greater than zero"));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .ventask.yml
        let local_config = PathBuf::from(".ventask.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/ventask/ventask.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("ventask").join("ventask.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read just the log level, before logging is set up
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::load(config_path).ok().and_then(|c| c.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Default provider ("openai" or "anthropic"); saved settings override it
    pub provider: String,

    /// Environment variable holding the API key; defaults per provider
    #[serde(rename = "api-key-env")]
    pub api_key_env: Option<String>,

    /// OpenAI overrides
    pub openai: ProviderOverrides,

    /// Anthropic overrides
    pub anthropic: ProviderOverrides,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Sampling temperature (OpenAI only)
    pub temperature: f32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: Provider::OpenAi.to_string(),
            api_key_env: None,
            openai: ProviderOverrides::default(),
            anthropic: ProviderOverrides::default(),
            max_tokens: 1000,
            temperature: 0.7,
            timeout_ms: 60_000,
        }
    }
}

impl LlmConfig {
    /// Merge per-provider overrides with provider defaults
    pub fn resolve(&self, provider: Provider) -> ResolvedLlmConfig {
        let overrides = match provider {
            Provider::OpenAi => &self.openai,
            Provider::Anthropic => &self.anthropic,
        };

        ResolvedLlmConfig {
            provider,
            model: overrides
                .model
                .clone()
                .unwrap_or_else(|| provider.default_model().to_string()),
            base_url: overrides
                .base_url
                .clone()
                .unwrap_or_else(|| provider.default_base_url().to_string()),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout_ms: self.timeout_ms,
        }
    }

    /// Environment variable consulted for the API key
    pub fn api_key_env_for(&self, provider: Provider) -> String {
        self.api_key_env
            .clone()
            .unwrap_or_else(|| provider.default_api_key_env().to_string())
    }

    /// API key from the environment, if set and non-blank
    pub fn env_api_key(&self, provider: Provider) -> Option<String> {
        std::env::var(self.api_key_env_for(provider))
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

/// Optional model / endpoint overrides for one provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderOverrides {
    pub model: Option<String>,

    #[serde(rename = "base-url")]
    pub base_url: Option<String>,
}

/// Fully resolved settings for one provider call
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLlmConfig {
    pub provider: Provider,
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_ms: u64,
}

/// Prompt template configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Inline template containing a `{text}` placeholder
    pub template: Option<String>,

    /// Template read from a file; `template` wins when both are set
    #[serde(rename = "template-file")]
    pub template_file: Option<PathBuf>,
}

impl PromptConfig {
    /// The configured template, if any is set and non-blank
    pub fn custom_template(&self) -> Result<Option<String>> {
        if let Some(template) = self.template.as_ref().filter(|t| !t.trim().is_empty()) {
            return Ok(Some(template.clone()));
        }
        match &self.template_file {
            Some(path) => {
                let template = fs::read_to_string(path)
                    .context(format!("Failed to read prompt template {}", path.display()))?;
                Ok((!template.trim().is_empty()).then_some(template))
            }
            None => Ok(None),
        }
    }
}

/// Recurrence timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecurrenceConfig {
    /// Seconds between sweeps in `vt watch`
    #[serde(rename = "sweep-interval-secs")]
    pub sweep_interval_secs: u64,

    /// Delay before a just-completed recurring task reopens
    #[serde(rename = "reset-delay-ms")]
    pub reset_delay_ms: u64,
}

impl Default for RecurrenceConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: 300,
            reset_delay_ms: 2000,
        }
    }
}

impl RecurrenceConfig {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }
}

/// Storage locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for the ventstore database
    #[serde(rename = "store-dir")]
    pub store_dir: PathBuf,

    /// Directory for the local JSON cache
    #[serde(rename = "cache-dir")]
    pub cache_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        // Use XDG data directory (~/.local/share/ventask on Linux)
        let base = dirs::data_local_dir()
            .map(|d| d.join("ventask"))
            .unwrap_or_else(|| PathBuf::from(".ventask"));

        Self {
            store_dir: base.join("store"),
            cache_dir: base.join("cache"),
        }
    }
}

impl StorageConfig {
    /// Both directories under one root (used by tests and `--data-dir`)
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            store_dir: root.join("store"),
            cache_dir: root.join("cache"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.llm.provider, "openai");
        assert_eq!(config.llm.max_tokens, 1000);
        assert_eq!(config.llm.timeout_ms, 60_000);
        assert_eq!(config.recurrence.sweep_interval(), Duration::from_secs(300));
        assert_eq!(config.recurrence.reset_delay(), Duration::from_millis(2000));
        assert!(config.log_level.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resolve_uses_provider_defaults() {
        let config = LlmConfig::default();

        let openai = config.resolve(Provider::OpenAi);
        assert_eq!(openai.model, "gpt-4o");
        assert_eq!(openai.base_url, "https://api.openai.com");

        let anthropic = config.resolve(Provider::Anthropic);
        assert_eq!(anthropic.model, "claude-3-haiku-20240307");
        assert_eq!(anthropic.base_url, "https://api.anthropic.com");
        assert_eq!(anthropic.max_tokens, 1000);
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
llm:
  provider: anthropic
  api-key-env: MY_KEY
  anthropic:
    model: claude-3-5-haiku-latest
    base-url: http://localhost:9000
  max-tokens: 2000
  temperature: 0.2
  timeout-ms: 30000

prompt:
  template: "Turn these into tasks: {text}"

recurrence:
  sweep-interval-secs: 60
  reset-delay-ms: 500

storage:
  store-dir: /tmp/vt/store
  cache-dir: /tmp/vt/cache

log-level: debug
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.llm.provider, "anthropic");
        assert_eq!(config.llm.api_key_env_for(Provider::Anthropic), "MY_KEY");
        let resolved = config.llm.resolve(Provider::Anthropic);
        assert_eq!(resolved.model, "claude-3-5-haiku-latest");
        assert_eq!(resolved.base_url, "http://localhost:9000");
        assert_eq!(resolved.max_tokens, 2000);
        assert_eq!(resolved.timeout_ms, 30_000);
        assert_eq!(
            config.prompt.custom_template().unwrap().as_deref(),
            Some("Turn these into tasks: {text}")
        );
        assert_eq!(config.recurrence.sweep_interval_secs, 60);
        assert_eq!(config.storage.store_dir, PathBuf::from("/tmp/vt/store"));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
llm:
  openai:
    model: gpt-4o-mini
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.llm.provider, "openai");
        assert_eq!(config.llm.max_tokens, 1000);
        let resolved = config.llm.resolve(Provider::OpenAi);
        assert_eq!(resolved.model, "gpt-4o-mini");
        assert_eq!(resolved.base_url, "https://api.openai.com");
        assert_eq!(config.recurrence.reset_delay_ms, 2000);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.llm.provider = "cohere".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.llm.temperature = 3.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.recurrence.sweep_interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_template_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("prompt.txt");
        fs::write(&path, "Custom: {text}").unwrap();

        let prompt = PromptConfig {
            template: None,
            template_file: Some(path),
        };
        assert_eq!(prompt.custom_template().unwrap().as_deref(), Some("Custom: {text}"));

        let blank = PromptConfig {
            template: Some("   ".to_string()),
            template_file: None,
        };
        assert_eq!(blank.custom_template().unwrap(), None);
    }

    #[test]
    fn test_load_explicit_path() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("ventask.yml");
        fs::write(&path, "log-level: warn\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.log_level.as_deref(), Some("warn"));
        assert_eq!(Config::load_log_level(Some(&path)).as_deref(), Some("warn"));

        let missing = temp.path().join("missing.yml");
        assert!(Config::load(Some(&missing)).is_err());
    }

    #[test]
    #[serial]
    fn test_env_api_key() {
        let config = LlmConfig {
            api_key_env: Some("VENTASK_TEST_API_KEY".to_string()),
            ..Default::default()
        };

        unsafe { std::env::remove_var("VENTASK_TEST_API_KEY") };
        assert_eq!(config.env_api_key(Provider::OpenAi), None);

        unsafe { std::env::set_var("VENTASK_TEST_API_KEY", "  sk-test  ") };
        assert_eq!(config.env_api_key(Provider::OpenAi).as_deref(), Some("sk-test"));

        unsafe { std::env::remove_var("VENTASK_TEST_API_KEY") };
    }
}
