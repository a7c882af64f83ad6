use crate::core::error::AskError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

pub const DEFAULT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    #[default]
    OpenAI,
    Anthropic,
    MistralAI,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::OpenAI, Provider::Anthropic, Provider::MistralAI];

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Some(Provider::OpenAI),
            "anthropic" => Some(Provider::Anthropic),
            "mistralai" => Some(Provider::MistralAI),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenAI => "openai",
            Provider::Anthropic => "anthropic",
            Provider::MistralAI => "mistralai",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::OpenAI => "https://api.openai.com/v1",
            Provider::Anthropic => "https://api.anthropic.com/v1",
            Provider::MistralAI => "https://api.mistral.ai/v1",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAI => "gpt-3.5-turbo",
            Provider::Anthropic => "claude-3-sonnet-20240229",
            Provider::MistralAI => "mistral-medium",
        }
    }
}

/// Optional per-provider overrides of the fixed endpoint and model.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Settings read before every dispatch.
///
/// `api_provider` stays a raw string so that an unrecognised value is reported
/// at dispatch time instead of making the whole file unreadable. The camelCase
/// aliases accept the key names used by the browser extension's storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(alias = "apiProvider")]
    pub api_provider: String,
    #[serde(alias = "apiKey", skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(alias = "maxTokens")]
    pub max_tokens: u32,
    pub temperature: f64,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub providers: HashMap<String, ProviderConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_provider: Provider::default().name().to_string(),
            api_key: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            providers: HashMap::new(),
        }
    }
}

impl Settings {
    /// The API key, or `None` when it is missing or blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn provider(&self) -> Option<Provider> {
        Provider::from_name(&self.api_provider)
    }

    pub fn provider_config(&self, provider: Provider) -> ProviderConfig {
        self.providers
            .get(provider.name())
            .cloned()
            .unwrap_or_default()
    }

    pub fn from_yaml(contents: &str) -> Result<Settings, AskError> {
        if contents.trim().is_empty() {
            return Ok(Settings::default());
        }
        Ok(serde_yml::from_str::<Settings>(contents)?)
    }

    fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".askai")
    }

    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    pub fn input_history_path() -> PathBuf {
        Self::config_dir().join("input_history.txt")
    }

    /// Writes a default settings file when none exists yet.
    pub fn ensure_file(path: &Path) -> Result<(), AskError> {
        if path.exists() {
            return Ok(());
        }
        Settings::default().save(path)
    }

    pub fn save(&self, path: &Path) -> Result<(), AskError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let yaml_content = serde_yml::to_string(self)?;
        fs::write(path, yaml_content)?;
        Ok(())
    }
}

/// Source of [`Settings`]; consulted once per dispatch, never cached.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn load(&self) -> Result<Settings, AskError>;
}

/// Reads the YAML settings file from disk on every call.
pub struct FileSettingsStore {
    path: PathBuf,
    provider_override: Option<String>,
}

impl FileSettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            provider_override: None,
        }
    }

    pub fn with_provider_override(mut self, provider: Option<String>) -> Self {
        self.provider_override = provider;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    async fn load(&self) -> Result<Settings, AskError> {
        let mut settings = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Settings::from_yaml(&contents).map_err(|e| {
                AskError::Configuration(format!("Parse {}: {}", self.path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Settings::default(),
            Err(e) => return Err(e.into()),
        };

        if let Some(provider) = &self.provider_override {
            settings.api_provider = provider.clone();
        }
        Ok(settings)
    }
}

/// Settings held in memory, for embedding the dispatcher in another program.
#[derive(Default)]
pub struct MemorySettingsStore {
    settings: RwLock<Settings>,
}

impl MemorySettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }

    pub fn update<F: FnOnce(&mut Settings)>(&self, f: F) {
        let mut guard = self.settings.write().unwrap_or_else(|e| e.into_inner());
        f(&mut guard);
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn load(&self) -> Result<Settings, AskError> {
        let guard = self.settings.read().unwrap_or_else(|e| e.into_inner());
        Ok(guard.clone())
    }
}
