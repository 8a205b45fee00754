//! Configuration system (layered: defaults < TOML file < environment).

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::countries::{Country, CountryCatalog, DEFAULT_COUNTRY};
use crate::error::{IntegreatError, Result};
use crate::types::GenerationSettings;

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const CONFIG_FILE_NAME: &str = "config.toml";

/// Assistant behaviour settings (the `[assistant]` table of the config file).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub default_country: String,
    pub model: String,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    /// Upper bound on every capability call; `None` waits indefinitely.
    pub request_timeout_secs: Option<u64>,
    /// Send only the last `n` remembered question/answer turns as context.
    pub memory_window: Option<usize>,
    /// Forget prior turns when the destination changes.
    pub reset_memory_on_country_change: bool,
    pub search_results: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_country: DEFAULT_COUNTRY.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: None,
            max_tokens: None,
            request_timeout_secs: None,
            memory_window: None,
            reset_memory_on_country_change: false,
            search_results: 5,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

/// `[credentials]` table: key files and endpoint overrides.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Credentials {
    openai_api_key_file: Option<PathBuf>,
    serpapi_api_key_file: Option<PathBuf>,
    openai_base_url: Option<String>,
    serpapi_base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    assistant: Settings,
    credentials: Credentials,
    countries: Vec<Country>,
}

/// Layered configuration for Integreat.
///
/// Resolution order, lowest to highest precedence:
/// 1. Built-in defaults
/// 2. TOML config file (including key files it points to)
/// 3. Environment variables (`.env` is honoured)
#[derive(Clone)]
pub struct IntegreatConfig {
    api_keys: Arc<RwLock<HashMap<String, String>>>,
    base_urls: Arc<RwLock<HashMap<String, String>>>,
    settings: Settings,
    countries: CountryCatalog,
}

impl fmt::Debug for IntegreatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let providers: Vec<String> = self
            .api_keys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        f.debug_struct("IntegreatConfig")
            .field("api_keys", &providers)
            .field("base_urls", &self.base_urls)
            .field("settings", &self.settings)
            .field("countries", &self.countries.len())
            .finish()
    }
}

impl Default for IntegreatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl IntegreatConfig {
    /// Built-in defaults, no credentials.
    pub fn new() -> Self {
        Self {
            api_keys: Arc::new(RwLock::new(HashMap::new())),
            base_urls: Arc::new(RwLock::new(HashMap::new())),
            settings: Settings::default(),
            countries: CountryCatalog::default(),
        }
    }

    /// Defaults overridden by environment variables.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = Self::new();
        config.apply_env();
        config
    }

    /// Load the full layered configuration.
    ///
    /// With `path = None` the platform config file is used when it exists.
    /// An explicit path that cannot be read is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let _ = dotenvy::dotenv();
        let mut config = Self::new();

        match path {
            Some(path) => config.apply_file(path)?,
            None => {
                if let Some(path) = default_config_path().filter(|p| p.is_file()) {
                    config.apply_file(&path)?;
                }
            }
        }

        config.apply_env();
        Ok(config)
    }

    /// Replace the behaviour settings.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn countries(&self) -> &CountryCatalog {
        &self.countries
    }

    pub fn set_api_key(&self, provider: &str, key: String) {
        self.api_keys
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(provider.to_string(), key);
    }

    pub fn get_api_key(&self, provider: &str) -> Option<String> {
        self.api_keys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(provider)
            .cloned()
    }

    pub fn set_base_url(&self, provider: &str, url: String) {
        self.base_urls
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(provider.to_string(), url);
    }

    pub fn get_base_url(&self, provider: &str) -> Option<String> {
        self.base_urls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(provider)
            .cloned()
    }

    pub fn has_credentials(&self, provider: &str) -> bool {
        self.get_api_key(provider).is_some()
    }

    fn apply_file(&mut self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), "Loading config file");
        let raw = std::fs::read_to_string(path)?;
        let file: ConfigFile = toml::from_str(&raw)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

        if file.assistant.default_country.trim().is_empty() {
            return Err(IntegreatError::Configuration(
                "assistant.default_country must not be empty".into(),
            ));
        }
        self.settings = file.assistant;

        let key_files = [
            ("openai", file.credentials.openai_api_key_file),
            ("serpapi", file.credentials.serpapi_api_key_file),
        ];
        for (provider, key_file) in key_files {
            if let Some(key_file) = key_file {
                let key = read_key_file(&base_dir.join(key_file))?;
                self.set_api_key(provider, key);
            }
        }

        if let Some(url) = file.credentials.openai_base_url {
            self.set_base_url("openai", url);
        }
        if let Some(url) = file.credentials.serpapi_base_url {
            self.set_base_url("serpapi", url);
        }

        if !file.countries.is_empty() {
            self.countries = CountryCatalog::new(file.countries);
        }
        Ok(())
    }

    fn apply_env(&mut self) {
        let key_mappings = [("OPENAI_API_KEY", "openai"), ("SERPAPI_API_KEY", "serpapi")];
        for (env_var, provider) in &key_mappings {
            if let Some(key) = non_empty_env(env_var) {
                self.set_api_key(provider, key);
            }
        }

        let url_mappings = [("OPENAI_BASE_URL", "openai"), ("SERPAPI_BASE_URL", "serpapi")];
        for (env_var, provider) in &url_mappings {
            if let Some(url) = non_empty_env(env_var) {
                self.set_base_url(provider, url);
            }
        }

        if let Some(country) = non_empty_env("INTEGREAT_DEFAULT_COUNTRY") {
            self.settings.default_country = country.trim().to_string();
        }
        if let Some(model) = non_empty_env("INTEGREAT_MODEL") {
            self.settings.model = model;
        }
        if let Some(raw) = non_empty_env("INTEGREAT_REQUEST_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) => self.settings.request_timeout_secs = Some(secs),
                Err(_) => warn!(value = %raw, "Ignoring invalid INTEGREAT_REQUEST_TIMEOUT_SECS"),
            }
        }
    }
}

/// Platform config file location, e.g. `~/.config/integreat/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("ai", "Integreat", "integreat")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

fn read_key_file(path: &Path) -> Result<String> {
    let key = std::fs::read_to_string(path)?.trim().to_string();
    if key.is_empty() {
        return Err(IntegreatError::Configuration(format!(
            "API key file {} is empty",
            path.display()
        )));
    }
    Ok(key)
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
