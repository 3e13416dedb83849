use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

mod project;

pub use project::{PROJECT_DIR_NAME, PROJECT_MARKERS, find_project_root, locate_root};

/// File name of the configuration file in both global and project directories
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Main configuration structure for Continuum
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Days after which a profile file is reported as stale
    #[serde(default = "default_stale_days")]
    pub stale_days: u32,
    /// Memory entries newer than this many days are preferred in exports
    #[serde(default = "default_memory_recent_days")]
    pub memory_recent_days: u32,
    /// Maximum (and backfilled minimum) number of memory entries per export
    #[serde(default = "default_memory_max_entries")]
    pub memory_max_entries: usize,
    /// Word budget for the identity section of an export
    #[serde(default = "default_identity_max_words")]
    pub identity_max_words: usize,
    /// Voice analysis API configuration
    #[serde(default)]
    pub voice: VoiceConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stale_days: default_stale_days(),
            memory_recent_days: default_memory_recent_days(),
            memory_max_entries: default_memory_max_entries(),
            identity_max_words: default_identity_max_words(),
            voice: VoiceConfig::default(),
        }
    }
}

fn default_stale_days() -> u32 {
    14
}

fn default_memory_recent_days() -> u32 {
    30
}

fn default_memory_max_entries() -> usize {
    20
}

fn default_identity_max_words() -> usize {
    500
}

/// The thresholds the export pipeline reads, fixed for one export call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub stale_days: u32,
    pub memory_recent_days: u32,
    pub memory_max_entries: usize,
    pub identity_max_words: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Config::default().thresholds()
    }
}

impl Config {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            stale_days: self.stale_days,
            memory_recent_days: self.memory_recent_days,
            memory_max_entries: self.memory_max_entries,
            identity_max_words: self.identity_max_words,
        }
    }

    /// Load configuration from the global directory, overlaid by the project.
    ///
    /// Top-level keys in `<project>/config.toml` replace those from
    /// `<global>/config.toml`. Missing files contribute nothing; files that
    /// can't be read or parsed are logged and skipped. A key whose value has
    /// the wrong type falls back to its default without affecting the rest.
    pub fn load(global_dir: &Path, project_dir: Option<&Path>) -> Self {
        let mut merged = read_table(&global_dir.join(CONFIG_FILE_NAME)).unwrap_or_default();

        if let Some(project_dir) = project_dir {
            if let Some(project) = read_table(&project_dir.join(CONFIG_FILE_NAME)) {
                merged.extend(project);
            }
        }

        if let Some(toml::Value::Table(voice)) = merged.remove("voice") {
            merged.insert(
                "voice".to_string(),
                toml::Value::Table(retain_valid::<VoiceConfig>(voice, "voice.")),
            );
        }

        toml::Value::Table(retain_valid::<Config>(merged, ""))
            .try_into::<Config>()
            .unwrap_or_default()
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content)
            .map_err(|e| crate::ContinuumError::Config(format!("Failed to parse config: {e}")))
    }
}

/// Keep the keys of `table` that deserialize as part of `T`.
///
/// Every field of `T` has a serde default, so a bad value only costs its own
/// key. Each dropped key is logged.
fn retain_valid<T: DeserializeOwned>(table: toml::Table, prefix: &str) -> toml::Table {
    let mut accepted = toml::Table::new();
    for (key, value) in table {
        let mut candidate = accepted.clone();
        candidate.insert(key.clone(), value);
        match toml::Value::Table(candidate.clone()).try_into::<T>() {
            Ok(_) => accepted = candidate,
            Err(e) => warn!("Ignoring invalid config value `{prefix}{key}`, using default: {e}"),
        }
    }
    accepted
}

fn read_table(path: &Path) -> Option<toml::Table> {
    if !path.exists() {
        return None;
    }
    debug!("Loading config from: {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Failed to read config file {}: {e}", path.display());
            return None;
        }
    };

    match content.parse::<toml::Table>() {
        Ok(table) => Some(table),
        Err(e) => {
            warn!("Failed to parse config file {}: {e}", path.display());
            None
        }
    }
}

/// Default global profile directory (`~/.continuum`)
pub fn default_base_path() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".continuum"))
        .unwrap_or_else(|| PathBuf::from(".continuum"))
}

/// Voice analysis API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VoiceConfig {
    /// OpenAI-compatible API base URL
    #[serde(default = "default_voice_api_url")]
    pub api_url: String,
    /// Environment variable name for API key
    #[serde(default = "default_voice_api_key_env")]
    pub api_key_env: String,
    /// Model identifier
    #[serde(default = "default_voice_model")]
    pub model: String,
    /// Request timeout in seconds
    #[serde(default = "default_voice_timeout_secs")]
    pub timeout_secs: u64,
    /// Completion token limit
    #[serde(default = "default_voice_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature
    #[serde(default = "default_voice_temperature")]
    pub temperature: f32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            api_url: default_voice_api_url(),
            api_key_env: default_voice_api_key_env(),
            model: default_voice_model(),
            timeout_secs: default_voice_timeout_secs(),
            max_tokens: default_voice_max_tokens(),
            temperature: default_voice_temperature(),
        }
    }
}

fn default_voice_api_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_voice_api_key_env() -> String {
    "OPENROUTER_API_KEY".to_string()
}

fn default_voice_model() -> String {
    "google/gemini-3-flash-preview".to_string()
}

fn default_voice_timeout_secs() -> u64 {
    120
}

fn default_voice_max_tokens() -> u32 {
    8000
}

fn default_voice_temperature() -> f32 {
    0.3
}
