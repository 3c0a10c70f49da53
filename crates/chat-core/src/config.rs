use crate::ai::openai::DEFAULT_BASE_URL;
use crate::ai::GenerationParams;
use crate::error::{ChatError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const MODEL_VAR: &str = "OPENAI_MODEL";
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
pub const STATE_FILE_VAR: &str = "CHAT_CLI_STATE_FILE";
pub const CONFIG_FILE_VAR: &str = "CHAT_CLI_CONFIG";

const STATE_FILE_NAME: &str = ".chat-cli-state.json";

/// Optional tunables read from `<config dir>/chat-cli/config.json`.
///
/// Every field may be omitted. The credential is never read from this file.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub base_url: Option<String>,
    pub state_file: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Loads the settings file, returning defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            ChatError::config(format!("Could not read settings file {}: {}", path.display(), e))
        })?;
        let config: Config = serde_json::from_str(&content).map_err(|e| {
            ChatError::config(format!("Could not parse settings file {}: {}", path.display(), e))
        })?;

        tracing::debug!(path = %path.display(), "loaded settings file");
        Ok(config)
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("chat-cli").join("config.json"))
    }
}

/// Everything an invocation needs, resolved from the environment, the
/// settings file and built-in defaults, in that order of precedence.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub params: GenerationParams,
    pub base_url: String,
    pub state_file: PathBuf,
    pub timeout: Option<Duration>,
}

impl Settings {
    /// Resolves settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::resolve(|name| std::env::var(name).ok())
    }

    /// Resolves settings using `lookup` in place of the process environment.
    ///
    /// The credential is checked first so a missing key fails before the
    /// settings file is touched.
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_key = require_api_key(&lookup)?;

        let config = match lookup(CONFIG_FILE_VAR)
            .map(PathBuf::from)
            .or_else(Config::default_path)
        {
            Some(path) => Config::load_from(&path)?,
            None => Config::default(),
        };

        let defaults = GenerationParams::default();
        let params = GenerationParams {
            model: lookup(MODEL_VAR)
                .or(config.model)
                .unwrap_or(defaults.model),
            max_tokens: config.max_tokens.unwrap_or(defaults.max_tokens),
            temperature: config.temperature.unwrap_or(defaults.temperature),
        };

        let base_url = lookup(BASE_URL_VAR)
            .or(config.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let state_file = match lookup(STATE_FILE_VAR)
            .map(PathBuf::from)
            .or(config.state_file)
        {
            Some(path) => path,
            None => default_state_file()?,
        };

        Ok(Self {
            api_key,
            params,
            base_url,
            state_file,
            timeout: config.timeout_secs.map(Duration::from_secs),
        })
    }
}

/// Returns the credential or the error telling the user how to supply it.
pub fn require_api_key(lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
    lookup(API_KEY_VAR)
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| ChatError::config(format!("{} environment variable is not set.", API_KEY_VAR)))
}

pub fn default_state_file() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ChatError::config("Could not determine home directory"))?;
    Ok(home.join(STATE_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let err = Settings::resolve(env(&[])).unwrap_err();
        assert!(matches!(err, ChatError::Config(_)));
        assert_eq!(err.to_string(), "OPENAI_API_KEY environment variable is not set.");
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        assert!(require_api_key(env(&[(API_KEY_VAR, "  ")])).is_err());
    }

    #[test]
    fn test_missing_key_fails_before_reading_settings() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        fs::write(&config_path, "not json").unwrap();

        let err = Settings::resolve(env(&[(CONFIG_FILE_VAR, config_path.to_str().unwrap())]))
            .unwrap_err();
        assert_eq!(err.to_string(), "OPENAI_API_KEY environment variable is not set.");
    }

    #[test]
    fn test_defaults_without_settings_file() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        let state = dir.path().join("state.json");

        let settings = Settings::resolve(env(&[
            (API_KEY_VAR, "sk-test"),
            (CONFIG_FILE_VAR, missing.to_str().unwrap()),
            (STATE_FILE_VAR, state.to_str().unwrap()),
        ]))
        .unwrap();

        assert_eq!(settings.api_key, "sk-test");
        assert_eq!(settings.params, GenerationParams::default());
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.state_file, state);
        assert_eq!(settings.timeout, None);
    }

    #[test]
    fn test_settings_file_overrides_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        fs::write(
            &config_path,
            r#"{
                "model": "gpt-4o-mini",
                "max_tokens": 256,
                "temperature": 0.2,
                "base_url": "http://localhost:9000/v1",
                "state_file": "/tmp/chat-history.json",
                "timeout_secs": 30
            }"#,
        )
        .unwrap();

        let settings = Settings::resolve(env(&[
            (API_KEY_VAR, "sk-test"),
            (CONFIG_FILE_VAR, config_path.to_str().unwrap()),
        ]))
        .unwrap();

        assert_eq!(settings.params.model, "gpt-4o-mini");
        assert_eq!(settings.params.max_tokens, 256);
        assert_eq!(settings.params.temperature, 0.2);
        assert_eq!(settings.base_url, "http://localhost:9000/v1");
        assert_eq!(settings.state_file, PathBuf::from("/tmp/chat-history.json"));
        assert_eq!(settings.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_environment_overrides_settings_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        fs::write(
            &config_path,
            r#"{"model": "gpt-4o-mini", "state_file": "/tmp/from-file.json"}"#,
        )
        .unwrap();

        let settings = Settings::resolve(env(&[
            (API_KEY_VAR, "sk-test"),
            (CONFIG_FILE_VAR, config_path.to_str().unwrap()),
            (MODEL_VAR, "gpt-4o"),
            (STATE_FILE_VAR, "/tmp/from-env.json"),
        ]))
        .unwrap();

        assert_eq!(settings.params.model, "gpt-4o");
        assert_eq!(settings.state_file, PathBuf::from("/tmp/from-env.json"));
    }

    #[test]
    fn test_invalid_settings_file_is_config_error() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        fs::write(&config_path, "{ broken").unwrap();

        let err = Settings::resolve(env(&[
            (API_KEY_VAR, "sk-test"),
            (CONFIG_FILE_VAR, config_path.to_str().unwrap()),
        ]))
        .unwrap_err();
        assert!(matches!(err, ChatError::Config(_)));
    }
}
