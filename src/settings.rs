// Application settings: a JSON file under the data directory, then environment overrides.
use crate::ai::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE, RelayOptions};
use crate::error::{AppError, Result};
use crate::session::DEFAULT_PASSWORD;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LISTEN: &str = "127.0.0.1:3000";

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_MODEL: &str = "OPENAI_MODEL";
pub const ENV_PASSWORD: &str = "TURTLE_SOUP_PASSWORD";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub password: String, // Secret the login page compares against.
    // Its presence switches the proxy from canned to live answers.
    pub openai_api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub listen: String,      // Address `serve` binds to.
    pub environment: String, // Reported verbatim by /api/config.
    pub scenarios_path: Option<PathBuf>,
    pub debug_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            password: DEFAULT_PASSWORD.to_string(),
            openai_api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            listen: DEFAULT_LISTEN.to_string(),
            environment: "local".to_string(),
            scenarios_path: None,
            debug_mode: false,
        }
    }
}

pub fn get_game_data_dir() -> Result<PathBuf> {
    dir::home_dir()
        .map(|home| home.join("turtle_soup").join("data"))
        .ok_or(AppError::NoHomeDir)
}

impl Settings {
    pub fn default_path() -> Result<PathBuf> {
        Ok(get_game_data_dir()?.join("settings.json"))
    }

    /// Loads the file when it exists and applies the environment. On first run
    /// the defaults are written out so there is a file to edit.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path()?,
        };
        let mut settings = if path.exists() {
            Self::load_settings_from_file(&path)?
        } else {
            let settings = Self::default();
            if let Err(e) = settings.save_to_file(&path) {
                log::warn!("Failed to write default settings to {}: {e}", path.display());
            }
            settings
        };
        settings.apply_overrides(|name| std::env::var(name).ok());
        Ok(settings)
    }

    pub fn load_settings_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&data)?;
        Ok(settings)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let data = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(path)?;
        file.write_all(data.as_bytes())?;
        Ok(())
    }

    // Empty variables count as unset.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        if let Some(api_key) = lookup(ENV_API_KEY) {
            self.openai_api_key = Some(api_key);
        }
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.base_url = base_url;
        }
        if let Some(model) = lookup(ENV_MODEL) {
            self.model = model;
        }
        if let Some(password) = lookup(ENV_PASSWORD) {
            self.password = password;
        }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.openai_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn relay_options(&self) -> RelayOptions {
        RelayOptions {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen
            .parse()
            .map_err(|_| AppError::InvalidListenAddress(self.listen.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn round_trips_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            openai_api_key: Some("sk-test".into()),
            model: "gpt-4o-mini".into(),
            ..Settings::default()
        };
        settings.save_to_file(&path).unwrap();
        assert_eq!(Settings::load_settings_from_file(&path).unwrap(), settings);
    }

    #[test]
    fn partial_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"password": "hunter2"}"#).unwrap();
        let settings = Settings::load_settings_from_file(&path).unwrap();
        assert_eq!(settings.password, "hunter2");
        assert_eq!(settings.model, DEFAULT_MODEL);
        assert_eq!(settings.max_tokens, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn environment_overrides_the_file() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_API_KEY, "sk-env"),
            (ENV_BASE_URL, "http://localhost:8080/v1"),
            (ENV_MODEL, ""),
            (ENV_PASSWORD, "secret"),
        ]);
        let mut settings = Settings::default();
        settings.apply_overrides(|name| env.get(name).map(|value| value.to_string()));

        assert_eq!(settings.api_key(), Some("sk-env"));
        assert_eq!(settings.base_url, "http://localhost:8080/v1");
        assert_eq!(settings.model, DEFAULT_MODEL);
        assert_eq!(settings.password, "secret");
    }

    #[test]
    fn blank_key_is_not_configured() {
        let settings = Settings {
            openai_api_key: Some("  ".into()),
            ..Settings::default()
        };
        assert_eq!(settings.api_key(), None);
    }

    #[test]
    fn first_load_writes_the_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("settings.json");
        let settings = Settings::load(Some(&path)).unwrap();
        assert!(path.exists());

        let mut saved = Settings::load_settings_from_file(&path).unwrap();
        saved.apply_overrides(|name| std::env::var(name).ok());
        assert_eq!(saved, settings);
    }

    #[test]
    fn listen_address_is_validated() {
        let mut settings = Settings::default();
        assert!(settings.listen_addr().is_ok());
        settings.listen = "nowhere".into();
        assert!(matches!(
            settings.listen_addr(),
            Err(AppError::InvalidListenAddress(_))
        ));
    }
}
