use crate::error::{Result, SummitError};
use crate::error_ext::ResultExt;
use crate::mode::Mode;
use crate::request_builder::DEFAULT_MAX_INPUT_LENGTH;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

const SUMMIT_DIR: &str = ".summit";
const GLOBAL_CONFIG_FILE: &str = "config.toml";
const LOCAL_CONFIG_FILE: &str = "config.local.toml";

/// Settings the session core is constructed with.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub max_input_length: usize,
    pub respond_in_language: Option<String>,
    pub initial_mode: Mode,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_input_length: DEFAULT_MAX_INPUT_LENGTH,
            respond_in_language: None,
            initial_mode: Mode::Chat,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_input_length == 0 {
            return Err(SummitError::Config(
                "max_input_length must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Application configuration for the terminal client.
#[derive(Debug, Clone, PartialEq)]
pub struct SummitConfig {
    pub base_url: String,
    pub max_input_length: usize,
    pub request_timeout_secs: u64,
    pub respond_in_language: Option<String>,
    pub default_mode: Mode,
}

impl Default for SummitConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_input_length: DEFAULT_MAX_INPUT_LENGTH,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            respond_in_language: None,
            default_mode: Mode::Chat,
        }
    }
}

/// One config file; every key is optional and only overrides what it names.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    pub max_input_length: Option<usize>,
    pub request_timeout_secs: Option<u64>,
    pub respond_in_language: Option<String>,
    pub default_mode: Option<Mode>,
}

impl SummitConfig {
    /// Defaults, then `~/.summit/config.toml`, then `.summit/config.local.toml`
    /// in `workspace`, then `explicit` if given. Missing default files are
    /// skipped; a missing explicit file is an error.
    pub fn load(workspace: &Path, explicit: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(home) = std::env::var_os("HOME") {
            let global = PathBuf::from(home).join(SUMMIT_DIR).join(GLOBAL_CONFIG_FILE);
            if let Some(file) = read_config_file(&global, false)? {
                config.merge(file);
            }
        }

        let local = workspace.join(SUMMIT_DIR).join(LOCAL_CONFIG_FILE);
        if let Some(file) = read_config_file(&local, false)? {
            config.merge(file);
        }

        if let Some(path) = explicit {
            if let Some(file) = read_config_file(path, true)? {
                config.merge(file);
            }
        }

        Ok(config)
    }

    pub fn merge(&mut self, file: ConfigFile) {
        if let Some(base_url) = file.base_url {
            self.base_url = base_url;
        }
        if let Some(max) = file.max_input_length {
            self.max_input_length = max;
        }
        if let Some(secs) = file.request_timeout_secs {
            self.request_timeout_secs = secs;
        }
        if let Some(language) = file.respond_in_language {
            self.respond_in_language = Some(language);
        }
        if let Some(mode) = file.default_mode {
            self.default_mode = mode;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(SummitError::Config("base_url must not be empty".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(SummitError::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        self.session_config().validate()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            max_input_length: self.max_input_length,
            respond_in_language: self.respond_in_language.clone(),
            initial_mode: self.default_mode,
        }
    }
}

fn read_config_file(path: &Path, required: bool) -> Result<Option<ConfigFile>> {
    if !path.exists() {
        if required {
            return Err(SummitError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::debug!(path = %path.display(), "Loaded config file");
    Ok(Some(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = SummitConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000/api/v1");
        assert_eq!(config.max_input_length, 20_000);
        assert_eq!(config.request_timeout_secs, 300);
        assert_eq!(config.default_mode, Mode::Chat);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_local_file_overrides_defaults() {
        let workspace = tempdir().unwrap();
        let dir = workspace.path().join(".summit");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("config.local.toml"),
            "base_url = \"http://backend:9000/api/v1\"\ndefault_mode = \"summary\"\nrespond_in_language = \"ja\"\n",
        )
        .unwrap();

        let config = SummitConfig::load(workspace.path(), None).unwrap();

        assert_eq!(config.base_url, "http://backend:9000/api/v1");
        assert_eq!(config.default_mode, Mode::Summary);
        assert_eq!(config.respond_in_language.as_deref(), Some("ja"));
        assert_eq!(config.max_input_length, 20_000);
    }

    #[test]
    fn test_explicit_file_wins() {
        let workspace = tempdir().unwrap();
        let dir = workspace.path().join(".summit");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.local.toml"), "max_input_length = 500\n").unwrap();
        let explicit = workspace.path().join("custom.toml");
        std::fs::write(&explicit, "max_input_length = 750\n").unwrap();

        let config = SummitConfig::load(workspace.path(), Some(&explicit)).unwrap();

        assert_eq!(config.max_input_length, 750);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let workspace = tempdir().unwrap();
        let missing = workspace.path().join("nope.toml");

        let err = SummitConfig::load(workspace.path(), Some(&missing)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let workspace = tempdir().unwrap();
        let explicit = workspace.path().join("bad.toml");
        std::fs::write(&explicit, "api_key = \"secret\"\n").unwrap();

        let err = SummitConfig::load(workspace.path(), Some(&explicit)).unwrap_err();
        assert!(matches!(err, SummitError::Context { .. }));
    }

    #[test]
    fn test_zero_limits_rejected() {
        let config = SummitConfig {
            max_input_length: 0,
            ..SummitConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SummitConfig {
            request_timeout_secs: 0,
            ..SummitConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
