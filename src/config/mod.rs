// Plugin configuration
use crate::error::{Result, SsoError};
use crate::preferences;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "sso-status";
const LOGIN_SCRIPT_NAME: &str = "login.sh";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Profile monitored when none has been selected yet
    #[serde(default = "default_fallback_profile")]
    pub fallback_profile: String,

    /// Region reported when a cached token has none
    #[serde(default = "default_region")]
    pub default_region: String,

    /// Login/refresh script; defaults to login.sh next to the executable
    #[serde(default)]
    pub login_script: Option<PathBuf>,

    /// File holding the selected profile; defaults to ~/.aws/swiftbar-profile
    #[serde(default)]
    pub profile_file: Option<PathBuf>,
}

fn default_fallback_profile() -> String {
    "prod".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fallback_profile: default_fallback_profile(),
            default_region: default_region(),
            login_script: None,
            profile_file: None,
        }
    }
}

impl Config {
    /// Get the config directory path
    ///
    /// Priority:
    /// 1. XDG_CONFIG_HOME/sso-status (if env var is set)
    /// 2. ~/.config/sso-status (if ~/.config exists)
    /// 3. ~/.sso-status (fallback on Unix)
    /// 4. Platform default on Windows
    pub fn config_dir() -> Result<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return Ok(PathBuf::from(xdg_config).join(APP_NAME));
        }

        #[cfg(unix)]
        {
            if let Some(home_dir) = dirs::home_dir() {
                let xdg_config = home_dir.join(".config");

                if xdg_config.exists() {
                    return Ok(xdg_config.join(APP_NAME));
                }

                return Ok(home_dir.join(format!(".{}", APP_NAME)));
            }
        }

        #[cfg(not(unix))]
        {
            if let Some(config_dir) = dirs::config_dir() {
                return Ok(config_dir.join(APP_NAME));
            }
        }

        Err(SsoError::ConfigError(
            "Could not determine config directory".to_string(),
        ))
    }

    /// Get the config file path
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, environment variables, and defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;

        let mut config = if config_path.exists() {
            tracing::debug!("Loading config from: {}", config_path.display());
            let contents = fs::read_to_string(&config_path)
                .map_err(|e| SsoError::ConfigError(format!("Failed to read config file: {}", e)))?;
            Self::from_toml(&contents)?
        } else {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            Config::default()
        };

        if let Ok(path) = std::env::var("SSO_STATUS_PROFILE_FILE") {
            tracing::debug!("Using SSO_STATUS_PROFILE_FILE from environment: {}", path);
            config.profile_file = Some(PathBuf::from(path));
        }

        if let Ok(path) = std::env::var("SSO_STATUS_LOGIN_SCRIPT") {
            tracing::debug!("Using SSO_STATUS_LOGIN_SCRIPT from environment: {}", path);
            config.login_script = Some(PathBuf::from(path));
        }

        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Login script path, resolved against the plugin's own location
    pub fn login_script_path(&self, plugin_path: &Path) -> PathBuf {
        match &self.login_script {
            Some(path) => path.clone(),
            None => plugin_path
                .parent()
                .map(|dir| dir.join(LOGIN_SCRIPT_NAME))
                .unwrap_or_else(|| PathBuf::from(LOGIN_SCRIPT_NAME)),
        }
    }

    pub fn profile_file_path(&self) -> Result<PathBuf> {
        match &self.profile_file {
            Some(path) => Ok(path.clone()),
            None => preferences::default_profile_file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.fallback_profile, "prod");
        assert_eq!(config.default_region, "us-east-1");
        assert!(config.login_script.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml("default_region = \"eu-west-1\"\n").unwrap();
        assert_eq!(config.fallback_profile, "prod");
        assert_eq!(config.default_region, "eu-west-1");
    }

    #[test]
    fn test_invalid_toml() {
        assert!(Config::from_toml("fallback_profile = [").is_err());
    }

    #[test]
    fn test_login_script_next_to_plugin() {
        let config = Config::default();
        assert_eq!(
            config.login_script_path(Path::new("/plugins/sso-status.1m")),
            PathBuf::from("/plugins/login.sh")
        );

        let config = Config::from_toml("login_script = \"/opt/bin/sso-login\"\n").unwrap();
        assert_eq!(
            config.login_script_path(Path::new("/plugins/sso-status.1m")),
            PathBuf::from("/opt/bin/sso-login")
        );
    }

    #[test]
    fn test_profile_file_override() {
        let config = Config::from_toml("profile_file = \"/tmp/selected\"\n").unwrap();
        assert_eq!(
            config.profile_file_path().unwrap(),
            PathBuf::from("/tmp/selected")
        );
    }
}
