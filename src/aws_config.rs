// AWS config file reader
use crate::error::{Result, SsoError};
use crate::models::{SsoProfile, DEFAULT_PROFILE};
use std::fs;
use std::path::{Path, PathBuf};

const SSO_START_URL_KEY: &str = "sso_start_url";
const SSO_SESSION_KEY: &str = "sso_session";
const PROFILE_PREFIX: &str = "profile ";
const SSO_SESSION_PREFIX: &str = "sso-session ";

/// Get the AWS config file path
///
/// Honors AWS_CONFIG_FILE the same way the AWS CLI does.
pub fn config_file_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("AWS_CONFIG_FILE") {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    if let Some(home) = dirs::home_dir() {
        Ok(home.join(".aws").join("config"))
    } else {
        Err(SsoError::ConfigError(
            "Could not determine home directory".to_string(),
        ))
    }
}

/// Map a profile name to its section header in ~/.aws/config
///
/// `default` lives in the unqualified `[default]` section, everything else in
/// `[profile <name>]`. A profile literally called "default" is therefore the
/// default section.
pub fn section_name_for(profile_name: &str) -> String {
    if profile_name == DEFAULT_PROFILE {
        profile_name.to_string()
    } else {
        format!("{}{}", PROFILE_PREFIX, profile_name)
    }
}

#[derive(Debug, Clone, Default)]
struct IniSection {
    name: String,
    entries: Vec<(String, String)>,
}

impl IniSection {
    fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Parsed ~/.aws/config, sections kept in file order
#[derive(Debug, Clone, Default)]
pub struct AwsConfig {
    sections: Vec<IniSection>,
}

impl AwsConfig {
    /// Load config from disk. A missing file is an empty config, not an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("AWS config not found at {}", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SsoError::ConfigError(format!("Failed to read config file: {}", e)))?;

        Ok(Self::parse(&content))
    }

    pub fn parse(content: &str) -> Self {
        let mut sections: Vec<IniSection> = Vec::new();
        let mut current: Option<usize> = None;

        for line in content.lines() {
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            if trimmed.starts_with('[') && trimmed.ends_with(']') {
                let name = trimmed[1..trimmed.len() - 1].trim();
                // Repeated headers extend the earlier section
                current = match sections.iter().position(|s| s.name == name) {
                    Some(idx) => Some(idx),
                    None => {
                        sections.push(IniSection {
                            name: name.to_string(),
                            entries: Vec::new(),
                        });
                        Some(sections.len() - 1)
                    }
                };
                continue;
            }

            let Some(idx) = current else {
                continue;
            };

            if let Some(eq_pos) = trimmed.find('=') {
                let key = trimmed[..eq_pos].trim().to_lowercase();
                let value = trimmed[eq_pos + 1..].trim().to_string();
                let section = &mut sections[idx];
                match section.entries.iter_mut().find(|(k, _)| *k == key) {
                    Some(entry) => entry.1 = value,
                    None => section.entries.push((key, value)),
                }
            }
        }

        Self { sections }
    }

    fn section(&self, name: &str) -> Option<&IniSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    fn resolve(&self, profile_name: &str, section: &IniSection) -> Option<SsoProfile> {
        // An inline start URL wins over an sso_session reference
        if let Some(start_url) = section.get(SSO_START_URL_KEY) {
            return Some(SsoProfile {
                name: profile_name.to_string(),
                start_url: start_url.to_string(),
                session_name: None,
            });
        }

        let session_name = section.get(SSO_SESSION_KEY)?;
        let session_section = format!("{}{}", SSO_SESSION_PREFIX, session_name);
        match self
            .section(&session_section)
            .and_then(|s| s.get(SSO_START_URL_KEY))
        {
            Some(start_url) => Some(SsoProfile {
                name: profile_name.to_string(),
                start_url: start_url.to_string(),
                session_name: Some(session_name.to_string()),
            }),
            None => {
                tracing::debug!(
                    "Profile '{}' references missing sso-session '{}'",
                    profile_name,
                    session_name
                );
                None
            }
        }
    }

    /// Look up the SSO configuration for a profile
    pub fn sso_profile(&self, profile_name: &str) -> Option<SsoProfile> {
        let section = self.section(&section_name_for(profile_name))?;
        self.resolve(profile_name, section)
    }

    /// Names of all SSO-configured profiles in file order, `default` first
    pub fn sso_profiles(&self) -> Vec<String> {
        let mut profiles: Vec<String> = self
            .sections
            .iter()
            .filter_map(|section| {
                let name = section.name.strip_prefix(PROFILE_PREFIX)?;
                self.resolve(name, section).map(|p| p.name)
            })
            .collect();

        if self.sso_profile(DEFAULT_PROFILE).is_some()
            && !profiles.iter().any(|p| p == DEFAULT_PROFILE)
        {
            profiles.insert(0, DEFAULT_PROFILE.to_string());
        }

        profiles
    }
}
