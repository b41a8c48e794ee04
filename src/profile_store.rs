// Active profile resolution
use crate::aws_config::AwsConfig;
use crate::error::Result;
use crate::models::SsoProfile;
use crate::preferences::PreferenceStore;
use std::path::PathBuf;

/// Resolves the selected profile and the SSO profiles defined in ~/.aws/config
///
/// The config file is re-read on every call; nothing is cached between lookups.
pub struct ProfileStore<P: PreferenceStore> {
    config_path: PathBuf,
    preferences: P,
    fallback_profile: String,
}

impl<P: PreferenceStore> ProfileStore<P> {
    pub fn new(config_path: PathBuf, preferences: P, fallback_profile: impl Into<String>) -> Self {
        Self {
            config_path,
            preferences,
            fallback_profile: fallback_profile.into(),
        }
    }

    fn config(&self) -> AwsConfig {
        AwsConfig::load(&self.config_path).unwrap_or_else(|e| {
            tracing::warn!("Treating unreadable AWS config as empty: {}", e);
            AwsConfig::default()
        })
    }

    /// All SSO-configured profile names, `default` first
    pub fn list_sso_profiles(&self) -> Vec<String> {
        self.config().sso_profiles()
    }

    /// Currently selected profile, or the fallback if none is stored
    pub fn selected_profile(&self) -> String {
        match self.preferences.get() {
            Ok(Some(profile)) => profile,
            Ok(None) => self.fallback_profile.clone(),
            Err(e) => {
                tracing::warn!("Could not read selected profile: {}", e);
                self.fallback_profile.clone()
            }
        }
    }

    /// Persist the selected profile. The name is not checked against the config.
    pub fn set_selected_profile(&self, profile_name: &str) -> Result<()> {
        self.preferences.set(profile_name)?;
        tracing::info!("Selected profile '{}'", profile_name);
        Ok(())
    }

    pub fn sso_profile(&self, profile_name: &str) -> Option<SsoProfile> {
        self.config().sso_profile(profile_name)
    }

    pub fn sso_start_url(&self, profile_name: &str) -> Option<String> {
        self.sso_profile(profile_name).map(|p| p.start_url)
    }
}
