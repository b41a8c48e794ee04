pub mod select_profile;
pub mod status;

use crate::auth::{default_cache_dir, TokenCache};
use crate::aws_config;
use crate::config::Config;
use crate::error::Result;
use crate::preferences::FilePreferenceStore;
use crate::profile_store::ProfileStore;
use crate::session::SessionManager;

/// Plugin settings; a broken settings file falls back to defaults
pub(crate) fn load_config() -> Config {
    Config::load().unwrap_or_else(|e| {
        tracing::warn!("Using default settings: {}", e);
        Config::default()
    })
}

pub(crate) fn profile_store(config: &Config) -> Result<ProfileStore<FilePreferenceStore>> {
    Ok(ProfileStore::new(
        aws_config::config_file_path()?,
        FilePreferenceStore::new(config.profile_file_path()?),
        config.fallback_profile.clone(),
    ))
}

pub(crate) fn session_manager(config: &Config) -> Result<SessionManager<FilePreferenceStore>> {
    Ok(SessionManager::new(
        profile_store(config)?,
        TokenCache::new(default_cache_dir()?),
        config.default_region.clone(),
    ))
}
