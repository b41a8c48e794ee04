use crate::error::{Result, SsoError};
use crate::models::{SsoProfile, TokenRecord};
use sha1::{Digest, Sha1};
use std::fs;
use std::path::{Path, PathBuf};

/// Default AWS CLI v2 SSO token cache (~/.aws/sso/cache/)
pub fn default_cache_dir() -> Result<PathBuf> {
    Ok(dirs::home_dir()
        .ok_or_else(|| SsoError::CacheError("Could not determine home directory".to_string()))?
        .join(".aws")
        .join("sso")
        .join("cache"))
}

/// Generate cache key (compatible with AWS CLI v2): lowercase hex SHA1
pub fn cache_key(key_material: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(key_material.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Outcome of reading a single cache file
#[derive(Debug)]
pub enum CacheEntry {
    Found(TokenRecord),
    NotFound,
    Malformed,
}

/// Read-only view of the AWS CLI SSO token cache
pub struct TokenCache {
    cache_dir: PathBuf,
}

impl TokenCache {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// Get path to cache file for given profile
    fn cache_file_path(&self, profile: &SsoProfile) -> PathBuf {
        self.cache_dir
            .join(format!("{}.json", cache_key(profile.cache_key_material())))
    }

    fn read_entry(path: &Path) -> CacheEntry {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return CacheEntry::NotFound,
            Err(e) => {
                tracing::debug!("Failed to read cache file {}: {}", path.display(), e);
                return CacheEntry::Malformed;
            }
        };

        match serde_json::from_str::<TokenRecord>(&contents) {
            Ok(record) => CacheEntry::Found(record),
            Err(e) => {
                tracing::debug!("Skipping malformed cache file {}: {}", path.display(), e);
                CacheEntry::Malformed
            }
        }
    }

    /// Find the cached token for a profile
    ///
    /// Tries the file named after the cache key first, then scans every cache
    /// file for a matching `startUrl`. Not every cache writer derives the key
    /// from exactly the same string, so the scan must stay.
    pub fn find_token(&self, profile: &SsoProfile) -> Option<TokenRecord> {
        if !self.cache_dir.is_dir() {
            tracing::debug!("SSO cache dir {} does not exist", self.cache_dir.display());
            return None;
        }

        let direct = self.cache_file_path(profile);
        match Self::read_entry(&direct) {
            CacheEntry::Found(record) => {
                tracing::debug!("Found token at {}", direct.display());
                return Some(record);
            }
            CacheEntry::Malformed => {
                tracing::debug!(
                    "Cache file {} is unreadable, scanning cache",
                    direct.display()
                );
            }
            CacheEntry::NotFound => {}
        }

        self.scan_for_start_url(&profile.start_url)
    }

    fn scan_for_start_url(&self, start_url: &str) -> Option<TokenRecord> {
        let entries = match fs::read_dir(&self.cache_dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Failed to list {}: {}", self.cache_dir.display(), e);
                return None;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();

            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            if let CacheEntry::Found(record) = Self::read_entry(&path) {
                if record.start_url.as_deref() == Some(start_url) {
                    tracing::debug!("Matched startUrl in {}", path.display());
                    return Some(record);
                }
            }
        }

        None
    }
}
