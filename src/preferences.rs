// Selected-profile persistence
use crate::error::{Result, SsoError};
use std::fs;
use std::path::PathBuf;

/// Single-value store holding the name of the monitored profile
#[cfg_attr(test, mockall::automock)]
pub trait PreferenceStore {
    /// Stored value, `None` if nothing has been stored yet
    fn get(&self) -> Result<Option<String>>;

    /// Overwrite the stored value verbatim
    fn set(&self, value: &str) -> Result<()>;
}

/// Default location of the preference file (~/.aws/swiftbar-profile)
pub fn default_profile_file() -> Result<PathBuf> {
    if let Some(home) = dirs::home_dir() {
        Ok(home.join(".aws").join("swiftbar-profile"))
    } else {
        Err(SsoError::ConfigError(
            "Could not determine home directory".to_string(),
        ))
    }
}

/// Preference stored as raw text in a single file
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)?;
        let value = contents.trim_end_matches(['\r', '\n']);

        if value.is_empty() {
            return Ok(None);
        }

        Ok(Some(value.to_string()))
    }

    fn set(&self, value: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&self.path, value)?;
        Ok(())
    }
}

/// In-memory store, used in place of the file in tests
#[cfg(test)]
#[derive(Default)]
pub struct MemoryPreferenceStore {
    value: std::cell::RefCell<Option<String>>,
}

#[cfg(test)]
impl MemoryPreferenceStore {
    pub fn with_value(value: &str) -> Self {
        Self {
            value: std::cell::RefCell::new(Some(value.to_string())),
        }
    }
}

#[cfg(test)]
impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self) -> Result<Option<String>> {
        Ok(self.value.borrow().clone())
    }

    fn set(&self, value: &str) -> Result<()> {
        *self.value.borrow_mut() = Some(value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePreferenceStore::new(dir.path().join("swiftbar-profile"));
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn test_round_trip_preserves_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePreferenceStore::new(dir.path().join("swiftbar-profile"));

        for value in ["prod", "my profile", " padded ", "tab\tname"] {
            store.set(value).unwrap();
            assert_eq!(store.get().unwrap().as_deref(), Some(value));
        }
    }

    #[test]
    fn test_trailing_newline_stripped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swiftbar-profile");
        fs::write(&path, "staging\n").unwrap();

        let store = FilePreferenceStore::new(&path);
        assert_eq!(store.get().unwrap().as_deref(), Some("staging"));
    }

    #[test]
    fn test_set_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePreferenceStore::new(dir.path().join(".aws").join("swiftbar-profile"));
        store.set("dev").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("dev"));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryPreferenceStore::default();
        assert_eq!(store.get().unwrap(), None);
        store.set("qa").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("qa"));
        assert_eq!(
            MemoryPreferenceStore::with_value("x").get().unwrap().as_deref(),
            Some("x")
        );
    }
}
