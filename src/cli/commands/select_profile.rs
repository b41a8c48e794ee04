use crate::cli::commands;
use crate::error::Result;
use crate::preferences::PreferenceStore;
use crate::profile_store::ProfileStore;

/// Persist the chosen profile. Prints nothing; the host re-polls afterwards.
pub fn execute(name: Option<String>) -> Result<()> {
    let config = commands::load_config();
    select(&commands::profile_store(&config)?, name.as_deref())
}

fn select<P: PreferenceStore>(store: &ProfileStore<P>, name: Option<&str>) -> Result<()> {
    let Some(name) = name else {
        tracing::debug!("select-profile called without a profile name");
        return Ok(());
    };

    store.set_selected_profile(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::FilePreferenceStore;

    fn store(dir: &tempfile::TempDir) -> ProfileStore<FilePreferenceStore> {
        ProfileStore::new(
            dir.path().join("config"),
            FilePreferenceStore::new(dir.path().join("swiftbar-profile")),
            "prod",
        )
    }

    #[test]
    fn test_select_writes_preference_file() {
        let dir = tempfile::tempdir().unwrap();
        select(&store(&dir), Some("work")).unwrap();

        let saved = FilePreferenceStore::new(dir.path().join("swiftbar-profile"));
        assert_eq!(saved.get().unwrap().as_deref(), Some("work"));
        assert_eq!(store(&dir).selected_profile(), "work");
    }

    #[test]
    fn test_select_without_name_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        select(&store(&dir), None).unwrap();

        assert!(!dir.path().join("swiftbar-profile").exists());
        assert_eq!(store(&dir).selected_profile(), "prod");
    }
}
