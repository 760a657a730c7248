use tracing::warn;

use prep_core::model::ThemeMode;
use storage::gateway::SettingsStore;
use storage::repository::StorageError;

/// Loads and persists the display theme preference.
///
/// The preference is read once at startup and injected into the
/// construction root; changing it is a single persistence call.
#[derive(Clone)]
pub struct SettingsService {
    store: SettingsStore,
}

impl SettingsService {
    #[must_use]
    pub fn new(store: SettingsStore) -> Self {
        Self { store }
    }

    /// Resolve the startup theme.
    ///
    /// Absent, unrecognized, or unreadable stored state falls back to the
    /// default mode rather than surfacing an error.
    pub async fn theme(&self) -> ThemeMode {
        match self.store.load_theme().await {
            Ok(Some(mode)) => mode,
            Ok(None) => ThemeMode::default(),
            Err(err) => {
                warn!(error = %err, "could not load theme preference, using default");
                ThemeMode::default()
            }
        }
    }

    /// Persist a changed theme preference.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails; the caller keeps its
    /// in-memory choice either way.
    pub async fn set_theme(&self, mode: ThemeMode) -> Result<(), StorageError> {
        self.store.save_theme(mode).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::Storage;

    #[tokio::test]
    async fn theme_defaults_to_light_on_first_run() {
        let service = SettingsService::new(Storage::in_memory().settings);
        assert_eq!(service.theme().await, ThemeMode::Light);
    }

    #[tokio::test]
    async fn theme_round_trips() {
        let storage = Storage::in_memory();
        let service = SettingsService::new(storage.settings.clone());

        service.set_theme(ThemeMode::Dark).await.unwrap();
        assert_eq!(service.theme().await, ThemeMode::Dark);

        // a fresh service over the same store sees the same preference
        let rebuilt = SettingsService::new(storage.settings);
        assert_eq!(rebuilt.theme().await, ThemeMode::Dark);
    }
}
