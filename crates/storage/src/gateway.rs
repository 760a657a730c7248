use std::sync::Arc;

use prep_core::model::{Chapter, ThemeMode};

use crate::repository::{KeyValueStore, StorageError};
use crate::state::ChapterStateRecord;

/// Fixed key holding the serialized per-chapter progress blob.
pub const PROGRESS_KEY: &str = "chapter_progress_v1";

/// Fixed key holding the display theme preference.
pub const THEME_KEY: &str = "theme_mode";

//
// ─── PROGRESS GATEWAY ──────────────────────────────────────────────────────────
//

/// Serializes chapter review state to and from the key-value store.
///
/// The whole progress model lives in a single JSON blob under one fixed key;
/// every save rewrites the full state, so there is no partial-write recovery
/// to worry about.
#[derive(Clone)]
pub struct ProgressStore {
    kv: Arc<dyn KeyValueStore>,
}

impl ProgressStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Persist the non-derivable state of every chapter.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if encoding or the backend write fails.
    pub async fn save(&self, chapters: &[Chapter]) -> Result<(), StorageError> {
        let records: Vec<ChapterStateRecord> =
            chapters.iter().map(ChapterStateRecord::from_chapter).collect();
        let payload = serde_json::to_string(&records)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.kv.put(PROGRESS_KEY, &payload).await
    }

    /// Load previously persisted chapter state.
    ///
    /// Returns `None` on first run and also when the stored blob fails to
    /// decode: corruption degrades to "no prior progress" rather than an
    /// error the caller would have to surface.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only if the backend itself cannot be read.
    pub async fn load(&self) -> Result<Option<Vec<ChapterStateRecord>>, StorageError> {
        let Some(payload) = self.kv.get(PROGRESS_KEY).await? else {
            return Ok(None);
        };
        Ok(serde_json::from_str(&payload).ok())
    }

    /// Delete the persisted blob (reset-progress support).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete fails.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.kv.remove(PROGRESS_KEY).await
    }
}

//
// ─── SETTINGS GATEWAY ──────────────────────────────────────────────────────────
//

/// Persists the theme preference under its own key, independent of progress.
#[derive(Clone)]
pub struct SettingsStore {
    kv: Arc<dyn KeyValueStore>,
}

impl SettingsStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Load the stored theme preference.
    ///
    /// Returns `None` when nothing is stored or the stored value is not a
    /// recognized mode.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    pub async fn load_theme(&self) -> Result<Option<ThemeMode>, StorageError> {
        let value = self.kv.get(THEME_KEY).await?;
        Ok(value.and_then(|v| v.parse().ok()))
    }

    /// Persist the theme preference.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    pub async fn save_theme(&self, mode: ThemeMode) -> Result<(), StorageError> {
        self.kv.put(THEME_KEY, mode.as_str()).await
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryKeyValueStore;
    use prep_core::model::{CardId, Flashcard};
    use prep_core::time::fixed_now;

    fn build_chapters() -> Vec<Chapter> {
        let cards = vec![
            Flashcard::new(CardId::new(1), "Q1", "A1").unwrap(),
            Flashcard::new(CardId::new(2), "Q2", "A2").unwrap(),
        ];
        vec![Chapter::new(1, "Security Principles and Practices", cards).unwrap()]
    }

    #[tokio::test]
    async fn progress_round_trips_through_blob() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
        let store = ProgressStore::new(kv);

        let mut chapters = build_chapters();
        chapters[0].mark_reviewed(CardId::new(2), fixed_now()).unwrap();
        store.save(&chapters).await.unwrap();

        let records = store.load().await.unwrap().expect("blob present");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].chapter_number, 1);
        assert!(records[0].cards[1].is_reviewed);
        assert!(!records[0].cards[0].is_reviewed);
    }

    #[tokio::test]
    async fn missing_blob_loads_as_none() {
        let store = ProgressStore::new(Arc::new(InMemoryKeyValueStore::new()));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_blob_degrades_to_none() {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        kv.put(PROGRESS_KEY, "{not json").await.unwrap();

        let store = ProgressStore::new(kv);
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn clear_removes_the_blob() {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        let store = ProgressStore::new(Arc::clone(&kv) as Arc<dyn KeyValueStore>);

        store.save(&build_chapters()).await.unwrap();
        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn theme_round_trips_and_bad_value_degrades() {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        let store = SettingsStore::new(Arc::clone(&kv) as Arc<dyn KeyValueStore>);

        assert_eq!(store.load_theme().await.unwrap(), None);

        store.save_theme(ThemeMode::Dark).await.unwrap();
        assert_eq!(store.load_theme().await.unwrap(), Some(ThemeMode::Dark));

        kv.put(THEME_KEY, "sepia").await.unwrap();
        assert_eq!(store.load_theme().await.unwrap(), None);
    }
}
