use chrono::{DateTime, Utc};
use tracing::warn;

use prep_core::Clock;
use prep_core::model::{CardId, Chapter, Flashcard};
use storage::gateway::ProgressStore;

use crate::catalog;
use crate::error::ProgressError;

//
// ─── OVERALL STATISTICS ────────────────────────────────────────────────────────
//

/// Aggregate totals across every chapter, for the dashboard surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverallProgress {
    pub total_cards: usize,
    pub reviewed: usize,
    pub mastered: usize,
    pub favorites: usize,
    pub percentage: f64,
    /// Most recent review timestamp across all cards, if any.
    pub last_activity: Option<DateTime<Utc>>,
}

//
// ─── PROGRESS SERVICE ──────────────────────────────────────────────────────────
//

/// The long-lived mutable store over the chapter list.
///
/// Seeded from the default catalog at construction and rehydrated from the
/// persistence gateway. All mutation goes through the named operations
/// below; views only ever read a snapshot. Every mutation writes the full
/// state through to storage. A failed write is logged and the in-memory
/// state stays authoritative until the next successful write.
pub struct ProgressService {
    chapters: Vec<Chapter>,
    clock: Clock,
    store: ProgressStore,
}

impl ProgressService {
    /// Build the progress model, rehydrating any persisted state.
    ///
    /// Missing or unreadable persisted state falls back to the default
    /// catalog with all flags at zero; this is the normal first-run path,
    /// never an error.
    pub async fn new(clock: Clock, store: ProgressStore) -> Self {
        let mut chapters = catalog::default_chapters();

        match store.load().await {
            Ok(Some(records)) => {
                for record in records {
                    if let Some(chapter) = chapters
                        .iter_mut()
                        .find(|c| c.number() == record.chapter_number)
                    {
                        record.apply_to(chapter);
                    }
                }
            }
            Ok(None) => {}
            Err(err) => {
                warn!(error = %err, "could not load persisted progress, starting fresh");
            }
        }

        Self {
            chapters,
            clock,
            store,
        }
    }

    #[must_use]
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    /// Chapter lookup by position in the chapter list.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::ChapterOutOfRange` for a bad index.
    pub fn chapter(&self, chapter_index: usize) -> Result<&Chapter, ProgressError> {
        self.chapters
            .get(chapter_index)
            .ok_or(ProgressError::ChapterOutOfRange {
                index: chapter_index,
                len: self.chapters.len(),
            })
    }

    fn chapter_mut(&mut self, chapter_index: usize) -> Result<&mut Chapter, ProgressError> {
        let len = self.chapters.len();
        self.chapters
            .get_mut(chapter_index)
            .ok_or(ProgressError::ChapterOutOfRange {
                index: chapter_index,
                len,
            })
    }

    /// Reviewed fraction of one chapter, 0–100.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::ChapterOutOfRange` for a bad index.
    pub fn progress_percentage(&self, chapter_index: usize) -> Result<f64, ProgressError> {
        Ok(self.chapter(chapter_index)?.progress_percentage())
    }

    /// Every favorited card with its chapter number.
    #[must_use]
    pub fn favorites(&self) -> Vec<(u32, &Flashcard)> {
        self.chapters
            .iter()
            .flat_map(|chapter| {
                chapter
                    .cards()
                    .iter()
                    .filter(|card| card.is_favorite())
                    .map(move |card| (chapter.number(), card))
            })
            .collect()
    }

    /// Aggregate totals across all chapters.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn overall(&self) -> OverallProgress {
        let total_cards: usize = self.chapters.iter().map(Chapter::total_count).sum();
        let reviewed: usize = self.chapters.iter().map(Chapter::reviewed_count).sum();
        let mastered: usize = self.chapters.iter().map(Chapter::mastered_count).sum();
        let favorites: usize = self.chapters.iter().map(Chapter::favorite_count).sum();
        let percentage = if total_cards == 0 {
            0.0
        } else {
            (100.0 * reviewed as f64 / total_cards as f64).clamp(0.0, 100.0)
        };
        let last_activity = self
            .chapters
            .iter()
            .flat_map(|chapter| chapter.cards().iter())
            .filter_map(Flashcard::last_review_date)
            .max();

        OverallProgress {
            total_cards,
            reviewed,
            mastered,
            favorites,
            percentage,
            last_activity,
        }
    }

    // ─── Mutations (write-through) ─────────────────────────────────────────

    /// Records a review of one card and persists the new state.
    ///
    /// Idempotent on the reviewed flag; every call increments the card's
    /// attempt counter and refreshes its last-review timestamp.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` for a bad chapter index or unknown card id.
    pub async fn mark_reviewed(
        &mut self,
        chapter_index: usize,
        card_id: CardId,
    ) -> Result<(), ProgressError> {
        let now = self.clock.now();
        self.chapter_mut(chapter_index)?.mark_reviewed(card_id, now)?;
        self.persist().await;
        Ok(())
    }

    /// Sets the mastered flag on one card and persists the new state.
    ///
    /// Mastering forces the reviewed flag on; un-mastering leaves it alone.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` for a bad chapter index or unknown card id.
    pub async fn set_mastered(
        &mut self,
        chapter_index: usize,
        card_id: CardId,
        mastered: bool,
    ) -> Result<(), ProgressError> {
        self.chapter_mut(chapter_index)?.set_mastered(card_id, mastered)?;
        self.persist().await;
        Ok(())
    }

    /// Flips one card's favorite flag, persists, and returns the new value.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` for a bad chapter index or unknown card id.
    pub async fn toggle_favorite(
        &mut self,
        chapter_index: usize,
        card_id: CardId,
    ) -> Result<bool, ProgressError> {
        let favorite = self.chapter_mut(chapter_index)?.toggle_favorite(card_id)?;
        self.persist().await;
        Ok(favorite)
    }

    /// Clears all review state and deletes the persisted blob.
    pub async fn reset_progress(&mut self) {
        for chapter in &mut self.chapters {
            chapter.reset_progress();
        }
        if let Err(err) = self.store.clear().await {
            warn!(error = %err, "could not clear persisted progress");
        }
    }

    async fn persist(&self) {
        if let Err(err) = self.store.save(&self.chapters).await {
            warn!(error = %err, "could not persist progress, in-memory state remains authoritative");
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use prep_core::time::fixed_clock;
    use storage::repository::Storage;

    async fn build_service() -> ProgressService {
        ProgressService::new(fixed_clock(), Storage::in_memory().progress).await
    }

    fn first_card_id(service: &ProgressService, chapter_index: usize) -> CardId {
        service.chapters()[chapter_index].cards()[0].id()
    }

    #[tokio::test]
    async fn fresh_service_seeds_from_catalog() {
        let service = build_service().await;
        assert_eq!(service.chapters().len(), 7);
        assert_eq!(service.overall().reviewed, 0);
        assert_eq!(service.overall().percentage, 0.0);
    }

    #[tokio::test]
    async fn mark_reviewed_updates_percentage() {
        let mut service = build_service().await;
        let id = first_card_id(&service, 0);

        service.mark_reviewed(0, id).await.unwrap();

        let pct = service.progress_percentage(0).unwrap();
        assert!(pct > 0.0);
        let card = service.chapters()[0].card(id).unwrap();
        assert!(card.is_reviewed());
        assert_eq!(card.attempt_count(), 1);
        assert!(card.last_review_date().is_some());
    }

    #[tokio::test]
    async fn repeat_reviews_increment_attempts_only() {
        let mut service = build_service().await;
        let id = first_card_id(&service, 0);

        service.mark_reviewed(0, id).await.unwrap();
        let pct_after_first = service.progress_percentage(0).unwrap();
        service.mark_reviewed(0, id).await.unwrap();

        assert_eq!(service.progress_percentage(0).unwrap(), pct_after_first);
        assert_eq!(service.chapters()[0].card(id).unwrap().attempt_count(), 2);
    }

    #[tokio::test]
    async fn mastering_always_implies_reviewed() {
        let mut service = build_service().await;
        let id = first_card_id(&service, 2);

        service.set_mastered(2, id, true).await.unwrap();

        let card = service.chapters()[2].card(id).unwrap();
        assert!(card.is_mastered());
        assert!(card.is_reviewed());
    }

    #[tokio::test]
    async fn toggle_favorite_reports_new_state_and_lists() {
        let mut service = build_service().await;
        let id = first_card_id(&service, 4);

        assert!(service.toggle_favorite(4, id).await.unwrap());
        let favorites = service.favorites();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].0, 5);
        assert_eq!(favorites[0].1.id(), id);

        assert!(!service.toggle_favorite(4, id).await.unwrap());
        assert!(service.favorites().is_empty());
    }

    #[tokio::test]
    async fn bad_references_are_loud() {
        let mut service = build_service().await;

        let err = service.mark_reviewed(99, CardId::new(101)).await.unwrap_err();
        assert!(matches!(err, ProgressError::ChapterOutOfRange { index: 99, .. }));

        let err = service.mark_reviewed(0, CardId::new(9999)).await.unwrap_err();
        assert!(matches!(err, ProgressError::CardNotFound(id) if id == CardId::new(9999)));
    }

    #[tokio::test]
    async fn state_survives_reconstruction_over_same_store() {
        let storage = Storage::in_memory();
        let mut service = ProgressService::new(fixed_clock(), storage.progress.clone()).await;
        let id = first_card_id(&service, 0);

        service.mark_reviewed(0, id).await.unwrap();
        service.set_mastered(0, id, true).await.unwrap();

        let rebuilt = ProgressService::new(fixed_clock(), storage.progress.clone()).await;
        let card = rebuilt.chapters()[0].card(id).unwrap();
        assert!(card.is_reviewed());
        assert!(card.is_mastered());
        assert_eq!(card.attempt_count(), 1);
    }

    #[tokio::test]
    async fn reset_clears_memory_and_store() {
        let storage = Storage::in_memory();
        let mut service = ProgressService::new(fixed_clock(), storage.progress.clone()).await;
        let id = first_card_id(&service, 0);
        service.mark_reviewed(0, id).await.unwrap();

        service.reset_progress().await;

        assert_eq!(service.overall().reviewed, 0);
        assert!(storage.progress.load().await.unwrap().is_none());
    }
}
