use std::path::Path;

use tracing::{info, warn};

use prep_core::Clock;
use prep_core::model::ThemeMode;
use storage::repository::Storage;

use crate::bank::QuestionBank;
use crate::error::AppServicesError;
use crate::progress::ProgressService;
use crate::quiz::QuizService;
use crate::settings::SettingsService;

/// Assembles the app-facing services and resolves startup configuration.
///
/// The question bank loads once here; a missing or malformed bank file
/// degrades to an empty pool (zero quizzes available) rather than failing
/// startup. The theme preference is likewise resolved once and carried as a
/// plain value.
pub struct AppServices {
    theme: ThemeMode,
    bank: QuestionBank,
    quiz: QuizService,
    progress: ProgressService,
    settings: SettingsService,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        bank_path: &Path,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::assemble(storage, bank_path, clock).await)
    }

    /// Build services over in-memory storage (tests and prototyping).
    pub async fn new_in_memory(bank_path: &Path, clock: Clock) -> Self {
        Self::assemble(Storage::in_memory(), bank_path, clock).await
    }

    async fn assemble(storage: Storage, bank_path: &Path, clock: Clock) -> Self {
        let bank = match QuestionBank::load(bank_path) {
            Ok(bank) => {
                info!(questions = bank.len(), "question bank loaded");
                bank
            }
            Err(err) => {
                warn!(error = %err, "question bank unavailable, quizzes disabled");
                QuestionBank::empty()
            }
        };

        let settings = SettingsService::new(storage.settings.clone());
        let theme = settings.theme().await;
        let progress = ProgressService::new(clock, storage.progress.clone()).await;

        Self {
            theme,
            bank,
            quiz: QuizService::new(clock),
            progress,
            settings,
        }
    }

    /// Theme resolved at startup, updated through `set_theme`.
    #[must_use]
    pub fn theme(&self) -> ThemeMode {
        self.theme
    }

    /// Change the theme and persist the choice.
    ///
    /// The in-memory value always updates; a failed write is logged and the
    /// preference simply does not stick across restarts.
    pub async fn set_theme(&mut self, mode: ThemeMode) {
        self.theme = mode;
        if let Err(err) = self.settings.set_theme(mode).await {
            warn!(error = %err, "could not persist theme preference");
        }
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    #[must_use]
    pub fn quiz(&self) -> &QuizService {
        &self.quiz
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressService {
        &self.progress
    }

    pub fn progress_mut(&mut self) -> &mut ProgressService {
        &mut self.progress
    }
}
