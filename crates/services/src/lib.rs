#![forbid(unsafe_code)]

pub mod app_services;
pub mod bank;
pub mod catalog;
pub mod error;
pub mod progress;
pub mod quiz;
pub mod settings;

pub use prep_core::Clock;

pub use app_services::AppServices;
pub use bank::{QuestionBank, chapter_number_from_domain};
pub use error::{AppServicesError, LoadError, ProgressError};
pub use progress::{OverallProgress, ProgressService};
pub use quiz::{DEFAULT_QUIZ_SIZE, QuizService};
pub use settings::SettingsService;
