#![forbid(unsafe_code)]

pub mod gateway;
pub mod repository;
pub mod sqlite;
pub mod state;

pub use gateway::{ProgressStore, SettingsStore, PROGRESS_KEY, THEME_KEY};
pub use repository::{InMemoryKeyValueStore, KeyValueStore, Storage, StorageError};
pub use state::{CardStateRecord, ChapterStateRecord};
