//! Core logic for the AIspiration quote app.
//!
//! Storage, quote generation, notification planning and presentation
//! helpers live here; the Flutter shell talks to it through the FFI crate.

pub mod completion;
pub mod db;
pub mod logging;
pub mod model;
pub mod notification;
pub mod presentation;
pub mod repo;
pub mod service;
pub mod session;

pub use completion::client::{
    CompletionClient, CompletionConfig, CompletionError, OpenAiCompletionClient,
};
pub use completion::offline::OfflineQuoteClient;
pub use completion::prompt::QuotePrompt;
pub use completion::splitter::{split_quote_and_author, SplitQuote};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::category::{Category, CategoryId};
pub use model::quote::{Quote, QuoteId, QuoteStyle};
pub use model::settings::{BackgroundType, NotificationTime, UserSettings};
pub use notification::{DailyReminder, NotificationScheduler, ReminderPlan};
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use repo::quote_repo::{QuoteListQuery, QuoteRepository, SqliteQuoteRepository};
pub use repo::settings_repo::{SettingsRepository, SqliteSettingsRepository};
pub use repo::{RepoError, RepoResult};
pub use service::category_service::CategoryService;
pub use service::quote_service::QuoteService;
pub use service::seed::{initialize_default_data, SeedReport};
pub use service::settings_service::SettingsService;
pub use session::{QuoteSession, SessionError};

/// Health check for the FFI bridge.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
