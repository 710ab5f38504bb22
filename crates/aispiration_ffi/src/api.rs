//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the quote, category and settings use cases to Dart via FRB.
//! - Own the `AppHandle` built by the app entry point.
//!
//! # Invariants
//! - Exported functions never panic across the FFI boundary.
//! - Every fallible call answers with an envelope carrying `ok` and a
//!   human-readable `message`; only `AppHandle::open` returns an error.
//! - The session lock is only held for in-memory steps, never across a
//!   network call or `block_on`.
//! - A second generation while one is in flight is rejected, not queued.

use aispiration_core::db::open_db;
use aispiration_core::notification::AuthorizationStatus;
use aispiration_core::presentation::color::{parse_color, GRADIENT_THEMES, THEME_COLOR_NAMES};
use aispiration_core::presentation::font::{catalog_entry, FONT_CATALOG};
use aispiration_core::presentation::share::share_text;
use aispiration_core::session::generate_and_store;
use aispiration_core::{
    core_version as core_version_inner, init_logging as init_logging_inner,
    initialize_default_data, ping as ping_inner, BackgroundType, Category, CategoryService,
    CompletionClient, CompletionConfig, CompletionError, DailyReminder, NotificationScheduler,
    NotificationTime, OfflineQuoteClient, OpenAiCompletionClient, Quote, QuotePrompt,
    QuoteService, QuoteSession, QuoteStyle, ReminderPlan, RepoError, SessionError,
    SettingsService, SqliteCategoryRepository, SqliteQuoteRepository, SqliteSettingsRepository,
    UserSettings,
};
use log::{info, warn};
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

const DB_FILE_NAME: &str = "aispiration.sqlite3";
const DB_PATH_ENV: &str = "AISPIRATION_DB_PATH";
const API_BASE_URL_ENV: &str = "AISPIRATION_API_BASE_URL";
const MODEL_ENV: &str = "AISPIRATION_MODEL";
const BUSY_MESSAGE: &str = "正在生成语录，请稍候";

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Color names offered by the theme picker.
#[flutter_rust_bridge::frb(sync)]
pub fn theme_colors() -> Vec<String> {
    THEME_COLOR_NAMES.iter().map(|name| name.to_string()).collect()
}

/// Two-stop gradient offered for card and screen backgrounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradientOption {
    pub name: String,
    pub start_color: String,
    pub end_color: String,
}

#[flutter_rust_bridge::frb(sync)]
pub fn gradient_themes() -> Vec<GradientOption> {
    GRADIENT_THEMES
        .iter()
        .map(|theme| GradientOption {
            name: theme.name.to_string(),
            start_color: theme.colors[0].to_string(),
            end_color: theme.colors[1].to_string(),
        })
        .collect()
}

/// Normalizes a user-entered color to its stored form.
///
/// Unknown names fall back to `blue`; hex values are upper-cased.
#[flutter_rust_bridge::frb(sync)]
pub fn normalize_color(value: String) -> String {
    parse_color(&value).to_style_string()
}

/// Font picker entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontOption {
    pub key: String,
    pub display_name: String,
}

#[flutter_rust_bridge::frb(sync)]
pub fn font_catalog() -> Vec<FontOption> {
    FONT_CATALOG
        .iter()
        .map(|entry| FontOption {
            key: entry.key.to_string(),
            display_name: entry.display_name.to_string(),
        })
        .collect()
}

/// Quote projection handed to Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteItem {
    pub id: String,
    pub content: String,
    pub author: Option<String>,
    pub category_name: String,
    pub category_id: Option<String>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    pub is_favorite: bool,
    pub background_color: String,
    pub text_color: String,
    pub font_name: String,
}

impl From<&Quote> for QuoteItem {
    fn from(quote: &Quote) -> Self {
        Self {
            id: quote.id.to_string(),
            content: quote.content.clone(),
            author: quote.author.clone(),
            category_name: quote.category_name.clone(),
            category_id: quote.category_id.map(|id| id.to_string()),
            created_at: quote.created_at,
            is_favorite: quote.is_favorite,
            background_color: quote.style.background_color.clone(),
            text_color: quote.style.text_color.clone(),
            font_name: quote.style.font_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryItem {
    pub id: String,
    pub name: String,
    pub icon_name: String,
    pub color: String,
}

impl From<&Category> for CategoryItem {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.to_string(),
            name: category.name.clone(),
            icon_name: category.icon_name.clone(),
            color: category.color.clone(),
        }
    }
}

/// Settings projection. The API key itself is not sent back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsItem {
    pub notifications_enabled: bool,
    pub notification_hour: u8,
    pub notification_minute: u8,
    pub theme_color: String,
    pub use_dark_mode: bool,
    pub use_system_theme: bool,
    /// `color|image|gradient`.
    pub background_type: String,
    pub custom_background_color: String,
    pub custom_background_image_name: Option<String>,
    pub has_api_key: bool,
}

impl From<&UserSettings> for SettingsItem {
    fn from(settings: &UserSettings) -> Self {
        Self {
            notifications_enabled: settings.notifications_enabled,
            notification_hour: settings.notification_time.hour(),
            notification_minute: settings.notification_time.minute(),
            theme_color: settings.theme_color.clone(),
            use_dark_mode: settings.use_dark_mode,
            use_system_theme: settings.use_system_theme,
            background_type: settings.background_type.as_str().to_string(),
            custom_background_color: settings.custom_background_color.clone(),
            custom_background_image_name: settings.custom_background_image_name.clone(),
            has_api_key: settings.usable_api_key().is_some(),
        }
    }
}

/// Repeating reminder the shell must register with the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderItem {
    pub identifier: String,
    pub title: String,
    pub body: String,
    pub hour: u8,
    pub minute: u8,
}

impl From<&DailyReminder> for ReminderItem {
    fn from(reminder: &DailyReminder) -> Self {
        Self {
            identifier: reminder.identifier.to_string(),
            title: reminder.title.to_string(),
            body: reminder.body.to_string(),
            hour: reminder.time.hour(),
            minute: reminder.time.minute(),
        }
    }
}

/// Snapshot of the quote screen state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub current_quote: Option<QuoteItem>,
    pub is_generating: bool,
    pub error_message: Option<String>,
    pub selected_category: String,
    pub selected_mood: Option<String>,
    pub available_categories: Vec<String>,
    pub available_moods: Vec<String>,
}

impl From<&QuoteSession> for SessionSnapshot {
    fn from(session: &QuoteSession) -> Self {
        Self {
            current_quote: session.current_quote().map(QuoteItem::from),
            is_generating: session.is_generating(),
            error_message: session.error_message().map(str::to_string),
            selected_category: session.selected_category().to_string(),
            selected_mood: session.selected_mood().map(str::to_string),
            available_categories: session.available_categories().to_vec(),
            available_moods: session.available_moods().to_vec(),
        }
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    pub message: String,
}

impl ActionResponse {
    fn from_result(result: Result<String, String>) -> Self {
        match result {
            Ok(message) => Self { ok: true, message },
            Err(message) => Self { ok: false, message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteResponse {
    pub ok: bool,
    pub quote: Option<QuoteItem>,
    pub message: String,
}

impl QuoteResponse {
    fn from_result(result: Result<Quote, String>, success: &str) -> Self {
        match result {
            Ok(quote) => Self {
                ok: true,
                quote: Some(QuoteItem::from(&quote)),
                message: success.to_string(),
            },
            Err(message) => Self {
                ok: false,
                quote: None,
                message,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteListResponse {
    pub ok: bool,
    pub items: Vec<QuoteItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextResponse {
    pub ok: bool,
    pub text: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryResponse {
    pub ok: bool,
    pub category: Option<CategoryItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryListResponse {
    pub ok: bool,
    pub items: Vec<CategoryItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsResponse {
    pub ok: bool,
    pub settings: Option<SettingsItem>,
    pub message: String,
}

impl SettingsResponse {
    fn from_result(result: Result<UserSettings, String>, success: &str) -> Self {
        match result {
            Ok(settings) => Self {
                ok: true,
                settings: Some(SettingsItem::from(&settings)),
                message: success.to_string(),
            },
            Err(message) => Self {
                ok: false,
                settings: None,
                message,
            },
        }
    }
}

/// Settings change plus the reminder work the shell must carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationResponse {
    pub ok: bool,
    pub settings: Option<SettingsItem>,
    /// Reminder to register (replacing any with the same identifier).
    pub schedule: Option<ReminderItem>,
    /// Whether every pending reminder must be removed.
    pub cancel_pending: bool,
    pub message: String,
}

impl NotificationResponse {
    fn from_parts(
        result: Result<UserSettings, String>,
        plan: Option<ReminderPlan>,
        requested: bool,
    ) -> Self {
        let settings = match result {
            Ok(settings) => settings,
            Err(message) => {
                return Self {
                    ok: false,
                    settings: None,
                    schedule: None,
                    cancel_pending: false,
                    message,
                }
            }
        };

        let message = if requested && !settings.notifications_enabled {
            "通知权限未开启"
        } else {
            "通知设置已更新"
        };
        let (schedule, cancel_pending) = match plan {
            Some(ReminderPlan::Schedule(reminder)) => (Some(ReminderItem::from(&reminder)), false),
            Some(ReminderPlan::Cancel) => (None, true),
            None => (None, false),
        };
        Self {
            ok: true,
            settings: Some(SettingsItem::from(&settings)),
            schedule,
            cancel_pending,
            message: message.to_string(),
        }
    }
}

/// Records the reminder plan so it can be handed to the shell.
///
/// Permission is asked by the shell before the call; `authorized` carries
/// its answer.
struct PlanRecorder {
    authorized: bool,
    plan: Option<ReminderPlan>,
}

impl PlanRecorder {
    fn new(authorized: bool) -> Self {
        Self {
            authorized,
            plan: None,
        }
    }
}

impl NotificationScheduler for PlanRecorder {
    fn request_authorization(&mut self) -> bool {
        self.authorized
    }

    fn authorization_status(&self) -> AuthorizationStatus {
        if self.authorized {
            AuthorizationStatus::Authorized
        } else {
            AuthorizationStatus::Denied
        }
    }

    fn schedule_daily(&mut self, reminder: &DailyReminder) {
        self.plan = Some(ReminderPlan::Schedule(reminder.clone()));
    }

    fn cancel_all_pending(&mut self) {
        self.plan = Some(ReminderPlan::Cancel);
    }
}

/// Process-wide application state created by the app entry point.
#[flutter_rust_bridge::frb(opaque)]
pub struct AppHandle {
    db_path: PathBuf,
    completion: CompletionConfig,
    offline: OfflineQuoteClient,
    session: Mutex<QuoteSession>,
}

impl AppHandle {
    /// Opens (creating when needed) the store and seeds first-launch data.
    ///
    /// `db_path` falls back to `AISPIRATION_DB_PATH`, then the temp dir.
    ///
    /// # Errors
    /// - Returns a message when the store cannot be opened or seeded; the
    ///   shell should abort launch.
    #[flutter_rust_bridge::frb(sync)]
    pub fn open(db_path: Option<String>) -> Result<AppHandle, String> {
        let db_path = resolve_db_path(db_path);
        let mut conn =
            open_db(&db_path).map_err(|err| format!("打开数据库失败: {err}"))?;
        initialize_default_data(&mut conn).map_err(|err| format!("初始化默认数据失败: {err}"))?;

        let mut session = QuoteSession::new();
        let names = CategoryService::new(SqliteCategoryRepository::new(&conn))
            .category_names()
            .map_err(|err| format!("读取分类失败: {err}"))?;
        session.set_available_categories(names);

        info!(
            "event=app_handle_open module=ffi status=ok db_path={}",
            db_path.display()
        );
        Ok(AppHandle {
            db_path,
            completion: completion_config_from_env(),
            offline: OfflineQuoteClient::new(),
            session: Mutex::new(session),
        })
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn session_snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::from(&*self.session())
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn select_category(&self, category: String) -> ActionResponse {
        self.session().select_category(category);
        ActionResponse::from_result(Ok("分类已选择".to_string()))
    }

    /// `None` or blank clears the tone.
    #[flutter_rust_bridge::frb(sync)]
    pub fn select_mood(&self, mood: Option<String>) -> ActionResponse {
        self.session().select_mood(mood);
        ActionResponse::from_result(Ok("语调已选择".to_string()))
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn dismiss_error(&self) -> ActionResponse {
        self.session().dismiss_error();
        ActionResponse::from_result(Ok(String::new()))
    }

    /// Generates a quote for the selected category and mood.
    ///
    /// Uses the HTTP client when an API key is stored, otherwise the
    /// offline sample rotation.
    ///
    /// # FFI contract
    /// - Async from Dart: blocks a worker thread for the network call.
    /// - Rejected while another generation is in flight.
    pub fn generate_quote(&self) -> QuoteResponse {
        QuoteResponse::from_result(self.generate_quote_inner(), "语录已生成")
    }

    fn generate_quote_inner(&self) -> Result<Quote, String> {
        let prompt = self
            .session()
            .begin_generation()
            .map_err(|err| match err {
                SessionError::AlreadyGenerating => BUSY_MESSAGE.to_string(),
                other => other.to_string(),
            })?;

        let result = self.request_and_store(&prompt);

        let mut session = self.session();
        session.finish_generation(result).map_err(|err| {
            session
                .error_message()
                .map(str::to_string)
                .unwrap_or_else(|| err.to_string())
        })
    }

    /// Runs with the session unlocked so snapshots and picker edits go
    /// through while the request is out.
    fn request_and_store(&self, prompt: &QuotePrompt) -> Result<Quote, SessionError> {
        let conn = open_db(&self.db_path).map_err(RepoError::from)?;
        let settings = SettingsService::new(SqliteSettingsRepository::new(&conn)).load_or_create()?;

        let http_client;
        let client: &dyn CompletionClient = match settings.usable_api_key() {
            Some(api_key) => {
                http_client = OpenAiCompletionClient::new(api_key, self.completion.clone())?;
                &http_client
            }
            None => &self.offline,
        };

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| {
                CompletionError::Transport(format!("failed to start async runtime: {err}"))
            })?;

        let quotes = SqliteQuoteRepository::new(&conn);
        let categories = SqliteCategoryRepository::new(&conn);
        runtime.block_on(generate_and_store(client, &quotes, &categories, prompt))
    }

    /// Flips the favorite flag of the quote on screen.
    #[flutter_rust_bridge::frb(sync)]
    pub fn toggle_current_favorite(&self) -> QuoteResponse {
        let result = self.connection().and_then(|conn| {
            let quotes = SqliteQuoteRepository::new(&conn);
            let mut session = self.session();
            match session.toggle_current_favorite(&quotes) {
                Ok(Some(_)) => session
                    .current_quote()
                    .cloned()
                    .ok_or_else(|| "没有正在显示的语录".to_string()),
                Ok(None) => Err("没有正在显示的语录".to_string()),
                Err(err) => Err(err.to_string()),
            }
        });
        QuoteResponse::from_result(result, "收藏状态已更新")
    }

    /// Favorites, newest first; `category` narrows to one label.
    #[flutter_rust_bridge::frb(sync)]
    pub fn list_favorites(&self, category: Option<String>) -> QuoteListResponse {
        let category = category.filter(|name| !name.trim().is_empty());
        let result = self.with_quote_service(|service| {
            service
                .list_favorites(category.as_deref())
                .map_err(|err| err.to_string())
        });
        match result {
            Ok(quotes) => QuoteListResponse {
                ok: true,
                message: format!("{} 条收藏", quotes.len()),
                items: quotes.iter().map(QuoteItem::from).collect(),
            },
            Err(message) => QuoteListResponse {
                ok: false,
                items: Vec::new(),
                message,
            },
        }
    }

    /// Distinct category labels among favorites, for filter chips.
    #[flutter_rust_bridge::frb(sync)]
    pub fn favorite_categories(&self) -> Vec<String> {
        self.with_quote_service(|service| {
            service.favorite_categories().map_err(|err| err.to_string())
        })
        .unwrap_or_else(|message| {
            warn!("event=favorite_categories module=ffi status=error error={message}");
            Vec::new()
        })
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn set_favorite(&self, quote_id: String, is_favorite: bool) -> QuoteResponse {
        let result = parse_id(&quote_id, "语录").and_then(|id| {
            self.with_quote_service(|service| {
                let quote = if is_favorite {
                    service.save_to_favorites(id)
                } else {
                    service.remove_from_favorites(id)
                };
                quote.map_err(|err| err.to_string())
            })
        });
        if let Ok(quote) = &result {
            self.refresh_current(quote);
        }
        QuoteResponse::from_result(result, "收藏状态已更新")
    }

    /// Deletes a stored quote; the screen is cleared when it was shown.
    #[flutter_rust_bridge::frb(sync)]
    pub fn delete_quote(&self, quote_id: String) -> ActionResponse {
        let result = parse_id(&quote_id, "语录").and_then(|id| {
            let conn = self.connection()?;
            self.session()
                .delete_quote(&SqliteQuoteRepository::new(&conn), id)
                .map(|()| "语录已删除".to_string())
                .map_err(|err| err.to_string())
        });
        ActionResponse::from_result(result)
    }

    /// Relabels a quote; the category id is linked when the name exists.
    #[flutter_rust_bridge::frb(sync)]
    pub fn update_quote_category(&self, quote_id: String, category_name: String) -> QuoteResponse {
        let result = parse_id(&quote_id, "语录").and_then(|id| {
            let conn = self.connection()?;
            let category_id = CategoryService::new(SqliteCategoryRepository::new(&conn))
                .find_by_name(&category_name)
                .map_err(|err| err.to_string())?
                .map(|category| category.id);
            QuoteService::new(SqliteQuoteRepository::new(&conn))
                .update_quote_category(id, &category_name, category_id)
                .map_err(|err| err.to_string())
        });
        if let Ok(quote) = &result {
            self.refresh_current(quote);
        }
        QuoteResponse::from_result(result, "分类已更新")
    }

    /// Stores card colors and font. Colors are normalized; unknown font
    /// keys are kept as family names.
    #[flutter_rust_bridge::frb(sync)]
    pub fn update_quote_style(
        &self,
        quote_id: String,
        background_color: String,
        text_color: String,
        font_name: String,
    ) -> QuoteResponse {
        let style = QuoteStyle {
            background_color: parse_color(&background_color).to_style_string(),
            text_color: parse_color(&text_color).to_style_string(),
            font_name: catalog_entry(font_name.trim())
                .map(|entry| entry.key.to_string())
                .unwrap_or_else(|| font_name.trim().to_string()),
        };
        let result = parse_id(&quote_id, "语录").and_then(|id| {
            self.with_quote_service(|service| {
                service
                    .update_quote_style(id, style)
                    .map_err(|err| err.to_string())
            })
        });
        if let Ok(quote) = &result {
            self.refresh_current(quote);
        }
        QuoteResponse::from_result(result, "样式已更新")
    }

    /// Plain text handed to the platform share sheet.
    #[flutter_rust_bridge::frb(sync)]
    pub fn share_text(&self, quote_id: String) -> TextResponse {
        let result = parse_id(&quote_id, "语录").and_then(|id| {
            self.with_quote_service(|service| {
                service
                    .get_quote(id)
                    .map_err(|err| err.to_string())?
                    .ok_or_else(|| "语录不存在".to_string())
            })
        });
        match result {
            Ok(quote) => TextResponse {
                ok: true,
                text: Some(share_text(&quote)),
                message: String::new(),
            },
            Err(message) => TextResponse {
                ok: false,
                text: None,
                message,
            },
        }
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn list_categories(&self) -> CategoryListResponse {
        let result = self.connection().and_then(|conn| {
            CategoryService::new(SqliteCategoryRepository::new(&conn))
                .list_categories()
                .map_err(|err| err.to_string())
        });
        match result {
            Ok(categories) => CategoryListResponse {
                ok: true,
                message: format!("{} 个分类", categories.len()),
                items: categories.iter().map(CategoryItem::from).collect(),
            },
            Err(message) => CategoryListResponse {
                ok: false,
                items: Vec::new(),
                message,
            },
        }
    }

    /// Adds a category; blank icon or color use the defaults.
    #[flutter_rust_bridge::frb(sync)]
    pub fn add_category(
        &self,
        name: String,
        icon_name: Option<String>,
        color: Option<String>,
    ) -> CategoryResponse {
        let result = self.connection().and_then(|conn| {
            let service = CategoryService::new(SqliteCategoryRepository::new(&conn));
            let defaults = Category::named(name.as_str());
            let icon_name = non_blank(icon_name).unwrap_or(defaults.icon_name);
            let color = non_blank(color).unwrap_or(defaults.color);
            let category = service
                .add_category(&name, &icon_name, &color)
                .map_err(|err| err.to_string())?;
            self.sync_session_categories(&service);
            Ok(category)
        });
        match result {
            Ok(category) => CategoryResponse {
                ok: true,
                category: Some(CategoryItem::from(&category)),
                message: "分类已添加".to_string(),
            },
            Err(message) => CategoryResponse {
                ok: false,
                category: None,
                message,
            },
        }
    }

    /// Removes a category row. Quotes keep their label.
    #[flutter_rust_bridge::frb(sync)]
    pub fn delete_category(&self, category_id: String) -> ActionResponse {
        let result = parse_id(&category_id, "分类").and_then(|id| {
            let conn = self.connection()?;
            let service = CategoryService::new(SqliteCategoryRepository::new(&conn));
            service.delete_category(id).map_err(|err| err.to_string())?;
            self.sync_session_categories(&service);
            Ok("分类已删除".to_string())
        });
        ActionResponse::from_result(result)
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn get_settings(&self) -> SettingsResponse {
        SettingsResponse::from_result(
            self.with_settings_service(|service| service.load_or_create()),
            "",
        )
    }

    /// Turns the daily reminder on or off.
    ///
    /// `authorized` is the platform permission answer the shell obtained.
    /// The response carries the reminder work the shell must perform.
    #[flutter_rust_bridge::frb(sync)]
    pub fn update_notifications(
        &self,
        enabled: bool,
        hour: u8,
        minute: u8,
        authorized: bool,
    ) -> NotificationResponse {
        let mut recorder = PlanRecorder::new(authorized);
        let result = NotificationTime::new(hour, minute)
            .map_err(|err| err.to_string())
            .and_then(|time| {
                self.with_settings_service(|service| {
                    service.update_notifications(enabled, time, &mut recorder)
                })
            });
        NotificationResponse::from_parts(result, recorder.plan, enabled)
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn update_theme(
        &self,
        theme_color: String,
        use_dark_mode: bool,
        use_system_theme: bool,
    ) -> SettingsResponse {
        let theme_color = parse_color(&theme_color).to_style_string();
        SettingsResponse::from_result(
            self.with_settings_service(|service| {
                service.update_theme(&theme_color, use_dark_mode, use_system_theme)
            }),
            "主题已更新",
        )
    }

    /// `background_type` is `color|image|gradient`.
    #[flutter_rust_bridge::frb(sync)]
    pub fn update_background(
        &self,
        background_type: String,
        background_color: String,
        background_image_name: Option<String>,
    ) -> SettingsResponse {
        let result = BackgroundType::parse(background_type.trim())
            .ok_or_else(|| format!("未知的背景类型 `{background_type}`"))
            .and_then(|kind| {
                self.with_settings_service(|service| {
                    service.update_background(
                        kind,
                        &background_color,
                        background_image_name.as_deref(),
                    )
                })
            });
        SettingsResponse::from_result(result, "背景已更新")
    }

    /// Stores the completion API key; blank clears it.
    #[flutter_rust_bridge::frb(sync)]
    pub fn update_api_key(&self, api_key: String) -> SettingsResponse {
        SettingsResponse::from_result(
            self.with_settings_service(|service| service.update_api_key(&api_key)),
            "API 密钥已保存",
        )
    }

    /// Restores defaults except the API key; always cancels reminders.
    #[flutter_rust_bridge::frb(sync)]
    pub fn reset_settings(&self) -> NotificationResponse {
        let mut recorder = PlanRecorder::new(false);
        let result = self.with_settings_service(|service| service.reset_all(&mut recorder));
        NotificationResponse::from_parts(result, recorder.plan, false)
    }

    fn session(&self) -> MutexGuard<'_, QuoteSession> {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn connection(&self) -> Result<Connection, String> {
        open_db(&self.db_path).map_err(|err| format!("打开数据库失败: {err}"))
    }

    fn with_quote_service<T>(
        &self,
        f: impl FnOnce(&QuoteService<SqliteQuoteRepository<'_>>) -> Result<T, String>,
    ) -> Result<T, String> {
        let conn = self.connection()?;
        let service = QuoteService::new(SqliteQuoteRepository::new(&conn));
        f(&service)
    }

    fn with_settings_service<T>(
        &self,
        f: impl FnOnce(
            &SettingsService<SqliteSettingsRepository<'_>>,
        ) -> aispiration_core::RepoResult<T>,
    ) -> Result<T, String> {
        let conn = self.connection()?;
        let service = SettingsService::new(SqliteSettingsRepository::new(&conn));
        f(&service).map_err(|err| err.to_string())
    }

    /// Keeps the shown quote in step with edits made from other screens.
    fn refresh_current(&self, quote: &Quote) {
        let mut session = self.session();
        if session.current_quote().map(|current| current.id) == Some(quote.id) {
            session.show_quote(Some(quote.clone()));
        }
    }

    fn sync_session_categories(&self, service: &CategoryService<SqliteCategoryRepository<'_>>) {
        let names = match service.category_names() {
            Ok(names) => names,
            Err(err) => {
                warn!("event=category_sync module=ffi status=error error={err}");
                return;
            }
        };
        self.session().set_available_categories(names);
    }
}

fn parse_id(value: &str, label: &str) -> Result<Uuid, String> {
    Uuid::parse_str(value.trim()).map_err(|_| format!("无效的{label} ID `{value}`"))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn resolve_db_path(explicit: Option<String>) -> PathBuf {
    non_blank(explicit)
        .map(|path| path.trim().to_string())
        .or_else(|| env_value(DB_PATH_ENV))
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join(DB_FILE_NAME))
}

fn completion_config_from_env() -> CompletionConfig {
    let mut config = CompletionConfig::default();
    if let Some(base_url) = env_value(API_BASE_URL_ENV) {
        config.base_url = base_url;
    }
    if let Some(model) = env_value(MODEL_ENV) {
        config.model = model;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, font_catalog, gradient_themes, init_logging, normalize_color, ping,
        AppHandle, BUSY_MESSAGE,
    };
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;
    use tempfile::TempDir;

    fn open_handle() -> (TempDir, AppHandle) {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("app.sqlite3");
        let handle = AppHandle::open(Some(path.to_string_lossy().into_owned())).expect("open");
        (dir, handle)
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "/tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn presentation_helpers_normalize_input() {
        assert_eq!(normalize_color("#ff8800".to_string()), "#FF8800");
        assert_eq!(normalize_color("not-a-color".to_string()), "blue");
        assert!(font_catalog().iter().any(|font| font.key == "system"));

        let gradients = gradient_themes();
        assert_eq!(gradients.len(), 6);
        assert_eq!(gradients[0].name, "蓝紫渐变");
        assert_eq!(
            (gradients[0].start_color.as_str(), gradients[0].end_color.as_str()),
            ("blue", "purple")
        );
    }

    #[test]
    fn open_seeds_categories_into_session() {
        let (_dir, handle) = open_handle();

        let snapshot = handle.session_snapshot();
        assert_eq!(snapshot.selected_category, "激励");
        assert_eq!(snapshot.available_categories.len(), 5);
        assert!(snapshot.current_quote.is_none());

        let categories = handle.list_categories();
        assert!(categories.ok, "{}", categories.message);
        assert_eq!(categories.items.len(), 5);
    }

    #[test]
    fn offline_generation_stores_and_shows_quote() {
        let (_dir, handle) = open_handle();
        assert!(handle.select_category("智慧".to_string()).ok);

        let response = handle.generate_quote();
        assert!(response.ok, "{}", response.message);
        let quote = response.quote.expect("quote");
        assert_eq!(quote.category_name, "智慧");
        assert!(quote.category_id.is_some());
        assert!(!quote.is_favorite);

        let snapshot = handle.session_snapshot();
        assert_eq!(snapshot.current_quote, Some(quote.clone()));
        assert!(!snapshot.is_generating);

        let favored = handle.toggle_current_favorite();
        assert!(favored.ok, "{}", favored.message);
        let favorites = handle.list_favorites(Some("智慧".to_string()));
        assert!(favorites.items.iter().any(|item| item.id == quote.id));
    }

    #[test]
    fn generation_is_rejected_while_one_is_in_flight() {
        let (_dir, handle) = open_handle();
        handle
            .session
            .lock()
            .expect("lock")
            .begin_generation()
            .expect("begin");

        let response = handle.generate_quote();
        assert!(!response.ok);
        assert_eq!(response.message, BUSY_MESSAGE);
        assert!(handle.select_mood(Some("平静".to_string())).ok);
        assert!(handle.session_snapshot().is_generating);
    }

    /// Reads one HTTP request, headers and body, off `stream`.
    fn read_request(stream: &mut TcpStream) {
        let mut reader = BufReader::new(stream);
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).expect("header line");
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().expect("content length");
                }
            }
        }
        let mut body = vec![0u8; content_length];
        reader.read_exact(&mut body).expect("body");
    }

    #[test]
    fn snapshot_reports_generation_while_request_is_out() {
        let (_dir, mut handle) = open_handle();
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        handle.completion.base_url = format!(
            "http://{}/v1/chat/completions",
            listener.local_addr().expect("addr")
        );
        assert!(handle.update_api_key("sk-local".to_string()).ok);
        assert!(handle.select_category("行动".to_string()).ok);

        let (received_tx, received_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let handle = &handle;

        thread::scope(|scope| {
            scope.spawn(move || {
                let (mut stream, _) = listener.accept().expect("accept");
                read_request(&mut stream);
                received_tx.send(()).expect("signal");
                let _ = release_rx.recv_timeout(Duration::from_secs(10));
                let body = r#"{"choices":[{"message":{"content":"行动是治愈恐惧的良药。—— 卡耐基"}}]}"#;
                write!(
                    stream,
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                )
                .expect("respond");
            });
            let generation = scope.spawn(|| handle.generate_quote());

            received_rx
                .recv_timeout(Duration::from_secs(10))
                .expect("request reached the server");

            let snapshot = handle.session_snapshot();
            assert!(snapshot.is_generating);
            assert!(snapshot.current_quote.is_none());
            assert!(handle.select_mood(Some("坚定".to_string())).ok);
            let busy = handle.generate_quote();
            assert!(!busy.ok);
            assert_eq!(busy.message, BUSY_MESSAGE);

            release_tx.send(()).expect("release");
            let response = generation.join().expect("generation thread");
            assert!(response.ok, "{}", response.message);
            let quote = response.quote.expect("quote");
            assert_eq!(quote.content, "行动是治愈恐惧的良药。");
            assert_eq!(quote.author.as_deref(), Some("卡耐基"));
            assert_eq!(quote.category_name, "行动");
        });

        let snapshot = handle.session_snapshot();
        assert!(!snapshot.is_generating);
        assert_eq!(snapshot.error_message, None);
        assert_eq!(snapshot.selected_mood.as_deref(), Some("坚定"));
        assert!(snapshot.current_quote.is_some());
    }

    #[test]
    fn quote_edits_share_and_delete() {
        let (_dir, handle) = open_handle();
        let quote = handle.generate_quote().quote.expect("quote");

        let styled = handle.update_quote_style(
            quote.id.clone(),
            "#112233".to_string(),
            "white".to_string(),
            "serif".to_string(),
        );
        assert!(styled.ok, "{}", styled.message);
        let styled = styled.quote.expect("quote");
        assert_eq!(styled.background_color, "#112233");
        assert_eq!(styled.font_name, "serif");

        let relabeled = handle.update_quote_category(quote.id.clone(), "没有这个分类".to_string());
        let relabeled = relabeled.quote.expect("quote");
        assert_eq!(relabeled.category_name, "没有这个分类");
        assert_eq!(relabeled.category_id, None);

        let shared = handle.share_text(quote.id.clone());
        assert!(shared.text.expect("text").starts_with('"'));

        assert!(handle.delete_quote(quote.id.clone()).ok);
        assert!(handle.session_snapshot().current_quote.is_none());
        assert!(!handle.delete_quote(quote.id).ok);
        assert!(!handle.set_favorite("not-a-uuid".to_string(), true).ok);
    }

    #[test]
    fn category_changes_refresh_session_picker() {
        let (_dir, handle) = open_handle();

        let added = handle.add_category("旅行".to_string(), None, Some(" ".to_string()));
        assert!(added.ok, "{}", added.message);
        let added = added.category.expect("category");
        assert_eq!(added.icon_name, "quote.bubble");
        assert_eq!(added.color, "blue");
        let snapshot = handle.session_snapshot();
        assert!(snapshot.available_categories.contains(&"旅行".to_string()));

        assert!(handle.delete_category(added.id).ok);
        let snapshot = handle.session_snapshot();
        assert!(!snapshot.available_categories.contains(&"旅行".to_string()));
    }

    #[test]
    fn notification_updates_return_reminder_work() {
        let (_dir, handle) = open_handle();

        let enabled = handle.update_notifications(true, 9, 15, true);
        assert!(enabled.ok, "{}", enabled.message);
        let reminder = enabled.schedule.expect("reminder");
        assert_eq!((reminder.hour, reminder.minute), (9, 15));
        assert!(enabled.settings.expect("settings").notifications_enabled);

        let denied = handle.update_notifications(true, 9, 15, false);
        assert!(denied.schedule.is_none());
        assert!(denied.cancel_pending);
        assert_eq!(denied.message, "通知权限未开启");
        assert!(!denied.settings.expect("settings").notifications_enabled);

        let invalid = handle.update_notifications(true, 25, 0, true);
        assert!(!invalid.ok);

        let reset = handle.reset_settings();
        assert!(reset.cancel_pending);
    }

    #[test]
    fn settings_round_trip_hides_api_key() {
        let (_dir, handle) = open_handle();

        let saved = handle.update_api_key("  sk-test ".to_string());
        assert!(saved.settings.expect("settings").has_api_key);

        let theme = handle.update_theme("PURPLE".to_string(), true, false);
        assert_eq!(theme.settings.expect("settings").theme_color, "purple");

        let background =
            handle.update_background("gradient".to_string(), "#000000".to_string(), None);
        assert_eq!(
            background.settings.expect("settings").background_type,
            "gradient"
        );
        assert!(!handle
            .update_background("video".to_string(), String::new(), None)
            .ok);

        let reset = handle.reset_settings();
        let settings = reset.settings.expect("settings");
        assert!(settings.has_api_key);
        assert_eq!(settings.theme_color, "blue");

        let cleared = handle.update_api_key(String::new());
        assert!(!cleared.settings.expect("settings").has_api_key);
    }
}
