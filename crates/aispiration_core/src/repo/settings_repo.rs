//! Settings repository for the single `user_settings` row.
//!
//! # Invariants
//! - The row always has `id = 1`; saves are upserts.
//! - There is no delete path.

use crate::model::settings::{BackgroundType, NotificationTime, UserSettings};
use crate::repo::{bool_to_int, int_to_bool, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const SETTINGS_ROW_ID: i64 = 1;

/// Repository interface for the settings row.
pub trait SettingsRepository {
    /// Returns `None` before first launch seeding.
    fn load_settings(&self) -> RepoResult<Option<UserSettings>>;
    /// Inserts the row when absent, otherwise replaces it in place.
    fn save_settings(&self, settings: &UserSettings) -> RepoResult<()>;
}

/// SQLite-backed settings repository.
pub struct SqliteSettingsRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSettingsRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SettingsRepository for SqliteSettingsRepository<'_> {
    fn load_settings(&self) -> RepoResult<Option<UserSettings>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                notifications_enabled,
                notification_hour,
                notification_minute,
                theme_color,
                use_dark_mode,
                use_system_theme,
                background_type,
                custom_background_color,
                custom_background_image_name,
                api_key
             FROM user_settings
             WHERE id = ?1;",
        )?;
        let mut rows = stmt.query([SETTINGS_ROW_ID])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_settings_row(row)?)),
            None => Ok(None),
        }
    }

    fn save_settings(&self, settings: &UserSettings) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO user_settings (
                id,
                notifications_enabled,
                notification_hour,
                notification_minute,
                theme_color,
                use_dark_mode,
                use_system_theme,
                background_type,
                custom_background_color,
                custom_background_image_name,
                api_key
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ON CONFLICT(id) DO UPDATE SET
                notifications_enabled = excluded.notifications_enabled,
                notification_hour = excluded.notification_hour,
                notification_minute = excluded.notification_minute,
                theme_color = excluded.theme_color,
                use_dark_mode = excluded.use_dark_mode,
                use_system_theme = excluded.use_system_theme,
                background_type = excluded.background_type,
                custom_background_color = excluded.custom_background_color,
                custom_background_image_name = excluded.custom_background_image_name,
                api_key = excluded.api_key,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                SETTINGS_ROW_ID,
                bool_to_int(settings.notifications_enabled),
                settings.notification_time.hour(),
                settings.notification_time.minute(),
                settings.theme_color.as_str(),
                bool_to_int(settings.use_dark_mode),
                bool_to_int(settings.use_system_theme),
                settings.background_type.as_str(),
                settings.custom_background_color.as_str(),
                settings.custom_background_image_name.as_deref(),
                settings.api_key.as_deref(),
            ],
        )?;
        Ok(())
    }
}

/// Returns whether the settings row exists.
pub fn settings_row_exists(conn: &Connection) -> RepoResult<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM user_settings WHERE id = ?1;",
            [SETTINGS_ROW_ID],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(found.is_some())
}

fn parse_settings_row(row: &Row<'_>) -> RepoResult<UserSettings> {
    let hour: u8 = row.get("notification_hour")?;
    let minute: u8 = row.get("notification_minute")?;
    let notification_time = NotificationTime::new(hour, minute)
        .map_err(|err| RepoError::InvalidData(format!("{err} in user_settings")))?;

    let background_text: String = row.get("background_type")?;
    let background_type = BackgroundType::parse(&background_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid background type `{background_text}` in user_settings.background_type"
        ))
    })?;

    Ok(UserSettings {
        notifications_enabled: int_to_bool(
            row.get("notifications_enabled")?,
            "user_settings.notifications_enabled",
        )?,
        notification_time,
        theme_color: row.get("theme_color")?,
        use_dark_mode: int_to_bool(row.get("use_dark_mode")?, "user_settings.use_dark_mode")?,
        use_system_theme: int_to_bool(
            row.get("use_system_theme")?,
            "user_settings.use_system_theme",
        )?,
        background_type,
        custom_background_color: row.get("custom_background_color")?,
        custom_background_image_name: row.get("custom_background_image_name")?,
        api_key: row.get("api_key")?,
    })
}
