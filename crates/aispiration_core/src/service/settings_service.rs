//! Settings use-case service.
//!
//! # Responsibility
//! - Load the settings row, creating defaults on first access.
//! - Apply grouped edits (notifications, theme, background, API key).
//! - Keep the platform reminder in sync with the notification toggle.
//!
//! # Invariants
//! - Every edit is persisted before returning.
//! - `notifications_enabled` is only stored as `true` when the platform
//!   granted permission.
//! - Reset restores defaults but keeps the API key.

use crate::model::settings::{BackgroundType, NotificationTime, UserSettings};
use crate::notification::{plan_for, NotificationScheduler};
use crate::repo::settings_repo::SettingsRepository;
use crate::repo::RepoResult;
use log::{info, warn};

/// Use-case service wrapper for the settings row.
pub struct SettingsService<R: SettingsRepository> {
    repo: R,
}

impl<R: SettingsRepository> SettingsService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns the stored row, inserting defaults when it is missing.
    pub fn load_or_create(&self) -> RepoResult<UserSettings> {
        if let Some(settings) = self.repo.load_settings()? {
            return Ok(settings);
        }

        let defaults = UserSettings::default();
        self.repo.save_settings(&defaults)?;
        info!("event=settings_init module=settings status=ok");
        Ok(defaults)
    }

    /// Turns the daily reminder on or off.
    ///
    /// Enabling asks the scheduler for permission first. When permission is
    /// denied the toggle is stored as off and pending reminders are cancelled.
    pub fn update_notifications(
        &self,
        enabled: bool,
        time: NotificationTime,
        scheduler: &mut dyn NotificationScheduler,
    ) -> RepoResult<UserSettings> {
        let mut settings = self.load_or_create()?;

        if enabled && !scheduler.request_authorization() {
            warn!("event=notification_authorization module=settings status=denied");
            settings.notifications_enabled = false;
            scheduler.apply(&plan_for(false, settings.notification_time));
            self.repo.save_settings(&settings)?;
            return Ok(settings);
        }

        settings.notifications_enabled = enabled;
        settings.notification_time = time;
        scheduler.apply(&plan_for(enabled, time));
        self.repo.save_settings(&settings)?;

        info!(
            "event=notification_update module=settings status=ok enabled={} time={}",
            enabled, time
        );
        Ok(settings)
    }

    pub fn update_theme(
        &self,
        theme_color: &str,
        use_dark_mode: bool,
        use_system_theme: bool,
    ) -> RepoResult<UserSettings> {
        self.modify(|settings| {
            settings.theme_color = theme_color.trim().to_string();
            settings.use_dark_mode = use_dark_mode;
            settings.use_system_theme = use_system_theme;
        })
    }

    pub fn update_background(
        &self,
        background_type: BackgroundType,
        background_color: &str,
        background_image_name: Option<&str>,
    ) -> RepoResult<UserSettings> {
        self.modify(|settings| {
            settings.background_type = background_type;
            settings.custom_background_color = background_color.trim().to_string();
            settings.custom_background_image_name = background_image_name
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string);
        })
    }

    /// Stores the completion API key. A blank key clears it.
    pub fn update_api_key(&self, api_key: &str) -> RepoResult<UserSettings> {
        let trimmed = api_key.trim();
        let api_key = (!trimmed.is_empty()).then(|| trimmed.to_string());
        let settings = self.modify(|settings| settings.api_key = api_key)?;
        info!(
            "event=api_key_update module=settings status=ok configured={}",
            settings.api_key.is_some()
        );
        Ok(settings)
    }

    /// Restores defaults, keeps the API key and re-applies the reminder plan.
    pub fn reset_all(&self, scheduler: &mut dyn NotificationScheduler) -> RepoResult<UserSettings> {
        let current = self.load_or_create()?;
        let reset = current.reset_keeping_api_key();
        scheduler.apply(&plan_for(
            reset.notifications_enabled,
            reset.notification_time,
        ));
        self.repo.save_settings(&reset)?;
        info!("event=settings_reset module=settings status=ok");
        Ok(reset)
    }

    fn modify(&self, edit: impl FnOnce(&mut UserSettings)) -> RepoResult<UserSettings> {
        let mut settings = self.load_or_create()?;
        edit(&mut settings);
        self.repo.save_settings(&settings)?;
        Ok(settings)
    }
}
