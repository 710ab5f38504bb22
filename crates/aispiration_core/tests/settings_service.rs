use aispiration_core::db::open_db_in_memory;
use aispiration_core::notification::AuthorizationStatus;
use aispiration_core::{
    BackgroundType, DailyReminder, NotificationScheduler, NotificationTime, SettingsRepository,
    SettingsService, SqliteSettingsRepository, UserSettings,
};

#[derive(Default)]
struct RecordingScheduler {
    grant: bool,
    asked: usize,
    scheduled: Vec<DailyReminder>,
    cancellations: usize,
}

impl RecordingScheduler {
    fn granting() -> Self {
        Self {
            grant: true,
            ..Self::default()
        }
    }

    fn denying() -> Self {
        Self::default()
    }
}

impl NotificationScheduler for RecordingScheduler {
    fn request_authorization(&mut self) -> bool {
        self.asked += 1;
        self.grant
    }

    fn authorization_status(&self) -> AuthorizationStatus {
        match (self.asked, self.grant) {
            (0, _) => AuthorizationStatus::NotDetermined,
            (_, true) => AuthorizationStatus::Authorized,
            (_, false) => AuthorizationStatus::Denied,
        }
    }

    fn schedule_daily(&mut self, reminder: &DailyReminder) {
        self.scheduled.retain(|existing| existing.identifier != reminder.identifier);
        self.scheduled.push(reminder.clone());
    }

    fn cancel_all_pending(&mut self) {
        self.scheduled.clear();
        self.cancellations += 1;
    }
}

#[test]
fn load_or_create_inserts_defaults_once() {
    let conn = open_db_in_memory().unwrap();
    let service = SettingsService::new(SqliteSettingsRepository::new(&conn));

    assert_eq!(service.load_or_create().unwrap(), UserSettings::default());
    assert!(SqliteSettingsRepository::new(&conn)
        .load_settings()
        .unwrap()
        .is_some());
}

#[test]
fn enabling_notifications_schedules_one_daily_reminder() {
    let conn = open_db_in_memory().unwrap();
    let service = SettingsService::new(SqliteSettingsRepository::new(&conn));
    let mut scheduler = RecordingScheduler::granting();
    let time = NotificationTime::new(21, 30).unwrap();

    service.update_notifications(true, time, &mut scheduler).unwrap();
    let settings = service
        .update_notifications(true, time, &mut scheduler)
        .unwrap();

    assert!(settings.notifications_enabled);
    assert_eq!(settings.notification_time, time);
    assert_eq!(scheduler.scheduled.len(), 1);
    assert_eq!(scheduler.scheduled[0].time, time);
    assert_eq!(scheduler.authorization_status(), AuthorizationStatus::Authorized);
}

#[test]
fn disabling_notifications_cancels_pending_requests() {
    let conn = open_db_in_memory().unwrap();
    let service = SettingsService::new(SqliteSettingsRepository::new(&conn));
    let mut scheduler = RecordingScheduler::granting();
    let time = NotificationTime::default();

    service.update_notifications(true, time, &mut scheduler).unwrap();
    let settings = service
        .update_notifications(false, time, &mut scheduler)
        .unwrap();

    assert!(!settings.notifications_enabled);
    assert!(scheduler.scheduled.is_empty());
    assert_eq!(scheduler.cancellations, 1);
}

#[test]
fn denied_permission_stores_notifications_off() {
    let conn = open_db_in_memory().unwrap();
    let service = SettingsService::new(SqliteSettingsRepository::new(&conn));
    let mut scheduler = RecordingScheduler::denying();

    let settings = service
        .update_notifications(true, NotificationTime::new(7, 0).unwrap(), &mut scheduler)
        .unwrap();

    assert!(!settings.notifications_enabled);
    assert!(scheduler.scheduled.is_empty());
    assert_eq!(scheduler.cancellations, 1);
    assert_eq!(scheduler.authorization_status(), AuthorizationStatus::Denied);
    assert!(!service.load_or_create().unwrap().notifications_enabled);
}

#[test]
fn theme_and_background_updates_are_persisted() {
    let conn = open_db_in_memory().unwrap();
    let service = SettingsService::new(SqliteSettingsRepository::new(&conn));

    service.update_theme("purple", true, false).unwrap();
    service
        .update_background(BackgroundType::Image, "#112233", Some(" beach.jpg "))
        .unwrap();

    let loaded = service.load_or_create().unwrap();
    assert_eq!(loaded.theme_color, "purple");
    assert!(loaded.use_dark_mode);
    assert!(!loaded.use_system_theme);
    assert_eq!(loaded.background_type, BackgroundType::Image);
    assert_eq!(loaded.custom_background_color, "#112233");
    assert_eq!(loaded.custom_background_image_name.as_deref(), Some("beach.jpg"));
}

#[test]
fn blank_api_key_clears_stored_key() {
    let conn = open_db_in_memory().unwrap();
    let service = SettingsService::new(SqliteSettingsRepository::new(&conn));

    let stored = service.update_api_key("  sk-live  ").unwrap();
    assert_eq!(stored.api_key.as_deref(), Some("sk-live"));

    let cleared = service.update_api_key("   ").unwrap();
    assert_eq!(cleared.api_key, None);
    assert_eq!(service.load_or_create().unwrap().usable_api_key(), None);
}

#[test]
fn reset_restores_defaults_but_keeps_api_key() {
    let conn = open_db_in_memory().unwrap();
    let service = SettingsService::new(SqliteSettingsRepository::new(&conn));
    let mut scheduler = RecordingScheduler::granting();

    service.update_api_key("sk-keep").unwrap();
    service.update_theme("green", true, false).unwrap();
    service
        .update_notifications(true, NotificationTime::new(6, 45).unwrap(), &mut scheduler)
        .unwrap();

    let reset = service.reset_all(&mut scheduler).unwrap();

    assert_eq!(
        reset,
        UserSettings {
            api_key: Some("sk-keep".to_string()),
            ..UserSettings::default()
        }
    );
    assert!(scheduler.scheduled.is_empty());
    assert_eq!(service.load_or_create().unwrap(), reset);
}
