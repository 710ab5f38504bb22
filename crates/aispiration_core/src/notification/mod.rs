//! Daily reminder planning and the platform scheduler seam.
//!
//! # Responsibility
//! - Decide whether the daily reminder is scheduled or cancelled.
//! - Compute the next local fire time for a reminder.
//! - Define the contract the platform notification center implements.
//!
//! # Invariants
//! - At most one repeating reminder exists, identified by
//!   `DAILY_REMINDER_ID`; scheduling replaces it.
//! - Disabling notifications cancels every pending request.

use crate::model::settings::NotificationTime;
use chrono::{Duration, NaiveDateTime};

pub const DAILY_REMINDER_ID: &str = "daily-quote";
pub const DAILY_REMINDER_TITLE: &str = "今日励志语录";
pub const DAILY_REMINDER_BODY: &str = "点击查看今天的励志语录，开启充满动力的一天！";

/// Repeating reminder delivered every day at `time` (local clock).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyReminder {
    pub identifier: &'static str,
    pub title: &'static str,
    pub body: &'static str,
    pub time: NotificationTime,
}

impl DailyReminder {
    pub fn at(time: NotificationTime) -> Self {
        Self {
            identifier: DAILY_REMINDER_ID,
            title: DAILY_REMINDER_TITLE,
            body: DAILY_REMINDER_BODY,
            time,
        }
    }

    pub fn next_fire_after(&self, now: NaiveDateTime) -> NaiveDateTime {
        next_fire_after(now, self.time)
    }
}

/// What the platform notification center must do after a settings change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderPlan {
    Schedule(DailyReminder),
    Cancel,
}

/// Builds the plan for a notification toggle and time.
pub fn plan_for(enabled: bool, time: NotificationTime) -> ReminderPlan {
    if enabled {
        ReminderPlan::Schedule(DailyReminder::at(time))
    } else {
        ReminderPlan::Cancel
    }
}

/// Next occurrence of `time` strictly after `now`.
pub fn next_fire_after(now: NaiveDateTime, time: NotificationTime) -> NaiveDateTime {
    let today = now
        .date()
        .and_hms_opt(u32::from(time.hour()), u32::from(time.minute()), 0)
        .unwrap_or(now);
    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}

/// Platform permission state for notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationStatus {
    NotDetermined,
    Denied,
    Authorized,
}

/// Platform notification center.
///
/// Implemented by the shell (or by test doubles); core code only talks to
/// this trait.
pub trait NotificationScheduler {
    /// Prompts for permission if needed and returns whether it is granted.
    fn request_authorization(&mut self) -> bool;
    fn authorization_status(&self) -> AuthorizationStatus;
    /// Adds or replaces the repeating reminder with the same identifier.
    fn schedule_daily(&mut self, reminder: &DailyReminder);
    fn cancel_all_pending(&mut self);

    fn apply(&mut self, plan: &ReminderPlan) {
        match plan {
            ReminderPlan::Schedule(reminder) => self.schedule_daily(reminder),
            ReminderPlan::Cancel => self.cancel_all_pending(),
        }
    }
}
