//! User settings model.
//!
//! # Responsibility
//! - Define the single persisted configuration row.
//! - Provide value types for notification time and background choice.
//!
//! # Invariants
//! - Exactly one settings row exists after first launch; it is never deleted.
//! - `NotificationTime` always holds a valid wall-clock time (`hour < 24`,
//!   `minute < 60`).

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Background rendering mode for the home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundType {
    #[default]
    Color,
    Image,
    Gradient,
}

impl BackgroundType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Image => "image",
            Self::Gradient => "gradient",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "color" => Some(Self::Color),
            "image" => Some(Self::Image),
            "gradient" => Some(Self::Gradient),
            _ => None,
        }
    }
}

/// Invalid hour/minute input for `NotificationTime`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidNotificationTime(pub String);

impl Display for InvalidNotificationTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid notification time `{}`", self.0)
    }
}

impl Error for InvalidNotificationTime {}

/// Local wall-clock time of the daily reminder.
///
/// Serialized as `HH:MM`; deserializing goes through the same range check
/// as `new`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NotificationTime {
    hour: u8,
    minute: u8,
}

impl NotificationTime {
    pub fn new(hour: u8, minute: u8) -> Result<Self, InvalidNotificationTime> {
        if hour >= 24 || minute >= 60 {
            return Err(InvalidNotificationTime(format!("{hour}:{minute}")));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }
}

impl Default for NotificationTime {
    fn default() -> Self {
        Self { hour: 8, minute: 0 }
    }
}

impl Display for NotificationTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for NotificationTime {
    type Err = InvalidNotificationTime;

    /// Parses `HH:MM` (24-hour clock).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidNotificationTime(value.to_string());
        let (hour, minute) = value.trim().split_once(':').ok_or_else(invalid)?;
        let hour = hour.parse::<u8>().map_err(|_| invalid())?;
        let minute = minute.parse::<u8>().map_err(|_| invalid())?;
        Self::new(hour, minute).map_err(|_| invalid())
    }
}

impl TryFrom<String> for NotificationTime {
    type Error = InvalidNotificationTime;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NotificationTime> for String {
    fn from(value: NotificationTime) -> Self {
        value.to_string()
    }
}

/// Single-row application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    pub notifications_enabled: bool,
    pub notification_time: NotificationTime,
    pub theme_color: String,
    pub use_dark_mode: bool,
    pub use_system_theme: bool,
    pub background_type: BackgroundType,
    pub custom_background_color: String,
    pub custom_background_image_name: Option<String>,
    /// Completion API credential. Never logged.
    pub api_key: Option<String>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            notifications_enabled: false,
            notification_time: NotificationTime::default(),
            theme_color: "blue".to_string(),
            use_dark_mode: false,
            use_system_theme: true,
            background_type: BackgroundType::Color,
            custom_background_color: "system.background".to_string(),
            custom_background_image_name: None,
            api_key: None,
        }
    }
}

impl UserSettings {
    /// Returns factory defaults that keep this row's API key.
    pub fn reset_keeping_api_key(&self) -> Self {
        Self {
            api_key: self.api_key.clone(),
            ..Self::default()
        }
    }

    /// Returns the stored API key when it is present and not blank.
    pub fn usable_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}
