//! Category domain model.
//!
//! # Invariants
//! - `id` is stable and never reused for another category.
//! - `name` is never blank.

use crate::model::now_epoch_ms;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a stored category.
pub type CategoryId = Uuid;

pub const DEFAULT_ICON_NAME: &str = "quote.bubble";
pub const DEFAULT_CATEGORY_COLOR: &str = "blue";

/// User-defined grouping label for quotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// Platform symbol name rendered next to the label.
    pub icon_name: String,
    /// Color name understood by `presentation::color`.
    pub color: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
}

impl Display for CategoryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "category name cannot be empty"),
        }
    }
}

impl Error for CategoryValidationError {}

impl Category {
    pub fn new(
        name: impl Into<String>,
        icon_name: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            icon_name: icon_name.into(),
            color: color.into(),
            created_at: now_epoch_ms(),
        }
    }

    /// Creates a category with the default icon and color.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, DEFAULT_ICON_NAME, DEFAULT_CATEGORY_COLOR)
    }

    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }
        Ok(())
    }
}

/// Category set inserted on first launch.
///
/// `created_at` is staggered by one millisecond so list order follows the
/// declaration order below.
pub fn default_categories() -> Vec<Category> {
    [
        ("激励", "flame", "orange"),
        ("成功", "trophy", "yellow"),
        ("生活", "heart", "pink"),
        ("智慧", "lightbulb", "purple"),
        ("行动", "figure.run", "green"),
    ]
    .into_iter()
    .enumerate()
    .map(|(offset, (name, icon, color))| {
        let mut category = Category::new(name, icon, color);
        category.created_at += offset as i64;
        category
    })
    .collect()
}
