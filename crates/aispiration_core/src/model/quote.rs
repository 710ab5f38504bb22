//! Quote domain model.
//!
//! # Responsibility
//! - Define the persisted quote record and its presentation attributes.
//! - Provide favorite helpers used by the favorites flow.
//!
//! # Invariants
//! - `id` is stable and never reused for another quote.
//! - `content` is never blank.
//! - Presentation attributes are free-form strings and are not validated.

use crate::model::category::CategoryId;
use crate::model::now_epoch_ms;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a stored quote.
pub type QuoteId = Uuid;

/// Category label assigned when the caller does not pick one.
pub const UNCATEGORIZED: &str = "未分类";

pub const DEFAULT_BACKGROUND_COLOR: &str = "system.background";
pub const DEFAULT_TEXT_COLOR: &str = "system.label";
pub const DEFAULT_FONT_NAME: &str = "system";

/// Cosmetic attributes used when rendering a quote card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteStyle {
    /// Color name or `#RRGGBB` hex string.
    pub background_color: String,
    /// Color name or `#RRGGBB` hex string.
    pub text_color: String,
    /// Font catalog key or a raw platform font family.
    pub font_name: String,
}

impl Default for QuoteStyle {
    fn default() -> Self {
        Self {
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            text_color: DEFAULT_TEXT_COLOR.to_string(),
            font_name: DEFAULT_FONT_NAME.to_string(),
        }
    }
}

/// Persisted inspirational quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    /// Quote body without the author suffix.
    pub content: String,
    pub author: Option<String>,
    /// Denormalized category label. Need not match any stored category.
    pub category_name: String,
    /// Optional explicit back-reference to a category row.
    pub category_id: Option<CategoryId>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    pub is_favorite: bool,
    pub style: QuoteStyle,
}

/// Validation failures for quote records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteValidationError {
    /// `content` is empty after trim.
    EmptyContent,
}

impl Display for QuoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "quote content cannot be empty"),
        }
    }
}

impl Error for QuoteValidationError {}

impl Quote {
    /// Creates a non-favorite quote with default style and a fresh ID.
    pub fn new(
        content: impl Into<String>,
        author: Option<String>,
        category_name: impl Into<String>,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), content, author, category_name)
    }

    /// Creates a quote with a caller-provided stable ID.
    pub fn with_id(
        id: QuoteId,
        content: impl Into<String>,
        author: Option<String>,
        category_name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            content: content.into(),
            author,
            category_name: category_name.into(),
            category_id: None,
            created_at: now_epoch_ms(),
            is_favorite: false,
            style: QuoteStyle::default(),
        }
    }

    pub fn set_favorite(&mut self, is_favorite: bool) {
        self.is_favorite = is_favorite;
    }

    /// Flips the favorite flag and returns the new value.
    pub fn toggle_favorite(&mut self) -> bool {
        self.is_favorite = !self.is_favorite;
        self.is_favorite
    }

    pub fn validate(&self) -> Result<(), QuoteValidationError> {
        if self.content.trim().is_empty() {
            return Err(QuoteValidationError::EmptyContent);
        }
        Ok(())
    }
}

/// Sample quotes inserted on first launch.
pub fn sample_quotes() -> Vec<Quote> {
    [
        (
            "成功不是偶然的，而是来自于正确的决定、努力工作和坚持不懈。",
            "未知",
            "成功",
        ),
        ("每一个不曾起舞的日子，都是对生命的辜负。", "尼采", "生活"),
        ("不要等待机会，而要创造机会。", "未知", "行动"),
        (
            "生活中最重要的不是我们身处何处，而是我们朝什么方向前进。",
            "霍姆斯",
            "方向",
        ),
        ("成功的秘诀在于坚持自己的目标并不断努力。", "未知", "成功"),
    ]
    .into_iter()
    .map(|(content, author, category)| Quote::new(content, Some(author.to_string()), category))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::{sample_quotes, Quote, QuoteValidationError, UNCATEGORIZED};

    #[test]
    fn new_quote_has_defaults() {
        let quote = Quote::new("stay hungry", None, UNCATEGORIZED);
        assert!(!quote.is_favorite);
        assert_eq!(quote.style.font_name, "system");
        assert_eq!(quote.category_id, None);
        assert!(quote.created_at > 0);
    }

    #[test]
    fn toggle_favorite_twice_restores_flag() {
        let mut quote = Quote::new("stay foolish", None, UNCATEGORIZED);
        assert!(quote.toggle_favorite());
        assert!(!quote.toggle_favorite());
    }

    #[test]
    fn blank_content_is_rejected() {
        let quote = Quote::new("   ", None, UNCATEGORIZED);
        assert_eq!(quote.validate(), Err(QuoteValidationError::EmptyContent));
    }

    #[test]
    fn sample_quotes_are_valid_and_attributed() {
        let samples = sample_quotes();
        assert_eq!(samples.len(), 5);
        for quote in &samples {
            quote.validate().expect("sample quote should be valid");
            assert!(quote.author.is_some());
        }
    }
}
