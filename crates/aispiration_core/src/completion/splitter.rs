//! Quote/author splitting for free-text completion output.
//!
//! # Responsibility
//! - Separate a trailing author marker from generated quote text.
//!
//! # Invariants
//! - Patterns are tried in a fixed order; the first match wins.
//! - Both parts are whitespace-trimmed; an empty author becomes `None`.
//! - Input with no recognized marker is returned whole as the quote.

use once_cell::sync::Lazy;
use regex::Regex;

// Order matters: the double em-dash must be tried before the single one.
static AUTHOR_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"——(.*?)$",
        r"-(.*?)$",
        r"—(.*?)$",
        r"\bby (.*?)$",
        r"\((.*?)\)$",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("valid author pattern"))
    .collect()
});

/// Quote text split from its optional author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitQuote {
    pub quote: String,
    pub author: Option<String>,
}

/// Splits completion text into quote and author.
///
/// Best effort: a hyphen inside the quote body is indistinguishable from an
/// author marker and will be treated as one.
pub fn split_quote_and_author(text: &str) -> SplitQuote {
    let trimmed = text.trim();

    for pattern in AUTHOR_PATTERNS.iter() {
        let Some(captures) = pattern.captures(trimmed) else {
            continue;
        };
        let (Some(whole), Some(author)) = (captures.get(0), captures.get(1)) else {
            continue;
        };

        let author = author.as_str().trim();
        return SplitQuote {
            quote: trimmed[..whole.start()].trim().to_string(),
            author: (!author.is_empty()).then(|| author.to_string()),
        };
    }

    SplitQuote {
        quote: trimmed.to_string(),
        author: None,
    }
}
