//! Plain-text rendering used for copy and share actions.

use crate::model::quote::Quote;

/// `"content" —— author`, or `"content"` when the author is unknown.
pub fn share_text(quote: &Quote) -> String {
    match quote.author.as_deref() {
        Some(author) => format!("\"{}\" —— {}", quote.content, author),
        None => format!("\"{}\"", quote.content),
    }
}
