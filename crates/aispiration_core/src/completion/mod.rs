//! Quote generation through a chat-completion API.
//!
//! # Responsibility
//! - Build prompts, call the completion endpoint, split quote from author.
//! - Offer an offline sample source when no credential is configured.
//!
//! # Invariants
//! - Generation never retries; the caller surfaces the first failure.

pub mod client;
pub mod offline;
pub mod prompt;
pub mod splitter;

use client::{CompletionClient, CompletionResult};
use prompt::QuotePrompt;
use splitter::{split_quote_and_author, SplitQuote};

/// Requests one completion and splits it into quote and author.
pub async fn generate_quote<C>(client: &C, prompt: &QuotePrompt) -> CompletionResult<SplitQuote>
where
    C: CompletionClient + ?Sized,
{
    let text = client.complete(prompt).await?;
    Ok(split_quote_and_author(&text))
}

#[cfg(test)]
mod tests {
    use super::generate_quote;
    use crate::completion::offline::OfflineQuoteClient;
    use crate::completion::prompt::QuotePrompt;

    #[tokio::test]
    async fn offline_samples_split_into_quote_and_author() {
        let client = OfflineQuoteClient::new();
        let prompt = QuotePrompt::new("激励", None);

        let first = generate_quote(&client, &prompt).await.unwrap();
        assert_eq!(first.quote, "人生就像骑自行车，要保持平衡就得不断前进。");
        assert_eq!(first.author.as_deref(), Some("爱因斯坦"));

        let second = generate_quote(&client, &prompt).await.unwrap();
        assert_eq!(second.author.as_deref(), Some("丘吉尔"));
    }

    #[tokio::test]
    async fn offline_rotation_wraps_around() {
        let client = OfflineQuoteClient::starting_at(OfflineQuoteClient::sample_count() - 1);
        let prompt = QuotePrompt::default();

        let last = generate_quote(&client, &prompt).await.unwrap();
        assert_eq!(last.quote, "没有口水与汗水，就没有成功的泪水。");
        assert_eq!(last.author, None);

        let wrapped = generate_quote(&client, &prompt).await.unwrap();
        assert_eq!(wrapped.author.as_deref(), Some("爱因斯坦"));
    }
}
