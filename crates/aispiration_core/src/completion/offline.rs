//! Offline sample generator used when no API key is stored.

use crate::completion::client::{CompletionClient, CompletionResult};
use crate::completion::prompt::QuotePrompt;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

const SAMPLE_QUOTES: &[(&str, Option<&str>)] = &[
    ("人生就像骑自行车，要保持平衡就得不断前进。", Some("爱因斯坦")),
    (
        "成功不是最终的，失败也不是致命的，重要的是继续前进的勇气。",
        Some("丘吉尔"),
    ),
    ("不要等待机会，而要创造机会。", Some("林肯")),
    (
        "生活中最重要的不是我们身处何处，而是我们朝什么方向前进。",
        Some("霍姆斯"),
    ),
    ("成功的秘诀在于坚持自己的目标并不断努力。", None),
    ("每一个不曾起舞的日子，都是对生命的辜负。", Some("尼采")),
    (
        "当你感到悲伤时，最好是去学些什么东西。学习会使你永远立于不败之地。",
        Some("居里夫人"),
    ),
    ("世上没有绝望的处境，只有对处境绝望的人。", None),
    ("只有经历过地狱般的磨砺，才能炼出创造天堂的力量。", None),
    ("没有口水与汗水，就没有成功的泪水。", None),
];

/// Rotates through built-in quotes, rendered the way the API answers.
///
/// The prompt is ignored; output goes through the same splitter as real
/// completions.
#[derive(Debug, Default)]
pub struct OfflineQuoteClient {
    next: AtomicUsize,
}

impl OfflineQuoteClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the rotation at `offset` (wrapped to the sample count).
    pub fn starting_at(offset: usize) -> Self {
        Self {
            next: AtomicUsize::new(offset % SAMPLE_QUOTES.len()),
        }
    }

    pub fn sample_count() -> usize {
        SAMPLE_QUOTES.len()
    }
}

#[async_trait]
impl CompletionClient for OfflineQuoteClient {
    async fn complete(&self, _prompt: &QuotePrompt) -> CompletionResult<String> {
        let index = self.next.fetch_add(1, Ordering::Relaxed) % SAMPLE_QUOTES.len();
        let (content, author) = SAMPLE_QUOTES[index];
        Ok(match author {
            Some(author) => format!("{content} —— {author}"),
            None => content.to_string(),
        })
    }
}
