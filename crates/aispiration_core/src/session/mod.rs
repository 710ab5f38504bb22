//! Single-writer state for the quote screen.
//!
//! # Responsibility
//! - Hold the current quote, selection, in-flight flag and last error.
//! - Run quote generation end to end: prompt, completion, split, persist.
//!
//! # Invariants
//! - All mutation goes through `&mut QuoteSession`.
//! - `is_generating` is `true` from `begin_generation` until
//!   `finish_generation`, and every exit path goes through the latter.
//! - A failed action leaves a user-facing `error_message` and a log line.

use crate::completion::client::{CompletionClient, CompletionError};
use crate::completion::generate_quote;
use crate::completion::prompt::QuotePrompt;
use crate::model::quote::{Quote, QuoteId};
use crate::repo::category_repo::CategoryRepository;
use crate::repo::quote_repo::QuoteRepository;
use crate::repo::RepoError;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DEFAULT_CATEGORIES: &[&str] = &["激励", "成功", "生活", "智慧", "行动"];
pub const DEFAULT_MOODS: &[&str] = &["积极", "平静", "反思", "坚定", "感恩"];

/// Failure of a session action.
#[derive(Debug)]
pub enum SessionError {
    /// A generation call is already in flight.
    AlreadyGenerating,
    Completion(CompletionError),
    Repo(RepoError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyGenerating => write!(f, "a quote is already being generated"),
            Self::Completion(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::AlreadyGenerating => None,
            Self::Completion(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<CompletionError> for SessionError {
    fn from(value: CompletionError) -> Self {
        Self::Completion(value)
    }
}

impl From<RepoError> for SessionError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// State container behind the home screen.
#[derive(Debug, Clone)]
pub struct QuoteSession {
    current_quote: Option<Quote>,
    is_generating: bool,
    error_message: Option<String>,
    selected_category: String,
    selected_mood: Option<String>,
    available_categories: Vec<String>,
    available_moods: Vec<String>,
}

impl Default for QuoteSession {
    fn default() -> Self {
        Self {
            current_quote: None,
            is_generating: false,
            error_message: None,
            selected_category: DEFAULT_CATEGORIES[0].to_string(),
            selected_mood: None,
            available_categories: DEFAULT_CATEGORIES.iter().map(|name| name.to_string()).collect(),
            available_moods: DEFAULT_MOODS.iter().map(|mood| mood.to_string()).collect(),
        }
    }
}

impl QuoteSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_quote(&self) -> Option<&Quote> {
        self.current_quote.as_ref()
    }

    pub fn is_generating(&self) -> bool {
        self.is_generating
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn selected_category(&self) -> &str {
        &self.selected_category
    }

    pub fn selected_mood(&self) -> Option<&str> {
        self.selected_mood.as_deref()
    }

    pub fn available_categories(&self) -> &[String] {
        &self.available_categories
    }

    pub fn available_moods(&self) -> &[String] {
        &self.available_moods
    }

    pub fn select_category(&mut self, category: impl Into<String>) {
        self.selected_category = category.into();
    }

    /// `None` or a blank mood clears the tone selection.
    pub fn select_mood(&mut self, mood: Option<String>) {
        self.selected_mood = mood.filter(|value| !value.trim().is_empty());
    }

    /// Replaces picker entries, e.g. after categories were edited.
    ///
    /// An empty list keeps the current entries.
    pub fn set_available_categories(&mut self, categories: Vec<String>) {
        if categories.is_empty() {
            return;
        }
        if !categories.contains(&self.selected_category) {
            self.selected_category = categories[0].clone();
        }
        self.available_categories = categories;
    }

    pub fn show_quote(&mut self, quote: Option<Quote>) {
        self.current_quote = quote;
    }

    pub fn dismiss_error(&mut self) {
        self.error_message = None;
    }

    /// Generates, stores and shows a new quote for the current selection.
    ///
    /// Errors are recorded in `error_message` and also returned.
    pub async fn generate_new_quote<C, Q, K>(
        &mut self,
        client: &C,
        quotes: &Q,
        categories: &K,
    ) -> Result<Quote, SessionError>
    where
        C: CompletionClient + ?Sized,
        Q: QuoteRepository,
        K: CategoryRepository,
    {
        let prompt = self.begin_generation()?;
        let result = generate_and_store(client, quotes, categories, &prompt).await;
        self.finish_generation(result)
    }

    /// Marks a generation as in flight and returns the prompt to send.
    ///
    /// Callers that release the session during the request pair this with
    /// `generate_and_store` and `finish_generation`.
    pub fn begin_generation(&mut self) -> Result<QuotePrompt, SessionError> {
        if self.is_generating {
            return Err(SessionError::AlreadyGenerating);
        }

        self.is_generating = true;
        self.error_message = None;
        Ok(QuotePrompt::new(
            self.selected_category.clone(),
            self.selected_mood.clone(),
        ))
    }

    /// Clears the in-flight flag and applies the generation outcome.
    pub fn finish_generation(
        &mut self,
        result: Result<Quote, SessionError>,
    ) -> Result<Quote, SessionError> {
        self.is_generating = false;

        match result {
            Ok(quote) => {
                info!(
                    "event=quote_generate module=session status=ok quote_id={}",
                    quote.id
                );
                self.current_quote = Some(quote.clone());
                Ok(quote)
            }
            Err(err) => {
                error!(
                    "event=quote_generate module=session status=error error={}",
                    err
                );
                self.error_message = Some(format!("生成语录失败: {err}"));
                Err(err)
            }
        }
    }

    /// Deletes a stored quote and clears it from display when shown.
    pub fn delete_quote<Q: QuoteRepository>(
        &mut self,
        quotes: &Q,
        id: QuoteId,
    ) -> Result<(), SessionError> {
        if let Err(err) = quotes.delete_quote(id) {
            return Err(self.record_failure("删除语录失败", "quote_delete", err.into()));
        }

        if self.current_quote.as_ref().map(|quote| quote.id) == Some(id) {
            self.current_quote = None;
        }
        Ok(())
    }

    /// Flips the favorite flag of the shown quote and persists it.
    ///
    /// Returns the new flag, or `None` when no quote is shown.
    pub fn toggle_current_favorite<Q: QuoteRepository>(
        &mut self,
        quotes: &Q,
    ) -> Result<Option<bool>, SessionError> {
        let Some(mut quote) = self.current_quote.clone() else {
            return Ok(None);
        };

        let is_favorite = quote.toggle_favorite();
        if let Err(err) = quotes.update_quote(&quote) {
            return Err(self.record_failure("收藏失败", "quote_favorite", err.into()));
        }

        self.current_quote = Some(quote);
        Ok(Some(is_favorite))
    }

    fn record_failure(
        &mut self,
        label: &str,
        event: &'static str,
        err: SessionError,
    ) -> SessionError {
        warn!("event={event} module=session status=error error={err}");
        self.error_message = Some(format!("{label}: {err}"));
        err
    }
}

/// Requests a quote for `prompt`, links its category by name and stores it.
pub async fn generate_and_store<C, Q, K>(
    client: &C,
    quotes: &Q,
    categories: &K,
    prompt: &QuotePrompt,
) -> Result<Quote, SessionError>
where
    C: CompletionClient + ?Sized,
    Q: QuoteRepository,
    K: CategoryRepository,
{
    let split = generate_quote(client, prompt).await?;
    let mut quote = Quote::new(split.quote, split.author, prompt.category.clone());
    quote.category_id = categories
        .find_category_by_name(&prompt.category)?
        .map(|category| category.id);
    quotes.create_quote(&quote)?;
    Ok(quote)
}
