//! Quote use-case service.
//!
//! # Responsibility
//! - Provide create/update/delete and favorites entry points for callers.
//! - Apply small input normalizations (blank author, blank category).
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - Favorite and style edits touch only their own fields.

use crate::model::category::CategoryId;
use crate::model::quote::{Quote, QuoteId, QuoteStyle, UNCATEGORIZED};
use crate::repo::quote_repo::{QuoteListQuery, QuoteRepository};
use crate::repo::{RepoError, RepoResult};

/// Use-case service wrapper for quote persistence.
pub struct QuoteService<R: QuoteRepository> {
    repo: R,
}

impl<R: QuoteRepository> QuoteService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Stores a new quote and returns it.
    ///
    /// A blank author is stored as `None`; a blank category as
    /// `UNCATEGORIZED`.
    pub fn add_quote(
        &self,
        content: &str,
        author: Option<&str>,
        category_name: &str,
        is_favorite: bool,
    ) -> RepoResult<Quote> {
        let mut quote = Quote::new(
            content.trim(),
            normalize_author(author),
            normalize_category_name(category_name),
        );
        quote.is_favorite = is_favorite;
        self.repo.create_quote(&quote)?;
        Ok(quote)
    }

    pub fn get_quote(&self, id: QuoteId) -> RepoResult<Option<Quote>> {
        self.repo.get_quote(id)
    }

    /// Persists all mutable fields of `quote`.
    pub fn update_quote(&self, quote: &Quote) -> RepoResult<()> {
        self.repo.update_quote(quote)
    }

    pub fn delete_quote(&self, id: QuoteId) -> RepoResult<()> {
        self.repo.delete_quote(id)
    }

    pub fn save_to_favorites(&self, id: QuoteId) -> RepoResult<Quote> {
        self.modify(id, |quote| quote.set_favorite(true))
    }

    pub fn remove_from_favorites(&self, id: QuoteId) -> RepoResult<Quote> {
        self.modify(id, |quote| quote.set_favorite(false))
    }

    pub fn toggle_favorite(&self, id: QuoteId) -> RepoResult<Quote> {
        self.modify(id, |quote| {
            quote.toggle_favorite();
        })
    }

    /// Relabels a quote. `category_id` is stored as given and not checked.
    pub fn update_quote_category(
        &self,
        id: QuoteId,
        category_name: &str,
        category_id: Option<CategoryId>,
    ) -> RepoResult<Quote> {
        let category_name = normalize_category_name(category_name);
        self.modify(id, move |quote| {
            quote.category_name = category_name;
            quote.category_id = category_id;
        })
    }

    pub fn update_quote_style(&self, id: QuoteId, style: QuoteStyle) -> RepoResult<Quote> {
        self.modify(id, move |quote| quote.style = style)
    }

    /// Favorites, newest first, optionally narrowed to one category label.
    pub fn list_favorites(&self, category_name: Option<&str>) -> RepoResult<Vec<Quote>> {
        let query = QuoteListQuery::favorites(category_name.map(str::to_string));
        self.repo.list_quotes(&query)
    }

    pub fn list_recent(&self, limit: u32) -> RepoResult<Vec<Quote>> {
        self.repo.list_quotes(&QuoteListQuery {
            limit: Some(limit),
            ..QuoteListQuery::default()
        })
    }

    /// Labels used as favorites filter chips.
    pub fn favorite_categories(&self) -> RepoResult<Vec<String>> {
        self.repo.favorite_category_names()
    }

    fn modify(&self, id: QuoteId, edit: impl FnOnce(&mut Quote)) -> RepoResult<Quote> {
        let mut quote = self.repo.get_quote(id)?.ok_or(RepoError::NotFound {
            entity: "quote",
            id,
        })?;
        edit(&mut quote);
        self.repo.update_quote(&quote)?;
        Ok(quote)
    }
}

fn normalize_author(author: Option<&str>) -> Option<String> {
    author
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn normalize_category_name(category_name: &str) -> String {
    let trimmed = category_name.trim();
    if trimmed.is_empty() {
        UNCATEGORIZED.to_string()
    } else {
        trimmed.to_string()
    }
}
