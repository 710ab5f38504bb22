//! Quote repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `quotes` table.
//! - Answer the favorites screen queries (favorite list, filter labels).
//!
//! # Invariants
//! - Write paths call `Quote::validate()` before SQL mutations.
//! - List order is `created_at DESC, id ASC`.
//! - Deletion is a hard delete.

use crate::model::quote::{Quote, QuoteId, QuoteStyle};
use crate::repo::{bool_to_int, int_to_bool, parse_uuid, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const QUOTE_SELECT_SQL: &str = "SELECT
    id,
    content,
    author,
    category_name,
    category_id,
    created_at,
    is_favorite,
    background_color,
    text_color,
    font_name
FROM quotes";

/// Query options for listing quotes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteListQuery {
    pub favorites_only: bool,
    /// Exact category label filter.
    pub category_name: Option<String>,
    pub limit: Option<u32>,
    pub offset: u32,
}

impl QuoteListQuery {
    /// Favorites, optionally narrowed to one category label.
    pub fn favorites(category_name: Option<String>) -> Self {
        Self {
            favorites_only: true,
            category_name,
            ..Self::default()
        }
    }
}

/// Repository interface for quote persistence.
pub trait QuoteRepository {
    fn create_quote(&self, quote: &Quote) -> RepoResult<QuoteId>;
    fn update_quote(&self, quote: &Quote) -> RepoResult<()>;
    fn get_quote(&self, id: QuoteId) -> RepoResult<Option<Quote>>;
    fn list_quotes(&self, query: &QuoteListQuery) -> RepoResult<Vec<Quote>>;
    fn delete_quote(&self, id: QuoteId) -> RepoResult<()>;
    fn count_quotes(&self) -> RepoResult<u64>;
    /// Distinct category labels of favorite quotes, sorted.
    fn favorite_category_names(&self) -> RepoResult<Vec<String>>;
}

/// SQLite-backed quote repository.
pub struct SqliteQuoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteQuoteRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl QuoteRepository for SqliteQuoteRepository<'_> {
    fn create_quote(&self, quote: &Quote) -> RepoResult<QuoteId> {
        quote.validate()?;

        self.conn.execute(
            "INSERT INTO quotes (
                id,
                content,
                author,
                category_name,
                category_id,
                created_at,
                is_favorite,
                background_color,
                text_color,
                font_name
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                quote.id.to_string(),
                quote.content.as_str(),
                quote.author.as_deref(),
                quote.category_name.as_str(),
                quote.category_id.map(|id| id.to_string()),
                quote.created_at,
                bool_to_int(quote.is_favorite),
                quote.style.background_color.as_str(),
                quote.style.text_color.as_str(),
                quote.style.font_name.as_str(),
            ],
        )?;

        Ok(quote.id)
    }

    fn update_quote(&self, quote: &Quote) -> RepoResult<()> {
        quote.validate()?;

        let changed = self.conn.execute(
            "UPDATE quotes
             SET
                content = ?1,
                author = ?2,
                category_name = ?3,
                category_id = ?4,
                is_favorite = ?5,
                background_color = ?6,
                text_color = ?7,
                font_name = ?8
             WHERE id = ?9;",
            params![
                quote.content.as_str(),
                quote.author.as_deref(),
                quote.category_name.as_str(),
                quote.category_id.map(|id| id.to_string()),
                bool_to_int(quote.is_favorite),
                quote.style.background_color.as_str(),
                quote.style.text_color.as_str(),
                quote.style.font_name.as_str(),
                quote.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "quote",
                id: quote.id,
            });
        }

        Ok(())
    }

    fn get_quote(&self, id: QuoteId) -> RepoResult<Option<Quote>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{QUOTE_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_quote_row(row)?));
        }

        Ok(None)
    }

    fn list_quotes(&self, query: &QuoteListQuery) -> RepoResult<Vec<Quote>> {
        let mut sql = format!("{QUOTE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if query.favorites_only {
            sql.push_str(" AND is_favorite = 1");
        }

        if let Some(category_name) = query.category_name.as_ref() {
            sql.push_str(" AND category_name = ?");
            bind_values.push(Value::Text(category_name.clone()));
        }

        sql.push_str(" ORDER BY created_at DESC, id ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut quotes = Vec::new();

        while let Some(row) = rows.next()? {
            quotes.push(parse_quote_row(row)?);
        }

        Ok(quotes)
    }

    fn delete_quote(&self, id: QuoteId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM quotes WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound { entity: "quote", id });
        }

        Ok(())
    }

    fn count_quotes(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM quotes;", [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    fn favorite_category_names(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT category_name
             FROM quotes
             WHERE is_favorite = 1
             ORDER BY category_name ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut names = Vec::new();
        while let Some(row) = rows.next()? {
            names.push(row.get(0)?);
        }
        Ok(names)
    }
}

fn parse_quote_row(row: &Row<'_>) -> RepoResult<Quote> {
    let id_text: String = row.get("id")?;
    let id = parse_uuid(&id_text, "quotes.id")?;

    let category_id = match row.get::<_, Option<String>>("category_id")? {
        Some(value) => Some(parse_uuid(&value, "quotes.category_id")?),
        None => None,
    };

    let quote = Quote {
        id,
        content: row.get("content")?,
        author: row.get("author")?,
        category_name: row.get("category_name")?,
        category_id,
        created_at: row.get("created_at")?,
        is_favorite: int_to_bool(row.get("is_favorite")?, "quotes.is_favorite")?,
        style: QuoteStyle {
            background_color: row.get("background_color")?,
            text_color: row.get("text_color")?,
            font_name: row.get("font_name")?,
        },
    };
    quote.validate()?;
    Ok(quote)
}
