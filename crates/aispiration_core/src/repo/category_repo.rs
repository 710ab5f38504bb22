//! Category repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Write paths call `Category::validate()` before SQL mutations.
//! - List order is `created_at ASC, id ASC`.
//! - Deleting a category leaves quotes carrying its label untouched.

use crate::model::category::{Category, CategoryId};
use crate::repo::{parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const CATEGORY_SELECT_SQL: &str = "SELECT
    id,
    name,
    icon_name,
    color,
    created_at
FROM categories";

/// Repository interface for category persistence.
pub trait CategoryRepository {
    fn create_category(&self, category: &Category) -> RepoResult<CategoryId>;
    fn update_category(&self, category: &Category) -> RepoResult<()>;
    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>>;
    /// First category whose name matches exactly.
    fn find_category_by_name(&self, name: &str) -> RepoResult<Option<Category>>;
    fn list_categories(&self) -> RepoResult<Vec<Category>>;
    fn delete_category(&self, id: CategoryId) -> RepoResult<()>;
    fn count_categories(&self) -> RepoResult<u64>;
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn create_category(&self, category: &Category) -> RepoResult<CategoryId> {
        category.validate()?;

        self.conn.execute(
            "INSERT INTO categories (id, name, icon_name, color, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                category.id.to_string(),
                category.name.as_str(),
                category.icon_name.as_str(),
                category.color.as_str(),
                category.created_at,
            ],
        )?;

        Ok(category.id)
    }

    fn update_category(&self, category: &Category) -> RepoResult<()> {
        category.validate()?;

        let changed = self.conn.execute(
            "UPDATE categories
             SET name = ?1, icon_name = ?2, color = ?3
             WHERE id = ?4;",
            params![
                category.name.as_str(),
                category.icon_name.as_str(),
                category.color.as_str(),
                category.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "category",
                id: category.id,
            });
        }

        Ok(())
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        let row = self
            .conn
            .query_row(
                &format!("{CATEGORY_SELECT_SQL} WHERE id = ?1;"),
                [id.to_string()],
                read_category_columns,
            )
            .optional()?;
        row.map(parse_category_columns).transpose()
    }

    fn find_category_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        let row = self
            .conn
            .query_row(
                &format!(
                    "{CATEGORY_SELECT_SQL} WHERE name = ?1 ORDER BY created_at ASC, id ASC LIMIT 1;"
                ),
                [name],
                read_category_columns,
            )
            .optional()?;
        row.map(parse_category_columns).transpose()
    }

    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CATEGORY_SELECT_SQL} ORDER BY created_at ASC, id ASC;"
        ))?;
        let rows = stmt.query_map([], read_category_columns)?;
        let mut categories = Vec::new();
        for row in rows {
            categories.push(parse_category_columns(row?)?);
        }
        Ok(categories)
    }

    fn delete_category(&self, id: CategoryId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "category",
                id,
            });
        }

        Ok(())
    }

    fn count_categories(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM categories;", [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}

struct CategoryColumns {
    id: String,
    name: String,
    icon_name: String,
    color: String,
    created_at: i64,
}

fn read_category_columns(row: &Row<'_>) -> rusqlite::Result<CategoryColumns> {
    Ok(CategoryColumns {
        id: row.get("id")?,
        name: row.get("name")?,
        icon_name: row.get("icon_name")?,
        color: row.get("color")?,
        created_at: row.get("created_at")?,
    })
}

fn parse_category_columns(columns: CategoryColumns) -> RepoResult<Category> {
    let category = Category {
        id: parse_uuid(&columns.id, "categories.id")?,
        name: columns.name,
        icon_name: columns.icon_name,
        color: columns.color,
        created_at: columns.created_at,
    };
    category.validate()?;
    Ok(category)
}
