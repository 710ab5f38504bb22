//! First-launch default data.
//!
//! # Responsibility
//! - Insert default categories, sample quotes and the settings row.
//!
//! # Invariants
//! - Each table is seeded only when empty (settings: when the row is absent),
//!   so relaunching never duplicates defaults.
//! - Seeding runs in one immediate transaction.
//! - Sample quotes carry `category_id` only when a category with the same
//!   name exists.

use crate::model::category::{default_categories, CategoryId};
use crate::model::quote::sample_quotes;
use crate::model::settings::UserSettings;
use crate::repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
use crate::repo::quote_repo::{QuoteRepository, SqliteQuoteRepository};
use crate::repo::settings_repo::{settings_row_exists, SettingsRepository, SqliteSettingsRepository};
use crate::repo::RepoResult;
use log::info;
use rusqlite::{Connection, TransactionBehavior};
use std::collections::HashMap;

/// Rows inserted by one seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub categories_inserted: usize,
    pub quotes_inserted: usize,
    pub settings_created: bool,
}

impl SeedReport {
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

/// Seeds default data into empty tables.
pub fn initialize_default_data(conn: &mut Connection) -> RepoResult<SeedReport> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let mut report = SeedReport::default();

    {
        let categories = SqliteCategoryRepository::new(&tx);
        let quotes = SqliteQuoteRepository::new(&tx);
        let settings = SqliteSettingsRepository::new(&tx);

        if categories.count_categories()? == 0 {
            for category in default_categories() {
                categories.create_category(&category)?;
                report.categories_inserted += 1;
            }
        }

        if quotes.count_quotes()? == 0 {
            let category_ids: HashMap<String, CategoryId> = categories
                .list_categories()?
                .into_iter()
                .map(|category| (category.name, category.id))
                .collect();

            for mut quote in sample_quotes() {
                quote.category_id = category_ids.get(&quote.category_name).copied();
                quotes.create_quote(&quote)?;
                report.quotes_inserted += 1;
            }
        }

        if !settings_row_exists(&tx)? {
            settings.save_settings(&UserSettings::default())?;
            report.settings_created = true;
        }
    }

    tx.commit()?;

    info!(
        "event=seed_defaults module=service status=ok categories_inserted={} quotes_inserted={} settings_created={}",
        report.categories_inserted, report.quotes_inserted, report.settings_created
    );
    Ok(report)
}
