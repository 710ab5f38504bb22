//! Category use-case service.

use crate::model::category::{Category, CategoryId};
use crate::repo::category_repo::CategoryRepository;
use crate::repo::RepoResult;

/// Use-case service wrapper for category persistence.
pub struct CategoryService<R: CategoryRepository> {
    repo: R,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn add_category(&self, name: &str, icon_name: &str, color: &str) -> RepoResult<Category> {
        let category = Category::new(name.trim(), icon_name.trim(), color.trim());
        self.repo.create_category(&category)?;
        Ok(category)
    }

    pub fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        self.repo.get_category(id)
    }

    pub fn find_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        self.repo.find_category_by_name(name.trim())
    }

    pub fn update_category(&self, category: &Category) -> RepoResult<()> {
        self.repo.update_category(category)
    }

    /// Removes the category row only; quotes keep their label.
    pub fn delete_category(&self, id: CategoryId) -> RepoResult<()> {
        self.repo.delete_category(id)
    }

    pub fn list_categories(&self) -> RepoResult<Vec<Category>> {
        self.repo.list_categories()
    }

    /// Names in list order, for category pickers.
    pub fn category_names(&self) -> RepoResult<Vec<String>> {
        Ok(self
            .repo
            .list_categories()?
            .into_iter()
            .map(|category| category.name)
            .collect())
    }
}
