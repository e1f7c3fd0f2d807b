use crate::data::models::category::{Category, NewCategory};
use crate::data::repos::implementors::category_repo::CategoryRepo;
use crate::data::repos::traits::repository::Repository;
use crate::services::errors::CategoryServiceError;

pub struct CategoryService;

impl CategoryService {
    pub fn new() -> Self {
        CategoryService
    }

    pub async fn list(&self) -> Result<Vec<Category>, CategoryServiceError> {
        Ok(CategoryRepo::new().get_all().await?.unwrap_or_default())
    }

    /// Returns the category named `name`, creating it first when missing.
    pub async fn ensure(&self, name: &str) -> Result<Category, CategoryServiceError> {
        let repo = CategoryRepo::new();

        if let Some(existing) = repo.get_by_name(name).await? {
            return Ok(existing);
        }

        repo.add(NewCategory { name }).await?;
        repo.get_by_name(name)
            .await?
            .ok_or(CategoryServiceError::Database(diesel::result::Error::NotFound))
    }
}

impl Default for CategoryService {
    fn default() -> Self {
        Self::new()
    }
}
