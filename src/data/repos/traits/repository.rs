use async_trait::async_trait;
use diesel::result;

/// CRUD surface shared by every table repository.
///
/// Lookups return `Ok(None)` for missing rows rather than
/// `Err(NotFound)`, and `get_all` returns `None` for an empty table.
#[async_trait]
pub trait Repository {
    type Id;
    type Item;
    type NewItem<'a>: Send + 'a;
    type UpdateForm<'a>: Send + 'a;

    async fn get_all(&self) -> Result<Option<Vec<Self::Item>>, result::Error>;
    async fn get_by_id(&self, id: Self::Id) -> Result<Option<Self::Item>, result::Error>;
    async fn add<'a>(&self, item: Self::NewItem<'a>) -> Result<(), result::Error>;
    async fn update<'a>(
        &self,
        id: Self::Id,
        item: Self::UpdateForm<'a>,
    ) -> Result<(), result::Error>;
    async fn delete(&self, id: Self::Id) -> Result<(), result::Error>;
}
