use crate::data::database::connection;
use crate::data::models::category::{Category, NewCategory, UpdateCategory};
use crate::data::repos::traits::repository::Repository;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result;
use diesel_async::RunQueryDsl;

pub struct CategoryRepo {}

impl CategoryRepo {
    pub fn new() -> Self {
        CategoryRepo {}
    }

    pub async fn get_by_name(&self, name_query: &str) -> Result<Option<Category>, result::Error> {
        use crate::data::models::schema::categories::dsl::{categories, name};

        let mut conn = connection().await?;

        categories
            .filter(name.eq(name_query))
            .first::<Category>(&mut conn)
            .await
            .optional()
    }
}

impl Default for CategoryRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Repository for CategoryRepo {
    type Id = i32;
    type Item = Category;
    type NewItem<'a> = NewCategory<'a>;
    type UpdateForm<'a> = UpdateCategory<'a>;

    async fn get_all(&self) -> Result<Option<Vec<Self::Item>>, result::Error> {
        use crate::data::models::schema::categories::dsl::{categories, name};

        let mut conn = connection().await?;

        match categories
            .order(name.asc())
            .load::<Self::Item>(&mut conn)
            .await
        {
            Ok(value) if value.is_empty() => Ok(None),
            Ok(value) => Ok(Some(value)),
            Err(result::Error::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn get_by_id(&self, id: Self::Id) -> Result<Option<Self::Item>, result::Error> {
        use crate::data::models::schema::categories::dsl::{categories, category_id};

        let mut conn = connection().await?;

        categories
            .filter(category_id.eq(id))
            .first::<Self::Item>(&mut conn)
            .await
            .optional()
    }

    async fn add<'a>(&self, item: Self::NewItem<'a>) -> Result<(), result::Error> {
        use crate::data::models::schema::categories::dsl::categories;

        let mut conn = connection().await?;

        diesel::insert_into(categories)
            .values(&item)
            .execute(&mut conn)
            .await?;

        Ok(())
    }

    async fn update<'a>(
        &self,
        id: Self::Id,
        item: Self::UpdateForm<'a>,
    ) -> Result<(), result::Error> {
        use crate::data::models::schema::categories::dsl::{categories, category_id};

        let mut conn = connection().await?;

        diesel::update(categories.filter(category_id.eq(id)))
            .set(&item)
            .execute(&mut conn)
            .await?;

        Ok(())
    }

    async fn delete(&self, id: Self::Id) -> Result<(), result::Error> {
        use crate::data::models::schema::categories::dsl::{categories, category_id};

        let mut conn = connection().await?;

        diesel::delete(categories.filter(category_id.eq(id)))
            .execute(&mut conn)
            .await?;

        Ok(())
    }
}
