use crate::data::database::{connection, last_inserted_id};
use crate::data::models::discount_code::{DiscountCode, NewDiscountCode, UpdateDiscountCode};
use crate::data::repos::traits::repository::Repository;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

pub struct DiscountCodeRepo {}

impl DiscountCodeRepo {
    pub fn new() -> Self {
        DiscountCodeRepo {}
    }

    /// Codes are stored uppercase, so the lookup uppercases its input.
    pub async fn get_by_code(&self, code_query: &str) -> Result<Option<DiscountCode>, result::Error> {
        use crate::data::models::schema::discount_codes::dsl::{code, discount_codes};

        let normalized = code_query.trim().to_uppercase();
        let mut conn = connection().await?;

        discount_codes
            .filter(code.eq(normalized))
            .first::<DiscountCode>(&mut conn)
            .await
            .optional()
    }

    pub async fn create<'a>(&self, item: NewDiscountCode<'a>) -> Result<DiscountCode, result::Error> {
        use crate::data::models::schema::discount_codes::dsl::{discount_code_id, discount_codes};

        let mut conn = connection().await?;

        conn.transaction(|connection| {
            async move {
                diesel::insert_into(discount_codes)
                    .values(&item)
                    .execute(connection)
                    .await?;
                let id = last_inserted_id(connection).await?;

                discount_codes
                    .filter(discount_code_id.eq(id))
                    .first::<DiscountCode>(connection)
                    .await
            }
            .scope_boxed()
        })
        .await
    }

    pub async fn list(&self) -> Result<Vec<DiscountCode>, result::Error> {
        Ok(self.get_all().await?.unwrap_or_default())
    }
}

impl Default for DiscountCodeRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Repository for DiscountCodeRepo {
    type Id = i32;
    type Item = DiscountCode;
    type NewItem<'a> = NewDiscountCode<'a>;
    type UpdateForm<'a> = UpdateDiscountCode<'a>;

    async fn get_all(&self) -> Result<Option<Vec<Self::Item>>, result::Error> {
        use crate::data::models::schema::discount_codes::dsl::{
            created_at, discount_code_id, discount_codes,
        };

        let mut conn = connection().await?;

        match discount_codes
            .order((created_at.desc(), discount_code_id.desc()))
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
        use crate::data::models::schema::discount_codes::dsl::{discount_code_id, discount_codes};

        let mut conn = connection().await?;

        discount_codes
            .filter(discount_code_id.eq(id))
            .first::<Self::Item>(&mut conn)
            .await
            .optional()
    }

    async fn add<'a>(&self, item: Self::NewItem<'a>) -> Result<(), result::Error> {
        use crate::data::models::schema::discount_codes::dsl::discount_codes;

        let mut conn = connection().await?;

        diesel::insert_into(discount_codes)
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
        use crate::data::models::schema::discount_codes::dsl::{discount_code_id, discount_codes};

        let mut conn = connection().await?;

        diesel::update(discount_codes.filter(discount_code_id.eq(id)))
            .set(&item)
            .execute(&mut conn)
            .await?;

        Ok(())
    }

    async fn delete(&self, id: Self::Id) -> Result<(), result::Error> {
        use crate::data::models::schema::discount_codes::dsl::{discount_code_id, discount_codes};

        let mut conn = connection().await?;

        diesel::delete(discount_codes.filter(discount_code_id.eq(id)))
            .execute(&mut conn)
            .await?;

        Ok(())
    }
}
