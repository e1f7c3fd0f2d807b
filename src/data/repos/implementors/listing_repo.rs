use crate::data::database::{connection, last_inserted_id};
use crate::data::models::listing::{Listing, ListingStatus, NewListing, UpdateListing};
use crate::data::models::listing_image::{ListingImage, NewListingImage};
use crate::data::models::listing_size_variant::{ListingSizeVariant, NewListingSizeVariant};
use crate::data::repos::traits::repository::Repository;
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use diesel::prelude::*;
use diesel::result;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

pub struct ListingRepo {}

impl ListingRepo {
    pub fn new() -> Self {
        ListingRepo {}
    }

    /// Inserts the listing together with its size variants and optional
    /// primary image in one transaction.
    pub async fn create<'a>(
        &self,
        item: NewListing<'a>,
        variants: Vec<(String, i32)>,
    ) -> Result<Listing, result::Error> {
        use crate::data::models::schema::listing_images::dsl::listing_images;
        use crate::data::models::schema::listing_size_variants::dsl::listing_size_variants;
        use crate::data::models::schema::listings::dsl::{listing_id, listings};

        let mut conn = connection().await?;

        conn.transaction(|connection| {
            async move {
                diesel::insert_into(listings)
                    .values(&item)
                    .execute(connection)
                    .await?;
                let id = last_inserted_id(connection).await?;

                let rows: Vec<NewListingSizeVariant> = variants
                    .into_iter()
                    .map(|(size, stock_quantity)| NewListingSizeVariant {
                        listing_id: id,
                        size,
                        stock_quantity,
                    })
                    .collect();
                if !rows.is_empty() {
                    diesel::insert_into(listing_size_variants)
                        .values(&rows)
                        .execute(connection)
                        .await?;
                }

                if let Some(path) = item.image_path {
                    diesel::insert_into(listing_images)
                        .values(&NewListingImage {
                            listing_id: id,
                            image_path: path,
                            sort_order: 0,
                        })
                        .execute(connection)
                        .await?;
                }

                listings
                    .filter(listing_id.eq(id))
                    .first::<Listing>(connection)
                    .await
            }
            .scope_boxed()
        })
        .await
    }

    pub async fn get_by_status(&self, status_query: ListingStatus) -> Result<Vec<Listing>, result::Error> {
        use crate::data::models::schema::listings::dsl::{created_at, listing_id, listings, status};

        let mut conn = connection().await?;

        listings
            .filter(status.eq(status_query))
            .order((created_at.desc(), listing_id.desc()))
            .load::<Listing>(&mut conn)
            .await
    }

    pub async fn get_by_user(&self, uid: i32) -> Result<Vec<Listing>, result::Error> {
        use crate::data::models::schema::listings::dsl::{created_at, listing_id, listings, user_id};

        let mut conn = connection().await?;

        listings
            .filter(user_id.eq(uid))
            .order((created_at.desc(), listing_id.desc()))
            .load::<Listing>(&mut conn)
            .await
    }

    pub async fn get_by_department(&self, dept_id: i32) -> Result<Vec<Listing>, result::Error> {
        use crate::data::models::schema::listings::dsl::{
            created_at, department_id, listing_id, listings,
        };

        let mut conn = connection().await?;

        listings
            .filter(department_id.eq(dept_id))
            .order((created_at.desc(), listing_id.desc()))
            .load::<Listing>(&mut conn)
            .await
    }

    pub async fn get_by_ids(&self, ids: &[i32]) -> Result<Vec<Listing>, result::Error> {
        use crate::data::models::schema::listings::dsl::{listing_id, listings};

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = connection().await?;

        listings
            .filter(listing_id.eq_any(ids))
            .load::<Listing>(&mut conn)
            .await
    }

    pub async fn get_variants(&self, id: i32) -> Result<Vec<ListingSizeVariant>, result::Error> {
        self.get_variants_for(&[id]).await
    }

    pub async fn get_variants_for(
        &self,
        ids: &[i32],
    ) -> Result<Vec<ListingSizeVariant>, result::Error> {
        use crate::data::models::schema::listing_size_variants::dsl::{
            listing_id, listing_size_variants, variant_id,
        };

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = connection().await?;

        listing_size_variants
            .filter(listing_id.eq_any(ids))
            .order(variant_id.asc())
            .load::<ListingSizeVariant>(&mut conn)
            .await
    }

    pub async fn get_images_for(&self, ids: &[i32]) -> Result<Vec<ListingImage>, result::Error> {
        use crate::data::models::schema::listing_images::dsl::{
            image_id, listing_id, listing_images, sort_order,
        };

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = connection().await?;

        listing_images
            .filter(listing_id.eq_any(ids))
            .order((sort_order.asc(), image_id.asc()))
            .load::<ListingImage>(&mut conn)
            .await
    }

    /// Drops every size variant of the listing and inserts `variants` instead.
    pub async fn replace_variants(
        &self,
        id: i32,
        variants: Vec<NewListingSizeVariant>,
    ) -> Result<Vec<ListingSizeVariant>, result::Error> {
        use crate::data::models::schema::listing_size_variants::dsl::{
            listing_id, listing_size_variants, variant_id,
        };

        let mut conn = connection().await?;

        conn.transaction(|connection| {
            async move {
                diesel::delete(listing_size_variants.filter(listing_id.eq(id)))
                    .execute(connection)
                    .await?;

                if !variants.is_empty() {
                    diesel::insert_into(listing_size_variants)
                        .values(&variants)
                        .execute(connection)
                        .await?;
                }

                listing_size_variants
                    .filter(listing_id.eq(id))
                    .order(variant_id.asc())
                    .load::<ListingSizeVariant>(connection)
                    .await
            }
            .scope_boxed()
        })
        .await
    }

    pub async fn set_status(&self, id: i32, new_status: ListingStatus) -> Result<(), result::Error> {
        use crate::data::models::schema::listings::dsl::{listing_id, listings, status};

        let mut conn = connection().await?;

        diesel::update(listings.filter(listing_id.eq(id)))
            .set(status.eq(new_status))
            .execute(&mut conn)
            .await?;

        Ok(())
    }

    pub async fn count_by_status(
        &self,
        status_query: Option<ListingStatus>,
    ) -> Result<i64, result::Error> {
        use crate::data::models::schema::listings::dsl::{listings, status};

        let mut conn = connection().await?;

        match status_query {
            Some(s) => listings.filter(status.eq(s)).count().get_result(&mut conn).await,
            None => listings.count().get_result(&mut conn).await,
        }
    }

    /// `(price, stock_quantity)` of every approved listing.
    pub async fn approved_stock(&self) -> Result<Vec<(BigDecimal, i32)>, result::Error> {
        use crate::data::models::schema::listings::dsl::{listings, price, status, stock_quantity};

        let mut conn = connection().await?;

        listings
            .filter(status.eq(ListingStatus::Approved))
            .select((price, stock_quantity))
            .load::<(BigDecimal, i32)>(&mut conn)
            .await
    }
}

impl Default for ListingRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Repository for ListingRepo {
    type Id = i32;
    type Item = Listing;
    type NewItem<'a> = NewListing<'a>;
    type UpdateForm<'a> = UpdateListing<'a>;

    async fn get_all(&self) -> Result<Option<Vec<Self::Item>>, result::Error> {
        use crate::data::models::schema::listings::dsl::{created_at, listing_id, listings};

        let mut conn = connection().await?;

        match listings
            .order((created_at.desc(), listing_id.desc()))
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
        use crate::data::models::schema::listings::dsl::{listing_id, listings};

        let mut conn = connection().await?;

        listings
            .filter(listing_id.eq(id))
            .first::<Self::Item>(&mut conn)
            .await
            .optional()
    }

    async fn add<'a>(&self, item: Self::NewItem<'a>) -> Result<(), result::Error> {
        use crate::data::models::schema::listings::dsl::listings;

        let mut conn = connection().await?;

        diesel::insert_into(listings)
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
        use crate::data::models::schema::listings::dsl::{listing_id, listings};

        let mut conn = connection().await?;

        diesel::update(listings.filter(listing_id.eq(id)))
            .set(&item)
            .execute(&mut conn)
            .await?;

        Ok(())
    }

    async fn delete(&self, id: Self::Id) -> Result<(), result::Error> {
        use crate::data::models::schema::listings::dsl::{listing_id, listings};

        let mut conn = connection().await?;

        diesel::delete(listings.filter(listing_id.eq(id)))
            .execute(&mut conn)
            .await?;

        Ok(())
    }
}
