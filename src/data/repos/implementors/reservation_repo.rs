use crate::data::database::{connection, last_inserted_id};
use crate::data::models::reservation::{NewReservation, Reservation, UpdateReservation};
use crate::data::repos::traits::repository::Repository;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

pub struct ReservationRepo {}

impl ReservationRepo {
    pub fn new() -> Self {
        ReservationRepo {}
    }

    pub async fn create<'a>(&self, item: NewReservation<'a>) -> Result<Reservation, result::Error> {
        use crate::data::models::schema::reservations::dsl::{reservation_id, reservations};

        let mut conn = connection().await?;

        conn.transaction(|connection| {
            async move {
                diesel::insert_into(reservations)
                    .values(&item)
                    .execute(connection)
                    .await?;
                let id = last_inserted_id(connection).await?;

                reservations
                    .filter(reservation_id.eq(id))
                    .first::<Reservation>(connection)
                    .await
            }
            .scope_boxed()
        })
        .await
    }

    pub async fn get_by_user(&self, uid: i32) -> Result<Vec<Reservation>, result::Error> {
        use crate::data::models::schema::reservations::dsl::{
            created_at, reservation_id, reservations, user_id,
        };

        let mut conn = connection().await?;

        reservations
            .filter(user_id.eq(uid))
            .order((created_at.desc(), reservation_id.desc()))
            .load::<Reservation>(&mut conn)
            .await
    }
}

impl Default for ReservationRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Repository for ReservationRepo {
    type Id = i32;
    type Item = Reservation;
    type NewItem<'a> = NewReservation<'a>;
    type UpdateForm<'a> = UpdateReservation<'a>;

    async fn get_all(&self) -> Result<Option<Vec<Self::Item>>, result::Error> {
        use crate::data::models::schema::reservations::dsl::{created_at, reservations};

        let mut conn = connection().await?;

        match reservations
            .order(created_at.desc())
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
        use crate::data::models::schema::reservations::dsl::{reservation_id, reservations};

        let mut conn = connection().await?;

        reservations
            .filter(reservation_id.eq(id))
            .first::<Self::Item>(&mut conn)
            .await
            .optional()
    }

    async fn add<'a>(&self, item: Self::NewItem<'a>) -> Result<(), result::Error> {
        use crate::data::models::schema::reservations::dsl::reservations;

        let mut conn = connection().await?;

        diesel::insert_into(reservations)
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
        use crate::data::models::schema::reservations::dsl::{reservation_id, reservations};

        let mut conn = connection().await?;

        diesel::update(reservations.filter(reservation_id.eq(id)))
            .set(&item)
            .execute(&mut conn)
            .await?;

        Ok(())
    }

    async fn delete(&self, id: Self::Id) -> Result<(), result::Error> {
        use crate::data::models::schema::reservations::dsl::{reservation_id, reservations};

        let mut conn = connection().await?;

        diesel::delete(reservations.filter(reservation_id.eq(id)))
            .execute(&mut conn)
            .await?;

        Ok(())
    }
}
