use crate::data::database::connection;
use crate::data::models::notification::{NewNotification, Notification, UpdateNotification};
use crate::data::models::schema::notifications;
use crate::data::models::user::User;
use crate::data::repos::traits::repository::Repository;
use async_trait::async_trait;
use diesel::mysql::Mysql;
use diesel::prelude::*;
use diesel::result;
use diesel_async::RunQueryDsl;

pub struct NotificationRepo {}

/// Rows addressed to `viewer`. Every recipient owns a separate row, so
/// reading or deleting one never touches another user's copy.
fn owned_by(viewer: &User) -> notifications::BoxedQuery<'static, Mysql> {
    use crate::data::models::schema::notifications::dsl::*;

    notifications.filter(user_id.eq(viewer.user_id)).into_boxed()
}

impl NotificationRepo {
    pub fn new() -> Self {
        NotificationRepo {}
    }

    pub async fn add_many(&self, rows: Vec<NewNotification>) -> Result<usize, result::Error> {
        use crate::data::models::schema::notifications::dsl::notifications;

        if rows.is_empty() {
            return Ok(0);
        }

        let mut conn = connection().await?;

        diesel::insert_into(notifications)
            .values(&rows)
            .execute(&mut conn)
            .await
    }

    pub async fn get_for_user(
        &self,
        viewer: &User,
        limit: i64,
    ) -> Result<Vec<Notification>, result::Error> {
        use crate::data::models::schema::notifications::dsl::{created_at, notification_id};

        let mut conn = connection().await?;

        owned_by(viewer)
            .order((created_at.desc(), notification_id.desc()))
            .limit(limit)
            .load::<Notification>(&mut conn)
            .await
    }

    pub async fn count_unread(&self, viewer: &User) -> Result<i64, result::Error> {
        use crate::data::models::schema::notifications::dsl::is_read;

        let mut conn = connection().await?;

        owned_by(viewer)
            .filter(is_read.eq(false))
            .count()
            .get_result(&mut conn)
            .await
    }

    /// Ids among `candidates` (or all, when `None`) owned by `viewer`.
    pub async fn owned_ids(
        &self,
        viewer: &User,
        candidates: Option<&[i32]>,
    ) -> Result<Vec<i32>, result::Error> {
        use crate::data::models::schema::notifications::dsl::notification_id;

        let mut conn = connection().await?;

        let mut query = owned_by(viewer).select(notification_id);
        if let Some(ids) = candidates {
            query = query.filter(notification_id.eq_any(ids.to_vec()));
        }

        query.load::<i32>(&mut conn).await
    }

    pub async fn mark_read(&self, ids: &[i32]) -> Result<usize, result::Error> {
        use crate::data::models::schema::notifications::dsl::{
            is_read, notification_id, notifications, read_at,
        };

        if ids.is_empty() {
            return Ok(0);
        }

        let mut conn = connection().await?;

        diesel::update(
            notifications
                .filter(notification_id.eq_any(ids))
                .filter(is_read.eq(false)),
        )
        .set((
            is_read.eq(true),
            read_at.eq(Some(chrono::Utc::now().naive_utc())),
        ))
        .execute(&mut conn)
        .await
    }

    pub async fn delete_many(&self, ids: &[i32]) -> Result<usize, result::Error> {
        use crate::data::models::schema::notifications::dsl::{notification_id, notifications};

        if ids.is_empty() {
            return Ok(0);
        }

        let mut conn = connection().await?;

        diesel::delete(notifications.filter(notification_id.eq_any(ids)))
            .execute(&mut conn)
            .await
    }
}

impl Default for NotificationRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Repository for NotificationRepo {
    type Id = i32;
    type Item = Notification;
    type NewItem<'a> = NewNotification;
    type UpdateForm<'a> = UpdateNotification;

    async fn get_all(&self) -> Result<Option<Vec<Self::Item>>, result::Error> {
        use crate::data::models::schema::notifications::dsl::{
            created_at, notification_id, notifications,
        };

        let mut conn = connection().await?;

        match notifications
            .order((created_at.desc(), notification_id.desc()))
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
        use crate::data::models::schema::notifications::dsl::{notification_id, notifications};

        let mut conn = connection().await?;

        notifications
            .filter(notification_id.eq(id))
            .first::<Self::Item>(&mut conn)
            .await
            .optional()
    }

    async fn add<'a>(&self, item: Self::NewItem<'a>) -> Result<(), result::Error> {
        self.add_many(vec![item]).await?;
        Ok(())
    }

    async fn update<'a>(
        &self,
        id: Self::Id,
        item: Self::UpdateForm<'a>,
    ) -> Result<(), result::Error> {
        use crate::data::models::schema::notifications::dsl::{notification_id, notifications};

        let mut conn = connection().await?;

        diesel::update(notifications.filter(notification_id.eq(id)))
            .set(&item)
            .execute(&mut conn)
            .await?;

        Ok(())
    }

    async fn delete(&self, id: Self::Id) -> Result<(), result::Error> {
        self.delete_many(&[id]).await?;
        Ok(())
    }
}
