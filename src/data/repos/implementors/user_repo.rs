use crate::data::database::{connection, last_inserted_id};
use crate::data::models::roles::UserRole;
use crate::data::models::user::{NewUser, UpdateUser, User};
use crate::data::repos::traits::repository::Repository;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

pub struct UserRepo {}

impl UserRepo {
    pub fn new() -> Self {
        UserRepo {}
    }

    pub async fn get_by_email(&self, email_query: &str) -> Result<Option<User>, result::Error> {
        use crate::data::models::schema::users::dsl::{email, users};

        let mut conn = connection().await?;

        users
            .filter(email.eq(email_query))
            .first::<User>(&mut conn)
            .await
            .optional()
    }

    /// Inserts `item` and returns the stored row.
    pub async fn create<'a>(&self, item: NewUser<'a>) -> Result<User, result::Error> {
        use crate::data::models::schema::users::dsl::{user_id, users};

        let mut conn = connection().await?;

        conn.transaction(|connection| {
            async move {
                diesel::insert_into(users)
                    .values(&item)
                    .execute(connection)
                    .await?;
                let id = last_inserted_id(connection).await?;

                users.filter(user_id.eq(id)).first::<User>(connection).await
            }
            .scope_boxed()
        })
        .await
    }

    pub async fn get_by_ids(&self, ids: &[i32]) -> Result<Vec<User>, result::Error> {
        use crate::data::models::schema::users::dsl::{user_id, users};

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = connection().await?;

        users
            .filter(user_id.eq_any(ids))
            .load::<User>(&mut conn)
            .await
    }

    pub async fn get_by_role(&self, role_query: UserRole) -> Result<Vec<User>, result::Error> {
        use crate::data::models::schema::users::dsl::{name, role, users};

        let mut conn = connection().await?;

        users
            .filter(role.eq(role_query))
            .order(name.asc())
            .load::<User>(&mut conn)
            .await
    }

    pub async fn get_by_department(&self, dept_id: i32) -> Result<Vec<User>, result::Error> {
        use crate::data::models::schema::users::dsl::{department_id, name, users};

        let mut conn = connection().await?;

        users
            .filter(department_id.eq(dept_id))
            .order(name.asc())
            .load::<User>(&mut conn)
            .await
    }

    pub async fn get_admins_for_department(
        &self,
        dept_id: i32,
    ) -> Result<Vec<User>, result::Error> {
        use crate::data::models::schema::users::dsl::{department_id, role, users};

        let mut conn = connection().await?;

        users
            .filter(role.eq(UserRole::Admin))
            .filter(department_id.eq(dept_id))
            .load::<User>(&mut conn)
            .await
    }

    pub async fn count_by_role(&self, role_query: Option<UserRole>) -> Result<i64, result::Error> {
        use crate::data::models::schema::users::dsl::{role, users};

        let mut conn = connection().await?;

        match role_query {
            Some(r) => users.filter(role.eq(r)).count().get_result(&mut conn).await,
            None => users.count().get_result(&mut conn).await,
        }
    }

    /// Invalidates every token issued so far for the user.
    pub async fn bump_token_version(&self, id: i32) -> Result<(), result::Error> {
        use crate::data::models::schema::users::dsl::{token_version, user_id, users};

        let mut conn = connection().await?;

        diesel::update(users.filter(user_id.eq(id)))
            .set(token_version.eq(token_version + 1))
            .execute(&mut conn)
            .await?;

        Ok(())
    }
}

impl Default for UserRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Repository for UserRepo {
    type Id = i32;
    type Item = User;
    type NewItem<'a> = NewUser<'a>;
    type UpdateForm<'a> = UpdateUser<'a>;

    async fn get_all(&self) -> Result<Option<Vec<Self::Item>>, result::Error> {
        use crate::data::models::schema::users::dsl::{name, users};

        let mut conn = connection().await?;

        match users.order(name.asc()).load::<Self::Item>(&mut conn).await {
            Ok(value) if value.is_empty() => Ok(None),
            Ok(value) => Ok(Some(value)),
            Err(result::Error::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn get_by_id(&self, id: Self::Id) -> Result<Option<Self::Item>, result::Error> {
        use crate::data::models::schema::users::dsl::{user_id, users};

        let mut conn = connection().await?;

        match users
            .filter(user_id.eq(id))
            .first::<Self::Item>(&mut conn)
            .await
        {
            Ok(value) => Ok(Some(value)),
            Err(result::Error::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn add<'a>(&self, item: Self::NewItem<'a>) -> Result<(), result::Error> {
        use crate::data::models::schema::users::dsl::users;

        let mut conn = connection().await?;

        conn.transaction(|connection| {
            async move {
                diesel::insert_into(users)
                    .values(&item)
                    .execute(connection)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
    }

    async fn update<'a>(
        &self,
        id: Self::Id,
        item: Self::UpdateForm<'a>,
    ) -> Result<(), result::Error> {
        use crate::data::models::schema::users::dsl::{user_id, users};

        let mut conn = connection().await?;

        conn.transaction(|connection| {
            async move {
                diesel::update(users.filter(user_id.eq(id)))
                    .set(&item)
                    .execute(connection)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
    }

    async fn delete(&self, id: Self::Id) -> Result<(), result::Error> {
        use crate::data::models::schema::users::dsl::{user_id, users};

        let mut conn = connection().await?;

        diesel::delete(users.filter(user_id.eq(id)))
            .execute(&mut conn)
            .await?;

        Ok(())
    }
}
