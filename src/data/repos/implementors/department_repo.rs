use crate::data::database::{connection, last_inserted_id};
use crate::data::models::department::{Department, NewDepartment, UpdateDepartment};
use crate::data::repos::traits::repository::Repository;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

pub struct DepartmentRepo {}

impl DepartmentRepo {
    pub fn new() -> Self {
        DepartmentRepo {}
    }

    pub async fn get_by_name(&self, name_query: &str) -> Result<Option<Department>, result::Error> {
        use crate::data::models::schema::departments::dsl::{departments, name};

        let mut conn = connection().await?;

        departments
            .filter(name.eq(name_query))
            .first::<Department>(&mut conn)
            .await
            .optional()
    }

    pub async fn create<'a>(&self, item: NewDepartment<'a>) -> Result<Department, result::Error> {
        use crate::data::models::schema::departments::dsl::{department_id, departments};

        let mut conn = connection().await?;

        conn.transaction(|connection| {
            async move {
                diesel::insert_into(departments)
                    .values(&item)
                    .execute(connection)
                    .await?;
                let id = last_inserted_id(connection).await?;

                departments
                    .filter(department_id.eq(id))
                    .first::<Department>(connection)
                    .await
            }
            .scope_boxed()
        })
        .await
    }

    /// `(users, listings)` still attached to the department.
    pub async fn usage_counts(&self, id: i32) -> Result<(i64, i64), result::Error> {
        use crate::data::models::schema::{listings, users};

        let mut conn = connection().await?;

        let user_count: i64 = users::table
            .filter(users::department_id.eq(id))
            .count()
            .get_result(&mut conn)
            .await?;
        let listing_count: i64 = listings::table
            .filter(listings::department_id.eq(id))
            .count()
            .get_result(&mut conn)
            .await?;

        Ok((user_count, listing_count))
    }

    pub async fn count(&self) -> Result<i64, result::Error> {
        use crate::data::models::schema::departments::dsl::departments;

        let mut conn = connection().await?;

        departments.count().get_result(&mut conn).await
    }
}

impl Default for DepartmentRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Repository for DepartmentRepo {
    type Id = i32;
    type Item = Department;
    type NewItem<'a> = NewDepartment<'a>;
    type UpdateForm<'a> = UpdateDepartment<'a>;

    async fn get_all(&self) -> Result<Option<Vec<Self::Item>>, result::Error> {
        use crate::data::models::schema::departments::dsl::{departments, name};

        let mut conn = connection().await?;

        match departments
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
        use crate::data::models::schema::departments::dsl::{department_id, departments};

        let mut conn = connection().await?;

        departments
            .filter(department_id.eq(id))
            .first::<Self::Item>(&mut conn)
            .await
            .optional()
    }

    async fn add<'a>(&self, item: Self::NewItem<'a>) -> Result<(), result::Error> {
        use crate::data::models::schema::departments::dsl::departments;

        let mut conn = connection().await?;

        diesel::insert_into(departments)
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
        use crate::data::models::schema::departments::dsl::{department_id, departments};

        let mut conn = connection().await?;

        diesel::update(departments.filter(department_id.eq(id)))
            .set(&item)
            .execute(&mut conn)
            .await?;

        Ok(())
    }

    async fn delete(&self, id: Self::Id) -> Result<(), result::Error> {
        use crate::data::models::schema::departments::dsl::{department_id, departments};

        let mut conn = connection().await?;

        diesel::delete(departments.filter(department_id.eq(id)))
            .execute(&mut conn)
            .await?;

        Ok(())
    }
}
