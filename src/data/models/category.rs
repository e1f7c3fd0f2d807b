use crate::data::models::schema::*;
use diesel::prelude::*;

#[derive(Queryable, Selectable, Identifiable, PartialEq, Debug, Clone)]
#[diesel(table_name = categories)]
#[diesel(primary_key(category_id))]
#[diesel(check_for_backend(diesel::mysql::Mysql))]
pub struct Category {
    pub category_id: i32,
    pub name: String,
    pub created_at: Option<chrono::NaiveDateTime>,
    pub updated_at: Option<chrono::NaiveDateTime>,
}

#[derive(Insertable, PartialEq, Debug)]
#[diesel(table_name = categories)]
pub struct NewCategory<'a> {
    pub name: &'a str,
}

#[derive(AsChangeset, PartialEq, Debug)]
#[diesel(table_name = categories)]
pub struct UpdateCategory<'a> {
    pub name: Option<&'a str>,
}
