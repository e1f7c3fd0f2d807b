use crate::data::models::schema::*;
use diesel::prelude::*;

/// Department reserved for university-wide merchandise; only superadmins may list under it.
pub const OFFICIAL_MERCH_DEPARTMENT: &str = "Official UDD Merch";

#[derive(Queryable, Selectable, Identifiable, PartialEq, Debug, Clone)]
#[diesel(table_name = departments)]
#[diesel(primary_key(department_id))]
#[diesel(check_for_backend(diesel::mysql::Mysql))]
pub struct Department {
    pub department_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub logo_path: Option<String>,
    pub gcash_qr_image_path: Option<String>,
    pub created_at: Option<chrono::NaiveDateTime>,
    pub updated_at: Option<chrono::NaiveDateTime>,
}

impl Department {
    pub fn is_official_merch(&self) -> bool {
        self.name == OFFICIAL_MERCH_DEPARTMENT
    }
}

#[derive(Insertable, PartialEq, Debug)]
#[diesel(table_name = departments)]
pub struct NewDepartment<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub logo_path: Option<&'a str>,
    pub gcash_qr_image_path: Option<&'a str>,
}

#[derive(AsChangeset, PartialEq, Debug, Default)]
#[diesel(table_name = departments)]
pub struct UpdateDepartment<'a> {
    pub name: Option<&'a str>,
    pub description: Option<Option<&'a str>>,
    pub logo_path: Option<Option<&'a str>>,
    pub gcash_qr_image_path: Option<Option<&'a str>>,
}
