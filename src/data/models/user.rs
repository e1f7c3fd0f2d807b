use crate::data::models::department::Department;
use crate::data::models::roles::UserRole;
use crate::data::models::schema::*;
use diesel::prelude::*;

#[derive(Queryable, Selectable, Identifiable, Associations, PartialEq, Debug, Clone)]
#[diesel(table_name = users)]
#[diesel(primary_key(user_id))]
#[diesel(belongs_to(Department, foreign_key = department_id))]
#[diesel(check_for_backend(diesel::mysql::Mysql))]
pub struct User {
    pub user_id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub department_id: Option<i32>,
    pub token_version: i32,
    pub created_at: Option<chrono::NaiveDateTime>,
    pub updated_at: Option<chrono::NaiveDateTime>,
}

impl User {
    pub fn is_superadmin(&self) -> bool {
        self.role == UserRole::SuperAdmin
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_student(&self) -> bool {
        self.role == UserRole::Student
    }

    /// Superadmins manage every department; admins only their own.
    pub fn can_manage_department(&self, department_id: i32) -> bool {
        match self.role {
            UserRole::SuperAdmin => true,
            UserRole::Admin => self.department_id == Some(department_id),
            UserRole::Student => false,
        }
    }
}

#[derive(Insertable, PartialEq, Debug)]
#[diesel(table_name = users)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: UserRole,
    pub department_id: Option<i32>,
}

#[derive(AsChangeset, PartialEq, Debug, Default)]
#[diesel(table_name = users)]
pub struct UpdateUser<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub password_hash: Option<&'a str>,
    pub role: Option<UserRole>,
    pub department_id: Option<Option<i32>>,
}
