use crate::data::models::category::Category;
use crate::data::models::department::Department;
use crate::data::models::schema::*;
use crate::data::models::user::User;
use crate::utils::mappers::{ParseEnumError, varchar_enum};
use bigdecimal::BigDecimal;
use diesel::deserialize::FromSqlRow;
use diesel::expression::AsExpression;
use diesel::prelude::*;
use diesel::sql_types::Text;

#[derive(AsExpression, FromSqlRow, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[diesel(sql_type = Text)]
pub enum ListingStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Pending => "pending",
            ListingStatus::Approved => "approved",
            ListingStatus::Rejected => "rejected",
        }
    }
}

impl std::str::FromStr for ListingStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ListingStatus::Pending),
            "approved" => Ok(ListingStatus::Approved),
            "rejected" => Ok(ListingStatus::Rejected),
            other => Err(ParseEnumError {
                kind: "listing status",
                value: other.to_string(),
            }),
        }
    }
}

varchar_enum!(ListingStatus);

#[derive(Queryable, Selectable, Identifiable, Associations, PartialEq, Debug, Clone)]
#[diesel(table_name = listings)]
#[diesel(primary_key(listing_id))]
#[diesel(belongs_to(Department, foreign_key = department_id))]
#[diesel(belongs_to(Category, foreign_key = category_id))]
#[diesel(belongs_to(User, foreign_key = user_id))]
#[diesel(check_for_backend(diesel::mysql::Mysql))]
pub struct Listing {
    pub listing_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub image_path: Option<String>,
    pub department_id: i32,
    pub category_id: i32,
    pub user_id: i32,
    pub price: BigDecimal,
    pub size: Option<String>,
    pub status: ListingStatus,
    pub stock_quantity: i32,
    pub created_at: Option<chrono::NaiveDateTime>,
    pub updated_at: Option<chrono::NaiveDateTime>,
}

impl Listing {
    pub fn is_approved(&self) -> bool {
        self.status == ListingStatus::Approved
    }
}

#[derive(Insertable, PartialEq, Debug)]
#[diesel(table_name = listings)]
pub struct NewListing<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub image_path: Option<&'a str>,
    pub department_id: i32,
    pub category_id: i32,
    pub user_id: i32,
    pub price: BigDecimal,
    pub size: Option<&'a str>,
    pub status: ListingStatus,
    pub stock_quantity: i32,
}

#[derive(AsChangeset, PartialEq, Debug, Default)]
#[diesel(table_name = listings)]
pub struct UpdateListing<'a> {
    pub title: Option<&'a str>,
    pub description: Option<Option<&'a str>>,
    pub image_path: Option<Option<&'a str>>,
    pub price: Option<BigDecimal>,
    pub size: Option<Option<&'a str>>,
    pub status: Option<ListingStatus>,
    pub stock_quantity: Option<i32>,
}
