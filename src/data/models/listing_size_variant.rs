use crate::data::models::listing::Listing;
use crate::data::models::schema::*;
use diesel::prelude::*;

#[derive(Queryable, Selectable, Identifiable, Associations, PartialEq, Debug, Clone)]
#[diesel(table_name = listing_size_variants)]
#[diesel(primary_key(variant_id))]
#[diesel(belongs_to(Listing, foreign_key = listing_id))]
#[diesel(check_for_backend(diesel::mysql::Mysql))]
pub struct ListingSizeVariant {
    pub variant_id: i32,
    pub listing_id: i32,
    pub size: String,
    pub stock_quantity: i32,
    pub created_at: Option<chrono::NaiveDateTime>,
    pub updated_at: Option<chrono::NaiveDateTime>,
}

#[derive(Insertable, PartialEq, Debug, Clone)]
#[diesel(table_name = listing_size_variants)]
pub struct NewListingSizeVariant {
    pub listing_id: i32,
    pub size: String,
    pub stock_quantity: i32,
}

#[derive(AsChangeset, PartialEq, Debug)]
#[diesel(table_name = listing_size_variants)]
pub struct UpdateListingSizeVariant<'a> {
    pub size: Option<&'a str>,
    pub stock_quantity: Option<i32>,
}
