use crate::data::models::listing::Listing;
use crate::data::models::schema::*;
use diesel::prelude::*;

#[derive(Queryable, Selectable, Identifiable, Associations, PartialEq, Debug, Clone)]
#[diesel(table_name = listing_images)]
#[diesel(primary_key(image_id))]
#[diesel(belongs_to(Listing, foreign_key = listing_id))]
#[diesel(check_for_backend(diesel::mysql::Mysql))]
pub struct ListingImage {
    pub image_id: i32,
    pub listing_id: i32,
    pub image_path: String,
    pub sort_order: i32,
    pub created_at: Option<chrono::NaiveDateTime>,
    pub updated_at: Option<chrono::NaiveDateTime>,
}

#[derive(Insertable, PartialEq, Debug)]
#[diesel(table_name = listing_images)]
pub struct NewListingImage<'a> {
    pub listing_id: i32,
    pub image_path: &'a str,
    pub sort_order: i32,
}
