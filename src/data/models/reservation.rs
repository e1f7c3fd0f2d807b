use crate::data::models::listing::Listing;
use crate::data::models::schema::*;
use crate::data::models::user::User;
use chrono::NaiveDateTime;
use diesel::prelude::*;

pub const RESERVATION_STATUS_PENDING: &str = "pending";

#[derive(Queryable, Selectable, Identifiable, Associations, PartialEq, Debug, Clone)]
#[diesel(table_name = reservations)]
#[diesel(primary_key(reservation_id))]
#[diesel(belongs_to(User, foreign_key = user_id))]
#[diesel(belongs_to(Listing, foreign_key = listing_id))]
#[diesel(check_for_backend(diesel::mysql::Mysql))]
pub struct Reservation {
    pub reservation_id: i32,
    pub user_id: i32,
    pub department_id: i32,
    pub listing_id: i32,
    pub quantity: i32,
    pub size: Option<String>,
    pub reservation_date: Option<NaiveDateTime>,
    pub status: String,
    pub notes: Option<String>,
    pub email: String,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Insertable, PartialEq, Debug)]
#[diesel(table_name = reservations)]
pub struct NewReservation<'a> {
    pub user_id: i32,
    pub department_id: i32,
    pub listing_id: i32,
    pub quantity: i32,
    pub size: Option<&'a str>,
    pub reservation_date: Option<NaiveDateTime>,
    pub status: &'a str,
    pub notes: Option<&'a str>,
    pub email: &'a str,
}

#[derive(AsChangeset, PartialEq, Debug)]
#[diesel(table_name = reservations)]
pub struct UpdateReservation<'a> {
    pub status: Option<&'a str>,
    pub notes: Option<Option<&'a str>>,
}
