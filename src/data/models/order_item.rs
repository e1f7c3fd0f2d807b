use crate::data::models::listing::Listing;
use crate::data::models::order::Order;
use crate::data::models::schema::*;
use bigdecimal::BigDecimal;
use diesel::prelude::*;

#[derive(Queryable, Selectable, Identifiable, Associations, PartialEq, Debug, Clone)]
#[diesel(table_name = order_items)]
#[diesel(primary_key(order_item_id))]
#[diesel(belongs_to(Order, foreign_key = order_id))]
#[diesel(belongs_to(Listing, foreign_key = listing_id))]
#[diesel(check_for_backend(diesel::mysql::Mysql))]
pub struct OrderItem {
    pub order_item_id: i32,
    pub order_id: i32,
    pub listing_id: i32,
    pub quantity: i32,
    pub size: Option<String>,
    pub price: BigDecimal,
    pub subtotal: BigDecimal,
    /// Set when stock was taken at order time; only those items give it back on cancel.
    pub stock_reserved: bool,
    /// Size variant the reserved stock came from; `None` means the listing's own counter.
    pub variant_id: Option<i32>,
    pub created_at: Option<chrono::NaiveDateTime>,
    pub updated_at: Option<chrono::NaiveDateTime>,
}

#[derive(Insertable, PartialEq, Debug, Clone)]
#[diesel(table_name = order_items)]
pub struct NewOrderItem {
    pub order_id: i32,
    pub listing_id: i32,
    pub quantity: i32,
    pub size: Option<String>,
    pub price: BigDecimal,
    pub subtotal: BigDecimal,
    pub stock_reserved: bool,
    pub variant_id: Option<i32>,
}
