pub mod category;
pub mod department;
pub mod discount_code;
pub mod listing;
pub mod listing_image;
pub mod listing_size_variant;
pub mod notification;
pub mod order;
pub mod order_item;
pub mod reservation;
pub mod roles;
pub mod schema;
pub mod user;
