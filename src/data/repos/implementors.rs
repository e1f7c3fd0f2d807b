pub mod category_repo;
pub mod department_repo;
pub mod discount_code_repo;
pub mod listing_repo;
pub mod notification_repo;
pub mod order_repo;
pub mod reservation_repo;
pub mod user_repo;
