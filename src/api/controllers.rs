pub mod auth_controller;
pub mod category_controller;
pub mod dashboard_controller;
pub mod department_controller;
pub mod discount_code_controller;
pub mod dto;
pub mod listing_controller;
pub mod notification_controller;
pub mod order_controller;
pub mod reservation_controller;
pub mod user_controller;
