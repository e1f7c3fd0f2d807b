pub mod category_service;
pub mod dashboard_service;
pub mod department_service;
pub mod discount_code_service;
pub mod errors;
pub mod listing_service;
pub mod mail_service;
pub mod notification_service;
pub mod order_service;
pub mod pricing;
pub mod reservation_service;
pub mod user_service;
