pub mod category_dto;
pub mod dashboard_dto;
pub mod department_dto;
pub mod discount_code_dto;
pub mod listing_dto;
pub mod notification_dto;
pub mod order_dto;
pub mod reservation_dto;
pub mod user_dto;
