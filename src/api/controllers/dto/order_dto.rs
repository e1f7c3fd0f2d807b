use crate::api::controllers::dto::department_dto::DepartmentDTO;
use crate::api::controllers::dto::user_dto::UserSession;
use crate::data::models::order::OrderStatus;
use crate::utils::mappers::deserialize_optional_datetime;
use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItemRequest>,
    pub email: String,
    pub notes: Option<String>,
    pub discount_code: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OrderItemRequest {
    pub listing_id: i32,
    pub quantity: i32,
    pub size: Option<String>,
}

#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OrderDTO {
    pub id: i32,
    pub order_number: String,
    pub user_id: i32,
    pub email: String,
    pub department_id: i32,
    pub status: OrderStatus,
    pub status_display: String,
    pub original_amount: BigDecimal,
    pub discount_amount: BigDecimal,
    pub discount_percentage: BigDecimal,
    pub discount_code: Option<String>,
    pub total_amount: BigDecimal,
    pub reservation_fee_amount: BigDecimal,
    pub reservation_fee_paid: bool,
    pub remaining_balance: BigDecimal,
    pub payment_receipt_path: Option<String>,
    pub payment_method: String,
    pub pickup_date: Option<String>,
    pub notes: Option<String>,
    pub email_sent: bool,
    pub rating: Option<i32>,
    pub review: Option<String>,
    pub has_discount: bool,
    pub can_be_cancelled: bool,
    pub can_be_confirmed: bool,
    pub items: Vec<OrderItemDTO>,
    pub department: Option<DepartmentDTO>,
    pub user: Option<UserSession>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OrderItemDTO {
    pub id: i32,
    pub listing_id: i32,
    pub listing_title: Option<String>,
    pub quantity: i32,
    pub size: Option<String>,
    pub price: BigDecimal,
    pub subtotal: BigDecimal,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub pickup_date: Option<NaiveDateTime>,
    pub notes: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ApplyDiscountRequest {
    pub discount_code: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RateOrderRequest {
    pub rating: i32,
    pub review: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SalesReportQuery {
    pub department: Option<String>,
    pub date_range: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SalesSummaryDTO {
    pub total_sales: BigDecimal,
    pub total_orders: usize,
    pub average_order: BigDecimal,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DepartmentSalesDTO {
    pub department_id: i32,
    pub department_name: String,
    pub total_sales: BigDecimal,
    pub total_orders: usize,
    pub average_order: BigDecimal,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DailySalesDTO {
    pub date: String,
    pub total_sales: BigDecimal,
    pub total_orders: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SalesOrderRowDTO {
    pub id: i32,
    pub order_number: String,
    pub total_amount: BigDecimal,
    pub quantity: i32,
    pub created_at: Option<String>,
    pub department: String,
    pub listing_title: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SalesReportDTO {
    pub summary: SalesSummaryDTO,
    pub department_breakdown: Vec<DepartmentSalesDTO>,
    pub daily_sales: Vec<DailySalesDTO>,
    pub orders: Vec<SalesOrderRowDTO>,
}
