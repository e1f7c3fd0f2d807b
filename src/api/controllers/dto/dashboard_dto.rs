use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStatsDTO {
    pub total_users: i64,
    pub total_admins: i64,
    pub total_students: i64,
    pub total_listings: i64,
    pub pending_listings: i64,
    pub approved_listings: i64,
    pub total_orders: i64,
    pub pending_orders: i64,
    pub confirmed_orders: i64,
    pub ready_for_pickup_orders: i64,
    pub completed_orders: i64,
    pub cancelled_orders: i64,
    pub total_departments: i64,
    pub total_stock_value: BigDecimal,
}
