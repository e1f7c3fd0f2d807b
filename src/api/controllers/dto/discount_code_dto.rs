use crate::data::models::discount_code::DiscountType;
use crate::utils::mappers::deserialize_optional_datetime;
use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DiscountCodeDTO {
    pub id: i32,
    pub code: String,
    #[serde(rename = "type")]
    pub discount_type: DiscountType,
    pub value: BigDecimal,
    pub description: Option<String>,
    pub created_by: i32,
    pub department_id: Option<i32>,
    pub is_udd_official: bool,
    pub usage_limit: Option<i32>,
    pub usage_count: i32,
    pub minimum_order_amount: Option<BigDecimal>,
    pub valid_from: Option<String>,
    pub valid_until: Option<String>,
    pub is_active: bool,
    pub created_at: Option<String>,
}

/// Body of both create and update; `is_active` is only read on update.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct DiscountCodeRequest {
    pub code: String,
    #[serde(rename = "type")]
    pub discount_type: DiscountType,
    pub value: BigDecimal,
    pub description: Option<String>,
    pub department_id: Option<i32>,
    #[serde(default)]
    pub is_udd_official: bool,
    pub usage_limit: Option<i32>,
    pub minimum_order_amount: Option<BigDecimal>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub valid_from: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub valid_until: Option<NaiveDateTime>,
    pub is_active: Option<bool>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct DiscountCodeQuery {
    pub status: Option<String>,
    pub department_id: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DiscountCodeListResponse {
    pub discount_codes: Vec<DiscountCodeDTO>,
    pub total: usize,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ValidateDiscountRequest {
    pub code: String,
    pub order_amount: BigDecimal,
    pub department_id: i32,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CalculateDiscountRequest {
    pub code: Option<String>,
    pub order_amount: BigDecimal,
    pub department_id: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AppliedCodeDTO {
    pub id: i32,
    pub code: String,
    #[serde(rename = "type")]
    pub discount_type: DiscountType,
    pub value: BigDecimal,
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ValidateDiscountResponse {
    pub valid: bool,
    pub discount_code: AppliedCodeDTO,
    pub discount_amount: BigDecimal,
    pub final_amount: BigDecimal,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BreakdownDTO {
    pub original_amount: BigDecimal,
    pub discount_amount: BigDecimal,
    pub final_amount: BigDecimal,
    pub reservation_fee_amount: BigDecimal,
    pub remaining_balance: BigDecimal,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct GenerateCodeRequest {
    pub prefix: Option<String>,
    pub length: Option<usize>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DepartmentCodeCountDTO {
    pub department_id: i32,
    pub department_name: Option<String>,
    pub count: i64,
}

#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DiscountStatsDTO {
    pub total_codes: usize,
    pub active_codes: usize,
    pub expired_codes: usize,
    pub used_codes: usize,
    pub total_usage: i64,
    pub by_department: Option<Vec<DepartmentCodeCountDTO>>,
    pub udd_official_codes: Option<usize>,
}
