use crate::data::models::department::Department;
use crate::data::models::schema::*;
use crate::data::models::user::User;
use crate::utils::mappers::{ParseEnumError, varchar_enum};
use crate::utils::money::{percentage_of, remaining_balance};
use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDateTime;
use diesel::deserialize::FromSqlRow;
use diesel::expression::AsExpression;
use diesel::prelude::*;
use diesel::sql_types::Text;
use rand::Rng;
use rand::distributions::Alphanumeric;

pub const PAYMENT_METHOD_CASH_ON_PICKUP: &str = "cash_on_pickup";

/// Order statuses for workflow management
#[derive(AsExpression, FromSqlRow, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[diesel(sql_type = Text)]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    ReadyForPickup,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::ReadyForPickup,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::ReadyForPickup => "ready_for_pickup",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::ReadyForPickup => "Ready for Pickup",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "ready_for_pickup" => Ok(OrderStatus::ReadyForPickup),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(ParseEnumError {
                kind: "order status",
                value: other.to_string(),
            }),
        }
    }
}

varchar_enum!(OrderStatus);

/// `ORD-YYYYMMDD-XXXXXX` with an uppercase alphanumeric suffix.
pub fn generate_order_number(now: NaiveDateTime) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(|c| (c as char).to_ascii_uppercase())
        .collect();

    format!("ORD-{}-{}", now.format("%Y%m%d"), suffix)
}

#[derive(Queryable, Selectable, Identifiable, Associations, PartialEq, Debug, Clone)]
#[diesel(table_name = orders)]
#[diesel(primary_key(order_id))]
#[diesel(belongs_to(User, foreign_key = user_id))]
#[diesel(belongs_to(Department, foreign_key = department_id))]
#[diesel(check_for_backend(diesel::mysql::Mysql))]
pub struct Order {
    pub order_id: i32,
    pub order_number: String,
    pub user_id: i32,
    pub email: String,
    pub department_id: i32,
    pub total_amount: BigDecimal,
    pub original_amount: BigDecimal,
    pub discount_code_id: Option<i32>,
    pub discount_amount: BigDecimal,
    pub reservation_fee_amount: BigDecimal,
    pub reservation_fee_paid: bool,
    pub payment_receipt_path: Option<String>,
    pub status: OrderStatus,
    pub pickup_date: Option<NaiveDateTime>,
    pub notes: Option<String>,
    pub payment_method: String,
    pub email_sent: bool,
    pub rating: Option<i32>,
    pub review: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl Order {
    pub fn status_display(&self) -> &'static str {
        self.status.display_name()
    }

    pub fn can_be_cancelled(&self) -> bool {
        matches!(self.status, OrderStatus::Pending | OrderStatus::Confirmed)
    }

    /// Ready for an admin to confirm: fee paid while still pending.
    pub fn can_be_confirmed(&self) -> bool {
        self.reservation_fee_paid && self.status == OrderStatus::Pending
    }

    pub fn has_discount(&self) -> bool {
        self.discount_code_id.is_some() && self.discount_amount > BigDecimal::zero()
    }

    pub fn discount_percentage(&self) -> BigDecimal {
        percentage_of(&self.discount_amount, &self.original_amount)
    }

    pub fn remaining_balance(&self) -> BigDecimal {
        remaining_balance(&self.total_amount, &self.reservation_fee_amount)
    }
}

#[derive(Insertable, PartialEq, Debug)]
#[diesel(table_name = orders)]
pub struct NewOrder<'a> {
    pub order_number: &'a str,
    pub user_id: i32,
    pub email: &'a str,
    pub department_id: i32,
    pub total_amount: BigDecimal,
    pub original_amount: BigDecimal,
    pub discount_code_id: Option<i32>,
    pub discount_amount: BigDecimal,
    pub reservation_fee_amount: BigDecimal,
    pub reservation_fee_paid: bool,
    pub status: OrderStatus,
    pub notes: Option<&'a str>,
    pub payment_method: &'a str,
}

#[derive(AsChangeset, PartialEq, Debug, Default)]
#[diesel(table_name = orders)]
pub struct UpdateOrder<'a> {
    pub total_amount: Option<BigDecimal>,
    pub discount_code_id: Option<Option<i32>>,
    pub discount_amount: Option<BigDecimal>,
    pub reservation_fee_amount: Option<BigDecimal>,
    pub reservation_fee_paid: Option<bool>,
    pub payment_receipt_path: Option<Option<&'a str>>,
    pub status: Option<OrderStatus>,
    pub pickup_date: Option<Option<NaiveDateTime>>,
    pub notes: Option<Option<&'a str>>,
    pub email_sent: Option<bool>,
    pub rating: Option<Option<i32>>,
    pub review: Option<Option<&'a str>>,
}
