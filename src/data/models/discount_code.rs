use crate::data::models::schema::*;
use crate::data::models::user::User;
use crate::utils::mappers::{ParseEnumError, varchar_enum};
use crate::utils::money::round2;
use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDateTime;
use diesel::deserialize::FromSqlRow;
use diesel::expression::AsExpression;
use diesel::prelude::*;
use diesel::sql_types::Text;

#[derive(AsExpression, FromSqlRow, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[diesel(sql_type = Text)]
pub enum DiscountType {
    #[default]
    Percentage,
    Fixed,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "percentage",
            DiscountType::Fixed => "fixed",
        }
    }
}

impl std::str::FromStr for DiscountType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "percentage" => Ok(DiscountType::Percentage),
            "fixed" => Ok(DiscountType::Fixed),
            other => Err(ParseEnumError {
                kind: "discount type",
                value: other.to_string(),
            }),
        }
    }
}

varchar_enum!(DiscountType);

/// Why a code cannot be applied to a particular order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiscountRejection {
    #[error("Invalid or expired discount code")]
    Invalid,
    #[error("Minimum order amount of ₱{0} required")]
    BelowMinimum(BigDecimal),
    #[error("This discount code is not valid for this department")]
    WrongDepartment,
}

#[derive(Queryable, Selectable, Identifiable, Associations, PartialEq, Debug, Clone)]
#[diesel(table_name = discount_codes)]
#[diesel(primary_key(discount_code_id))]
#[diesel(belongs_to(User, foreign_key = created_by))]
#[diesel(check_for_backend(diesel::mysql::Mysql))]
pub struct DiscountCode {
    pub discount_code_id: i32,
    pub code: String,
    pub discount_type: DiscountType,
    pub value: BigDecimal,
    pub description: Option<String>,
    pub created_by: i32,
    pub department_id: Option<i32>,
    pub is_udd_official: bool,
    pub usage_limit: Option<i32>,
    pub usage_count: i32,
    pub minimum_order_amount: Option<BigDecimal>,
    pub valid_from: Option<NaiveDateTime>,
    pub valid_until: Option<NaiveDateTime>,
    pub is_active: bool,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl DiscountCode {
    /// Active, inside the validity window and under the usage limit.
    pub fn is_valid(&self, now: NaiveDateTime) -> bool {
        if !self.is_active {
            return false;
        }

        if self.valid_from.is_some_and(|from| from > now) {
            return false;
        }

        if self.valid_until.is_some_and(|until| until < now) {
            return false;
        }

        !self.is_exhausted()
    }

    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        self.valid_until.is_some_and(|until| until < now)
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self.usage_limit, Some(limit) if limit > 0 && self.usage_count >= limit)
    }

    pub fn check_order(
        &self,
        order_amount: &BigDecimal,
        department_id: i32,
        now: NaiveDateTime,
    ) -> Result<(), DiscountRejection> {
        if !self.is_valid(now) {
            return Err(DiscountRejection::Invalid);
        }

        if let Some(minimum) = self.minimum_order_amount.as_ref() {
            if *minimum > BigDecimal::zero() && order_amount < minimum {
                return Err(DiscountRejection::BelowMinimum(round2(minimum)));
            }
        }

        if self.department_id.is_some_and(|dept| dept != department_id) {
            return Err(DiscountRejection::WrongDepartment);
        }

        Ok(())
    }

    pub fn can_be_used_for_order(
        &self,
        order_amount: &BigDecimal,
        department_id: i32,
        now: NaiveDateTime,
    ) -> bool {
        self.check_order(order_amount, department_id, now).is_ok()
    }

    /// Discount for `order_amount`, rounded to cents and never above it.
    pub fn calculate_discount(&self, order_amount: &BigDecimal) -> BigDecimal {
        let raw = match self.discount_type {
            DiscountType::Percentage => order_amount * &self.value / BigDecimal::from(100),
            DiscountType::Fixed => self.value.clone().min(order_amount.clone()),
        };

        let discount = round2(&raw);
        if discount > *order_amount {
            round2(order_amount)
        } else if discount < BigDecimal::zero() {
            round2(&BigDecimal::zero())
        } else {
            discount
        }
    }

    pub fn can_be_created_by(user: &User, department_id: Option<i32>) -> bool {
        if user.is_superadmin() {
            return true;
        }

        if user.is_admin() {
            return department_id.is_none() || department_id == user.department_id;
        }

        false
    }

    pub fn can_be_edited_by(&self, user: &User) -> bool {
        if user.is_superadmin() {
            return true;
        }

        if user.is_admin() {
            return self.created_by == user.user_id
                || (self.department_id.is_some() && self.department_id == user.department_id);
        }

        false
    }

    /// Whether `user` may see this code in listings.
    pub fn is_visible_to(&self, user: &User) -> bool {
        if user.is_superadmin() {
            return true;
        }

        if user.is_admin() {
            return self.created_by == user.user_id
                || (self.department_id.is_some() && self.department_id == user.department_id);
        }

        self.department_id.is_none() || self.department_id == user.department_id
    }
}

#[derive(Insertable, PartialEq, Debug)]
#[diesel(table_name = discount_codes)]
pub struct NewDiscountCode<'a> {
    pub code: &'a str,
    pub discount_type: DiscountType,
    pub value: BigDecimal,
    pub description: Option<&'a str>,
    pub created_by: i32,
    pub department_id: Option<i32>,
    pub is_udd_official: bool,
    pub usage_limit: Option<i32>,
    pub minimum_order_amount: Option<BigDecimal>,
    pub valid_from: Option<NaiveDateTime>,
    pub valid_until: Option<NaiveDateTime>,
    pub is_active: bool,
}

#[derive(AsChangeset, PartialEq, Debug, Default)]
#[diesel(table_name = discount_codes)]
pub struct UpdateDiscountCode<'a> {
    pub code: Option<&'a str>,
    pub discount_type: Option<DiscountType>,
    pub value: Option<BigDecimal>,
    pub description: Option<Option<&'a str>>,
    pub department_id: Option<Option<i32>>,
    pub is_udd_official: Option<bool>,
    pub usage_limit: Option<Option<i32>>,
    pub minimum_order_amount: Option<Option<BigDecimal>>,
    pub valid_from: Option<Option<NaiveDateTime>>,
    pub valid_until: Option<Option<NaiveDateTime>>,
    pub is_active: Option<bool>,
}
