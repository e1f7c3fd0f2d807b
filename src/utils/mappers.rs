use crate::api::controllers::dto::category_dto::CategoryDTO;
use crate::api::controllers::dto::department_dto::DepartmentDTO;
use crate::api::controllers::dto::discount_code_dto::{BreakdownDTO, DiscountCodeDTO};
use crate::api::controllers::dto::listing_dto::{ListingImageDTO, SizeVariantDTO};
use crate::api::controllers::dto::notification_dto::NotificationDTO;
use crate::api::controllers::dto::order_dto::OrderItemDTO;
use crate::api::controllers::dto::reservation_dto::ReservationDTO;
use crate::data::models::category::Category;
use crate::data::models::department::Department;
use crate::data::models::discount_code::DiscountCode;
use crate::data::models::listing_image::ListingImage;
use crate::data::models::listing_size_variant::ListingSizeVariant;
use crate::data::models::notification::Notification;
use crate::data::models::order_item::OrderItem;
use crate::data::models::reservation::Reservation;
use crate::services::pricing::Breakdown;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, de};

/// Raised when a varchar column holds a value outside its enum.
#[derive(Debug, thiserror::Error)]
#[error("unrecognised {kind} value: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Stores a string-backed enum in a `VARCHAR` column through its
/// `as_str` / `FromStr` pair.
macro_rules! varchar_enum {
    ($ty:ty) => {
        impl diesel::serialize::ToSql<diesel::sql_types::Text, diesel::mysql::Mysql> for $ty {
            fn to_sql<'b>(
                &'b self,
                out: &mut diesel::serialize::Output<'b, '_, diesel::mysql::Mysql>,
            ) -> diesel::serialize::Result {
                use std::io::Write;
                out.write_all(self.as_str().as_bytes())?;
                Ok(diesel::serialize::IsNull::No)
            }
        }

        impl diesel::deserialize::FromSql<diesel::sql_types::Text, diesel::mysql::Mysql> for $ty {
            fn from_sql(
                bytes: diesel::mysql::MysqlValue<'_>,
            ) -> diesel::deserialize::Result<Self> {
                let raw = std::str::from_utf8(bytes.as_bytes())?;
                Ok(raw.parse::<$ty>()?)
            }
        }

        impl serde::Serialize for $ty {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse::<$ty>().map_err(serde::de::Error::custom)
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use varchar_enum;

pub fn timestamp_string(dt: Option<NaiveDateTime>) -> Option<String> {
    dt.map(|dt| dt.format("%Y-%m-%dT%H:%M:%S").to_string())
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM[:SS]` and RFC 3339.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// serde `deserialize_with` helper for optional dates; blank strings are `None`.
pub fn deserialize_optional_datetime<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_datetime(&raw)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid date: {raw}"))),
    }
}

impl From<Category> for CategoryDTO {
    fn from(category: Category) -> Self {
        CategoryDTO {
            id: category.category_id,
            name: category.name,
        }
    }
}

impl From<Department> for DepartmentDTO {
    fn from(department: Department) -> Self {
        DepartmentDTO {
            id: department.department_id,
            name: department.name,
            description: department.description,
            logo_path: department.logo_path,
            gcash_qr_image_path: department.gcash_qr_image_path,
            users_count: None,
            listings_count: None,
        }
    }
}

impl From<ListingSizeVariant> for SizeVariantDTO {
    fn from(variant: ListingSizeVariant) -> Self {
        SizeVariantDTO {
            id: variant.variant_id,
            size: variant.size,
            stock_quantity: variant.stock_quantity,
        }
    }
}

impl From<ListingImage> for ListingImageDTO {
    fn from(image: ListingImage) -> Self {
        ListingImageDTO {
            id: image.image_id,
            image_path: image.image_path,
            sort_order: image.sort_order,
        }
    }
}

impl From<OrderItem> for OrderItemDTO {
    fn from(item: OrderItem) -> Self {
        OrderItemDTO {
            id: item.order_item_id,
            listing_id: item.listing_id,
            listing_title: None,
            quantity: item.quantity,
            size: item.size,
            price: item.price,
            subtotal: item.subtotal,
        }
    }
}

impl From<DiscountCode> for DiscountCodeDTO {
    fn from(code: DiscountCode) -> Self {
        DiscountCodeDTO {
            id: code.discount_code_id,
            code: code.code,
            discount_type: code.discount_type,
            value: code.value,
            description: code.description,
            created_by: code.created_by,
            department_id: code.department_id,
            is_udd_official: code.is_udd_official,
            usage_limit: code.usage_limit,
            usage_count: code.usage_count,
            minimum_order_amount: code.minimum_order_amount,
            valid_from: timestamp_string(code.valid_from),
            valid_until: timestamp_string(code.valid_until),
            is_active: code.is_active,
            created_at: timestamp_string(code.created_at),
        }
    }
}

impl From<Breakdown> for BreakdownDTO {
    fn from(b: Breakdown) -> Self {
        BreakdownDTO {
            original_amount: b.original_amount,
            discount_amount: b.discount_amount,
            final_amount: b.final_amount,
            reservation_fee_amount: b.reservation_fee_amount,
            remaining_balance: b.remaining_balance,
        }
    }
}

impl From<Notification> for NotificationDTO {
    fn from(notification: Notification) -> Self {
        NotificationDTO {
            id: notification.notification_id,
            notification_type: notification.notification_type,
            title: notification.title,
            message: notification.message,
            data: notification.data,
            is_read: notification.is_read,
            read_at: timestamp_string(notification.read_at),
            created_at: timestamp_string(notification.created_at),
        }
    }
}

impl From<Reservation> for ReservationDTO {
    fn from(reservation: Reservation) -> Self {
        ReservationDTO {
            id: reservation.reservation_id,
            listing_id: reservation.listing_id,
            department_id: reservation.department_id,
            quantity: reservation.quantity,
            size: reservation.size,
            status: reservation.status,
            notes: reservation.notes,
            email: reservation.email,
            reservation_date: timestamp_string(reservation.reservation_date),
            created_at: timestamp_string(reservation.created_at),
        }
    }
}
