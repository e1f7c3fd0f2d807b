use crate::data::models::discount_code::DiscountRejection;
use crate::data::repos::implementors::order_repo::OrderWriteError;
use crate::security::errors::{AccessDenied, AuthError};
use crate::services::pricing::PricingError;
use crate::storage::StorageError;
use diesel::result;

#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("User not found")]
    UserNotFound,
    #[error("The email has already been taken.")]
    EmailTaken,
    #[error("The selected department is invalid.")]
    DepartmentNotFound,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Protected(&'static str),
    #[error(transparent)]
    AccessDenied(#[from] AccessDenied),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("Database error: {0}")]
    Database(#[from] result::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum DepartmentServiceError {
    #[error("Department not found")]
    DepartmentNotFound,
    #[error("The name has already been taken.")]
    NameTaken,
    #[error("Cannot delete department with existing users or listings")]
    InUse { users: i64, listings: i64 },
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    AccessDenied(#[from] AccessDenied),
    #[error("Database error: {0}")]
    Database(#[from] result::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum CategoryServiceError {
    #[error("Database error: {0}")]
    Database(#[from] result::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ListingServiceError {
    #[error("Listing not found")]
    ListingNotFound,
    #[error("The selected category is invalid.")]
    CategoryNotFound,
    #[error("The selected department is invalid.")]
    DepartmentNotFound,
    #[error("Only superadmins can create listings for Official UDD Merch.")]
    OfficialMerchRestricted,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    AccessDenied(#[from] AccessDenied),
    #[error("Database error: {0}")]
    Database(#[from] result::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum OrderServiceError {
    #[error("Order not found")]
    OrderNotFound,
    #[error(transparent)]
    Pricing(#[from] PricingError),
    #[error("Insufficient stock for listing {0}")]
    StockChanged(i32),
    #[error("Order cannot be cancelled")]
    NotCancellable,
    #[error("Reservation fee has already been paid")]
    ReservationFeeAlreadyPaid,
    #[error("No payment receipt has been uploaded")]
    ReceiptMissing,
    #[error("{0}")]
    DiscountNotApplicable(String),
    #[error("Only completed orders can be rated")]
    NotRatable,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    AccessDenied(#[from] AccessDenied),
    #[error("Database error: {0}")]
    Database(#[from] result::Error),
}

impl From<OrderWriteError> for OrderServiceError {
    fn from(e: OrderWriteError) -> Self {
        match e {
            OrderWriteError::Database(e) => OrderServiceError::Database(e),
            OrderWriteError::InsufficientStock(listing_id) => {
                OrderServiceError::StockChanged(listing_id)
            }
            OrderWriteError::NotCancellable => OrderServiceError::NotCancellable,
            OrderWriteError::DiscountExhausted(_) => {
                OrderServiceError::DiscountNotApplicable(DiscountRejection::Invalid.to_string())
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DiscountCodeServiceError {
    #[error("Discount code not found")]
    DiscountCodeNotFound,
    #[error("Invalid or expired discount code")]
    InvalidCode,
    #[error(transparent)]
    Rejected(#[from] DiscountRejection),
    #[error("The code has already been taken.")]
    CodeTaken,
    #[error("Cannot delete discount code that has been used")]
    AlreadyUsed,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    AccessDenied(#[from] AccessDenied),
    #[error("Database error: {0}")]
    Database(#[from] result::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationServiceError {
    #[error("Notification not found")]
    NotificationNotFound,
    #[error("Database error: {0}")]
    Database(#[from] result::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ReservationServiceError {
    #[error("Listing is not available for reservation")]
    ListingUnavailable,
    #[error("{0}")]
    Validation(String),
    #[error("Database error: {0}")]
    Database(#[from] result::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum DashboardServiceError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    AccessDenied(#[from] AccessDenied),
    #[error("Database error: {0}")]
    Database(#[from] result::Error),
}

/// True for MySQL duplicate-key failures.
pub fn is_unique_violation(e: &result::Error) -> bool {
    matches!(
        e,
        result::Error::DatabaseError(result::DatabaseErrorKind::UniqueViolation, _)
    )
}
