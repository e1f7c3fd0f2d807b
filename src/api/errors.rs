use crate::security::errors::{AccessDenied, AuthError};
use crate::services::errors::{
    CategoryServiceError, DashboardServiceError, DepartmentServiceError, DiscountCodeServiceError,
    ListingServiceError, NotificationServiceError, OrderServiceError, ReservationServiceError,
    UserServiceError,
};
use crate::storage::StorageError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Errors surfaced to HTTP clients as `{ "message": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum APIErrors {
    #[error("{0}")]
    BadRequest(String),
    #[error("Unauthenticated.")]
    Unauthorized,
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unprocessable(String),
    #[error("Internal server error")]
    Internal,
}

impl APIErrors {
    pub fn status(&self) -> StatusCode {
        match self {
            APIErrors::BadRequest(_) => StatusCode::BAD_REQUEST,
            APIErrors::Unauthorized => StatusCode::UNAUTHORIZED,
            APIErrors::Forbidden(_) => StatusCode::FORBIDDEN,
            APIErrors::NotFound(_) => StatusCode::NOT_FOUND,
            APIErrors::Conflict(_) => StatusCode::CONFLICT,
            APIErrors::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            APIErrors::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn internal(source: &dyn std::fmt::Display) -> Self {
        tracing::error!(error = %source, "request failed");
        APIErrors::Internal
    }
}

impl IntoResponse for APIErrors {
    fn into_response(self) -> Response {
        let body = Json(json!({ "message": self.to_string() }));
        (self.status(), body).into_response()
    }
}

impl From<AccessDenied> for APIErrors {
    fn from(e: AccessDenied) -> Self {
        APIErrors::Forbidden(e.to_string())
    }
}

impl From<AuthError> for APIErrors {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::HashingError | AuthError::VerificationError | AuthError::TokenCreationError => {
                APIErrors::internal(&e)
            }
            _ => APIErrors::Unauthorized,
        }
    }
}

impl From<StorageError> for APIErrors {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::Io(_) => APIErrors::internal(&e),
            other => APIErrors::Unprocessable(other.to_string()),
        }
    }
}

impl From<diesel::result::Error> for APIErrors {
    fn from(e: diesel::result::Error) -> Self {
        APIErrors::internal(&e)
    }
}

impl From<UserServiceError> for APIErrors {
    fn from(e: UserServiceError) -> Self {
        match e {
            UserServiceError::UserNotFound => APIErrors::NotFound(e.to_string()),
            UserServiceError::InvalidCredentials => APIErrors::Unauthorized,
            UserServiceError::EmailTaken
            | UserServiceError::DepartmentNotFound
            | UserServiceError::Validation(_) => APIErrors::Unprocessable(e.to_string()),
            UserServiceError::Protected(_) => APIErrors::Forbidden(e.to_string()),
            UserServiceError::AccessDenied(e) => e.into(),
            UserServiceError::Auth(e) => e.into(),
            UserServiceError::Database(e) => e.into(),
        }
    }
}

impl From<DepartmentServiceError> for APIErrors {
    fn from(e: DepartmentServiceError) -> Self {
        match e {
            DepartmentServiceError::DepartmentNotFound => APIErrors::NotFound(e.to_string()),
            DepartmentServiceError::NameTaken
            | DepartmentServiceError::InUse { .. }
            | DepartmentServiceError::Validation(_) => APIErrors::Unprocessable(e.to_string()),
            DepartmentServiceError::Storage(e) => e.into(),
            DepartmentServiceError::AccessDenied(e) => e.into(),
            DepartmentServiceError::Database(e) => e.into(),
        }
    }
}

impl From<CategoryServiceError> for APIErrors {
    fn from(e: CategoryServiceError) -> Self {
        match e {
            CategoryServiceError::Database(e) => e.into(),
        }
    }
}

impl From<ListingServiceError> for APIErrors {
    fn from(e: ListingServiceError) -> Self {
        match e {
            ListingServiceError::ListingNotFound => APIErrors::NotFound(e.to_string()),
            ListingServiceError::OfficialMerchRestricted => APIErrors::Forbidden(e.to_string()),
            ListingServiceError::CategoryNotFound
            | ListingServiceError::DepartmentNotFound
            | ListingServiceError::Validation(_) => APIErrors::Unprocessable(e.to_string()),
            ListingServiceError::Storage(e) => e.into(),
            ListingServiceError::AccessDenied(e) => e.into(),
            ListingServiceError::Database(e) => e.into(),
        }
    }
}

impl From<OrderServiceError> for APIErrors {
    fn from(e: OrderServiceError) -> Self {
        match e {
            OrderServiceError::OrderNotFound => APIErrors::NotFound(e.to_string()),
            OrderServiceError::Pricing(_)
            | OrderServiceError::NotCancellable
            | OrderServiceError::ReservationFeeAlreadyPaid
            | OrderServiceError::ReceiptMissing
            | OrderServiceError::DiscountNotApplicable(_)
            | OrderServiceError::NotRatable => APIErrors::BadRequest(e.to_string()),
            OrderServiceError::StockChanged(_) => APIErrors::Conflict(e.to_string()),
            OrderServiceError::Validation(_) => APIErrors::Unprocessable(e.to_string()),
            OrderServiceError::Storage(e) => e.into(),
            OrderServiceError::AccessDenied(e) => e.into(),
            OrderServiceError::Database(e) => e.into(),
        }
    }
}

impl From<DiscountCodeServiceError> for APIErrors {
    fn from(e: DiscountCodeServiceError) -> Self {
        match e {
            DiscountCodeServiceError::DiscountCodeNotFound | DiscountCodeServiceError::InvalidCode => {
                APIErrors::NotFound(e.to_string())
            }
            DiscountCodeServiceError::Rejected(_)
            | DiscountCodeServiceError::CodeTaken
            | DiscountCodeServiceError::AlreadyUsed
            | DiscountCodeServiceError::Validation(_) => APIErrors::Unprocessable(e.to_string()),
            DiscountCodeServiceError::AccessDenied(e) => e.into(),
            DiscountCodeServiceError::Database(e) => e.into(),
        }
    }
}

impl From<NotificationServiceError> for APIErrors {
    fn from(e: NotificationServiceError) -> Self {
        match e {
            NotificationServiceError::NotificationNotFound => APIErrors::NotFound(e.to_string()),
            NotificationServiceError::Database(e) => e.into(),
        }
    }
}

impl From<ReservationServiceError> for APIErrors {
    fn from(e: ReservationServiceError) -> Self {
        match e {
            ReservationServiceError::ListingUnavailable | ReservationServiceError::Validation(_) => {
                APIErrors::Unprocessable(e.to_string())
            }
            ReservationServiceError::Database(e) => e.into(),
        }
    }
}

impl From<DashboardServiceError> for APIErrors {
    fn from(e: DashboardServiceError) -> Self {
        match e {
            DashboardServiceError::Validation(_) => APIErrors::Unprocessable(e.to_string()),
            DashboardServiceError::AccessDenied(e) => e.into(),
            DashboardServiceError::Database(e) => e.into(),
        }
    }
}
