use crate::api::controllers::dto::category_dto::CategoryDTO;
use crate::api::controllers::dto::department_dto::DepartmentDTO;
use crate::api::controllers::dto::user_dto::UserSession;
use crate::data::models::listing::ListingStatus;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ListingDTO {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub image_path: Option<String>,
    pub price: BigDecimal,
    pub size: Option<String>,
    pub status: ListingStatus,
    pub stock_quantity: i32,
    pub department_id: i32,
    pub category_id: i32,
    pub user_id: i32,
    pub category: Option<CategoryDTO>,
    pub user: Option<UserSession>,
    pub department: Option<DepartmentDTO>,
    pub size_variants: Vec<SizeVariantDTO>,
    pub images: Vec<ListingImageDTO>,
    pub total_stock: i32,
    pub has_multiple_sizes: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SizeVariantDTO {
    pub id: i32,
    pub size: String,
    pub stock_quantity: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ListingImageDTO {
    pub id: i32,
    pub image_path: String,
    pub sort_order: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SizeVariantInput {
    pub size: String,
    pub stock_quantity: i32,
}

/// Text fields of the multipart listing form.
#[derive(Debug, Clone)]
pub struct NewListingForm {
    pub title: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub size: Option<String>,
    pub category_id: i32,
    pub department_id: Option<i32>,
    pub status: Option<ListingStatus>,
    pub stock_quantity: i32,
    pub size_variants: Vec<SizeVariantInput>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct UpdateListingRequest {
    pub title: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub status: Option<ListingStatus>,
    pub stock_quantity: Option<i32>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct UpdateSizeVariantsRequest {
    pub size_variants: Vec<SizeVariantInput>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct UpdateStockRequest {
    pub stock_quantity: i32,
}
