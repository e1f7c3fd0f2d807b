use crate::api::controllers::dto::listing_dto::{
    NewListingForm, UpdateListingRequest, UpdateSizeVariantsRequest, UpdateStockRequest,
};
use crate::api::errors::APIErrors;
use crate::api::extractors::AuthUser;
use crate::api::multipart::MultipartForm;
use crate::api::response::{MessageResponse, with_message};
use crate::data::models::listing::{Listing, ListingStatus};
use crate::services::listing_service::{ListingService, parse_size_variants};
use axum::Json;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bigdecimal::BigDecimal;
use serde_json::json;

fn listing_form(form: &MultipartForm) -> Result<NewListingForm, APIErrors> {
    Ok(NewListingForm {
        title: form.required("title")?.to_string(),
        description: form.text("description").map(str::to_string),
        price: form
            .parsed::<BigDecimal>("price")?
            .ok_or_else(|| APIErrors::Unprocessable("The price field is required.".into()))?,
        size: form.text("size").map(str::to_string),
        category_id: form
            .parsed::<i32>("category_id")?
            .ok_or_else(|| APIErrors::Unprocessable("The category id field is required.".into()))?,
        department_id: form.parsed::<i32>("department_id")?,
        status: form.parsed::<ListingStatus>("status")?,
        stock_quantity: form.parsed::<i32>("stock_quantity")?.unwrap_or(1),
        size_variants: parse_size_variants(form.text("size_variants"))?,
    })
}

async fn listings_response(listings: Vec<Listing>) -> Result<impl IntoResponse, APIErrors> {
    let listings = ListingService::new().present(listings).await?;

    Ok(Json(json!({ "listings": listings })))
}

async fn listing_response(listing: Listing, message: &str, status: StatusCode) -> Result<Response, APIErrors> {
    let listing = ListingService::new().present_one(listing).await?;

    Ok(with_message(status, message, "listing", listing))
}

pub async fn create_listing(
    AuthUser(actor): AuthUser,
    mut form: MultipartForm,
) -> Result<Response, APIErrors> {
    let fields = listing_form(&form)?;
    let image = form.take_file("image");

    let listing = ListingService::new().create(&actor, fields, image).await?;

    listing_response(listing, "Listing created successfully", StatusCode::CREATED).await
}

/// Approved listings, visible without logging in.
pub async fn get_public_listings() -> Result<impl IntoResponse, APIErrors> {
    listings_response(ListingService::new().approved().await?).await
}

pub async fn get_listings(AuthUser(_user): AuthUser) -> Result<impl IntoResponse, APIErrors> {
    listings_response(ListingService::new().approved().await?).await
}

pub async fn get_user_listings(AuthUser(user): AuthUser) -> Result<impl IntoResponse, APIErrors> {
    listings_response(ListingService::new().for_user(&user).await?).await
}

pub async fn get_admin_listings(AuthUser(actor): AuthUser) -> Result<impl IntoResponse, APIErrors> {
    listings_response(ListingService::new().for_moderation(&actor).await?).await
}

pub async fn get_all_listings(AuthUser(actor): AuthUser) -> Result<impl IntoResponse, APIErrors> {
    listings_response(ListingService::new().all(&actor).await?).await
}

pub async fn get_department_listings(
    AuthUser(actor): AuthUser,
    Path(department_id): Path<i32>,
) -> Result<impl IntoResponse, APIErrors> {
    listings_response(ListingService::new().for_department(&actor, department_id).await?).await
}

pub async fn approve_listing(AuthUser(actor): AuthUser, Path(id): Path<i32>) -> Result<Response, APIErrors> {
    let listing = ListingService::new().approve(&actor, id).await?;

    listing_response(listing, "Listing approved successfully", StatusCode::OK).await
}

pub async fn reject_listing(AuthUser(actor): AuthUser, Path(id): Path<i32>) -> Result<Response, APIErrors> {
    let listing = ListingService::new().reject(&actor, id).await?;

    listing_response(listing, "Listing rejected successfully", StatusCode::OK).await
}

pub async fn update_listing(
    AuthUser(actor): AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateListingRequest>,
) -> Result<Response, APIErrors> {
    let listing = ListingService::new().update(&actor, id, payload).await?;

    listing_response(listing, "Listing updated successfully", StatusCode::OK).await
}

pub async fn update_size_variants(
    AuthUser(actor): AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateSizeVariantsRequest>,
) -> Result<Response, APIErrors> {
    let service = ListingService::new();

    service.replace_variants(&actor, id, payload.size_variants).await?;
    let listing = service.get(id).await?;

    listing_response(listing, "Size variants updated successfully", StatusCode::OK).await
}

pub async fn update_stock(
    AuthUser(actor): AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateStockRequest>,
) -> Result<Response, APIErrors> {
    let listing = ListingService::new()
        .update_stock(&actor, id, payload.stock_quantity)
        .await?;

    listing_response(listing, "Stock quantity updated successfully", StatusCode::OK).await
}

pub async fn delete_listing(
    AuthUser(actor): AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, APIErrors> {
    ListingService::new().delete(&actor, id).await?;

    Ok(MessageResponse::new("Listing deleted successfully"))
}
