use crate::api::controllers::dto::discount_code_dto::{
    AppliedCodeDTO, BreakdownDTO, CalculateDiscountRequest, DiscountCodeDTO,
    DiscountCodeListResponse, DiscountCodeQuery, DiscountCodeRequest, GenerateCodeRequest,
    ValidateDiscountRequest, ValidateDiscountResponse,
};
use crate::api::errors::APIErrors;
use crate::api::extractors::AuthUser;
use crate::api::response::{MessageResponse, with_message};
use crate::data::models::discount_code::DiscountCode;
use crate::services::discount_code_service::{CodeFilter, DiscountCodeService};
use axum::Json;
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

fn list_response(codes: Vec<DiscountCode>) -> Json<DiscountCodeListResponse> {
    let discount_codes: Vec<DiscountCodeDTO> = codes.into_iter().map(DiscountCodeDTO::from).collect();

    Json(DiscountCodeListResponse {
        total: discount_codes.len(),
        discount_codes,
    })
}

pub async fn get_discount_codes(
    AuthUser(actor): AuthUser,
    Query(query): Query<DiscountCodeQuery>,
) -> Result<impl IntoResponse, APIErrors> {
    let codes = DiscountCodeService::new()
        .list(&actor, CodeFilter::parse(query.status.as_deref()), query.department_id)
        .await?;

    Ok(list_response(codes))
}

pub async fn get_all_discount_codes(AuthUser(actor): AuthUser) -> Result<impl IntoResponse, APIErrors> {
    let codes = DiscountCodeService::new().list_all(&actor).await?;

    Ok(list_response(codes))
}

pub async fn get_discount_code(
    AuthUser(actor): AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, APIErrors> {
    let code = DiscountCodeService::new().get(&actor, id).await?;

    Ok(Json(json!({ "discount_code": DiscountCodeDTO::from(code) })))
}

pub async fn create_discount_code(
    AuthUser(actor): AuthUser,
    Json(payload): Json<DiscountCodeRequest>,
) -> Result<Response, APIErrors> {
    let code = DiscountCodeService::new().create(&actor, payload).await?;

    Ok(with_message(
        StatusCode::CREATED,
        "Discount code created successfully",
        "discount_code",
        DiscountCodeDTO::from(code),
    ))
}

pub async fn update_discount_code(
    AuthUser(actor): AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<DiscountCodeRequest>,
) -> Result<Response, APIErrors> {
    let code = DiscountCodeService::new().update(&actor, id, payload).await?;

    Ok(with_message(
        StatusCode::OK,
        "Discount code updated successfully",
        "discount_code",
        DiscountCodeDTO::from(code),
    ))
}

pub async fn delete_discount_code(
    AuthUser(actor): AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, APIErrors> {
    DiscountCodeService::new().delete(&actor, id).await?;

    Ok(MessageResponse::new("Discount code deleted successfully"))
}

pub async fn discount_code_stats(AuthUser(actor): AuthUser) -> Result<impl IntoResponse, APIErrors> {
    let stats = DiscountCodeService::new().stats(&actor).await?;

    Ok(Json(json!({ "stats": stats })))
}

pub async fn generate_discount_code(
    AuthUser(actor): AuthUser,
    Json(payload): Json<GenerateCodeRequest>,
) -> Result<impl IntoResponse, APIErrors> {
    let code = DiscountCodeService::new()
        .generate(&actor, payload.prefix.as_deref(), payload.length)
        .await?;

    Ok(Json(json!({ "code": code })))
}

pub async fn validate_discount_code(
    AuthUser(_user): AuthUser,
    Json(payload): Json<ValidateDiscountRequest>,
) -> Result<impl IntoResponse, APIErrors> {
    let (code, totals) = DiscountCodeService::new()
        .validate(&payload.code, &payload.order_amount, payload.department_id)
        .await?;

    Ok(Json(ValidateDiscountResponse {
        valid: true,
        discount_code: AppliedCodeDTO {
            id: code.discount_code_id,
            code: code.code,
            discount_type: code.discount_type,
            value: code.value,
            description: code.description,
        },
        discount_amount: totals.discount_amount,
        final_amount: totals.final_amount,
        message: "Discount code is valid".to_string(),
    }))
}

pub async fn calculate_discount(
    AuthUser(_user): AuthUser,
    Json(payload): Json<CalculateDiscountRequest>,
) -> Result<impl IntoResponse, APIErrors> {
    let totals = DiscountCodeService::new()
        .calculate(payload.code.as_deref(), &payload.order_amount, payload.department_id)
        .await?;

    Ok(Json(BreakdownDTO::from(totals)))
}
