use crate::api::controllers::dto::order_dto::{
    ApplyDiscountRequest, CreateOrderRequest, RateOrderRequest, SalesReportQuery,
    UpdateOrderStatusRequest,
};
use crate::api::errors::APIErrors;
use crate::api::extractors::AuthUser;
use crate::api::multipart::MultipartForm;
use crate::api::response::with_message;
use crate::data::models::order::Order;
use crate::services::dashboard_service::DashboardService;
use crate::services::order_service::OrderService;
use axum::Json;
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

async fn order_response(
    service: &OrderService,
    order: Order,
    with_customer: bool,
    message: &str,
    status: StatusCode,
) -> Result<Response, APIErrors> {
    let order = service.present_one(order, with_customer).await?;

    Ok(with_message(status, message, "order", order))
}

pub async fn create_order(
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<Response, APIErrors> {
    let service = OrderService::new();
    let order = service.create(&user, payload).await?;

    order_response(&service, order, false, "Order created successfully", StatusCode::CREATED).await
}

pub async fn get_orders(AuthUser(user): AuthUser) -> Result<impl IntoResponse, APIErrors> {
    let service = OrderService::new();
    let orders = service.list_own(&user).await?;
    let orders = service.present(orders, false).await?;

    Ok(Json(json!({ "orders": orders })))
}

pub async fn get_order(AuthUser(user): AuthUser, Path(id): Path<i32>) -> Result<impl IntoResponse, APIErrors> {
    let service = OrderService::new();
    let order = service.get_own(&user, id).await?;
    let order = service.present_one(order, false).await?;

    Ok(Json(json!({ "order": order })))
}

pub async fn cancel_order(AuthUser(user): AuthUser, Path(id): Path<i32>) -> Result<Response, APIErrors> {
    let service = OrderService::new();
    let order = service.cancel(&user, id).await?;

    order_response(&service, order, false, "Order cancelled successfully", StatusCode::OK).await
}

pub async fn upload_receipt(
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
    mut form: MultipartForm,
) -> Result<Response, APIErrors> {
    let receipt = form
        .take_file("receipt")
        .ok_or_else(|| APIErrors::Unprocessable("The receipt field is required.".into()))?;

    let service = OrderService::new();
    let order = service.upload_receipt(&user, id, receipt).await?;

    order_response(&service, order, false, "Receipt uploaded successfully", StatusCode::OK).await
}

pub async fn apply_discount(
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<ApplyDiscountRequest>,
) -> Result<Response, APIErrors> {
    let service = OrderService::new();
    let order = service.apply_discount(&user, id, &payload.discount_code).await?;

    order_response(&service, order, false, "Discount applied successfully", StatusCode::OK).await
}

pub async fn rate_order(
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<RateOrderRequest>,
) -> Result<Response, APIErrors> {
    let service = OrderService::new();
    let order = service.rate(&user, id, payload.rating, payload.review).await?;

    order_response(&service, order, false, "Rating submitted successfully", StatusCode::OK).await
}

pub async fn get_admin_orders(AuthUser(actor): AuthUser) -> Result<impl IntoResponse, APIErrors> {
    let service = OrderService::new();
    let orders = service.admin_list(&actor).await?;
    let orders = service.present(orders, true).await?;

    Ok(Json(json!({ "orders": orders })))
}

pub async fn update_order_status(
    AuthUser(actor): AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> Result<Response, APIErrors> {
    let service = OrderService::new();
    let order = service.update_status(&actor, id, payload).await?;

    order_response(&service, order, true, "Order status updated successfully", StatusCode::OK).await
}

pub async fn confirm_reservation_fee(
    AuthUser(actor): AuthUser,
    Path(id): Path<i32>,
) -> Result<Response, APIErrors> {
    let service = OrderService::new();
    let order = service.confirm_reservation_fee(&actor, id).await?;

    order_response(
        &service,
        order,
        true,
        "Reservation fee confirmed and order confirmed successfully",
        StatusCode::OK,
    )
    .await
}

pub async fn sales_report(
    AuthUser(actor): AuthUser,
    Query(query): Query<SalesReportQuery>,
) -> Result<impl IntoResponse, APIErrors> {
    let report = DashboardService::new().sales_report(&actor, &query).await?;

    Ok(Json(report))
}
