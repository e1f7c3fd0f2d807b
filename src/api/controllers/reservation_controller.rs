use crate::api::controllers::dto::reservation_dto::{CreateReservationRequest, ReservationDTO};
use crate::api::errors::APIErrors;
use crate::api::extractors::AuthUser;
use crate::api::response::with_message;
use crate::services::reservation_service::ReservationService;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

pub async fn create_reservation(
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateReservationRequest>,
) -> Result<Response, APIErrors> {
    let reservation = ReservationService::new().create(&user, payload).await?;

    Ok(with_message(
        StatusCode::CREATED,
        "Reservation created successfully",
        "reservation",
        ReservationDTO::from(reservation),
    ))
}

pub async fn get_reservations(AuthUser(user): AuthUser) -> Result<impl IntoResponse, APIErrors> {
    let reservations: Vec<ReservationDTO> = ReservationService::new()
        .list_own(&user)
        .await?
        .into_iter()
        .map(ReservationDTO::from)
        .collect();

    Ok(Json(json!({ "reservations": reservations })))
}
