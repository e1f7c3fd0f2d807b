use crate::api::controllers::dto::department_dto::{DepartmentDTO, DepartmentForm};
use crate::api::errors::APIErrors;
use crate::api::extractors::AuthUser;
use crate::api::multipart::MultipartForm;
use crate::api::response::{MessageResponse, with_message};
use crate::services::department_service::{DepartmentImages, DepartmentService};
use axum::Json;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

fn split_form(mut form: MultipartForm) -> (DepartmentForm, DepartmentImages) {
    let images = DepartmentImages {
        logo: form.take_file("logo"),
        gcash_qr_image: form.take_file("gcash_qr_image"),
    };

    let fields = DepartmentForm {
        name: form.text("name").map(str::to_string),
        description: form.text("description").map(str::to_string),
        remove_gcash_qr_image: form.flag("remove_gcash_qr_image"),
    };

    (fields, images)
}

/// Public directory: id, name and description only.
pub async fn get_departments() -> Result<impl IntoResponse, APIErrors> {
    let departments: Vec<DepartmentDTO> = DepartmentService::new()
        .list()
        .await?
        .into_iter()
        .map(|d| DepartmentDTO {
            logo_path: None,
            gcash_qr_image_path: None,
            ..DepartmentDTO::from(d)
        })
        .collect();

    Ok(Json(departments))
}

pub async fn get_admin_departments(AuthUser(actor): AuthUser) -> Result<impl IntoResponse, APIErrors> {
    let departments: Vec<DepartmentDTO> = DepartmentService::new()
        .list_with_counts(&actor)
        .await?
        .into_iter()
        .map(|(department, users, listings)| DepartmentDTO {
            users_count: Some(users),
            listings_count: Some(listings),
            ..DepartmentDTO::from(department)
        })
        .collect();

    Ok(Json(json!({ "departments": departments })))
}

pub async fn create_department(
    AuthUser(actor): AuthUser,
    form: MultipartForm,
) -> Result<Response, APIErrors> {
    let (fields, images) = split_form(form);
    let department = DepartmentService::new().create(&actor, fields, images).await?;

    Ok(with_message(
        StatusCode::CREATED,
        "Department created successfully",
        "department",
        DepartmentDTO::from(department),
    ))
}

pub async fn update_department(
    AuthUser(actor): AuthUser,
    Path(id): Path<i32>,
    form: MultipartForm,
) -> Result<Response, APIErrors> {
    let (fields, images) = split_form(form);
    let department = DepartmentService::new().update(&actor, id, fields, images).await?;

    Ok(with_message(
        StatusCode::OK,
        "Department updated successfully",
        "department",
        DepartmentDTO::from(department),
    ))
}

pub async fn delete_department(
    AuthUser(actor): AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, APIErrors> {
    DepartmentService::new().delete(&actor, id).await?;

    Ok(MessageResponse::new("Department deleted successfully"))
}
