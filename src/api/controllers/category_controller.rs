use crate::api::controllers::dto::category_dto::CategoryDTO;
use crate::api::errors::APIErrors;
use crate::api::extractors::AuthUser;
use crate::services::category_service::CategoryService;
use axum::Json;
use axum::response::IntoResponse;

pub async fn get_categories(AuthUser(_user): AuthUser) -> Result<impl IntoResponse, APIErrors> {
    let categories: Vec<CategoryDTO> = CategoryService::new()
        .list()
        .await?
        .into_iter()
        .map(CategoryDTO::from)
        .collect();

    Ok(Json(categories))
}
