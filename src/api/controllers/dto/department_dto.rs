use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DepartmentDTO {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub logo_path: Option<String>,
    pub gcash_qr_image_path: Option<String>,
    pub users_count: Option<i64>,
    pub listings_count: Option<i64>,
}

/// Text fields of the multipart department form.
#[derive(Debug, Clone, Default)]
pub struct DepartmentForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub remove_gcash_qr_image: bool,
}
