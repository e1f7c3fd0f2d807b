use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CategoryDTO {
    pub id: i32,
    pub name: String,
}
