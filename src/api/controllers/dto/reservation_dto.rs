use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CreateReservationRequest {
    pub listing_id: i32,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    pub size: Option<String>,
    pub notes: Option<String>,
    pub email: String,
}

fn default_quantity() -> i32 {
    1
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReservationDTO {
    pub id: i32,
    pub listing_id: i32,
    pub department_id: i32,
    pub quantity: i32,
    pub size: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    pub email: String,
    pub reservation_date: Option<String>,
    pub created_at: Option<String>,
}
