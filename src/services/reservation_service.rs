use crate::api::controllers::dto::reservation_dto::CreateReservationRequest;
use crate::data::models::reservation::{NewReservation, RESERVATION_STATUS_PENDING, Reservation};
use crate::data::models::user::User;
use crate::data::repos::implementors::listing_repo::ListingRepo;
use crate::data::repos::implementors::reservation_repo::ReservationRepo;
use crate::data::repos::traits::repository::Repository;
use crate::services::errors::ReservationServiceError;
use crate::services::notification_service::NotificationService;
use crate::services::user_service::validate_email;

const MAX_NOTES_LENGTH: usize = 500;
const MAX_SIZE_LENGTH: usize = 10;

pub fn validate_reservation(req: &CreateReservationRequest) -> Result<(), ReservationServiceError> {
    if req.quantity < 1 {
        return Err(ReservationServiceError::Validation(
            "The quantity must be at least 1.".into(),
        ));
    }
    if req
        .size
        .as_deref()
        .is_some_and(|s| s.chars().count() > MAX_SIZE_LENGTH)
    {
        return Err(ReservationServiceError::Validation(
            "The size may not be greater than 10 characters.".into(),
        ));
    }
    if req
        .notes
        .as_deref()
        .is_some_and(|n| n.chars().count() > MAX_NOTES_LENGTH)
    {
        return Err(ReservationServiceError::Validation(
            "The notes may not be greater than 500 characters.".into(),
        ));
    }
    validate_email(&req.email).map_err(|e| ReservationServiceError::Validation(e.to_string()))
}

pub struct ReservationService {
    notifications: NotificationService,
}

impl ReservationService {
    pub fn new() -> Self {
        ReservationService {
            notifications: NotificationService::new(),
        }
    }

    /// Reserves an approved listing for `actor`; the department comes from the listing.
    pub async fn create(
        &self,
        actor: &User,
        req: CreateReservationRequest,
    ) -> Result<Reservation, ReservationServiceError> {
        validate_reservation(&req)?;

        let listing = ListingRepo::new()
            .get_by_id(req.listing_id)
            .await?
            .filter(|l| l.is_approved())
            .ok_or(ReservationServiceError::ListingUnavailable)?;

        let reservation = ReservationRepo::new()
            .create(NewReservation {
                user_id: actor.user_id,
                department_id: listing.department_id,
                listing_id: listing.listing_id,
                quantity: req.quantity,
                size: req.size.as_deref().map(str::trim).filter(|s| !s.is_empty()),
                reservation_date: Some(chrono::Utc::now().naive_utc()),
                status: RESERVATION_STATUS_PENDING,
                notes: req.notes.as_deref().map(str::trim).filter(|n| !n.is_empty()),
                email: req.email.trim(),
            })
            .await?;

        tracing::info!(
            reservation_id = reservation.reservation_id,
            listing_id = listing.listing_id,
            user_id = actor.user_id,
            "reservation created"
        );
        self.notifications
            .notify_reservation_created(&reservation, actor)
            .await;

        Ok(reservation)
    }

    pub async fn list_own(&self, actor: &User) -> Result<Vec<Reservation>, ReservationServiceError> {
        Ok(ReservationRepo::new().get_by_user(actor.user_id).await?)
    }
}

impl Default for ReservationService {
    fn default() -> Self {
        Self::new()
    }
}
