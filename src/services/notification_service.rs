use crate::data::models::notification::{NewNotification, Notification, NotificationType};
use crate::data::models::order::{Order, OrderStatus};
use crate::data::models::reservation::Reservation;
use crate::data::models::roles::UserRole;
use crate::data::models::user::User;
use crate::data::repos::implementors::notification_repo::NotificationRepo;
use crate::data::repos::implementors::user_repo::UserRepo;
use crate::services::errors::NotificationServiceError;
use serde_json::json;

pub const DEFAULT_LIST_LIMIT: i64 = 50;
const MAX_LIST_LIMIT: i64 = 200;

/// Text shown to the customer when their order moves to `status`.
pub fn status_message(status: OrderStatus) -> String {
    match status {
        OrderStatus::Confirmed => "Your order has been confirmed and is being processed".to_string(),
        OrderStatus::ReadyForPickup => "Your order is ready for pickup!".to_string(),
        OrderStatus::Completed => "Your order has been completed".to_string(),
        OrderStatus::Cancelled => "Your order has been cancelled".to_string(),
        other => format!("Your order status has been updated to {}", other.as_str()),
    }
}

/// Staff who receive an event: every superadmin plus the admins of the
/// event's department.
#[derive(Debug, Clone, Copy, Default)]
pub struct Recipients<'a> {
    pub superadmins: &'a [User],
    pub admins: &'a [User],
}

struct Audience<'a> {
    kind: NotificationType,
    department_id: i32,
    data: Option<serde_json::Value>,
    superadmin: (&'a str, String),
    admins: (&'a str, String),
    customer: Option<(&'a User, &'a str, String)>,
}

impl Audience<'_> {
    /// One row per recipient, each owned by that recipient.
    fn into_rows(self, recipients: Recipients<'_>) -> Vec<NewNotification> {
        let staff_row = |user: &User, role: UserRole, title: &str, message: &str| NewNotification {
            notification_type: self.kind,
            title: title.to_string(),
            message: message.to_string(),
            data: self.data.clone(),
            user_id: Some(user.user_id),
            user_role: Some(role),
            department_id: Some(self.department_id),
        };

        let mut rows: Vec<NewNotification> = recipients
            .superadmins
            .iter()
            .map(|user| staff_row(user, UserRole::SuperAdmin, self.superadmin.0, &self.superadmin.1))
            .chain(
                recipients
                    .admins
                    .iter()
                    .map(|user| staff_row(user, UserRole::Admin, self.admins.0, &self.admins.1)),
            )
            .collect();

        if let Some((user, title, message)) = self.customer {
            rows.push(NewNotification {
                notification_type: self.kind,
                title: title.to_string(),
                message,
                data: self.data,
                user_id: Some(user.user_id),
                user_role: None,
                department_id: None,
            });
        }

        rows
    }
}

fn order_data(order: &Order, customer_name: &str) -> serde_json::Value {
    json!({
        "order_id": order.order_id,
        "order_number": order.order_number,
        "department_id": order.department_id,
        "user_name": customer_name,
    })
}

pub fn order_created_rows(
    order: &Order,
    customer: &User,
    department_name: &str,
    recipients: Recipients<'_>,
) -> Vec<NewNotification> {
    Audience {
        kind: NotificationType::OrderCreated,
        department_id: order.department_id,
        data: Some(order_data(order, &customer.name)),
        superadmin: (
            "New Order Created",
            format!(
                "New order #{} has been created by {}",
                order.order_number, customer.name
            ),
        ),
        admins: (
            "New Order in Your Department",
            format!(
                "New order #{} has been created in {} department",
                order.order_number, department_name
            ),
        ),
        customer: Some((
            customer,
            "Order Confirmation",
            format!(
                "Your order #{} has been successfully created and is pending confirmation",
                order.order_number
            ),
        )),
    }
    .into_rows(recipients)
}

pub fn status_changed_rows(
    order: &Order,
    customer: &User,
    department_name: &str,
    old: OrderStatus,
    new: OrderStatus,
    recipients: Recipients<'_>,
) -> Vec<NewNotification> {
    Audience {
        kind: NotificationType::OrderStatusChanged,
        department_id: order.department_id,
        data: Some(order_data(order, &customer.name)),
        superadmin: (
            "Order Status Changed",
            format!(
                "Order #{} status changed from {} to {}",
                order.order_number, old, new
            ),
        ),
        admins: (
            "Order Status Changed in Your Department",
            format!(
                "Order #{} in {} status changed from {} to {}",
                order.order_number, department_name, old, new
            ),
        ),
        customer: Some((
            customer,
            "Order Status Update",
            format!("Order #{}: {}", order.order_number, status_message(new)),
        )),
    }
    .into_rows(recipients)
}

pub fn receipt_uploaded_rows(
    order: &Order,
    customer: &User,
    department_name: &str,
    recipients: Recipients<'_>,
) -> Vec<NewNotification> {
    Audience {
        kind: NotificationType::ReceiptUploaded,
        department_id: order.department_id,
        data: Some(order_data(order, &customer.name)),
        superadmin: (
            "Payment Receipt Uploaded",
            format!(
                "Payment receipt has been uploaded for order #{} by {}",
                order.order_number, customer.name
            ),
        ),
        admins: (
            "Payment Receipt Uploaded in Your Department",
            format!(
                "Payment receipt has been uploaded for order #{} in {} department",
                order.order_number, department_name
            ),
        ),
        customer: None,
    }
    .into_rows(recipients)
}

pub fn reservation_created_rows(
    reservation: &Reservation,
    customer: &User,
    recipients: Recipients<'_>,
) -> Vec<NewNotification> {
    Audience {
        kind: NotificationType::ReservationCreated,
        department_id: reservation.department_id,
        data: Some(json!({
            "reservation_id": reservation.reservation_id,
            "listing_id": reservation.listing_id,
            "department_id": reservation.department_id,
            "user_name": customer.name,
        })),
        superadmin: ("New Reservation Created", "New reservation has been created".to_string()),
        admins: (
            "New Reservation in Your Department",
            "New reservation has been created in your department".to_string(),
        ),
        customer: Some((
            customer,
            "Reservation Confirmation",
            "Your reservation has been successfully created and is pending confirmation".to_string(),
        )),
    }
    .into_rows(recipients)
}

pub struct NotificationService;

impl NotificationService {
    pub fn new() -> Self {
        NotificationService
    }

    /// Superadmins and the admins of `department_id`.
    async fn staff_for(&self, department_id: i32) -> Result<(Vec<User>, Vec<User>), diesel::result::Error> {
        let users = UserRepo::new();

        let superadmins = users.get_by_role(UserRole::SuperAdmin).await?;
        let admins = users.get_admins_for_department(department_id).await?;

        Ok((superadmins, admins))
    }

    /// Resolves the staff of `department_id`, builds the rows and stores
    /// them. A failure is logged and never reaches the caller.
    async fn fan_out<F>(&self, event: &'static str, department_id: i32, build: F)
    where
        F: FnOnce(Recipients<'_>) -> Vec<NewNotification>,
    {
        let (superadmins, admins) = match self.staff_for(department_id).await {
            Ok(staff) => staff,
            Err(e) => {
                tracing::error!(event, error = %e, "failed to resolve notification recipients");
                return;
            }
        };

        let rows = build(Recipients {
            superadmins: &superadmins,
            admins: &admins,
        });

        match NotificationRepo::new().add_many(rows).await {
            Ok(count) => tracing::debug!(event, count, "notifications stored"),
            Err(e) => tracing::error!(event, error = %e, "failed to store notifications"),
        }
    }

    pub async fn notify_order_created(&self, order: &Order, customer: &User, department_name: &str) {
        self.fan_out("order_created", order.department_id, |recipients| {
            order_created_rows(order, customer, department_name, recipients)
        })
        .await;
    }

    pub async fn notify_order_status_changed(
        &self,
        order: &Order,
        customer: &User,
        department_name: &str,
        old: OrderStatus,
        new: OrderStatus,
    ) {
        self.fan_out("order_status_changed", order.department_id, |recipients| {
            status_changed_rows(order, customer, department_name, old, new, recipients)
        })
        .await;
    }

    pub async fn notify_receipt_uploaded(&self, order: &Order, customer: &User, department_name: &str) {
        self.fan_out("receipt_uploaded", order.department_id, |recipients| {
            receipt_uploaded_rows(order, customer, department_name, recipients)
        })
        .await;
    }

    pub async fn notify_reservation_created(&self, reservation: &Reservation, customer: &User) {
        self.fan_out("reservation_created", reservation.department_id, |recipients| {
            reservation_created_rows(reservation, customer, recipients)
        })
        .await;
    }

    /// Newest notifications of `viewer` plus their unread count.
    pub async fn list(
        &self,
        viewer: &User,
        limit: Option<i64>,
    ) -> Result<(Vec<Notification>, i64), NotificationServiceError> {
        let repo = NotificationRepo::new();
        let limit = limit
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .min(MAX_LIST_LIMIT);

        let notifications = repo.get_for_user(viewer, limit).await?;
        let unread = repo.count_unread(viewer).await?;

        Ok((notifications, unread))
    }

    pub async fn unread_count(&self, viewer: &User) -> Result<i64, NotificationServiceError> {
        Ok(NotificationRepo::new().count_unread(viewer).await?)
    }

    /// Marks the given (or, when empty, all) of the viewer's notifications as read.
    pub async fn mark_read(
        &self,
        viewer: &User,
        ids: Option<Vec<i32>>,
    ) -> Result<usize, NotificationServiceError> {
        let repo = NotificationRepo::new();
        let candidates = ids.filter(|ids| !ids.is_empty());

        let owned = repo.owned_ids(viewer, candidates.as_deref()).await?;
        Ok(repo.mark_read(&owned).await?)
    }

    pub async fn mark_one_read(&self, viewer: &User, id: i32) -> Result<(), NotificationServiceError> {
        let repo = NotificationRepo::new();

        let owned = repo.owned_ids(viewer, Some(std::slice::from_ref(&id))).await?;
        if owned.is_empty() {
            return Err(NotificationServiceError::NotificationNotFound);
        }

        repo.mark_read(&owned).await?;
        Ok(())
    }

    pub async fn delete(&self, viewer: &User, id: i32) -> Result<(), NotificationServiceError> {
        let repo = NotificationRepo::new();

        let owned = repo.owned_ids(viewer, Some(std::slice::from_ref(&id))).await?;
        if owned.is_empty() {
            return Err(NotificationServiceError::NotificationNotFound);
        }

        repo.delete_many(&owned).await?;
        Ok(())
    }

    pub async fn delete_all(&self, viewer: &User) -> Result<usize, NotificationServiceError> {
        let repo = NotificationRepo::new();

        let owned = repo.owned_ids(viewer, None).await?;
        Ok(repo.delete_many(&owned).await?)
    }
}

impl Default for NotificationService {
    fn default() -> Self {
        Self::new()
    }
}
