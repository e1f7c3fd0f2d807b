use crate::api::controllers::dto::department_dto::DepartmentDTO;
use crate::api::controllers::dto::order_dto::{
    CreateOrderRequest, OrderDTO, OrderItemDTO, UpdateOrderStatusRequest,
};
use crate::data::models::department::Department;
use crate::data::models::order::{
    NewOrder, Order, OrderStatus, PAYMENT_METHOD_CASH_ON_PICKUP, UpdateOrder, generate_order_number,
};
use crate::data::models::user::User;
use crate::data::repos::implementors::department_repo::DepartmentRepo;
use crate::data::repos::implementors::discount_code_repo::DiscountCodeRepo;
use crate::data::repos::implementors::listing_repo::ListingRepo;
use crate::data::repos::implementors::order_repo::{OrderLine, OrderRepo, OrderWriteError};
use crate::data::repos::implementors::user_repo::UserRepo;
use crate::data::repos::traits::repository::Repository;
use crate::security::access::{STAFF, require_role};
use crate::services::errors::{OrderServiceError, is_unique_violation};
use crate::services::mail_service::{MailLine, MailService, OrderMailContext, OrderMailKind};
use crate::services::notification_service::NotificationService;
use crate::services::pricing::{self, Breakdown, CartLine, StockedListing};
use crate::services::user_service::{session, validate_email};
use crate::storage::{FileStorage, UploadKind, UploadedFile};
use crate::utils::mappers::timestamp_string;
use std::collections::{HashMap, HashSet};

const MAX_NOTES_LENGTH: usize = 500;
const MAX_CODE_LENGTH: usize = 50;
const MAX_SIZE_LENGTH: usize = 10;
const ORDER_NUMBER_ATTEMPTS: usize = 3;

fn now() -> chrono::NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

fn too_long(value: Option<&str>, max: usize) -> bool {
    value.is_some_and(|v| v.chars().count() > max)
}

/// Field checks on an order request that need no database.
pub fn validate_create_request(req: &CreateOrderRequest) -> Result<(), OrderServiceError> {
    if req.items.is_empty() {
        return Err(OrderServiceError::Validation("The items field is required.".into()));
    }
    validate_email(&req.email)
        .map_err(|_| OrderServiceError::Validation("The email must be a valid email address.".into()))?;
    if too_long(req.notes.as_deref(), MAX_NOTES_LENGTH) {
        return Err(OrderServiceError::Validation(
            "The notes may not be greater than 500 characters.".into(),
        ));
    }
    if too_long(req.discount_code.as_deref(), MAX_CODE_LENGTH) {
        return Err(OrderServiceError::Validation(
            "The discount code may not be greater than 50 characters.".into(),
        ));
    }
    if req.items.iter().any(|i| too_long(i.size.as_deref(), MAX_SIZE_LENGTH)) {
        return Err(OrderServiceError::Validation(
            "The size may not be greater than 10 characters.".into(),
        ));
    }
    Ok(())
}

pub fn validate_rating(rating: i32, review: Option<&str>) -> Result<(), OrderServiceError> {
    if !(1..=5).contains(&rating) {
        return Err(OrderServiceError::Validation("The rating must be between 1 and 5.".into()));
    }
    if too_long(review, MAX_NOTES_LENGTH) {
        return Err(OrderServiceError::Validation(
            "The review may not be greater than 500 characters.".into(),
        ));
    }
    Ok(())
}

pub struct OrderService {
    storage: FileStorage,
    mail: MailService,
    notifications: NotificationService,
}

impl OrderService {
    pub fn new() -> Self {
        Self::with_parts(FileStorage::new(), MailService::new())
    }

    pub fn with_parts(storage: FileStorage, mail: MailService) -> Self {
        OrderService {
            storage,
            mail,
            notifications: NotificationService::new(),
        }
    }

    async fn load_stocked(&self, ids: &[i32]) -> Result<HashMap<i32, StockedListing>, OrderServiceError> {
        let repo = ListingRepo::new();

        let mut variants = HashMap::new();
        for variant in repo.get_variants_for(ids).await? {
            variants.entry(variant.listing_id).or_insert_with(Vec::new).push(variant);
        }

        Ok(repo
            .get_by_ids(ids)
            .await?
            .into_iter()
            .map(|listing| {
                let id = listing.listing_id;
                let stocked = StockedListing {
                    listing,
                    variants: variants.remove(&id).unwrap_or_default(),
                };
                (id, stocked)
            })
            .collect())
    }

    async fn department_name(&self, department_id: i32) -> String {
        match DepartmentRepo::new().get_by_id(department_id).await {
            Ok(Some(department)) => department.name,
            Ok(None) => "Unknown".to_string(),
            Err(e) => {
                tracing::error!(department_id, error = %e, "failed to load department name");
                "Unknown".to_string()
            }
        }
    }

    /// Best-effort context for order emails; lookup failures leave fields empty.
    async fn mail_context(&self, order: &Order, customer: Option<&User>) -> OrderMailContext {
        let items = OrderRepo::new().get_items(order.order_id).await.unwrap_or_default();
        let ids: Vec<i32> = items.iter().map(|i| i.listing_id).collect();
        let titles: HashMap<i32, String> = ListingRepo::new()
            .get_by_ids(&ids)
            .await
            .unwrap_or_default()
            .into_iter()
            .map(|l| (l.listing_id, l.title))
            .collect();

        OrderMailContext {
            customer_name: customer.map(|c| c.name.clone()),
            customer_email: customer.map(|c| c.email.clone()),
            department_name: Some(self.department_name(order.department_id).await),
            lines: items
                .into_iter()
                .map(|item| MailLine {
                    title: titles
                        .get(&item.listing_id)
                        .cloned()
                        .unwrap_or_else(|| format!("Listing #{}", item.listing_id)),
                    size: item.size,
                    quantity: item.quantity,
                    subtotal: item.subtotal,
                })
                .collect(),
        }
    }

    async fn send_mail(&self, kind: OrderMailKind, order: &Order, customer: Option<&User>) -> bool {
        let ctx = self.mail_context(order, customer).await;
        self.mail.send_order_mail(kind, order, &ctx).await
    }

    async fn notify_status_change(&self, order: &Order, customer: Option<&User>, old: OrderStatus, new: OrderStatus) {
        let Some(customer) = customer else {
            tracing::warn!(order_id = order.order_id, "order has no customer; status notification skipped");
            return;
        };
        let department = self.department_name(order.department_id).await;
        self.notifications
            .notify_order_status_changed(order, customer, &department, old, new)
            .await;
    }

    async fn find_own(&self, actor: &User, id: i32) -> Result<Order, OrderServiceError> {
        OrderRepo::new()
            .get_for_user(id, actor.user_id)
            .await?
            .ok_or(OrderServiceError::OrderNotFound)
    }

    /// Staff lookup; orders of another department look missing to an admin.
    async fn find_managed(&self, actor: &User, id: i32) -> Result<Order, OrderServiceError> {
        require_role(actor, STAFF)?;
        let order = OrderRepo::new()
            .get_by_id(id)
            .await?
            .ok_or(OrderServiceError::OrderNotFound)?;

        if !actor.can_manage_department(order.department_id) {
            tracing::warn!(actor = actor.user_id, order_id = id, "order outside managed department");
            return Err(OrderServiceError::OrderNotFound);
        }

        Ok(order)
    }

    async fn reload(&self, id: i32) -> Result<Order, OrderServiceError> {
        OrderRepo::new()
            .get_by_id(id)
            .await?
            .ok_or(OrderServiceError::OrderNotFound)
    }

    pub async fn create(&self, actor: &User, req: CreateOrderRequest) -> Result<Order, OrderServiceError> {
        validate_create_request(&req)?;

        let cart: Vec<CartLine> = req
            .items
            .iter()
            .map(|item| CartLine {
                listing_id: item.listing_id,
                quantity: item.quantity,
                size: item.size.clone(),
            })
            .collect();
        let ids: Vec<i32> = cart
            .iter()
            .map(|c| c.listing_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let stocked = self.load_stocked(&ids).await?;

        let code = match req.discount_code.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            Some(code) => DiscountCodeRepo::new().get_by_code(code).await?,
            None => None,
        };

        let now = now();
        let mut quote = pricing::quote(&cart, &stocked, code.as_ref(), now)?;
        if req.discount_code.is_some() && quote.discount_code_id.is_none() {
            tracing::info!(user_id = actor.user_id, "unusable discount code ignored");
        }

        let lines: Vec<OrderLine> = quote
            .lines
            .iter()
            .map(|line| OrderLine {
                listing_id: line.listing_id,
                quantity: line.quantity,
                size: line.size.clone(),
                price: line.unit_price.clone(),
                subtotal: line.subtotal.clone(),
                stock: line.stock,
            })
            .collect();
        let email = req.email.trim();
        let notes = req.notes.as_deref().map(str::trim).filter(|n| !n.is_empty());
        let repo = OrderRepo::new();

        let mut attempt = 0;
        let order = loop {
            attempt += 1;
            let number = generate_order_number(now);
            let totals = &quote.totals;

            let result = repo
                .create_with_items(
                    NewOrder {
                        order_number: &number,
                        user_id: actor.user_id,
                        email,
                        department_id: quote.department_id,
                        total_amount: totals.final_amount.clone(),
                        original_amount: totals.original_amount.clone(),
                        discount_code_id: quote.discount_code_id,
                        discount_amount: totals.discount_amount.clone(),
                        reservation_fee_amount: totals.reservation_fee_amount.clone(),
                        reservation_fee_paid: false,
                        status: OrderStatus::Pending,
                        notes,
                        payment_method: PAYMENT_METHOD_CASH_ON_PICKUP,
                    },
                    lines.clone(),
                )
                .await;

            match result {
                Ok(order) => break order,
                Err(OrderWriteError::Database(e))
                    if is_unique_violation(&e) && attempt < ORDER_NUMBER_ATTEMPTS =>
                {
                    tracing::warn!(order_number = %number, "order number collision, retrying");
                }
                Err(OrderWriteError::DiscountExhausted(code_id)) if quote.discount_code_id.is_some() => {
                    // Another order took the last use; the code is ignored like any unusable one.
                    tracing::info!(user_id = actor.user_id, code_id, "discount code used up, ordering without it");
                    quote = pricing::quote(&cart, &stocked, None, now)?;
                }
                Err(e) => return Err(e.into()),
            }
        };

        tracing::info!(
            order_id = order.order_id,
            order_number = %order.order_number,
            user_id = actor.user_id,
            department_id = order.department_id,
            total = %order.total_amount,
            "order created"
        );

        if self.send_mail(OrderMailKind::Placed, &order, Some(actor)).await {
            let marked = repo
                .update(
                    order.order_id,
                    UpdateOrder {
                        email_sent: Some(true),
                        ..Default::default()
                    },
                )
                .await;
            if let Err(e) = marked {
                tracing::error!(order_id = order.order_id, error = %e, "failed to mark email as sent");
            }
        }

        let department = self.department_name(order.department_id).await;
        self.notifications
            .notify_order_created(&order, actor, &department)
            .await;

        self.reload(order.order_id).await
    }

    pub async fn list_own(&self, actor: &User) -> Result<Vec<Order>, OrderServiceError> {
        Ok(OrderRepo::new().get_by_user(actor.user_id).await?)
    }

    pub async fn get_own(&self, actor: &User, id: i32) -> Result<Order, OrderServiceError> {
        self.find_own(actor, id).await
    }

    pub async fn cancel(&self, actor: &User, id: i32) -> Result<Order, OrderServiceError> {
        let current = self.find_own(actor, id).await?;

        let order = OrderRepo::new().cancel(id, false).await?;
        tracing::info!(order_id = id, user_id = actor.user_id, "order cancelled by customer");

        self.send_mail(OrderMailKind::Cancelled, &order, Some(actor)).await;
        self.notify_status_change(&order, Some(actor), current.status, OrderStatus::Cancelled)
            .await;

        Ok(order)
    }

    pub async fn upload_receipt(
        &self,
        actor: &User,
        id: i32,
        receipt: UploadedFile,
    ) -> Result<Order, OrderServiceError> {
        let order = self.find_own(actor, id).await?;
        if order.reservation_fee_paid {
            return Err(OrderServiceError::ReservationFeeAlreadyPaid);
        }

        let path = self.storage.store(&receipt, UploadKind::PaymentReceipt).await?;
        let saved = OrderRepo::new()
            .update(
                id,
                UpdateOrder {
                    payment_receipt_path: Some(Some(&path)),
                    ..Default::default()
                },
            )
            .await;
        if let Err(e) = saved {
            self.storage.remove(&path).await;
            return Err(e.into());
        }

        if let Some(previous) = &order.payment_receipt_path {
            self.storage.remove(previous).await;
        }

        tracing::info!(order_id = id, user_id = actor.user_id, "payment receipt uploaded");
        let order = self.reload(id).await?;

        let department = self.department_name(order.department_id).await;
        self.notifications
            .notify_receipt_uploaded(&order, actor, &department)
            .await;

        Ok(order)
    }

    /// Applies a code to an order after the fact, recomputing from `original_amount`.
    pub async fn apply_discount(&self, actor: &User, id: i32, code: &str) -> Result<Order, OrderServiceError> {
        let order = self.find_own(actor, id).await?;
        if order.status != OrderStatus::Pending || order.reservation_fee_paid {
            return Err(OrderServiceError::DiscountNotApplicable(
                "Cannot apply discount to this order".into(),
            ));
        }
        if order.discount_code_id.is_some() {
            return Err(OrderServiceError::DiscountNotApplicable(
                "A discount is already applied".into(),
            ));
        }

        let code = DiscountCodeRepo::new()
            .get_by_code(code)
            .await?
            .ok_or_else(|| OrderServiceError::DiscountNotApplicable("Invalid or expired discount code".into()))?;
        code.check_order(&order.original_amount, order.department_id, now())
            .map_err(|rejection| OrderServiceError::DiscountNotApplicable(rejection.to_string()))?;

        let totals = Breakdown::new(&order.original_amount, &code.calculate_discount(&order.original_amount));
        let applied = OrderRepo::new()
            .apply_discount(
                id,
                code.discount_code_id,
                totals.discount_amount,
                totals.final_amount,
                totals.reservation_fee_amount,
            )
            .await?;
        if !applied {
            return Err(OrderServiceError::DiscountNotApplicable(
                "Cannot apply discount to this order".into(),
            ));
        }

        tracing::info!(order_id = id, code = %code.code, "discount applied to order");
        self.reload(id).await
    }

    pub async fn rate(
        &self,
        actor: &User,
        id: i32,
        rating: i32,
        review: Option<String>,
    ) -> Result<Order, OrderServiceError> {
        validate_rating(rating, review.as_deref())?;
        let order = self.find_own(actor, id).await?;
        if order.status != OrderStatus::Completed {
            return Err(OrderServiceError::NotRatable);
        }

        OrderRepo::new()
            .update(
                id,
                UpdateOrder {
                    rating: Some(Some(rating)),
                    review: Some(review.as_deref().map(str::trim).filter(|r| !r.is_empty())),
                    ..Default::default()
                },
            )
            .await?;

        self.reload(id).await
    }

    /// Every order for superadmins, the department's orders for admins.
    pub async fn admin_list(&self, actor: &User) -> Result<Vec<Order>, OrderServiceError> {
        require_role(actor, STAFF)?;
        let repo = OrderRepo::new();

        if actor.is_superadmin() {
            return Ok(repo.get_all().await?.unwrap_or_default());
        }

        match actor.department_id {
            Some(dept) => Ok(repo.get_by_department(dept).await?),
            None => Ok(Vec::new()),
        }
    }

    pub async fn update_status(
        &self,
        actor: &User,
        id: i32,
        req: UpdateOrderStatusRequest,
    ) -> Result<Order, OrderServiceError> {
        let current = self.find_managed(actor, id).await?;
        let old = current.status;
        let new = req.status;
        let repo = OrderRepo::new();

        if new == OrderStatus::Cancelled && old != OrderStatus::Cancelled {
            repo.cancel(id, true).await?;
        }

        let form = UpdateOrder {
            status: (new != OrderStatus::Cancelled).then_some(new),
            pickup_date: req.pickup_date.map(Some),
            notes: req.notes.as_deref().map(Some),
            ..Default::default()
        };
        if form != UpdateOrder::default() {
            repo.update(id, form).await?;
        }

        tracing::info!(order_id = id, actor = actor.user_id, from = %old, to = %new, "order status updated");
        let order = self.reload(id).await?;
        let customer = UserRepo::new().get_by_id(order.user_id).await?;

        if old != new {
            match new {
                OrderStatus::ReadyForPickup => {
                    self.send_mail(OrderMailKind::ReadyForPickup, &order, customer.as_ref())
                        .await;
                }
                OrderStatus::Confirmed => {
                    self.send_mail(OrderMailKind::Confirmed, &order, customer.as_ref())
                        .await;
                }
                _ => {}
            }
            self.notify_status_change(&order, customer.as_ref(), old, new).await;
        }

        Ok(order)
    }

    pub async fn confirm_reservation_fee(&self, actor: &User, id: i32) -> Result<Order, OrderServiceError> {
        let current = self.find_managed(actor, id).await?;
        if current.reservation_fee_paid {
            return Err(OrderServiceError::ReservationFeeAlreadyPaid);
        }
        if current.payment_receipt_path.is_none() {
            return Err(OrderServiceError::ReceiptMissing);
        }

        OrderRepo::new()
            .update(
                id,
                UpdateOrder {
                    reservation_fee_paid: Some(true),
                    status: Some(OrderStatus::Confirmed),
                    ..Default::default()
                },
            )
            .await?;

        tracing::info!(order_id = id, actor = actor.user_id, "reservation fee confirmed");
        let order = self.reload(id).await?;
        let customer = UserRepo::new().get_by_id(order.user_id).await?;

        self.send_mail(OrderMailKind::Confirmed, &order, customer.as_ref()).await;
        self.notify_status_change(&order, customer.as_ref(), current.status, OrderStatus::Confirmed)
            .await;

        Ok(order)
    }

    /// Builds order payloads with items, department and (for staff views) the customer.
    pub async fn present(&self, orders: Vec<Order>, with_customer: bool) -> Result<Vec<OrderDTO>, OrderServiceError> {
        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<i32> = orders.iter().map(|o| o.order_id).collect();
        let items = OrderRepo::new().get_items_for(&order_ids).await?;

        let listing_ids: Vec<i32> = items
            .iter()
            .map(|i| i.listing_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let titles: HashMap<i32, String> = ListingRepo::new()
            .get_by_ids(&listing_ids)
            .await?
            .into_iter()
            .map(|l| (l.listing_id, l.title))
            .collect();

        let mut items_by_order: HashMap<i32, Vec<OrderItemDTO>> = HashMap::new();
        for item in items {
            let order_id = item.order_id;
            let mut dto = OrderItemDTO::from(item);
            dto.listing_title = titles.get(&dto.listing_id).cloned();
            items_by_order.entry(order_id).or_default().push(dto);
        }

        let departments: HashMap<i32, Department> = DepartmentRepo::new()
            .get_all()
            .await?
            .unwrap_or_default()
            .into_iter()
            .map(|d| (d.department_id, d))
            .collect();

        let customers: HashMap<i32, User> = if with_customer {
            let user_ids: Vec<i32> = orders
                .iter()
                .map(|o| o.user_id)
                .collect::<HashSet<_>>()
                .into_iter()
                .collect();
            UserRepo::new()
                .get_by_ids(&user_ids)
                .await?
                .into_iter()
                .map(|u| (u.user_id, u))
                .collect()
        } else {
            HashMap::new()
        };

        let code_repo = DiscountCodeRepo::new();
        let mut codes: HashMap<i32, String> = HashMap::new();
        for code_id in orders.iter().filter_map(|o| o.discount_code_id).collect::<HashSet<_>>() {
            if let Some(code) = code_repo.get_by_id(code_id).await? {
                codes.insert(code_id, code.code);
            }
        }

        Ok(orders
            .into_iter()
            .map(|order| {
                let user = customers.get(&order.user_id).map(|u| {
                    let name = u
                        .department_id
                        .and_then(|id| departments.get(&id))
                        .map(|d| d.name.clone());
                    session(u, name)
                });

                OrderDTO {
                    id: order.order_id,
                    status_display: order.status_display().to_string(),
                    remaining_balance: order.remaining_balance(),
                    discount_percentage: order.discount_percentage(),
                    has_discount: order.has_discount(),
                    can_be_cancelled: order.can_be_cancelled(),
                    can_be_confirmed: order.can_be_confirmed(),
                    discount_code: order.discount_code_id.and_then(|id| codes.get(&id).cloned()),
                    items: items_by_order.remove(&order.order_id).unwrap_or_default(),
                    department: departments
                        .get(&order.department_id)
                        .cloned()
                        .map(DepartmentDTO::from),
                    user,
                    pickup_date: timestamp_string(order.pickup_date),
                    created_at: timestamp_string(order.created_at),
                    updated_at: timestamp_string(order.updated_at),
                    order_number: order.order_number,
                    user_id: order.user_id,
                    email: order.email,
                    department_id: order.department_id,
                    status: order.status,
                    original_amount: order.original_amount,
                    discount_amount: order.discount_amount,
                    total_amount: order.total_amount,
                    reservation_fee_amount: order.reservation_fee_amount,
                    reservation_fee_paid: order.reservation_fee_paid,
                    payment_receipt_path: order.payment_receipt_path,
                    payment_method: order.payment_method,
                    notes: order.notes,
                    email_sent: order.email_sent,
                    rating: order.rating,
                    review: order.review,
                }
            })
            .collect())
    }

    pub async fn present_one(&self, order: Order, with_customer: bool) -> Result<OrderDTO, OrderServiceError> {
        self.present(vec![order], with_customer)
            .await?
            .pop()
            .ok_or(OrderServiceError::OrderNotFound)
    }
}

impl Default for OrderService {
    fn default() -> Self {
        Self::new()
    }
}
