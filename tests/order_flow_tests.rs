use bigdecimal::BigDecimal;
use diesel::prelude::*;
use diesel::result;
use diesel_async::RunQueryDsl;
use merch_hub_lib::api::controllers::dto::order_dto::{
    CreateOrderRequest, OrderItemRequest, UpdateOrderStatusRequest,
};
use merch_hub_lib::data::database::Database;
use merch_hub_lib::data::models::department::NewDepartment;
use merch_hub_lib::data::models::discount_code::{DiscountCode, DiscountType, NewDiscountCode};
use merch_hub_lib::data::models::listing::{Listing, ListingStatus, NewListing};
use merch_hub_lib::data::models::listing_size_variant::NewListingSizeVariant;
use merch_hub_lib::data::models::order::{NewOrder, OrderStatus};
use merch_hub_lib::data::models::roles::UserRole;
use merch_hub_lib::data::models::user::{NewUser, User};
use merch_hub_lib::data::repos::implementors::department_repo::DepartmentRepo;
use merch_hub_lib::data::repos::implementors::discount_code_repo::DiscountCodeRepo;
use merch_hub_lib::data::repos::implementors::listing_repo::ListingRepo;
use merch_hub_lib::data::repos::implementors::order_repo::{
    OrderLine, OrderRepo, OrderWriteError, StockSource,
};
use merch_hub_lib::data::repos::implementors::user_repo::UserRepo;
use merch_hub_lib::data::repos::traits::repository::Repository;
use merch_hub_lib::services::category_service::CategoryService;
use merch_hub_lib::services::errors::OrderServiceError;
use merch_hub_lib::services::mail_service::{LogMailTransport, MailService};
use merch_hub_lib::services::order_service::OrderService;
use merch_hub_lib::storage::{FileStorage, UploadedFile};
use std::str::FromStr;
use std::sync::Arc;

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

async fn setup() -> Result<(), result::Error> {
    let db = Database::new().await;

    let mut conn = db
        .get_connection()
        .await
        .expect("Failed to get a database connection");

    use merch_hub_lib::data::models::schema::*;

    diesel::delete(notifications::table).execute(&mut conn).await?;
    diesel::delete(reservations::table).execute(&mut conn).await?;
    diesel::delete(order_items::table).execute(&mut conn).await?;
    diesel::delete(orders::table).execute(&mut conn).await?;
    diesel::delete(discount_codes::table).execute(&mut conn).await?;
    diesel::delete(listings::table).execute(&mut conn).await?;
    diesel::delete(users::table).execute(&mut conn).await?;
    diesel::delete(categories::table).execute(&mut conn).await?;
    diesel::delete(departments::table).execute(&mut conn).await?;

    Ok(())
}

struct Fixture {
    student: User,
    admin: User,
    outside_admin: User,
    listing: Listing,
    category_id: i32,
}

async fn create_user(email: &str, role: UserRole, department_id: i32) -> User {
    UserRepo::new()
        .create(NewUser {
            name: email,
            email,
            password_hash: "not-a-real-hash",
            role,
            department_id: Some(department_id),
        })
        .await
        .expect("Failed to create user")
}

async fn fixture(stock: i32) -> Fixture {
    let departments = DepartmentRepo::new();
    let mut ids = Vec::new();
    for name in ["School of Engineering", "School of Criminology"] {
        let dept = departments
            .create(NewDepartment {
                name,
                description: None,
                logo_path: None,
                gcash_qr_image_path: None,
            })
            .await
            .expect("Failed to create department");
        ids.push(dept.department_id);
    }
    let category = CategoryService::new()
        .ensure("Clothing")
        .await
        .expect("Failed to create category");

    let student = create_user("student@example.com", UserRole::Student, ids[0]).await;
    let admin = create_user("admin@example.com", UserRole::Admin, ids[0]).await;
    let outside_admin = create_user("other@example.com", UserRole::Admin, ids[1]).await;

    let listing = ListingRepo::new()
        .create(
            NewListing {
                title: "Engineering Hoodie",
                description: None,
                image_path: None,
                department_id: ids[0],
                category_id: category.category_id,
                user_id: admin.user_id,
                price: dec("150.00"),
                size: None,
                status: ListingStatus::Approved,
                stock_quantity: stock,
            },
            Vec::new(),
        )
        .await
        .expect("Failed to create listing");

    Fixture {
        student,
        admin,
        outside_admin,
        listing,
        category_id: category.category_id,
    }
}

async fn listing_with_variants(fx: &Fixture, variants: Vec<(String, i32)>) -> Listing {
    ListingRepo::new()
        .create(
            NewListing {
                title: "Engineering Shirt",
                description: None,
                image_path: None,
                department_id: fx.listing.department_id,
                category_id: fx.category_id,
                user_id: fx.admin.user_id,
                price: dec("200.00"),
                size: None,
                status: ListingStatus::Approved,
                stock_quantity: 0,
            },
            variants,
        )
        .await
        .expect("Failed to create listing")
}

async fn create_code(fx: &Fixture, code: &'static str, usage_limit: Option<i32>) -> DiscountCode {
    DiscountCodeRepo::new()
        .create(NewDiscountCode {
            code,
            discount_type: DiscountType::Percentage,
            value: dec("10"),
            description: None,
            created_by: fx.admin.user_id,
            department_id: Some(fx.listing.department_id),
            is_udd_official: false,
            usage_limit,
            minimum_order_amount: None,
            valid_from: None,
            valid_until: None,
            is_active: true,
        })
        .await
        .expect("Failed to create discount code")
}

/// Sets `usage_count` directly, as if other orders had used the code.
async fn set_usage(code_id: i32, count: i32) {
    use merch_hub_lib::data::models::schema::discount_codes::dsl::{
        discount_code_id, discount_codes, usage_count,
    };

    let mut conn = Database::new()
        .await
        .get_connection()
        .await
        .expect("Failed to get a database connection");

    diesel::update(discount_codes.filter(discount_code_id.eq(code_id)))
        .set(usage_count.eq(count))
        .execute(&mut conn)
        .await
        .expect("Failed to set usage count");
}

async fn usage_of(code: &str) -> i32 {
    DiscountCodeRepo::new()
        .get_by_code(code)
        .await
        .expect("Query failed")
        .expect("Code not found")
        .usage_count
}

async fn variant_stock(listing_id: i32, size: &str) -> i32 {
    ListingRepo::new()
        .get_variants(listing_id)
        .await
        .expect("Query failed")
        .into_iter()
        .find(|v| v.size == size)
        .map(|v| v.stock_quantity)
        .expect("Variant not found")
}

fn status_request(status: OrderStatus) -> UpdateOrderStatusRequest {
    UpdateOrderStatusRequest {
        status,
        pickup_date: None,
        notes: None,
    }
}

fn service() -> OrderService {
    let dir = std::env::temp_dir().join("merch_hub_order_flow_tests");
    OrderService::with_parts(
        FileStorage::with_root(dir),
        MailService::with_transport(Arc::new(LogMailTransport)),
    )
}

fn order_request(listing_id: i32, quantity: i32, code: Option<&str>) -> CreateOrderRequest {
    CreateOrderRequest {
        items: vec![OrderItemRequest {
            listing_id,
            quantity,
            size: None,
        }],
        email: "student@example.com".to_string(),
        notes: Some("Pick up after class".to_string()),
        discount_code: code.map(str::to_string),
    }
}

async fn stock_of(listing_id: i32) -> i32 {
    ListingRepo::new()
        .get_by_id(listing_id)
        .await
        .expect("Query failed")
        .expect("Listing not found")
        .stock_quantity
}

#[tokio::test]
#[serial_test::serial]
#[ignore = "needs a MySQL database (DATABASE_URL)"]
async fn test_order_with_discount_reserves_and_restores_stock() {
    setup().await.expect("Setup failed");
    let fx = fixture(5).await;

    DiscountCodeRepo::new()
        .create(NewDiscountCode {
            code: "HOODIE10",
            discount_type: DiscountType::Percentage,
            value: dec("10"),
            description: None,
            created_by: fx.admin.user_id,
            department_id: Some(fx.listing.department_id),
            is_udd_official: false,
            usage_limit: Some(5),
            minimum_order_amount: None,
            valid_from: None,
            valid_until: None,
            is_active: true,
        })
        .await
        .expect("Failed to create discount code");

    let service = service();
    let order = service
        .create(
            &fx.student,
            order_request(fx.listing.listing_id, 2, Some("HOODIE10")),
        )
        .await
        .expect("Failed to create order");

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.original_amount, dec("300.00"));
    assert_eq!(order.discount_amount, dec("30.00"));
    assert_eq!(order.total_amount, dec("270.00"));
    assert_eq!(order.reservation_fee_amount, dec("94.50"));
    assert!(order.order_number.starts_with("ORD-"));
    assert_eq!(stock_of(fx.listing.listing_id).await, 3);

    let code = DiscountCodeRepo::new()
        .get_by_code("HOODIE10")
        .await
        .expect("Query failed")
        .expect("Code not found");
    assert_eq!(code.usage_count, 1);

    let cancelled = service
        .cancel(&fx.student, order.order_id)
        .await
        .expect("Failed to cancel order");

    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(stock_of(fx.listing.listing_id).await, 5);

    assert!(matches!(
        service.cancel(&fx.student, order.order_id).await,
        Err(OrderServiceError::NotCancellable)
    ));
}

#[tokio::test]
#[serial_test::serial]
#[ignore = "needs a MySQL database (DATABASE_URL)"]
async fn test_overselling_is_rejected() {
    setup().await.expect("Setup failed");
    let fx = fixture(1).await;

    let result = service()
        .create(&fx.student, order_request(fx.listing.listing_id, 2, None))
        .await;

    assert!(matches!(result, Err(OrderServiceError::Pricing(_))));
    assert_eq!(stock_of(fx.listing.listing_id).await, 1);
}

#[tokio::test]
#[serial_test::serial]
#[ignore = "needs a MySQL database (DATABASE_URL)"]
async fn test_receipt_then_fee_confirmation() {
    setup().await.expect("Setup failed");
    let fx = fixture(5).await;
    let service = service();

    let order = service
        .create(&fx.student, order_request(fx.listing.listing_id, 1, None))
        .await
        .expect("Failed to create order");

    assert!(matches!(
        service.confirm_reservation_fee(&fx.admin, order.order_id).await,
        Err(OrderServiceError::ReceiptMissing)
    ));

    let receipt = UploadedFile {
        file_name: Some("receipt.png".to_string()),
        content_type: Some("image/png".to_string()),
        bytes: vec![1, 2, 3, 4],
    };
    let with_receipt = service
        .upload_receipt(&fx.student, order.order_id, receipt)
        .await
        .expect("Failed to upload receipt");
    assert!(with_receipt.payment_receipt_path.is_some());

    assert!(matches!(
        service
            .confirm_reservation_fee(&fx.outside_admin, order.order_id)
            .await,
        Err(OrderServiceError::OrderNotFound)
    ));

    let confirmed = service
        .confirm_reservation_fee(&fx.admin, order.order_id)
        .await
        .expect("Failed to confirm fee");
    assert!(confirmed.reservation_fee_paid);
    assert_eq!(confirmed.status, OrderStatus::Confirmed);

    let ready = service
        .update_status(
            &fx.admin,
            order.order_id,
            UpdateOrderStatusRequest {
                status: OrderStatus::ReadyForPickup,
                pickup_date: None,
                notes: None,
            },
        )
        .await
        .expect("Failed to update status");
    assert_eq!(ready.status, OrderStatus::ReadyForPickup);

    assert!(matches!(
        service.rate(&fx.student, order.order_id, 5, None).await,
        Err(OrderServiceError::NotRatable)
    ));
}

#[tokio::test]
#[serial_test::serial]
#[ignore = "needs a MySQL database (DATABASE_URL)"]
async fn test_apply_discount_recomputes_from_original_amount() {
    setup().await.expect("Setup failed");
    let fx = fixture(5).await;
    create_code(&fx, "LATE10", None).await;
    let service = service();

    let order = service
        .create(&fx.student, order_request(fx.listing.listing_id, 2, None))
        .await
        .expect("Failed to create order");
    assert_eq!(order.total_amount, dec("300.00"));

    let discounted = service
        .apply_discount(&fx.student, order.order_id, "late10")
        .await
        .expect("Failed to apply discount");

    assert_eq!(discounted.original_amount, dec("300.00"));
    assert_eq!(discounted.discount_amount, dec("30.00"));
    assert_eq!(discounted.total_amount, dec("270.00"));
    assert_eq!(discounted.reservation_fee_amount, dec("94.50"));
    assert_eq!(usage_of("LATE10").await, 1);

    assert!(matches!(
        service.apply_discount(&fx.student, order.order_id, "LATE10").await,
        Err(OrderServiceError::DiscountNotApplicable(_))
    ));
    assert_eq!(usage_of("LATE10").await, 1);
}

#[tokio::test]
#[serial_test::serial]
#[ignore = "needs a MySQL database (DATABASE_URL)"]
async fn test_apply_discount_refused_once_fee_is_paid() {
    setup().await.expect("Setup failed");
    let fx = fixture(5).await;
    create_code(&fx, "LATE10", None).await;
    let service = service();

    let order = service
        .create(&fx.student, order_request(fx.listing.listing_id, 1, None))
        .await
        .expect("Failed to create order");
    let receipt = UploadedFile {
        file_name: Some("receipt.jpg".to_string()),
        content_type: Some("image/jpeg".to_string()),
        bytes: vec![9, 9, 9],
    };
    service
        .upload_receipt(&fx.student, order.order_id, receipt)
        .await
        .expect("Failed to upload receipt");
    service
        .confirm_reservation_fee(&fx.admin, order.order_id)
        .await
        .expect("Failed to confirm fee");

    assert!(matches!(
        service.apply_discount(&fx.student, order.order_id, "LATE10").await,
        Err(OrderServiceError::DiscountNotApplicable(_))
    ));
    assert_eq!(usage_of("LATE10").await, 0);
}

#[tokio::test]
#[serial_test::serial]
#[ignore = "needs a MySQL database (DATABASE_URL)"]
async fn test_staff_cancellation_restores_stock_once() {
    setup().await.expect("Setup failed");
    let fx = fixture(5).await;
    let service = service();

    let order = service
        .create(&fx.student, order_request(fx.listing.listing_id, 2, None))
        .await
        .expect("Failed to create order");
    assert_eq!(stock_of(fx.listing.listing_id).await, 3);

    let cancelled = service
        .update_status(&fx.admin, order.order_id, status_request(OrderStatus::Cancelled))
        .await
        .expect("Failed to cancel order");
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(stock_of(fx.listing.listing_id).await, 5);

    service
        .update_status(&fx.admin, order.order_id, status_request(OrderStatus::Cancelled))
        .await
        .expect("Repeated cancel failed");
    assert_eq!(stock_of(fx.listing.listing_id).await, 5);
}

#[tokio::test]
#[serial_test::serial]
#[ignore = "needs a MySQL database (DATABASE_URL)"]
async fn test_exhausted_code_aborts_the_order_write() {
    setup().await.expect("Setup failed");
    let fx = fixture(5).await;
    let code = create_code(&fx, "ONCE", Some(1)).await;
    set_usage(code.discount_code_id, 1).await;

    let result = OrderRepo::new()
        .create_with_items(
            NewOrder {
                order_number: "ORD-20250601-RACE01",
                user_id: fx.student.user_id,
                email: "student@example.com",
                department_id: fx.listing.department_id,
                total_amount: dec("135.00"),
                original_amount: dec("150.00"),
                discount_code_id: Some(code.discount_code_id),
                discount_amount: dec("15.00"),
                reservation_fee_amount: dec("47.25"),
                reservation_fee_paid: false,
                status: OrderStatus::Pending,
                notes: None,
                payment_method: "cash_on_pickup",
            },
            vec![OrderLine {
                listing_id: fx.listing.listing_id,
                quantity: 1,
                size: None,
                price: dec("150.00"),
                subtotal: dec("150.00"),
                stock: Some(StockSource::Listing(fx.listing.listing_id)),
            }],
        )
        .await;

    assert!(matches!(result, Err(OrderWriteError::DiscountExhausted(id)) if id == code.discount_code_id));
    assert_eq!(stock_of(fx.listing.listing_id).await, 5);
    assert_eq!(usage_of("ONCE").await, 1);
    assert!(
        OrderRepo::new()
            .get_by_user(fx.student.user_id)
            .await
            .expect("Query failed")
            .is_empty()
    );
}

#[tokio::test]
#[serial_test::serial]
#[ignore = "needs a MySQL database (DATABASE_URL)"]
async fn test_usage_limit_holds_across_orders() {
    setup().await.expect("Setup failed");
    let fx = fixture(5).await;
    let code = create_code(&fx, "ONCE", Some(1)).await;
    let service = service();

    let first = service
        .create(&fx.student, order_request(fx.listing.listing_id, 1, Some("ONCE")))
        .await
        .expect("Failed to create first order");
    assert_eq!(first.discount_code_id, Some(code.discount_code_id));

    let second = service
        .create(&fx.student, order_request(fx.listing.listing_id, 1, Some("ONCE")))
        .await
        .expect("Failed to create second order");
    assert_eq!(second.discount_code_id, None);
    assert_eq!(second.total_amount, dec("150.00"));
    assert_eq!(usage_of("ONCE").await, 1);

    let late = service
        .create(&fx.student, order_request(fx.listing.listing_id, 1, None))
        .await
        .expect("Failed to create third order");
    assert!(matches!(
        OrderRepo::new()
            .apply_discount(
                late.order_id,
                code.discount_code_id,
                dec("15.00"),
                dec("135.00"),
                dec("47.25"),
            )
            .await,
        Err(OrderWriteError::DiscountExhausted(_))
    ));

    let untouched = OrderRepo::new()
        .get_by_id(late.order_id)
        .await
        .expect("Query failed")
        .expect("Order not found");
    assert_eq!(untouched.discount_code_id, None);
    assert_eq!(untouched.total_amount, dec("150.00"));
}

#[tokio::test]
#[serial_test::serial]
#[ignore = "needs a MySQL database (DATABASE_URL)"]
async fn test_variant_stock_returns_to_its_variant() {
    setup().await.expect("Setup failed");
    let fx = fixture(5).await;
    let shirt = listing_with_variants(&fx, vec![("S".to_string(), 3), ("M".to_string(), 2)]).await;
    let service = service();

    let mut request = order_request(shirt.listing_id, 1, None);
    request.items[0].size = Some("m".to_string());
    let order = service
        .create(&fx.student, request)
        .await
        .expect("Failed to create order");

    let items = OrderRepo::new()
        .get_items(order.order_id)
        .await
        .expect("Query failed");
    assert_eq!(items[0].size.as_deref(), Some("M"));
    assert!(items[0].variant_id.is_some());
    assert_eq!(variant_stock(shirt.listing_id, "M").await, 1);

    service
        .cancel(&fx.student, order.order_id)
        .await
        .expect("Failed to cancel order");

    assert_eq!(variant_stock(shirt.listing_id, "M").await, 2);
    assert_eq!(variant_stock(shirt.listing_id, "S").await, 3);
    assert_eq!(stock_of(shirt.listing_id).await, 0);
}

#[tokio::test]
#[serial_test::serial]
#[ignore = "needs a MySQL database (DATABASE_URL)"]
async fn test_listing_stock_returns_to_listing_after_variants_added() {
    setup().await.expect("Setup failed");
    let fx = fixture(5).await;
    let service = service();

    let mut request = order_request(fx.listing.listing_id, 1, None);
    request.items[0].size = Some("M".to_string());
    let order = service
        .create(&fx.student, request)
        .await
        .expect("Failed to create order");
    assert_eq!(stock_of(fx.listing.listing_id).await, 4);

    ListingRepo::new()
        .replace_variants(
            fx.listing.listing_id,
            vec![NewListingSizeVariant {
                listing_id: fx.listing.listing_id,
                size: "M".to_string(),
                stock_quantity: 7,
            }],
        )
        .await
        .expect("Failed to add variant");

    service
        .cancel(&fx.student, order.order_id)
        .await
        .expect("Failed to cancel order");

    assert_eq!(stock_of(fx.listing.listing_id).await, 5);
    assert_eq!(variant_stock(fx.listing.listing_id, "M").await, 7);
}
