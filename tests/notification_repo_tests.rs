use bigdecimal::BigDecimal;
use diesel::result;
use diesel_async::RunQueryDsl;
use merch_hub_lib::data::database::Database;
use merch_hub_lib::data::models::department::NewDepartment;
use merch_hub_lib::data::models::order::{Order, OrderStatus};
use merch_hub_lib::data::models::roles::UserRole;
use merch_hub_lib::data::models::user::{NewUser, User};
use merch_hub_lib::data::repos::implementors::department_repo::DepartmentRepo;
use merch_hub_lib::data::repos::implementors::user_repo::UserRepo;
use merch_hub_lib::services::errors::NotificationServiceError;
use merch_hub_lib::services::notification_service::NotificationService;

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

struct People {
    root_a: User,
    root_b: User,
    admin_a: User,
    admin_b: User,
    outside_admin: User,
    student: User,
    department_id: i32,
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

async fn people() -> People {
    let departments = DepartmentRepo::new();
    let mut ids = Vec::new();
    for name in ["School of Engineering", "School of Business"] {
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

    People {
        root_a: create_user("root-a@example.com", UserRole::SuperAdmin, ids[0]).await,
        root_b: create_user("root-b@example.com", UserRole::SuperAdmin, ids[1]).await,
        admin_a: create_user("admin-a@example.com", UserRole::Admin, ids[0]).await,
        admin_b: create_user("admin-b@example.com", UserRole::Admin, ids[0]).await,
        outside_admin: create_user("admin-biz@example.com", UserRole::Admin, ids[1]).await,
        student: create_user("student@example.com", UserRole::Student, ids[0]).await,
        department_id: ids[0],
    }
}

fn order_for(people: &People) -> Order {
    Order {
        order_id: 501,
        order_number: "ORD-20250615-NOTIFY".to_string(),
        user_id: people.student.user_id,
        email: "student@example.com".to_string(),
        department_id: people.department_id,
        total_amount: BigDecimal::from(150),
        original_amount: BigDecimal::from(150),
        discount_code_id: None,
        discount_amount: BigDecimal::from(0),
        reservation_fee_amount: "52.50".parse().unwrap(),
        reservation_fee_paid: false,
        payment_receipt_path: None,
        status: OrderStatus::Pending,
        pickup_date: None,
        notes: None,
        payment_method: "cash_on_pickup".to_string(),
        email_sent: false,
        rating: None,
        review: None,
        created_at: None,
        updated_at: None,
    }
}

async fn notified(people: &People) -> NotificationService {
    let service = NotificationService::new();
    service
        .notify_order_created(&order_for(people), &people.student, "School of Engineering")
        .await;
    service
}

async fn count_for(service: &NotificationService, user: &User) -> usize {
    service
        .list(user, None)
        .await
        .expect("Failed to list notifications")
        .0
        .len()
}

#[tokio::test]
#[serial_test::serial]
#[ignore = "needs a MySQL database (DATABASE_URL)"]
async fn test_fan_out_gives_each_recipient_one_row() {
    setup().await.expect("Setup failed");
    let people = people().await;
    let service = notified(&people).await;

    for user in [&people.root_a, &people.root_b, &people.admin_a, &people.admin_b, &people.student] {
        let (rows, unread) = service.list(user, None).await.expect("Failed to list");
        assert_eq!(rows.len(), 1, "{}", user.email);
        assert_eq!(unread, 1);
        assert_eq!(rows[0].user_id, Some(user.user_id));
    }

    assert_eq!(count_for(&service, &people.outside_admin).await, 0);
}

#[tokio::test]
#[serial_test::serial]
#[ignore = "needs a MySQL database (DATABASE_URL)"]
async fn test_mark_read_only_touches_own_rows() {
    setup().await.expect("Setup failed");
    let people = people().await;
    let service = notified(&people).await;

    let (others, _) = service.list(&people.root_b, None).await.expect("Failed to list");
    let foreign_id = others[0].notification_id;

    let marked = service
        .mark_read(&people.root_a, Some(vec![foreign_id]))
        .await
        .expect("Failed to mark read");
    assert_eq!(marked, 0);

    let marked = service
        .mark_read(&people.root_a, None)
        .await
        .expect("Failed to mark read");
    assert_eq!(marked, 1);

    assert_eq!(service.unread_count(&people.root_a).await.unwrap(), 0);
    assert_eq!(service.unread_count(&people.root_b).await.unwrap(), 1);

    assert!(matches!(
        service.mark_one_read(&people.root_a, foreign_id).await,
        Err(NotificationServiceError::NotificationNotFound)
    ));
    assert_eq!(service.unread_count(&people.root_b).await.unwrap(), 1);
}

#[tokio::test]
#[serial_test::serial]
#[ignore = "needs a MySQL database (DATABASE_URL)"]
async fn test_delete_only_touches_own_rows() {
    setup().await.expect("Setup failed");
    let people = people().await;
    let service = notified(&people).await;

    let (theirs, _) = service.list(&people.admin_b, None).await.expect("Failed to list");
    assert!(matches!(
        service.delete(&people.admin_a, theirs[0].notification_id).await,
        Err(NotificationServiceError::NotificationNotFound)
    ));

    let deleted = service.delete_all(&people.admin_a).await.expect("Failed to clear");
    assert_eq!(deleted, 1);

    assert_eq!(count_for(&service, &people.admin_a).await, 0);
    assert_eq!(count_for(&service, &people.admin_b).await, 1);
    assert_eq!(count_for(&service, &people.root_a).await, 1);
    assert_eq!(count_for(&service, &people.student).await, 1);
}
