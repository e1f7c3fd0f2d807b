use diesel::result;
use diesel_async::RunQueryDsl;
use merch_hub_lib::api::controllers::dto::user_dto::RegisterRequest;
use merch_hub_lib::data::database::Database;
use merch_hub_lib::data::models::department::NewDepartment;
use merch_hub_lib::data::models::roles::UserRole;
use merch_hub_lib::data::repos::implementors::department_repo::DepartmentRepo;
use merch_hub_lib::services::errors::UserServiceError;
use merch_hub_lib::services::user_service::UserService;

fn request(password: &str, confirmation: &str, role: UserRole, department_id: i32) -> RegisterRequest {
    RegisterRequest {
        name: "Juan Dela Cruz".to_string(),
        email: "Juan@Example.com".to_string(),
        password: password.to_string(),
        password_confirmation: confirmation.to_string(),
        department_id,
        role,
    }
}

fn validation_message(result: Result<impl Sized, UserServiceError>) -> String {
    match result {
        Err(UserServiceError::Validation(message)) => message,
        Err(other) => panic!("expected a validation error, got {other:?}"),
        Ok(_) => panic!("expected a validation error, got success"),
    }
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let result = UserService::new()
        .register(request("abc", "abc", UserRole::Student, 1))
        .await;

    assert_eq!(
        validation_message(result),
        "The password must be at least 6 characters."
    );
}

#[tokio::test]
async fn test_register_rejects_mismatched_confirmation() {
    let result = UserService::new()
        .register(request("secret123", "secret321", UserRole::Student, 1))
        .await;

    assert_eq!(
        validation_message(result),
        "The password confirmation does not match."
    );
}

#[tokio::test]
async fn test_register_refuses_superadmin_role() {
    let result = UserService::new()
        .register(request("secret123", "secret123", UserRole::SuperAdmin, 1))
        .await;

    assert_eq!(validation_message(result), "The selected role is invalid.");
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

#[tokio::test]
#[serial_test::serial]
#[ignore = "needs a MySQL database (DATABASE_URL, JWT_SECRET)"]
async fn test_register_then_duplicate_email() {
    setup().await.expect("Setup failed");
    let dept = DepartmentRepo::new()
        .create(NewDepartment {
            name: "School of Engineering",
            description: None,
            logo_path: None,
            gcash_qr_image_path: None,
        })
        .await
        .expect("Failed to create department");
    let service = UserService::new();

    let (user, token) = service
        .register(request("secret123", "secret123", UserRole::Student, dept.department_id))
        .await
        .expect("Failed to register");

    assert_eq!(user.email, "juan@example.com");
    assert_eq!(user.role, UserRole::Student);
    assert!(!token.is_empty());

    assert!(matches!(
        service
            .register(request("secret123", "secret123", UserRole::Student, dept.department_id))
            .await,
        Err(UserServiceError::EmailTaken)
    ));

    assert!(matches!(
        service
            .register(request("secret123", "secret123", UserRole::Student, dept.department_id + 999))
            .await,
        Err(UserServiceError::DepartmentNotFound)
    ));
}
