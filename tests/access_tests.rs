use merch_hub_lib::data::models::roles::UserRole;
use merch_hub_lib::data::models::user::User;
use merch_hub_lib::security::access::{
    ANY_ROLE, STAFF, SUPERADMIN_ONLY, require_department, require_role,
};
use merch_hub_lib::security::errors::AccessDenied;
use merch_hub_lib::services::user_service::{
    permissions, session, validate_email, validate_name, validate_password,
};

fn user(id: i32, role: UserRole, department_id: Option<i32>) -> User {
    User {
        user_id: id,
        name: format!("User {id}"),
        email: format!("user{id}@example.com"),
        password_hash: String::new(),
        role,
        department_id,
        token_version: 0,
        created_at: None,
        updated_at: None,
    }
}

#[test]
fn test_role_parsing_and_labels() {
    assert_eq!("student".parse::<UserRole>().unwrap(), UserRole::Student);
    assert_eq!("Admin".parse::<UserRole>().unwrap(), UserRole::Admin);
    assert_eq!("superadmin".parse::<UserRole>().unwrap(), UserRole::SuperAdmin);
    assert!("owner".parse::<UserRole>().is_err());

    assert_eq!(UserRole::SuperAdmin.as_str(), "superadmin");
    assert!(UserRole::Admin.is_staff());
    assert!(!UserRole::Student.is_staff());
}

#[test]
fn test_role_serializes_lowercase() {
    let json = serde_json::to_string(&UserRole::SuperAdmin).unwrap();
    assert_eq!(json, "\"superadmin\"");

    let parsed: UserRole = serde_json::from_str("\"admin\"").unwrap();
    assert_eq!(parsed, UserRole::Admin);
}

#[test]
fn test_require_role() {
    let student = user(1, UserRole::Student, Some(1));
    let admin = user(2, UserRole::Admin, Some(1));
    let superadmin = user(3, UserRole::SuperAdmin, None);

    assert!(require_role(&student, ANY_ROLE).is_ok());
    assert!(require_role(&student, STAFF).is_err());
    assert!(require_role(&admin, STAFF).is_ok());
    assert!(require_role(&admin, SUPERADMIN_ONLY).is_err());
    assert!(require_role(&superadmin, SUPERADMIN_ONLY).is_ok());

    let err = require_role(&student, SUPERADMIN_ONLY).unwrap_err();
    assert_eq!(err, AccessDenied::Role(vec![UserRole::SuperAdmin]));
    assert_eq!(
        err.to_string(),
        "This action requires one of the roles: superadmin"
    );
}

#[test]
fn test_department_gate() {
    let admin = user(2, UserRole::Admin, Some(1));
    let superadmin = user(3, UserRole::SuperAdmin, None);
    let student = user(4, UserRole::Student, Some(1));

    assert!(admin.can_manage_department(1));
    assert!(!admin.can_manage_department(2));
    assert!(superadmin.can_manage_department(2));
    assert!(!student.can_manage_department(1));

    assert!(require_department(&admin, 1, "approve listings").is_ok());
    let err = require_department(&admin, 2, "approve listings").unwrap_err();
    assert_eq!(
        err.to_string(),
        "You do not have permission to approve listings for this department"
    );
}

#[test]
fn test_permissions_for_each_role() {
    let admin = user(2, UserRole::Admin, Some(5));
    let perms = permissions(&admin, Some("School of Engineering".to_string()));
    assert!(perms.is_admin);
    assert!(perms.can_approve_listings);
    assert!(!perms.can_manage_users);
    assert_eq!(perms.managed_department_id, Some(5));
    assert_eq!(
        perms.managed_department_name.as_deref(),
        Some("School of Engineering")
    );

    let superadmin = user(3, UserRole::SuperAdmin, Some(5));
    let perms = permissions(&superadmin, Some("School of Engineering".to_string()));
    assert!(perms.is_super_admin);
    assert!(perms.can_manage_departments);
    assert_eq!(perms.managed_department_id, None);

    let student = user(4, UserRole::Student, Some(5));
    let perms = permissions(&student, None);
    assert!(perms.is_student);
    assert!(perms.can_create_listings);
    assert!(!perms.can_approve_listings);
}

#[test]
fn test_permissions_serialize_camel_case() {
    let admin = user(2, UserRole::Admin, Some(5));
    let json = serde_json::to_value(permissions(&admin, None)).unwrap();

    assert_eq!(json["isAdmin"], true);
    assert_eq!(json["managedDepartmentId"], 5);
    assert!(json.get("managedDepartmentName").is_none());
}

#[test]
fn test_session_carries_department() {
    let student = user(7, UserRole::Student, Some(2));
    let s = session(&student, Some("School of Humanities".to_string()));

    assert_eq!(s.user_id, "7");
    assert_eq!(s.role, UserRole::Student);
    assert_eq!(s.department_id, Some(2));
    assert_eq!(s.department_name.as_deref(), Some("School of Humanities"));
}

#[test]
fn test_user_field_validation() {
    assert!(validate_name("Juan dela Cruz").is_ok());
    assert!(validate_name("   ").is_err());
    assert!(validate_name(&"x".repeat(256)).is_err());

    assert!(validate_email("student@udd.edu.ph").is_ok());
    assert!(validate_email("no-at-sign").is_err());
    assert!(validate_email("a@b").is_err());
    assert!(validate_email("with space@udd.edu").is_err());

    assert!(validate_password("secret").is_ok());
    assert!(validate_password("short").is_err());
}
