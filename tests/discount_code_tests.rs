use bigdecimal::BigDecimal;
use chrono::{Duration, NaiveDateTime};
use merch_hub_lib::api::controllers::dto::discount_code_dto::DiscountCodeRequest;
use merch_hub_lib::data::models::discount_code::{DiscountCode, DiscountRejection, DiscountType};
use merch_hub_lib::data::models::roles::UserRole;
use merch_hub_lib::data::models::user::User;
use merch_hub_lib::services::discount_code_service::{
    CodeFilter, random_code, resolve_scope, stats_for, validate_request,
};
use merch_hub_lib::services::errors::DiscountCodeServiceError;
use std::str::FromStr;

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

fn now() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2025-06-15 10:00:00", "%Y-%m-%d %H:%M:%S").unwrap()
}

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

fn code(department_id: Option<i32>) -> DiscountCode {
    DiscountCode {
        discount_code_id: 1,
        code: "WELCOME10".to_string(),
        discount_type: DiscountType::Percentage,
        value: dec("10"),
        description: None,
        created_by: 1,
        department_id,
        is_udd_official: department_id.is_none(),
        usage_limit: None,
        usage_count: 0,
        minimum_order_amount: None,
        valid_from: None,
        valid_until: None,
        is_active: true,
        created_at: None,
        updated_at: None,
    }
}

fn request(value: &str) -> DiscountCodeRequest {
    DiscountCodeRequest {
        code: "summer25".to_string(),
        discount_type: DiscountType::Percentage,
        value: dec(value),
        description: None,
        department_id: None,
        is_udd_official: false,
        usage_limit: None,
        minimum_order_amount: None,
        valid_from: None,
        valid_until: None,
        is_active: None,
    }
}

fn validation_message(result: Result<(), DiscountCodeServiceError>) -> String {
    match result {
        Err(DiscountCodeServiceError::Validation(msg)) => msg,
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[test]
fn test_code_validity_window_and_usage() {
    let mut c = code(Some(3));
    assert!(c.is_valid(now()));

    c.valid_from = Some(now() + Duration::days(1));
    assert!(!c.is_valid(now()));

    c.valid_from = Some(now() - Duration::days(10));
    c.valid_until = Some(now() - Duration::days(1));
    assert!(!c.is_valid(now()));
    assert!(c.is_expired(now()));

    c.valid_until = None;
    c.usage_limit = Some(2);
    c.usage_count = 2;
    assert!(c.is_exhausted());
    assert!(!c.is_valid(now()));

    c.usage_count = 1;
    c.is_active = false;
    assert!(!c.is_valid(now()));
}

#[test]
fn test_check_order_rejections() {
    let mut c = code(Some(3));
    c.minimum_order_amount = Some(dec("500"));

    assert_eq!(
        c.check_order(&dec("300"), 3, now()),
        Err(DiscountRejection::BelowMinimum(dec("500.00")))
    );
    assert_eq!(
        c.check_order(&dec("600"), 4, now()),
        Err(DiscountRejection::WrongDepartment)
    );
    assert_eq!(c.check_order(&dec("600"), 3, now()), Ok(()));

    c.is_active = false;
    assert_eq!(c.check_order(&dec("600"), 3, now()), Err(DiscountRejection::Invalid));
}

#[test]
fn test_official_code_applies_to_every_department() {
    let c = code(None);

    assert!(c.can_be_used_for_order(&dec("100"), 3, now()));
    assert!(c.can_be_used_for_order(&dec("100"), 7, now()));
}

#[test]
fn test_calculate_discount_rounds_and_caps() {
    let mut c = code(None);
    c.value = dec("12.5");
    assert_eq!(c.calculate_discount(&dec("199.99")), dec("25.00"));

    c.discount_type = DiscountType::Fixed;
    c.value = dec("500");
    assert_eq!(c.calculate_discount(&dec("120")), dec("120.00"));
}

#[test]
fn test_visibility_and_edit_rights() {
    let superadmin = user(1, UserRole::SuperAdmin, None);
    let admin = user(2, UserRole::Admin, Some(3));
    let other_admin = user(3, UserRole::Admin, Some(4));
    let student = user(4, UserRole::Student, Some(3));

    let dept_code = code(Some(3));
    let official = code(None);

    assert!(dept_code.can_be_edited_by(&superadmin));
    assert!(dept_code.can_be_edited_by(&admin));
    assert!(!dept_code.can_be_edited_by(&other_admin));
    assert!(!dept_code.can_be_edited_by(&student));

    assert!(dept_code.is_visible_to(&student));
    assert!(official.is_visible_to(&student));
    assert!(!code(Some(4)).is_visible_to(&student));

    assert!(DiscountCode::can_be_created_by(&admin, Some(3)));
    assert!(!DiscountCode::can_be_created_by(&admin, Some(4)));
    assert!(!DiscountCode::can_be_created_by(&student, None));
}

#[test]
fn test_validate_request_bounds() {
    assert!(validate_request(&request("25")).is_ok());
    assert!(validate_request(&request("100")).is_ok());

    assert_eq!(
        validation_message(validate_request(&request("150"))),
        "Percentage discount cannot exceed 100%"
    );
    assert_eq!(
        validation_message(validate_request(&request("-1"))),
        "The value must be at least 0."
    );

    let mut fixed = request("10");
    fixed.discount_type = DiscountType::Fixed;
    assert_eq!(
        validation_message(validate_request(&fixed)),
        "The selected type is invalid."
    );

    let mut blank = request("10");
    blank.code = "   ".to_string();
    assert_eq!(
        validation_message(validate_request(&blank)),
        "The code field is required."
    );

    let mut zero_limit = request("10");
    zero_limit.usage_limit = Some(0);
    assert!(validate_request(&zero_limit).is_err());

    let mut backwards = request("10");
    backwards.valid_from = Some(now());
    backwards.valid_until = Some(now() - Duration::hours(1));
    assert!(validate_request(&backwards).is_err());
}

#[test]
fn test_resolve_scope_for_admins() {
    let admin = user(2, UserRole::Admin, Some(3));

    assert_eq!(resolve_scope(&admin, None, false).unwrap(), Some(3));
    assert_eq!(resolve_scope(&admin, Some(3), false).unwrap(), Some(3));
    assert!(matches!(
        resolve_scope(&admin, Some(4), false),
        Err(DiscountCodeServiceError::AccessDenied(_))
    ));
    assert!(matches!(
        resolve_scope(&admin, None, true),
        Err(DiscountCodeServiceError::AccessDenied(_))
    ));
}

#[test]
fn test_resolve_scope_for_superadmins() {
    let superadmin = user(1, UserRole::SuperAdmin, None);

    assert_eq!(resolve_scope(&superadmin, Some(5), false).unwrap(), Some(5));
    assert_eq!(resolve_scope(&superadmin, Some(5), true).unwrap(), None);
    assert_eq!(resolve_scope(&superadmin, None, false).unwrap(), None);
}

#[test]
fn test_random_code_shape() {
    let generated = random_code("merch", 10).unwrap();

    assert_eq!(generated.len(), 10);
    assert!(generated.starts_with("MERCH"));
    assert!(
        generated
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    );

    assert_eq!(random_code("", 8).unwrap().len(), 8);
}

#[test]
fn test_random_code_limits() {
    assert!(random_code("", 3).is_err());
    assert!(random_code("", 21).is_err());
    assert!(random_code("ABCDEFGHIJK", 20).is_err());
    assert!(random_code("ABCD", 4).is_err());
}

#[test]
fn test_stats_for_counts() {
    let mut used = code(Some(3));
    used.usage_count = 4;

    let mut expired = code(Some(3));
    expired.valid_until = Some(now() - Duration::days(2));
    expired.is_active = false;

    let mut fresh = code(None);
    fresh.usage_count = 1;

    let stats = stats_for(&[used, expired, fresh], now());

    assert_eq!(stats.total_codes, 3);
    assert_eq!(stats.active_codes, 2);
    assert_eq!(stats.expired_codes, 1);
    assert_eq!(stats.used_codes, 2);
    assert_eq!(stats.total_usage, 5);
    assert_eq!(stats.by_department, None);
}

#[test]
fn test_code_filter_parse() {
    assert_eq!(CodeFilter::parse(Some("active")), Some(CodeFilter::Active));
    assert_eq!(CodeFilter::parse(Some("valid")), Some(CodeFilter::Valid));
    assert_eq!(CodeFilter::parse(Some("all")), None);
    assert_eq!(CodeFilter::parse(None), None);
}
