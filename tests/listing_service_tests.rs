use bigdecimal::BigDecimal;
use merch_hub_lib::api::controllers::dto::listing_dto::SizeVariantInput;
use merch_hub_lib::data::models::listing::{Listing, ListingStatus};
use merch_hub_lib::data::models::listing_size_variant::ListingSizeVariant;
use merch_hub_lib::data::models::roles::UserRole;
use merch_hub_lib::data::models::user::User;
use merch_hub_lib::services::errors::ListingServiceError;
use merch_hub_lib::services::listing_service::{
    normalize_variants, parse_size_variants, resolve_department, total_stock,
};

fn user(role: UserRole, department_id: Option<i32>) -> User {
    User {
        user_id: 1,
        name: "Lister".to_string(),
        email: "lister@example.com".to_string(),
        password_hash: String::new(),
        role,
        department_id,
        token_version: 0,
        created_at: None,
        updated_at: None,
    }
}

fn listing(stock: i32) -> Listing {
    Listing {
        listing_id: 1,
        title: "Department Shirt".to_string(),
        description: None,
        image_path: None,
        department_id: 1,
        category_id: 1,
        user_id: 1,
        price: BigDecimal::from(350),
        size: None,
        status: ListingStatus::Approved,
        stock_quantity: stock,
        created_at: None,
        updated_at: None,
    }
}

fn variant(size: &str, stock: i32) -> ListingSizeVariant {
    ListingSizeVariant {
        variant_id: 1,
        listing_id: 1,
        size: size.to_string(),
        stock_quantity: stock,
        created_at: None,
        updated_at: None,
    }
}

#[test]
fn test_parse_size_variants_drops_empty_entries() {
    let parsed = parse_size_variants(Some(
        r#"[{"size":" S ","stock_quantity":3},{"size":"M","stock_quantity":0},{"size":"","stock_quantity":2}]"#,
    ))
    .unwrap();

    assert_eq!(
        parsed,
        vec![SizeVariantInput {
            size: "S".to_string(),
            stock_quantity: 3,
        }]
    );
}

#[test]
fn test_parse_size_variants_blank_is_empty() {
    assert!(parse_size_variants(None).unwrap().is_empty());
    assert!(parse_size_variants(Some("  ")).unwrap().is_empty());
}

#[test]
fn test_parse_size_variants_rejects_bad_json() {
    assert!(matches!(
        parse_size_variants(Some("{not json")),
        Err(ListingServiceError::Validation(_))
    ));
}

#[test]
fn test_duplicate_sizes_are_rejected() {
    let result = normalize_variants(vec![
        SizeVariantInput {
            size: "L".to_string(),
            stock_quantity: 1,
        },
        SizeVariantInput {
            size: "l".to_string(),
            stock_quantity: 2,
        },
    ]);

    assert!(matches!(result, Err(ListingServiceError::Validation(_))));
}

#[test]
fn test_long_size_is_rejected() {
    let result = normalize_variants(vec![SizeVariantInput {
        size: "EXTRA-EXTRA-LARGE".to_string(),
        stock_quantity: 1,
    }]);

    assert!(result.is_err());
}

#[test]
fn test_resolve_department() {
    let student = user(UserRole::Student, Some(2));
    assert_eq!(resolve_department(&student, None).unwrap(), 2);
    assert_eq!(resolve_department(&student, Some(9)).unwrap(), 2);

    let admin = user(UserRole::Admin, Some(2));
    assert_eq!(resolve_department(&admin, Some(2)).unwrap(), 2);
    assert!(matches!(
        resolve_department(&admin, Some(3)),
        Err(ListingServiceError::AccessDenied(_))
    ));

    let superadmin = user(UserRole::SuperAdmin, None);
    assert_eq!(resolve_department(&superadmin, Some(3)).unwrap(), 3);
    assert!(matches!(
        resolve_department(&superadmin, None),
        Err(ListingServiceError::Validation(_))
    ));
}

#[test]
fn test_total_stock() {
    assert_eq!(total_stock(&listing(7), &[]), 7);
    assert_eq!(
        total_stock(&listing(7), &[variant("S", 2), variant("M", 5)]),
        7
    );
    assert_eq!(total_stock(&listing(0), &[variant("XL", 4)]), 4);
}
