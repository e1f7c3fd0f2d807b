use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use merch_hub_lib::api::controllers::dto::order_dto::{CreateOrderRequest, OrderItemRequest};
use merch_hub_lib::data::models::order::{
    Order, OrderStatus, PAYMENT_METHOD_CASH_ON_PICKUP, generate_order_number,
};
use merch_hub_lib::services::errors::OrderServiceError;
use merch_hub_lib::services::order_service::{validate_create_request, validate_rating};
use std::str::FromStr;

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

fn order(status: OrderStatus) -> Order {
    Order {
        order_id: 1,
        order_number: "ORD-20250615-ABC123".to_string(),
        user_id: 1,
        email: "buyer@example.com".to_string(),
        department_id: 1,
        total_amount: dec("180.00"),
        original_amount: dec("200.00"),
        discount_code_id: Some(3),
        discount_amount: dec("20.00"),
        reservation_fee_amount: dec("63.00"),
        reservation_fee_paid: false,
        payment_receipt_path: None,
        status,
        pickup_date: None,
        notes: None,
        payment_method: PAYMENT_METHOD_CASH_ON_PICKUP.to_string(),
        email_sent: false,
        rating: None,
        review: None,
        created_at: None,
        updated_at: None,
    }
}

fn create_request() -> CreateOrderRequest {
    CreateOrderRequest {
        items: vec![OrderItemRequest {
            listing_id: 1,
            quantity: 1,
            size: Some("M".to_string()),
        }],
        email: "buyer@example.com".to_string(),
        notes: None,
        discount_code: None,
    }
}

#[test]
fn test_status_round_trips_through_strings() {
    for status in OrderStatus::ALL {
        assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
    }
    assert!("shipped".parse::<OrderStatus>().is_err());
    assert_eq!(OrderStatus::ReadyForPickup.display_name(), "Ready for Pickup");
}

#[test]
fn test_cancellable_statuses() {
    assert!(order(OrderStatus::Pending).can_be_cancelled());
    assert!(order(OrderStatus::Confirmed).can_be_cancelled());
    assert!(!order(OrderStatus::ReadyForPickup).can_be_cancelled());
    assert!(!order(OrderStatus::Completed).can_be_cancelled());
    assert!(!order(OrderStatus::Cancelled).can_be_cancelled());
}

#[test]
fn test_confirmation_needs_paid_fee() {
    let mut o = order(OrderStatus::Pending);
    assert!(!o.can_be_confirmed());

    o.reservation_fee_paid = true;
    assert!(o.can_be_confirmed());

    o.status = OrderStatus::Confirmed;
    assert!(!o.can_be_confirmed());
}

#[test]
fn test_discount_figures() {
    let o = order(OrderStatus::Pending);

    assert!(o.has_discount());
    assert_eq!(o.discount_percentage(), dec("10.00"));
    assert_eq!(o.remaining_balance(), dec("117.00"));

    let mut plain = order(OrderStatus::Pending);
    plain.discount_code_id = None;
    plain.discount_amount = dec("0");
    assert!(!plain.has_discount());
}

#[test]
fn test_order_number_format() {
    let now = NaiveDateTime::parse_from_str("2025-06-15 08:30:00", "%Y-%m-%d %H:%M:%S").unwrap();
    let number = generate_order_number(now);

    assert_eq!(number.len(), "ORD-20250615-XXXXXX".len());
    assert!(number.starts_with("ORD-20250615-"));
    assert!(
        number[13..]
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    );
}

#[test]
fn test_create_request_validation() {
    assert!(validate_create_request(&create_request()).is_ok());

    let mut empty = create_request();
    empty.items.clear();
    assert!(matches!(
        validate_create_request(&empty),
        Err(OrderServiceError::Validation(_))
    ));

    let mut bad_email = create_request();
    bad_email.email = "buyer".to_string();
    assert!(validate_create_request(&bad_email).is_err());

    let mut long_notes = create_request();
    long_notes.notes = Some("n".repeat(501));
    assert!(validate_create_request(&long_notes).is_err());

    let mut long_size = create_request();
    long_size.items[0].size = Some("EXTRA-EXTRA-LARGE".to_string());
    assert!(validate_create_request(&long_size).is_err());
}

#[test]
fn test_rating_validation() {
    assert!(validate_rating(1, None).is_ok());
    assert!(validate_rating(5, Some("Great hoodie")).is_ok());
    assert!(validate_rating(0, None).is_err());
    assert!(validate_rating(6, None).is_err());
    assert!(validate_rating(4, Some(&"r".repeat(501))).is_err());
}
