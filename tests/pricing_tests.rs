use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use merch_hub_lib::data::models::discount_code::{DiscountCode, DiscountType};
use merch_hub_lib::data::models::listing::{Listing, ListingStatus};
use merch_hub_lib::data::models::listing_size_variant::ListingSizeVariant;
use merch_hub_lib::data::repos::implementors::order_repo::StockSource;
use merch_hub_lib::services::pricing::{
    Breakdown, CartLine, PricingError, StockedListing, original_amount, price_lines, quote,
};
use std::collections::HashMap;
use std::str::FromStr;

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

fn now() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2025-06-15 10:00:00", "%Y-%m-%d %H:%M:%S").unwrap()
}

fn listing(id: i32, department_id: i32, price: &str, stock: i32) -> Listing {
    Listing {
        listing_id: id,
        title: format!("Listing {id}"),
        description: None,
        image_path: None,
        department_id,
        category_id: 1,
        user_id: 1,
        price: dec(price),
        size: None,
        status: ListingStatus::Approved,
        stock_quantity: stock,
        created_at: None,
        updated_at: None,
    }
}

fn variant(id: i32, listing_id: i32, size: &str, stock: i32) -> ListingSizeVariant {
    ListingSizeVariant {
        variant_id: id,
        listing_id,
        size: size.to_string(),
        stock_quantity: stock,
        created_at: None,
        updated_at: None,
    }
}

fn catalog(entries: Vec<(Listing, Vec<ListingSizeVariant>)>) -> HashMap<i32, StockedListing> {
    entries
        .into_iter()
        .map(|(listing, variants)| (listing.listing_id, StockedListing { listing, variants }))
        .collect()
}

fn line(listing_id: i32, quantity: i32, size: Option<&str>) -> CartLine {
    CartLine {
        listing_id,
        quantity,
        size: size.map(str::to_string),
    }
}

fn percent_code(value: &str, department_id: Option<i32>) -> DiscountCode {
    DiscountCode {
        discount_code_id: 9,
        code: "SAVE10".to_string(),
        discount_type: DiscountType::Percentage,
        value: dec(value),
        description: None,
        created_by: 1,
        department_id,
        is_udd_official: false,
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

#[test]
fn test_price_lines_uses_listing_stock() {
    let listings = catalog(vec![(listing(1, 3, "150.00", 10), vec![])]);

    let (department_id, lines) = price_lines(&[line(1, 2, None)], &listings).unwrap();

    assert_eq!(department_id, 3);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].subtotal, dec("300.00"));
    assert_eq!(lines[0].unit_price, dec("150.00"));
    assert_eq!(lines[0].stock, Some(StockSource::Listing(1)));
}

#[test]
fn test_price_lines_matches_size_variant_case_insensitively() {
    let listings = catalog(vec![(
        listing(1, 3, "250.00", 0),
        vec![variant(11, 1, "S", 2), variant(12, 1, "M", 4)],
    )]);

    let (_, lines) = price_lines(&[line(1, 3, Some("m"))], &listings).unwrap();

    assert_eq!(lines[0].stock, Some(StockSource::Variant(12)));
    assert_eq!(lines[0].size.as_deref(), Some("M"));
    assert_eq!(lines[0].subtotal, dec("750.00"));
}

#[test]
fn test_price_lines_keeps_given_size_without_variants() {
    let listings = catalog(vec![(listing(1, 3, "250.00", 5), vec![])]);

    let (_, lines) = price_lines(&[line(1, 1, Some("XL"))], &listings).unwrap();

    assert_eq!(lines[0].stock, Some(StockSource::Listing(1)));
    assert_eq!(lines[0].size.as_deref(), Some("XL"));
}

#[test]
fn test_price_lines_rejects_unknown_size() {
    let listings = catalog(vec![(listing(1, 3, "250.00", 0), vec![variant(11, 1, "S", 2)])]);

    let result = price_lines(&[line(1, 1, Some("XL"))], &listings);

    assert_eq!(
        result.unwrap_err(),
        PricingError::SizeUnavailable {
            size: "XL".to_string(),
            title: "Listing 1".to_string(),
        }
    );
}

#[test]
fn test_zero_stock_is_a_pre_order() {
    let listings = catalog(vec![(listing(1, 3, "99.50", 0), vec![])]);

    let (_, lines) = price_lines(&[line(1, 5, None)], &listings).unwrap();

    assert_eq!(lines[0].stock, None);
    assert_eq!(lines[0].subtotal, dec("497.50"));
}

#[test]
fn test_insufficient_stock_is_rejected() {
    let listings = catalog(vec![(listing(1, 3, "99.50", 1), vec![])]);

    let result = price_lines(&[line(1, 2, None)], &listings);

    assert_eq!(
        result.unwrap_err(),
        PricingError::InsufficientStock("Listing 1".to_string())
    );
}

#[test]
fn test_mixed_departments_are_rejected() {
    let listings = catalog(vec![
        (listing(1, 3, "10.00", 5), vec![]),
        (listing(2, 4, "10.00", 5), vec![]),
    ]);

    let result = price_lines(&[line(1, 1, None), line(2, 1, None)], &listings);

    assert_eq!(result.unwrap_err(), PricingError::MixedDepartments);
}

#[test]
fn test_pending_listing_is_unavailable() {
    let mut pending = listing(1, 3, "10.00", 5);
    pending.status = ListingStatus::Pending;
    let listings = catalog(vec![(pending, vec![])]);

    let result = price_lines(&[line(1, 1, None)], &listings);

    assert_eq!(result.unwrap_err(), PricingError::ListingUnavailable(1));
}

#[test]
fn test_empty_cart_and_bad_quantity() {
    let listings = catalog(vec![(listing(1, 3, "10.00", 5), vec![])]);

    assert_eq!(price_lines(&[], &listings).unwrap_err(), PricingError::EmptyOrder);
    assert_eq!(
        price_lines(&[line(1, 0, None)], &listings).unwrap_err(),
        PricingError::InvalidQuantity
    );
}

#[test]
fn test_quote_applies_percentage_discount_and_fee() {
    let listings = catalog(vec![
        (listing(1, 3, "150.00", 10), vec![]),
        (listing(2, 3, "50.00", 10), vec![]),
    ]);
    let code = percent_code("10", Some(3));

    let quote = quote(
        &[line(1, 2, None), line(2, 1, None)],
        &listings,
        Some(&code),
        now(),
    )
    .unwrap();

    assert_eq!(original_amount(&quote.lines), dec("350.00"));
    assert_eq!(quote.discount_code_id, Some(9));
    assert_eq!(quote.totals.original_amount, dec("350.00"));
    assert_eq!(quote.totals.discount_amount, dec("35.00"));
    assert_eq!(quote.totals.final_amount, dec("315.00"));
    assert_eq!(quote.totals.reservation_fee_amount, dec("110.25"));
    assert_eq!(quote.totals.remaining_balance, dec("204.75"));
}

#[test]
fn test_quote_ignores_code_for_other_department() {
    let listings = catalog(vec![(listing(1, 3, "100.00", 10), vec![])]);
    let code = percent_code("10", Some(4));

    let quote = quote(&[line(1, 1, None)], &listings, Some(&code), now()).unwrap();

    assert_eq!(quote.discount_code_id, None);
    assert_eq!(quote.totals.discount_amount, dec("0.00"));
    assert_eq!(quote.totals.final_amount, dec("100.00"));
    assert_eq!(quote.totals.reservation_fee_amount, dec("35.00"));
}

#[test]
fn test_breakdown_caps_discount_at_original() {
    let breakdown = Breakdown::new(&dec("80"), &dec("120"));

    assert_eq!(breakdown.discount_amount, dec("80.00"));
    assert_eq!(breakdown.final_amount, dec("0.00"));
    assert_eq!(breakdown.reservation_fee_amount, dec("0.00"));
    assert_eq!(breakdown.remaining_balance, dec("0.00"));
}
