use bigdecimal::BigDecimal;
use chrono::{Duration, NaiveDateTime};
use merch_hub_lib::api::controllers::dto::order_dto::SalesReportQuery;
use merch_hub_lib::data::models::order::{Order, OrderStatus};
use merch_hub_lib::data::models::order_item::OrderItem;
use merch_hub_lib::services::dashboard_service::{
    daily_breakdown, department_breakdown, order_rows, sales_filter, summarize,
};
use merch_hub_lib::services::errors::DashboardServiceError;
use std::collections::HashMap;
use std::str::FromStr;

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

fn at(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn order(id: i32, department_id: i32, total: &str, created: &str) -> Order {
    Order {
        order_id: id,
        order_number: format!("ORD-20250601-{id:06}"),
        user_id: 1,
        email: "buyer@example.com".to_string(),
        department_id,
        total_amount: dec(total),
        original_amount: dec(total),
        discount_code_id: None,
        discount_amount: dec("0"),
        reservation_fee_amount: dec("0"),
        reservation_fee_paid: true,
        payment_receipt_path: None,
        status: OrderStatus::Completed,
        pickup_date: None,
        notes: None,
        payment_method: "cash_on_pickup".to_string(),
        email_sent: true,
        rating: None,
        review: None,
        created_at: Some(at(created)),
        updated_at: None,
    }
}

fn item(order_id: i32, listing_id: i32, quantity: i32) -> OrderItem {
    OrderItem {
        order_item_id: order_id * 10 + listing_id,
        order_id,
        listing_id,
        quantity,
        size: None,
        price: dec("100"),
        subtotal: dec("100") * BigDecimal::from(quantity),
        stock_reserved: true,
        variant_id: None,
        created_at: None,
        updated_at: None,
    }
}

fn query(department: Option<&str>, range: Option<&str>, start: Option<&str>, end: Option<&str>) -> SalesReportQuery {
    SalesReportQuery {
        department: department.map(str::to_string),
        date_range: range.map(str::to_string),
        start_date: start.map(str::to_string),
        end_date: end.map(str::to_string),
    }
}

fn names() -> HashMap<i32, String> {
    HashMap::from([
        (1, "School of Humanities".to_string()),
        (2, "School of Criminology".to_string()),
    ])
}

#[test]
fn test_sales_filter_defaults_to_everything() {
    let filter = sales_filter(&query(None, None, None, None), at("2025-06-15 12:00:00")).unwrap();

    assert_eq!(filter.department_id, None);
    assert_eq!(filter.from, None);
    assert_eq!(filter.until, None);

    let filter = sales_filter(&query(Some("all"), Some("all"), None, None), at("2025-06-15 12:00:00")).unwrap();
    assert_eq!(filter.department_id, None);
}

#[test]
fn test_sales_filter_weekly_and_monthly() {
    let now = at("2025-06-15 12:00:00");

    let weekly = sales_filter(&query(Some("2"), Some("weekly"), None, None), now).unwrap();
    assert_eq!(weekly.department_id, Some(2));
    assert_eq!(weekly.from, Some(now - Duration::days(7)));

    let monthly = sales_filter(&query(None, Some("monthly"), None, None), now).unwrap();
    assert_eq!(monthly.from, Some(at("2025-05-15 12:00:00")));
    assert_eq!(monthly.until, None);
}

#[test]
fn test_monthly_window_is_one_calendar_month() {
    let end_of_march = at("2025-03-31 08:30:00");

    let filter = sales_filter(&query(None, Some("monthly"), None, None), end_of_march).unwrap();

    assert_eq!(filter.from, Some(at("2025-02-28 08:30:00")));
}

#[test]
fn test_sales_filter_custom_range_covers_end_day() {
    let filter = sales_filter(
        &query(None, Some("custom"), Some("2025-06-01"), Some("2025-06-10")),
        at("2025-06-15 12:00:00"),
    )
    .unwrap();

    assert_eq!(filter.from, Some(at("2025-06-01 00:00:00")));
    assert_eq!(filter.until, Some(at("2025-06-10 23:59:59")));
}

#[test]
fn test_sales_filter_rejections() {
    let now = at("2025-06-15 12:00:00");

    assert!(matches!(
        sales_filter(&query(None, Some("yearly"), None, None), now),
        Err(DashboardServiceError::Validation(_))
    ));
    assert!(sales_filter(&query(Some("abc"), None, None, None), now).is_err());
    assert!(sales_filter(&query(None, Some("custom"), Some("not a date"), None), now).is_err());
    assert!(
        sales_filter(
            &query(None, Some("custom"), Some("2025-06-10"), Some("2025-06-01")),
            now
        )
        .is_err()
    );
}

#[test]
fn test_summarize() {
    let orders = vec![
        order(1, 1, "100.00", "2025-06-01 09:00:00"),
        order(2, 1, "50.50", "2025-06-01 15:00:00"),
        order(3, 2, "200.00", "2025-06-03 10:00:00"),
    ];

    let summary = summarize(&orders);

    assert_eq!(summary.total_orders, 3);
    assert_eq!(summary.total_sales, dec("350.50"));
    assert_eq!(summary.average_order, dec("116.83"));

    let empty = summarize(&[]);
    assert_eq!(empty.total_orders, 0);
    assert_eq!(empty.average_order, dec("0.00"));
}

#[test]
fn test_department_breakdown_sorted_by_name() {
    let orders = vec![
        order(1, 1, "100.00", "2025-06-01 09:00:00"),
        order(2, 2, "40.00", "2025-06-02 09:00:00"),
        order(3, 2, "60.00", "2025-06-02 10:00:00"),
        order(4, 9, "10.00", "2025-06-02 11:00:00"),
    ];

    let rows = department_breakdown(&orders, &names());

    let labels: Vec<&str> = rows.iter().map(|r| r.department_name.as_str()).collect();
    assert_eq!(
        labels,
        vec!["School of Criminology", "School of Humanities", "Unknown"]
    );
    assert_eq!(rows[0].total_orders, 2);
    assert_eq!(rows[0].total_sales, dec("100.00"));
    assert_eq!(rows[0].average_order, dec("50.00"));
}

#[test]
fn test_daily_breakdown_oldest_first() {
    let orders = vec![
        order(1, 1, "30.00", "2025-06-03 09:00:00"),
        order(2, 1, "20.00", "2025-06-01 09:00:00"),
        order(3, 1, "25.00", "2025-06-01 18:00:00"),
    ];

    let days = daily_breakdown(&orders);

    assert_eq!(days.len(), 2);
    assert_eq!(days[0].date, "2025-06-01");
    assert_eq!(days[0].total_orders, 2);
    assert_eq!(days[0].total_sales, dec("45.00"));
    assert_eq!(days[1].date, "2025-06-03");
}

#[test]
fn test_order_rows_join_titles() {
    let orders = vec![order(1, 1, "300.00", "2025-06-01 09:00:00")];
    let items = vec![item(1, 10, 2), item(1, 11, 1), item(1, 10, 1)];
    let titles = HashMap::from([(10, "Hoodie".to_string()), (11, "Cap".to_string())]);

    let rows = order_rows(&orders, &items, &titles, &names());

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].quantity, 4);
    assert_eq!(rows[0].listing_title, "Hoodie, Cap");
    assert_eq!(rows[0].department, "School of Humanities");
    assert_eq!(rows[0].created_at.as_deref(), Some("2025-06-01T09:00:00"));
}
