use crate::api::controllers::dto::dashboard_dto::DashboardStatsDTO;
use crate::api::controllers::dto::order_dto::{
    DailySalesDTO, DepartmentSalesDTO, SalesOrderRowDTO, SalesReportDTO, SalesReportQuery,
    SalesSummaryDTO,
};
use crate::data::models::listing::ListingStatus;
use crate::data::models::order::{Order, OrderStatus};
use crate::data::models::order_item::OrderItem;
use crate::data::models::roles::UserRole;
use crate::data::models::user::User;
use crate::data::repos::implementors::department_repo::DepartmentRepo;
use crate::data::repos::implementors::listing_repo::ListingRepo;
use crate::data::repos::implementors::order_repo::{OrderRepo, SalesFilter};
use crate::data::repos::implementors::user_repo::UserRepo;
use crate::data::repos::traits::repository::Repository;
use crate::security::access::{SUPERADMIN_ONLY, require_role};
use crate::services::errors::DashboardServiceError;
use crate::utils::mappers::{parse_datetime, timestamp_string};
use crate::utils::money::round2;
use bigdecimal::{BigDecimal, Zero};
use chrono::{Duration, Months, NaiveDateTime, NaiveTime};
use std::collections::{BTreeMap, HashMap};

/// Turns the report query into repository filters. `now` anchors the
/// weekly (7 days) and monthly (30 days) windows.
pub fn sales_filter(query: &SalesReportQuery, now: NaiveDateTime) -> Result<SalesFilter, DashboardServiceError> {
    let department_id = match query.department.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(raw) => Some(raw.parse::<i32>().map_err(|_| {
            DashboardServiceError::Validation("The selected department is invalid.".into())
        })?),
    };

    let (from, until) = match query.date_range.as_deref().map(str::trim) {
        Some("weekly") => (Some(now - Duration::days(7)), None),
        Some("monthly") => {
            let from = now.checked_sub_months(Months::new(1)).ok_or_else(|| {
                DashboardServiceError::Validation("The date range is out of bounds.".into())
            })?;
            (Some(from), None)
        }
        Some("custom") => {
            let from = query.start_date.as_deref().map(|raw| {
                parse_datetime(raw).ok_or_else(|| {
                    DashboardServiceError::Validation("The start date is not a valid date.".into())
                })
            });
            let until = query.end_date.as_deref().map(|raw| {
                parse_datetime(raw)
                    .map(end_of_day)
                    .ok_or_else(|| DashboardServiceError::Validation("The end date is not a valid date.".into()))
            });
            (from.transpose()?, until.transpose()?)
        }
        None | Some("") | Some("all") => (None, None),
        Some(other) => {
            return Err(DashboardServiceError::Validation(format!(
                "Unknown date range '{other}'"
            )));
        }
    };

    if let (Some(from), Some(until)) = (from, until) {
        if until < from {
            return Err(DashboardServiceError::Validation(
                "The end date must be a date after or equal to start date.".into(),
            ));
        }
    }

    Ok(SalesFilter {
        department_id,
        from,
        until,
    })
}

/// Date-only end bounds cover the whole day.
fn end_of_day(dt: NaiveDateTime) -> NaiveDateTime {
    if dt.time() == NaiveTime::MIN {
        dt + Duration::days(1) - Duration::seconds(1)
    } else {
        dt
    }
}

fn average(total: &BigDecimal, count: usize) -> BigDecimal {
    if count == 0 {
        return round2(&BigDecimal::zero());
    }
    round2(&(total / BigDecimal::from(count as u64)))
}

pub fn summarize(orders: &[Order]) -> SalesSummaryDTO {
    let total: BigDecimal = orders.iter().map(|o| o.total_amount.clone()).sum();

    SalesSummaryDTO {
        average_order: average(&total, orders.len()),
        total_sales: round2(&total),
        total_orders: orders.len(),
    }
}

/// Per-department totals, ordered by department name.
pub fn department_breakdown(orders: &[Order], names: &HashMap<i32, String>) -> Vec<DepartmentSalesDTO> {
    let mut grouped: HashMap<i32, (BigDecimal, usize)> = HashMap::new();
    for order in orders {
        let entry = grouped
            .entry(order.department_id)
            .or_insert_with(|| (BigDecimal::zero(), 0));
        entry.0 += &order.total_amount;
        entry.1 += 1;
    }

    let mut rows: Vec<DepartmentSalesDTO> = grouped
        .into_iter()
        .map(|(department_id, (total, count))| DepartmentSalesDTO {
            department_id,
            department_name: names
                .get(&department_id)
                .cloned()
                .unwrap_or_else(|| "Unknown".to_string()),
            average_order: average(&total, count),
            total_sales: round2(&total),
            total_orders: count,
        })
        .collect();

    rows.sort_by(|a, b| a.department_name.cmp(&b.department_name));
    rows
}

/// Per-day totals keyed by `created_at`, oldest day first.
pub fn daily_breakdown(orders: &[Order]) -> Vec<DailySalesDTO> {
    let mut grouped: BTreeMap<String, (BigDecimal, usize)> = BTreeMap::new();
    for order in orders {
        let Some(created) = order.created_at else {
            continue;
        };
        let entry = grouped
            .entry(created.date().format("%Y-%m-%d").to_string())
            .or_insert_with(|| (BigDecimal::zero(), 0));
        entry.0 += &order.total_amount;
        entry.1 += 1;
    }

    grouped
        .into_iter()
        .map(|(date, (total, count))| DailySalesDTO {
            date,
            total_sales: round2(&total),
            total_orders: count,
        })
        .collect()
}

pub fn order_rows(
    orders: &[Order],
    items: &[OrderItem],
    titles: &HashMap<i32, String>,
    names: &HashMap<i32, String>,
) -> Vec<SalesOrderRowDTO> {
    let mut by_order: HashMap<i32, Vec<&OrderItem>> = HashMap::new();
    for item in items {
        by_order.entry(item.order_id).or_default().push(item);
    }

    orders
        .iter()
        .map(|order| {
            let lines = by_order.remove(&order.order_id).unwrap_or_default();
            let mut listing_titles: Vec<&str> = Vec::new();
            for line in &lines {
                let title = titles.get(&line.listing_id).map_or("Unknown", String::as_str);
                if !listing_titles.contains(&title) {
                    listing_titles.push(title);
                }
            }

            SalesOrderRowDTO {
                id: order.order_id,
                order_number: order.order_number.clone(),
                total_amount: round2(&order.total_amount),
                quantity: lines.iter().map(|l| l.quantity).sum(),
                created_at: timestamp_string(order.created_at),
                department: names
                    .get(&order.department_id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown".to_string()),
                listing_title: listing_titles.join(", "),
            }
        })
        .collect()
}

pub struct DashboardService;

impl DashboardService {
    pub fn new() -> Self {
        DashboardService
    }

    pub async fn stats(&self, actor: &User) -> Result<DashboardStatsDTO, DashboardServiceError> {
        require_role(actor, SUPERADMIN_ONLY)?;
        let users = UserRepo::new();
        let listings = ListingRepo::new();
        let orders = OrderRepo::new();

        let stock_value: BigDecimal = listings
            .approved_stock()
            .await?
            .into_iter()
            .map(|(price, stock)| price * BigDecimal::from(stock))
            .sum();

        Ok(DashboardStatsDTO {
            total_users: users.count_by_role(None).await?,
            total_admins: users.count_by_role(Some(UserRole::Admin)).await?,
            total_students: users.count_by_role(Some(UserRole::Student)).await?,
            total_listings: listings.count_by_status(None).await?,
            pending_listings: listings.count_by_status(Some(ListingStatus::Pending)).await?,
            approved_listings: listings.count_by_status(Some(ListingStatus::Approved)).await?,
            total_orders: orders.count_all().await?,
            pending_orders: orders.count_by_status(OrderStatus::Pending).await?,
            confirmed_orders: orders.count_by_status(OrderStatus::Confirmed).await?,
            ready_for_pickup_orders: orders.count_by_status(OrderStatus::ReadyForPickup).await?,
            completed_orders: orders.count_by_status(OrderStatus::Completed).await?,
            cancelled_orders: orders.count_by_status(OrderStatus::Cancelled).await?,
            total_departments: DepartmentRepo::new().count().await?,
            total_stock_value: round2(&stock_value),
        })
    }

    pub async fn sales_report(
        &self,
        actor: &User,
        query: &SalesReportQuery,
    ) -> Result<SalesReportDTO, DashboardServiceError> {
        require_role(actor, SUPERADMIN_ONLY)?;
        let filter = sales_filter(query, chrono::Utc::now().naive_utc())?;

        let orders = OrderRepo::new().get_completed(&filter).await?;
        let order_ids: Vec<i32> = orders.iter().map(|o| o.order_id).collect();
        let items = OrderRepo::new().get_items_for(&order_ids).await?;

        let mut listing_ids: Vec<i32> = items.iter().map(|i| i.listing_id).collect();
        listing_ids.sort_unstable();
        listing_ids.dedup();
        let titles: HashMap<i32, String> = ListingRepo::new()
            .get_by_ids(&listing_ids)
            .await?
            .into_iter()
            .map(|l| (l.listing_id, l.title))
            .collect();

        let names: HashMap<i32, String> = DepartmentRepo::new()
            .get_all()
            .await?
            .unwrap_or_default()
            .into_iter()
            .map(|d| (d.department_id, d.name))
            .collect();

        tracing::debug!(orders = orders.len(), department = ?filter.department_id, "sales report built");

        Ok(SalesReportDTO {
            summary: summarize(&orders),
            department_breakdown: department_breakdown(&orders, &names),
            daily_sales: daily_breakdown(&orders),
            orders: order_rows(&orders, &items, &titles, &names),
        })
    }
}

impl Default for DashboardService {
    fn default() -> Self {
        Self::new()
    }
}
