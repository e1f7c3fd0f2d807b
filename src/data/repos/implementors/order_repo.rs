use crate::data::database::{connection, last_inserted_id};
use crate::data::models::order::{NewOrder, Order, OrderStatus, UpdateOrder};
use crate::data::models::order_item::{NewOrderItem, OrderItem};
use crate::data::repos::traits::repository::Repository;
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::result;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncMysqlConnection, RunQueryDsl};

/// Which stock counter an order line draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockSource {
    Listing(i32),
    Variant(i32),
}

/// One order line ready to be written, with the stock it takes (if any).
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub listing_id: i32,
    pub quantity: i32,
    pub size: Option<String>,
    pub price: BigDecimal,
    pub subtotal: BigDecimal,
    pub stock: Option<StockSource>,
}

#[derive(Debug, thiserror::Error)]
pub enum OrderWriteError {
    #[error(transparent)]
    Database(#[from] result::Error),
    #[error("Insufficient stock for listing {0}")]
    InsufficientStock(i32),
    #[error("Order can no longer be cancelled")]
    NotCancellable,
    #[error("Discount code {0} has reached its usage limit")]
    DiscountExhausted(i32),
}

/// Filters for the completed-orders sales report.
#[derive(Debug, Clone, Default)]
pub struct SalesFilter {
    pub department_id: Option<i32>,
    pub from: Option<NaiveDateTime>,
    pub until: Option<NaiveDateTime>,
}

pub struct OrderRepo {}

impl OrderRepo {
    pub fn new() -> Self {
        OrderRepo {}
    }

    /// Writes the order, its items, the stock decrements and the discount
    /// usage bump atomically. A stock counter that no longer covers the
    /// quantity aborts the whole order.
    pub async fn create_with_items<'a>(
        &self,
        order: NewOrder<'a>,
        lines: Vec<OrderLine>,
    ) -> Result<Order, OrderWriteError> {
        use crate::data::models::schema::order_items::dsl::order_items;
        use crate::data::models::schema::orders::dsl::{order_id, orders};

        let mut conn = connection().await?;

        conn.transaction::<_, OrderWriteError, _>(|connection| {
            async move {
                diesel::insert_into(orders)
                    .values(&order)
                    .execute(connection)
                    .await?;
                let id = last_inserted_id(connection).await?;

                for line in lines {
                    if let Some(source) = line.stock {
                        let taken = take_stock(connection, source, line.quantity).await?;
                        if !taken {
                            return Err(OrderWriteError::InsufficientStock(line.listing_id));
                        }
                    }

                    diesel::insert_into(order_items)
                        .values(&NewOrderItem {
                            order_id: id,
                            listing_id: line.listing_id,
                            quantity: line.quantity,
                            size: line.size,
                            price: line.price,
                            subtotal: line.subtotal,
                            stock_reserved: line.stock.is_some(),
                            variant_id: match line.stock {
                                Some(StockSource::Variant(variant_id)) => Some(variant_id),
                                _ => None,
                            },
                        })
                        .execute(connection)
                        .await?;
                }

                if let Some(code_id) = order.discount_code_id {
                    if !claim_code_use(connection, code_id).await? {
                        return Err(OrderWriteError::DiscountExhausted(code_id));
                    }
                }

                Ok(orders
                    .filter(order_id.eq(id))
                    .first::<Order>(connection)
                    .await?)
            }
            .scope_boxed()
        })
        .await
    }

    /// Cancels the order and gives back the stock its items reserved.
    /// Customers may only cancel pending or confirmed orders; staff may
    /// cancel anything not yet completed.
    pub async fn cancel(&self, id: i32, by_staff: bool) -> Result<Order, OrderWriteError> {
        use crate::data::models::schema::order_items;
        use crate::data::models::schema::orders::dsl::{order_id, orders, status};

        let mut conn = connection().await?;

        conn.transaction::<_, OrderWriteError, _>(|connection| {
            async move {
                let current = orders
                    .filter(order_id.eq(id))
                    .for_update()
                    .first::<Order>(connection)
                    .await?;
                let allowed = if by_staff {
                    !matches!(current.status, OrderStatus::Completed | OrderStatus::Cancelled)
                } else {
                    current.can_be_cancelled()
                };
                if !allowed {
                    return Err(OrderWriteError::NotCancellable);
                }

                let reserved = order_items::table
                    .filter(order_items::order_id.eq(id))
                    .filter(order_items::stock_reserved.eq(true))
                    .load::<OrderItem>(connection)
                    .await?;

                for item in reserved {
                    give_back_stock(connection, &item).await?;
                }

                diesel::update(orders.filter(order_id.eq(id)))
                    .set(status.eq(OrderStatus::Cancelled))
                    .execute(connection)
                    .await?;

                Ok(orders
                    .filter(order_id.eq(id))
                    .first::<Order>(connection)
                    .await?)
            }
            .scope_boxed()
        })
        .await
    }

    /// Attaches a discount to a pending, unpaid, undiscounted order and
    /// claims one use of the code. `false` when the order no longer
    /// qualifies; a code used up in the meantime rolls the change back.
    pub async fn apply_discount(
        &self,
        id: i32,
        code_id: i32,
        discount: BigDecimal,
        total: BigDecimal,
        fee: BigDecimal,
    ) -> Result<bool, OrderWriteError> {
        use crate::data::models::schema::orders::dsl::{
            discount_amount, discount_code_id, order_id, orders, reservation_fee_amount,
            reservation_fee_paid, status, total_amount,
        };

        let mut conn = connection().await?;

        conn.transaction::<_, OrderWriteError, _>(|connection| {
            async move {
                let affected = diesel::update(
                    orders
                        .filter(order_id.eq(id))
                        .filter(status.eq(OrderStatus::Pending))
                        .filter(reservation_fee_paid.eq(false))
                        .filter(discount_code_id.is_null()),
                )
                .set((
                    discount_code_id.eq(Some(code_id)),
                    discount_amount.eq(discount),
                    total_amount.eq(total),
                    reservation_fee_amount.eq(fee),
                ))
                .execute(connection)
                .await?;

                if affected != 1 {
                    return Ok(false);
                }

                if !claim_code_use(connection, code_id).await? {
                    return Err(OrderWriteError::DiscountExhausted(code_id));
                }

                Ok(true)
            }
            .scope_boxed()
        })
        .await
    }

    pub async fn get_by_user(&self, uid: i32) -> Result<Vec<Order>, result::Error> {
        use crate::data::models::schema::orders::dsl::{created_at, order_id, orders, user_id};

        let mut conn = connection().await?;

        orders
            .filter(user_id.eq(uid))
            .order((created_at.desc(), order_id.desc()))
            .load::<Order>(&mut conn)
            .await
    }

    pub async fn get_for_user(&self, id: i32, uid: i32) -> Result<Option<Order>, result::Error> {
        use crate::data::models::schema::orders::dsl::{order_id, orders, user_id};

        let mut conn = connection().await?;

        orders
            .filter(order_id.eq(id))
            .filter(user_id.eq(uid))
            .first::<Order>(&mut conn)
            .await
            .optional()
    }

    pub async fn get_by_department(&self, dept_id: i32) -> Result<Vec<Order>, result::Error> {
        use crate::data::models::schema::orders::dsl::{created_at, department_id, order_id, orders};

        let mut conn = connection().await?;

        orders
            .filter(department_id.eq(dept_id))
            .order((created_at.desc(), order_id.desc()))
            .load::<Order>(&mut conn)
            .await
    }

    pub async fn get_items(&self, id: i32) -> Result<Vec<OrderItem>, result::Error> {
        self.get_items_for(&[id]).await
    }

    pub async fn get_items_for(&self, ids: &[i32]) -> Result<Vec<OrderItem>, result::Error> {
        use crate::data::models::schema::order_items::dsl::{order_id, order_item_id, order_items};

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = connection().await?;

        order_items
            .filter(order_id.eq_any(ids))
            .order(order_item_id.asc())
            .load::<OrderItem>(&mut conn)
            .await
    }

    pub async fn count_all(&self) -> Result<i64, result::Error> {
        use crate::data::models::schema::orders::dsl::orders;

        let mut conn = connection().await?;

        orders.count().get_result(&mut conn).await
    }

    pub async fn count_by_status(&self, status_query: OrderStatus) -> Result<i64, result::Error> {
        use crate::data::models::schema::orders::dsl::{orders, status};

        let mut conn = connection().await?;

        orders
            .filter(status.eq(status_query))
            .count()
            .get_result(&mut conn)
            .await
    }

    /// Completed orders matching `filter`, newest first.
    pub async fn get_completed(&self, filter: &SalesFilter) -> Result<Vec<Order>, result::Error> {
        use crate::data::models::schema::orders::dsl::{
            created_at, department_id, order_id, orders, status,
        };

        let mut conn = connection().await?;

        let mut query = orders
            .filter(status.eq(OrderStatus::Completed))
            .into_boxed();

        if let Some(dept) = filter.department_id {
            query = query.filter(department_id.eq(dept));
        }
        if let Some(from) = filter.from {
            query = query.filter(created_at.ge(from));
        }
        if let Some(until) = filter.until {
            query = query.filter(created_at.le(until));
        }

        query
            .order((created_at.desc(), order_id.desc()))
            .load::<Order>(&mut conn)
            .await
    }
}

/// Conditionally decrements a stock counter; `false` when it no longer
/// covers `quantity`.
async fn take_stock(
    conn: &mut AsyncMysqlConnection,
    source: StockSource,
    quantity: i32,
) -> Result<bool, result::Error> {
    use crate::data::models::schema::listing_size_variants as variants;
    use crate::data::models::schema::listings;

    let affected = match source {
        StockSource::Listing(id) => {
            diesel::update(
                listings::table
                    .filter(listings::listing_id.eq(id))
                    .filter(listings::stock_quantity.ge(quantity)),
            )
            .set(listings::stock_quantity.eq(listings::stock_quantity - quantity))
            .execute(conn)
            .await?
        }
        StockSource::Variant(id) => {
            diesel::update(
                variants::table
                    .filter(variants::variant_id.eq(id))
                    .filter(variants::stock_quantity.ge(quantity)),
            )
            .set(variants::stock_quantity.eq(variants::stock_quantity - quantity))
            .execute(conn)
            .await?
        }
    };

    Ok(affected == 1)
}

/// Returns a cancelled item's stock to the counter it was taken from. A
/// variant replaced since the order falls back to the variant of the same
/// size, then to the listing.
async fn give_back_stock(conn: &mut AsyncMysqlConnection, item: &OrderItem) -> Result<(), result::Error> {
    use crate::data::models::schema::listing_size_variants as variants;
    use crate::data::models::schema::listings;

    if let Some(id) = item.variant_id {
        let restored = diesel::update(variants::table.filter(variants::variant_id.eq(id)))
            .set(variants::stock_quantity.eq(variants::stock_quantity + item.quantity))
            .execute(conn)
            .await?;
        if restored == 1 {
            return Ok(());
        }

        if let Some(size) = item.size.as_deref() {
            let restored = diesel::update(
                variants::table
                    .filter(variants::listing_id.eq(item.listing_id))
                    .filter(variants::size.eq(size)),
            )
            .set(variants::stock_quantity.eq(variants::stock_quantity + item.quantity))
            .execute(conn)
            .await?;
            if restored > 0 {
                return Ok(());
            }
        }
    }

    diesel::update(listings::table.filter(listings::listing_id.eq(item.listing_id)))
        .set(listings::stock_quantity.eq(listings::stock_quantity + item.quantity))
        .execute(conn)
        .await?;

    Ok(())
}

/// Bumps `usage_count` only while the code is under its usage limit;
/// `false` when the limit has been reached.
async fn claim_code_use(conn: &mut AsyncMysqlConnection, code_id: i32) -> Result<bool, result::Error> {
    use crate::data::models::schema::discount_codes::dsl::{
        discount_code_id, discount_codes, usage_count, usage_limit,
    };

    let affected = diesel::update(
        discount_codes
            .filter(discount_code_id.eq(code_id))
            .filter(
                usage_limit
                    .is_null()
                    .or(usage_count.lt(usage_limit.assume_not_null())),
            ),
    )
    .set(usage_count.eq(usage_count + 1))
    .execute(conn)
    .await?;

    Ok(affected == 1)
}

impl Default for OrderRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Repository for OrderRepo {
    type Id = i32;
    type Item = Order;
    type NewItem<'a> = NewOrder<'a>;
    type UpdateForm<'a> = UpdateOrder<'a>;

    async fn get_all(&self) -> Result<Option<Vec<Self::Item>>, result::Error> {
        use crate::data::models::schema::orders::dsl::{created_at, order_id, orders};

        let mut conn = connection().await?;

        match orders
            .order((created_at.desc(), order_id.desc()))
            .load::<Self::Item>(&mut conn)
            .await
        {
            Ok(value) if value.is_empty() => Ok(None),
            Ok(value) => Ok(Some(value)),
            Err(result::Error::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn get_by_id(&self, id: Self::Id) -> Result<Option<Self::Item>, result::Error> {
        use crate::data::models::schema::orders::dsl::{order_id, orders};

        let mut conn = connection().await?;

        orders
            .filter(order_id.eq(id))
            .first::<Self::Item>(&mut conn)
            .await
            .optional()
    }

    async fn add<'a>(&self, item: Self::NewItem<'a>) -> Result<(), result::Error> {
        use crate::data::models::schema::orders::dsl::orders;

        let mut conn = connection().await?;

        diesel::insert_into(orders)
            .values(&item)
            .execute(&mut conn)
            .await?;

        Ok(())
    }

    async fn update<'a>(
        &self,
        id: Self::Id,
        item: Self::UpdateForm<'a>,
    ) -> Result<(), result::Error> {
        use crate::data::models::schema::orders::dsl::{order_id, orders};

        let mut conn = connection().await?;

        conn.transaction(|connection| {
            async move {
                diesel::update(orders.filter(order_id.eq(id)))
                    .set(&item)
                    .execute(connection)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
    }

    async fn delete(&self, id: Self::Id) -> Result<(), result::Error> {
        use crate::data::models::schema::orders::dsl::{order_id, orders};

        let mut conn = connection().await?;

        diesel::delete(orders.filter(order_id.eq(id)))
            .execute(&mut conn)
            .await?;

        Ok(())
    }
}
