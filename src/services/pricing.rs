//! Order pricing: stock checks, subtotals, discount application and the
//! reservation fee split. Everything here is pure; callers load the rows.

use crate::data::models::discount_code::DiscountCode;
use crate::data::models::listing::Listing;
use crate::data::models::listing_size_variant::ListingSizeVariant;
use crate::data::repos::implementors::order_repo::StockSource;
use crate::utils::money::{remaining_balance, reservation_fee, round2};
use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDateTime;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error("An order needs at least one item")]
    EmptyOrder,
    #[error("Quantity must be at least 1")]
    InvalidQuantity,
    #[error("Listing {0} is not available")]
    ListingUnavailable(i32),
    #[error("All items in an order must come from the same department")]
    MixedDepartments,
    #[error("Size {size} not available for {title}")]
    SizeUnavailable { size: String, title: String },
    #[error("Insufficient stock for {0}")]
    InsufficientStock(String),
}

#[derive(Debug, Clone)]
pub struct CartLine {
    pub listing_id: i32,
    pub quantity: i32,
    pub size: Option<String>,
}

/// A listing together with its size variants.
#[derive(Debug, Clone)]
pub struct StockedListing {
    pub listing: Listing,
    pub variants: Vec<ListingSizeVariant>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub listing_id: i32,
    pub title: String,
    pub quantity: i32,
    pub size: Option<String>,
    pub unit_price: BigDecimal,
    pub subtotal: BigDecimal,
    /// Counter to decrement; `None` for pre-orders (stock 0).
    pub stock: Option<StockSource>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Breakdown {
    pub original_amount: BigDecimal,
    pub discount_amount: BigDecimal,
    pub final_amount: BigDecimal,
    pub reservation_fee_amount: BigDecimal,
    pub remaining_balance: BigDecimal,
}

impl Breakdown {
    pub fn new(original_amount: &BigDecimal, discount_amount: &BigDecimal) -> Self {
        let original_amount = round2(original_amount);
        let discount_amount = round2(&discount_amount.clone().min(original_amount.clone()));
        let final_amount = round2(&(&original_amount - &discount_amount));
        let fee = reservation_fee(&final_amount);

        Breakdown {
            remaining_balance: remaining_balance(&final_amount, &fee),
            original_amount,
            discount_amount,
            final_amount,
            reservation_fee_amount: fee,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub department_id: i32,
    pub lines: Vec<PricedLine>,
    pub discount_code_id: Option<i32>,
    pub totals: Breakdown,
}

/// Checks stock for every line and prices it. All lines must belong to
/// approved listings of a single department.
pub fn price_lines(
    cart: &[CartLine],
    listings: &HashMap<i32, StockedListing>,
) -> Result<(i32, Vec<PricedLine>), PricingError> {
    if cart.is_empty() {
        return Err(PricingError::EmptyOrder);
    }

    let mut department_id = None;
    let mut lines = Vec::with_capacity(cart.len());

    for item in cart {
        if item.quantity < 1 {
            return Err(PricingError::InvalidQuantity);
        }

        let stocked = listings
            .get(&item.listing_id)
            .filter(|s| s.listing.is_approved())
            .ok_or(PricingError::ListingUnavailable(item.listing_id))?;
        let listing = &stocked.listing;

        match department_id {
            None => department_id = Some(listing.department_id),
            Some(dept) if dept != listing.department_id => {
                return Err(PricingError::MixedDepartments);
            }
            Some(_) => {}
        }

        let size = item
            .size
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let (available, source, label, stored_size) = match size {
            Some(size) if !stocked.variants.is_empty() => {
                let variant = stocked
                    .variants
                    .iter()
                    .find(|v| v.size.eq_ignore_ascii_case(size))
                    .ok_or_else(|| PricingError::SizeUnavailable {
                        size: size.to_string(),
                        title: listing.title.clone(),
                    })?;
                (
                    variant.stock_quantity,
                    StockSource::Variant(variant.variant_id),
                    format!("{} ({})", listing.title, variant.size),
                    Some(variant.size.clone()),
                )
            }
            _ => (
                listing.stock_quantity,
                StockSource::Listing(listing.listing_id),
                listing.title.clone(),
                size.map(str::to_string),
            ),
        };

        // Zero stock is a pre-order: accepted, nothing reserved.
        if available > 0 && available < item.quantity {
            return Err(PricingError::InsufficientStock(label));
        }

        let subtotal = round2(&(&listing.price * BigDecimal::from(item.quantity)));

        lines.push(PricedLine {
            listing_id: listing.listing_id,
            title: listing.title.clone(),
            quantity: item.quantity,
            size: stored_size,
            unit_price: listing.price.clone(),
            subtotal,
            stock: (available > 0).then_some(source),
        });
    }

    let department_id = department_id.ok_or(PricingError::EmptyOrder)?;

    Ok((department_id, lines))
}

pub fn original_amount(lines: &[PricedLine]) -> BigDecimal {
    round2(
        &lines
            .iter()
            .fold(BigDecimal::zero(), |acc, line| acc + &line.subtotal),
    )
}

/// Discount granted by `code`, or zero when it cannot be used for this order.
pub fn discount_for(
    code: Option<&DiscountCode>,
    original: &BigDecimal,
    department_id: i32,
    now: NaiveDateTime,
) -> (BigDecimal, Option<i32>) {
    match code {
        Some(code) if code.can_be_used_for_order(original, department_id, now) => {
            (code.calculate_discount(original), Some(code.discount_code_id))
        }
        _ => (round2(&BigDecimal::zero()), None),
    }
}

pub fn quote(
    cart: &[CartLine],
    listings: &HashMap<i32, StockedListing>,
    code: Option<&DiscountCode>,
    now: NaiveDateTime,
) -> Result<Quote, PricingError> {
    let (department_id, lines) = price_lines(cart, listings)?;
    let original = original_amount(&lines);
    let (discount, discount_code_id) = discount_for(code, &original, department_id, now);

    Ok(Quote {
        department_id,
        lines,
        discount_code_id,
        totals: Breakdown::new(&original, &discount),
    })
}
