use rocket_core::Part;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;

/// Currency precision of order totals.
pub const PRICE_SCALE: u32 = 2;

/// Round half away from zero to [`PRICE_SCALE`] places.
pub fn round_price(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Total for `requested` part ids priced against `parts`.
///
/// Every occurrence of an id is charged, so repetition works as quantity.
/// Any requested id without a matching part fails the whole quote; the sum
/// is rounded once, after adding the unit prices.
pub fn price_order(requested: &[String], parts: &[Part]) -> Result<Decimal, PricingError> {
    let mut unit_prices: HashMap<&str, Decimal> = HashMap::with_capacity(parts.len());
    for part in parts {
        if part.price < Decimal::ZERO {
            return Err(PricingError::NegativePrice {
                part_id: part.id.clone(),
                price: part.price,
            });
        }
        unit_prices.insert(part.id.as_str(), part.price);
    }

    let mut total = Decimal::ZERO;
    let mut missing: Vec<String> = Vec::new();
    for id in requested {
        match unit_prices.get(id.as_str()) {
            Some(price) => total += *price,
            None if !missing.contains(id) => missing.push(id.clone()),
            None => {}
        }
    }

    if !missing.is_empty() {
        return Err(PricingError::UnknownParts(missing));
    }

    Ok(round_price(total))
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingError {
    #[error("Unknown parts: {}", .0.join(", "))]
    UnknownParts(Vec<String>),

    #[error("Part {part_id} has negative price {price}")]
    NegativePrice { part_id: String, price: Decimal },
}
