//! Pure scoring rules: footprint ratio banding, transaction aggregation,
//! cashback and the receipt-free category heuristic.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::EcoScore;

const MIXED_MERCHANTS: [&str; 4] = ["walmart", "target", "amazon", "costco"];

const GREEN_CATEGORIES: [&str; 6] = [
    "public transit",
    "rail",
    "bicycle",
    "electric charging",
    "organic",
    "local",
];
const HIGH_IMPACT_CATEGORIES: [&str; 4] = ["gas", "air", "fast food", "ride share"];
const MODERATE_CATEGORIES: [&str; 3] = ["groceries", "coffee shop", "restaurant"];

/// Inclusive upper bounds in kgCO2e per dollar, in hundredths, with the score for the band.
const SCORE_BANDS: [(i64, u8); 10] = [
    (5, 10),
    (10, 9),
    (15, 8),
    (20, 7),
    (30, 6),
    (40, 5),
    (60, 4),
    (80, 3),
    (120, 2),
    (200, 1),
];

/// Large general stores where the merchant says little about what was bought.
pub fn is_mixed_merchant(merchant_name: Option<&str>) -> bool {
    let Some(name) = merchant_name else {
        return false;
    };
    let name = name.to_lowercase();
    MIXED_MERCHANTS.iter().any(|m| name.contains(m))
}

/// kgCO2e per dollar for an item, or `None` when the price is missing, not
/// positive, or the ratio does not fit a `Decimal`.
pub fn co2e_per_dollar(kg_co2e: Decimal, price: Option<Decimal>) -> Option<Decimal> {
    match price {
        Some(p) if p > Decimal::ZERO => kg_co2e.checked_div(p),
        _ => None,
    }
}

/// Maps kgCO2e per dollar to a score. Lower ratios score higher; unknown is neutral.
pub fn score_from_co2e_per_dollar(ratio: Option<Decimal>) -> EcoScore {
    let Some(ratio) = ratio else {
        return EcoScore::NEUTRAL;
    };

    SCORE_BANDS
        .iter()
        .find(|(limit, _)| ratio <= Decimal::new(*limit, 2))
        .map(|(_, score)| EcoScore::clamped(i64::from(*score)))
        .unwrap_or(EcoScore::MIN)
}

pub fn score_item(kg_co2e: Decimal, price: Option<Decimal>) -> EcoScore {
    score_from_co2e_per_dollar(co2e_per_dollar(kg_co2e, price))
}

/// Aggregates item scores into the transaction score.
///
/// Items with a positive price contribute a price-weighted mean rounded half-up.
/// Without any positive price the plain mean of the scores is floored. Items
/// with a negative price are ignored entirely, as are prices too large to sum.
/// Nothing to aggregate gives the neutral score.
pub fn aggregate_transaction_score<I>(items: I) -> EcoScore
where
    I: IntoIterator<Item = (Option<Decimal>, EcoScore)>,
{
    let items: Vec<(Option<Decimal>, EcoScore)> = items
        .into_iter()
        .filter(|(price, _)| !matches!(price, Some(p) if *p < Decimal::ZERO))
        .collect();

    let mut total_price = Decimal::ZERO;
    let mut weighted_sum = Decimal::ZERO;
    for (price, score) in &items {
        let Some(p) = price.filter(|p| *p > Decimal::ZERO) else {
            continue;
        };
        let next = p
            .checked_mul(Decimal::from(score.value()))
            .and_then(|weighted| weighted_sum.checked_add(weighted))
            .zip(total_price.checked_add(p));
        if let Some((sum, total)) = next {
            weighted_sum = sum;
            total_price = total;
        }
    }

    if total_price > Decimal::ZERO {
        let mean = (weighted_sum / total_price)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        let rounded = mean.to_i64().unwrap_or(i64::from(EcoScore::NEUTRAL.value()));
        return EcoScore::clamped(rounded);
    }

    if items.is_empty() {
        return EcoScore::NEUTRAL;
    }

    let sum: i64 = items.iter().map(|(_, s)| i64::from(s.value())).sum();
    EcoScore::clamped(sum / items.len() as i64)
}

/// Bonus multiplier applied on top of the 1% base rate: 0.15 at score 0 up to 5.0 at 10.
pub fn bonus_multiplier(score: EcoScore) -> Decimal {
    let floor = Decimal::new(15, 2);
    if score == EcoScore::MIN {
        return floor;
    }
    let ceiling = Decimal::new(5, 0);
    floor + (Decimal::from(score.value()) / Decimal::TEN) * (ceiling - floor)
}

/// Cashback in dollars, rounded half-up to cents.
///
/// The 1% base is always paid; a score adds `amount × 1% × bonus_multiplier(score)`.
pub fn compute_cashback(amount: Decimal, score: Option<EcoScore>) -> Decimal {
    let base = amount * Decimal::new(1, 2);
    let total = match score {
        Some(score) => base + amount * Decimal::new(1, 2) * bonus_multiplier(score),
        None => base,
    };
    total.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Cashback rendered with exactly two decimals.
pub fn format_currency(value: Decimal) -> String {
    format!("{:.2}", value)
}

/// Heuristic score from transaction categories alone, used until a receipt is processed.
pub fn quick_category_score(categories: &[String]) -> EcoScore {
    let cats: Vec<String> = categories.iter().map(|c| c.trim().to_lowercase()).collect();
    let has_any = |keys: &[&str]| cats.iter().any(|c| keys.contains(&c.as_str()));

    if has_any(&GREEN_CATEGORIES[..]) {
        EcoScore::clamped(9)
    } else if has_any(&HIGH_IMPACT_CATEGORIES[..]) {
        EcoScore::clamped(3)
    } else if has_any(&MODERATE_CATEGORIES[..]) {
        EcoScore::clamped(6)
    } else {
        EcoScore::NEUTRAL
    }
}
