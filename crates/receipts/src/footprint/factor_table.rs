//! Keyword to kgCO2e-per-dollar factors for spend-based estimates.
//!
//! The table is scanned in order and the first keyword found in the item name
//! wins, so more specific keywords must come before general ones.

use rust_decimal::Decimal;

/// `(keyword, kgCO2e per USD in hundredths)`
const FALLBACK_FACTORS: &[(&str, i64)] = &[
    ("organic", 5),
    ("kale", 6),
    ("banana", 8),
    ("coffee", 25),
    ("beef", 500),
    ("chicken", 180),
    ("pork", 300),
    ("rice", 40),
    ("bread", 30),
    ("salad", 20),
    ("grocery", 30),
    ("shirt", 120),
    ("electronics", 60),
    ("toy", 50),
    ("book", 20),
];

const DEFAULT_FACTOR: i64 = 50;

fn factor(hundredths: i64) -> Decimal {
    Decimal::new(hundredths, 2)
}

pub fn default_factor() -> Decimal {
    factor(DEFAULT_FACTOR)
}

/// First matching keyword, case-insensitive, with its factor.
pub fn matching_keyword(name: &str) -> Option<(&'static str, Decimal)> {
    let name = name.to_lowercase();
    FALLBACK_FACTORS
        .iter()
        .find(|(keyword, _)| name.contains(keyword))
        .map(|(keyword, value)| (*keyword, factor(*value)))
}

pub fn lookup_kg_co2e_per_usd(name: &str) -> Decimal {
    matching_keyword(name)
        .map(|(_, value)| value)
        .unwrap_or_else(default_factor)
}

/// Footprint as factor × price. A missing or negative price counts as one dollar,
/// as does one so large the product overflows, so every item gets a
/// non-negative estimate.
pub fn estimate_footprint(name: &str, price: Option<Decimal>) -> Decimal {
    let factor = lookup_kg_co2e_per_usd(name);
    price
        .filter(|p| *p >= Decimal::ZERO)
        .and_then(|p| factor.checked_mul(p))
        .unwrap_or(factor)
}
