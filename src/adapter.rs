//! Adapter layer: converts between the form's f64 world and the calculator's
//! Decimal arithmetic, and coerces raw form values.

use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

/// Fractional digits kept when converting form values. Binary noise below
/// this is dropped so that `10.01` compares equal to `dec!(10.01)`.
const INPUT_DP: u32 = 9;

/// Convert f64 to Decimal. Magnitudes beyond the Decimal range saturate at
/// `Decimal::MAX` / `Decimal::MIN`; NaN and underflow map to zero.
pub fn to_decimal(v: f64) -> Decimal {
    match Decimal::from_f64(v) {
        Some(d) => d.round_dp(INPUT_DP).normalize(),
        None if v.is_nan() || v.abs() < 1.0 => Decimal::ZERO,
        None if v > 0.0 => Decimal::MAX,
        None => Decimal::MIN,
    }
}

/// Sum that clamps at the Decimal range instead of overflowing.
pub fn saturating_sum(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values.into_iter().fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Convert Decimal to f64.
pub fn from_decimal(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

/// Coerce a raw form value: missing, NaN, infinite and negative inputs all
/// become 0.
pub fn sanitize(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

/// Format a volume as whole mcf with thousands separators (`382,800`).
pub fn format_mcf(value: Decimal) -> String {
    let rounded = value
        .round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let digits = rounded.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{grouped}")
    } else {
        grouped
    }
}
