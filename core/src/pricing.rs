// core/src/pricing.rs

//! Price arithmetic in integer minor units.

/// Currency label used when rendering prices.
pub const CURRENCY_LABEL: &str = "EGP";

/// Largest price a product may carry.
pub const MAX_PRICE: i64 = 100_000_000_000;

/// Applies a percentage discount to `price`.
///
/// `None` or `0` leaves the price untouched. Percentages are clamped to
/// `0..=100` and the discount amount is rounded half away from zero.
pub fn discounted_price(price: i64, discount: Option<i32>) -> i64 {
  match discount {
    None | Some(0) => price,
    Some(pct) => {
      let price = i128::from(price);
      let pct = i128::from(pct.clamp(0, 100));
      saturate(price - div_round_wide(price * pct, 100))
    }
  }
}

/// Integer division rounding half away from zero.
pub fn div_round(numerator: i64, denominator: i64) -> i64 {
  if denominator == 0 {
    return 0;
  }
  saturate(div_round_wide(i128::from(numerator), i128::from(denominator)))
}

fn div_round_wide(numerator: i128, denominator: i128) -> i128 {
  let quotient = (numerator.abs() + denominator.abs() / 2) / denominator.abs();
  if (numerator >= 0) == (denominator > 0) {
    quotient
  } else {
    -quotient
  }
}

fn saturate(value: i128) -> i64 {
  i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}

/// Renders an amount as `EGP 1,234,567`.
pub fn format_price(amount: i64) -> String {
  let digits = amount.unsigned_abs().to_string();
  let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
  for (idx, ch) in digits.chars().enumerate() {
    if idx > 0 && (digits.len() - idx) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(ch);
  }
  let sign = if amount < 0 { "-" } else { "" };
  format!("{} {}{}", CURRENCY_LABEL, sign, grouped)
}
