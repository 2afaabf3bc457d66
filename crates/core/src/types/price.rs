//! Decimal price formatting.

use rust_decimal::{Decimal, RoundingStrategy};

/// Format a dollar amount for display, e.g. `$1890.00`.
///
/// Always two decimals, rounded half away from zero.
#[must_use]
pub fn format_usd(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("${rounded:.2}")
}
