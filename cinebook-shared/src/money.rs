use rust_decimal::{Decimal, RoundingStrategy};

/// Currency amount, always carried at minor-unit precision once finalised
pub type Money = Decimal;

/// Number of decimal places in the minor unit
pub const MINOR_UNIT_DP: u32 = 2;

/// Round half-up to the minor unit
pub fn round_minor(amount: Money) -> Money {
    amount.round_dp_with_strategy(MINOR_UNIT_DP, RoundingStrategy::MidpointAwayFromZero)
}
