// Fixed-point currency helpers
// All amounts carry 2 decimal places; rounding happens only at final sums.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round to 2 decimal places, half away from zero.
///
/// This is the only rounding rule in the system. It is applied at the end of
/// a computation (tax, totals, normalized tariff entry), never between
/// intermediate steps, so per-item error cannot compound.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money_half_goes_up() {
        assert_eq!(round_money(dec!(1.285)), dec!(1.29));
        assert_eq!(round_money(dec!(2.004)), dec!(2.00));
        assert_eq!(round_money(dec!(2.005)), dec!(2.01));
    }

    #[test]
    fn test_round_money_keeps_two_places() {
        assert_eq!(round_money(dec!(16)), dec!(16));
        assert_eq!(round_money(dec!(1.2800)).normalize(), dec!(1.28));
    }

    #[test]
    fn test_round_money_negative_rounds_away_from_zero() {
        assert_eq!(round_money(dec!(-1.285)), dec!(-1.29));
    }
}
