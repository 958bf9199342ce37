// 💰 Pricing Table - Zone × weight-bracket tariffs
// Three brackets per zone; an unset bracket prices nothing.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::{DeskError, DeskResult};
use crate::money::round_money;

// ============================================================================
// WEIGHT BRACKETS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightBracket {
    /// Strictly below 1 kg
    Below1Kg,
    /// 1 kg through 3 kg, both ends inclusive
    OneToThreeKg,
    /// Strictly above 3 kg
    AboveThreeKg,
}

impl WeightBracket {
    /// Select the bracket for a weight.
    ///
    /// The boundaries are exact: 1 kg and 3 kg both land in the middle
    /// bracket, which is why weights are decimals and not floats.
    pub fn for_weight(weight: Decimal) -> Self {
        if weight < dec!(1) {
            WeightBracket::Below1Kg
        } else if weight <= dec!(3) {
            WeightBracket::OneToThreeKg
        } else {
            WeightBracket::AboveThreeKg
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WeightBracket::Below1Kg => "below 1kg",
            WeightBracket::OneToThreeKg => "1kg to 3kg",
            WeightBracket::AboveThreeKg => "above 3kg",
        }
    }
}

// ============================================================================
// ZONE RATE
// ============================================================================

/// One tariff row: a destination zone and its three bracket prices.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneRate {
    pub zone: String,
    pub below_1kg: Option<Decimal>,
    pub one_to_3kg: Option<Decimal>,
    pub above_3kg: Option<Decimal>,
}

impl ZoneRate {
    pub fn new(zone: &str, below_1kg: Decimal, one_to_3kg: Decimal, above_3kg: Decimal) -> Self {
        ZoneRate {
            zone: zone.to_string(),
            below_1kg: Some(below_1kg),
            one_to_3kg: Some(one_to_3kg),
            above_3kg: Some(above_3kg),
        }
    }

    pub fn price_for(&self, bracket: WeightBracket) -> Option<Decimal> {
        match bracket {
            WeightBracket::Below1Kg => self.below_1kg,
            WeightBracket::OneToThreeKg => self.one_to_3kg,
            WeightBracket::AboveThreeKg => self.above_3kg,
        }
    }

    fn slot_mut(&mut self, bracket: WeightBracket) -> &mut Option<Decimal> {
        match bracket {
            WeightBracket::Below1Kg => &mut self.below_1kg,
            WeightBracket::OneToThreeKg => &mut self.one_to_3kg,
            WeightBracket::AboveThreeKg => &mut self.above_3kg,
        }
    }
}

// ============================================================================
// PRICING TABLE
// ============================================================================

/// Ordered tariff table, mutable at runtime by administrative actions.
///
/// Row order is preserved across edits and persistence so the rendered table
/// always reads the same way.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingTable {
    rates: Vec<ZoneRate>,
}

impl PricingTable {
    /// Empty table. Normally only seen when a persisted tariff exists.
    pub fn new() -> Self {
        PricingTable { rates: Vec::new() }
    }

    /// Table pre-loaded with the standard five-zone tariff.
    pub fn with_defaults() -> Self {
        PricingTable {
            rates: vec![
                ZoneRate::new("Zone A", dec!(8.00), dec!(16.00), dec!(18.00)),
                ZoneRate::new("Zone B", dec!(9.00), dec!(18.00), dec!(20.00)),
                ZoneRate::new("Zone C", dec!(10.00), dec!(20.00), dec!(22.00)),
                ZoneRate::new("Zone D", dec!(11.00), dec!(22.00), dec!(24.00)),
                ZoneRate::new("Zone E", dec!(12.00), dec!(24.00), dec!(26.00)),
            ],
        }
    }

    pub fn from_rates(rates: Vec<ZoneRate>) -> Self {
        PricingTable { rates }
    }

    /// Price a weight to a zone.
    ///
    /// `None` means "cannot price this parcel": the zone is unknown or its
    /// selected bracket is unset. Callers must abort the operation on `None`,
    /// never substitute a default price.
    pub fn lookup(&self, zone: &str, weight: Decimal) -> Option<Decimal> {
        let bracket = WeightBracket::for_weight(weight);
        self.rate(zone).and_then(|rate| rate.price_for(bracket))
    }

    /// Set one bracket price for a zone, inserting the zone row if absent.
    ///
    /// The amount is normalized to 2 decimal places (half up) on entry so
    /// every stored currency value stays fixed-point.
    pub fn set_price(
        &mut self,
        zone: &str,
        bracket: WeightBracket,
        amount: Decimal,
    ) -> DeskResult<()> {
        if amount < Decimal::ZERO {
            return Err(DeskError::validation(
                "price",
                format!("{} is negative", amount),
            ));
        }
        let amount = round_money(amount);

        match self.rate_mut(zone) {
            Some(rate) => *rate.slot_mut(bracket) = Some(amount),
            None => {
                let mut rate = ZoneRate {
                    zone: zone.to_string(),
                    below_1kg: None,
                    one_to_3kg: None,
                    above_3kg: None,
                };
                *rate.slot_mut(bracket) = Some(amount);
                self.rates.push(rate);
            }
        }
        Ok(())
    }

    /// Unset every bracket for a zone. The row itself stays, so the zone
    /// still shows in the table with blank prices. Returns false when the
    /// zone is unknown.
    pub fn clear_price(&mut self, zone: &str) -> bool {
        match self.rate_mut(zone) {
            Some(rate) => {
                rate.below_1kg = None;
                rate.one_to_3kg = None;
                rate.above_3kg = None;
                true
            }
            None => false,
        }
    }

    pub fn rate(&self, zone: &str) -> Option<&ZoneRate> {
        self.rates.iter().find(|rate| rate.zone == zone)
    }

    fn rate_mut(&mut self, zone: &str) -> Option<&mut ZoneRate> {
        self.rates.iter_mut().find(|rate| rate.zone == zone)
    }

    pub fn has_zone(&self, zone: &str) -> bool {
        self.rate(zone).is_some()
    }

    pub fn rates(&self) -> &[ZoneRate] {
        &self.rates
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl Default for PricingTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ============================================================================
// TESTS
// ============================================================================
