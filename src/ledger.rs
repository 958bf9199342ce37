// 📦 Parcel Ledger - Consignment rows and their lifecycle
// Every parcel is priced at creation from the tariff in force and records
// the sender block handed in with it, so later edits to customers or pricing
// never rewrite shipped history.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DeskError, DeskResult};
use crate::numbering::{format_consignment_number, format_parcel_number, NumberSequence};
use crate::pricing::PricingTable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parcel {
    pub consignment_number: String,
    pub parcel_number: String,
    pub customer_id: u64,
    pub destination: String,
    pub weight: Decimal,
    pub sender_name: String,
    pub sender_address: String,
    pub sender_telephone: String,
    pub price: Decimal,
    pub date: NaiveDate,
}

/// Sender contact block supplied with each parcel. The referenced customer
/// is the account being billed; who hands the parcel over is per-parcel
/// input and may differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderInfo {
    pub name: String,
    pub address: String,
    pub telephone: String,
}

impl SenderInfo {
    pub fn new(name: &str, address: &str, telephone: &str) -> Self {
        SenderInfo {
            name: name.trim().to_string(),
            address: address.trim().to_string(),
            telephone: telephone.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParcelLedger {
    parcels: Vec<Parcel>,
    consignment_seq: NumberSequence,
    parcel_seq: NumberSequence,
}

impl ParcelLedger {
    pub fn new() -> Self {
        ParcelLedger {
            parcels: Vec::new(),
            consignment_seq: NumberSequence::new(),
            parcel_seq: NumberSequence::new(),
        }
    }

    pub fn from_records(parcels: Vec<Parcel>, next_consignment: u64, next_parcel: u64) -> Self {
        ParcelLedger {
            parcels,
            consignment_seq: NumberSequence::resume_at(next_consignment),
            parcel_seq: NumberSequence::resume_at(next_parcel),
        }
    }

    /// Ship one parcel under a freshly minted consignment number.
    ///
    /// The parcel is priced from the tariff and records the given sender
    /// block. Validation and pricing run before any id is minted, so a
    /// rejected call leaves the ledger and both counters untouched. Returns
    /// `(consignment_number, parcel_number)`.
    pub fn add(
        &mut self,
        customer_id: u64,
        pricing: &PricingTable,
        destination: &str,
        weight: Decimal,
        sender: &SenderInfo,
        date: NaiveDate,
    ) -> DeskResult<(String, String)> {
        let (destination, price) = price_parcel(pricing, destination, weight)?;

        let consignment_number = self.mint_consignment_number();
        let parcel_number = self.mint_parcel_number();
        self.parcels.push(Parcel {
            consignment_number: consignment_number.clone(),
            parcel_number: parcel_number.clone(),
            customer_id,
            destination,
            weight,
            sender_name: sender.name.clone(),
            sender_address: sender.address.clone(),
            sender_telephone: sender.telephone.clone(),
            price,
            date,
        });
        Ok((consignment_number, parcel_number))
    }

    /// Ship a further parcel under an existing consignment number, minting
    /// only a parcel id. The customer linkage is copied from the
    /// consignment's first surviving row; the sender block is the caller's,
    /// as on `add`.
    pub fn append(
        &mut self,
        consignment_number: &str,
        pricing: &PricingTable,
        destination: &str,
        weight: Decimal,
        sender: &SenderInfo,
        date: NaiveDate,
    ) -> DeskResult<String> {
        let (destination, price) = price_parcel(pricing, destination, weight)?;
        let (consignment_number, customer_id) = self
            .parcels
            .iter()
            .find(|p| p.consignment_number == consignment_number)
            .map(|p| (p.consignment_number.clone(), p.customer_id))
            .ok_or_else(|| DeskError::not_found("consignment", consignment_number))?;

        let parcel_number = self.mint_parcel_number();
        self.parcels.push(Parcel {
            consignment_number,
            parcel_number: parcel_number.clone(),
            customer_id,
            destination,
            weight,
            sender_name: sender.name.clone(),
            sender_address: sender.address.clone(),
            sender_telephone: sender.telephone.clone(),
            price,
            date,
        });
        Ok(parcel_number)
    }

    /// Remove one row by its `(consignment, parcel)` pair. Returns whether a
    /// row was actually removed. Bills already generated are not touched.
    pub fn delete(&mut self, consignment_number: &str, parcel_number: &str) -> bool {
        let before = self.parcels.len();
        self.parcels.retain(|p| {
            !(p.consignment_number == consignment_number && p.parcel_number == parcel_number)
        });
        self.parcels.len() < before
    }

    pub fn list_all(&self) -> Vec<Parcel> {
        self.parcels.clone()
    }

    pub fn list_by_consignment(&self, consignment_number: &str) -> Vec<Parcel> {
        self.parcels
            .iter()
            .filter(|p| p.consignment_number == consignment_number)
            .cloned()
            .collect()
    }

    pub fn list_by_customer(&self, customer_id: u64) -> Vec<Parcel> {
        self.parcels
            .iter()
            .filter(|p| p.customer_id == customer_id)
            .cloned()
            .collect()
    }

    /// Rows shipped within `[start, end]`, inclusive on both ends.
    pub fn list_by_date_range(&self, start: NaiveDate, end: NaiveDate) -> DeskResult<Vec<Parcel>> {
        if start > end {
            return Err(DeskError::InvalidRange { start, end });
        }
        Ok(self
            .parcels
            .iter()
            .filter(|p| start <= p.date && p.date <= end)
            .cloned()
            .collect())
    }

    /// Raw rows in insertion order, for persistence and billing scans.
    pub fn parcels(&self) -> &[Parcel] {
        &self.parcels
    }

    /// Counter values to persist alongside the rows.
    pub fn next_consignment_value(&self) -> u64 {
        self.consignment_seq.next_value()
    }

    pub fn next_parcel_value(&self) -> u64 {
        self.parcel_seq.next_value()
    }

    pub fn len(&self) -> usize {
        self.parcels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parcels.is_empty()
    }

    /// Drop every row and rewind both counters to the base. Part of the
    /// administrative reset; bills are cleared by their own collection.
    pub fn reset(&mut self) {
        self.parcels.clear();
        self.consignment_seq.rewind();
        self.parcel_seq.rewind();
    }

    fn mint_consignment_number(&mut self) -> String {
        let parcels = &self.parcels;
        let value = self.consignment_seq.allocate(|n| {
            let candidate = format_consignment_number(n);
            parcels.iter().any(|p| p.consignment_number == candidate)
        });
        format_consignment_number(value)
    }

    fn mint_parcel_number(&mut self) -> String {
        let parcels = &self.parcels;
        let value = self.parcel_seq.allocate(|n| {
            let candidate = format_parcel_number(n);
            parcels.iter().any(|p| p.parcel_number == candidate)
        });
        format_parcel_number(value)
    }
}

impl Default for ParcelLedger {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared validation for add and append. Nothing here mutates state.
fn price_parcel(
    pricing: &PricingTable,
    destination: &str,
    weight: Decimal,
) -> DeskResult<(String, Decimal)> {
    let destination = destination.trim();
    if destination.is_empty() {
        return Err(DeskError::validation("destination", "must not be empty"));
    }
    if weight < Decimal::ZERO {
        return Err(DeskError::validation("weight", "must not be negative"));
    }
    let price = pricing
        .lookup(destination, weight)
        .ok_or_else(|| DeskError::Pricing {
            zone: destination.to_string(),
            weight,
        })?;
    Ok((destination.to_string(), price))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numbering::SEQUENCE_BASE;
    use rust_decimal_macros::dec;

    fn sender() -> SenderInfo {
        SenderInfo::new("Mei Ling", "12 Jalan Ampang", "012-3456789")
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn row(consignment: &str, parcel: &str, date: NaiveDate) -> Parcel {
        Parcel {
            consignment_number: consignment.to_string(),
            parcel_number: parcel.to_string(),
            customer_id: 1,
            destination: "Zone A".to_string(),
            weight: dec!(2.5),
            sender_name: "Mei Ling".to_string(),
            sender_address: "12 Jalan Ampang".to_string(),
            sender_telephone: "012-3456789".to_string(),
            price: dec!(16.00),
            date,
        }
    }

    #[test]
    fn test_add_prices_and_records_the_sender_block() {
        let mut ledger = ParcelLedger::new();
        let table = PricingTable::with_defaults();
        let (consignment, parcel) = ledger
            .add(1, &table, "Zone A", dec!(2.5), &sender(), d(2024, 3, 1))
            .unwrap();

        assert_eq!(consignment, "10000000");
        assert_eq!(parcel, "P10000000");
        let stored = &ledger.parcels()[0];
        assert_eq!(stored.customer_id, 1);
        assert_eq!(stored.price, dec!(16.00));
        assert_eq!(stored.sender_name, "Mei Ling");
        assert_eq!(stored.sender_address, "12 Jalan Ampang");
        assert_eq!(stored.sender_telephone, "012-3456789");
        assert_eq!(stored.date, d(2024, 3, 1));
    }

    #[test]
    fn test_sender_fields_are_trimmed() {
        let info = SenderInfo::new("  Hafiz ", " 7 Jalan Petaling ", " 017 ");
        assert_eq!(info.name, "Hafiz");
        assert_eq!(info.address, "7 Jalan Petaling");
        assert_eq!(info.telephone, "017");
    }

    #[test]
    fn test_each_add_mints_a_fresh_consignment() {
        let mut ledger = ParcelLedger::new();
        let table = PricingTable::with_defaults();
        let (c1, p1) = ledger
            .add(1, &table, "Zone A", dec!(0.5), &sender(), d(2024, 3, 1))
            .unwrap();
        let (c2, p2) = ledger
            .add(1, &table, "Zone B", dec!(4.0), &sender(), d(2024, 3, 2))
            .unwrap();
        assert_ne!(c1, c2);
        assert_ne!(p1, p2);
    }

    #[test]
    fn test_unpriceable_zone_leaves_ledger_untouched() {
        let mut ledger = ParcelLedger::new();
        let table = PricingTable::with_defaults();
        let err = ledger
            .add(1, &table, "Zone Z", dec!(1.0), &sender(), d(2024, 3, 1))
            .unwrap_err();

        assert!(matches!(err, DeskError::Pricing { .. }));
        assert!(ledger.is_empty());
        // No id was minted for the failed call
        assert_eq!(ledger.next_consignment_value(), SEQUENCE_BASE);
        assert_eq!(ledger.next_parcel_value(), SEQUENCE_BASE);
    }

    #[test]
    fn test_negative_weight_rejected_before_ids() {
        let mut ledger = ParcelLedger::new();
        let table = PricingTable::with_defaults();
        let err = ledger
            .add(1, &table, "Zone A", dec!(-1.0), &sender(), d(2024, 3, 1))
            .unwrap_err();

        assert!(matches!(err, DeskError::Validation { field: "weight", .. }));
        assert_eq!(ledger.next_parcel_value(), SEQUENCE_BASE);
    }

    #[test]
    fn test_zero_weight_is_priceable() {
        let mut ledger = ParcelLedger::new();
        let table = PricingTable::with_defaults();
        ledger
            .add(1, &table, "Zone A", dec!(0), &sender(), d(2024, 3, 1))
            .unwrap();
        assert_eq!(ledger.parcels()[0].price, dec!(8.00));
    }

    #[test]
    fn test_append_reuses_consignment_and_customer() {
        let mut ledger = ParcelLedger::new();
        let table = PricingTable::with_defaults();
        let (consignment, first) = ledger
            .add(1, &table, "Zone A", dec!(2.5), &sender(), d(2024, 3, 1))
            .unwrap();

        let relief = SenderInfo::new("Hafiz", "7 Jalan Petaling", "017-2223344");
        let second = ledger
            .append(&consignment, &table, "Zone B", dec!(0.5), &relief, d(2024, 3, 2))
            .unwrap();

        assert_ne!(first, second);
        let rows = ledger.list_by_consignment(&consignment);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].customer_id, rows[0].customer_id);
        // Each row keeps the sender block it was created with
        assert_eq!(rows[0].sender_name, "Mei Ling");
        assert_eq!(rows[1].sender_name, "Hafiz");
        assert_eq!(rows[1].price, dec!(9.00));
    }

    #[test]
    fn test_append_to_unknown_consignment_fails() {
        let mut ledger = ParcelLedger::new();
        let table = PricingTable::with_defaults();
        let err = ledger
            .append("99999999", &table, "Zone A", dec!(1.0), &sender(), d(2024, 3, 1))
            .unwrap_err();
        assert!(matches!(
            err,
            DeskError::NotFound {
                entity: "consignment",
                ..
            }
        ));
    }

    #[test]
    fn test_delete_removes_exactly_one_pair() {
        let mut ledger = ParcelLedger::new();
        let table = PricingTable::with_defaults();
        let (consignment, first) = ledger
            .add(1, &table, "Zone A", dec!(2.5), &sender(), d(2024, 3, 1))
            .unwrap();
        let second = ledger
            .append(&consignment, &table, "Zone A", dec!(0.5), &sender(), d(2024, 3, 1))
            .unwrap();

        assert!(ledger.delete(&consignment, &first));
        let rows = ledger.list_by_consignment(&consignment);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].parcel_number, second);
    }

    #[test]
    fn test_delete_missing_pair_returns_false() {
        let mut ledger = ParcelLedger::new();
        let table = PricingTable::with_defaults();
        let (consignment, parcel) = ledger
            .add(1, &table, "Zone A", dec!(2.5), &sender(), d(2024, 3, 1))
            .unwrap();

        assert!(!ledger.delete(&consignment, "P99999999"));
        assert!(!ledger.delete("99999999", &parcel));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_date_range_is_inclusive_on_both_ends() {
        let ledger = ParcelLedger::from_records(
            vec![
                row("10000000", "P10000000", d(2024, 3, 1)),
                row("10000001", "P10000001", d(2024, 3, 5)),
                row("10000002", "P10000002", d(2024, 3, 9)),
            ],
            SEQUENCE_BASE + 3,
            SEQUENCE_BASE + 3,
        );

        let hits = ledger.list_by_date_range(d(2024, 3, 1), d(2024, 3, 5)).unwrap();
        assert_eq!(hits.len(), 2);

        // Widening the range never drops a previously included row
        let wider = ledger.list_by_date_range(d(2024, 2, 1), d(2024, 4, 1)).unwrap();
        assert_eq!(wider.len(), 3);
    }

    #[test]
    fn test_reversed_date_range_is_rejected() {
        let ledger = ParcelLedger::new();
        let err = ledger
            .list_by_date_range(d(2024, 3, 10), d(2024, 3, 1))
            .unwrap_err();
        assert!(matches!(err, DeskError::InvalidRange { .. }));
    }

    #[test]
    fn test_list_by_customer_filters_rows() {
        let mut other = row("10000001", "P10000001", d(2024, 3, 2));
        other.customer_id = 2;
        let ledger = ParcelLedger::from_records(
            vec![row("10000000", "P10000000", d(2024, 3, 1)), other],
            SEQUENCE_BASE + 2,
            SEQUENCE_BASE + 2,
        );

        let mine = ledger.list_by_customer(1);
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].parcel_number, "P10000000");
    }

    #[test]
    fn test_minting_skips_ids_still_on_file() {
        // A hand-edited archive can leave the counters pointing at taken ids
        let mut ledger = ParcelLedger::from_records(
            vec![row("10000005", "P10000005", d(2024, 3, 1))],
            10_000_005,
            10_000_005,
        );
        let table = PricingTable::with_defaults();
        let (consignment, parcel) = ledger
            .add(1, &table, "Zone A", dec!(2.5), &sender(), d(2024, 3, 2))
            .unwrap();

        assert_eq!(consignment, "10000006");
        assert_eq!(parcel, "P10000006");
    }

    #[test]
    fn test_reset_clears_rows_and_rewinds_counters() {
        let mut ledger = ParcelLedger::new();
        let table = PricingTable::with_defaults();
        ledger
            .add(1, &table, "Zone A", dec!(2.5), &sender(), d(2024, 3, 1))
            .unwrap();

        ledger.reset();
        assert!(ledger.is_empty());
        assert_eq!(ledger.next_consignment_value(), SEQUENCE_BASE);
        assert_eq!(ledger.next_parcel_value(), SEQUENCE_BASE);
    }
}
