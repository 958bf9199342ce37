// 🧾 Billing Engine - Consignment bills and cross-consignment statements
// Bills are derived records: generated once when a consignment is created,
// kept as append-only history, and recomputable at any time from the live
// parcel rows. All tax math lives here.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::customers::CustomerRegistry;
use crate::error::{DeskError, DeskResult};
use crate::ledger::Parcel;
use crate::money::round_money;

/// Flat service tax applied to every bill subtotal.
pub const SERVICE_TAX_RATE: Decimal = dec!(0.08);

/// One line of a bill. The sender's contact block appears under receiver
/// labels; the archived bill layout depends on these field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillItem {
    pub parcel_number: String,
    pub receiver_name: String,
    pub receiver_address: String,
    pub receiver_telephone: String,
    pub destination: String,
    pub weight: Decimal,
    pub price: Decimal,
}

impl BillItem {
    fn from_parcel(parcel: &Parcel) -> Self {
        BillItem {
            parcel_number: parcel.parcel_number.clone(),
            receiver_name: parcel.sender_name.clone(),
            receiver_address: parcel.sender_address.clone(),
            receiver_telephone: parcel.sender_telephone.clone(),
            destination: parcel.destination.clone(),
            weight: parcel.weight,
            price: parcel.price,
        }
    }
}

/// A filed or freshly computed bill for one consignment.
///
/// The customer header is a snapshot taken at build time; when the customer
/// cannot be resolved the header stays empty and the bill is still issued.
/// The date is the consignment's first parcel date, so rebuilding a bill
/// never consults a clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub consignment_number: String,
    pub date: NaiveDate,
    pub customer_name: Option<String>,
    pub customer_address: Option<String>,
    pub customer_telephone: Option<String>,
    pub items: Vec<BillItem>,
    pub subtotal: Decimal,
    pub service_tax: Decimal,
    pub total_with_tax: Decimal,
}

/// One row of a customer or date-range statement.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementRow {
    pub consignment_number: String,
    pub parcel_number: String,
    pub receiver_name: String,
    pub receiver_address: String,
    pub receiver_telephone: String,
    pub destination: String,
    pub weight: Decimal,
    pub price: Decimal,
}

impl StatementRow {
    fn from_parcel(parcel: &Parcel) -> Self {
        StatementRow {
            consignment_number: parcel.consignment_number.clone(),
            parcel_number: parcel.parcel_number.clone(),
            receiver_name: parcel.sender_name.clone(),
            receiver_address: parcel.sender_address.clone(),
            receiver_telephone: parcel.sender_telephone.clone(),
            destination: parcel.destination.clone(),
            weight: parcel.weight,
            price: parcel.price,
        }
    }
}

/// A cross-consignment aggregation with the same totals block as a bill.
/// Statements are views; they are never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub rows: Vec<StatementRow>,
    pub subtotal: Decimal,
    pub service_tax: Decimal,
    pub total_with_tax: Decimal,
}

impl Statement {
    /// Aggregate any pre-filtered set of parcel rows. An empty set yields
    /// an empty statement with zero totals, not an error.
    pub fn from_parcels(parcels: &[Parcel]) -> Self {
        let rows: Vec<StatementRow> = parcels.iter().map(StatementRow::from_parcel).collect();
        let subtotal: Decimal = rows.iter().map(|r| r.price).sum();
        let (subtotal, service_tax, total_with_tax) = tax_block(subtotal);
        Statement {
            rows,
            subtotal,
            service_tax,
            total_with_tax,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Where a consignment stands relative to its most recent filed bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsignmentStatus {
    Created,
    PartiallyDeleted,
    Empty,
}

impl ConsignmentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ConsignmentStatus::Created => "CREATED",
            ConsignmentStatus::PartiallyDeleted => "PARTIALLY_DELETED",
            ConsignmentStatus::Empty => "EMPTY",
        }
    }
}

/// Compute a consignment's bill from live parcel rows without filing it.
///
/// Scans `parcels` for rows under `consignment_number`; fails with not-found
/// when there are none. The customer header snapshot comes from the first
/// row's `customer_id`, resolved against the registry at build time.
pub fn build_bill(
    consignment_number: &str,
    parcels: &[Parcel],
    customers: &CustomerRegistry,
) -> DeskResult<Bill> {
    let rows: Vec<&Parcel> = parcels
        .iter()
        .filter(|p| p.consignment_number == consignment_number)
        .collect();
    let first = rows
        .first()
        .ok_or_else(|| DeskError::not_found("consignment", consignment_number))?;

    let customer = customers.get(first.customer_id);
    let items: Vec<BillItem> = rows.iter().map(|p| BillItem::from_parcel(p)).collect();
    let subtotal: Decimal = items.iter().map(|i| i.price).sum();
    let (subtotal, service_tax, total_with_tax) = tax_block(subtotal);

    Ok(Bill {
        consignment_number: consignment_number.to_string(),
        date: first.date,
        customer_name: customer.map(|c| c.name.clone()),
        customer_address: customer.map(|c| c.address.clone()),
        customer_telephone: customer.map(|c| c.telephone.clone()),
        items,
        subtotal,
        service_tax,
        total_with_tax,
    })
}

/// Append-only collection of every bill ever generated.
#[derive(Debug, Clone, Default)]
pub struct BillBook {
    bills: Vec<Bill>,
}

impl BillBook {
    pub fn new() -> Self {
        BillBook { bills: Vec::new() }
    }

    pub fn from_records(bills: Vec<Bill>) -> Self {
        BillBook { bills }
    }

    /// Build the bill for a consignment from live rows and file it.
    pub fn generate(
        &mut self,
        consignment_number: &str,
        parcels: &[Parcel],
        customers: &CustomerRegistry,
    ) -> DeskResult<Bill> {
        let bill = build_bill(consignment_number, parcels, customers)?;
        self.bills.push(bill.clone());
        Ok(bill)
    }

    /// Most recently filed bill for a consignment, if any. Orphaned bills
    /// whose parcels were all deleted still count.
    pub fn latest_for(&self, consignment_number: &str) -> Option<&Bill> {
        self.bills
            .iter()
            .rev()
            .find(|b| b.consignment_number == consignment_number)
    }

    /// Classify a consignment by comparing its live row count against the
    /// most recently filed bill. `None` when the number was never billed
    /// and has no live rows either.
    pub fn consignment_status(
        &self,
        consignment_number: &str,
        live_rows: usize,
    ) -> Option<ConsignmentStatus> {
        match self.latest_for(consignment_number) {
            Some(bill) => Some(if live_rows == 0 {
                ConsignmentStatus::Empty
            } else if live_rows < bill.items.len() {
                ConsignmentStatus::PartiallyDeleted
            } else {
                ConsignmentStatus::Created
            }),
            None if live_rows > 0 => Some(ConsignmentStatus::Created),
            None => None,
        }
    }

    pub fn bills(&self) -> &[Bill] {
        &self.bills
    }

    pub fn len(&self) -> usize {
        self.bills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bills.is_empty()
    }

    /// Forget all history. Only the administrative reset calls this.
    pub fn clear(&mut self) {
        self.bills.clear();
    }
}

/// Totals block shared by bills and statements. Item prices are already
/// two-decimal amounts; rounding happens only here, half up, at the sums.
fn tax_block(subtotal: Decimal) -> (Decimal, Decimal, Decimal) {
    let subtotal = round_money(subtotal);
    let service_tax = round_money(subtotal * SERVICE_TAX_RATE);
    let total_with_tax = round_money(subtotal + service_tax);
    (subtotal, service_tax, total_with_tax)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{ParcelLedger, SenderInfo};
    use crate::pricing::PricingTable;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn fixtures() -> (CustomerRegistry, PricingTable, ParcelLedger) {
        let mut customers = CustomerRegistry::new();
        customers
            .register("Mei Ling", "12 Jalan Ampang", "012-3456789")
            .unwrap();
        (customers, PricingTable::with_defaults(), ParcelLedger::new())
    }

    fn sender() -> SenderInfo {
        SenderInfo::new("Mei Ling", "12 Jalan Ampang", "012-3456789")
    }

    #[test]
    fn test_generated_bill_matches_quoted_tariff() {
        let (customers, table, mut ledger) = fixtures();
        let (consignment, _) = ledger
            .add(1, &table, "Zone A", dec!(2.5), &sender(), d(2024, 3, 1))
            .unwrap();

        let mut book = BillBook::new();
        let bill = book
            .generate(&consignment, ledger.parcels(), &customers)
            .unwrap();

        assert_eq!(bill.subtotal, dec!(16.00));
        assert_eq!(bill.service_tax, dec!(1.28));
        assert_eq!(bill.total_with_tax, dec!(17.28));
        assert_eq!(bill.date, d(2024, 3, 1));
        assert_eq!(bill.customer_name.as_deref(), Some("Mei Ling"));
        assert_eq!(bill.customer_address.as_deref(), Some("12 Jalan Ampang"));
        assert_eq!(bill.items.len(), 1);
        assert_eq!(bill.items[0].receiver_name, "Mei Ling");
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_two_parcels_share_one_totals_block() {
        let (customers, table, mut ledger) = fixtures();
        // Zone C: 10.00 below 1kg, 20.00 for 1-3kg
        let (consignment, _) = ledger
            .add(1, &table, "Zone C", dec!(0.5), &sender(), d(2024, 3, 1))
            .unwrap();
        ledger
            .append(&consignment, &table, "Zone C", dec!(2.0), &sender(), d(2024, 3, 1))
            .unwrap();

        let bill = build_bill(&consignment, ledger.parcels(), &customers).unwrap();
        assert_eq!(bill.subtotal, dec!(30.00));
        assert_eq!(bill.service_tax, dec!(2.40));
        assert_eq!(bill.total_with_tax, dec!(32.40));
    }

    #[test]
    fn test_view_is_idempotent_without_mutation() {
        let (customers, table, mut ledger) = fixtures();
        let (consignment, _) = ledger
            .add(1, &table, "Zone B", dec!(1.0), &sender(), d(2024, 3, 1))
            .unwrap();

        let first = build_bill(&consignment, ledger.parcels(), &customers).unwrap();
        let second = build_bill(&consignment, ledger.parcels(), &customers).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_view_reflects_deletions_filed_bill_does_not() {
        let (customers, table, mut ledger) = fixtures();
        let (consignment, first) = ledger
            .add(1, &table, "Zone C", dec!(0.5), &sender(), d(2024, 3, 1))
            .unwrap();
        ledger
            .append(&consignment, &table, "Zone C", dec!(2.0), &sender(), d(2024, 3, 1))
            .unwrap();

        let mut book = BillBook::new();
        book.generate(&consignment, ledger.parcels(), &customers)
            .unwrap();

        ledger.delete(&consignment, &first);
        let reviewed = build_bill(&consignment, ledger.parcels(), &customers).unwrap();
        assert_eq!(reviewed.subtotal, dec!(20.00));
        assert_eq!(reviewed.total_with_tax, dec!(21.60));

        // History keeps the original totals
        let filed = book.latest_for(&consignment).unwrap();
        assert_eq!(filed.subtotal, dec!(30.00));
    }

    #[test]
    fn test_unknown_consignment_fails() {
        let (customers, _, ledger) = fixtures();
        let err = build_bill("99999999", ledger.parcels(), &customers).unwrap_err();
        assert!(matches!(
            err,
            DeskError::NotFound {
                entity: "consignment",
                ..
            }
        ));
    }

    #[test]
    fn test_header_stays_empty_when_customer_missing() {
        let (mut customers, table, mut ledger) = fixtures();
        let (consignment, _) = ledger
            .add(1, &table, "Zone A", dec!(0.5), &sender(), d(2024, 3, 1))
            .unwrap();
        customers.remove(1).unwrap();

        let bill = build_bill(&consignment, ledger.parcels(), &customers).unwrap();
        assert_eq!(bill.customer_name, None);
        assert_eq!(bill.customer_address, None);
        // Line items still carry the sender block recorded at shipping time
        assert_eq!(bill.items[0].receiver_name, "Mei Ling");
        assert_eq!(bill.subtotal, dec!(8.00));
    }

    #[test]
    fn test_filed_header_is_a_snapshot_not_a_reference() {
        let (mut customers, table, mut ledger) = fixtures();
        let (consignment, _) = ledger
            .add(1, &table, "Zone A", dec!(0.5), &sender(), d(2024, 3, 1))
            .unwrap();

        let mut book = BillBook::new();
        book.generate(&consignment, ledger.parcels(), &customers)
            .unwrap();
        customers.update_address(1, "88 Jalan Tun Razak").unwrap();

        let filed = book.latest_for(&consignment).unwrap();
        assert_eq!(filed.customer_address.as_deref(), Some("12 Jalan Ampang"));

        let rebuilt = build_bill(&consignment, ledger.parcels(), &customers).unwrap();
        assert_eq!(rebuilt.customer_address.as_deref(), Some("88 Jalan Tun Razak"));
    }

    #[test]
    fn test_statement_carries_the_same_tax_block() {
        let (_, table, mut ledger) = fixtures();
        ledger
            .add(1, &table, "Zone C", dec!(0.5), &sender(), d(2024, 3, 1))
            .unwrap();
        ledger
            .add(1, &table, "Zone C", dec!(2.0), &sender(), d(2024, 3, 5))
            .unwrap();

        let statement = Statement::from_parcels(&ledger.list_by_customer(1));
        assert_eq!(statement.rows.len(), 2);
        assert_eq!(statement.subtotal, dec!(30.00));
        assert_eq!(statement.service_tax, dec!(2.40));
        assert_eq!(statement.total_with_tax, dec!(32.40));
    }

    #[test]
    fn test_empty_statement_has_zero_totals() {
        let statement = Statement::from_parcels(&[]);
        assert!(statement.is_empty());
        assert_eq!(statement.subtotal, Decimal::ZERO);
        assert_eq!(statement.total_with_tax, Decimal::ZERO);
    }

    #[test]
    fn test_tax_rounds_half_up_at_the_sum() {
        use crate::pricing::WeightBracket;

        let (customers, mut table, mut ledger) = fixtures();
        // 8.95 * 0.08 = 0.716, which must land on 0.72
        table
            .set_price("Zone A", WeightBracket::Below1Kg, dec!(8.95))
            .unwrap();
        let (consignment, _) = ledger
            .add(1, &table, "Zone A", dec!(0.5), &sender(), d(2024, 3, 1))
            .unwrap();

        let bill = build_bill(&consignment, ledger.parcels(), &customers).unwrap();
        assert_eq!(bill.subtotal, dec!(8.95));
        assert_eq!(bill.service_tax, dec!(0.72));
        assert_eq!(bill.total_with_tax, dec!(9.67));
    }

    #[test]
    fn test_consignment_status_follows_deletions() {
        let (customers, table, mut ledger) = fixtures();
        let (consignment, first) = ledger
            .add(1, &table, "Zone C", dec!(0.5), &sender(), d(2024, 3, 1))
            .unwrap();
        let second = ledger
            .append(&consignment, &table, "Zone C", dec!(2.0), &sender(), d(2024, 3, 1))
            .unwrap();

        let mut book = BillBook::new();
        book.generate(&consignment, ledger.parcels(), &customers)
            .unwrap();

        let live = |ledger: &ParcelLedger| ledger.list_by_consignment(&consignment).len();
        assert_eq!(
            book.consignment_status(&consignment, live(&ledger)),
            Some(ConsignmentStatus::Created)
        );

        ledger.delete(&consignment, &first);
        assert_eq!(
            book.consignment_status(&consignment, live(&ledger)),
            Some(ConsignmentStatus::PartiallyDeleted)
        );

        ledger.delete(&consignment, &second);
        assert_eq!(
            book.consignment_status(&consignment, live(&ledger)),
            Some(ConsignmentStatus::Empty)
        );

        assert_eq!(book.consignment_status("99999999", 0), None);
    }

    #[test]
    fn test_reset_clears_history() {
        let (customers, table, mut ledger) = fixtures();
        let (consignment, _) = ledger
            .add(1, &table, "Zone A", dec!(0.5), &sender(), d(2024, 3, 1))
            .unwrap();
        let mut book = BillBook::new();
        book.generate(&consignment, ledger.parcels(), &customers)
            .unwrap();

        book.clear();
        assert!(book.is_empty());
        assert_eq!(book.latest_for(&consignment), None);
    }
}
