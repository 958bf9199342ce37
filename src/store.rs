// 💾 JSON Store - One file per collection
// Pretty-printed JSON documents, loaded whole and written whole. A missing
// file is an empty collection; every other failure surfaces as a storage
// error with the offending path.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::billing::{Bill, BillBook};
use crate::customers::{Customer, CustomerRegistry};
use crate::error::{DeskError, DeskResult};
use crate::ledger::{Parcel, ParcelLedger};
use crate::pricing::{PricingTable, ZoneRate};
use crate::users::{User, UserDirectory};

const CUSTOMERS_FILE: &str = "customers.json";
const PARCELS_FILE: &str = "parcels.json";
const BILLS_FILE: &str = "bills.json";
const PRICING_FILE: &str = "pricing.json";
const USERS_FILE: &str = "users.json";

// ============================================================================
// ARCHIVE SHAPES
// ============================================================================

/// Customer collection on disk: records plus the id counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomersArchive {
    pub customers: Vec<Customer>,
    pub current_customer_id: u64,
}

/// Parcel collection on disk: rows plus both number counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParcelsArchive {
    pub parcels: Vec<Parcel>,
    pub current_consignment_number: u64,
    pub current_parcel_number: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillsArchive {
    pub bills: Vec<Bill>,
}

/// One persisted tariff row: the zone followed by its three bracket prices
/// in weight order, unset brackets as null.
pub type PricingRow = (String, Option<Decimal>, Option<Decimal>, Option<Decimal>);

// ============================================================================
// STORE
// ============================================================================

/// File-per-collection store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Open a store rooted at `dir`, creating the directory when absent.
    pub fn open(dir: impl Into<PathBuf>) -> DeskResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| storage_error(&dir, e))?;
        Ok(JsonStore { dir })
    }

    pub fn load_customers(&self) -> DeskResult<Option<CustomerRegistry>> {
        Ok(self
            .read::<CustomersArchive>(CUSTOMERS_FILE)?
            .map(|a| CustomerRegistry::from_records(a.customers, a.current_customer_id)))
    }

    pub fn save_customers(&self, registry: &CustomerRegistry) -> DeskResult<()> {
        self.write(
            CUSTOMERS_FILE,
            &CustomersArchive {
                customers: registry.records().to_vec(),
                current_customer_id: registry.next_id(),
            },
        )
    }

    pub fn load_parcels(&self) -> DeskResult<Option<ParcelLedger>> {
        Ok(self.read::<ParcelsArchive>(PARCELS_FILE)?.map(|a| {
            ParcelLedger::from_records(
                a.parcels,
                a.current_consignment_number,
                a.current_parcel_number,
            )
        }))
    }

    pub fn save_parcels(&self, ledger: &ParcelLedger) -> DeskResult<()> {
        self.write(
            PARCELS_FILE,
            &ParcelsArchive {
                parcels: ledger.parcels().to_vec(),
                current_consignment_number: ledger.next_consignment_value(),
                current_parcel_number: ledger.next_parcel_value(),
            },
        )
    }

    pub fn load_bills(&self) -> DeskResult<Option<BillBook>> {
        Ok(self
            .read::<BillsArchive>(BILLS_FILE)?
            .map(|a| BillBook::from_records(a.bills)))
    }

    pub fn save_bills(&self, book: &BillBook) -> DeskResult<()> {
        self.write(
            BILLS_FILE,
            &BillsArchive {
                bills: book.bills().to_vec(),
            },
        )
    }

    pub fn load_pricing(&self) -> DeskResult<Option<PricingTable>> {
        Ok(self.read::<Vec<PricingRow>>(PRICING_FILE)?.map(|rows| {
            PricingTable::from_rates(
                rows.into_iter()
                    .map(|(zone, below_1kg, one_to_3kg, above_3kg)| ZoneRate {
                        zone,
                        below_1kg,
                        one_to_3kg,
                        above_3kg,
                    })
                    .collect(),
            )
        }))
    }

    pub fn save_pricing(&self, table: &PricingTable) -> DeskResult<()> {
        let rows: Vec<PricingRow> = table
            .rates()
            .iter()
            .map(|r| (r.zone.clone(), r.below_1kg, r.one_to_3kg, r.above_3kg))
            .collect();
        self.write(PRICING_FILE, &rows)
    }

    pub fn load_users(&self) -> DeskResult<Option<UserDirectory>> {
        Ok(self
            .read::<Vec<User>>(USERS_FILE)?
            .map(UserDirectory::from_records))
    }

    pub fn save_users(&self, directory: &UserDirectory) -> DeskResult<()> {
        self.write(USERS_FILE, directory.records())
    }

    fn read<T: DeserializeOwned>(&self, name: &str) -> DeskResult<Option<T>> {
        let path = self.dir.join(name);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(storage_error(&path, err)),
        };
        let value = serde_json::from_str(&content).map_err(|e| storage_error(&path, e))?;
        Ok(Some(value))
    }

    fn write<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> DeskResult<()> {
        let path = self.dir.join(name);
        let content = serde_json::to_string_pretty(value).map_err(|e| storage_error(&path, e))?;
        fs::write(&path, content).map_err(|e| storage_error(&path, e))
    }
}

fn storage_error(path: &Path, err: impl std::fmt::Display) -> DeskError {
    DeskError::Storage {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}
