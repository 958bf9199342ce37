// 🗃️ Desk - Application state and composed operations
// One struct owns every collection plus the store. All mutation goes through
// methods here, and each committed mutation saves its collection before
// returning, so the files always match memory.

use std::path::PathBuf;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::billing::{build_bill, Bill, BillBook, ConsignmentStatus, Statement};
use crate::customers::{Customer, CustomerRegistry};
use crate::error::{DeskError, DeskResult};
use crate::ledger::{ParcelLedger, SenderInfo};
use crate::pricing::{PricingTable, WeightBracket};
use crate::store::JsonStore;
use crate::users::{Role, User, UserDirectory};

/// Credentials seeded when no user archive exists, so a fresh installation
/// is reachable.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin";

pub struct Desk {
    store: JsonStore,
    customers: CustomerRegistry,
    ledger: ParcelLedger,
    bills: BillBook,
    pricing: PricingTable,
    users: UserDirectory,
    seeded_admin: bool,
}

impl Desk {
    /// Open the store and restore every collection. Absent archives start
    /// empty, except pricing (seeded with the standard tariff) and users
    /// (seeded with the default administrator, which is saved immediately).
    pub fn open(data_dir: impl Into<PathBuf>) -> DeskResult<Desk> {
        let store = JsonStore::open(data_dir)?;
        let customers = store.load_customers()?.unwrap_or_default();
        let ledger = store.load_parcels()?.unwrap_or_default();
        let bills = store.load_bills()?.unwrap_or_default();
        let pricing = store
            .load_pricing()?
            .unwrap_or_else(PricingTable::with_defaults);
        let mut users = store.load_users()?.unwrap_or_default();

        let seeded_admin = users.is_empty();
        if seeded_admin {
            users.add(
                DEFAULT_ADMIN_USERNAME,
                DEFAULT_ADMIN_PASSWORD,
                Role::Administrator,
            );
            store.save_users(&users)?;
        }

        Ok(Desk {
            store,
            customers,
            ledger,
            bills,
            pricing,
            users,
            seeded_admin,
        })
    }

    /// Whether this open created the default administrator account. The
    /// shell announces the credentials when true.
    pub fn seeded_default_admin(&self) -> bool {
        self.seeded_admin
    }

    // ========================================================================
    // READ ACCESS
    // ========================================================================

    pub fn customers(&self) -> &CustomerRegistry {
        &self.customers
    }

    pub fn parcels(&self) -> &ParcelLedger {
        &self.ledger
    }

    pub fn bills(&self) -> &BillBook {
        &self.bills
    }

    pub fn pricing(&self) -> &PricingTable {
        &self.pricing
    }

    pub fn users(&self) -> &UserDirectory {
        &self.users
    }

    pub fn login(&self, username: &str, password: &str) -> Option<User> {
        self.users.login(username, password).cloned()
    }

    // ========================================================================
    // CUSTOMERS
    // ========================================================================

    pub fn add_customer(&mut self, name: &str, address: &str, telephone: &str) -> DeskResult<u64> {
        let id = self.customers.register(name, address, telephone)?;
        self.store.save_customers(&self.customers)?;
        Ok(id)
    }

    /// Replace a customer's contact details, both fields at once.
    pub fn update_customer_contact(
        &mut self,
        id: u64,
        address: &str,
        telephone: &str,
    ) -> DeskResult<()> {
        self.customers.update_address(id, address)?;
        self.customers.update_telephone(id, telephone)?;
        self.store.save_customers(&self.customers)
    }

    /// Remove a customer. Their parcels keep the sender blocks they were
    /// shipped with, and filed bills keep their header snapshots.
    pub fn remove_customer(&mut self, id: u64) -> DeskResult<Customer> {
        let dropped = self.customers.remove(id)?;
        self.store.save_customers(&self.customers)?;
        Ok(dropped)
    }

    // ========================================================================
    // CONSIGNMENTS
    // ========================================================================

    /// Create a consignment with one parcel: check the customer, price and
    /// record the parcel, file its bill, persist both collections. Returns
    /// the filed bill.
    pub fn create_consignment(
        &mut self,
        customer_id: u64,
        destination: &str,
        weight: Decimal,
        sender: &SenderInfo,
        date: NaiveDate,
    ) -> DeskResult<Bill> {
        if self.customers.get(customer_id).is_none() {
            return Err(DeskError::not_found("customer", customer_id));
        }
        let (consignment_number, _) =
            self.ledger
                .add(customer_id, &self.pricing, destination, weight, sender, date)?;
        let bill = self
            .bills
            .generate(&consignment_number, self.ledger.parcels(), &self.customers)?;
        self.store.save_parcels(&self.ledger)?;
        self.store.save_bills(&self.bills)?;
        Ok(bill)
    }

    /// Ship one more parcel under an existing consignment and file a fresh
    /// bill covering the whole consignment.
    pub fn append_to_consignment(
        &mut self,
        consignment_number: &str,
        destination: &str,
        weight: Decimal,
        sender: &SenderInfo,
        date: NaiveDate,
    ) -> DeskResult<Bill> {
        self.ledger.append(
            consignment_number,
            &self.pricing,
            destination,
            weight,
            sender,
            date,
        )?;
        let bill = self
            .bills
            .generate(consignment_number, self.ledger.parcels(), &self.customers)?;
        self.store.save_parcels(&self.ledger)?;
        self.store.save_bills(&self.bills)?;
        Ok(bill)
    }

    /// Remove one parcel row. Returns whether a row was removed; filed
    /// bills stay as they were.
    pub fn delete_parcel(
        &mut self,
        consignment_number: &str,
        parcel_number: &str,
    ) -> DeskResult<bool> {
        let removed = self.ledger.delete(consignment_number, parcel_number);
        if removed {
            self.store.save_parcels(&self.ledger)?;
        }
        Ok(removed)
    }

    // ========================================================================
    // BILL VIEWS
    // ========================================================================

    /// Recompute a consignment's bill from the live rows. Not filed, not
    /// persisted; reflects deletions since generation.
    pub fn view_bill(&self, consignment_number: &str) -> DeskResult<Bill> {
        build_bill(consignment_number, self.ledger.parcels(), &self.customers)
    }

    pub fn statement_for_customer(&self, customer_id: u64) -> DeskResult<Statement> {
        if self.customers.get(customer_id).is_none() {
            return Err(DeskError::not_found("customer", customer_id));
        }
        Ok(Statement::from_parcels(
            &self.ledger.list_by_customer(customer_id),
        ))
    }

    pub fn statement_for_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DeskResult<Statement> {
        Ok(Statement::from_parcels(
            &self.ledger.list_by_date_range(start, end)?,
        ))
    }

    pub fn consignment_status(&self, consignment_number: &str) -> DeskResult<ConsignmentStatus> {
        let live = self.ledger.list_by_consignment(consignment_number).len();
        self.bills
            .consignment_status(consignment_number, live)
            .ok_or_else(|| DeskError::not_found("consignment", consignment_number))
    }

    // ========================================================================
    // PRICING
    // ========================================================================

    pub fn check_price(&self, zone: &str, weight: Decimal) -> Option<Decimal> {
        self.pricing.lookup(zone, weight)
    }

    pub fn set_price(
        &mut self,
        zone: &str,
        bracket: WeightBracket,
        amount: Decimal,
    ) -> DeskResult<()> {
        self.pricing.set_price(zone, bracket, amount)?;
        self.store.save_pricing(&self.pricing)
    }

    /// Unset every bracket for a zone. Returns whether the zone existed.
    pub fn clear_price(&mut self, zone: &str) -> DeskResult<bool> {
        let cleared = self.pricing.clear_price(zone);
        if cleared {
            self.store.save_pricing(&self.pricing)?;
        }
        Ok(cleared)
    }

    // ========================================================================
    // USERS
    // ========================================================================

    pub fn add_user(&mut self, username: &str, password: &str, role: Role) -> DeskResult<bool> {
        let added = self.users.add(username, password, role);
        if added {
            self.store.save_users(&self.users)?;
        }
        Ok(added)
    }

    pub fn remove_user(&mut self, username: &str) -> DeskResult<User> {
        let dropped = self.users.remove(username)?;
        self.store.save_users(&self.users)?;
        Ok(dropped)
    }

    pub fn assign_admin(&mut self, username: &str) -> DeskResult<bool> {
        let changed = self.users.assign_admin(username)?;
        if changed {
            self.store.save_users(&self.users)?;
        }
        Ok(changed)
    }

    pub fn remove_admin(&mut self, username: &str) -> DeskResult<bool> {
        let changed = self.users.remove_admin(username)?;
        if changed {
            self.store.save_users(&self.users)?;
        }
        Ok(changed)
    }

    // ========================================================================
    // MAINTENANCE
    // ========================================================================

    /// Clear parcels and bills and rewind both number sequences to the
    /// base. Customers, pricing, and users are untouched. Both emptied
    /// collections are saved before returning.
    pub fn reset_parcels_and_bills(&mut self) -> DeskResult<()> {
        self.ledger.reset();
        self.bills.clear();
        self.store.save_parcels(&self.ledger)?;
        self.store.save_bills(&self.bills)
    }

    /// Persist every collection. The shell calls this on logout and exit.
    pub fn save_all(&self) -> DeskResult<()> {
        self.store.save_customers(&self.customers)?;
        self.store.save_parcels(&self.ledger)?;
        self.store.save_bills(&self.bills)?;
        self.store.save_pricing(&self.pricing)?;
        self.store.save_users(&self.users)
    }
}
