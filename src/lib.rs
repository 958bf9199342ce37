// Parcel Desk - Core Library
// Exposes all modules for use in the CLI shell and tests

pub mod error;
pub mod money;
pub mod pricing;
pub mod numbering;
pub mod customers;
pub mod ledger;
pub mod billing;
pub mod users;
pub mod store;
pub mod render;
pub mod desk;

// Re-export commonly used types
pub use billing::{
    build_bill, Bill, BillBook, BillItem, ConsignmentStatus, Statement, StatementRow,
    SERVICE_TAX_RATE,
};
pub use customers::{Customer, CustomerRegistry};
pub use desk::{Desk, DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME};
pub use error::{DeskError, DeskResult};
pub use ledger::{Parcel, ParcelLedger, SenderInfo};
pub use money::round_money;
pub use numbering::{
    format_consignment_number, format_parcel_number, NumberSequence, SEQUENCE_BASE,
};
pub use pricing::{PricingTable, WeightBracket, ZoneRate};
pub use store::{BillsArchive, CustomersArchive, JsonStore, ParcelsArchive, PricingRow};
pub use users::{Role, User, UserDirectory};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
