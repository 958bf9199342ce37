// 👤 Customer Registry - Billed accounts on file
// Customers carry a small monotonic integer id. Bills snapshot the contact
// block they need at generation time, so removing a customer never rewrites
// history.

use serde::{Deserialize, Serialize};

use crate::error::{DeskError, DeskResult};

/// First id handed out by an empty registry.
const FIRST_CUSTOMER_ID: u64 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: u64,
    pub name: String,
    pub address: String,
    pub telephone: String,
}

#[derive(Debug, Clone)]
pub struct CustomerRegistry {
    customers: Vec<Customer>,
    next_id: u64,
}

impl CustomerRegistry {
    pub fn new() -> Self {
        CustomerRegistry {
            customers: Vec::new(),
            next_id: FIRST_CUSTOMER_ID,
        }
    }

    /// Rebuild from persisted records plus the stored counter. The counter
    /// wins unless it lags the records (hand-edited files), in which case it
    /// moves past the highest id on file.
    pub fn from_records(customers: Vec<Customer>, next_id: u64) -> Self {
        let floor = customers
            .iter()
            .map(|c| c.id + 1)
            .max()
            .unwrap_or(FIRST_CUSTOMER_ID);
        CustomerRegistry {
            customers,
            next_id: next_id.max(floor),
        }
    }

    /// Register a new customer and hand back their id. The name is required;
    /// address and telephone are free-form and may be blank.
    pub fn register(&mut self, name: &str, address: &str, telephone: &str) -> DeskResult<u64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DeskError::validation("name", "must not be empty"));
        }
        let id = self.next_id;
        self.next_id += 1;
        self.customers.push(Customer {
            id,
            name: name.to_string(),
            address: address.trim().to_string(),
            telephone: telephone.trim().to_string(),
        });
        Ok(id)
    }

    /// Contact details can change after registration; the name cannot.
    pub fn update_address(&mut self, id: u64, address: &str) -> DeskResult<()> {
        self.get_mut(id)?.address = address.trim().to_string();
        Ok(())
    }

    pub fn update_telephone(&mut self, id: u64, telephone: &str) -> DeskResult<()> {
        self.get_mut(id)?.telephone = telephone.trim().to_string();
        Ok(())
    }

    pub fn get(&self, id: u64) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    /// Remove a customer and return the dropped record. Ids are never
    /// reissued afterwards.
    pub fn remove(&mut self, id: u64) -> DeskResult<Customer> {
        let pos = self
            .customers
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| DeskError::not_found("customer", id))?;
        Ok(self.customers.remove(pos))
    }

    /// All customers ordered by id.
    pub fn list(&self) -> Vec<Customer> {
        let mut out = self.customers.clone();
        out.sort_by_key(|c| c.id);
        out
    }

    /// Raw records in insertion order, for persistence.
    pub fn records(&self) -> &[Customer] {
        &self.customers
    }

    /// Counter value to persist alongside the records.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    fn get_mut(&mut self, id: u64) -> DeskResult<&mut Customer> {
        self.customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| DeskError::not_found("customer", id))
    }
}

impl Default for CustomerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
