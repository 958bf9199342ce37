// 🔢 Number Sequences - Consignment and parcel id allocation
// Monotonic counters seeded at a fixed base; an id is never reused while a
// record holding it still exists.

/// Every sequence starts here. Both id families share the same base, which
/// is fine because parcel numbers carry a `P` prefix.
pub const SEQUENCE_BASE: u64 = 10_000_000;

/// A monotonic counter for one id family.
///
/// The next value is persisted alongside the parcel collection and resumes
/// after a restart, so allocation is O(1) in the normal case. The collision
/// scan in [`NumberSequence::allocate`] exists only to recover when the
/// persisted state was edited by hand and the counter no longer agrees with
/// the records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberSequence {
    next: u64,
}

impl NumberSequence {
    pub fn new() -> Self {
        NumberSequence {
            next: SEQUENCE_BASE,
        }
    }

    /// Restore from a persisted counter value.
    ///
    /// Values below the base clamp back to the base; anything already taken
    /// down there is covered by the collision scan.
    pub fn resume_at(next: u64) -> Self {
        NumberSequence {
            next: next.max(SEQUENCE_BASE),
        }
    }

    /// The value the next allocation will try first. This is what gets
    /// persisted.
    pub fn next_value(&self) -> u64 {
        self.next
    }

    /// Hand out the first number not reported as taken, advancing the
    /// counter past every candidate it touched.
    pub fn allocate<F>(&mut self, mut in_use: F) -> u64
    where
        F: FnMut(u64) -> bool,
    {
        loop {
            let candidate = self.next;
            self.next += 1;
            if !in_use(candidate) {
                return candidate;
            }
        }
    }

    /// Back to the base value. Only the system reset does this.
    pub fn rewind(&mut self) {
        self.next = SEQUENCE_BASE;
    }
}

impl Default for NumberSequence {
    fn default() -> Self {
        Self::new()
    }
}

/// Consignment numbers are the bare counter value.
pub fn format_consignment_number(value: u64) -> String {
    value.to_string()
}

/// Parcel numbers carry a `P` prefix.
pub fn format_parcel_number(value: u64) -> String {
    format!("P{}", value)
}
