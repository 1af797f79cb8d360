use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use rust_decimal::prelude::*;
use tracing::debug;

/// Account-number directory backing the bank facade: who holds an account
/// and what its booked balance is.
pub trait AccountDirectory {
    fn create(&self, holder: &str, opening_balance: Decimal) -> String;
    fn verify(&self, number: &str) -> bool;
    fn balance(&self, number: &str) -> Decimal;
    fn adjust(&self, number: &str, delta: Decimal);
    fn holder(&self, number: &str) -> Option<String>;
}

struct DirectoryEntry {
    holder: String,
    balance: Decimal,
}

pub struct MemoryDirectory {
    entries: RefCell<HashMap<String, DirectoryEntry>>,
    next_number: Cell<u64>,
}

impl MemoryDirectory {
    pub fn new() -> MemoryDirectory {
        MemoryDirectory {
            entries: RefCell::new(HashMap::new()),
            next_number: Cell::new(1),
        }
    }
}

impl Default for MemoryDirectory {
    fn default() -> MemoryDirectory {
        MemoryDirectory::new()
    }
}

impl AccountDirectory for MemoryDirectory {
    fn create(&self, holder: &str, opening_balance: Decimal) -> String {
        let n = self.next_number.get();
        self.next_number.set(n + 1);
        let number = format!("ACC{}", n);
        self.entries.borrow_mut().insert(
            number.clone(),
            DirectoryEntry {
                holder: holder.to_string(),
                balance: opening_balance,
            },
        );
        debug!(account = %number, holder = holder, "account created");
        number
    }

    fn verify(&self, number: &str) -> bool {
        self.entries.borrow().contains_key(number)
    }

    fn balance(&self, number: &str) -> Decimal {
        self.entries
            .borrow()
            .get(number)
            .map(|entry| entry.balance)
            .unwrap_or(Decimal::ZERO)
    }

    fn adjust(&self, number: &str, delta: Decimal) {
        let mut entries = self.entries.borrow_mut();
        let entry = entries
            .entry(number.to_string())
            .or_insert_with(|| DirectoryEntry {
                holder: String::new(),
                balance: Decimal::ZERO,
            });
        entry.balance += delta;
        debug!(account = number, delta = %delta, balance = %entry.balance, "balance adjusted");
    }

    fn holder(&self, number: &str) -> Option<String> {
        self.entries
            .borrow()
            .get(number)
            .map(|entry| entry.holder.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_issues_sequential_numbers() {
        let dir = MemoryDirectory::new();
        assert_eq!(dir.create("Ana", Decimal::from(100)), "ACC1");
        assert_eq!(dir.create("Luis", Decimal::from(200)), "ACC2");
    }

    #[test]
    fn test_verify_and_balance() {
        let dir = MemoryDirectory::new();
        let number = dir.create("Ana", Decimal::from(100));

        assert!(dir.verify(&number));
        assert!(!dir.verify("ACC999"));
        assert_eq!(dir.balance(&number), Decimal::from(100));
        assert_eq!(dir.balance("ACC999"), Decimal::ZERO);
    }

    #[test]
    fn test_adjust_moves_the_booked_balance() {
        let dir = MemoryDirectory::new();
        let number = dir.create("Ana", Decimal::from(100));

        dir.adjust(&number, Decimal::from(50));
        assert_eq!(dir.balance(&number), Decimal::from(150));
        dir.adjust(&number, Decimal::from(-70));
        assert_eq!(dir.balance(&number), Decimal::from(80));
    }

    #[test]
    fn test_holder_lookup() {
        let dir = MemoryDirectory::new();
        let number = dir.create("Ana", Decimal::from(100));

        assert_eq!(dir.holder(&number).as_deref(), Some("Ana"));
        assert_eq!(dir.holder("ACC999"), None);
    }
}
