use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use rust_decimal::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::observers::Observer;

#[derive(Error, Debug, PartialEq)]
#[error("unknown account kind: {0}")]
pub struct UnknownAccountKind(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Savings,
    Checking,
}

impl FromStr for AccountKind {
    type Err = UnknownAccountKind;
    fn from_str(s: &str) -> Result<AccountKind, UnknownAccountKind> {
        match s.to_ascii_lowercase().as_str() {
            "savings" => Ok(AccountKind::Savings),
            "checking" => Ok(AccountKind::Checking),
            other => Err(UnknownAccountKind(other.to_string())),
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AccountKind::Savings => write!(f, "savings"),
            AccountKind::Checking => write!(f, "checking"),
        }
    }
}

/// Emitted to attached observers, one event per effective mutation
/// (plus one for each refused withdrawal attempt).
#[derive(Debug, Clone, PartialEq)]
pub enum AccountEvent {
    Deposited {
        account: String,
        amount: Decimal,
        balance: Decimal,
    },
    Withdrew {
        account: String,
        amount: Decimal,
        balance: Decimal,
    },
    WithdrawalRefused {
        account: String,
        amount: Decimal,
        balance: Decimal,
    },
    TransferredOut {
        account: String,
        destination: String,
        amount: Decimal,
        balance: Decimal,
    },
    KindChanged {
        account: String,
        from: AccountKind,
        to: AccountKind,
    },
}

impl fmt::Display for AccountEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AccountEvent::Deposited {
                account,
                amount,
                balance,
            } => write!(
                f,
                "deposit of ${} to account {}, new balance ${}",
                amount, account, balance
            ),
            AccountEvent::Withdrew {
                account,
                amount,
                balance,
            } => write!(
                f,
                "withdrawal of ${} from account {}, new balance ${}",
                amount, account, balance
            ),
            AccountEvent::WithdrawalRefused {
                account,
                amount,
                balance,
            } => write!(
                f,
                "withdrawal of ${} from account {} refused, insufficient funds (balance ${})",
                amount, account, balance
            ),
            AccountEvent::TransferredOut {
                account,
                destination,
                amount,
                balance,
            } => write!(
                f,
                "transfer of ${} from account {} to account {}, new balance ${}",
                amount, account, destination, balance
            ),
            AccountEvent::KindChanged { account, from, to } => {
                write!(f, "account {} changed from {} to {}", account, from, to)
            }
        }
    }
}

pub struct Account {
    number: String,
    balance: Decimal,
    kind: AccountKind,
    observers: Vec<Rc<dyn Observer>>,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Account")
            .field("number", &self.number)
            .field("balance", &self.balance)
            .field("kind", &self.kind)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Account {
    pub fn new(number: &str, balance: Decimal, kind: AccountKind) -> Account {
        Account {
            number: number.to_string(),
            balance,
            kind,
            observers: Vec::new(),
        }
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn kind(&self) -> AccountKind {
        self.kind
    }

    /// Registers an observer; duplicates are allowed and each registration
    /// receives its own delivery.
    pub fn attach(&mut self, observer: Rc<dyn Observer>) {
        debug!(
            account = %self.number,
            observer = %observer.label(),
            "observer attached"
        );
        self.observers.push(observer);
    }

    /// Removes the first registration of this exact observer, if present.
    pub fn detach(&mut self, observer: &Rc<dyn Observer>) {
        if let Some(at) = self
            .observers
            .iter()
            .position(|o| Rc::ptr_eq(o, observer))
        {
            debug!(
                account = %self.number,
                observer = %observer.label(),
                "observer detached"
            );
            self.observers.remove(at);
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn broadcast(&self, event: &AccountEvent) {
        for observer in &self.observers {
            observer.update(event);
        }
    }

    /// Non-positive amounts are ignored without error.
    pub fn deposit(&mut self, amount: Decimal) {
        if amount > Decimal::ZERO {
            self.balance += amount;
            self.broadcast(&AccountEvent::Deposited {
                account: self.number.clone(),
                amount,
                balance: self.balance,
            });
        }
    }

    /// Non-positive amounts are ignored; an amount above the current balance
    /// leaves the balance untouched but still notifies observers of the
    /// refused attempt.
    pub fn withdraw(&mut self, amount: Decimal) {
        if amount > Decimal::ZERO && amount <= self.balance {
            self.balance -= amount;
            self.broadcast(&AccountEvent::Withdrew {
                account: self.number.clone(),
                amount,
                balance: self.balance,
            });
        } else if amount > self.balance {
            self.broadcast(&AccountEvent::WithdrawalRefused {
                account: self.number.clone(),
                amount,
                balance: self.balance,
            });
        }
    }

    /// Debits this account only; crediting the destination is the
    /// responsibility of the transfer command.
    pub fn transfer_out(&mut self, amount: Decimal, destination: &str) {
        if amount > Decimal::ZERO && amount <= self.balance {
            self.balance -= amount;
            self.broadcast(&AccountEvent::TransferredOut {
                account: self.number.clone(),
                destination: destination.to_string(),
                amount,
                balance: self.balance,
            });
        }
    }

    pub fn set_kind(&mut self, kind: AccountKind) {
        let from = self.kind;
        self.kind = kind;
        self.broadcast(&AccountEvent::KindChanged {
            account: self.number.clone(),
            from,
            to: kind,
        });
    }
}

pub type SharedAccount = Rc<RefCell<Account>>;

pub fn share(account: Account) -> SharedAccount {
    Rc::new(RefCell::new(account))
}

/// Session registry resolving account numbers to shared handles.
#[derive(Default)]
pub struct AccountBook {
    accounts: HashMap<String, SharedAccount>,
}

impl AccountBook {
    pub fn new() -> AccountBook {
        AccountBook {
            accounts: HashMap::new(),
        }
    }

    /// Returns the existing handle for `number`, opening the account with
    /// the given kind and balance when it is first seen.
    pub fn open(&mut self, number: &str, kind: AccountKind, balance: Decimal) -> SharedAccount {
        self.accounts
            .entry(number.to_string())
            .or_insert_with(|| share(Account::new(number, balance, kind)))
            .clone()
    }

    pub fn get(&self, number: &str) -> Option<SharedAccount> {
        self.accounts.get(number).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SharedAccount)> {
        self.accounts.iter()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
