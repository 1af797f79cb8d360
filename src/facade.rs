use rust_decimal::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

use crate::directory::AccountDirectory;

#[derive(Error, Debug, PartialEq)]
pub enum FacadeError {
    #[error("unknown account: {0}")]
    UnknownAccount(String),
    #[error("account creation failed for holder {0}")]
    CreationFailed(String),
}

/// Outbound customer notifications for facade operations.
pub trait NotificationSink {
    fn transaction_succeeded(&self, account: &str, operation: &str, amount: Decimal, email: &str);
    fn transaction_failed(
        &self,
        account: &str,
        operation: &str,
        amount: Decimal,
        email: &str,
        reason: &str,
    );
    fn account_created(&self, account: &str, holder: &str, opening_balance: Decimal, email: &str);
}

/// Notification sink that writes structured log records.
pub struct LogSink;

impl NotificationSink for LogSink {
    fn transaction_succeeded(&self, account: &str, operation: &str, amount: Decimal, email: &str) {
        info!(
            account = account,
            operation = operation,
            amount = %amount,
            to = email,
            "transaction succeeded"
        );
    }

    fn transaction_failed(
        &self,
        account: &str,
        operation: &str,
        amount: Decimal,
        email: &str,
        reason: &str,
    ) {
        info!(
            account = account,
            operation = operation,
            amount = %amount,
            to = email,
            reason = reason,
            "transaction failed"
        );
    }

    fn account_created(&self, account: &str, holder: &str, opening_balance: Decimal, email: &str) {
        info!(
            account = account,
            holder = holder,
            opening_balance = %opening_balance,
            to = email,
            "account created"
        );
    }
}

/// Pure checks applied before any balance moves.
pub struct TransactionValidator;

impl TransactionValidator {
    pub fn deposit_is_valid(&self, amount: Decimal) -> bool {
        if amount <= Decimal::ZERO {
            debug!(amount = %amount, "deposit rejected, amount must be positive");
            return false;
        }
        true
    }

    pub fn withdrawal_is_valid(&self, amount: Decimal) -> bool {
        if amount <= Decimal::ZERO {
            debug!(amount = %amount, "withdrawal rejected, amount must be positive");
            return false;
        }
        true
    }

    pub fn transfer_is_valid(&self, from: &str, to: &str, amount: Decimal) -> bool {
        if amount <= Decimal::ZERO {
            debug!(amount = %amount, "transfer rejected, amount must be positive");
            return false;
        }
        if from == to {
            debug!(account = from, "transfer rejected, source and destination are the same");
            return false;
        }
        true
    }
}

/// Single entry point over the account directory, transaction validation
/// and customer notifications. Operations return `false` (with a failure
/// notification) rather than an error for the expected refusals; only
/// lookups against missing accounts are hard errors.
pub struct BankFacade<'a> {
    directory: &'a dyn AccountDirectory,
    validator: TransactionValidator,
    notifications: &'a dyn NotificationSink,
}

impl<'a> BankFacade<'a> {
    pub fn new(
        directory: &'a dyn AccountDirectory,
        notifications: &'a dyn NotificationSink,
    ) -> BankFacade<'a> {
        BankFacade {
            directory,
            validator: TransactionValidator,
            notifications,
        }
    }

    pub fn create_account(
        &self,
        holder: &str,
        opening_balance: Decimal,
        email: &str,
    ) -> Result<String, FacadeError> {
        let number = self.directory.create(holder, opening_balance);
        if !self.directory.verify(&number) {
            return Err(FacadeError::CreationFailed(holder.to_string()));
        }
        self.notifications
            .account_created(&number, holder, opening_balance, email);
        Ok(number)
    }

    pub fn deposit(&self, number: &str, amount: Decimal, email: &str) -> bool {
        if !self.directory.verify(number) {
            self.notifications.transaction_failed(
                number,
                "deposit",
                amount,
                email,
                "account does not exist",
            );
            return false;
        }
        if !self.validator.deposit_is_valid(amount) {
            self.notifications.transaction_failed(
                number,
                "deposit",
                amount,
                email,
                "amount must be positive",
            );
            return false;
        }
        self.directory.adjust(number, amount);
        self.notifications
            .transaction_succeeded(number, "deposit", amount, email);
        true
    }

    pub fn withdraw(&self, number: &str, amount: Decimal, email: &str) -> bool {
        if !self.directory.verify(number) {
            self.notifications.transaction_failed(
                number,
                "withdrawal",
                amount,
                email,
                "account does not exist",
            );
            return false;
        }
        if self.directory.balance(number) < amount {
            self.notifications.transaction_failed(
                number,
                "withdrawal",
                amount,
                email,
                "insufficient funds",
            );
            return false;
        }
        if !self.validator.withdrawal_is_valid(amount) {
            self.notifications.transaction_failed(
                number,
                "withdrawal",
                amount,
                email,
                "amount must be positive",
            );
            return false;
        }
        self.directory.adjust(number, -amount);
        self.notifications
            .transaction_succeeded(number, "withdrawal", amount, email);
        true
    }

    pub fn transfer(
        &self,
        from: &str,
        to: &str,
        amount: Decimal,
        email_from: &str,
        email_to: &str,
    ) -> bool {
        if !self.directory.verify(from) {
            self.notifications.transaction_failed(
                from,
                "transfer",
                amount,
                email_from,
                "source account does not exist",
            );
            return false;
        }
        if !self.directory.verify(to) {
            self.notifications.transaction_failed(
                from,
                "transfer",
                amount,
                email_from,
                "destination account does not exist",
            );
            return false;
        }
        if self.directory.balance(from) < amount {
            self.notifications.transaction_failed(
                from,
                "transfer",
                amount,
                email_from,
                "insufficient funds",
            );
            return false;
        }
        if !self.validator.transfer_is_valid(from, to, amount) {
            self.notifications.transaction_failed(
                from,
                "transfer",
                amount,
                email_from,
                "transfer validation failed",
            );
            return false;
        }
        self.directory.adjust(from, -amount);
        self.directory.adjust(to, amount);
        self.notifications
            .transaction_succeeded(from, "transfer", amount, email_from);
        self.notifications
            .transaction_succeeded(to, "deposit", amount, email_to);
        true
    }

    pub fn balance(&self, number: &str) -> Result<Decimal, FacadeError> {
        if !self.directory.verify(number) {
            return Err(FacadeError::UnknownAccount(number.to_string()));
        }
        Ok(self.directory.balance(number))
    }

    pub fn holder(&self, number: &str) -> Result<String, FacadeError> {
        self.directory
            .holder(number)
            .ok_or_else(|| FacadeError::UnknownAccount(number.to_string()))
    }

    pub fn verify_account(&self, number: &str) -> bool {
        self.directory.verify(number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::MemoryDirectory;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingSink {
        successes: RefCell<Vec<(String, String)>>,
        failures: RefCell<Vec<(String, String, String)>>,
        creations: RefCell<Vec<String>>,
    }

    impl NotificationSink for RecordingSink {
        fn transaction_succeeded(
            &self,
            account: &str,
            operation: &str,
            _amount: Decimal,
            _email: &str,
        ) {
            self.successes
                .borrow_mut()
                .push((account.to_string(), operation.to_string()));
        }

        fn transaction_failed(
            &self,
            account: &str,
            operation: &str,
            _amount: Decimal,
            _email: &str,
            reason: &str,
        ) {
            self.failures.borrow_mut().push((
                account.to_string(),
                operation.to_string(),
                reason.to_string(),
            ));
        }

        fn account_created(
            &self,
            account: &str,
            _holder: &str,
            _opening_balance: Decimal,
            _email: &str,
        ) {
            self.creations.borrow_mut().push(account.to_string());
        }
    }

    fn setup() -> (MemoryDirectory, RecordingSink) {
        (MemoryDirectory::new(), RecordingSink::default())
    }

    #[test]
    fn test_create_account_notifies() {
        let (dir, sink) = setup();
        let facade = BankFacade::new(&dir, &sink);

        let number = facade
            .create_account("Ana", Decimal::from(500), "ana@example.com")
            .unwrap();
        assert!(facade.verify_account(&number));
        assert_eq!(sink.creations.borrow().as_slice(), [number.clone()]);
        assert_eq!(facade.balance(&number), Ok(Decimal::from(500)));
        assert_eq!(facade.holder(&number), Ok("Ana".to_string()));
    }

    #[test]
    fn test_deposit_adjusts_and_notifies() {
        let (dir, sink) = setup();
        let facade = BankFacade::new(&dir, &sink);
        let number = facade
            .create_account("Ana", Decimal::from(500), "ana@example.com")
            .unwrap();

        assert!(facade.deposit(&number, Decimal::from(200), "ana@example.com"));
        assert_eq!(facade.balance(&number), Ok(Decimal::from(700)));
        assert_eq!(
            sink.successes.borrow().as_slice(),
            [(number, "deposit".to_string())]
        );
    }

    #[test]
    fn test_deposit_to_missing_account_fails_with_reason() {
        let (dir, sink) = setup();
        let facade = BankFacade::new(&dir, &sink);

        assert!(!facade.deposit("ACC999", Decimal::from(200), "x@example.com"));
        let failures = sink.failures.borrow();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].2, "account does not exist");
    }

    #[test]
    fn test_non_positive_deposit_is_refused() {
        let (dir, sink) = setup();
        let facade = BankFacade::new(&dir, &sink);
        let number = facade
            .create_account("Ana", Decimal::from(500), "ana@example.com")
            .unwrap();

        assert!(!facade.deposit(&number, Decimal::ZERO, "ana@example.com"));
        assert_eq!(facade.balance(&number), Ok(Decimal::from(500)));
        assert_eq!(sink.failures.borrow()[0].2, "amount must be positive");
    }

    #[test]
    fn test_withdrawal_with_insufficient_funds() {
        let (dir, sink) = setup();
        let facade = BankFacade::new(&dir, &sink);
        let number = facade
            .create_account("Ana", Decimal::from(100), "ana@example.com")
            .unwrap();

        assert!(!facade.withdraw(&number, Decimal::from(150), "ana@example.com"));
        assert_eq!(facade.balance(&number), Ok(Decimal::from(100)));
        assert_eq!(sink.failures.borrow()[0].2, "insufficient funds");
    }

    #[test]
    fn test_transfer_moves_funds_and_notifies_both_parties() {
        let (dir, sink) = setup();
        let facade = BankFacade::new(&dir, &sink);
        let from = facade
            .create_account("Ana", Decimal::from(1000), "ana@example.com")
            .unwrap();
        let to = facade
            .create_account("Luis", Decimal::from(500), "luis@example.com")
            .unwrap();

        assert!(facade.transfer(
            &from,
            &to,
            Decimal::from(300),
            "ana@example.com",
            "luis@example.com"
        ));
        assert_eq!(facade.balance(&from), Ok(Decimal::from(700)));
        assert_eq!(facade.balance(&to), Ok(Decimal::from(800)));

        let successes = sink.successes.borrow();
        assert_eq!(successes.len(), 2);
        assert_eq!(successes[0], (from, "transfer".to_string()));
        assert_eq!(successes[1], (to, "deposit".to_string()));
    }

    #[test]
    fn test_transfer_failure_paths_each_notify_once() {
        let (dir, sink) = setup();
        let facade = BankFacade::new(&dir, &sink);
        let from = facade
            .create_account("Ana", Decimal::from(100), "ana@example.com")
            .unwrap();
        let to = facade
            .create_account("Luis", Decimal::from(500), "luis@example.com")
            .unwrap();

        assert!(!facade.transfer(&from, "ACC999", Decimal::from(50), "a@x.com", "b@x.com"));
        assert!(!facade.transfer("ACC999", &to, Decimal::from(50), "a@x.com", "b@x.com"));
        assert!(!facade.transfer(&from, &to, Decimal::from(500), "a@x.com", "b@x.com"));
        assert!(!facade.transfer(&from, &from, Decimal::from(50), "a@x.com", "b@x.com"));

        let reasons: Vec<String> = sink.failures.borrow().iter().map(|f| f.2.clone()).collect();
        assert_eq!(
            reasons,
            vec![
                "destination account does not exist",
                "source account does not exist",
                "insufficient funds",
                "transfer validation failed",
            ]
        );
        assert_eq!(facade.balance(&from), Ok(Decimal::from(100)));
        assert_eq!(facade.balance(&to), Ok(Decimal::from(500)));
    }

    #[test]
    fn test_log_sink_backed_facade_still_moves_funds() {
        let dir = MemoryDirectory::new();
        let sink = LogSink;
        let facade = BankFacade::new(&dir, &sink);

        let number = facade
            .create_account("Ana", Decimal::from(100), "ana@example.com")
            .unwrap();
        assert!(facade.deposit(&number, Decimal::from(50), "ana@example.com"));
        assert_eq!(facade.balance(&number), Ok(Decimal::from(150)));
    }

    #[test]
    fn test_lookups_on_missing_accounts_are_hard_errors() {
        let (dir, sink) = setup();
        let facade = BankFacade::new(&dir, &sink);

        assert_eq!(
            facade.balance("ACC999"),
            Err(FacadeError::UnknownAccount("ACC999".to_string()))
        );
        assert_eq!(
            facade.holder("ACC999"),
            Err(FacadeError::UnknownAccount("ACC999".to_string()))
        );
    }
}
