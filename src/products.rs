use rust_decimal::prelude::*;
use tracing::debug;

use crate::accounts::{Account, AccountKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    Debit,
    Credit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditLineKind {
    Personal,
    Business,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    number: String,
    holder: String,
    expiry: String,
    cvv: String,
    kind: CardKind,
    active: bool,
}

impl Card {
    pub fn new(number: &str, holder: &str, expiry: &str, cvv: &str, kind: CardKind) -> Card {
        Card {
            number: number.to_string(),
            holder: holder.to_string(),
            expiry: expiry.to_string(),
            cvv: cvv.to_string(),
            kind,
            active: false,
        }
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn holder(&self) -> &str {
        &self.holder
    }

    pub fn expiry(&self) -> &str {
        &self.expiry
    }

    pub fn cvv(&self) -> &str {
        &self.cvv
    }

    pub fn kind(&self) -> CardKind {
        self.kind
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn activate(&mut self) {
        self.active = true;
        debug!(card = %self.number, "card activated");
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        debug!(card = %self.number, "card deactivated");
    }
}

/// Revolving credit line: `balance` is the amount currently drawn, capped
/// by `limit`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreditLine {
    number: String,
    limit: Decimal,
    balance: Decimal,
    kind: CreditLineKind,
}

impl CreditLine {
    pub fn new(number: &str, limit: Decimal, balance: Decimal, kind: CreditLineKind) -> CreditLine {
        CreditLine {
            number: number.to_string(),
            limit,
            balance,
            kind,
        }
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn limit(&self) -> Decimal {
        self.limit
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn kind(&self) -> CreditLineKind {
        self.kind
    }

    pub fn available_credit(&self) -> Decimal {
        self.limit - self.balance
    }

    /// Draws against the line; amounts that would exceed the limit (or are
    /// non-positive) are ignored.
    pub fn draw(&mut self, amount: Decimal) {
        if amount > Decimal::ZERO && self.balance + amount <= self.limit {
            self.balance += amount;
        }
    }

    /// Pays the drawn balance down; overpayments (or non-positive amounts)
    /// are ignored.
    pub fn repay(&mut self, amount: Decimal) {
        if amount > Decimal::ZERO && self.balance - amount >= Decimal::ZERO {
            self.balance -= amount;
        }
    }
}

/// Which product line an account, card or credit line belongs to. Retail
/// customers get debit cards and personal credit lines; corporate customers
/// get credit cards and business lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankTier {
    Retail,
    Corporate,
}

impl BankTier {
    pub fn open_account(&self, number: &str, balance: Decimal, kind: AccountKind) -> Account {
        Account::new(number, balance, kind)
    }

    pub fn issue_card(&self, number: &str, holder: &str, expiry: &str, cvv: &str) -> Card {
        let kind = match self {
            BankTier::Retail => CardKind::Debit,
            BankTier::Corporate => CardKind::Credit,
        };
        Card::new(number, holder, expiry, cvv, kind)
    }

    pub fn open_credit_line(&self, number: &str, limit: Decimal, balance: Decimal) -> CreditLine {
        let kind = match self {
            BankTier::Retail => CreditLineKind::Personal,
            BankTier::Corporate => CreditLineKind::Business,
        };
        CreditLine::new(number, limit, balance, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retail_tier_products() {
        let card = BankTier::Retail.issue_card("4000111122223333", "Ana", "10/28", "321");
        assert_eq!(card.kind(), CardKind::Debit);
        assert!(!card.is_active());

        let line = BankTier::Retail.open_credit_line("CL1", Decimal::from(5000), Decimal::ZERO);
        assert_eq!(line.kind(), CreditLineKind::Personal);
    }

    #[test]
    fn test_corporate_tier_products() {
        let card = BankTier::Corporate.issue_card("5000111122223333", "Acme SA", "10/28", "321");
        assert_eq!(card.kind(), CardKind::Credit);

        let line =
            BankTier::Corporate.open_credit_line("CL2", Decimal::from(50000), Decimal::ZERO);
        assert_eq!(line.kind(), CreditLineKind::Business);
    }

    #[test]
    fn test_either_tier_opens_either_account_kind() {
        let savings =
            BankTier::Retail.open_account("ACC1", Decimal::from(100), AccountKind::Savings);
        assert_eq!(savings.kind(), AccountKind::Savings);

        let checking =
            BankTier::Corporate.open_account("ACC2", Decimal::from(100), AccountKind::Checking);
        assert_eq!(checking.kind(), AccountKind::Checking);
    }

    #[test]
    fn test_card_activation_cycle() {
        let mut card = BankTier::Retail.issue_card("4000111122223333", "Ana", "10/28", "321");
        card.activate();
        assert!(card.is_active());
        card.deactivate();
        assert!(!card.is_active());
    }

    #[test]
    fn test_credit_line_draw_within_limit() {
        let mut line = CreditLine::new(
            "CL1",
            Decimal::from(1000),
            Decimal::ZERO,
            CreditLineKind::Personal,
        );
        line.draw(Decimal::from(400));
        assert_eq!(line.balance(), Decimal::from(400));
        assert_eq!(line.available_credit(), Decimal::from(600));
    }

    #[test]
    fn test_credit_line_draw_beyond_limit_is_ignored() {
        let mut line = CreditLine::new(
            "CL1",
            Decimal::from(1000),
            Decimal::from(800),
            CreditLineKind::Personal,
        );
        line.draw(Decimal::from(300));
        assert_eq!(line.balance(), Decimal::from(800));
    }

    #[test]
    fn test_credit_line_repay_and_overpay() {
        let mut line = CreditLine::new(
            "CL1",
            Decimal::from(1000),
            Decimal::from(500),
            CreditLineKind::Business,
        );
        line.repay(Decimal::from(200));
        assert_eq!(line.balance(), Decimal::from(300));

        line.repay(Decimal::from(400));
        assert_eq!(line.balance(), Decimal::from(300));

        line.repay(Decimal::from(-10));
        assert_eq!(line.balance(), Decimal::from(300));
    }
}
