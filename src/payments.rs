use std::fmt;

use rust_decimal::prelude::*;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, PartialEq)]
pub enum PaymentError {
    #[error("no payment method configured")]
    NoMethodConfigured,
}

/// The supported payment instruments. The set is closed; dispatch is a
/// plain match.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentMethod {
    CreditCard {
        number: String,
        holder: String,
        expiry: String,
        cvv: String,
    },
    DebitCard {
        number: String,
        holder: String,
        bank: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub method: &'static str,
    pub amount: Decimal,
    pub card: String,
    pub holder: String,
    pub bank: Option<String>,
    pub details: String,
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "paid ${} by {} ({}, holder {})",
            self.amount, self.method, self.card, self.holder
        )
    }
}

fn masked(number: &str) -> String {
    let last_four = &number[number.len().saturating_sub(4)..];
    format!("****-****-****-{}", last_four)
}

impl PaymentMethod {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard { .. } => "credit card",
            PaymentMethod::DebitCard { .. } => "debit card",
        }
    }

    pub fn pay(&self, amount: Decimal, details: &str) -> Receipt {
        match self {
            PaymentMethod::CreditCard { number, holder, .. } => Receipt {
                method: self.label(),
                amount,
                card: masked(number),
                holder: holder.clone(),
                bank: None,
                details: details.to_string(),
            },
            PaymentMethod::DebitCard {
                number,
                holder,
                bank,
            } => Receipt {
                method: self.label(),
                amount,
                card: masked(number),
                holder: holder.clone(),
                bank: Some(bank.clone()),
                details: details.to_string(),
            },
        }
    }
}

/// Holds the currently selected payment method, if any. Executing a
/// payment with no method bound is the one hard configuration error in
/// this crate.
#[derive(Default)]
pub struct PaymentContext {
    method: Option<PaymentMethod>,
}

impl PaymentContext {
    pub fn new() -> PaymentContext {
        PaymentContext { method: None }
    }

    pub fn with_method(method: PaymentMethod) -> PaymentContext {
        PaymentContext {
            method: Some(method),
        }
    }

    pub fn set_method(&mut self, method: PaymentMethod) {
        debug!(method = method.label(), "payment method selected");
        self.method = Some(method);
    }

    pub fn current_method_label(&self) -> Option<&'static str> {
        self.method.as_ref().map(PaymentMethod::label)
    }

    pub fn execute_payment(
        &self,
        amount: Decimal,
        details: &str,
    ) -> Result<Receipt, PaymentError> {
        let method = self
            .method
            .as_ref()
            .ok_or(PaymentError::NoMethodConfigured)?;
        debug!(method = method.label(), amount = %amount, "processing payment");
        Ok(method.pay(amount, details))
    }
}
