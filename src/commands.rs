use std::fmt;

use rust_decimal::prelude::*;
use tracing::{debug, warn};

use crate::accounts::SharedAccount;

/// A command is pending until executed; a failed precondition still counts
/// as executed, but only a completed command can be undone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandState {
    Pending,
    Completed,
    Failed,
}

impl fmt::Display for CommandState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CommandState::Pending => write!(f, "pending"),
            CommandState::Completed => write!(f, "completed"),
            CommandState::Failed => write!(f, "failed"),
        }
    }
}

enum CommandKind {
    Deposit {
        account: SharedAccount,
    },
    Withdraw {
        account: SharedAccount,
    },
    Transfer {
        source: SharedAccount,
        destination: SharedAccount,
    },
}

impl CommandKind {
    fn label(&self) -> &'static str {
        match self {
            CommandKind::Deposit { .. } => "deposit",
            CommandKind::Withdraw { .. } => "withdraw",
            CommandKind::Transfer { .. } => "transfer",
        }
    }
}

/// A reversible banking operation bound to its target account(s).
///
/// The source-side balance is captured once, at construction. Withdraw and
/// transfer check their funds precondition against that snapshot, so a redo
/// after intervening mutations re-checks the original balance, not the
/// live one.
pub struct Command {
    kind: CommandKind,
    amount: Decimal,
    opening_balance: Decimal,
    state: CommandState,
}

/// Point-in-time view of a command, safe to hand out: holds account
/// numbers, not account handles.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSummary {
    pub operation: &'static str,
    pub amount: Decimal,
    pub account: String,
    pub destination: Option<String>,
    pub state: CommandState,
}

impl fmt::Display for CommandSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.destination {
            Some(destination) => write!(
                f,
                "{}: ${} from account {} to account {} ({})",
                self.operation, self.amount, self.account, destination, self.state
            ),
            None => write!(
                f,
                "{}: ${} on account {} ({})",
                self.operation, self.amount, self.account, self.state
            ),
        }
    }
}

impl Command {
    pub fn deposit(account: SharedAccount, amount: Decimal) -> Command {
        let opening_balance = account.borrow().balance();
        Command {
            kind: CommandKind::Deposit { account },
            amount,
            opening_balance,
            state: CommandState::Pending,
        }
    }

    pub fn withdraw(account: SharedAccount, amount: Decimal) -> Command {
        let opening_balance = account.borrow().balance();
        Command {
            kind: CommandKind::Withdraw { account },
            amount,
            opening_balance,
            state: CommandState::Pending,
        }
    }

    pub fn transfer(
        source: SharedAccount,
        destination: SharedAccount,
        amount: Decimal,
    ) -> Command {
        let opening_balance = source.borrow().balance();
        Command {
            kind: CommandKind::Transfer {
                source,
                destination,
            },
            amount,
            opening_balance,
            state: CommandState::Pending,
        }
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn state(&self) -> CommandState {
        self.state
    }

    pub fn is_executed(&self) -> bool {
        self.state != CommandState::Pending
    }

    pub fn was_successful(&self) -> bool {
        self.state == CommandState::Completed
    }

    /// Applies the operation. Re-executing without an intervening undo is a
    /// logged no-op; insufficient funds is recorded as `Failed`, never
    /// returned as an error.
    pub fn execute(&mut self) {
        if self.state != CommandState::Pending {
            warn!(command = self.kind.label(), "command already executed");
            return;
        }
        match &self.kind {
            CommandKind::Deposit { account } => {
                account.borrow_mut().deposit(self.amount);
                // account-level guards may ignore the amount, but the
                // command itself always completes
                self.state = CommandState::Completed;
            }
            CommandKind::Withdraw { account } => {
                if self.opening_balance >= self.amount {
                    account.borrow_mut().withdraw(self.amount);
                    self.state = CommandState::Completed;
                } else {
                    debug!(
                        amount = %self.amount,
                        available = %self.opening_balance,
                        "withdrawal failed, insufficient funds"
                    );
                    self.state = CommandState::Failed;
                }
            }
            CommandKind::Transfer {
                source,
                destination,
            } => {
                if self.opening_balance >= self.amount {
                    let destination_number = destination.borrow().number().to_string();
                    source
                        .borrow_mut()
                        .transfer_out(self.amount, &destination_number);
                    destination.borrow_mut().deposit(self.amount);
                    self.state = CommandState::Completed;
                } else {
                    debug!(
                        amount = %self.amount,
                        available = %self.opening_balance,
                        "transfer failed, insufficient funds"
                    );
                    self.state = CommandState::Failed;
                }
            }
        }
    }

    /// Reverses a completed operation through the public account ops and
    /// returns the command to pending. Undoing a pending or failed command
    /// is a logged no-op.
    pub fn undo(&mut self) {
        match self.state {
            CommandState::Completed => {
                match &self.kind {
                    CommandKind::Deposit { account } => {
                        account.borrow_mut().withdraw(self.amount);
                    }
                    CommandKind::Withdraw { account } => {
                        account.borrow_mut().deposit(self.amount);
                    }
                    CommandKind::Transfer {
                        source,
                        destination,
                    } => {
                        destination.borrow_mut().withdraw(self.amount);
                        source.borrow_mut().deposit(self.amount);
                    }
                }
                self.state = CommandState::Pending;
            }
            CommandState::Failed => {
                debug!(
                    command = self.kind.label(),
                    "nothing to undo, command had no effect"
                );
            }
            CommandState::Pending => {
                debug!(
                    command = self.kind.label(),
                    "cannot undo, command has not been executed"
                );
            }
        }
    }

    pub fn summary(&self) -> CommandSummary {
        let (account, destination) = match &self.kind {
            CommandKind::Deposit { account } | CommandKind::Withdraw { account } => {
                (account.borrow().number().to_string(), None)
            }
            CommandKind::Transfer {
                source,
                destination,
            } => (
                source.borrow().number().to_string(),
                Some(destination.borrow().number().to_string()),
            ),
        };
        CommandSummary {
            operation: self.kind.label(),
            amount: self.amount,
            account,
            destination,
            state: self.state,
        }
    }
}
