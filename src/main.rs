use anyhow::{anyhow, Result};
use clap::Parser;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::io;
use tracing::{debug, error};

use teller::accounts::{AccountBook, AccountKind};
use teller::commands::Command;
use teller::journal::Journal;

#[derive(Parser)]
#[command(version, about = "Replays a CSV of banking operations through the command journal")]
struct Opts {
    file: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
enum OperationKind {
    Deposit,
    Withdraw,
    Transfer,
    Undo,
    Redo,
}

#[derive(Debug, Deserialize)]
struct OperationRow {
    #[serde(rename = "type")]
    kind: OperationKind,
    account: Option<String>,
    to: Option<String>,
    amount: Option<Decimal>,
}

#[derive(Debug, Serialize)]
struct AccountStatement {
    account: String,
    kind: AccountKind,
    balance: Decimal,
}

fn apply_row(book: &mut AccountBook, journal: &mut Journal, row: &OperationRow) -> Result<()> {
    match row.kind {
        OperationKind::Deposit | OperationKind::Withdraw => {
            let number = row
                .account
                .as_deref()
                .ok_or_else(|| anyhow!("missing account column"))?;
            let amount = row.amount.ok_or_else(|| anyhow!("missing amount column"))?;
            let account = book.open(number, AccountKind::Savings, Decimal::ZERO);
            let command = match row.kind {
                OperationKind::Deposit => Command::deposit(account, amount),
                _ => Command::withdraw(account, amount),
            };
            journal.execute(command);
        }
        OperationKind::Transfer => {
            let from = row
                .account
                .as_deref()
                .ok_or_else(|| anyhow!("missing account column"))?;
            let to = row
                .to
                .as_deref()
                .ok_or_else(|| anyhow!("missing destination column"))?;
            let amount = row.amount.ok_or_else(|| anyhow!("missing amount column"))?;
            let source = book.open(from, AccountKind::Savings, Decimal::ZERO);
            let destination = book.open(to, AccountKind::Savings, Decimal::ZERO);
            journal.execute(Command::transfer(source, destination, amount));
        }
        OperationKind::Undo => journal.undo_last(),
        OperationKind::Redo => journal.redo_last(),
    }
    Ok(())
}

fn run() -> Result<()> {
    let opts = Opts::parse();

    let mut reader = csv::Reader::from_path(&opts.file)?;
    let mut book = AccountBook::new();
    let mut journal = Journal::new();

    for result in reader.deserialize() {
        let row: OperationRow = result?;
        match apply_row(&mut book, &mut journal, &row) {
            Ok(()) => debug!(operation = ?row.kind, "processed operation"),
            Err(e) => debug!(
                error = e.to_string(),
                operation = ?row.kind,
                "unable to process operation"
            ),
        }
    }

    // @TODO: add a --history flag that prints the journal snapshot after the
    // statements, so a replay can be audited without raising the log level.
    let mut numbers: Vec<&String> = book.iter().map(|(number, _)| number).collect();
    numbers.sort();

    let mut writer = csv::Writer::from_writer(io::stdout());
    for number in numbers {
        if let Some(account) = book.get(number) {
            let account = account.borrow();
            writer.serialize(AccountStatement {
                account: account.number().to_string(),
                kind: account.kind(),
                balance: account.balance(),
            })?;
        }
    }
    writer.flush()?;

    Ok(())
}

fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = run() {
        error!(error = e.to_string(), "something went wrong")
    }
}
