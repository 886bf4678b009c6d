// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use bank_ledger::{
    Account, Customer, CustomerId, Directory, EntryKind, LedgerConfig, LedgerError, Operation,
    Statement,
};
use bank_ledger::statement::format_amount;
use chrono::NaiveDate;
use clap::Parser;
use csv::{ReaderBuilder, Trim, WriterBuilder};
use rust_decimal::Decimal;
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Birth dates in session scripts are written day first.
const BIRTH_DATE_FORMAT: &str = "%d-%m-%Y";

/// Bank Ledger - Replay a banking session script
///
/// Reads customer registrations, account openings, deposits and withdrawals
/// from a CSV file and writes the resulting accounts to stdout.
#[derive(Parser, Debug)]
#[command(name = "bank-ledger")]
#[command(about = "Replays a banking session CSV against an in-memory ledger", long_about = None)]
struct Args {
    /// Path to CSV file with session commands
    ///
    /// Expected format: command,customer,name,birth_date,address,amount
    /// Example: cargo run -- session.csv > accounts.csv
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Branch code assigned to every account
    #[arg(long, value_name = "CODE")]
    branch: Option<String>,

    /// Largest amount a single withdrawal may take
    #[arg(long, value_name = "AMOUNT")]
    withdrawal_limit: Option<Decimal>,

    /// Withdrawals allowed per account in this session
    #[arg(long, value_name = "N")]
    max_withdrawals: Option<u32>,

    /// Also print the registered customers after the accounts
    #[arg(long)]
    customers: bool,

    /// Also print each customer's statements, one per account
    #[arg(long)]
    statements: bool,
}

impl Args {
    fn config(&self) -> Result<LedgerConfig, bank_ledger::ConfigError> {
        let mut config = LedgerConfig::from_env()?;
        if let Some(branch) = &self.branch {
            config.branch_code = bank_ledger::BranchCode::new(branch.trim());
        }
        if let Some(limit) = self.withdrawal_limit {
            config.withdrawal_limit = limit;
        }
        if let Some(max) = self.max_withdrawals {
            config.max_withdrawals = max;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match args.config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(1);
        }
    };
    tracing::info!(
        branch = %config.branch_code,
        withdrawal_limit = %config.withdrawal_limit,
        max_withdrawals = config.max_withdrawals,
        "configuration loaded"
    );

    let file = match File::open(&args.input) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error opening file '{}': {}", args.input.display(), e);
            process::exit(1);
        }
    };

    let directory = Directory::with_config(config);
    let summary = match run_session(&directory, BufReader::new(file)) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Error processing session: {}", e);
            process::exit(1);
        }
    };
    tracing::info!(
        applied = summary.applied,
        rejected = summary.rejected,
        skipped = summary.skipped,
        "session finished"
    );

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = write_accounts(&directory, &mut stdout) {
        eprintln!("Error writing output: {}", e);
        process::exit(1);
    }
    if args.customers {
        let result = writeln!(stdout)
            .map_err(csv::Error::from)
            .and_then(|()| write_customers(&directory, &mut stdout));
        if let Err(e) = result {
            eprintln!("Error writing output: {}", e);
            process::exit(1);
        }
    }
    if args.statements {
        let result = writeln!(stdout)
            .map_err(csv::Error::from)
            .and_then(|()| write_statements(&directory, &mut stdout));
        if let Err(e) = result {
            eprintln!("Error writing output: {}", e);
            process::exit(1);
        }
    }
}

/// Raw CSV record matching the input format.
///
/// Fields: `command, customer, name, birth_date, address, amount`
#[derive(Debug, Deserialize)]
struct CsvRecord {
    command: String,
    customer: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    birth_date: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    amount: Option<Decimal>,
}

/// A parsed session command.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Register {
        customer: CustomerId,
        name: String,
        birth_date: NaiveDate,
        address: String,
    },
    Open {
        customer: CustomerId,
    },
    Apply {
        customer: CustomerId,
        operation: Operation,
    },
}

impl CsvRecord {
    /// Converts CSV record to a [`Command`].
    ///
    /// Returns `None` for unknown commands or missing required fields.
    fn into_command(self) -> Option<Command> {
        let customer = CustomerId::new(&self.customer);
        if customer.as_str().is_empty() {
            return None;
        }

        match self.command.to_lowercase().as_str() {
            "register" => {
                let birth_date =
                    NaiveDate::parse_from_str(self.birth_date?.trim(), BIRTH_DATE_FORMAT).ok()?;
                Some(Command::Register {
                    customer,
                    name: self.name?,
                    birth_date,
                    address: self.address.unwrap_or_default(),
                })
            }
            "open" => Some(Command::Open { customer }),
            "deposit" => Some(Command::Apply {
                customer,
                operation: Operation::deposit(self.amount?),
            }),
            "withdraw" | "withdrawal" => Some(Command::Apply {
                customer,
                operation: Operation::withdrawal(self.amount?),
            }),
            _ => None,
        }
    }
}

/// Counts of how each row of a session ended.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub applied: usize,
    pub rejected: usize,
    pub skipped: usize,
}

fn run_command(directory: &Directory, command: Command) -> Result<(), LedgerError> {
    match command {
        Command::Register {
            customer,
            name,
            birth_date,
            address,
        } => directory
            .register_customer(customer, name, birth_date, address)
            .map(|_| ()),
        Command::Open { customer } => directory.open_account(&customer).map(|_| ()),
        Command::Apply {
            customer,
            operation,
        } => directory.execute(&customer, operation).map(|_| ()),
    }
}

/// Replays a session script from a CSV reader.
///
/// Malformed rows are logged and skipped. Rejected commands are counted; the
/// directory already logs why. Neither stops the session.
///
/// # CSV Format
///
/// ```csv
/// command,customer,name,birth_date,address,amount
/// register,111,Maria Silva,12-04-1990,Rua das Flores 10,
/// open,111,,,,
/// deposit,111,,,,100.00
/// withdraw,111,,,,40.00
/// ```
///
/// # Errors
///
/// Returns a CSV error if the reader fails or the CSV structure is invalid.
pub fn run_session<R: Read>(directory: &Directory, reader: R) -> Result<SessionSummary, csv::Error> {
    let mut summary = SessionSummary::default();

    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    for (line, result) in rdr.deserialize::<CsvRecord>().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(row = line + 1, error = %e, "skipping malformed row");
                summary.skipped += 1;
                continue;
            }
        };

        let Some(command) = record.into_command() else {
            tracing::warn!(row = line + 1, "skipping invalid command");
            summary.skipped += 1;
            continue;
        };

        match run_command(directory, command) {
            Ok(()) => summary.applied += 1,
            Err(_) => summary.rejected += 1,
        }
    }

    Ok(summary)
}

/// One row of the account list: the account plus its holder's name.
struct AccountRow<'a> {
    account: &'a Account,
    owner_name: &'a str,
}

impl Serialize for AccountRow<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("AccountRow", 6)?;
        state.serialize_field("branch", self.account.branch())?;
        state.serialize_field("account", &self.account.number())?;
        state.serialize_field("owner", self.account.owner())?;
        state.serialize_field("owner_name", self.owner_name)?;
        state.serialize_field("balance", &format_amount(self.account.balance()))?;
        state.serialize_field("withdrawals", &self.account.withdrawals_today())?;
        state.end()
    }
}

/// Writes every account as a CSV row, in opening order.
///
/// Columns: `branch, account, owner, owner_name, balance, withdrawals`
pub fn write_accounts<W: Write>(directory: &Directory, writer: W) -> Result<(), csv::Error> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(["branch", "account", "owner", "owner_name", "balance", "withdrawals"])?;

    for account in directory.list_accounts() {
        let owner = directory.find_customer(account.owner()).ok();
        wtr.serialize(AccountRow {
            account: &account,
            owner_name: owner.as_deref().map(Customer::name).unwrap_or_default(),
        })?;
    }

    wtr.flush()?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct CustomerRow<'a> {
    customer: &'a str,
    name: &'a str,
    birth_date: String,
    address: &'a str,
    accounts: String,
}

/// Writes every registered customer, in registration order.
///
/// Columns: `customer, name, birth_date, address, accounts`. Account numbers
/// are space separated.
pub fn write_customers<W: Write>(directory: &Directory, writer: W) -> Result<(), csv::Error> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(["customer", "name", "birth_date", "address", "accounts"])?;

    for customer in directory.list_customers() {
        let accounts: Vec<String> = customer
            .accounts()
            .iter()
            .map(ToString::to_string)
            .collect();
        wtr.serialize(CustomerRow {
            customer: customer.id().as_str(),
            name: customer.name(),
            birth_date: customer.birth_date().format(BIRTH_DATE_FORMAT).to_string(),
            address: customer.address(),
            accounts: accounts.join(" "),
        })?;
    }

    wtr.flush()?;
    Ok(())
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
enum RowKind {
    Deposit,
    Withdrawal,
    Balance,
}

impl From<EntryKind> for RowKind {
    fn from(kind: EntryKind) -> Self {
        match kind {
            EntryKind::Deposit => RowKind::Deposit,
            EntryKind::Withdrawal => RowKind::Withdrawal,
        }
    }
}

#[derive(Debug, Serialize)]
struct StatementRow<'a> {
    account: u32,
    kind: RowKind,
    amount: &'a str,
    timestamp: &'a str,
}

/// Writes the statements of every customer in registration order, one per
/// account in opening order.
///
/// Columns: `account, kind, amount, timestamp`. Each statement ends with a
/// `balance` row carrying the current balance, so an account without
/// movements still shows up.
pub fn write_statements<W: Write>(directory: &Directory, writer: W) -> Result<(), csv::Error> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(["account", "kind", "amount", "timestamp"])?;

    for customer in directory.list_customers() {
        for number in customer.accounts() {
            let Ok(account) = directory.get_account(number) else {
                continue;
            };
            let statement = Statement::for_account(&account);
            for line in &statement.lines {
                wtr.serialize(StatementRow {
                    account: statement.account.0,
                    kind: line.kind.into(),
                    amount: &line.amount,
                    timestamp: &line.timestamp,
                })?;
            }
            wtr.serialize(StatementRow {
                account: statement.account.0,
                kind: RowKind::Balance,
                amount: &statement.balance,
                timestamp: "",
            })?;
        }
    }

    wtr.flush()?;
    Ok(())
}
