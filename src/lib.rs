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

//! # Bank Ledger
//!
//! This library provides an in-memory retail banking ledger: customers,
//! accounts, deposits, withdrawals and the statement of those movements.
//!
//! ## Core Components
//!
//! - [`Directory`]: Registry resolving customers and accounts, assigns account numbers
//! - [`Account`]: Balance, withdrawal policy and append-only [`History`]
//! - [`Operation`]: Deposit or withdrawal intent applied to an account
//! - [`Statement`]: Read-only rendering of an account's history
//! - [`LedgerError`]: Error types for rejected operations
//!
//! ## Example
//!
//! ```
//! use bank_ledger::{CustomerId, Directory, LedgerError, Operation};
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//!
//! let directory = Directory::new();
//! let id = CustomerId::new("123.456.789-00");
//!
//! directory
//!     .register_customer(
//!         id.clone(),
//!         "Maria Silva",
//!         NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
//!         "Rua das Flores, 10",
//!     )
//!     .unwrap();
//! let account = directory.open_account(&id).unwrap();
//!
//! directory.execute(&id, Operation::deposit(dec!(100.00))).unwrap();
//! directory.execute(&id, Operation::withdrawal(dec!(40.00))).unwrap();
//! assert_eq!(account.balance(), dec!(60.00));
//!
//! let result = directory.execute(&id, Operation::withdrawal(dec!(1000.00)));
//! assert_eq!(result.unwrap_err(), LedgerError::LimitExceeded);
//! ```
//!
//! ## Thread Safety
//!
//! Every account has its own lock and the directory registries are concurrent
//! maps, so operations on different accounts proceed in parallel while
//! operations on the same account are serialized.

pub mod account;
mod base;
pub mod config;
mod customer;
mod directory;
pub mod error;
mod history;
mod operation;
pub mod statement;

pub use account::{Account, WithdrawalPolicy};
pub use base::{AccountNumber, BranchCode, CustomerId};
pub use config::{ConfigError, LedgerConfig};
pub use customer::Customer;
pub use directory::Directory;
pub use error::LedgerError;
pub use history::{EntryKind, History, LedgerEntry};
pub use operation::Operation;
pub use statement::{Statement, StatementLine};
