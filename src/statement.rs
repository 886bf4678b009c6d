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

//! Read-only statement rendering.
//!
//! Timestamps stay structured inside [`History`]; this module is the only
//! place they are turned into text.

use crate::account::Account;
use crate::base::{AccountNumber, BranchCode, CustomerId};
use crate::history::{EntryKind, History, LedgerEntry};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// `day/month/year hour:minute:second`, UTC.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

const AMOUNT_DECIMALS: u32 = 2;

/// Formats a monetary amount with exactly two decimal places.
pub fn format_amount(amount: Decimal) -> String {
    format!(
        "{:.2}",
        amount.round_dp_with_strategy(AMOUNT_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// One rendered history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementLine {
    pub kind: EntryKind,
    pub amount: String,
    pub timestamp: String,
}

impl From<&LedgerEntry> for StatementLine {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            kind: entry.kind(),
            amount: format_amount(entry.amount()),
            timestamp: entry.timestamp().format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// Rendered history of one account plus its current balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    pub branch: BranchCode,
    pub account: AccountNumber,
    pub owner: CustomerId,
    pub lines: Vec<StatementLine>,
    /// Sum of all deposits in `lines`.
    pub deposited: String,
    /// Sum of all withdrawals in `lines`.
    pub withdrawn: String,
    pub balance: String,
}

impl Statement {
    /// Renders `history` for the given account identity.
    pub fn render(
        branch: BranchCode,
        account: AccountNumber,
        owner: CustomerId,
        balance: Decimal,
        history: &History,
    ) -> Self {
        Self {
            branch,
            account,
            owner,
            lines: history.iter().map(StatementLine::from).collect(),
            deposited: format_amount(history.total(EntryKind::Deposit)),
            withdrawn: format_amount(history.total(EntryKind::Withdrawal)),
            balance: format_amount(balance),
        }
    }

    /// Renders the current state of `account`, balance and history taken together.
    pub fn for_account(account: &Account) -> Self {
        let (balance, history) = account.snapshot();
        Self::render(
            account.branch().clone(),
            account.number(),
            account.owner().clone(),
            balance,
            &history,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
