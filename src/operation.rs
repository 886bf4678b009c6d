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

//! Monetary operations.
//!
//! An [`Operation`] is the intent to move money in or out of an account. It
//! carries no state of its own: validation and recording happen inside
//! [`Account`] when the operation is applied.

use crate::account::Account;
use crate::error::LedgerError;
use crate::history::EntryKind;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Operation {
    Deposit { amount: Decimal },
    Withdrawal { amount: Decimal },
}

impl Operation {
    pub fn deposit(amount: Decimal) -> Self {
        Self::Deposit { amount }
    }

    pub fn withdrawal(amount: Decimal) -> Self {
        Self::Withdrawal { amount }
    }

    pub fn amount(&self) -> Decimal {
        match self {
            Self::Deposit { amount } | Self::Withdrawal { amount } => *amount,
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Deposit { .. } => EntryKind::Deposit,
            Self::Withdrawal { .. } => EntryKind::Withdrawal,
        }
    }

    /// Applies the operation to `account`.
    ///
    /// # Errors
    ///
    /// Whatever [`Account::deposit`] or [`Account::withdraw`] rejects the
    /// amount with. A failed operation leaves the account untouched.
    pub fn apply(&self, account: &Account) -> Result<(), LedgerError> {
        match *self {
            Self::Deposit { amount } => account.deposit(amount),
            Self::Withdrawal { amount } => account.withdraw(amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn accessors() {
        let deposit = Operation::deposit(dec!(12.50));
        assert_eq!(deposit.amount(), dec!(12.50));
        assert_eq!(deposit.kind(), EntryKind::Deposit);

        let withdrawal = Operation::withdrawal(dec!(3));
        assert_eq!(withdrawal.amount(), dec!(3));
        assert_eq!(withdrawal.kind(), EntryKind::Withdrawal);
    }

    #[test]
    fn tagged_json_representation() {
        let json = serde_json::to_string(&Operation::withdrawal(dec!(25.00))).unwrap();
        assert_eq!(json, r#"{"type":"withdrawal","amount":"25.00"}"#);

        let parsed: Operation =
            serde_json::from_str(r#"{"type":"deposit","amount":"100.00"}"#).unwrap();
        assert_eq!(parsed, Operation::deposit(dec!(100.00)));
    }
}
