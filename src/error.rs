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

//! Error types for ledger operations.

use thiserror::Error;

/// Ledger operation errors.
///
/// Every variant is a recoverable outcome of a single operation. None of them
/// leaves an account or the directory partially updated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Amount is zero or negative
    #[error("invalid amount (must be positive)")]
    InvalidAmount,

    /// Withdrawal would exceed the current balance
    #[error("insufficient funds")]
    InsufficientFunds,

    /// Withdrawal exceeds the per-operation ceiling
    #[error("amount exceeds the per-withdrawal limit")]
    LimitExceeded,

    /// Session withdrawal count is already at its maximum
    #[error("daily withdrawal limit reached")]
    DailyLimitReached,

    /// No customer is registered under the identifier
    #[error("customer not found")]
    CustomerNotFound,

    /// No account matches the lookup
    #[error("account not found")]
    AccountNotFound,

    /// A customer with the same identifier is already registered
    #[error("customer identifier already registered")]
    DuplicateIdentifier,

    /// The resulting balance is outside the representable decimal range
    #[error("balance would overflow")]
    BalanceOverflow,
}

#[cfg(test)]
mod tests {
    use super::LedgerError;

    #[test]
    fn error_display_messages() {
        assert_eq!(
            LedgerError::InvalidAmount.to_string(),
            "invalid amount (must be positive)"
        );
        assert_eq!(LedgerError::InsufficientFunds.to_string(), "insufficient funds");
        assert_eq!(
            LedgerError::LimitExceeded.to_string(),
            "amount exceeds the per-withdrawal limit"
        );
        assert_eq!(
            LedgerError::DailyLimitReached.to_string(),
            "daily withdrawal limit reached"
        );
        assert_eq!(LedgerError::CustomerNotFound.to_string(), "customer not found");
        assert_eq!(LedgerError::AccountNotFound.to_string(), "account not found");
        assert_eq!(
            LedgerError::DuplicateIdentifier.to_string(),
            "customer identifier already registered"
        );
        assert_eq!(LedgerError::BalanceOverflow.to_string(), "balance would overflow");
    }

    #[test]
    fn errors_are_cloneable() {
        let error = LedgerError::DailyLimitReached;
        let cloned = error.clone();
        assert_eq!(error, cloned);
    }
}
