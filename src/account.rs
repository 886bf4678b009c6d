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

//! Account management.
//!
//! An [`Account`] is the only place a balance changes. Each mutation validates
//! the request, updates the balance and appends to the [`History`] while
//! holding the account lock, so readers observe either none or all of it.
//!
//! Withdrawals are checked in a fixed order, first failure wins:
//!
//! 1. session withdrawal count already at its maximum ([`LedgerError::DailyLimitReached`])
//! 2. amount not positive ([`LedgerError::InvalidAmount`])
//! 3. amount above the per-operation limit ([`LedgerError::LimitExceeded`])
//! 4. amount above the balance ([`LedgerError::InsufficientFunds`])
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use bank_ledger::{Account, AccountNumber, BranchCode, CustomerId, WithdrawalPolicy};
//!
//! let account = Account::new(
//!     BranchCode::default(),
//!     AccountNumber(1),
//!     CustomerId::new("123"),
//!     WithdrawalPolicy::default(),
//! );
//! account.deposit(dec!(100.00)).unwrap();
//! assert_eq!(account.balance(), dec!(100.00));
//! ```

use crate::base::{AccountNumber, BranchCode, CustomerId};
use crate::error::LedgerError;
use crate::history::{EntryKind, History};
use crate::operation::Operation;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Withdrawal rules applied to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct WithdrawalPolicy {
    pub per_operation_limit: Decimal,
    pub max_per_session: u32,
}

impl Default for WithdrawalPolicy {
    fn default() -> Self {
        Self {
            per_operation_limit: Decimal::from(500),
            max_per_session: 3,
        }
    }
}

#[derive(Debug)]
struct AccountData {
    balance: Decimal,
    withdrawals: u32,
    history: History,
}

impl AccountData {
    fn new() -> Self {
        Self {
            balance: Decimal::ZERO,
            withdrawals: 0,
            history: History::new(),
        }
    }

    fn assert_invariants(&self) {
        debug_assert!(
            self.balance >= Decimal::ZERO,
            "Invariant violated: balance went negative: {}",
            self.balance
        );
    }

    /// Increases the balance.
    fn deposit(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount);
        }
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;
        self.history.record(EntryKind::Deposit, amount);
        self.assert_invariants();
        Ok(())
    }

    /// Decreases the balance.
    fn withdraw(&mut self, amount: Decimal, policy: &WithdrawalPolicy) -> Result<(), LedgerError> {
        if self.withdrawals >= policy.max_per_session {
            return Err(LedgerError::DailyLimitReached);
        }
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount);
        }
        if amount > policy.per_operation_limit {
            return Err(LedgerError::LimitExceeded);
        }
        if amount > self.balance {
            return Err(LedgerError::InsufficientFunds);
        }
        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or(LedgerError::BalanceOverflow)?;
        self.withdrawals += 1;
        self.history.record(EntryKind::Withdrawal, amount);
        self.assert_invariants();
        Ok(())
    }
}

/// Ledger account.
#[derive(Debug)]
pub struct Account {
    branch: BranchCode,
    number: AccountNumber,
    owner: CustomerId,
    policy: WithdrawalPolicy,
    inner: Mutex<AccountData>,
}

impl Account {
    pub fn new(
        branch: BranchCode,
        number: AccountNumber,
        owner: CustomerId,
        policy: WithdrawalPolicy,
    ) -> Self {
        Self {
            branch,
            number,
            owner,
            policy,
            inner: Mutex::new(AccountData::new()),
        }
    }

    pub fn branch(&self) -> &BranchCode {
        &self.branch
    }

    pub fn number(&self) -> AccountNumber {
        self.number
    }

    pub fn owner(&self) -> &CustomerId {
        &self.owner
    }

    pub fn policy(&self) -> &WithdrawalPolicy {
        &self.policy
    }

    pub fn balance(&self) -> Decimal {
        self.inner.lock().balance
    }

    /// Snapshot of the movements recorded so far.
    pub fn history(&self) -> History {
        self.inner.lock().history.clone()
    }

    /// Withdrawals performed during this session.
    pub fn withdrawals_today(&self) -> u32 {
        self.inner.lock().withdrawals
    }

    pub fn withdrawals_remaining(&self) -> u32 {
        self.policy
            .max_per_session
            .saturating_sub(self.inner.lock().withdrawals)
    }

    /// Balance and history read under a single lock.
    pub fn snapshot(&self) -> (Decimal, History) {
        let data = self.inner.lock();
        (data.balance, data.history.clone())
    }

    /// Credits `amount` and records a deposit.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidAmount`] if `amount` is zero or negative.
    /// - [`LedgerError::BalanceOverflow`] if the new balance is not representable.
    pub fn deposit(&self, amount: Decimal) -> Result<(), LedgerError> {
        self.inner.lock().deposit(amount)
    }

    /// Debits `amount` and records a withdrawal.
    ///
    /// # Errors
    ///
    /// See the module docs for the order in which the checks run.
    pub fn withdraw(&self, amount: Decimal) -> Result<(), LedgerError> {
        self.inner.lock().withdraw(amount, &self.policy)
    }

    pub fn apply(&self, operation: &Operation) -> Result<(), LedgerError> {
        operation.apply(self)
    }
}
