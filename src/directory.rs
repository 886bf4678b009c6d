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

//! Customer and account registry.
//!
//! The [`Directory`] owns every [`Customer`] and [`Account`] of a session. It
//! enforces identifier uniqueness, assigns account numbers and links each new
//! account to its owner.
//!
//! # Account selection
//!
//! Operations addressed to a customer rather than an account number
//! ([`Directory::execute`], [`Directory::statement`]) act on the customer's
//! first account.
//!
//! # Thread Safety
//!
//! Registries are [`DashMap`]s holding fully constructed `Arc` values, so
//! readers never see a half-built customer or account. Each account carries
//! its own lock; operations on different accounts never contend.

use crate::account::Account;
use crate::base::{AccountNumber, CustomerId};
use crate::config::LedgerConfig;
use crate::customer::Customer;
use crate::operation::Operation;
use crate::statement::Statement;
use crate::LedgerError;
use chrono::NaiveDate;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug)]
struct Registered {
    seq: u64,
    customer: Arc<Customer>,
}

/// Registry of customers and their accounts.
///
/// # Invariants
///
/// - Customer identifiers are unique and never change.
/// - Account numbers start at 1, grow by one per opened account and are never reused.
/// - Every account belongs to exactly one registered customer.
#[derive(Debug)]
pub struct Directory {
    config: LedgerConfig,
    customers: DashMap<CustomerId, Registered>,
    accounts: DashMap<AccountNumber, Arc<Account>>,
    next_customer_seq: AtomicU64,
    next_account_number: AtomicU32,
}

impl Directory {
    /// Creates an empty directory with the default configuration.
    pub fn new() -> Self {
        Self::with_config(LedgerConfig::default())
    }

    pub fn with_config(config: LedgerConfig) -> Self {
        Directory {
            config,
            customers: DashMap::new(),
            accounts: DashMap::new(),
            next_customer_seq: AtomicU64::new(0),
            next_account_number: AtomicU32::new(1),
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Registers a new customer with no accounts.
    ///
    /// # Errors
    ///
    /// [`LedgerError::DuplicateIdentifier`] if `id` is already registered.
    pub fn register_customer(
        &self,
        id: CustomerId,
        name: impl Into<String>,
        birth_date: NaiveDate,
        address: impl Into<String>,
    ) -> Result<Arc<Customer>, LedgerError> {
        // Entry API gives an atomic check-and-insert across racing registrations.
        match self.customers.entry(id) {
            Entry::Occupied(entry) => {
                tracing::warn!(customer = %entry.key(), "duplicate customer registration");
                Err(LedgerError::DuplicateIdentifier)
            }
            Entry::Vacant(entry) => {
                let customer = Arc::new(Customer::new(
                    entry.key().clone(),
                    name,
                    birth_date,
                    address,
                ));
                let seq = self.next_customer_seq.fetch_add(1, Ordering::SeqCst);
                entry.insert(Registered {
                    seq,
                    customer: Arc::clone(&customer),
                });
                tracing::debug!(customer = %customer.id(), "customer registered");
                Ok(customer)
            }
        }
    }

    /// Looks up a customer by identifier.
    pub fn find_customer(&self, id: &CustomerId) -> Result<Arc<Customer>, LedgerError> {
        self.customers
            .get(id)
            .map(|registered| Arc::clone(&registered.customer))
            .ok_or(LedgerError::CustomerNotFound)
    }

    /// Opens a new account for an existing customer.
    ///
    /// # Errors
    ///
    /// [`LedgerError::CustomerNotFound`] if no customer is registered under
    /// `customer_id`. No account number is consumed in that case.
    pub fn open_account(&self, customer_id: &CustomerId) -> Result<Arc<Account>, LedgerError> {
        let customer = self.find_customer(customer_id).inspect_err(|e| {
            tracing::warn!(customer = %customer_id, error = %e, "account opening rejected");
        })?;

        let account = customer.link_account_with(|| {
            let number = AccountNumber(self.next_account_number.fetch_add(1, Ordering::SeqCst));
            let account = Arc::new(Account::new(
                self.config.branch_code.clone(),
                number,
                customer.id().clone(),
                self.config.withdrawal_policy(),
            ));
            self.accounts.insert(number, Arc::clone(&account));
            account
        });

        tracing::debug!(customer = %customer.id(), account = %account.number(), "account opened");
        Ok(account)
    }

    /// All accounts, in the order they were opened.
    pub fn list_accounts(&self) -> Vec<Arc<Account>> {
        let mut accounts: Vec<_> = self
            .accounts
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        accounts.sort_by_key(|account| account.number());
        accounts
    }

    /// All customers, in the order they were registered.
    pub fn list_customers(&self) -> Vec<Arc<Customer>> {
        let mut customers: Vec<_> = self
            .customers
            .iter()
            .map(|entry| (entry.seq, Arc::clone(&entry.customer)))
            .collect();
        customers.sort_by_key(|(seq, _)| *seq);
        customers.into_iter().map(|(_, customer)| customer).collect()
    }

    /// Looks up an account by number.
    pub fn get_account(&self, number: AccountNumber) -> Result<Arc<Account>, LedgerError> {
        self.accounts
            .get(&number)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(LedgerError::AccountNotFound)
    }

    /// The first account opened for `customer_id`.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::CustomerNotFound`] - Unknown customer.
    /// - [`LedgerError::AccountNotFound`] - Customer has no accounts yet.
    pub fn primary_account(&self, customer_id: &CustomerId) -> Result<Arc<Account>, LedgerError> {
        let customer = self.find_customer(customer_id)?;
        let number = customer
            .primary_account()
            .ok_or(LedgerError::AccountNotFound)?;
        self.get_account(number)
    }

    /// Applies `operation` to the customer's primary account.
    ///
    /// Returns the account the operation was applied to.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::CustomerNotFound`] / [`LedgerError::AccountNotFound`] - Resolution failed.
    /// - [`LedgerError::InvalidAmount`] - Amount is zero or negative.
    /// - [`LedgerError::DailyLimitReached`] - Session withdrawal count is exhausted.
    /// - [`LedgerError::LimitExceeded`] - Withdrawal above the per-operation limit.
    /// - [`LedgerError::InsufficientFunds`] - Withdrawal above the balance.
    pub fn execute(
        &self,
        customer_id: &CustomerId,
        operation: Operation,
    ) -> Result<Arc<Account>, LedgerError> {
        let account = self.primary_account(customer_id)?;

        match account.apply(&operation) {
            Ok(()) => {
                tracing::debug!(
                    account = %account.number(),
                    kind = %operation.kind(),
                    amount = %operation.amount(),
                    balance = %account.balance(),
                    "operation applied"
                );
                Ok(account)
            }
            Err(e) => {
                tracing::warn!(
                    account = %account.number(),
                    kind = %operation.kind(),
                    amount = %operation.amount(),
                    error = %e,
                    "operation rejected"
                );
                Err(e)
            }
        }
    }

    /// Statement of the customer's primary account.
    pub fn statement(&self, customer_id: &CustomerId) -> Result<Statement, LedgerError> {
        let account = self.primary_account(customer_id)?;
        Ok(Statement::for_account(&account))
    }

    pub fn customer_count(&self) -> usize {
        self.customers.len()
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }
}

impl Default for Directory {
    fn default() -> Self {
        Self::new()
    }
}
