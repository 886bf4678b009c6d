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

//! Customer profiles.

use crate::account::Account;
use crate::base::{AccountNumber, CustomerId};
use chrono::NaiveDate;
use parking_lot::RwLock;
use std::sync::Arc;

/// A registered customer and the accounts opened in their name.
///
/// Profile fields are fixed at registration. The account list only grows,
/// in the order the accounts were opened.
#[derive(Debug)]
pub struct Customer {
    id: CustomerId,
    name: String,
    birth_date: NaiveDate,
    address: String,
    accounts: RwLock<Vec<AccountNumber>>,
}

impl Customer {
    pub fn new(
        id: CustomerId,
        name: impl Into<String>,
        birth_date: NaiveDate,
        address: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            birth_date,
            address: address.into(),
            accounts: RwLock::new(Vec::new()),
        }
    }

    pub fn id(&self) -> &CustomerId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Account numbers owned by this customer, oldest first.
    pub fn accounts(&self) -> Vec<AccountNumber> {
        self.accounts.read().clone()
    }

    /// The account operations default to when the customer owns several.
    pub fn primary_account(&self) -> Option<AccountNumber> {
        self.accounts.read().first().copied()
    }

    /// Runs `open` while holding the account list lock and links its result.
    ///
    /// Keeps the list ordered by account number even when several accounts
    /// are opened for the same customer concurrently.
    pub(crate) fn link_account_with<F>(&self, open: F) -> Arc<Account>
    where
        F: FnOnce() -> Arc<Account>,
    {
        let mut accounts = self.accounts.write();
        let account = open();
        accounts.push(account.number());
        account
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::WithdrawalPolicy;
    use crate::base::BranchCode;

    fn account(number: u32, owner: &CustomerId) -> Arc<Account> {
        Arc::new(Account::new(
            BranchCode::default(),
            AccountNumber(number),
            owner.clone(),
            WithdrawalPolicy::default(),
        ))
    }

    fn customer() -> Customer {
        Customer::new(
            CustomerId::new("123.456.789-00"),
            "Maria Silva",
            NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
            "Rua das Flores, 10 - Centro - Recife/PE",
        )
    }

    #[test]
    fn new_customer_has_no_accounts() {
        let customer = customer();
        assert!(customer.accounts().is_empty());
        assert_eq!(customer.primary_account(), None);
    }

    #[test]
    fn first_linked_account_is_primary() {
        let customer = customer();
        customer.link_account_with(|| account(4, customer.id()));
        customer.link_account_with(|| account(2, customer.id()));

        assert_eq!(customer.accounts(), vec![AccountNumber(4), AccountNumber(2)]);
        assert_eq!(customer.primary_account(), Some(AccountNumber(4)));
    }

    #[test]
    fn link_returns_the_opened_account() {
        let customer = customer();
        let linked = customer.link_account_with(|| account(1, customer.id()));

        assert_eq!(linked.number(), AccountNumber(1));
        assert_eq!(linked.owner(), customer.id());
        assert_eq!(customer.accounts(), vec![AccountNumber(1)]);
    }
}
