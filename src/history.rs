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

//! Append-only record of the movements applied to one account.
//!
//! Entries are created by [`Account`](crate::Account) only after the balance
//! mutation succeeded, under the same lock, so a [`History`] never contains a
//! failed operation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a recorded movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Deposit,
    Withdrawal,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit => f.write_str("Deposit"),
            Self::Withdrawal => f.write_str("Withdrawal"),
        }
    }
}

/// One immutable monetary movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    kind: EntryKind,
    amount: Decimal,
    timestamp: DateTime<Utc>,
}

impl LedgerEntry {
    pub(crate) fn new(kind: EntryKind, amount: Decimal, timestamp: DateTime<Utc>) -> Self {
        debug_assert!(amount > Decimal::ZERO, "ledger entries carry positive amounts");
        Self {
            kind,
            amount,
            timestamp,
        }
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Chronologically ordered log of [`LedgerEntry`] values.
///
/// The only mutation is [`History::record`], which is crate-private; callers
/// outside the crate only ever see clones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct History {
    entries: Vec<LedgerEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, kind: EntryKind, amount: Decimal) {
        self.entries.push(LedgerEntry::new(kind, amount, Utc::now()));
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LedgerEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&LedgerEntry> {
        self.entries.last()
    }

    /// Sum of all amounts of the given kind, saturating at [`Decimal::MAX`].
    pub fn total(&self, kind: EntryKind) -> Decimal {
        self.entries
            .iter()
            .filter(|entry| entry.kind == kind)
            .fold(Decimal::ZERO, |sum, entry| sum.saturating_add(entry.amount))
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a LedgerEntry;
    type IntoIter = std::slice::Iter<'a, LedgerEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
