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

//! Ledger configuration.
//!
//! Values are resolved in increasing order of precedence: built-in defaults,
//! then environment variables, then explicit overrides from the caller
//! (the CLI flags).
//!
//! | Variable | Default |
//! |----------|---------|
//! | `LEDGER_BRANCH_CODE` | `0001` |
//! | `LEDGER_WITHDRAWAL_LIMIT` | `500` |
//! | `LEDGER_MAX_WITHDRAWALS` | `3` |

use crate::account::WithdrawalPolicy;
use crate::base::BranchCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

pub const ENV_BRANCH_CODE: &str = "LEDGER_BRANCH_CODE";
pub const ENV_WITHDRAWAL_LIMIT: &str = "LEDGER_WITHDRAWAL_LIMIT";
pub const ENV_MAX_WITHDRAWALS: &str = "LEDGER_MAX_WITHDRAWALS";

/// Configuration loading errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
}

/// Settings shared by every account a [`Directory`](crate::Directory) opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub branch_code: BranchCode,
    /// Largest amount a single withdrawal may take.
    pub withdrawal_limit: Decimal,
    /// Withdrawals allowed per account per session.
    pub max_withdrawals: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            branch_code: BranchCode::default(),
            withdrawal_limit: Decimal::from(500),
            max_withdrawals: 3,
        }
    }
}

impl LedgerConfig {
    /// Reads overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from defaults plus whatever `lookup` returns
    /// for the `LEDGER_*` keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(code) = lookup(ENV_BRANCH_CODE) {
            config.branch_code = BranchCode::new(code.trim());
        }
        if let Some(limit) = lookup(ENV_WITHDRAWAL_LIMIT) {
            config.withdrawal_limit = parse(ENV_WITHDRAWAL_LIMIT, &limit)?;
        }
        if let Some(max) = lookup(ENV_MAX_WITHDRAWALS) {
            config.max_withdrawals = parse(ENV_MAX_WITHDRAWALS, &max)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Rejects a blank branch code and configurations that would make every
    /// withdrawal fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.branch_code.as_str().trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: ENV_BRANCH_CODE,
                message: "branch code cannot be empty".to_string(),
            });
        }
        if self.withdrawal_limit <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                key: ENV_WITHDRAWAL_LIMIT,
                message: format!("must be positive, got {}", self.withdrawal_limit),
            });
        }
        Ok(())
    }

    pub fn withdrawal_policy(&self) -> WithdrawalPolicy {
        WithdrawalPolicy {
            per_operation_limit: self.withdrawal_limit,
            max_per_session: self.max_withdrawals,
        }
    }
}

fn parse<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key,
        message: e.to_string(),
    })
}
