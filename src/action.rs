// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Wei per ether.
const WEI_PER_ETH: u128 = 1_000_000_000_000_000_000;

/// Decimals used for created tokens.
pub const TOKEN_DECIMALS: u8 = 18;

/// The kind of a user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    /// Create an NFT collection contract.
    NftCreate,
    /// Create a fungible token contract.
    TokenCreate,
    /// Deploy the simple storage contract.
    StorageDeploy,
}

impl ActionKind {
    /// Short label used in messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::NftCreate => "NFT contract",
            Self::TokenCreate => "token contract",
            Self::StorageDeploy => "storage contract",
        }
    }

    /// Deployment fee shown to the user, in wei.
    #[must_use]
    pub fn fee_wei(self) -> u128 {
        match self {
            Self::NftCreate | Self::TokenCreate => WEI_PER_ETH / 5_000,
            Self::StorageDeploy => WEI_PER_ETH / 10_000,
        }
    }

    /// Deployment fee formatted in ETH, e.g. `0.0002 ETH`.
    #[must_use]
    pub fn fee_display(self) -> String {
        let wei = self.fee_wei();
        let whole = wei / WEI_PER_ETH;
        let fraction = format!("{:018}", wei % WEI_PER_ETH);
        let fraction = fraction.trim_end_matches('0');
        if fraction.is_empty() {
            format!("{whole} ETH")
        } else {
            format!("{whole}.{fraction} ETH")
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parameters of one attempted action.
///
/// Requests are validated with [`ActionRequest::validate`] before they are
/// submitted and are never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRequest {
    /// Create an NFT collection.
    NftCreate {
        /// Collection name.
        name: String,
        /// Collection symbol.
        ticker: String,
        /// Free-form description, optional.
        description: String,
    },
    /// Create a fungible token.
    TokenCreate {
        /// Token name.
        name: String,
        /// Token symbol.
        ticker: String,
        /// Initial supply as entered, must be a positive integer.
        supply: String,
    },
    /// Deploy the storage contract.
    StorageDeploy,
}

impl ActionRequest {
    /// An NFT request.
    #[must_use]
    pub fn nft(
        name: impl Into<String>,
        ticker: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::NftCreate {
            name: name.into(),
            ticker: ticker.into(),
            description: description.into(),
        }
    }

    /// A token request.
    #[must_use]
    pub fn token(
        name: impl Into<String>,
        ticker: impl Into<String>,
        supply: impl Into<String>,
    ) -> Self {
        Self::TokenCreate {
            name: name.into(),
            ticker: ticker.into(),
            supply: supply.into(),
        }
    }

    /// The kind of this request.
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::NftCreate { .. } => ActionKind::NftCreate,
            Self::TokenCreate { .. } => ActionKind::TokenCreate,
            Self::StorageDeploy => ActionKind::StorageDeploy,
        }
    }

    /// Checks the required fields for the request's kind.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Validation`] naming the first blank or
    /// malformed field.
    pub fn validate(&self) -> Result<(), LedgerError> {
        match self {
            Self::NftCreate { name, ticker, .. } => {
                require("name", name)?;
                require("ticker", ticker)
            }
            Self::TokenCreate {
                name,
                ticker,
                supply,
            } => {
                require("name", name)?;
                require("ticker", ticker)?;
                parse_supply(supply).map(|_| ())
            }
            Self::StorageDeploy => Ok(()),
        }
    }

    /// Parsed token supply, for token requests with a valid supply.
    #[must_use]
    pub fn token_supply(&self) -> Option<u128> {
        match self {
            Self::TokenCreate { supply, .. } => parse_supply(supply).ok(),
            _ => None,
        }
    }
}

fn require(field: &'static str, value: &str) -> Result<(), LedgerError> {
    if value.trim().is_empty() {
        return Err(LedgerError::Validation {
            field,
            reason: "cannot be blank",
        });
    }
    Ok(())
}

fn parse_supply(supply: &str) -> Result<u128, LedgerError> {
    require("supply", supply)?;

    match supply.trim().parse::<u128>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(LedgerError::Validation {
            field: "supply",
            reason: "must be a positive integer",
        }),
    }
}
