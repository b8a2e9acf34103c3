// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

use crate::{action::ActionKind, identity::Identity, identity::NetworkId};

/// Errors reported by the [`PointsLedger`](crate::PointsLedger).
///
/// None of these are retried by the ledger; they are meant to be shown to
/// the user.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// No wallet is connected.
    #[error("no wallet connected")]
    NoIdentity,

    /// The wallet is connected to a network the ledger does not accept.
    #[error("wrong network: expected {expected}, connected to {}", describe_network(.actual))]
    WrongNetwork {
        /// Network actions are accepted on.
        expected: NetworkId,
        /// Network the wallet reported, if any.
        actual: Option<NetworkId>,
    },

    /// A request field is missing or malformed.
    #[error("invalid {field}: {reason}")]
    Validation {
        /// Name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// Another action is still pending for this wallet.
    #[error("{kind} deployment already in progress for {identity}")]
    ActionInProgress {
        /// Wallet the pending action belongs to.
        identity: Identity,
        /// Kind of the pending action.
        kind: ActionKind,
    },

    /// The handle does not match the pending action.
    #[error("action #{0} is no longer pending")]
    StaleHandle(u64),

    /// Awards must be strictly positive.
    #[error("award amount must be positive")]
    InvalidAmount,

    /// The award would overflow the balance.
    #[error("balance overflow for {0}")]
    BalanceOverflow(Identity),

    /// The balance could not be written to storage.
    ///
    /// The in-memory balance already includes the award.
    #[error("failed to persist balance: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Storage write failures.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// I/O failure of a file backed store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The store contents could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The store refused the write.
    #[error("write to '{key}' rejected: {reason}")]
    Rejected {
        /// Key being written.
        key: String,
        /// Why the store refused it.
        reason: String,
    },
}

/// Errors loading a [`LedgerConfig`](crate::LedgerConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for the expected layout.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid config value '{key}': {reason}")]
    Invalid {
        /// Config key.
        key: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

fn describe_network(network: &Option<NetworkId>) -> String {
    network.map_or_else(|| "no network".to_string(), |id| id.to_string())
}
