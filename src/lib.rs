// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Points ledger for the Base Moon wallet preparation tools.
//!
//! A [`PointsLedger`] keeps a per-wallet balance of BM coins, persists it
//! through a [`Persistence`] store and makes sure every user action yields
//! at most one award. Wallet identity comes from an [`IdentityProvider`] and
//! the (simulated) deployment itself is carried out by an
//! [`ActionExecutor`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unused_must_use)]
#![deny(unused_extern_crates)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![warn(missing_debug_implementations, unreachable_pub, rustdoc::all)]

/// Action requests and their validation rules.
pub mod action;
/// Ledger configuration.
pub mod config;
/// Error types.
pub mod error;
/// Executors carrying out actions.
pub mod executor;
/// Wallet identity and network types.
pub mod identity;
/// The points ledger.
pub mod ledger;
/// Key-value persistence for balances.
pub mod store;

pub use action::{ActionKind, ActionRequest};
pub use config::{LedgerConfig, DEFAULT_AWARD};
pub use error::{ConfigError, LedgerError, PersistenceError};
pub use executor::{ActionExecutor, Outcome, SimulatedExecutor, Timeout};
pub use identity::{Identity, IdentityProvider, NetworkId, WalletSession};
pub use ledger::{ActionHandle, ActionReport, PointsLedger};
pub use store::{storage_key, FileStore, MemoryStore, Persistence};
