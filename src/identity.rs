// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// A connected wallet address.
///
/// Balances are partitioned by identity; two identities never share state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Returns the address as given by the wallet.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for display, e.g. `0x1234...abcd`.
    #[must_use]
    pub fn short(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 10 {
            return self.0.clone();
        }

        let head: String = chars[..6].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    }
}

impl FromStr for Identity {
    type Err = LedgerError;

    fn from_str(address: &str) -> Result<Self, Self::Err> {
        let address = address.trim();
        if address.is_empty() {
            return Err(LedgerError::Validation {
                field: "address",
                reason: "wallet address cannot be blank",
            });
        }
        Ok(Self(address.to_string()))
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Chain id of the network a wallet is connected to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkId(pub u64);

impl NetworkId {
    /// Base mainnet.
    pub const BASE_MAINNET: Self = Self(8453);

    /// Human readable network name.
    #[must_use]
    pub fn label(self) -> String {
        if self == Self::BASE_MAINNET {
            "Base Mainnet".to_string()
        } else {
            format!("chain {}", self.0)
        }
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Source of the currently connected wallet.
///
/// The ledger only reads from a provider; connecting and disconnecting is
/// the provider's business.
pub trait IdentityProvider {
    /// The connected wallet, or `None` when disconnected.
    fn current_identity(&self) -> Option<Identity>;

    /// The network the wallet is on, if known.
    fn current_network(&self) -> Option<NetworkId>;
}

impl<T: IdentityProvider + ?Sized> IdentityProvider for &T {
    fn current_identity(&self) -> Option<Identity> {
        (**self).current_identity()
    }

    fn current_network(&self) -> Option<NetworkId> {
        (**self).current_network()
    }
}

/// In-process wallet session.
#[derive(Debug, Clone, Default)]
pub struct WalletSession {
    identity: Option<Identity>,
    network: Option<NetworkId>,
}

impl WalletSession {
    /// A session that is already connected.
    #[must_use]
    pub fn connected(identity: Identity, network: NetworkId) -> Self {
        Self {
            identity: Some(identity),
            network: Some(network),
        }
    }

    /// Connects `identity` on `network`, replacing any previous wallet.
    pub fn connect(&mut self, identity: Identity, network: NetworkId) {
        tracing::debug!(%identity, %network, "wallet connected");
        self.identity = Some(identity);
        self.network = Some(network);
    }

    /// Drops the connection. Persisted balances are left untouched.
    pub fn disconnect(&mut self) {
        if let Some(identity) = self.identity.take() {
            tracing::debug!(%identity, "wallet disconnected");
        }
        self.network = None;
    }

    /// Whether a wallet is connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.identity.is_some()
    }
}

impl IdentityProvider for WalletSession {
    fn current_identity(&self) -> Option<Identity> {
        self.identity.clone()
    }

    fn current_network(&self) -> Option<NetworkId> {
        self.network
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortens_long_addresses() {
        let identity: Identity = "0x1234567890abcdef1234567890abcdef12345678"
            .parse()
            .expect("valid address");
        assert_eq!(identity.short(), "0x1234...5678");
    }

    #[test]
    fn keeps_short_addresses_whole() {
        let identity: Identity = "0xabc".parse().expect("valid address");
        assert_eq!(identity.short(), "0xabc");
    }

    #[test]
    fn rejects_blank_address() {
        let err = "   ".parse::<Identity>().expect_err("blank address");
        assert!(err.to_string().contains("address"));
    }

    #[test]
    fn disconnect_clears_session() {
        let identity: Identity = "0xfeed".parse().expect("valid address");
        let mut session = WalletSession::connected(identity, NetworkId::BASE_MAINNET);
        assert!(session.is_connected());

        session.disconnect();
        assert!(!session.is_connected());
        assert_eq!(session.current_network(), None);
    }

    #[test]
    fn labels_base_mainnet() {
        assert_eq!(NetworkId::BASE_MAINNET.label(), "Base Mainnet");
        assert_eq!(NetworkId(1).label(), "chain 1");
    }
}
