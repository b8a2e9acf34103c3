// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::{fs, io, path::Path, time::Duration};

use serde::Deserialize;

use crate::{error::ConfigError, identity::NetworkId, store::DEFAULT_KEY_PREFIX};

/// Points awarded for each successful action. Not configurable.
pub const DEFAULT_AWARD: u64 = 100;

/// Ledger settings, usually read from `base-moon.toml`.
///
/// ```toml
/// storage_prefix = "base_moon_points"
/// chain_id = 8453
/// enforce_network = true
/// simulated_delay_ms = 2000
/// action_timeout_ms = 30000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LedgerConfig {
    /// Prefix of balance storage keys.
    pub storage_prefix: String,
    /// Chain id actions are accepted on.
    pub chain_id: u64,
    /// Reject actions from wallets on another chain.
    pub enforce_network: bool,
    /// Duration of a simulated deployment.
    pub simulated_delay_ms: u64,
    /// Deadline after which a pending action is failed, if any.
    pub action_timeout_ms: Option<u64>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            storage_prefix: DEFAULT_KEY_PREFIX.to_string(),
            chain_id: NetworkId::BASE_MAINNET.0,
            enforce_network: true,
            simulated_delay_ms: 2_000,
            action_timeout_ms: None,
        }
    }
}

impl LedgerConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Fails on malformed TOML, unknown keys or a blank storage prefix.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the config at `path`, falling back to defaults when the file
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// The network actions are restricted to, if restricted.
    #[must_use]
    pub fn required_network(&self) -> Option<NetworkId> {
        self.enforce_network.then_some(NetworkId(self.chain_id))
    }

    /// Simulated deployment time.
    #[must_use]
    pub fn simulated_delay(&self) -> Duration {
        Duration::from_millis(self.simulated_delay_ms)
    }

    /// Action deadline, if any.
    #[must_use]
    pub fn action_timeout(&self) -> Option<Duration> {
        self.action_timeout_ms.map(Duration::from_millis)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "storage_prefix",
                reason: "cannot be blank",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = LedgerConfig::from_toml_str("").expect("valid config");
        assert_eq!(config, LedgerConfig::default());
        assert_eq!(config.required_network(), Some(NetworkId::BASE_MAINNET));
    }

    #[test]
    fn reads_overrides() {
        let config = LedgerConfig::from_toml_str(
            "storage_prefix = \"moon\"\nenforce_network = false\naction_timeout_ms = 500\n",
        )
        .expect("valid config");

        assert_eq!(config.storage_prefix, "moon");
        assert_eq!(config.required_network(), None);
        assert_eq!(config.action_timeout(), Some(Duration::from_millis(500)));
    }

    #[test]
    fn award_cannot_be_overridden() {
        let err = LedgerConfig::from_toml_str("award = 250").expect_err("fixed award");
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn rejects_blank_prefix() {
        let err = LedgerConfig::from_toml_str("storage_prefix = \"  \"")
            .expect_err("blank prefix");
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "storage_prefix",
                ..
            }
        ));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = LedgerConfig::from_toml_str("chain = 1").expect_err("unknown key");
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let config = LedgerConfig::load(&tmp.path().join("base-moon.toml")).expect("defaults");
        assert_eq!(config, LedgerConfig::default());
    }
}
