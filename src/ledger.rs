// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Per-wallet points balance with a one-action-at-a-time guard.
//!
//! The ledger is meant to be driven from a single task. An action goes
//! through [`PointsLedger::begin_action`], is handed to an
//! [`ActionExecutor`], and is settled with [`PointsLedger::complete_action`].
//! Only a successful outcome awards points, and only once per handle.

use std::collections::HashMap;

use crate::{
    action::{ActionKind, ActionRequest},
    config::{LedgerConfig, DEFAULT_AWARD},
    error::LedgerError,
    executor::{ActionExecutor, Outcome},
    identity::{Identity, IdentityProvider},
    store::{storage_key, Persistence},
};

/// Ticket for a pending action, returned by
/// [`PointsLedger::begin_action`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionHandle {
    id: u64,
    identity: Identity,
    kind: ActionKind,
}

impl ActionHandle {
    /// Sequence number of the action.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Wallet the action was started for.
    #[must_use]
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Kind of the action.
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        self.kind
    }
}

/// Summary of an action run through [`PointsLedger::run_action`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport {
    /// Kind of the action.
    pub kind: ActionKind,
    /// What the executor reported.
    pub outcome: Outcome,
    /// Points awarded, zero on failure.
    pub awarded: u64,
    /// Balance after the action.
    pub balance: u64,
}

/// Points balances keyed by wallet.
#[derive(Debug)]
pub struct PointsLedger<P, S> {
    provider: P,
    store: S,
    config: LedgerConfig,
    balances: HashMap<Identity, u64>,
    pending: HashMap<Identity, ActionHandle>,
    next_id: u64,
}

impl<P: IdentityProvider, S: Persistence> PointsLedger<P, S> {
    /// A ledger with the default configuration.
    #[must_use]
    pub fn new(provider: P, store: S) -> Self {
        Self::with_config(provider, store, LedgerConfig::default())
    }

    /// A ledger with `config`.
    #[must_use]
    pub fn with_config(provider: P, store: S, config: LedgerConfig) -> Self {
        Self {
            provider,
            store,
            config,
            balances: HashMap::new(),
            pending: HashMap::new(),
            next_id: 0,
        }
    }

    /// The identity provider.
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Mutable access to the identity provider, e.g. to switch wallets.
    #[must_use]
    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// The connected wallet, if any.
    #[must_use]
    pub fn active_identity(&self) -> Option<Identity> {
        self.provider.current_identity()
    }

    /// Reads the persisted balance of `identity`.
    ///
    /// Missing and unreadable records count as zero.
    #[must_use]
    pub fn load_balance(&self, identity: &Identity) -> u64 {
        let key = self.key(identity);
        let Some(raw) = self.store.get(&key) else {
            return 0;
        };

        raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(%key, value = %raw, "ignoring corrupt balance record");
            0
        })
    }

    /// Balance of `identity` as known to this process.
    ///
    /// Includes awards whose write to storage failed, and awards other
    /// processes persisted since. Balances only grow, so the larger of the
    /// in-memory and persisted value wins.
    #[must_use]
    pub fn balance(&self, identity: &Identity) -> u64 {
        let persisted = self.load_balance(identity);
        self.balances
            .get(identity)
            .map_or(persisted, |&cached| cached.max(persisted))
    }

    /// Adds `amount` points to `identity` and persists the new balance.
    ///
    /// Returns the new balance.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidAmount`] when `amount` is zero.
    /// - [`LedgerError::BalanceOverflow`] when the sum does not fit.
    /// - [`LedgerError::Persistence`] when the write fails. The in-memory
    ///   balance keeps the award; call [`flush`](Self::flush) to retry.
    pub fn award_points(&mut self, identity: &Identity, amount: u64) -> Result<u64, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }

        let balance = self
            .balance(identity)
            .checked_add(amount)
            .ok_or_else(|| LedgerError::BalanceOverflow(identity.clone()))?;

        self.balances.insert(identity.clone(), balance);
        tracing::info!(%identity, amount, balance, "points awarded");

        self.persist(identity, balance)?;
        Ok(balance)
    }

    /// Writes the in-memory balance of `identity` to storage again.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Persistence`] when the write fails.
    pub fn flush(&mut self, identity: &Identity) -> Result<u64, LedgerError> {
        let balance = self.balance(identity);
        self.persist(identity, balance)?;
        Ok(balance)
    }

    /// The pending action of `identity`, if any.
    #[must_use]
    pub fn pending(&self, identity: &Identity) -> Option<&ActionHandle> {
        self.pending.get(identity)
    }

    /// Marks `request` as pending for the connected wallet.
    ///
    /// # Errors
    ///
    /// In order of precedence:
    /// - [`LedgerError::NoIdentity`] when no wallet is connected.
    /// - [`LedgerError::WrongNetwork`] when the wallet is on another network
    ///   than the configured one.
    /// - [`LedgerError::Validation`] when a required field is blank or
    ///   malformed.
    /// - [`LedgerError::ActionInProgress`] when the wallet already has a
    ///   pending action.
    ///
    /// Failures leave balances and pending actions untouched.
    pub fn begin_action(&mut self, request: &ActionRequest) -> Result<ActionHandle, LedgerError> {
        let identity = self
            .provider
            .current_identity()
            .ok_or(LedgerError::NoIdentity)?;

        if let Some(expected) = self.config.required_network() {
            let actual = self.provider.current_network();
            if actual != Some(expected) {
                return Err(LedgerError::WrongNetwork { expected, actual });
            }
        }

        request.validate()?;

        if let Some(pending) = self.pending.get(&identity) {
            return Err(LedgerError::ActionInProgress {
                identity,
                kind: pending.kind,
            });
        }

        self.next_id += 1;
        let handle = ActionHandle {
            id: self.next_id,
            identity: identity.clone(),
            kind: request.kind(),
        };
        self.pending.insert(identity, handle.clone());

        tracing::debug!(
            id = handle.id,
            identity = %handle.identity,
            kind = %handle.kind,
            "action started"
        );
        Ok(handle)
    }

    /// Settles the pending action behind `handle`.
    ///
    /// Returns the points awarded: [`DEFAULT_AWARD`] on success, zero on
    /// failure. Points go to the wallet the action was started for.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::StaleHandle`] when `handle` is not the pending
    ///   action of its wallet. Nothing changes.
    /// - [`LedgerError::Persistence`] when the award could not be written.
    ///   The action is settled and the in-memory balance keeps the award.
    pub fn complete_action(
        &mut self,
        handle: &ActionHandle,
        outcome: &Outcome,
    ) -> Result<u64, LedgerError> {
        if self.pending.get(&handle.identity) != Some(handle) {
            return Err(LedgerError::StaleHandle(handle.id));
        }
        self.pending.remove(&handle.identity);

        match outcome {
            Outcome::Success => {
                self.award_points(&handle.identity, DEFAULT_AWARD)?;
                Ok(DEFAULT_AWARD)
            }
            Outcome::Failure(reason) => {
                tracing::warn!(
                    id = handle.id,
                    identity = %handle.identity,
                    kind = %handle.kind,
                    %reason,
                    "action failed"
                );
                Ok(0)
            }
        }
    }

    /// Runs `request` through `executor` between
    /// [`begin_action`](Self::begin_action) and
    /// [`complete_action`](Self::complete_action).
    ///
    /// # Errors
    ///
    /// Any error of the two calls above. An executor failure is not an
    /// error; it is reported in the returned [`ActionReport`].
    pub async fn run_action<E>(
        &mut self,
        executor: &E,
        request: &ActionRequest,
    ) -> Result<ActionReport, LedgerError>
    where
        E: ActionExecutor + ?Sized,
    {
        let handle = self.begin_action(request)?;
        let outcome = executor.execute(request).await;
        let awarded = self.complete_action(&handle, &outcome)?;

        Ok(ActionReport {
            kind: handle.kind,
            outcome,
            awarded,
            balance: self.balance(&handle.identity),
        })
    }

    fn key(&self, identity: &Identity) -> String {
        storage_key(&self.config.storage_prefix, identity)
    }

    fn persist(&mut self, identity: &Identity, balance: u64) -> Result<(), LedgerError> {
        let key = self.key(identity);
        self.store
            .set(&key, &balance.to_string())
            .map_err(|err| {
                tracing::warn!(%key, balance, error = %err, "balance not persisted");
                LedgerError::from(err)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{identity::NetworkId, store::MemoryStore, WalletSession};

    fn wallet(address: &str) -> Identity {
        address.parse().expect("valid address")
    }

    fn ledger_for(address: &str) -> PointsLedger<WalletSession, MemoryStore> {
        let session = WalletSession::connected(wallet(address), NetworkId::BASE_MAINNET);
        PointsLedger::new(session, MemoryStore::new())
    }

    #[test]
    fn corrupt_record_reads_as_zero() {
        let mut store = MemoryStore::new();
        store.set("base_moon_points_0xabc", "lots").expect("write");
        let ledger = PointsLedger::new(WalletSession::default(), store);

        assert_eq!(ledger.load_balance(&wallet("0xabc")), 0);
    }

    #[test]
    fn zero_award_is_rejected() {
        let mut ledger = ledger_for("0xabc");
        let err = ledger
            .award_points(&wallet("0xabc"), 0)
            .expect_err("zero award");
        assert!(matches!(err, LedgerError::InvalidAmount));
        assert!(ledger.store().is_empty());
    }

    #[test]
    fn overflow_leaves_balance_unchanged() {
        let mut ledger = ledger_for("0xabc");
        let identity = wallet("0xabc");
        ledger.award_points(&identity, u64::MAX).expect("first award");

        let err = ledger.award_points(&identity, 1).expect_err("overflow");
        assert!(matches!(err, LedgerError::BalanceOverflow(_)));
        assert_eq!(ledger.balance(&identity), u64::MAX);
    }

    #[test]
    fn wrong_network_is_rejected_after_identity() {
        let session = WalletSession::connected(wallet("0xabc"), NetworkId(1));
        let mut ledger = PointsLedger::new(session, MemoryStore::new());

        let err = ledger
            .begin_action(&ActionRequest::StorageDeploy)
            .expect_err("wrong network");
        assert!(matches!(
            err,
            LedgerError::WrongNetwork {
                expected: NetworkId::BASE_MAINNET,
                actual: Some(NetworkId(1)),
            }
        ));
        assert!(ledger.pending(&wallet("0xabc")).is_none());
    }

    #[test]
    fn network_check_can_be_disabled() {
        let session = WalletSession::connected(wallet("0xabc"), NetworkId(1));
        let config = LedgerConfig {
            enforce_network: false,
            ..LedgerConfig::default()
        };
        let mut ledger = PointsLedger::with_config(session, MemoryStore::new(), config);

        assert!(ledger.begin_action(&ActionRequest::StorageDeploy).is_ok());
    }

    #[test]
    fn failure_outcome_awards_nothing() {
        let mut ledger = ledger_for("0xabc");
        let handle = ledger
            .begin_action(&ActionRequest::StorageDeploy)
            .expect("begin");

        let awarded = ledger
            .complete_action(&handle, &Outcome::Failure("reverted".to_string()))
            .expect("complete");
        assert_eq!(awarded, 0);
        assert_eq!(ledger.balance(&wallet("0xabc")), 0);
        assert!(ledger.pending(&wallet("0xabc")).is_none());
    }

    #[test]
    fn award_goes_to_wallet_that_started_the_action() {
        let mut ledger = ledger_for("0xaaa");
        let handle = ledger
            .begin_action(&ActionRequest::StorageDeploy)
            .expect("begin");

        ledger
            .provider_mut()
            .connect(wallet("0xbbb"), NetworkId::BASE_MAINNET);
        ledger
            .complete_action(&handle, &Outcome::Success)
            .expect("complete");

        assert_eq!(ledger.balance(&wallet("0xaaa")), 100);
        assert_eq!(ledger.balance(&wallet("0xbbb")), 0);
    }

    #[test]
    fn wallets_have_independent_pending_actions() {
        let mut ledger = ledger_for("0xaaa");
        ledger
            .begin_action(&ActionRequest::StorageDeploy)
            .expect("begin for first wallet");

        ledger
            .provider_mut()
            .connect(wallet("0xbbb"), NetworkId::BASE_MAINNET);
        assert!(ledger.begin_action(&ActionRequest::StorageDeploy).is_ok());
    }

    #[test]
    fn awards_fixed_amount_under_configured_prefix() {
        let session = WalletSession::connected(wallet("0xabc"), NetworkId::BASE_MAINNET);
        let config = LedgerConfig {
            storage_prefix: "moon".to_string(),
            ..LedgerConfig::default()
        };
        let mut ledger = PointsLedger::with_config(session, MemoryStore::new(), config);

        let handle = ledger
            .begin_action(&ActionRequest::StorageDeploy)
            .expect("begin");
        let awarded = ledger
            .complete_action(&handle, &Outcome::Success)
            .expect("complete");

        assert_eq!(awarded, DEFAULT_AWARD);
        assert_eq!(ledger.store().get("moon_0xabc").as_deref(), Some("100"));
    }
}
