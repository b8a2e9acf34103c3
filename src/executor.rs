// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::time::Duration;

use async_trait::async_trait;

use crate::action::ActionRequest;

/// Result of executing an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The action went through.
    Success,
    /// The action failed for the given reason.
    Failure(String),
}

impl Outcome {
    /// Whether this is [`Outcome::Success`].
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Carries out an action, e.g. by deploying a contract.
///
/// The ledger behaves the same whichever executor is used.
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    /// Executes `request` and reports how it went.
    async fn execute(&self, request: &ActionRequest) -> Outcome;
}

/// Executor that waits a fixed delay instead of talking to a chain.
#[derive(Debug, Clone)]
pub struct SimulatedExecutor {
    delay: Duration,
    failure: Option<String>,
}

impl SimulatedExecutor {
    /// Default simulated deployment time.
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(2_000);

    /// Succeeds after `delay`.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            failure: None,
        }
    }

    /// Fails with `reason` after the delay instead of succeeding.
    #[must_use]
    pub fn failing(mut self, reason: impl Into<String>) -> Self {
        self.failure = Some(reason.into());
        self
    }
}

impl Default for SimulatedExecutor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

#[async_trait]
impl ActionExecutor for SimulatedExecutor {
    async fn execute(&self, request: &ActionRequest) -> Outcome {
        tracing::debug!(kind = %request.kind(), delay = ?self.delay, "simulating deployment");
        tokio::time::sleep(self.delay).await;

        match &self.failure {
            Some(reason) => Outcome::Failure(reason.clone()),
            None => Outcome::Success,
        }
    }
}

/// Forces a failure when the inner executor does not resolve in time.
#[derive(Debug, Clone)]
pub struct Timeout<E> {
    inner: E,
    deadline: Duration,
}

impl<E> Timeout<E> {
    /// Wraps `inner` with `deadline`.
    #[must_use]
    pub fn new(inner: E, deadline: Duration) -> Self {
        Self { inner, deadline }
    }
}

#[async_trait]
impl<E: ActionExecutor> ActionExecutor for Timeout<E> {
    async fn execute(&self, request: &ActionRequest) -> Outcome {
        match tokio::time::timeout(self.deadline, self.inner.execute(request)).await {
            Ok(outcome) => outcome,
            Err(_) => Outcome::Failure(format!(
                "timed out after {} ms",
                self.deadline.as_millis()
            )),
        }
    }
}
