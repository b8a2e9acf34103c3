use base_moon::{ActionKind, ConfigError, LedgerError, PersistenceError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Message(String),

    #[error("{kind} deployment failed: {reason}")]
    ActionFailed { kind: ActionKind, reason: String },

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("points store error: {0}")]
    Store(#[from] PersistenceError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
