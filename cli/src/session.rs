use base_moon::{
    ActionExecutor, FileStore, Identity, LedgerConfig, NetworkId, PointsLedger,
    SimulatedExecutor, Timeout, WalletSession,
};

use crate::{cli::SessionOptions, error::Result, ui};

pub type Ledger = PointsLedger<WalletSession, FileStore>;

pub fn open(options: &SessionOptions) -> Result<Ledger> {
    let config = LedgerConfig::load(&options.config)?;
    let store = FileStore::open(&options.store)?;
    let wallet = wallet(options)?;

    if options.verbose {
        ui::status(format!("Using points store {}", store.path().display()));
    }

    Ok(PointsLedger::with_config(wallet, store, config))
}

pub fn wallet(options: &SessionOptions) -> Result<WalletSession> {
    let mut wallet = WalletSession::default();

    if let Some(address) = &options.address {
        let identity: Identity = address.parse()?;
        wallet.connect(identity, NetworkId(options.chain_id));
    }

    Ok(wallet)
}

pub fn executor(config: &LedgerConfig) -> Box<dyn ActionExecutor> {
    let simulated = SimulatedExecutor::new(config.simulated_delay());

    match config.action_timeout() {
        Some(deadline) => Box::new(Timeout::new(simulated, deadline)),
        None => Box::new(simulated),
    }
}
