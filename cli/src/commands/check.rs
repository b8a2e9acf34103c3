use base_moon::{FileStore, IdentityProvider, LedgerConfig};

use crate::{
    cli::SessionOptions,
    error::{CliError, Result},
    session, ui,
};

pub fn run(options: &SessionOptions) -> Result<()> {
    ui::status(format!("Checking setup in {}", options.config.display()));

    let mut failures = 0;

    let config = match LedgerConfig::load(&options.config) {
        Ok(config) => {
            record("config is valid", true, &mut failures);
            config
        }
        Err(err) => {
            record(&format!("config is valid ({err})"), false, &mut failures);
            LedgerConfig::default()
        }
    };

    match FileStore::open(&options.store) {
        Ok(store) => record(
            &format!("points store readable at {}", store.path().display()),
            true,
            &mut failures,
        ),
        Err(err) => record(
            &format!("points store readable ({err})"),
            false,
            &mut failures,
        ),
    }

    let wallet = session::wallet(options)?;
    record("wallet connected", wallet.is_connected(), &mut failures);

    match config.required_network() {
        Some(expected) => record(
            &format!("wallet on {expected}"),
            wallet.current_network() == Some(expected),
            &mut failures,
        ),
        None => ui::warn("network check disabled in config"),
    }

    if let Some(deadline) = config.action_timeout() {
        ui::success(format!("actions time out after {deadline:?}"));
    }

    if failures > 0 {
        return Err(CliError::Message(format!(
            "check failed with {failures} issue(s)"
        )));
    }

    ui::success("All checks passed");
    Ok(())
}

fn record(name: &str, ok: bool, failures: &mut usize) {
    if ok {
        ui::success(name);
    } else {
        *failures += 1;
        ui::error(name);
    }
}
