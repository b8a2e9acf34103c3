use base_moon::IdentityProvider;

use crate::{cli::SessionOptions, error::Result, session, ui};

pub fn run(options: &SessionOptions) -> Result<()> {
    let ledger = session::open(options)?;

    let Some(identity) = ledger.active_identity() else {
        ui::warn("No wallet connected (pass --address or set BASE_MOON_ADDRESS)");
        println!("BM Coins: 0");
        return Ok(());
    };

    if let Some(expected) = ledger.config().required_network() {
        if ledger.provider().current_network() != Some(expected) {
            ui::warn(format!("Please switch to {expected}"));
        }
    }

    println!("Wallet:   {}", identity.short());
    println!("BM Coins: {}", ui::format_points(ledger.balance(&identity)));
    if options.verbose {
        ui::status("Claiming BM coins is not available yet");
    }

    Ok(())
}
