use base_moon::{action::TOKEN_DECIMALS, ActionRequest, LedgerError, Outcome};

use crate::{
    cli::SessionOptions,
    error::{CliError, Result},
    session, ui,
};

pub async fn run(options: &SessionOptions, request: ActionRequest) -> Result<()> {
    let mut ledger = session::open(options)?;
    let executor = session::executor(ledger.config());
    let kind = request.kind();

    ui::status(format!(
        "Deploying {kind} (fee: {}, included in deployment)",
        kind.fee_display()
    ));
    if options.verbose {
        if let Some(supply) = request.token_supply() {
            ui::status(format!("Initial supply {supply} with {TOKEN_DECIMALS} decimals"));
        }
    }

    let result = ledger.run_action(executor.as_ref(), &request).await;
    let report = match result {
        Ok(report) => report,
        Err(LedgerError::Persistence(err)) => {
            // the deployment went through, only the write of the award failed
            ui::success(format!("{kind} deployed"));
            ui::warn(format!(
                "Award could not be saved ({err}); it will be lost on the next run"
            ));
            if let Some(identity) = ledger.active_identity() {
                print_balance(ledger.balance(&identity));
            }
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    match report.outcome {
        Outcome::Success => {
            ui::success(format!(
                "{kind} deployed, earned {} BM coins",
                ui::format_points(report.awarded)
            ));
            print_balance(report.balance);
            Ok(())
        }
        Outcome::Failure(reason) => Err(CliError::ActionFailed { kind, reason }),
    }
}

fn print_balance(balance: u64) {
    println!("BM Coins: {}", ui::format_points(balance));
}
