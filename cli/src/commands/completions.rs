use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::generate;

use crate::{
    cli::{Cli, CompletionsArgs},
    error::Result,
};

pub fn run(args: CompletionsArgs) -> Result<()> {
    let mut command = Cli::command();
    let bin_name = command.get_name().to_string();

    let mut stdout = io::stdout().lock();
    generate(args.shell, &mut command, bin_name, &mut stdout);
    stdout.flush()?;
    Ok(())
}
