mod antecedent_cmd;
mod cli;
mod config;
mod convert;
mod describe_cmd;
mod inputs;
mod logging;
mod logp_cmd;
mod simulate_cmd;
mod weights_cmd;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Weights(args) => weights_cmd::run(args),
        Command::Antecedent(args) => antecedent_cmd::run(args),
        Command::Describe(args) => describe_cmd::run(args),
        Command::Simulate(args) => simulate_cmd::run(args),
        Command::Logp(args) => logp_cmd::run(args),
    }
}
