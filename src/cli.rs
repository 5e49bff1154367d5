use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Stochastic antecedent modeling of ANPP.
#[derive(Parser)]
#[command(
    name = "sam",
    version,
    about = "Stochastic antecedent precipitation model (Ogle et al. 2015)"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Compute normalized monthly weights from raw block weights.
    Weights(WeightsArgs),
    /// Compute antecedent precipitation for every eligible year.
    Antecedent(AntecedentArgs),
    /// Print the model graph and the flat parameter layout.
    Describe(ModelArgs),
    /// Draw prior-predictive samples and summarize them.
    Simulate(SimulateArgs),
    /// Evaluate the joint log density at a parameter point.
    Logp(LogpArgs),
}

/// Arguments for the `weights` subcommand.
#[derive(clap::Args)]
pub struct WeightsArgs {
    /// Path to TOML configuration file (defaults apply when omitted).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// JSON array of raw block weights (all ones when omitted).
    #[arg(short, long)]
    pub raw: Option<PathBuf>,

    /// Output JSON path (stdout when omitted).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `antecedent` subcommand.
#[derive(clap::Args)]
pub struct AntecedentArgs {
    /// Path to TOML configuration file (defaults apply when omitted).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Monthly precipitation table.
    #[arg(short, long)]
    pub precip: PathBuf,

    /// JSON array of raw block weights (all ones when omitted).
    #[arg(short, long)]
    pub raw: Option<PathBuf>,

    /// Output JSON path (stdout when omitted).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Inputs needed to assemble the model.
#[derive(clap::Args)]
pub struct ModelArgs {
    /// Path to TOML configuration file (defaults apply when omitted).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Monthly precipitation table.
    #[arg(short, long)]
    pub precip: PathBuf,

    /// ANPP and event-size table.
    #[arg(short, long)]
    pub data: PathBuf,
}

/// Arguments for the `simulate` subcommand.
#[derive(clap::Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Override number of draws from config.
    #[arg(short = 'n', long)]
    pub draws: Option<usize>,

    /// Override global RNG seed from config.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Output JSON path (stdout when omitted).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `logp` subcommand.
#[derive(clap::Args)]
pub struct LogpArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// JSON parameter point, either named or a flat array (initial point
    /// when omitted).
    #[arg(long)]
    pub params: Option<PathBuf>,
}
