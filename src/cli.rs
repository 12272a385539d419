mod audit;
mod battery;
mod tally;
mod tariff;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use self::{audit::audit, tally::tally};
use crate::cli::{audit::AuditArgs, battery::BatteryArgs, tally::TallyArgs, tariff::TariffArgs};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Simulate the battery and print the cost report.
    #[clap(name = "tally")]
    Tally(Box<TallyArgs>),

    /// Simulate the battery and show or export every interval.
    #[clap(name = "audit")]
    Audit(Box<AuditArgs>),
}

/// Everything needed to compute the ledger.
#[derive(Parser)]
pub struct LedgerArgs {
    /// CSV with `timestamp,produced_wh,consumed_wh,exported_wh,imported_wh` columns.
    #[clap(long = "readings", env = "READINGS_PATH")]
    pub readings_path: PathBuf,

    #[clap(flatten)]
    pub battery: BatteryArgs,

    #[clap(flatten)]
    pub tariff: TariffArgs,
}
