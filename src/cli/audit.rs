use std::path::PathBuf;

use clap::Parser;

use crate::{
    cli::LedgerArgs,
    core::ledger::Ledger,
    io::{audit::export_path, readings},
    prelude::*,
    tables::build_intervals_table,
};

#[derive(Parser)]
pub struct AuditArgs {
    #[clap(flatten)]
    pub ledger: LedgerArgs,

    /// Write the intervals to the CSV file instead of printing them.
    #[clap(long = "output", env = "AUDIT_OUTPUT_PATH")]
    pub output_path: Option<PathBuf>,
}

#[instrument(skip_all)]
pub fn audit(args: &AuditArgs) -> Result {
    let battery = args.ledger.battery.config()?;
    let tariff = args.ledger.tariff.tariff()?;
    let readings = readings::read_path(&args.ledger.readings_path)?;
    let ledger = Ledger::try_compute(&readings, battery, &tariff)?;
    match &args.output_path {
        Some(path) => export_path(path, &readings, &ledger.battery, &ledger.flows)?,
        None => println!("{}", build_intervals_table(&ledger.battery, &ledger.flows)),
    }
    Ok(())
}
