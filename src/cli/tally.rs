use clap::Parser;

use crate::{cli::LedgerArgs, core::ledger::Ledger, io::readings, prelude::*};

#[derive(Parser)]
pub struct TallyArgs {
    #[clap(flatten)]
    pub ledger: LedgerArgs,

    /// Report format.
    #[clap(long, env = "REPORT_FORMAT", default_value = "table")]
    pub format: Format,
}

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
pub enum Format {
    /// Human-readable table, rounded.
    Table,

    /// Machine-readable JSON, unrounded.
    Json,
}

#[instrument(skip_all)]
pub fn tally(args: &TallyArgs) -> Result {
    let battery = args.ledger.battery.config()?;
    let tariff = args.ledger.tariff.tariff()?;
    let readings = readings::read_path(&args.ledger.readings_path)?;
    let ledger = Ledger::try_compute(&readings, battery, &tariff)?;
    match args.format {
        Format::Table => println!("{}", ledger.report),
        Format::Json => {
            println!("{}", serde_json::to_string_pretty(&ledger.report.summary())?);
        }
    }
    Ok(())
}
