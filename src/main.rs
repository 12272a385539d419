#![allow(clippy::doc_markdown, clippy::cast_precision_loss)]

mod cli;
mod core;
mod fmt;
mod io;
mod prelude;
mod quantity;
mod tables;

use clap::{Parser, crate_version};

use crate::{
    cli::{Args, Command, audit, tally},
    prelude::*,
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    let args = Args::parse();

    match args.command {
        Command::Tally(args) => tally(&args)?,
        Command::Audit(args) => audit(&args)?,
    }

    info!("done!");
    Ok(())
}
