//! Canonical interval CSV: `timestamp,produced_wh,consumed_wh,exported_wh,imported_wh`.

use std::{fs::File, io::Read, path::Path};

use crate::{
    core::reading::{IntervalReading, ReadingRecord},
    prelude::*,
};

#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_path(path: &Path) -> Result<Vec<IntervalReading>> {
    let file = File::open(path).with_context(|| format!("failed to open `{}`", path.display()))?;
    let readings = read(file)?;
    info!(n_readings = readings.len(), "loaded");
    Ok(readings)
}

pub fn read(reader: impl Read) -> Result<Vec<IntervalReading>> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .into_deserialize::<ReadingRecord>()
        .enumerate()
        .map(|(index, record)| {
            // Header is line 1:
            let line = index + 2;
            let record = record.with_context(|| format!("failed to parse line {line}"))?;
            IntervalReading::try_from(record).with_context(|| format!("invalid line {line}"))
        })
        .collect()
}
