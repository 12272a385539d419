use itertools::Itertools;

use crate::{
    core::{
        error::LedgerError,
        reading::{INTERVAL, IntervalReading},
    },
    prelude::*,
    quantity::{Quantity, energy::WattHours},
};

/// Meter disagreement below this amount is rounding noise.
pub const METER_TOLERANCE: WattHours = Quantity(0.5);

/// Validate the values and the strict 15-minute cadence of the reading stream.
///
/// Returns the number of readings whose grid meters disagree with the derived surplus or deficit.
/// Those are accepted, but the conservation laws only hold for meter-consistent readings.
#[instrument(skip_all)]
pub fn validate(readings: &[IntervalReading]) -> Result<usize, LedgerError> {
    for reading in readings {
        reading.validate()?;
    }
    for (previous, next) in readings.iter().tuple_windows() {
        let step = next.timestamp - previous.timestamp;
        if step != INTERVAL {
            let reason = if step <= chrono::TimeDelta::zero() {
                format!("not after the previous timestamp {}", previous.timestamp)
            } else {
                format!("{} minutes after the previous timestamp {}", step.num_minutes(), previous.timestamp)
            };
            return Err(LedgerError::data(next.timestamp, "timestamp", reason));
        }
    }
    let n_inconsistent = readings
        .iter()
        .filter(|reading| !reading.is_meter_consistent(METER_TOLERANCE))
        .inspect(|reading| {
            trace!(
                timestamp = %reading.timestamp,
                net = ?reading.net_energy(),
                imported = ?reading.imported,
                exported = ?reading.exported,
                "meter values disagree",
            );
        })
        .count();
    if n_inconsistent != 0 {
        warn!(n_inconsistent, n_readings = readings.len(), "grid meters disagree with the derived net energy");
    }
    debug!(n_readings = readings.len(), "validated");
    Ok(n_inconsistent)
}
