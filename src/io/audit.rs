//! Per-interval audit export.

use std::{fs::File, io::Write, path::Path};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::{
    core::{
        battery::BatteryInterval,
        flow::FlowRecord,
        reading::IntervalReading,
        tariff::TariffPeriod,
    },
    prelude::*,
};

/// Flat audit record, energy in watt-hours, unrounded.
#[derive(Serialize)]
struct AuditRow {
    timestamp: NaiveDateTime,
    period: TariffPeriod,
    action: String,
    produced_wh: f64,
    consumed_wh: f64,
    level_before_wh: f64,
    charge_wh: f64,
    discharge_wh: f64,
    solar_charge_wh: f64,
    grid_charge_wh: f64,
    stored_wh: f64,
    delivered_wh: f64,
    level_after_wh: f64,
    adjusted_imported_wh: f64,
    adjusted_exported_wh: f64,
    grid_to_house_wh: f64,
    grid_to_battery_wh: f64,
    solar_to_house_wh: f64,
    battery_to_house_wh: f64,
    solar_to_battery_wh: f64,
    solar_to_grid_wh: f64,
}

impl AuditRow {
    fn new(reading: &IntervalReading, battery: &BatteryInterval, flows: &FlowRecord) -> Self {
        Self {
            timestamp: battery.timestamp,
            period: battery.period,
            action: battery.action.to_string(),
            produced_wh: reading.produced.0,
            consumed_wh: reading.consumed.0,
            level_before_wh: battery.level_before.0,
            charge_wh: battery.charge.0,
            discharge_wh: battery.discharge.0,
            solar_charge_wh: battery.solar_charge.0,
            grid_charge_wh: battery.grid_charge.0,
            stored_wh: battery.stored.0,
            delivered_wh: battery.delivered.0,
            level_after_wh: battery.level_after.0,
            adjusted_imported_wh: battery.adjusted_imported.0,
            adjusted_exported_wh: battery.adjusted_exported.0,
            grid_to_house_wh: flows.grid_to_house.0,
            grid_to_battery_wh: flows.grid_to_battery.0,
            solar_to_house_wh: flows.solar_to_house.0,
            battery_to_house_wh: flows.battery_to_house.0,
            solar_to_battery_wh: flows.solar_to_battery.0,
            solar_to_grid_wh: flows.solar_to_grid.0,
        }
    }
}

pub fn export_path(
    path: &Path,
    readings: &[IntervalReading],
    battery: &[BatteryInterval],
    flows: &[FlowRecord],
) -> Result {
    let file = File::create(path).with_context(|| format!("failed to create `{}`", path.display()))?;
    write(file, readings, battery, flows)?;
    info!(path = %path.display(), n_rows = readings.len(), "exported");
    Ok(())
}

pub fn write(
    writer: impl Write,
    readings: &[IntervalReading],
    battery: &[BatteryInterval],
    flows: &[FlowRecord],
) -> Result {
    ensure!(
        readings.len() == battery.len() && battery.len() == flows.len(),
        "mismatched audit streams",
    );
    let mut writer = csv::Writer::from_writer(writer);
    for ((reading, battery), flows) in readings.iter().zip(battery).zip(flows) {
        writer
            .serialize(AuditRow::new(reading, battery, flows))
            .with_context(|| format!("failed to write the row at {}", reading.timestamp))?;
    }
    writer.flush().context("failed to flush the audit")?;
    Ok(())
}
