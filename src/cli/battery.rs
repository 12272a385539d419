//! Battery-related CLI arguments.

use clap::Parser;

use crate::{
    core::battery::BatteryConfig,
    prelude::*,
    quantity::{energy::WattHours, power::Watts},
};

#[must_use]
#[derive(Copy, Clone, Parser)]
pub struct BatteryArgs {
    /// Usable battery capacity in watt-hours.
    #[clap(long = "capacity-wh", env = "CAPACITY_WH")]
    pub capacity: WattHours,

    /// Charging power in watts.
    #[clap(long = "max-charge-rate-w", env = "MAX_CHARGE_RATE_W")]
    pub max_charge_rate: Watts,

    /// Discharging power in watts.
    #[clap(long = "max-discharge-rate-w", env = "MAX_DISCHARGE_RATE_W")]
    pub max_discharge_rate: Watts,

    /// One-leg efficiency, applied when storing and again when releasing, `(0, 1]`.
    #[clap(long = "efficiency-pc", env = "EFFICIENCY_PC")]
    pub efficiency: f64,

    /// Minimal state-of-charge fraction, `[0, 1)`.
    #[clap(long = "discharge-floor-pc", env = "DISCHARGE_FLOOR_PC")]
    pub discharge_floor: f64,

    /// Maximal state-of-charge fraction, `(0, 1]`.
    #[clap(long = "charge-ceiling-pc", env = "CHARGE_CEILING_PC", default_value = "1.0")]
    pub charge_ceiling: f64,

    /// Battery level at the start of the readings, in watt-hours.
    #[clap(long = "initial-level-wh", env = "INITIAL_LEVEL_WH")]
    pub initial_level: WattHours,
}

impl BatteryArgs {
    pub fn config(self) -> Result<BatteryConfig> {
        let config = BatteryConfig::builder()
            .capacity(self.capacity)
            .max_charge_rate(self.max_charge_rate)
            .max_discharge_rate(self.max_discharge_rate)
            .efficiency(self.efficiency)
            .discharge_floor(self.discharge_floor)
            .charge_ceiling(self.charge_ceiling)
            .initial_level(self.initial_level)
            .build()
            .context("invalid battery settings")?;
        debug!(
            floor = ?config.floor(),
            ceiling = ?config.ceiling(),
            charge_limit = ?config.charge_limit(),
            discharge_limit = ?config.discharge_limit(),
            "battery",
        );
        Ok(config)
    }
}
