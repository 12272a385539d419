use chrono::NaiveDateTime;

use crate::{
    core::{
        battery::{Action, BatteryConfig, BatteryState},
        reading::IntervalReading,
        tariff::TariffPeriod,
    },
    prelude::*,
    quantity::energy::WattHours,
};

/// Sequential battery simulation over the interval stream.
///
/// Each step depends on the level left by the previous one, so the simulator owns the state
/// and advances it exactly once per reading.
#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct Simulator {
    config: BatteryConfig,
    state: BatteryState,
}

impl Simulator {
    pub const fn new(config: BatteryConfig) -> Self {
        Self { state: BatteryState::initial(&config), config }
    }

    /// Start from an arbitrary state instead of the configured initial level.
    #[cfg(test)]
    pub fn with_state(
        config: BatteryConfig,
        state: BatteryState,
    ) -> Result<Self, crate::core::error::LedgerError> {
        config.check_level(state.level)?;
        Ok(Self { config, state })
    }

    pub const fn state(&self) -> BatteryState {
        self.state
    }

    /// Rewind to the configured initial level.
    #[cfg(test)]
    pub const fn reset(&mut self) {
        self.state = BatteryState::initial(&self.config);
    }

    /// Simulate the whole stream, continuing from the current state.
    pub fn run(&mut self, readings: &[IntervalReading]) -> Vec<BatteryInterval> {
        readings.iter().map(|reading| self.step(reading)).collect()
    }

    /// Advance the state by one interval.
    pub fn step(&mut self, reading: &IntervalReading) -> BatteryInterval {
        let action = Action::decide(reading);
        let level_before = self.state.level;
        let mut interval = BatteryInterval {
            timestamp: reading.timestamp,
            period: reading.period(),
            action,
            level_before,
            charge: WattHours::ZERO,
            discharge: WattHours::ZERO,
            solar_charge: WattHours::ZERO,
            grid_charge: WattHours::ZERO,
            stored: WattHours::ZERO,
            delivered: WattHours::ZERO,
            level_after: level_before,
            adjusted_imported: reading.imported,
            adjusted_exported: reading.exported,
        };

        match action {
            Action::SolarCharge { surplus } => {
                let charge =
                    surplus.min(self.state.headroom(&self.config)).min(self.config.charge_limit());
                interval.solar_charge = charge;
                interval.charge = charge;
                interval.stored = self.state.charge(charge, &self.config);
                interval.adjusted_exported = (surplus - charge).max(WattHours::ZERO);
                interval.adjusted_imported = WattHours::ZERO;
            }
            Action::GridCharge => {
                let charge = self.state.headroom(&self.config).min(self.config.charge_limit());
                if !charge.is_positive() {
                    // Already at the ceiling:
                    interval.action = Action::Idle;
                }
                interval.grid_charge = charge;
                interval.charge = charge;
                interval.stored = self.state.charge(charge, &self.config);
                interval.adjusted_exported = WattHours::ZERO;
            }
            Action::Discharge { deficit } => {
                let discharge = deficit
                    .min(self.state.available(&self.config))
                    .min(self.config.discharge_limit());
                interval.discharge = discharge;
                interval.delivered = self.state.discharge(discharge, &self.config);
                interval.adjusted_imported = (deficit - interval.delivered).max(WattHours::ZERO);
                interval.adjusted_exported = WattHours::ZERO;
            }
            Action::Idle => {}
        }

        interval.level_after = self.state.level;
        trace!(
            timestamp = %interval.timestamp,
            action = %interval.action,
            charge = ?interval.charge,
            discharge = ?interval.discharge,
            level = ?interval.level_after,
            "stepped",
        );
        interval
    }
}

/// Simulated battery behaviour during one interval.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BatteryInterval {
    pub timestamp: NaiveDateTime,
    pub period: TariffPeriod,

    /// Decided action, [`Action::Idle`] when an off-peak top-up finds the battery full.
    pub action: Action,
    pub level_before: WattHours,

    /// Energy taken in from outside, before the efficiency loss.
    pub charge: WattHours,

    /// Energy drawn from the cells, before the efficiency loss.
    pub discharge: WattHours,

    pub solar_charge: WattHours,
    pub grid_charge: WattHours,

    /// Part of the charge that reached the cells.
    pub stored: WattHours,

    /// Part of the discharge that reached the house.
    pub delivered: WattHours,

    pub level_after: WattHours,

    /// Grid import remaining after the battery intervention.
    pub adjusted_imported: WattHours,

    /// Grid export remaining after the battery intervention.
    pub adjusted_exported: WattHours,
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    use super::*;
    use crate::{
        core::{error::LedgerError, reading::INTERVAL},
        quantity::power::Watts,
    };

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(hour, 0, 0).unwrap()
    }

    fn reading(timestamp: NaiveDateTime, produced: f64, consumed: f64) -> IntervalReading {
        let net = produced - consumed;
        IntervalReading {
            timestamp,
            produced: WattHours::from(produced),
            consumed: WattHours::from(consumed),
            exported: WattHours::from(net.max(0.0)),
            imported: WattHours::from((-net).max(0.0)),
        }
    }

    fn config(capacity: f64, initial_level: f64, efficiency: f64) -> BatteryConfig {
        BatteryConfig::builder()
            .capacity(WattHours::from(capacity))
            .max_charge_rate(Watts::from(3000.0))
            .max_discharge_rate(Watts::from(1200.0))
            .efficiency(efficiency)
            .discharge_floor(0.1)
            .initial_level(WattHours::from(initial_level))
            .build()
            .unwrap()
    }

    /// Surplus capped by the spare capacity rather than the rate limit.
    #[test]
    fn solar_charge_capped_by_capacity() {
        let mut simulator = Simulator::new(config(1200.0, 600.0, 0.9));
        let interval = simulator.step(&reading(at(12), 1000.0, 400.0));
        assert_eq!(interval.action, Action::SolarCharge { surplus: WattHours::from(600.0) });
        assert_abs_diff_eq!(interval.solar_charge.0, 600.0);
        assert_abs_diff_eq!(interval.charge.0, 600.0);
        assert_abs_diff_eq!(interval.stored.0, 540.0);
        assert_abs_diff_eq!(interval.adjusted_exported.0, 0.0);
        assert_abs_diff_eq!(interval.adjusted_imported.0, 0.0);
        assert_abs_diff_eq!(interval.level_after.0, 600.0 + 600.0 * 0.9);
    }

    /// Surplus capped by the rate limit, the remainder goes to the grid.
    #[test]
    fn solar_charge_capped_by_rate() {
        let mut simulator = Simulator::new(config(10_000.0, 5000.0, 1.0));
        let interval = simulator.step(&reading(at(12), 2000.0, 500.0));
        assert_abs_diff_eq!(interval.solar_charge.0, 750.0);
        assert_abs_diff_eq!(interval.adjusted_exported.0, 750.0);
        assert_abs_diff_eq!(interval.level_after.0, 5750.0);
    }

    /// Deficit capped by the energy above the floor.
    #[test]
    fn discharge_capped_by_floor() {
        // Floor at 50 Wh, discharge limit at 300 Wh:
        let mut simulator = Simulator::new(config(500.0, 100.0, 1.0));
        let interval = simulator.step(&reading(at(19), 0.0, 500.0));
        assert_eq!(interval.action, Action::Discharge { deficit: WattHours::from(500.0) });
        assert_abs_diff_eq!(interval.discharge.0, 50.0);
        assert_abs_diff_eq!(interval.delivered.0, 50.0);
        assert_abs_diff_eq!(interval.adjusted_imported.0, 450.0);
        assert_abs_diff_eq!(interval.level_after.0, 50.0);
    }

    /// Efficiency loss is applied on the release side.
    #[test]
    fn discharge_with_losses() {
        let mut simulator = Simulator::new(config(10_000.0, 5000.0, 0.8));
        let interval = simulator.step(&reading(at(19), 0.0, 200.0));
        assert_abs_diff_eq!(interval.discharge.0, 200.0);
        assert_abs_diff_eq!(interval.delivered.0, 160.0);
        assert_abs_diff_eq!(interval.adjusted_imported.0, 40.0);
        assert_abs_diff_eq!(interval.level_after.0, 4800.0);
    }

    /// Off-peak top-up leaves the house import untouched.
    #[test]
    fn grid_charge_off_peak() {
        let mut simulator = Simulator::new(config(1000.0, 800.0, 0.9));
        let interval = simulator.step(&reading(at(2), 0.0, 0.0));
        assert_eq!(interval.action, Action::GridCharge);
        assert_abs_diff_eq!(interval.grid_charge.0, 200.0);
        assert_abs_diff_eq!(interval.stored.0, 180.0);
        assert_abs_diff_eq!(interval.adjusted_imported.0, 0.0);
        assert_abs_diff_eq!(interval.level_after.0, 980.0);
    }

    /// Full battery during the off-peak window takes nothing from the grid.
    #[test]
    fn grid_charge_at_ceiling_is_idle() {
        let mut simulator = Simulator::new(config(1000.0, 1000.0, 0.9));
        let interval = simulator.step(&reading(at(3), 0.0, 250.0));
        assert_eq!(interval.action, Action::Idle);
        assert_eq!(interval.grid_charge, WattHours::ZERO);
        assert_eq!(interval.stored, WattHours::ZERO);
        assert_abs_diff_eq!(interval.adjusted_imported.0, 250.0);
        assert_eq!(interval.level_after, interval.level_before);
    }

    /// Deficit capped exactly at the rate limit.
    #[test]
    fn discharge_capped_by_rate() {
        // Discharge limit at 1200 W × 15 min = 300 Wh:
        let mut simulator = Simulator::new(config(10_000.0, 5000.0, 1.0));
        let interval = simulator.step(&reading(at(20), 100.0, 1100.0));
        assert_abs_diff_eq!(interval.discharge.0, 300.0);
        assert_abs_diff_eq!(interval.delivered.0, 300.0);
        assert_abs_diff_eq!(interval.adjusted_imported.0, 700.0);
        assert_abs_diff_eq!(interval.level_after.0, 4700.0);
    }

    /// The grid covers whatever the lossy discharge did not deliver.
    #[test]
    fn discharge_capped_by_floor_with_losses() {
        // Floor at 50 Wh:
        let mut simulator = Simulator::new(config(500.0, 100.0, 0.9));
        let interval = simulator.step(&reading(at(19), 0.0, 500.0));
        assert_abs_diff_eq!(interval.discharge.0, 50.0);
        assert_abs_diff_eq!(interval.delivered.0, 45.0, epsilon = 1e-9);
        assert_abs_diff_eq!(interval.adjusted_imported.0, 455.0, epsilon = 1e-9);
        assert_abs_diff_eq!(interval.level_after.0, 50.0);
    }

    #[test]
    fn idle_passes_meters_through() {
        let mut simulator = Simulator::new(config(1000.0, 500.0, 1.0));
        let interval = simulator.step(&reading(at(12), 300.0, 300.0));
        assert_eq!(interval.action, Action::Idle);
        assert_eq!(interval.charge, WattHours::ZERO);
        assert_eq!(interval.discharge, WattHours::ZERO);
        assert_eq!(interval.level_after, interval.level_before);
    }

    /// Walk a few synthetic days and check the invariants on every interval.
    #[test]
    fn invariants_hold_over_days() {
        let config = config(5000.0, 2500.0, 0.9);
        let mut simulator = Simulator::new(config);
        let start = at(0);
        let readings: Vec<_> = (0..96 * 3)
            .map(|i| {
                let timestamp = start + INTERVAL * i;
                let quarter = f64::from(i % 96);
                let produced = (1200.0 - (quarter - 52.0).abs() * 40.0).max(0.0);
                let consumed = 150.0 + f64::from(i % 7) * 60.0;
                reading(timestamp, produced, consumed)
            })
            .collect();
        let mut level = config.initial_level;
        for interval in simulator.run(&readings) {
            assert_eq!(interval.level_before, level);
            assert!(interval.charge == WattHours::ZERO || interval.discharge == WattHours::ZERO);
            assert!(interval.level_after >= config.floor());
            assert!(interval.level_after <= config.ceiling());
            assert!(interval.charge <= config.charge_limit());
            assert!(interval.discharge <= config.discharge_limit());
            assert!(interval.stored <= interval.charge);
            assert!(interval.delivered <= interval.discharge);
            assert_abs_diff_eq!(
                interval.charge.0,
                interval.solar_charge.0 + interval.grid_charge.0,
                epsilon = 1e-9,
            );
            assert_abs_diff_eq!(
                interval.level_after.0,
                interval.level_before.0 + interval.stored.0 - interval.discharge.0,
                epsilon = 1e-9,
            );
            level = interval.level_after;
        }
        assert_eq!(simulator.state().level, level);
    }

    #[test]
    fn reset_restores_initial_level() {
        let mut simulator = Simulator::new(config(1000.0, 500.0, 1.0));
        let interval = simulator.step(&reading(at(12), 800.0, 100.0));
        assert_eq!(interval.level_after, simulator.state().level);
        assert!(simulator.state().level > WattHours::from(500.0));
        simulator.reset();
        assert_eq!(simulator.state().level, WattHours::from(500.0));
    }

    #[test]
    fn injected_state() -> Result<(), LedgerError> {
        let config = config(1000.0, 500.0, 1.0);
        let mut simulator =
            Simulator::with_state(config, BatteryState { level: WattHours::from(900.0) })?;
        let interval = simulator.step(&reading(at(12), 800.0, 100.0));
        assert_abs_diff_eq!(interval.solar_charge.0, 100.0);
        assert!(
            Simulator::with_state(config, BatteryState { level: WattHours::from(10.0) }).is_err()
        );
        Ok(())
    }
}
