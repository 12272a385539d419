use crate::{
    core::{
        battery::{BatteryConfig, BatteryInterval, Simulator},
        cost::CostReport,
        error::LedgerError,
        flow::FlowRecord,
        reading::IntervalReading,
        series::{self, METER_TOLERANCE},
        tariff::Tariff,
    },
    fmt::FormattedPercentage,
    prelude::*,
    quantity::energy::WattHours,
};

/// Complete account of one run: battery behaviour, flows and their costs.
#[must_use]
pub struct Ledger {
    pub config: BatteryConfig,
    pub battery: Vec<BatteryInterval>,
    pub flows: Vec<FlowRecord>,
    pub report: CostReport,
}

impl Ledger {
    /// Validate the readings, simulate the battery, decompose and price the flows.
    #[instrument(skip_all, fields(n_readings = readings.len()))]
    pub fn try_compute(
        readings: &[IntervalReading],
        config: BatteryConfig,
        tariff: &Tariff,
    ) -> Result<Self, LedgerError> {
        series::validate(readings)?;

        let mut simulator = Simulator::new(config);
        let battery = simulator.run(readings);
        debug!(level = ?simulator.state().level, "simulator finished");

        let flows: Vec<_> = readings
            .iter()
            .zip(&battery)
            .map(|(reading, interval)| FlowRecord::decompose(reading, interval))
            .collect();
        for (reading, flows) in readings.iter().zip(&flows) {
            if reading.is_meter_consistent(METER_TOLERANCE) {
                debug_assert!(
                    (flows.produced() - reading.produced).0.abs() <= METER_TOLERANCE.0
                        && (flows.consumed() - reading.consumed).0.abs() <= METER_TOLERANCE.0,
                    "flows at {} do not add up to the readings",
                    reading.timestamp,
                );
            }
        }
        let report = CostReport::aggregate(readings.iter().zip(&flows), tariff);

        let this = Self { config, battery, flows, report };
        let activity = this.activity();
        info!(
            final_level = ?activity.final_level,
            total_stored = ?activity.total_stored,
            total_delivered = ?activity.total_delivered,
            equivalent_full_cycles = activity.equivalent_full_cycles,
            "simulated the battery",
        );
        info!(
            total_cost = ?this.report.total_cost(),
            baseline_cost = ?this.report.baseline_cost(),
            realized = ?FormattedPercentage(this.realized_fraction()),
            "priced the flows",
        );
        Ok(this)
    }

    pub fn activity(&self) -> BatteryActivity {
        let total_stored = self.battery.iter().map(|interval| interval.stored).sum::<WattHours>();
        let total_discharged =
            self.battery.iter().map(|interval| interval.discharge).sum::<WattHours>();
        BatteryActivity {
            final_level: self
                .battery
                .last()
                .map_or(self.config.initial_level, |interval| interval.level_after),
            total_stored,
            total_delivered: self.battery.iter().map(|interval| interval.delivered).sum(),
            equivalent_full_cycles: total_discharged / self.config.capacity,
        }
    }

    /// Realized savings relative to the baseline cost.
    fn realized_fraction(&self) -> f64 {
        let baseline_cost = self.report.baseline_cost();
        if baseline_cost.is_positive() {
            self.report.baseline_savings_realized() / baseline_cost
        } else {
            0.0
        }
    }
}

/// Battery usage totals over the run.
#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct BatteryActivity {
    pub final_level: WattHours,

    /// Energy that reached the cells.
    pub total_stored: WattHours,

    /// Energy the battery delivered to the house.
    pub total_delivered: WattHours,

    /// Drawn energy expressed in full capacities.
    pub equivalent_full_cycles: f64,
}
