use std::fmt::{Display, Formatter};

use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use derive_more::{Add, AddAssign};
use serde::Serialize;

use crate::{
    core::{
        flow::{FlowCategory, FlowRecord, Flows},
        reading::IntervalReading,
        tariff::{Tariff, TariffPeriod},
    },
    fmt::FormattedKilowattHours,
    quantity::{cost::Cost, energy::WattHours},
};

/// Something split by the tariff period.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq, Add, AddAssign)]
pub struct ByPeriod<T> {
    pub peak: T,
    pub off_peak: T,
}

impl<T> ByPeriod<T> {
    pub const fn get_mut(&mut self, period: TariffPeriod) -> &mut T {
        match period {
            TariffPeriod::Peak => &mut self.peak,
            TariffPeriod::OffPeak => &mut self.off_peak,
        }
    }
}

impl<T: Copy + std::ops::Add<Output = T>> ByPeriod<T> {
    pub fn total(&self) -> T {
        self.peak + self.off_peak
    }
}

/// Summed energy and its price.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq, Add, AddAssign)]
pub struct Tally {
    pub energy: WattHours,
    pub cost: Cost,
}

/// Priced flow totals over the whole run.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CostReport {
    pub n_intervals: usize,
    pub flows: Flows<ByPeriod<Tally>>,

    /// Consumption as if it were all bought from the grid.
    pub baseline: ByPeriod<Tally>,

    pub subscription_fee: Cost,
}

impl CostReport {
    /// Price the flows of every interval and sum them up.
    pub fn aggregate<'a>(
        intervals: impl IntoIterator<Item = (&'a IntervalReading, &'a FlowRecord)>,
        tariff: &Tariff,
    ) -> Self {
        let mut this = Self::default();
        for (reading, flows) in intervals {
            this.add(reading, flows, tariff);
        }
        this.subscription_fee = tariff.subscription_fee(this.n_intervals);
        this
    }

    fn add(&mut self, reading: &IntervalReading, flows: &FlowRecord, tariff: &Tariff) {
        let period = reading.period();
        for (category, energy) in flows.iter() {
            *self.flows.get_mut(category).get_mut(period) +=
                Tally { energy: *energy, cost: tariff.price(category, *energy, period) };
        }
        *self.baseline.get_mut(period) += Tally {
            energy: reading.consumed,
            cost: reading.consumed * tariff.purchase_rate(period),
        };
        self.n_intervals += 1;
    }

    /// Category total over both periods.
    pub fn tally(&self, category: FlowCategory) -> Tally {
        self.flows.get(category).total()
    }

    pub fn solar_savings(&self) -> Cost {
        self.tally(FlowCategory::SolarToHouse).cost + self.tally(FlowCategory::SolarToGrid).cost
    }

    pub fn battery_savings(&self) -> Cost {
        self.tally(FlowCategory::BatteryToHouse).cost
    }

    pub fn all_savings(&self) -> Cost {
        self.solar_savings() + self.battery_savings()
    }

    pub fn total_cost(&self) -> Cost {
        FlowCategory::all().iter().map(|category| self.tally(category).cost).sum::<Cost>()
            + self.subscription_fee
    }

    pub fn baseline_cost(&self) -> Cost {
        self.baseline.total().cost + self.subscription_fee
    }

    pub fn baseline_savings_realized(&self) -> Cost {
        self.baseline_cost() - self.total_cost()
    }

    /// Money actually exchanged with the grid operator.
    pub fn net_bill(&self) -> Cost {
        self.tally(FlowCategory::GridToHouse).cost
            + self.tally(FlowCategory::GridToBattery).cost
            + self.tally(FlowCategory::SolarToGrid).cost
            + self.subscription_fee
    }

    /// Category rows, split by period where the price depends on it.
    pub fn rows(&self) -> Vec<ReportRow> {
        let mut rows = Vec::new();
        for category in FlowCategory::all() {
            let by_period = self.flows.get(category);
            if category.is_period_sensitive() {
                rows.push(ReportRow::new(category, Some(TariffPeriod::Peak), by_period.peak));
                rows.push(ReportRow::new(category, Some(TariffPeriod::OffPeak), by_period.off_peak));
            } else {
                rows.push(ReportRow::new(category, None, by_period.total()));
            }
        }
        rows
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            n_intervals: self.n_intervals,
            rows: self.rows(),
            subscription_fee_eur: self.subscription_fee.0,
            solar_savings_eur: self.solar_savings().0,
            battery_savings_eur: self.battery_savings().0,
            all_savings_eur: self.all_savings().0,
            total_cost_eur: self.total_cost().0,
            baseline_cost_eur: self.baseline_cost().0,
            baseline_savings_realized_eur: self.baseline_savings_realized().0,
            net_bill_eur: self.net_bill().0,
        }
    }
}

impl Display for CostReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL_CONDENSED)
            .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
            .enforce_styling()
            .set_header(vec!["Flow", "Period", "Energy", "Cost"]);
        for row in self.rows() {
            table.add_row(vec![
                Cell::new(row.category),
                row.period.map_or_else(
                    || Cell::new("Any").add_attribute(Attribute::Dim),
                    |period| Cell::new(period).fg(period.color()),
                ),
                Cell::new(FormattedKilowattHours(row.kwh)).set_alignment(CellAlignment::Right),
                Cell::new(Cost::from(row.cost_eur))
                    .set_alignment(CellAlignment::Right)
                    .fg(if row.cost_eur > 0.0 { Color::Red } else { Color::Green }),
            ]);
        }
        for (label, cost) in [
            ("Subscription fee", self.subscription_fee),
            ("Solar savings", self.solar_savings()),
            ("Battery savings", self.battery_savings()),
            ("All savings", self.all_savings()),
            ("Total cost", self.total_cost()),
            ("Baseline cost", self.baseline_cost()),
            ("Net bill", self.net_bill()),
        ] {
            table.add_row(vec![
                Cell::new(label).add_attribute(Attribute::Bold),
                Cell::new(""),
                Cell::new(""),
                Cell::new(cost).set_alignment(CellAlignment::Right),
            ]);
        }
        let realized = self.baseline_savings_realized();
        table.add_row(vec![
            Cell::new("Realized savings").add_attribute(Attribute::Bold),
            Cell::new(format!("{} intervals", self.n_intervals)).add_attribute(Attribute::Dim),
            Cell::new(""),
            Cell::new(realized)
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Bold)
                .fg(if realized >= Cost::ZERO { Color::Green } else { Color::Red }),
        ]);
        write!(f, "{table}")
    }
}

/// One category row of the report, energy in kilowatt-hours.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct ReportRow {
    pub category: FlowCategory,
    pub period: Option<TariffPeriod>,
    pub kwh: f64,
    pub cost_eur: f64,
}

impl ReportRow {
    const fn new(category: FlowCategory, period: Option<TariffPeriod>, tally: Tally) -> Self {
        Self { category, period, kwh: tally.energy.to_kilowatt_hours(), cost_eur: tally.cost.0 }
    }
}

/// Machine-readable report.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportSummary {
    pub n_intervals: usize,
    pub rows: Vec<ReportRow>,
    pub subscription_fee_eur: f64,
    pub solar_savings_eur: f64,
    pub battery_savings_eur: f64,
    pub all_savings_eur: f64,
    pub total_cost_eur: f64,
    pub baseline_cost_eur: f64,
    pub baseline_savings_realized_eur: f64,
    pub net_bill_eur: f64,
}
