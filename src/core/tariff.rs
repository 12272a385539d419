use std::fmt::{Display, Formatter};

use bon::bon;
use chrono::{NaiveDateTime, NaiveTime, Timelike};
use comfy_table::Color;
use serde::Serialize;

use crate::{
    core::{error::LedgerError, flow::FlowCategory},
    quantity::{cost::Cost, energy::WattHours, rate::WattHourRate},
};

/// Average number of 15-minute intervals in a month, `96 × 365 / 12`.
pub const INTERVALS_PER_MONTH: f64 = 2920.0;

/// Off-peak window start, inclusive.
const OFF_PEAK_START_HOUR: u32 = 23;

/// Off-peak window end, exclusive.
const OFF_PEAK_END_HOUR: u32 = 7;

#[derive(Debug, Serialize, enumset::EnumSetType)]
#[serde(rename_all = "kebab-case")]
pub enum TariffPeriod {
    /// Daytime full price, 07:00 till 23:00.
    Peak,

    /// Night-time reduced price, 23:00 till 07:00.
    OffPeak,
}

impl TariffPeriod {
    /// Classify the local wall-clock timestamp.
    pub fn of(timestamp: NaiveDateTime) -> Self {
        Self::at(timestamp.time())
    }

    pub fn at(time: NaiveTime) -> Self {
        let hour = time.hour();
        if hour >= OFF_PEAK_START_HOUR || hour < OFF_PEAK_END_HOUR {
            Self::OffPeak
        } else {
            Self::Peak
        }
    }

    #[must_use]
    pub const fn is_off_peak(self) -> bool {
        matches!(self, Self::OffPeak)
    }

    pub const fn color(self) -> Color {
        match self {
            Self::Peak => Color::Red,
            Self::OffPeak => Color::Green,
        }
    }
}

impl Display for TariffPeriod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Peak => write!(f, "Peak"),
            Self::OffPeak => write!(f, "Off-peak"),
        }
    }
}

/// Time-of-use tariff.
#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct Tariff {
    /// Grid purchase price during [`TariffPeriod::Peak`].
    pub high: WattHourRate,

    /// Grid purchase price during [`TariffPeriod::OffPeak`].
    pub low: WattHourRate,

    /// Feed-in price for exported energy.
    pub sale: WattHourRate,

    pub subscription_fee_per_month: Cost,
}

#[bon]
impl Tariff {
    #[builder]
    pub fn new(
        high: WattHourRate,
        low: WattHourRate,
        sale: WattHourRate,
        subscription_fee_per_month: Cost,
    ) -> Result<Self, LedgerError> {
        for (field, value) in [
            ("price_high_eur_per_wh", high.0),
            ("price_low_eur_per_wh", low.0),
            ("price_sale_eur_per_wh", sale.0),
            ("subscription_fee_eur_per_month", subscription_fee_per_month.0),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(LedgerError::config(field, format!("expected a non-negative number, got {value}")));
            }
        }
        Ok(Self { high, low, sale, subscription_fee_per_month })
    }
}

impl Tariff {
    /// Grid purchase price in the period.
    pub const fn purchase_rate(&self, period: TariffPeriod) -> WattHourRate {
        match period {
            TariffPeriod::Peak => self.high,
            TariffPeriod::OffPeak => self.low,
        }
    }

    /// Price the category energy, solar flows are credited with a negative cost.
    pub fn price(&self, category: FlowCategory, energy: WattHours, period: TariffPeriod) -> Cost {
        match category {
            FlowCategory::GridToHouse | FlowCategory::BatteryToHouse => {
                energy * self.purchase_rate(period)
            }
            FlowCategory::GridToBattery => energy * self.low,
            FlowCategory::SolarToHouse => -(energy * self.purchase_rate(period)),
            FlowCategory::SolarToGrid | FlowCategory::SolarToBattery => -(energy * self.sale),
        }
    }

    /// Pro-rated subscription fee for the number of intervals.
    pub fn subscription_fee(&self, n_intervals: usize) -> Cost {
        self.subscription_fee_per_month * (n_intervals as f64 / INTERVALS_PER_MONTH)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    use super::*;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn test_window_bounds() {
        assert_eq!(TariffPeriod::of(at(22, 45)), TariffPeriod::Peak);
        assert_eq!(TariffPeriod::of(at(23, 0)), TariffPeriod::OffPeak);
        assert_eq!(TariffPeriod::of(at(0, 0)), TariffPeriod::OffPeak);
        assert_eq!(TariffPeriod::of(at(6, 45)), TariffPeriod::OffPeak);
        assert_eq!(TariffPeriod::of(at(7, 0)), TariffPeriod::Peak);
        assert_eq!(TariffPeriod::of(at(12, 30)), TariffPeriod::Peak);
    }

    #[test]
    fn test_off_peak_quarter_count() {
        let n_off_peak = (0..96)
            .map(|quarter| at(quarter / 4, (quarter % 4) * 15))
            .filter(|timestamp| TariffPeriod::of(*timestamp).is_off_peak())
            .count();
        assert_eq!(n_off_peak, 8 * 4);
    }

    fn tariff() -> Tariff {
        Tariff::builder()
            .high(WattHourRate::from(0.000_25))
            .low(WattHourRate::from(0.000_18))
            .sale(WattHourRate::from(0.000_13))
            .subscription_fee_per_month(Cost::from(15.0))
            .build()
            .unwrap()
    }

    #[test]
    fn test_purchase_rate() {
        let tariff = tariff();
        assert_eq!(tariff.purchase_rate(TariffPeriod::Peak), tariff.high);
        assert_eq!(tariff.purchase_rate(TariffPeriod::OffPeak), tariff.low);
    }

    #[test]
    fn test_price() {
        let tariff = tariff();
        let energy = WattHours::from(1000.0);
        let price = |category| {
            (
                tariff.price(category, energy, TariffPeriod::Peak).0,
                tariff.price(category, energy, TariffPeriod::OffPeak).0,
            )
        };
        assert_abs_diff_eq!(price(FlowCategory::GridToHouse).0, 0.25);
        assert_abs_diff_eq!(price(FlowCategory::GridToHouse).1, 0.18);
        assert_abs_diff_eq!(price(FlowCategory::BatteryToHouse).0, 0.25);
        assert_abs_diff_eq!(price(FlowCategory::GridToBattery).0, 0.18);
        assert_abs_diff_eq!(price(FlowCategory::GridToBattery).1, 0.18);
        assert_abs_diff_eq!(price(FlowCategory::SolarToHouse).0, -0.25);
        assert_abs_diff_eq!(price(FlowCategory::SolarToHouse).1, -0.18);
        assert_abs_diff_eq!(price(FlowCategory::SolarToGrid).1, -0.13);
        assert_abs_diff_eq!(price(FlowCategory::SolarToBattery).0, -0.13);
    }

    #[test]
    fn test_subscription_fee() {
        let tariff = tariff();
        assert_abs_diff_eq!(tariff.subscription_fee(2920).0, 15.0);
        assert_abs_diff_eq!(tariff.subscription_fee(96).0, 15.0 * 12.0 / 365.0, epsilon = 1e-12);
        assert_eq!(tariff.subscription_fee(0), Cost::ZERO);
    }

    #[test]
    fn test_negative_price_rejected() {
        let result = Tariff::builder()
            .high(WattHourRate::from(-0.000_25))
            .low(WattHourRate::from(0.000_18))
            .sale(WattHourRate::from(0.000_13))
            .subscription_fee_per_month(Cost::ZERO)
            .build();
        assert!(matches!(
            result,
            Err(LedgerError::Config { field: "price_high_eur_per_wh", .. })
        ));
    }
}
