use bon::bon;

use crate::{
    core::{error::LedgerError, reading::INTERVAL},
    quantity::{energy::WattHours, power::Watts, time::Hours},
};

/// Immutable battery parameters.
#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct BatteryConfig {
    pub capacity: WattHours,
    pub max_charge_rate: Watts,
    pub max_discharge_rate: Watts,

    /// One-leg efficiency, `(0, 1]`.
    ///
    /// Applied once when storing and once when releasing.
    pub efficiency: f64,

    /// Minimal state-of-charge, `[0, 1)`.
    pub discharge_floor: f64,

    /// Maximal state-of-charge, `(0, 1]`.
    pub charge_ceiling: f64,

    pub initial_level: WattHours,
}

#[bon]
impl BatteryConfig {
    #[builder]
    pub fn new(
        capacity: WattHours,
        max_charge_rate: Watts,
        max_discharge_rate: Watts,
        efficiency: f64,
        discharge_floor: f64,
        #[builder(default = 1.0)] charge_ceiling: f64,
        initial_level: WattHours,
    ) -> Result<Self, LedgerError> {
        if !capacity.is_finite() || !capacity.is_positive() {
            return Err(LedgerError::config("capacity_wh", format!("expected a positive amount, got {capacity}")));
        }
        if !max_charge_rate.is_finite() || !max_charge_rate.is_positive() {
            return Err(LedgerError::config(
                "max_charge_rate_w",
                format!("expected a positive rate, got {max_charge_rate}"),
            ));
        }
        if !max_discharge_rate.is_finite() || !max_discharge_rate.is_positive() {
            return Err(LedgerError::config(
                "max_discharge_rate_w",
                format!("expected a positive rate, got {max_discharge_rate}"),
            ));
        }
        if !(efficiency > 0.0 && efficiency <= 1.0) {
            return Err(LedgerError::config("efficiency_pc", format!("expected `(0, 1]`, got {efficiency}")));
        }
        if !(0.0..1.0).contains(&discharge_floor) {
            return Err(LedgerError::config(
                "discharge_floor_pc",
                format!("expected `[0, 1)`, got {discharge_floor}"),
            ));
        }
        if !(charge_ceiling > 0.0 && charge_ceiling <= 1.0) {
            return Err(LedgerError::config("charge_ceiling_pc", format!("expected `(0, 1]`, got {charge_ceiling}")));
        }
        if discharge_floor >= charge_ceiling {
            return Err(LedgerError::config(
                "discharge_floor_pc",
                format!("floor {discharge_floor} is not below the ceiling {charge_ceiling}"),
            ));
        }
        if !initial_level.is_finite() {
            return Err(LedgerError::config("initial_level_wh", format!("`{}` is not finite", initial_level.0)));
        }
        let this = Self {
            capacity,
            max_charge_rate,
            max_discharge_rate,
            efficiency,
            discharge_floor,
            charge_ceiling,
            initial_level,
        };
        this.check_level(initial_level)?;
        Ok(this)
    }
}

impl BatteryConfig {
    pub fn floor(&self) -> WattHours {
        self.capacity * self.discharge_floor
    }

    pub fn ceiling(&self) -> WattHours {
        self.capacity * self.charge_ceiling
    }

    /// Maximum energy accepted from outside during one interval.
    pub fn charge_limit(&self) -> WattHours {
        self.max_charge_rate * Hours::from(INTERVAL)
    }

    /// Maximum energy drawn from the cells during one interval.
    pub fn discharge_limit(&self) -> WattHours {
        self.max_discharge_rate * Hours::from(INTERVAL)
    }

    /// Ensure the level is within the physical bounds.
    pub fn check_level(&self, level: WattHours) -> Result<(), LedgerError> {
        let (floor, ceiling) = (self.floor(), self.ceiling());
        if level < floor || level > ceiling {
            return Err(LedgerError::State { level, floor, ceiling });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_derived_limits() -> Result<(), LedgerError> {
        let config = BatteryConfig::builder()
            .capacity(WattHours::from(10_000.0))
            .max_charge_rate(Watts::from(3000.0))
            .max_discharge_rate(Watts::from(1200.0))
            .efficiency(0.95)
            .discharge_floor(0.1)
            .charge_ceiling(0.9)
            .initial_level(WattHours::from(5000.0))
            .build()?;
        assert_abs_diff_eq!(config.charge_limit().0, 750.0);
        assert_abs_diff_eq!(config.discharge_limit().0, 300.0);
        assert_abs_diff_eq!(config.floor().0, 1000.0);
        assert_abs_diff_eq!(config.ceiling().0, 9000.0);
        Ok(())
    }

    #[test]
    fn test_default_ceiling() -> Result<(), LedgerError> {
        let config = BatteryConfig::builder()
            .capacity(WattHours::from(1000.0))
            .max_charge_rate(Watts::from(1000.0))
            .max_discharge_rate(Watts::from(1000.0))
            .efficiency(1.0)
            .discharge_floor(0.0)
            .initial_level(WattHours::from(1000.0))
            .build()?;
        assert_abs_diff_eq!(config.ceiling().0, 1000.0);
        Ok(())
    }

    #[test]
    fn test_invalid_efficiency() {
        for efficiency in [0.0, 1.01, f64::NAN] {
            let result = BatteryConfig::builder()
                .capacity(WattHours::from(1000.0))
                .max_charge_rate(Watts::from(1000.0))
                .max_discharge_rate(Watts::from(1000.0))
                .efficiency(efficiency)
                .discharge_floor(0.0)
                .initial_level(WattHours::from(500.0))
                .build();
            assert!(matches!(result, Err(LedgerError::Config { field: "efficiency_pc", .. })));
        }
    }

    #[test]
    fn test_floor_above_ceiling() {
        let result = BatteryConfig::builder()
            .capacity(WattHours::from(1000.0))
            .max_charge_rate(Watts::from(1000.0))
            .max_discharge_rate(Watts::from(1000.0))
            .efficiency(1.0)
            .discharge_floor(0.6)
            .charge_ceiling(0.5)
            .initial_level(WattHours::from(550.0))
            .build();
        assert!(matches!(result, Err(LedgerError::Config { field: "discharge_floor_pc", .. })));
    }

    #[test]
    fn test_non_positive_discharge_rate() {
        for rate in [0.0, -100.0] {
            let result = BatteryConfig::builder()
                .capacity(WattHours::from(1000.0))
                .max_charge_rate(Watts::from(1000.0))
                .max_discharge_rate(Watts::from(rate))
                .efficiency(1.0)
                .discharge_floor(0.0)
                .initial_level(WattHours::from(500.0))
                .build();
            assert!(matches!(result, Err(LedgerError::Config { field: "max_discharge_rate_w", .. })));
        }
    }

    #[test]
    fn test_charge_ceiling_range() {
        for charge_ceiling in [0.0, 1.2] {
            let result = BatteryConfig::builder()
                .capacity(WattHours::from(1000.0))
                .max_charge_rate(Watts::from(1000.0))
                .max_discharge_rate(Watts::from(1000.0))
                .efficiency(1.0)
                .discharge_floor(0.0)
                .charge_ceiling(charge_ceiling)
                .initial_level(WattHours::ZERO)
                .build();
            assert!(matches!(result, Err(LedgerError::Config { field: "charge_ceiling_pc", .. })));
        }
    }

    #[test]
    fn test_zero_capacity() {
        let result = BatteryConfig::builder()
            .capacity(WattHours::ZERO)
            .max_charge_rate(Watts::from(1000.0))
            .max_discharge_rate(Watts::from(1000.0))
            .efficiency(1.0)
            .discharge_floor(0.0)
            .initial_level(WattHours::ZERO)
            .build();
        assert!(matches!(result, Err(LedgerError::Config { field: "capacity_wh", .. })));
    }

    #[test]
    fn test_initial_level_out_of_bounds() {
        let result = BatteryConfig::builder()
            .capacity(WattHours::from(1000.0))
            .max_charge_rate(Watts::from(1000.0))
            .max_discharge_rate(Watts::from(1000.0))
            .efficiency(1.0)
            .discharge_floor(0.2)
            .initial_level(WattHours::from(100.0))
            .build();
        assert!(matches!(result, Err(LedgerError::State { .. })));
    }
}
