use crate::{core::battery::BatteryConfig, quantity::energy::WattHours};

/// Running battery state carried from one interval to the next.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BatteryState {
    /// Residual energy in the cells.
    pub level: WattHours,
}

impl BatteryState {
    pub const fn initial(config: &BatteryConfig) -> Self {
        Self { level: config.initial_level }
    }

    /// Spare room below the ceiling.
    pub fn headroom(&self, config: &BatteryConfig) -> WattHours {
        (config.ceiling() - self.level).max(WattHours::ZERO)
    }

    /// Energy available above the floor.
    pub fn available(&self, config: &BatteryConfig) -> WattHours {
        (self.level - config.floor()).max(WattHours::ZERO)
    }

    /// Store the external charge and return the energy that actually reached the cells.
    pub fn charge(&mut self, charge: WattHours, config: &BatteryConfig) -> WattHours {
        let stored = charge * config.efficiency;
        self.level = (self.level + stored).min(config.ceiling());
        stored
    }

    /// Draw from the cells and return the energy delivered to the house.
    pub fn discharge(&mut self, discharge: WattHours, config: &BatteryConfig) -> WattHours {
        self.level = (self.level - discharge).max(config.floor());
        discharge * config.efficiency
    }
}
