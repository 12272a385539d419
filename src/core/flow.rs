use std::fmt::{Display, Formatter};

use derive_more::{Add, AddAssign};
use enumset::EnumSet;
use serde::Serialize;

use crate::{
    core::{battery::BatteryInterval, reading::IntervalReading},
    quantity::energy::WattHours,
};

/// Canonical source-to-destination energy path.
#[derive(Debug, Serialize, enumset::EnumSetType)]
#[serde(rename_all = "snake_case")]
pub enum FlowCategory {
    GridToHouse,
    GridToBattery,
    SolarToHouse,
    BatteryToHouse,
    SolarToBattery,
    SolarToGrid,
}

impl FlowCategory {
    pub fn all() -> EnumSet<Self> {
        EnumSet::all()
    }

    /// Whether the category price depends on the peak/off-peak period.
    #[must_use]
    pub const fn is_period_sensitive(self) -> bool {
        matches!(self, Self::GridToHouse | Self::BatteryToHouse | Self::SolarToHouse)
    }
}

impl Display for FlowCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GridToHouse => write!(f, "Grid → House"),
            Self::GridToBattery => write!(f, "Grid → Battery"),
            Self::SolarToHouse => write!(f, "Solar → House"),
            Self::BatteryToHouse => write!(f, "Battery → House"),
            Self::SolarToBattery => write!(f, "Solar → Battery"),
            Self::SolarToGrid => write!(f, "Solar → Grid"),
        }
    }
}

/// Something per each flow category.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq, Add, AddAssign)]
pub struct Flows<T> {
    pub grid_to_house: T,
    pub grid_to_battery: T,
    pub solar_to_house: T,
    pub battery_to_house: T,
    pub solar_to_battery: T,
    pub solar_to_grid: T,
}

impl<T> Flows<T> {
    pub const fn get(&self, category: FlowCategory) -> &T {
        match category {
            FlowCategory::GridToHouse => &self.grid_to_house,
            FlowCategory::GridToBattery => &self.grid_to_battery,
            FlowCategory::SolarToHouse => &self.solar_to_house,
            FlowCategory::BatteryToHouse => &self.battery_to_house,
            FlowCategory::SolarToBattery => &self.solar_to_battery,
            FlowCategory::SolarToGrid => &self.solar_to_grid,
        }
    }

    pub const fn get_mut(&mut self, category: FlowCategory) -> &mut T {
        match category {
            FlowCategory::GridToHouse => &mut self.grid_to_house,
            FlowCategory::GridToBattery => &mut self.grid_to_battery,
            FlowCategory::SolarToHouse => &mut self.solar_to_house,
            FlowCategory::BatteryToHouse => &mut self.battery_to_house,
            FlowCategory::SolarToBattery => &mut self.solar_to_battery,
            FlowCategory::SolarToGrid => &mut self.solar_to_grid,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (FlowCategory, &T)> {
        FlowCategory::all().iter().map(|category| (category, self.get(category)))
    }
}

/// Energy per flow category during one interval.
pub type FlowRecord = Flows<WattHours>;

impl FlowRecord {
    /// Assign every watt-hour of the interval to exactly one category.
    pub fn decompose(reading: &IntervalReading, battery: &BatteryInterval) -> Self {
        Self {
            grid_to_house: battery.adjusted_imported,
            grid_to_battery: battery.grid_charge,
            solar_to_house: reading.self_consumption(),
            battery_to_house: battery.delivered,
            solar_to_battery: battery.solar_charge,
            solar_to_grid: battery.adjusted_exported,
        }
    }

    /// Where the solar production went.
    pub fn produced(&self) -> WattHours {
        self.solar_to_house + self.solar_to_battery + self.solar_to_grid
    }

    /// Where the house consumption came from.
    pub fn consumed(&self) -> WattHours {
        self.grid_to_house + self.battery_to_house + self.solar_to_house
    }
}
