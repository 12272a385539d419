use std::fmt::{Display, Formatter};

use comfy_table::Color;

use crate::{core::reading::IntervalReading, quantity::energy::WattHours};

/// Battery decision for one interval.
///
/// The priority is: solar surplus first, then off-peak grid charging, then covering the deficit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Action {
    /// Absorb the solar surplus.
    SolarCharge { surplus: WattHours },

    /// Top up from the grid at the off-peak price.
    GridCharge,

    /// Cover the house deficit.
    Discharge { deficit: WattHours },

    /// Nothing to do.
    Idle,
}

impl Action {
    pub fn decide(reading: &IntervalReading) -> Self {
        let net = reading.net_energy();
        if net.is_positive() {
            Self::SolarCharge { surplus: net }
        } else if reading.period().is_off_peak() {
            Self::GridCharge
        } else if net.is_negative() {
            Self::Discharge { deficit: -net }
        } else {
            Self::Idle
        }
    }

    pub const fn color(self) -> Color {
        match self {
            Self::SolarCharge { .. } => Color::DarkYellow,
            Self::GridCharge => Color::Green,
            Self::Discharge { .. } => Color::Blue,
            Self::Idle => Color::Reset,
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SolarCharge { .. } => write!(f, "Solar charge"),
            Self::GridCharge => write!(f, "Grid charge"),
            Self::Discharge { .. } => write!(f, "Discharge"),
            Self::Idle => write!(f, "Idle"),
        }
    }
}
