use std::fmt::{Debug, Display, Formatter};

use crate::quantity::Quantity;

/// Euro per watt-hour.
pub type WattHourRate = Quantity<-1, -1, 1>;

impl Display for WattHourRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // Per-watt-hour prices are tiny, show them per kilowatt-hour instead:
        write!(f, "{:.4} €/kWh", self.0 * 1000.0)
    }
}

impl Debug for WattHourRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}€/Wh", self.0)
    }
}
