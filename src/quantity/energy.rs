use std::{
    fmt::{Debug, Display, Formatter},
    ops::Mul,
};

use crate::quantity::{Quantity, cost::Cost, rate::WattHourRate};

pub type WattHours = Quantity<1, 1, 0>;

impl WattHours {
    pub const fn to_kilowatt_hours(self) -> f64 {
        self.0 / 1000.0
    }
}

impl Display for WattHours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1} Wh", self.0)
    }
}

impl Debug for WattHours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}Wh", self.0)
    }
}

impl Mul<WattHourRate> for WattHours {
    type Output = Cost;

    fn mul(self, rhs: WattHourRate) -> Self::Output {
        Quantity(self.0 * rhs.0)
    }
}
