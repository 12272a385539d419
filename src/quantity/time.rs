use std::fmt::{Debug, Formatter};

use chrono::TimeDelta;

use crate::quantity::Quantity;

pub type Hours = Quantity<0, 1, 0>;

impl From<TimeDelta> for Hours {
    fn from(time_delta: TimeDelta) -> Self {
        Self(time_delta.as_seconds_f64() / 3600.0)
    }
}

impl Debug for Hours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}h", self.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::quantity::power::Watts;

    #[test]
    fn test_quarter_hour() {
        let energy = Watts::from(3000.0) * Hours::from(TimeDelta::minutes(15));
        assert_abs_diff_eq!(energy.0, 750.0);
    }
}
