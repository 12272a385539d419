use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Deserializer, de};

use crate::{
    core::{error::LedgerError, tariff::TariffPeriod},
    quantity::energy::WattHours,
};

/// Fixed sampling cadence of the meter stream.
pub const INTERVAL: TimeDelta = TimeDelta::minutes(15);

const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// One 15-minute meter sample.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntervalReading {
    /// Interval start, local wall-clock time.
    pub timestamp: NaiveDateTime,

    pub produced: WattHours,
    pub consumed: WattHours,
    pub exported: WattHours,
    pub imported: WattHours,
}

impl IntervalReading {
    /// Surplus (positive) or deficit (negative) of the local solar production.
    pub fn net_energy(&self) -> WattHours {
        self.produced - self.consumed
    }

    /// Solar energy consumed directly by the house.
    pub fn self_consumption(&self) -> WattHours {
        self.produced.min(self.consumed)
    }

    pub fn period(&self) -> TariffPeriod {
        TariffPeriod::of(self.timestamp)
    }

    /// Check that every meter value is a finite non-negative amount.
    pub fn validate(&self) -> Result<(), LedgerError> {
        for (field, value) in [
            ("produced_wh", self.produced),
            ("consumed_wh", self.consumed),
            ("exported_wh", self.exported),
            ("imported_wh", self.imported),
        ] {
            if !value.is_finite() {
                return Err(LedgerError::data(self.timestamp, field, format!("`{}` is not finite", value.0)));
            }
            if value.is_negative() {
                return Err(LedgerError::data(self.timestamp, field, format!("{value} is negative")));
            }
        }
        Ok(())
    }

    /// Whether the grid meters agree with the derived surplus or deficit.
    #[must_use]
    pub fn is_meter_consistent(&self, tolerance: WattHours) -> bool {
        let net = self.net_energy();
        let expected_imported = (-net).max(WattHours::ZERO);
        let expected_exported = net.max(WattHours::ZERO);
        (self.imported - expected_imported).0.abs() <= tolerance.0
            && (self.exported - expected_exported).0.abs() <= tolerance.0
    }
}

/// Raw CSV row, before the missing values are rejected.
#[derive(Debug, Deserialize)]
pub struct ReadingRecord {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: NaiveDateTime,

    #[serde(rename = "produced_wh")]
    pub produced: Option<WattHours>,

    #[serde(rename = "consumed_wh")]
    pub consumed: Option<WattHours>,

    #[serde(rename = "exported_wh")]
    pub exported: Option<WattHours>,

    #[serde(rename = "imported_wh")]
    pub imported: Option<WattHours>,
}

impl TryFrom<ReadingRecord> for IntervalReading {
    type Error = LedgerError;

    fn try_from(record: ReadingRecord) -> Result<Self, Self::Error> {
        let timestamp = record.timestamp;
        let require = |field: &'static str, value: Option<WattHours>| {
            value.ok_or_else(|| LedgerError::data(timestamp, field, "value is missing"))
        };
        let reading = Self {
            timestamp,
            produced: require("produced_wh", record.produced)?,
            consumed: require("consumed_wh", record.consumed)?,
            exported: require("exported_wh", record.exported)?,
            imported: require("imported_wh", record.imported)?,
        };
        reading.validate()?;
        Ok(reading)
    }
}

fn deserialize_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
    let text = String::deserialize(deserializer)?;
    let text = text.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .ok_or_else(|| de::Error::custom(format!("unrecognized timestamp `{text}`")))
}
