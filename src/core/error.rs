use chrono::NaiveDateTime;

use crate::quantity::energy::WattHours;

/// Fatal run errors of the ledger core.
///
/// None of them is retryable: the computation is a deterministic batch transform,
/// and one bad interval invalidates every battery state after it.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Invalid battery or tariff configuration, detected before the simulation starts.
    #[error("invalid configuration `{field}`: {reason}")]
    Config { field: &'static str, reason: String },

    /// Malformed or out-of-contract input interval.
    #[error("invalid reading at {timestamp}, `{field}`: {reason}")]
    Data { timestamp: NaiveDateTime, field: &'static str, reason: String },

    /// Initial battery level outside of its physical bounds.
    #[error("initial battery level {level} is outside of {floor}..={ceiling}")]
    State { level: WattHours, floor: WattHours, ceiling: WattHours },
}

impl LedgerError {
    pub fn config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Config { field, reason: reason.into() }
    }

    pub fn data(timestamp: NaiveDateTime, field: &'static str, reason: impl Into<String>) -> Self {
        Self::Data { timestamp, field, reason: reason.into() }
    }
}
