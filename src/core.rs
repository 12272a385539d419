pub mod battery;
pub mod cost;
pub mod error;
pub mod flow;
pub mod ledger;
pub mod reading;
pub mod series;
pub mod tariff;
