pub mod audit;
pub mod readings;
