mod action;
mod config;
mod simulator;
mod state;

pub use self::{
    action::Action,
    config::BatteryConfig,
    simulator::{BatteryInterval, Simulator},
    state::BatteryState,
};
