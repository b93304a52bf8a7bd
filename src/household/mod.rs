//! Household device scheduling.
//!
//! Decides, once per control cycle, which switchable devices should be on
//! so that the household's exchange with the grid costs the least. Devices
//! marked non-usable are fixed background load.
//!
//! The caller polls meters, builds a [`SolveRequest`], and applies the
//! returned [`Solution`] (see [`Solution::switches_from`]).

mod device;
mod problem;
mod solver;
mod tariff;

#[cfg(test)]
mod properties;

pub use device::{total_power, Assignment, DeviceState, Solution, Switch};
pub use problem::{initial_solution, neighbor, DeviceProblem};
pub use solver::{Optimization, RunStats, SolveRequest, Solver};
pub use tariff::{objective, GridBalance, TariffContext, TariffWeights};
