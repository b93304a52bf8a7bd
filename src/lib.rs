//! Solar surplus device scheduler.
//!
//! Chooses which of a fixed set of switchable devices to power on so that
//! net grid exchange costs the least, given current consumption, solar
//! production and buy/sell tariffs. The search is heuristic:
//!
//! - **Simulated Annealing (SA)**: generic single-solution engine with the
//!   Metropolis acceptance rule and geometric cooling ([`sa`]).
//! - **Household**: device snapshots, the tariff-weighted import/export
//!   objective and the [`household::Solver`] entrypoint ([`household`]).
//!
//! # Architecture
//!
//! The solver holds only its immutable annealing configuration. Tariff
//! context and working solutions live inside each solve call, and the
//! random source is injected, so solves are reentrant and reproducible.
//! Logging goes through `tracing`; installing a subscriber is up to the host.

pub mod error;
pub mod household;
pub mod random;
pub mod sa;
