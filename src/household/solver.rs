//! Solve entrypoint.

use super::device::{DeviceState, Solution};
use super::problem::DeviceProblem;
use super::tariff::TariffContext;
use crate::error::{SolarError, SolarResult};
use crate::random::{create_rng, rng_from_option};
use crate::sa::{AnnealingConfig, SaRunner, Termination};
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Inputs for one optimization request.
///
/// Scalars are optional so a host can forward meter readings that may not
/// be available yet; a missing or NaN value is reported as
/// [`SolarError::MissingInput`].
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolveRequest {
    pub devices: Vec<DeviceState>,
    pub net_consumption: Option<f64>,
    pub solar_production: Option<f64>,
    pub sell_cost: Option<f64>,
    pub buy_cost: Option<f64>,
    pub sell_tax_percent: Option<f64>,
}

impl SolveRequest {
    /// Builds a request with every scalar present.
    pub fn new(
        devices: Vec<DeviceState>,
        net_consumption: f64,
        solar_production: f64,
        sell_cost: f64,
        buy_cost: f64,
        sell_tax_percent: f64,
    ) -> Self {
        Self {
            devices,
            net_consumption: Some(net_consumption),
            solar_production: Some(solar_production),
            sell_cost: Some(sell_cost),
            buy_cost: Some(buy_cost),
            sell_tax_percent: Some(sell_tax_percent),
        }
    }

    /// Checks that every input is present and assembles the tariff context.
    pub fn context(&self) -> SolarResult<TariffContext> {
        if self.devices.is_empty() {
            return Err(SolarError::MissingInput { field: "devices" });
        }
        Ok(TariffContext {
            net_consumption: require("net_consumption", self.net_consumption)?,
            solar_production: require("solar_production", self.solar_production)?,
            buy_cost: require("buy_cost", self.buy_cost)?,
            sell_cost: require("sell_cost", self.sell_cost)?,
            sell_tax_percent: require("sell_tax_percent", self.sell_tax_percent)?,
        })
    }
}

fn require(field: &'static str, value: Option<f64>) -> SolarResult<f64> {
    match value {
        Some(v) if !v.is_nan() => Ok(v),
        _ => Err(SolarError::MissingInput { field }),
    }
}

/// Counters describing how a solve went.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunStats {
    pub iterations: usize,
    pub accepted_moves: usize,
    pub improving_moves: usize,
    pub final_temperature: f64,
    pub termination: Termination,
    /// Best objective sampled during the run. Non-increasing.
    pub cost_history: Vec<f64>,
}

/// Best solution found by a solve.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Optimization {
    /// Device states, in input order.
    pub solution: Solution,
    /// Objective of `solution`. Lower is better.
    pub objective: f64,
    /// Total power of the devices on in `solution`.
    pub total_power: f64,
    /// Power drawn by the input states, against which `objective` was measured.
    pub baseline_power: f64,
    pub stats: RunStats,
}

/// Chooses which devices to power on, by simulated annealing.
///
/// The solver only holds its immutable [`AnnealingConfig`]. All per-call
/// state is local to a solve, so one solver may serve concurrent requests.
///
/// # Examples
///
/// ```
/// use u_solaropt::household::{DeviceState, SolveRequest, Solver};
/// use u_solaropt::sa::AnnealingConfig;
///
/// let solver = Solver::new(AnnealingConfig::default().with_seed(42)).unwrap();
/// let request = SolveRequest::new(
///     vec![
///         DeviceState::usable("boiler", 1000.0, false),
///         DeviceState::usable("pump", 500.0, false),
///     ],
///     -1200.0, // exporting 1200 W
///     1200.0,
///     10.0,    // sell cost
///     15.0,    // buy cost
///     13.0,    // sell tax %
/// );
/// let result = solver.solve(&request).unwrap();
/// assert!(result.total_power > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Solver {
    config: AnnealingConfig,
}

impl Solver {
    /// Validates `config` and builds a solver.
    pub fn new(config: AnnealingConfig) -> SolarResult<Self> {
        config.validate()?;
        info!(
            initial_temperature = config.initial_temperature,
            minimum_temperature = config.minimum_temperature,
            cooling_factor = config.cooling_factor,
            max_iterations = config.max_iterations,
            "initialized annealing solver"
        );
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnnealingConfig {
        &self.config
    }

    /// Solves with a generator seeded from the configured seed.
    pub fn solve(&self, request: &SolveRequest) -> SolarResult<Optimization> {
        let mut rng = rng_from_option(self.config.seed);
        self.solve_with_rng(request, &mut rng)
    }

    /// Solves drawing every random decision from `rng`.
    pub fn solve_with_rng<R: Rng>(
        &self,
        request: &SolveRequest,
        rng: &mut R,
    ) -> SolarResult<Optimization> {
        self.solve_with_cancel(request, rng, None)
    }

    /// Solves, stopping early once `cancel` is raised.
    pub fn solve_with_cancel<R: Rng>(
        &self,
        request: &SolveRequest,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> SolarResult<Optimization> {
        let context = request.context().inspect_err(|err| {
            warn!(%err, "not all inputs are available, calculation abandoned");
        })?;
        self.optimize(&request.devices, &context, rng, cancel)
    }

    /// Runs the annealing loop over `devices` under `context`.
    pub fn optimize<R: Rng>(
        &self,
        devices: &[DeviceState],
        context: &TariffContext,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> SolarResult<Optimization> {
        debug!(
            net_consumption = context.net_consumption,
            solar_production = context.solar_production,
            sell_cost = context.sell_cost,
            buy_cost = context.buy_cost,
            sell_tax_percent = context.sell_tax_percent,
            devices = devices.len(),
            "starting optimization"
        );

        let problem = DeviceProblem::new(devices, context)?;
        let result = SaRunner::run_with_rng(&problem, &self.config, rng, cancel)?;

        let total_power = problem.total_power(&result.best);
        let solution = result.best.to_solution(devices);

        info!(
            objective = result.best_cost,
            total_power,
            iterations = result.iterations,
            termination = ?result.termination,
            "optimization finished"
        );

        Ok(Optimization {
            solution,
            objective: result.best_cost,
            total_power,
            baseline_power: problem.baseline_power(),
            stats: RunStats {
                iterations: result.iterations,
                accepted_moves: result.accepted_moves,
                improving_moves: result.improving_moves,
                final_temperature: result.final_temperature,
                termination: result.termination,
                cost_history: result.cost_history,
            },
        })
    }

    /// Solves independent requests, each with a generator seeded from
    /// `base_seed + index`.
    ///
    /// With the `parallel` feature the requests are spread across the rayon
    /// pool. Output order matches input order either way, and each result is
    /// identical to a sequential seeded solve.
    pub fn solve_batch(
        &self,
        requests: &[SolveRequest],
        base_seed: u64,
    ) -> Vec<SolarResult<Optimization>> {
        let solve_one = |(index, request): (usize, &SolveRequest)| {
            let mut rng = create_rng(base_seed.wrapping_add(index as u64));
            self.solve_with_rng(request, &mut rng)
        };

        #[cfg(feature = "parallel")]
        {
            requests.par_iter().enumerate().map(solve_one).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            requests.iter().enumerate().map(solve_one).collect()
        }
    }
}
