//! SA execution loop.
//!
//! # Algorithm
//!
//! 1. `current = best = initial_solution`, `T = initial_temperature`
//! 2. At each iteration:
//!    a. Draw a neighbor of `current` and evaluate it
//!    b. Strictly better: accept, and update `best` if it beats it
//!    c. Otherwise accept with probability `exp((cost(current) - cost(candidate)) / T)`
//!    d. `T *= cooling_factor`
//! 3. Stop the first time `T < minimum_temperature` (cooled), after
//!    `max_iterations` steps (exhausted), or when cancelled / timed out.

use super::config::AnnealingConfig;
use super::types::SaProblem;
use crate::error::SolarResult;
use crate::random::rng_from_option;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Best cost is sampled into the history every this many iterations.
const HISTORY_INTERVAL: usize = 100;

/// Why an annealing run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    /// The temperature fell below the configured floor.
    Cooled,
    /// The iteration budget was spent.
    Exhausted,
    /// The cancellation flag was raised.
    Cancelled,
    /// The wall-clock limit elapsed.
    TimedOut,
}

/// Result of a Simulated Annealing run.
#[derive(Debug, Clone)]
pub struct SaResult<S: Clone> {
    /// The best solution found.
    pub best: S,

    /// Cost of the best solution.
    pub best_cost: f64,

    /// Total number of iterations (neighbor evaluations).
    pub iterations: usize,

    /// Temperature when the algorithm stopped.
    pub final_temperature: f64,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of strictly improving moves.
    pub improving_moves: usize,

    /// Why the run stopped.
    pub termination: Termination,

    /// Best cost sampled at regular intervals, plus initial and final values.
    pub cost_history: Vec<f64>,
}

/// Executes the Simulated Annealing algorithm.
pub struct SaRunner;

impl SaRunner {
    /// Runs SA with an RNG seeded from `config.seed`.
    pub fn run<P: SaProblem>(
        problem: &P,
        config: &AnnealingConfig,
    ) -> SolarResult<SaResult<P::Solution>> {
        let mut rng = rng_from_option(config.seed);
        Self::run_with_rng(problem, config, &mut rng, None)
    }

    /// Runs SA with an optional cancellation token.
    pub fn run_with_cancel<P: SaProblem>(
        problem: &P,
        config: &AnnealingConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> SolarResult<SaResult<P::Solution>> {
        let mut rng = rng_from_option(config.seed);
        Self::run_with_rng(problem, config, &mut rng, cancel)
    }

    /// Runs SA drawing every random decision from `rng`.
    ///
    /// Neighbor selection and acceptance sampling both consume `rng`, so a
    /// seeded generator makes the run bit-reproducible.
    pub fn run_with_rng<P: SaProblem, R: Rng>(
        problem: &P,
        config: &AnnealingConfig,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> SolarResult<SaResult<P::Solution>> {
        config.validate()?;

        let started = Instant::now();
        let deadline = config.time_limit_ms.map(Duration::from_millis);

        let mut current = problem.initial_solution(rng);
        let mut current_cost = problem.cost(&current);
        let mut best = current.clone();
        let mut best_cost = current_cost;

        let mut temperature = config.initial_temperature;
        let mut iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut termination = Termination::Exhausted;

        let mut cost_history = vec![best_cost];

        while iterations < config.max_iterations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    termination = Termination::Cancelled;
                    break;
                }
            }
            if deadline.is_some_and(|limit| started.elapsed() >= limit) {
                termination = Termination::TimedOut;
                break;
            }

            let candidate = problem.neighbor(&current, rng)?;
            let candidate_cost = problem.cost(&candidate);

            // Metropolis acceptance criterion
            let accept = if candidate_cost < current_cost {
                improving_moves += 1;
                true
            } else {
                let probability = ((current_cost - candidate_cost) / temperature).exp();
                rng.random_range(0.0..1.0) < probability
            };

            trace!(
                iteration = iterations,
                temperature,
                current_cost,
                candidate_cost,
                accept,
                "annealing step"
            );

            if accept {
                current = candidate;
                current_cost = candidate_cost;
                accepted_moves += 1;

                if current_cost < best_cost {
                    best = current.clone();
                    best_cost = current_cost;
                    debug!(iteration = iterations, best_cost, "new best solution");
                }
            }

            iterations += 1;
            if iterations.is_multiple_of(HISTORY_INTERVAL) {
                cost_history.push(best_cost);
            }

            temperature *= config.cooling_factor;
            if temperature < config.minimum_temperature {
                termination = Termination::Cooled;
                break;
            }
        }

        if cost_history
            .last()
            .is_none_or(|&last| (last - best_cost).abs() > 1e-15)
        {
            cost_history.push(best_cost);
        }

        Ok(SaResult {
            best,
            best_cost,
            iterations,
            final_temperature: temperature,
            accepted_moves,
            improving_moves,
            termination,
            cost_history,
        })
    }
}
