//! Core trait for Simulated Annealing.

use crate::error::SolarResult;
use rand::Rng;

/// Defines a Simulated Annealing problem.
///
/// The implementor provides the starting point, the cost function and
/// neighbor generation. [`SaRunner`](super::SaRunner) handles temperature,
/// the Metropolis acceptance rule and cooling.
///
/// # Minimization
///
/// SA minimizes the cost function. For maximization, negate the cost.
///
/// # Examples
///
/// ```
/// use rand::Rng;
/// use u_solaropt::error::SolarResult;
/// use u_solaropt::sa::SaProblem;
///
/// struct CountOnes { n: usize }
///
/// impl SaProblem for CountOnes {
///     type Solution = Vec<bool>;
///
///     fn initial_solution<R: Rng>(&self, _rng: &mut R) -> Vec<bool> {
///         vec![true; self.n]
///     }
///
///     fn cost(&self, bits: &Vec<bool>) -> f64 {
///         bits.iter().filter(|&&b| b).count() as f64
///     }
///
///     fn neighbor<R: Rng>(&self, bits: &Vec<bool>, rng: &mut R) -> SolarResult<Vec<bool>> {
///         let mut next = bits.clone();
///         let i = rng.random_range(0..self.n);
///         next[i] = !next[i];
///         Ok(next)
///     }
/// }
/// ```
pub trait SaProblem: Send + Sync {
    /// The solution representation type.
    type Solution: Clone + Send;

    /// Creates the initial solution.
    fn initial_solution<R: Rng>(&self, rng: &mut R) -> Self::Solution;

    /// Computes the cost of a solution. Lower is better.
    fn cost(&self, solution: &Self::Solution) -> f64;

    /// Generates an independent neighbor of `solution`.
    ///
    /// Fails when the problem has no move available.
    fn neighbor<R: Rng>(
        &self,
        solution: &Self::Solution,
        rng: &mut R,
    ) -> SolarResult<Self::Solution>;
}
