//! Annealing configuration.

use crate::error::{SolarError, SolarResult};

/// Configuration for the annealing loop.
///
/// Cooling is geometric: after every iteration `T_{k+1} = cooling_factor * T_k`.
/// The run ends the first time the temperature falls below
/// `minimum_temperature`, or once `max_iterations` steps have been taken.
///
/// # Examples
///
/// ```
/// use u_solaropt::sa::AnnealingConfig;
///
/// let config = AnnealingConfig::default()
///     .with_initial_temperature(500.0)
///     .with_minimum_temperature(0.01)
///     .with_cooling_factor(0.98)
///     .with_max_iterations(2000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnnealingConfig {
    /// Starting temperature. Higher values accept more worsening moves early.
    pub initial_temperature: f64,

    /// Temperature floor. The run stops once the temperature drops below it.
    pub minimum_temperature: f64,

    /// Geometric cooling factor in (0, 1). Higher = slower cooling.
    pub cooling_factor: f64,

    /// Maximum number of neighbor evaluations.
    pub max_iterations: usize,

    /// Random seed used when the caller does not inject a generator.
    ///
    /// `None` draws a fresh seed per solve.
    pub seed: Option<u64>,

    /// Optional wall-clock limit in milliseconds, checked once per iteration.
    pub time_limit_ms: Option<u64>,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1000.0,
            minimum_temperature: 0.1,
            cooling_factor: 0.95,
            max_iterations: 1000,
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl AnnealingConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_minimum_temperature(mut self, t: f64) -> Self {
        self.minimum_temperature = t;
        self
    }

    pub fn with_cooling_factor(mut self, factor: f64) -> Self {
        self.cooling_factor = factor;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Validates the configuration.
    ///
    /// Requires `initial_temperature > minimum_temperature > 0`,
    /// `cooling_factor` in (0, 1) and `max_iterations > 0`. NaN fails every
    /// comparison and is rejected.
    pub fn validate(&self) -> SolarResult<()> {
        if !(self.minimum_temperature > 0.0) {
            return Err(SolarError::config(format!(
                "minimum_temperature must be positive, got {}",
                self.minimum_temperature
            )));
        }
        if !(self.initial_temperature > self.minimum_temperature) {
            return Err(SolarError::config(format!(
                "initial_temperature ({}) must exceed minimum_temperature ({})",
                self.initial_temperature, self.minimum_temperature
            )));
        }
        if !self.initial_temperature.is_finite() {
            return Err(SolarError::config("initial_temperature must be finite"));
        }
        if !(self.cooling_factor > 0.0 && self.cooling_factor < 1.0) {
            return Err(SolarError::config(format!(
                "cooling_factor must be in (0, 1), got {}",
                self.cooling_factor
            )));
        }
        if self.max_iterations == 0 {
            return Err(SolarError::config("max_iterations must be positive"));
        }
        Ok(())
    }

    /// Number of cooling steps before the temperature crosses the floor,
    /// capped at `max_iterations`.
    pub fn cooling_steps(&self) -> usize {
        let mut temperature = self.initial_temperature;
        let mut steps = 0usize;
        while temperature >= self.minimum_temperature && steps < self.max_iterations {
            temperature *= self.cooling_factor;
            steps += 1;
        }
        steps
    }
}
