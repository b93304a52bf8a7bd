//! Error types for the solver.
//!
//! Every failure is caller-visible. Nothing in this crate retries or
//! recovers internally, and no failure is encoded as a numeric value.

use thiserror::Error;

/// Errors raised while configuring or running the solver.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolarError {
    /// An input required by the solve request is absent or undefined
    /// (empty device list, missing or NaN scalar).
    #[error("missing input: {field}")]
    MissingInput {
        /// Name of the absent input.
        field: &'static str,
    },

    /// Neighbor generation was requested but no device may be toggled.
    #[error("no usable device: every device is fixed background load")]
    NoUsableDevice,

    /// Tariff parameters cannot produce finite objective weights.
    #[error("invalid tariff: {reason}")]
    InvalidTariff {
        /// What is wrong with the tariff.
        reason: String,
    },

    /// Annealing parameters are malformed.
    #[error("invalid annealing configuration: {reason}")]
    InvalidConfig {
        /// Which constraint was violated.
        reason: String,
    },

    /// A device carries an unusable power rating.
    #[error("invalid device '{name}': {reason}")]
    InvalidDevice {
        /// Device identifier.
        name: String,
        /// What is wrong with the device.
        reason: String,
    },
}

/// Convenience alias for results using [`SolarError`].
pub type SolarResult<T> = Result<T, SolarError>;

impl SolarError {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    pub(crate) fn tariff(reason: impl Into<String>) -> Self {
        Self::InvalidTariff {
            reason: reason.into(),
        }
    }
}
