//! Device scheduling as an [`SaProblem`].

use super::device::{Assignment, DeviceState};
use super::tariff::{TariffContext, TariffWeights};
use crate::error::{SolarError, SolarResult};
use crate::sa::SaProblem;
use rand::Rng;

/// One solve call's view of the household: devices, tariff weights and the
/// baseline power drawn by the initial device states.
///
/// Holds no mutable state, so one instance may be shared across threads.
#[derive(Debug, Clone)]
pub struct DeviceProblem<'a> {
    devices: &'a [DeviceState],
    usable: Vec<usize>,
    baseline_power: f64,
    weights: TariffWeights,
}

impl<'a> DeviceProblem<'a> {
    /// Validates the devices and tariff and fixes the baseline power.
    pub fn new(devices: &'a [DeviceState], context: &TariffContext) -> SolarResult<Self> {
        if devices.is_empty() {
            return Err(SolarError::MissingInput { field: "devices" });
        }
        for device in devices {
            device.validate()?;
        }
        let weights = context.weights()?;
        let (_, baseline_power) = initial_solution(devices);
        let usable: Vec<usize> = devices
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_usable)
            .map(|(i, _)| i)
            .collect();
        if usable.is_empty() {
            return Err(SolarError::NoUsableDevice);
        }

        Ok(Self {
            devices,
            usable,
            baseline_power,
            weights,
        })
    }

    pub fn devices(&self) -> &'a [DeviceState] {
        self.devices
    }

    pub fn baseline_power(&self) -> f64 {
        self.baseline_power
    }

    pub fn weights(&self) -> &TariffWeights {
        &self.weights
    }

    /// Positions of the devices the solver may toggle.
    pub fn usable_indices(&self) -> &[usize] {
        &self.usable
    }

    pub fn total_power(&self, assignment: &Assignment) -> f64 {
        assignment.total_power(self.devices)
    }
}

/// Snapshots the current device states and their total active power.
pub fn initial_solution(devices: &[DeviceState]) -> (Assignment, f64) {
    let assignment = Assignment::from_devices(devices);
    let baseline = assignment.total_power(devices);
    (assignment, baseline)
}

/// Flips one usable device, drawn uniformly from `usable`.
pub fn neighbor<R: Rng>(
    assignment: &Assignment,
    usable: &[usize],
    rng: &mut R,
) -> SolarResult<Assignment> {
    if usable.is_empty() {
        return Err(SolarError::NoUsableDevice);
    }
    let index = usable[rng.random_range(0..usable.len())];
    Ok(assignment.flipped(index))
}

impl SaProblem for DeviceProblem<'_> {
    type Solution = Assignment;

    fn initial_solution<R: Rng>(&self, _rng: &mut R) -> Assignment {
        Assignment::from_devices(self.devices)
    }

    fn cost(&self, assignment: &Assignment) -> f64 {
        self.weights.evaluate(self.total_power(assignment), self.baseline_power)
    }

    fn neighbor<R: Rng>(&self, assignment: &Assignment, rng: &mut R) -> SolarResult<Assignment> {
        neighbor(assignment, &self.usable, rng)
    }
}
