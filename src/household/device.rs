//! Device snapshots and solution representations.

use crate::error::{SolarError, SolarResult};

/// Snapshot of one switchable device at the start of a solve.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceState {
    /// Stable identifier.
    pub name: String,

    /// Rated power in watts drawn while the device is on.
    pub power_max: f64,

    /// Whether the device is on.
    #[cfg_attr(feature = "serde", serde(alias = "is_active"))]
    pub state: bool,

    /// Whether the solver may toggle this device. Non-usable devices are
    /// fixed background load and keep their state in every solution.
    pub is_usable: bool,
}

impl DeviceState {
    pub fn new(name: impl Into<String>, power_max: f64, state: bool, is_usable: bool) -> Self {
        Self {
            name: name.into(),
            power_max,
            state,
            is_usable,
        }
    }

    /// A device the solver may toggle.
    pub fn usable(name: impl Into<String>, power_max: f64, state: bool) -> Self {
        Self::new(name, power_max, state, true)
    }

    /// A device held at its current state.
    pub fn fixed(name: impl Into<String>, power_max: f64, state: bool) -> Self {
        Self::new(name, power_max, state, false)
    }

    /// Power drawn in the current state.
    pub fn active_power(&self) -> f64 {
        if self.state {
            self.power_max
        } else {
            0.0
        }
    }

    /// Rejects negative or non-finite ratings.
    pub fn validate(&self) -> SolarResult<()> {
        if !self.power_max.is_finite() || self.power_max < 0.0 {
            return Err(SolarError::InvalidDevice {
                name: self.name.clone(),
                reason: format!(
                    "power_max must be finite and non-negative, got {}",
                    self.power_max
                ),
            });
        }
        Ok(())
    }
}

/// Total power of the devices that are on. Zero for an empty slice.
pub fn total_power(devices: &[DeviceState]) -> f64 {
    devices.iter().map(DeviceState::active_power).sum()
}

/// On/off states indexed by device position.
///
/// This is the working representation during a solve: a neighbor is a
/// clone with one flipped entry. Positions refer to the device slice the
/// assignment was built from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Assignment {
    states: Vec<bool>,
}

impl Assignment {
    /// Captures the current state of every device.
    pub fn from_devices(devices: &[DeviceState]) -> Self {
        Self {
            states: devices.iter().map(|d| d.state).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn is_on(&self, index: usize) -> bool {
        self.states[index]
    }

    pub fn states(&self) -> &[bool] {
        &self.states
    }

    /// Returns a copy with the state at `index` inverted.
    pub fn flipped(&self, index: usize) -> Self {
        let mut next = self.clone();
        next.states[index] = !next.states[index];
        next
    }

    /// Total power of the devices switched on by this assignment.
    pub fn total_power(&self, devices: &[DeviceState]) -> f64 {
        devices
            .iter()
            .zip(&self.states)
            .filter(|&(_, &on)| on)
            .map(|(d, _)| d.power_max)
            .sum()
    }

    /// Materializes the assignment over `devices`.
    pub fn to_solution(&self, devices: &[DeviceState]) -> Solution {
        let devices = devices
            .iter()
            .zip(&self.states)
            .map(|(d, &state)| DeviceState {
                state,
                ..d.clone()
            })
            .collect();
        Solution { devices }
    }
}

/// A state change the caller must apply to reach a solution.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Switch {
    pub name: String,
    pub power_max: f64,
    /// `true` to switch on, `false` to switch off.
    pub turn_on: bool,
}

/// One device state per input device, in input order.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    pub devices: Vec<DeviceState>,
}

impl Solution {
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn total_power(&self) -> f64 {
        total_power(&self.devices)
    }

    /// Devices switched on in this solution.
    pub fn active(&self) -> impl Iterator<Item = &DeviceState> {
        self.devices.iter().filter(|d| d.state)
    }

    /// Lists the devices whose state differs from `before`, matched by name.
    pub fn switches_from(&self, before: &[DeviceState]) -> Vec<Switch> {
        self.devices
            .iter()
            .filter(|d| {
                before
                    .iter()
                    .find(|b| b.name == d.name)
                    .is_none_or(|b| b.state != d.state)
            })
            .map(|d| Switch {
                name: d.name.clone(),
                power_max: d.power_max,
                turn_on: d.state,
            })
            .collect()
    }

    pub fn into_devices(self) -> Vec<DeviceState> {
        self.devices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn devices() -> Vec<DeviceState> {
        vec![
            DeviceState::usable("boiler", 1000.0, true),
            DeviceState::usable("pump", 500.0, false),
            DeviceState::fixed("fridge", 150.0, true),
        ]
    }

    #[test]
    fn test_total_power_counts_active_only() {
        assert!((total_power(&devices()) - 1150.0).abs() < 1e-12);
        assert_eq!(total_power(&[]), 0.0);

        let all_off: Vec<_> = devices()
            .into_iter()
            .map(|d| DeviceState { state: false, ..d })
            .collect();
        assert_eq!(total_power(&all_off), 0.0);
    }

    #[test]
    fn test_flipped_is_independent_copy() {
        let devs = devices();
        let a = Assignment::from_devices(&devs);
        let b = a.flipped(1);

        assert!(!a.is_on(1));
        assert!(b.is_on(1));
        assert_eq!(a.states()[0], b.states()[0]);
        assert!((b.total_power(&devs) - 1650.0).abs() < 1e-12);
    }

    #[test]
    fn test_to_solution_preserves_order_and_metadata() {
        let devs = devices();
        let solution = Assignment::from_devices(&devs).flipped(0).to_solution(&devs);

        let names: Vec<_> = solution.devices.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["boiler", "pump", "fridge"]);
        assert!(!solution.devices[0].state);
        assert!(!solution.devices[2].is_usable);
        assert!((solution.total_power() - 150.0).abs() < 1e-12);
        assert_eq!(solution.active().count(), 1);
    }

    #[test]
    fn test_switches_from() {
        let devs = devices();
        let solution = Assignment::from_devices(&devs)
            .flipped(0)
            .flipped(1)
            .to_solution(&devs);

        let switches = solution.switches_from(&devs);
        assert_eq!(switches.len(), 2);
        assert_eq!(switches[0].name, "boiler");
        assert!(!switches[0].turn_on);
        assert_eq!(switches[1].name, "pump");
        assert!(switches[1].turn_on);
    }

    #[test]
    fn test_validate_rejects_bad_power() {
        assert!(DeviceState::usable("ok", 0.0, false).validate().is_ok());
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let err = DeviceState::usable("bad", bad, false).validate().unwrap_err();
            assert!(matches!(err, SolarError::InvalidDevice { ref name, .. } if name == "bad"));
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_accepts_is_active() {
        let json = r#"{"name":"boiler","power_max":1000.0,"is_active":true,"is_usable":false}"#;
        let device: DeviceState = serde_json::from_str(json).unwrap();
        assert_eq!(device, DeviceState::fixed("boiler", 1000.0, true));
    }
}
