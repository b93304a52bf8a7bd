//! Tariff context and the grid-exchange objective.
//!
//! The objective blends two quantities derived from the signed net
//! consumption after a solution's power change is applied:
//!
//! - `grid_import`: power that must be bought, weighted by
//!   `buy_cost / (buy_cost + sell_after_tax)`
//! - `grid_export`: solar surplus not absorbed by devices, weighted by
//!   `sell_after_tax / (buy_cost + sell_after_tax)`
//!
//! At most one of the two is non-zero for any solution.

use super::device::{total_power, DeviceState};
use crate::error::{SolarError, SolarResult};

/// Grid and tariff inputs for a single solve call.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TariffContext {
    /// Signed net consumption in watts. Negative when exporting.
    pub net_consumption: f64,

    /// Current solar production in watts.
    pub solar_production: f64,

    /// Price of one unit of imported energy.
    pub buy_cost: f64,

    /// Price paid for one unit of exported energy, before tax.
    pub sell_cost: f64,

    /// Tax applied to export revenue, in percent (0-100).
    pub sell_tax_percent: f64,
}

impl TariffContext {
    /// Export price net of the sell-side tax.
    pub fn sell_price_after_tax(&self) -> f64 {
        self.sell_cost * (1.0 - self.sell_tax_percent / 100.0)
    }

    /// Derives the objective weights, validating the tariff.
    pub fn weights(&self) -> SolarResult<TariffWeights> {
        for (field, value) in [
            ("net_consumption", self.net_consumption),
            ("solar_production", self.solar_production),
            ("buy_cost", self.buy_cost),
            ("sell_cost", self.sell_cost),
            ("sell_tax_percent", self.sell_tax_percent),
        ] {
            if !value.is_finite() {
                return Err(SolarError::tariff(format!("{field} must be finite, got {value}")));
            }
        }
        if self.solar_production < 0.0 {
            return Err(SolarError::tariff(format!(
                "solar_production must be non-negative, got {}",
                self.solar_production
            )));
        }
        if !(0.0..=100.0).contains(&self.sell_tax_percent) {
            return Err(SolarError::tariff(format!(
                "sell_tax_percent must be within [0, 100], got {}",
                self.sell_tax_percent
            )));
        }

        let sell_after_tax = self.sell_price_after_tax();
        let denominator = self.buy_cost + sell_after_tax;
        if denominator == 0.0 {
            return Err(SolarError::tariff("buy_cost + sell price after tax is zero"));
        }

        Ok(TariffWeights {
            net_consumption: self.net_consumption,
            import_weight: self.buy_cost / denominator,
            export_weight: sell_after_tax / denominator,
        })
    }
}

/// Grid exchange resulting from a change in device power.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridBalance {
    /// Device power added (or removed, if negative) relative to the baseline.
    pub delta: f64,
    /// Net consumption after the change.
    pub new_net: f64,
    /// Power bought from the grid.
    pub grid_import: f64,
    /// Solar surplus left unabsorbed.
    pub grid_export: f64,
}

/// Validated objective weights for one tariff context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TariffWeights {
    net_consumption: f64,
    pub import_weight: f64,
    pub export_weight: f64,
}

impl TariffWeights {
    pub fn balance(&self, total_power: f64, baseline_power: f64) -> GridBalance {
        let delta = total_power - baseline_power;
        let new_net = self.net_consumption + delta;
        GridBalance {
            delta,
            new_net,
            grid_import: new_net.max(0.0),
            grid_export: (-new_net).max(0.0),
        }
    }

    pub fn score(&self, balance: &GridBalance) -> f64 {
        self.import_weight * balance.grid_import + self.export_weight * balance.grid_export
    }

    /// Objective for a solution drawing `total_power` against `baseline_power`.
    pub fn evaluate(&self, total_power: f64, baseline_power: f64) -> f64 {
        self.score(&self.balance(total_power, baseline_power))
    }
}

/// Objective of a solution's devices. Lower is better.
pub fn objective(
    devices: &[DeviceState],
    baseline_power: f64,
    context: &TariffContext,
) -> SolarResult<f64> {
    let weights = context.weights()?;
    Ok(weights.evaluate(total_power(devices), baseline_power))
}
