pub mod errors;

pub use errors::{StockError, StockErrorCategory, StockResult};

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul};

/// Two-variant value carried by every structural quantity: one component
/// computed from minimum layer thicknesses, one from load-bearing
/// thicknesses.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Property {
    pub minimum: f64,
    pub load_bearing: f64,
}

impl Property {
    pub const ZERO: Property = Property {
        minimum: 0.0,
        load_bearing: 0.0,
    };

    pub const fn new(minimum: f64, load_bearing: f64) -> Self {
        Self {
            minimum,
            load_bearing,
        }
    }

    /// Both variants set to the same raw value.
    pub const fn splat(value: f64) -> Self {
        Self {
            minimum: value,
            load_bearing: value,
        }
    }

    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            minimum: f(self.minimum),
            load_bearing: f(self.load_bearing),
        }
    }

    /// Selects the variant requested by a structure-type flag.
    pub const fn select(self, load_bearing: bool) -> f64 {
        if load_bearing {
            self.load_bearing
        } else {
            self.minimum
        }
    }
}

impl Add for Property {
    type Output = Property;

    fn add(self, rhs: Property) -> Property {
        Property {
            minimum: self.minimum + rhs.minimum,
            load_bearing: self.load_bearing + rhs.load_bearing,
        }
    }
}

impl AddAssign for Property {
    fn add_assign(&mut self, rhs: Property) {
        self.minimum += rhs.minimum;
        self.load_bearing += rhs.load_bearing;
    }
}

impl Mul<f64> for Property {
    type Output = Property;

    fn mul(self, rhs: f64) -> Property {
        Property {
            minimum: self.minimum * rhs,
            load_bearing: self.load_bearing * rhs,
        }
    }
}

/// Policy for aggregation cells whose fallback search comes up empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnMissingData {
    /// Fail the whole run, naming the dead cell.
    #[default]
    Abort,
    /// Log the dead cell at warn level and omit it from the output.
    Skip,
}

/// Tunable run parameters, validated at the boundary before any
/// computation starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunParameters {
    /// Convex-combination weight between literature min and max thermal
    /// conductivity, 0 = min, 1 = max.
    pub thermal_conductivity_weight: f64,
    /// Assumed depth of the interior temperature node within the interior
    /// layers, 0 = at the interior surface, 1 = at the insulation.
    pub interior_node_depth: f64,
    /// Period of temperature variations in seconds for the effective
    /// thermal mass correction (EN ISO 13786).
    pub variation_period_s: f64,
    pub ventilation_rate_weight: f64,
    pub hru_efficiency_weight: f64,
    pub infiltration_rate_weight: f64,
    pub infiltration_factor_weight: f64,
    /// Years the period lower bound is relaxed per fallback step.
    pub lookback_if_empty_years: i32,
    /// Maximum number of fallback relaxations before a cell is declared
    /// dead.
    pub max_lookbacks: u32,
    pub on_missing_data: OnMissingData,
    /// Optional cap on the number of locations processed, for test runs.
    pub location_limit: Option<usize>,
}

impl Default for RunParameters {
    fn default() -> Self {
        Self {
            thermal_conductivity_weight: 0.5,
            interior_node_depth: 0.5,
            variation_period_s: 2_592_000.0,
            ventilation_rate_weight: 0.5,
            hru_efficiency_weight: 0.5,
            infiltration_rate_weight: 0.5,
            infiltration_factor_weight: 0.5,
            lookback_if_empty_years: 10,
            max_lookbacks: 20,
            on_missing_data: OnMissingData::Abort,
            location_limit: None,
        }
    }
}

impl RunParameters {
    pub fn validate(&self) -> StockResult<()> {
        let unit_interval = [
            (
                "thermal_conductivity_weight",
                self.thermal_conductivity_weight,
            ),
            ("interior_node_depth", self.interior_node_depth),
            ("ventilation_rate_weight", self.ventilation_rate_weight),
            ("hru_efficiency_weight", self.hru_efficiency_weight),
            ("infiltration_rate_weight", self.infiltration_rate_weight),
            (
                "infiltration_factor_weight",
                self.infiltration_factor_weight,
            ),
        ];
        for (field, value) in unit_interval {
            if !(0.0..=1.0).contains(&value) {
                return Err(StockError::input_validation(
                    "INPUT.WEIGHT_RANGE",
                    format!("{field} must lie in [0, 1], got {value}"),
                ));
            }
        }
        if !self.variation_period_s.is_finite() || self.variation_period_s <= 0.0 {
            return Err(StockError::input_validation(
                "INPUT.VARIATION_PERIOD",
                format!(
                    "variation_period_s must be a positive number of seconds, got {}",
                    self.variation_period_s
                ),
            ));
        }
        if self.lookback_if_empty_years <= 0 {
            return Err(StockError::input_validation(
                "INPUT.LOOKBACK_STEP",
                format!(
                    "lookback_if_empty_years must be a positive year count, got {}",
                    self.lookback_if_empty_years
                ),
            ));
        }
        Ok(())
    }

    pub fn validated(self) -> StockResult<Self> {
        self.validate()?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{OnMissingData, Property, RunParameters};

    #[test]
    fn property_arithmetic_is_componentwise() {
        let a = Property::new(1.0, 2.0);
        let b = Property::new(0.5, 0.25);
        assert_eq!(a + b, Property::new(1.5, 2.25));
        assert_eq!(a * 2.0, Property::new(2.0, 4.0));
        assert_eq!(Property::splat(3.0), Property::new(3.0, 3.0));
        assert_eq!(a.select(true), 2.0);
        assert_eq!(a.select(false), 1.0);
    }

    #[test]
    fn default_parameters_validate() {
        let params = RunParameters::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.on_missing_data, OnMissingData::Abort);
    }

    #[test]
    fn out_of_range_weight_is_rejected() {
        let params = RunParameters {
            thermal_conductivity_weight: 1.5,
            ..RunParameters::default()
        };
        let error = params.validate().expect_err("weight outside [0, 1]");
        assert_eq!(error.placeholder(), "INPUT.WEIGHT_RANGE");
    }

    #[test]
    fn non_positive_variation_period_is_rejected() {
        let params = RunParameters {
            variation_period_s: 0.0,
            ..RunParameters::default()
        };
        let error = params.validate().expect_err("zero variation period");
        assert_eq!(error.placeholder(), "INPUT.VARIATION_PERIOD");
    }
}
