//! Material property resolution from literature min/max ranges.

use crate::data::model::MaterialRow;

/// Name of the distinguished material whose resistance comes from the air
/// gap lookup instead of its conductivity.
pub const VENTILATION_SPACE_MATERIAL: &str = "ventilation space";

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum MaterialError {
    #[error("thermal conductivity weight must lie in [0, 1], got {weight}")]
    WeightOutOfRange { weight: f64 },
}

/// Arithmetic mean of the literature density range [kg/m3].
pub fn mean_density(material: &MaterialRow) -> f64 {
    (material.minimum_density + material.maximum_density) / 2.0
}

/// Arithmetic mean of the literature specific heat capacity range [J/kgK].
pub fn mean_specific_heat_capacity(material: &MaterialRow) -> f64 {
    (material.minimum_specific_heat_capacity + material.maximum_specific_heat_capacity) / 2.0
}

/// Convex combination of the literature conductivity range [W/mK]:
/// weight 0 selects the minimum, weight 1 the maximum.
pub fn weighted_thermal_conductivity(
    material: &MaterialRow,
    weight: f64,
) -> Result<f64, MaterialError> {
    if !(0.0..=1.0).contains(&weight) {
        return Err(MaterialError::WeightOutOfRange { weight });
    }
    Ok(weight * material.maximum_thermal_conductivity
        + (1.0 - weight) * material.minimum_thermal_conductivity)
}

#[cfg(test)]
mod tests {
    use super::{
        MaterialError, mean_density, mean_specific_heat_capacity, weighted_thermal_conductivity,
    };
    use crate::data::model::MaterialRow;

    fn mineral_wool() -> MaterialRow {
        MaterialRow {
            name: "mineral wool".to_string(),
            minimum_density: 20.0,
            maximum_density: 40.0,
            minimum_specific_heat_capacity: 800.0,
            maximum_specific_heat_capacity: 900.0,
            minimum_thermal_conductivity: 0.034,
            maximum_thermal_conductivity: 0.045,
        }
    }

    #[test]
    fn means_are_arithmetic() {
        let material = mineral_wool();
        assert_eq!(mean_density(&material), 30.0);
        assert_eq!(mean_specific_heat_capacity(&material), 850.0);
    }

    #[test]
    fn conductivity_endpoints_match_the_range() {
        let material = mineral_wool();
        assert_eq!(
            weighted_thermal_conductivity(&material, 0.0).unwrap(),
            0.034
        );
        assert_eq!(
            weighted_thermal_conductivity(&material, 1.0).unwrap(),
            0.045
        );
    }

    #[test]
    fn conductivity_is_monotonic_in_the_weight() {
        let material = mineral_wool();
        let mut previous = f64::NEG_INFINITY;
        for step in 0..=10 {
            let weight = f64::from(step) / 10.0;
            let conductivity = weighted_thermal_conductivity(&material, weight).unwrap();
            assert!(conductivity >= previous);
            previous = conductivity;
        }
    }

    #[test]
    fn out_of_range_weight_is_rejected() {
        let material = mineral_wool();
        assert_eq!(
            weighted_thermal_conductivity(&material, 1.5),
            Err(MaterialError::WeightOutOfRange { weight: 1.5 })
        );
        assert_eq!(
            weighted_thermal_conductivity(&material, -0.1),
            Err(MaterialError::WeightOutOfRange { weight: -0.1 })
        );
    }
}
