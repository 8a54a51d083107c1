//! Weighted structural statistics per (building type, period, location,
//! structure type) cell, built on the period-relaxation fallback search.

use serde::{Deserialize, Serialize};

use crate::data::StockDataset;
use crate::domain::{OnMissingData, RunParameters, StockError, StockResult};
use crate::modules::catalog::ComputedStructure;

/// Additive smoothing applied to every frame-material share so weights
/// stay positive when share data is missing.
pub const SHARE_EPSILON: f64 = 1e-6;

/// Normalized weights are re-checked against this tolerance; a miss here
/// is a programming error, not suspect input.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// The fallback search ran out of lookbacks without finding any entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error(
    "no entries dated within [{earliest_year}, {latest_year}] after {probes} probes"
)]
pub struct SearchExhausted {
    pub probes: u32,
    pub earliest_year: i32,
    pub latest_year: i32,
}

/// A successful fallback search: the matching entries and how many times
/// the period lower bound had to be relaxed.
#[derive(Debug, Clone)]
pub struct SearchHit<'a, T> {
    pub entries: Vec<&'a T>,
    pub relaxations: u32,
}

/// Bounded period-relaxation search: accepts entries dated within
/// [period_start - n * lookback_step, period_end], raising n from 0 until
/// something matches or `max_lookbacks` relaxations are exhausted.
pub fn find_relevant_entries<'a, T>(
    candidates: &'a [T],
    year_of: impl Fn(&T) -> i32,
    period_start: i32,
    period_end: i32,
    lookback_step: i32,
    max_lookbacks: u32,
) -> Result<SearchHit<'a, T>, SearchExhausted> {
    for relaxations in 0..=max_lookbacks {
        let lower = period_start - relaxations as i32 * lookback_step;
        let entries: Vec<&T> = candidates
            .iter()
            .filter(|entry| {
                let year = year_of(entry);
                lower <= year && year <= period_end
            })
            .collect();
        if !entries.is_empty() {
            return Ok(SearchHit {
                entries,
                relaxations,
            });
        }
    }
    Err(SearchExhausted {
        probes: max_lookbacks + 1,
        earliest_year: period_start - max_lookbacks as i32 * lookback_step,
        latest_year: period_end,
    })
}

/// Normalized frame-material-share weights for a set of relevant
/// structures. Every share enters with the epsilon added; a structure
/// with no mapped frame material still gets the bare epsilon.
pub fn structure_weights(
    data: &StockDataset,
    relevant: &[&ComputedStructure],
    building_type: &str,
    location: &str,
) -> StockResult<Vec<f64>> {
    let raw: Vec<f64> = relevant
        .iter()
        .map(|entry| {
            let mut weight = 0.0;
            let mut mapped = 0usize;
            for material in &entry.load_bearing_materials {
                for frame_material in data.frame_materials_of(material) {
                    weight += data
                        .frame_share(building_type, location, frame_material)
                        .unwrap_or(0.0)
                        + SHARE_EPSILON;
                    mapped += 1;
                }
            }
            if mapped == 0 { SHARE_EPSILON } else { weight }
        })
        .collect();

    let total: f64 = raw.iter().sum();
    let weights: Vec<f64> = raw.iter().map(|weight| weight / total).collect();

    let normalized_sum: f64 = weights.iter().sum();
    if (normalized_sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(StockError::weight_sum(
            "AGG.WEIGHT_SUM",
            format!(
                "structure weights for ({building_type}, {location}) sum to {normalized_sum}, expected 1"
            ),
        ));
    }
    Ok(weights)
}

/// One output row of the `structure_statistics` relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralStatisticsRow {
    pub building_type: String,
    pub building_period: String,
    pub location: String,
    pub structure_type: String,
    #[serde(rename = "effective_thermal_mass_J_m2K")]
    pub effective_thermal_mass_j_m2k: f64,
    #[serde(rename = "linear_thermal_bridges_W_mK")]
    pub linear_thermal_bridges_w_mk: f64,
    #[serde(rename = "design_U_value_W_m2K")]
    pub design_u_value_w_m2k: f64,
    #[serde(rename = "total_U_value_W_m2K")]
    pub total_u_value_w_m2k: f64,
    #[serde(rename = "external_U_value_to_ambient_air_W_m2K")]
    pub external_u_value_to_ambient_air_w_m2k: f64,
    #[serde(rename = "external_U_value_to_ground_W_m2K")]
    pub external_u_value_to_ground_w_m2k: f64,
    #[serde(rename = "internal_U_value_to_structure_W_m2K")]
    pub internal_u_value_to_structure_w_m2k: f64,
}

/// Distinct (building type, period, location) triples present in the
/// census, name-sorted, respecting the optional location cap.
pub fn census_cells(data: &StockDataset, params: &RunParameters) -> Vec<(String, String, String)> {
    let locations = data.limited_locations(params.location_limit);
    let mut cells: Vec<(String, String, String)> = data
        .census
        .iter()
        .filter(|row| locations.contains(&row.location.as_str()))
        .map(|row| {
            (
                row.building_type.clone(),
                row.building_period.clone(),
                row.location.clone(),
            )
        })
        .collect();
    cells.sort_unstable();
    cells.dedup();
    cells
}

/// Weighted structural statistics over every census cell and structure
/// type.
pub fn aggregate_structural(
    data: &StockDataset,
    catalog: &[ComputedStructure],
    params: &RunParameters,
) -> StockResult<Vec<StructuralStatisticsRow>> {
    let mut type_names: Vec<&str> = data
        .structure_types
        .iter()
        .map(|row| row.name.as_str())
        .collect();
    type_names.sort_unstable();

    let mut rows = Vec::new();
    for (building_type, period_name, location) in census_cells(data, params) {
        let period = data.building_period(&period_name).ok_or_else(|| {
            StockError::data_integrity(
                "DATA.UNKNOWN_PERIOD",
                format!("census references unknown building period '{period_name}'"),
            )
        })?;

        for &type_name in &type_names {
            let requested = data
                .structure_type(type_name)
                .expect("structure type listed from the dataset");
            // Light variants select the catalog entries of their
            // load-bearing original.
            let target_type = requested
                .load_bearing_original
                .as_deref()
                .unwrap_or(type_name);

            let candidates: Vec<&ComputedStructure> = catalog
                .iter()
                .filter(|entry| {
                    entry.structure_type == target_type && entry.applies_to(&building_type)
                })
                .collect();

            let hit = match find_relevant_entries(
                &candidates,
                |entry| entry.year,
                period.period_start,
                period.period_end,
                params.lookback_if_empty_years,
                params.max_lookbacks,
            ) {
                Ok(hit) => hit,
                Err(exhausted) => {
                    let message = format!(
                        "no structural data for ({building_type}, {period_name}, {location}, {type_name}): {exhausted}"
                    );
                    match params.on_missing_data {
                        OnMissingData::Abort => {
                            return Err(StockError::no_applicable_data(
                                "AGG.NO_STRUCTURAL_DATA",
                                message,
                            ));
                        }
                        OnMissingData::Skip => {
                            tracing::warn!("{message}");
                            continue;
                        }
                    }
                }
            };
            if hit.relaxations > 0 {
                tracing::debug!(
                    building_type = %building_type,
                    period = %period_name,
                    location = %location,
                    structure_type = type_name,
                    relaxations = hit.relaxations,
                    "period lower bound relaxed"
                );
            }

            let relevant: Vec<&ComputedStructure> =
                hit.entries.iter().map(|entry| **entry).collect();
            let weights = structure_weights(data, &relevant, &building_type, &location)?;

            let pick = requested.is_load_bearing;
            let mut row = StructuralStatisticsRow {
                building_type: building_type.clone(),
                building_period: period_name.clone(),
                location: location.clone(),
                structure_type: type_name.to_string(),
                effective_thermal_mass_j_m2k: 0.0,
                linear_thermal_bridges_w_mk: 0.0,
                design_u_value_w_m2k: 0.0,
                total_u_value_w_m2k: 0.0,
                external_u_value_to_ambient_air_w_m2k: 0.0,
                external_u_value_to_ground_w_m2k: 0.0,
                internal_u_value_to_structure_w_m2k: 0.0,
            };
            for (entry, weight) in relevant.iter().zip(&weights) {
                row.effective_thermal_mass_j_m2k +=
                    weight * entry.effective_thermal_mass.select(pick);
                row.linear_thermal_bridges_w_mk +=
                    weight * entry.linear_thermal_bridges.select(pick);
                row.design_u_value_w_m2k += weight * entry.design_u_value.select(pick);
                row.total_u_value_w_m2k += weight * entry.u_values.total.select(pick);
                row.external_u_value_to_ambient_air_w_m2k += weight
                    * entry
                        .u_values
                        .exterior
                        .map_or(0.0, |value| value.select(pick));
                row.external_u_value_to_ground_w_m2k += weight
                    * entry
                        .u_values
                        .ground
                        .map_or(0.0, |value| value.select(pick));
                row.internal_u_value_to_structure_w_m2k +=
                    weight * entry.u_values.interior.select(pick);
            }
            rows.push(row);
        }
    }
    Ok(rows)
}
