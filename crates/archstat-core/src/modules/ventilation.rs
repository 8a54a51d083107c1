//! Ventilation and fenestration statistics: min/max-sampled means over
//! the relevant sources, using the same fallback search as the
//! structural aggregation but without frame-material weighting.

use serde::{Deserialize, Serialize};

use crate::data::StockDataset;
use crate::data::model::{FenestrationSourceRow, VentilationSourceRow};
use crate::domain::{OnMissingData, RunParameters, StockError, StockResult};
use crate::modules::statistics::{census_cells, find_relevant_entries};

/// One output row of the `ventilation_and_fenestration_statistics`
/// relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VentilationStatisticsRow {
    pub building_type: String,
    pub building_period: String,
    pub location: String,
    pub ventilation_rate_1_h: f64,
    pub infiltration_rate_1_h: f64,
    #[serde(rename = "HRU_efficiency")]
    pub hru_efficiency: f64,
    #[serde(rename = "window_U_value_W_m2K")]
    pub window_u_value_w_m2k: f64,
    pub total_normal_solar_energy_transmittance: f64,
}

fn sample(minimum: f64, maximum: f64, weight: f64) -> f64 {
    weight * maximum + (1.0 - weight) * minimum
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

fn mean<T>(entries: &[&T], value: impl Fn(&T) -> f64) -> f64 {
    finite_or_zero(entries.iter().map(|entry| value(entry)).sum::<f64>() / entries.len() as f64)
}

/// Ventilation rate and HRU efficiency sample between the source bounds;
/// the infiltration rate divides the sampled air changes at 50 Pa by the
/// sampled infiltration factor.
fn ventilation_values(
    entries: &[&VentilationSourceRow],
    params: &RunParameters,
) -> (f64, f64, f64) {
    let ventilation_rate = mean(entries, |row| {
        sample(
            row.minimum_ventilation_rate_1_h,
            row.maximum_ventilation_rate_1_h,
            params.ventilation_rate_weight,
        )
    });
    let infiltration_rate = mean(entries, |row| {
        let n50 = sample(
            row.minimum_n50_infiltration_rate_1_h,
            row.maximum_n50_infiltration_rate_1_h,
            params.infiltration_rate_weight,
        );
        let factor = sample(
            row.minimum_infiltration_factor,
            row.maximum_infiltration_factor,
            params.infiltration_factor_weight,
        );
        finite_or_zero(n50 / factor)
    });
    let hru_efficiency = mean(entries, |row| {
        sample(
            row.minimum_hru_efficiency,
            row.maximum_hru_efficiency,
            params.hru_efficiency_weight,
        )
    });
    (ventilation_rate, infiltration_rate, hru_efficiency)
}

fn fenestration_values(entries: &[&FenestrationSourceRow]) -> (f64, f64) {
    let window_u_value = mean(entries, |row| {
        (row.minimum_window_u_value + row.maximum_window_u_value) / 2.0
    });
    let solar_transmittance = mean(entries, |row| {
        (1.0 - row.frame_area_fraction) * row.notional_solar_energy_transmittance
    });
    (window_u_value, solar_transmittance)
}

pub fn aggregate_ventilation(
    data: &StockDataset,
    params: &RunParameters,
) -> StockResult<Vec<VentilationStatisticsRow>> {
    let source_year = |name: &str| -> StockResult<i32> {
        data.source(name)
            .map(|row| row.year)
            .ok_or_else(|| {
                StockError::data_integrity(
                    "DATA.UNKNOWN_SOURCE",
                    format!("ventilation/fenestration data references unknown source '{name}'"),
                )
            })
    };

    let mut rows = Vec::new();
    for (building_type, period_name, location) in census_cells(data, params) {
        let period = data.building_period(&period_name).ok_or_else(|| {
            StockError::data_integrity(
                "DATA.UNKNOWN_PERIOD",
                format!("census references unknown building period '{period_name}'"),
            )
        })?;

        let ventilation_candidates: Vec<(i32, &VentilationSourceRow)> = data
            .ventilation_sources
            .iter()
            .filter(|row| row.building_type == building_type)
            .map(|row| Ok((source_year(&row.source)?, row)))
            .collect::<StockResult<_>>()?;
        let fenestration_candidates: Vec<(i32, &FenestrationSourceRow)> = data
            .fenestration_sources
            .iter()
            .filter(|row| row.building_type == building_type)
            .map(|row| Ok((source_year(&row.source)?, row)))
            .collect::<StockResult<_>>()?;

        let ventilation_hit = find_relevant_entries(
            &ventilation_candidates,
            |(year, _)| *year,
            period.period_start,
            period.period_end,
            params.lookback_if_empty_years,
            params.max_lookbacks,
        );
        let fenestration_hit = find_relevant_entries(
            &fenestration_candidates,
            |(year, _)| *year,
            period.period_start,
            period.period_end,
            params.lookback_if_empty_years,
            params.max_lookbacks,
        );

        let (ventilation_hit, fenestration_hit) = match (ventilation_hit, fenestration_hit) {
            (Ok(ventilation), Ok(fenestration)) => (ventilation, fenestration),
            (ventilation, fenestration) => {
                let exhausted = ventilation
                    .err()
                    .or_else(|| fenestration.err())
                    .expect("at least one search failed");
                let message = format!(
                    "no ventilation/fenestration data for ({building_type}, {period_name}, {location}): {exhausted}"
                );
                match params.on_missing_data {
                    OnMissingData::Abort => {
                        return Err(StockError::no_applicable_data(
                            "AGG.NO_VENTILATION_DATA",
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

        let ventilation_entries: Vec<&VentilationSourceRow> = ventilation_hit
            .entries
            .iter()
            .map(|(_, row)| *row)
            .collect();
        let fenestration_entries: Vec<&FenestrationSourceRow> = fenestration_hit
            .entries
            .iter()
            .map(|(_, row)| *row)
            .collect();

        let (ventilation_rate, infiltration_rate, hru_efficiency) =
            ventilation_values(&ventilation_entries, params);
        let (window_u_value, solar_transmittance) = fenestration_values(&fenestration_entries);

        rows.push(VentilationStatisticsRow {
            building_type,
            building_period: period_name,
            location,
            ventilation_rate_1_h: ventilation_rate,
            infiltration_rate_1_h: infiltration_rate,
            hru_efficiency,
            window_u_value_w_m2k: window_u_value,
            total_normal_solar_energy_transmittance: solar_transmittance,
        });
    }
    Ok(rows)
}
