//! End-to-end orchestration: validation gate, light-variant injection,
//! catalog build, and the three output statistics relations.

use serde::{Deserialize, Serialize};

use crate::data::StockDataset;
use crate::domain::{RunParameters, StockResult};
use crate::modules::catalog::{CatalogSummary, build_catalog, summarize};
use crate::modules::statistics::{StructuralStatisticsRow, aggregate_structural};
use crate::modules::validate::{IntegrityReport, validate_dataset};
use crate::modules::ventilation::{VentilationStatisticsRow, aggregate_ventilation};

/// One output row of the `building_stock_statistics` relationship.
///
/// The floor-area data lacks the building-stock and heat-source
/// dimensions entirely, so the same per-(type, location, period) value is
/// carried across them. This is a known approximation of the source data
/// and is preserved as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingStockStatisticsRow {
    pub building_stock: String,
    pub building_type: String,
    pub building_period: String,
    pub location: String,
    pub heat_source: String,
    pub number_of_buildings: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_gross_floor_area_m2_per_building: Option<f64>,
}

/// The three §6 output relations, each sorted by its key tuple.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsOutput {
    pub building_stock_statistics: Vec<BuildingStockStatisticsRow>,
    pub structure_statistics: Vec<StructuralStatisticsRow>,
    pub ventilation_and_fenestration_statistics: Vec<VentilationStatisticsRow>,
}

/// Everything one batch pass produces.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub report: IntegrityReport,
    pub catalog_summary: CatalogSummary,
    pub statistics: StatisticsOutput,
}

/// Runs the whole pipeline over one dataset.
///
/// The only mutation is the light structure-type injection, which is
/// idempotent; running `process` twice over the same dataset produces
/// identical output.
pub fn process(data: &mut StockDataset, params: &RunParameters) -> StockResult<ProcessOutcome> {
    params.validate()?;

    let report = validate_dataset(data);
    report.log_violations();
    if !report.is_clean() {
        tracing::warn!(
            violations = report.violations.len(),
            "dataset has integrity violations; continuing"
        );
    }

    // One-time mutation barrier: the catalog and aggregation passes need
    // the light variants in place before they start.
    data.inject_light_structure_types();

    let catalog = build_catalog(data, params)?;
    let catalog_summary = summarize(&catalog);

    let structure_statistics = aggregate_structural(data, &catalog, params)?;
    let ventilation_and_fenestration_statistics = aggregate_ventilation(data, params)?;
    let building_stock_statistics = building_stock_statistics(data, params);

    Ok(ProcessOutcome {
        report,
        catalog_summary,
        statistics: StatisticsOutput {
            building_stock_statistics,
            structure_statistics,
            ventilation_and_fenestration_statistics,
        },
    })
}

/// Census counts joined with the average gross floor areas.
pub fn building_stock_statistics(
    data: &StockDataset,
    params: &RunParameters,
) -> Vec<BuildingStockStatisticsRow> {
    let locations = data.limited_locations(params.location_limit);
    let mut rows: Vec<BuildingStockStatisticsRow> = data
        .census
        .iter()
        .filter(|row| locations.contains(&row.location.as_str()))
        .map(|row| BuildingStockStatisticsRow {
            building_stock: row.building_stock.clone(),
            building_type: row.building_type.clone(),
            building_period: row.building_period.clone(),
            location: row.location.clone(),
            heat_source: row.heat_source.clone(),
            number_of_buildings: row.number_of_buildings,
            average_gross_floor_area_m2_per_building: data.floor_area(
                &row.building_type,
                &row.location,
                &row.building_period,
            ),
        })
        .collect();
    rows.sort_by(|a, b| {
        (
            &a.building_stock,
            &a.building_type,
            &a.building_period,
            &a.location,
            &a.heat_source,
        )
            .cmp(&(
                &b.building_stock,
                &b.building_type,
                &b.building_period,
                &b.location,
                &b.heat_source,
            ))
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::building_stock_statistics;
    use crate::data::StockDataset;
    use crate::data::model::{CensusRow, FloorAreaRow, LocationRow};
    use crate::domain::RunParameters;

    fn census(
        stock: &str,
        building_type: &str,
        period: &str,
        location: &str,
        heat_source: &str,
        count: f64,
    ) -> CensusRow {
        CensusRow {
            building_stock: stock.to_string(),
            building_type: building_type.to_string(),
            building_period: period.to_string(),
            location: location.to_string(),
            heat_source: heat_source.to_string(),
            number_of_buildings: count,
        }
    }

    #[test]
    fn floor_area_is_replicated_across_stock_and_heat_source() {
        let data = StockDataset {
            locations: vec![LocationRow {
                name: "uusimaa".to_string(),
            }],
            census: vec![
                census("2020 stock", "detached house", "1970-1979", "uusimaa", "district", 120.0),
                census("2020 stock", "detached house", "1970-1979", "uusimaa", "electric", 80.0),
            ],
            floor_areas: vec![FloorAreaRow {
                building_type: "detached house".to_string(),
                location: "uusimaa".to_string(),
                building_period: "1970-1979".to_string(),
                average_gross_floor_area_m2: 130.0,
            }],
            ..StockDataset::default()
        };
        let rows = building_stock_statistics(&data, &RunParameters::default());
        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert_eq!(row.average_gross_floor_area_m2_per_building, Some(130.0));
        }
        assert_eq!(rows[0].heat_source, "district");
        assert_eq!(rows[0].number_of_buildings, 120.0);
    }

    #[test]
    fn location_cap_drops_census_rows() {
        let data = StockDataset {
            locations: vec![
                LocationRow {
                    name: "lappi".to_string(),
                },
                LocationRow {
                    name: "uusimaa".to_string(),
                },
            ],
            census: vec![
                census("2020 stock", "detached house", "1970-1979", "uusimaa", "district", 120.0),
                census("2020 stock", "detached house", "1970-1979", "lappi", "district", 40.0),
            ],
            ..StockDataset::default()
        };
        let params = RunParameters {
            location_limit: Some(1),
            ..RunParameters::default()
        };
        let rows = building_stock_statistics(&data, &params);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].location, "lappi");
    }
}
