//! The in-memory catalog of computed structures, one entry per
//! (source, structure) pair that applies to at least one building type.

use serde::Serialize;

use crate::data::StockDataset;
use crate::domain::{Property, RunParameters, StockResult};
use crate::modules::layers::total_applicability_weight;
use crate::modules::structural::{ZoneValues, calculate_structure_properties};

/// One fully computed structure. The catalog is an unordered collection;
/// lookups filter it, never mutate it.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedStructure {
    /// "source:structure"
    pub name: String,
    pub source: String,
    pub structure: String,
    pub structure_type: String,
    /// Representative year of the source document.
    pub year: i32,
    pub is_internal: bool,
    pub is_load_bearing_capable: bool,
    pub load_bearing_materials: Vec<String>,
    /// Design U-value as stated by the source document, zero when the
    /// source does not state one [W/m2K].
    pub design_u_value: Property,
    /// Copied from the structure type [W/mK].
    pub linear_thermal_bridges: Property,
    /// [J/m2K]
    pub effective_thermal_mass: Property,
    pub u_values: ZoneValues,
    /// Building types this structure applies to with positive weight.
    pub building_types: Vec<String>,
}

impl ComputedStructure {
    pub fn applies_to(&self, building_type: &str) -> bool {
        self.building_types.iter().any(|bt| bt == building_type)
    }
}

/// Serializable summary of one catalog entry, for run diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogSummary {
    pub entries: usize,
    pub load_bearing_entries: usize,
    pub internal_entries: usize,
}

/// Builds the catalog over every (source, structure) pair in the raw data
/// whose total applicability weight is positive. The light structure-type
/// injection must have completed before this runs.
pub fn build_catalog(
    data: &StockDataset,
    params: &RunParameters,
) -> StockResult<Vec<ComputedStructure>> {
    let mut pairs: Vec<(&str, &str)> = data
        .structure_descriptions
        .iter()
        .map(|row| (row.source.as_str(), row.structure.as_str()))
        .collect();
    pairs.sort_unstable();
    pairs.dedup();

    let mut catalog = Vec::new();
    for (source, structure) in pairs {
        if total_applicability_weight(data, source, structure) <= 0.0 {
            tracing::debug!(source, structure, "skipping structure without applicability");
            continue;
        }
        let Some(type_name) = data.type_of_structure(structure) else {
            tracing::debug!(source, structure, "skipping structure without a type");
            continue;
        };
        let Some(structure_type) = data.structure_type(type_name) else {
            tracing::debug!(
                source,
                structure,
                type_name,
                "skipping structure with unknown type"
            );
            continue;
        };
        let Some(source_row) = data.source(source) else {
            tracing::debug!(source, structure, "skipping structure with unknown source");
            continue;
        };

        let properties = calculate_structure_properties(data, source, structure, params)?;

        let mut building_types: Vec<String> = data
            .applicability_of(source, structure)
            .filter(|row| row.weight.is_some_and(|weight| weight > 0.0))
            .map(|row| row.building_type.clone())
            .collect();
        building_types.sort_unstable();
        building_types.dedup();

        let design_u_value = data
            .structure_descriptions
            .iter()
            .find(|row| row.source == source && row.structure == structure)
            .and_then(|row| row.design_u_value)
            .unwrap_or(0.0);

        catalog.push(ComputedStructure {
            name: format!("{source}:{structure}"),
            source: source.to_string(),
            structure: structure.to_string(),
            structure_type: type_name.to_string(),
            year: source_row.year,
            is_internal: structure_type.is_internal,
            is_load_bearing_capable: properties.is_load_bearing_capable,
            load_bearing_materials: properties.load_bearing_materials,
            design_u_value: Property::splat(design_u_value),
            linear_thermal_bridges: Property::splat(structure_type.linear_thermal_bridge),
            effective_thermal_mass: properties.effective_thermal_mass,
            u_values: properties.u_values,
            building_types,
        });
    }

    tracing::info!(entries = catalog.len(), "structure catalog built");
    Ok(catalog)
}

pub fn summarize(catalog: &[ComputedStructure]) -> CatalogSummary {
    CatalogSummary {
        entries: catalog.len(),
        load_bearing_entries: catalog
            .iter()
            .filter(|entry| entry.is_load_bearing_capable)
            .count(),
        internal_entries: catalog.iter().filter(|entry| entry.is_internal).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::build_catalog;
    use crate::data::StockDataset;
    use crate::data::model::{
        ApplicabilityRow, HeatFlowDirection, LayerRow, LayerTag, MaterialRow, SourceRow,
        StructureDescriptionRow, StructureRow, StructureTypeRow, TypeAssignmentRow,
        TypeFlowDirectionRow,
    };
    use crate::domain::RunParameters;

    fn dataset() -> StockDataset {
        StockDataset {
            materials: vec![MaterialRow {
                name: "concrete".to_string(),
                minimum_density: 2300.0,
                maximum_density: 2300.0,
                minimum_specific_heat_capacity: 1000.0,
                maximum_specific_heat_capacity: 1000.0,
                minimum_thermal_conductivity: 1.0,
                maximum_thermal_conductivity: 1.0,
            }],
            sources: vec![SourceRow {
                name: "RT 1970".to_string(),
                year: 1970,
            }],
            structures: vec![
                StructureRow {
                    name: "wall a".to_string(),
                },
                StructureRow {
                    name: "wall b".to_string(),
                },
            ],
            structure_types: vec![StructureTypeRow {
                name: "exterior wall".to_string(),
                interior_surface_resistance: 0.13,
                exterior_surface_resistance: 0.04,
                linear_thermal_bridge: 0.05,
                is_internal: false,
                is_load_bearing: true,
                load_bearing_original: None,
                notes: String::new(),
            }],
            structure_descriptions: vec![
                StructureDescriptionRow {
                    source: "RT 1970".to_string(),
                    structure: "wall a".to_string(),
                    design_u_value: Some(0.4),
                },
                StructureDescriptionRow {
                    source: "RT 1970".to_string(),
                    structure: "wall b".to_string(),
                    design_u_value: None,
                },
            ],
            layers: ["wall a", "wall b"]
                .iter()
                .map(|structure| LayerRow {
                    source: "RT 1970".to_string(),
                    structure: structure.to_string(),
                    layer_id: "core".to_string(),
                    material: "concrete".to_string(),
                    layer_number: 0,
                    layer_tag: LayerTag::LoadBearingStructure,
                    layer_weight: 1.0,
                    minimum_thickness_mm: Some(100.0),
                    load_bearing_thickness_mm: Some(150.0),
                })
                .collect(),
            applicability: vec![
                ApplicabilityRow {
                    source: "RT 1970".to_string(),
                    structure: "wall a".to_string(),
                    building_type: "detached house".to_string(),
                    weight: Some(1.0),
                },
                // wall b applies nowhere: excluded from the catalog.
                ApplicabilityRow {
                    source: "RT 1970".to_string(),
                    structure: "wall b".to_string(),
                    building_type: "detached house".to_string(),
                    weight: Some(0.0),
                },
            ],
            type_assignments: vec![
                TypeAssignmentRow {
                    structure: "wall a".to_string(),
                    structure_type: "exterior wall".to_string(),
                },
                TypeAssignmentRow {
                    structure: "wall b".to_string(),
                    structure_type: "exterior wall".to_string(),
                },
            ],
            type_flow_directions: vec![TypeFlowDirectionRow {
                structure_type: "exterior wall".to_string(),
                direction: HeatFlowDirection::Horizontal,
            }],
            ..StockDataset::default()
        }
    }

    #[test]
    fn zero_weight_structures_are_excluded() {
        let data = dataset();
        let catalog = build_catalog(&data, &RunParameters::default()).unwrap();
        assert_eq!(catalog.len(), 1);
        let entry = &catalog[0];
        assert_eq!(entry.name, "RT 1970:wall a");
        assert_eq!(entry.year, 1970);
        assert_eq!(entry.structure_type, "exterior wall");
        assert_eq!(entry.building_types, vec!["detached house"]);
        assert_eq!(entry.design_u_value.minimum, 0.4);
        assert_eq!(entry.linear_thermal_bridges.minimum, 0.05);
        assert!(entry.is_load_bearing_capable);
    }
}
