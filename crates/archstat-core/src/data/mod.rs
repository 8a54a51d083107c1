pub mod model;

pub use model::{
    ApplicabilityRow, BuildingPeriodRow, BuildingStockRow, BuildingTypeRow, CensusRow,
    FenestrationSourceRow, FloorAreaRow, FrameMaterialMapRow, FrameMaterialRow, FrameShareRow,
    HeatFlowDirection, HeatSourceRow, LayerRow, LayerTag, LocationRow, MaterialRow, SourceRow,
    StructureDescriptionRow, StructureRow, StructureTypeRow, TypeAssignmentRow,
    TypeFlowDirectionRow, VentilationSourceRow,
};

use serde::{Deserialize, Serialize};

/// Name prefix of the programmatically injected non-load-bearing
/// structure-type variants.
pub const LIGHT_VARIANT_PREFIX: &str = "light ";

/// The full raw dataset, loaded by the external store boundary into
/// addressable in-memory collections. Object classes are keyed by name,
/// relationship classes by their member tuple; the core never touches
/// files or the network itself.
///
/// Everything is read-only for the duration of a run except the one-time
/// light structure-type injection, which must complete before the catalog
/// pass starts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockDataset {
    pub materials: Vec<MaterialRow>,
    pub sources: Vec<SourceRow>,
    pub structures: Vec<StructureRow>,
    pub structure_types: Vec<StructureTypeRow>,
    pub building_types: Vec<BuildingTypeRow>,
    pub building_periods: Vec<BuildingPeriodRow>,
    pub locations: Vec<LocationRow>,
    pub frame_materials: Vec<FrameMaterialRow>,
    pub heat_sources: Vec<HeatSourceRow>,
    pub building_stocks: Vec<BuildingStockRow>,
    pub structure_descriptions: Vec<StructureDescriptionRow>,
    pub layers: Vec<LayerRow>,
    pub applicability: Vec<ApplicabilityRow>,
    pub type_assignments: Vec<TypeAssignmentRow>,
    pub frame_material_map: Vec<FrameMaterialMapRow>,
    pub type_flow_directions: Vec<TypeFlowDirectionRow>,
    pub ventilation_sources: Vec<VentilationSourceRow>,
    pub fenestration_sources: Vec<FenestrationSourceRow>,
    pub census: Vec<CensusRow>,
    pub floor_areas: Vec<FloorAreaRow>,
    pub frame_shares: Vec<FrameShareRow>,
}

impl StockDataset {
    pub fn material(&self, name: &str) -> Option<&MaterialRow> {
        self.materials.iter().find(|row| row.name == name)
    }

    pub fn source(&self, name: &str) -> Option<&SourceRow> {
        self.sources.iter().find(|row| row.name == name)
    }

    pub fn structure_type(&self, name: &str) -> Option<&StructureTypeRow> {
        self.structure_types.iter().find(|row| row.name == name)
    }

    pub fn building_period(&self, name: &str) -> Option<&BuildingPeriodRow> {
        self.building_periods.iter().find(|row| row.name == name)
    }

    /// Layers of one (source, structure) pair, in raw order.
    pub fn layers_of<'a>(
        &'a self,
        source: &str,
        structure: &str,
    ) -> impl Iterator<Item = &'a LayerRow> {
        let source = source.to_string();
        let structure = structure.to_string();
        self.layers
            .iter()
            .filter(move |row| row.source == source && row.structure == structure)
    }

    pub fn applicability_of<'a>(
        &'a self,
        source: &str,
        structure: &str,
    ) -> impl Iterator<Item = &'a ApplicabilityRow> {
        let source = source.to_string();
        let structure = structure.to_string();
        self.applicability
            .iter()
            .filter(move |row| row.source == source && row.structure == structure)
    }

    /// The structure type assigned to a structure, if any. Validated
    /// elsewhere to be unique per structure.
    pub fn type_of_structure(&self, structure: &str) -> Option<&str> {
        self.type_assignments
            .iter()
            .find(|row| row.structure == structure)
            .map(|row| row.structure_type.as_str())
    }

    /// Frame materials a construction material maps to.
    pub fn frame_materials_of<'a>(&'a self, material: &str) -> impl Iterator<Item = &'a str> {
        let material = material.to_string();
        self.frame_material_map
            .iter()
            .filter(move |row| row.material == material)
            .map(|row| row.frame_material.as_str())
    }

    /// Assumed air-gap heat-flow direction for a structure type. Light
    /// variants inherit the direction of their load-bearing original.
    pub fn flow_direction_of(&self, structure_type: &str) -> Option<HeatFlowDirection> {
        let direct = self
            .type_flow_directions
            .iter()
            .find(|row| row.structure_type == structure_type)
            .map(|row| row.direction);
        if direct.is_some() {
            return direct;
        }
        self.structure_type(structure_type)
            .and_then(|row| row.load_bearing_original.as_deref())
            .and_then(|original| {
                self.type_flow_directions
                    .iter()
                    .find(|row| row.structure_type == original)
                    .map(|row| row.direction)
            })
    }

    pub fn frame_share(
        &self,
        building_type: &str,
        location: &str,
        frame_material: &str,
    ) -> Option<f64> {
        self.frame_shares
            .iter()
            .find(|row| {
                row.building_type == building_type
                    && row.location == location
                    && row.frame_material == frame_material
            })
            .map(|row| row.share)
    }

    pub fn floor_area(
        &self,
        building_type: &str,
        location: &str,
        building_period: &str,
    ) -> Option<f64> {
        self.floor_areas
            .iter()
            .find(|row| {
                row.building_type == building_type
                    && row.location == location
                    && row.building_period == building_period
            })
            .map(|row| row.average_gross_floor_area_m2)
    }

    /// Injects the non-load-bearing "light" variant of every raw structure
    /// type. The clone shares all numeric properties, is flagged
    /// `is_load_bearing = false` and maps back to its original for catalog
    /// lookups. Must run to completion before the catalog pass; repeated
    /// calls are no-ops so a dataset can be processed more than once.
    pub fn inject_light_structure_types(&mut self) {
        let mut originals: Vec<StructureTypeRow> = self
            .structure_types
            .iter()
            .filter(|row| row.is_load_bearing && row.load_bearing_original.is_none())
            .cloned()
            .collect();
        originals.sort_by(|a, b| a.name.cmp(&b.name));

        for original in originals {
            let light_name = format!("{LIGHT_VARIANT_PREFIX}{}", original.name);
            if self.structure_type(&light_name).is_some() {
                continue;
            }
            self.structure_types.push(StructureTypeRow {
                name: light_name,
                interior_surface_resistance: original.interior_surface_resistance,
                exterior_surface_resistance: original.exterior_surface_resistance,
                linear_thermal_bridge: original.linear_thermal_bridge,
                is_internal: original.is_internal,
                is_load_bearing: false,
                load_bearing_original: Some(original.name.clone()),
                notes: original.notes.clone(),
            });
        }
    }

    /// Locations in name order, capped by the optional test limit.
    pub fn limited_locations(&self, limit: Option<usize>) -> Vec<&str> {
        let mut names: Vec<&str> = self.locations.iter().map(|row| row.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        if let Some(limit) = limit {
            names.truncate(limit);
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::{LIGHT_VARIANT_PREFIX, StockDataset};
    use crate::data::model::{HeatFlowDirection, StructureTypeRow, TypeFlowDirectionRow};

    fn dataset_with_one_type() -> StockDataset {
        StockDataset {
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
            type_flow_directions: vec![TypeFlowDirectionRow {
                structure_type: "exterior wall".to_string(),
                direction: HeatFlowDirection::Horizontal,
            }],
            ..StockDataset::default()
        }
    }

    #[test]
    fn light_injection_clones_numeric_properties() {
        let mut data = dataset_with_one_type();
        data.inject_light_structure_types();

        let light_name = format!("{LIGHT_VARIANT_PREFIX}exterior wall");
        let light = data.structure_type(&light_name).expect("light variant");
        assert!(!light.is_load_bearing);
        assert_eq!(light.load_bearing_original.as_deref(), Some("exterior wall"));
        assert_eq!(light.interior_surface_resistance, 0.13);
        assert_eq!(light.exterior_surface_resistance, 0.04);
    }

    #[test]
    fn light_injection_is_idempotent() {
        let mut data = dataset_with_one_type();
        data.inject_light_structure_types();
        let after_first = data.clone();
        data.inject_light_structure_types();
        assert_eq!(data, after_first);
    }

    #[test]
    fn light_variant_inherits_flow_direction() {
        let mut data = dataset_with_one_type();
        data.inject_light_structure_types();
        let light_name = format!("{LIGHT_VARIANT_PREFIX}exterior wall");
        assert_eq!(
            data.flow_direction_of(&light_name),
            Some(HeatFlowDirection::Horizontal)
        );
    }
}
