//! Layer ordering, zone classification and per-depth property
//! aggregation for one (source, structure) pair.

use crate::data::StockDataset;
use crate::data::model::{HeatFlowDirection, LayerRow, LayerTag};
use crate::domain::{Property, StockError, StockResult};
use crate::modules::materials::{
    VENTILATION_SPACE_MATERIAL, mean_density, mean_specific_heat_capacity,
    weighted_thermal_conductivity,
};

/// Layers of one structure sorted by depth index, with the distinct
/// indices in ascending order.
#[derive(Debug, Clone)]
pub struct OrderedLayers<'a> {
    pub layers: Vec<&'a LayerRow>,
    pub depths: Vec<i32>,
}

pub fn order_layers<'a>(
    data: &'a StockDataset,
    source: &str,
    structure: &str,
) -> OrderedLayers<'a> {
    let mut layers: Vec<&LayerRow> = data.layers_of(source, structure).collect();
    layers.sort_by(|a, b| {
        (a.layer_number, &a.layer_id, &a.material).cmp(&(b.layer_number, &b.layer_id, &b.material))
    });

    let mut depths: Vec<i32> = layers.iter().map(|layer| layer.layer_number).collect();
    depths.dedup();

    OrderedLayers { layers, depths }
}

/// A structure can carry load iff any of its layers has a defined
/// load-bearing thickness.
pub fn is_load_bearing(data: &StockDataset, source: &str, structure: &str) -> bool {
    data.layers_of(source, structure)
        .any(|layer| layer.load_bearing_thickness_mm.is_some())
}

/// Materials of the load-carrying layers, sorted and deduplicated.
pub fn load_bearing_materials(data: &StockDataset, source: &str, structure: &str) -> Vec<String> {
    let mut materials: Vec<String> = data
        .layers_of(source, structure)
        .filter(|layer| layer.load_bearing_thickness_mm.is_some())
        .map(|layer| layer.material.clone())
        .collect();
    materials.sort_unstable();
    materials.dedup();
    materials
}

/// Summed applicability weight across all building types, the gate for
/// processing a structure at all (must be > 0).
pub fn total_applicability_weight(data: &StockDataset, source: &str, structure: &str) -> f64 {
    data.applicability_of(source, structure)
        .map(|row| row.weight.unwrap_or(0.0))
        .sum()
}

/// Combined thermal properties of all layers sharing one depth index,
/// with the zone flags derived from the structure's boundary layers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyLayer {
    pub depth: i32,
    /// [m2K/W]
    pub resistance: Property,
    /// [J/m2K]
    pub heat_capacity: Property,
    pub is_interior: bool,
    pub is_exterior: bool,
    pub is_ground: bool,
}

/// Builds the ordered, classified property layers of one structure.
pub fn property_layers(
    data: &StockDataset,
    source: &str,
    structure: &str,
    conductivity_weight: f64,
    direction: HeatFlowDirection,
) -> StockResult<Vec<PropertyLayer>> {
    let ordered = order_layers(data, source, structure);

    let exterior_boundary = ordered
        .layers
        .iter()
        .filter(|layer| layer.layer_tag.is_exterior_boundary())
        .map(|layer| layer.layer_number)
        .min();
    let ground_boundary = ordered
        .layers
        .iter()
        .filter(|layer| layer.layer_tag == LayerTag::Ground)
        .map(|layer| layer.layer_number)
        .min();

    let mut result = Vec::with_capacity(ordered.depths.len());
    for &depth in &ordered.depths {
        let group: Vec<&&LayerRow> = ordered
            .layers
            .iter()
            .filter(|layer| layer.layer_number == depth)
            .collect();

        let mut minimum_conductance = 0.0;
        let mut load_bearing_conductance = 0.0;
        let mut minimum_capacity = 0.0;
        let mut load_bearing_capacity = 0.0;
        for layer in &group {
            let minimum_resistance = layer_resistance(
                data,
                layer,
                layer.minimum_thickness_mm,
                conductivity_weight,
                direction,
            )?;
            let load_bearing_resistance = layer_resistance(
                data,
                layer,
                layer.load_bearing_thickness_mm,
                conductivity_weight,
                direction,
            )?;
            minimum_conductance += layer.layer_weight / minimum_resistance;
            load_bearing_conductance += layer.layer_weight / load_bearing_resistance;

            minimum_capacity +=
                layer.layer_weight * layer_heat_capacity(data, layer, layer.minimum_thickness_mm)?;
            load_bearing_capacity += layer.layer_weight
                * layer_heat_capacity(data, layer, layer.load_bearing_thickness_mm)?;
        }

        let mut resistance = Property::new(
            finite_or_zero(1.0 / minimum_conductance),
            finite_or_zero(1.0 / load_bearing_conductance),
        );
        let mut heat_capacity = Property::new(
            finite_or_zero(minimum_capacity),
            finite_or_zero(load_bearing_capacity),
        );
        // Load-bearing thickness is assumed >= minimum thickness, so a
        // degenerate load-bearing variant reverts to the minimum one.
        if resistance.load_bearing == 0.0 {
            resistance.load_bearing = resistance.minimum;
        }
        if heat_capacity.load_bearing == 0.0 {
            heat_capacity.load_bearing = heat_capacity.minimum;
        }

        let is_ground = ground_boundary
            .is_some_and(|g| depth >= 0 && (exterior_boundary.is_none() || depth >= g));
        let is_exterior = depth >= 0
            && !(ground_boundary.is_some() && exterior_boundary.is_none())
            && ground_boundary.is_none_or(|g| depth < g);

        result.push(PropertyLayer {
            depth,
            resistance,
            heat_capacity,
            is_interior: depth <= 0,
            is_exterior,
            is_ground,
        });
    }

    Ok(result)
}

/// Resistance of one homogeneous layer [m2K/W]. A ventilation space is
/// read from the air-gap table by its width; everything else is
/// thickness over weighted conductivity.
fn layer_resistance(
    data: &StockDataset,
    layer: &LayerRow,
    thickness_mm: Option<f64>,
    conductivity_weight: f64,
    direction: HeatFlowDirection,
) -> StockResult<f64> {
    let thickness_mm = thickness_mm.unwrap_or(0.0);
    if layer.material == VENTILATION_SPACE_MATERIAL {
        return Ok(crate::common::air_gap_resistance(thickness_mm, direction));
    }
    let material = data.material(&layer.material).ok_or_else(|| {
        StockError::data_integrity(
            "DATA.UNKNOWN_MATERIAL",
            format!(
                "layer '{}' of {}:{} references unknown material '{}'",
                layer.layer_id, layer.source, layer.structure, layer.material
            ),
        )
    })?;
    let conductivity =
        weighted_thermal_conductivity(material, conductivity_weight).map_err(|error| {
            StockError::input_validation("INPUT.CONDUCTIVITY_WEIGHT", error.to_string())
        })?;
    Ok(thickness_mm * 1e-3 / conductivity)
}

/// Areal heat capacity of one homogeneous layer [J/m2K].
fn layer_heat_capacity(
    data: &StockDataset,
    layer: &LayerRow,
    thickness_mm: Option<f64>,
) -> StockResult<f64> {
    let material = data.material(&layer.material).ok_or_else(|| {
        StockError::data_integrity(
            "DATA.UNKNOWN_MATERIAL",
            format!(
                "layer '{}' of {}:{} references unknown material '{}'",
                layer.layer_id, layer.source, layer.structure, layer.material
            ),
        )
    })?;
    Ok(mean_specific_heat_capacity(material)
        * mean_density(material)
        * thickness_mm.unwrap_or(0.0)
        * 1e-3)
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
