//! The structural physical model: effective thermal mass and zone
//! U-values for one (source, structure) pair.

use std::f64::consts::PI;

use crate::data::StockDataset;
use crate::data::model::{HeatFlowDirection, StructureTypeRow};
use crate::domain::{Property, RunParameters, StockError, StockResult};
use crate::modules::layers::{
    PropertyLayer, is_load_bearing, load_bearing_materials, property_layers,
};

/// Per-zone values of one structure. Exterior and ground are present only
/// when the structure has layers facing that zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneValues {
    pub interior: Property,
    pub exterior: Option<Property>,
    pub ground: Option<Property>,
    pub total: Property,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructureProperties {
    pub is_load_bearing_capable: bool,
    pub load_bearing_materials: Vec<String>,
    /// [J/m2K]
    pub effective_thermal_mass: Property,
    /// [W/m2K]
    pub u_values: ZoneValues,
    /// [m2K/W]
    pub r_values: ZoneValues,
}

/// Effective thermal resistance of a ground-coupled envelope per the
/// Kissock correlation, from the total floor resistance `rf` and the
/// perimeter insulation resistance `rp` [m2K/W].
pub fn effective_ground_resistance(rf: f64, rp: f64) -> f64 {
    1.0 / (0.114 / (0.7044 + rf + rp) + 0.8768 / (2.818 + rf))
}

/// Frequency correction of a surface heat capacity per EN ISO 13786
/// Annex C.2.4: the storage reachable through the surface resistance
/// within one variation period.
pub fn effective_thermal_mass_correction(
    capacity: f64,
    surface_resistance: f64,
    variation_period_s: f64,
) -> f64 {
    let angular = 2.0 * PI / variation_period_s;
    capacity / (1.0 + (angular * capacity * surface_resistance).powi(2)).sqrt()
}

/// Runs the full physical model for one (source, structure) pair.
pub fn calculate_structure_properties(
    data: &StockDataset,
    source: &str,
    structure: &str,
    params: &RunParameters,
) -> StockResult<StructureProperties> {
    let type_name = data.type_of_structure(structure).ok_or_else(|| {
        StockError::data_integrity(
            "DATA.MISSING_STRUCTURE_TYPE",
            format!("structure '{structure}' has no structure type assigned"),
        )
    })?;
    let structure_type = data.structure_type(type_name).ok_or_else(|| {
        StockError::data_integrity(
            "DATA.UNKNOWN_STRUCTURE_TYPE",
            format!("structure '{structure}' references unknown structure type '{type_name}'"),
        )
    })?;
    let direction = data
        .flow_direction_of(type_name)
        .unwrap_or(HeatFlowDirection::Horizontal);

    let layers = property_layers(
        data,
        source,
        structure,
        params.thermal_conductivity_weight,
        direction,
    )?;

    let minimum = variant_properties(&layers, structure_type, params, |p| p.minimum);
    let load_bearing = variant_properties(&layers, structure_type, params, |p| p.load_bearing);

    Ok(StructureProperties {
        is_load_bearing_capable: is_load_bearing(data, source, structure),
        load_bearing_materials: load_bearing_materials(data, source, structure),
        effective_thermal_mass: Property::new(minimum.mass, load_bearing.mass),
        u_values: ZoneValues {
            interior: Property::new(minimum.u_interior, load_bearing.u_interior),
            exterior: pair(minimum.u_exterior, load_bearing.u_exterior),
            ground: pair(minimum.u_ground, load_bearing.u_ground),
            total: Property::new(minimum.u_total, load_bearing.u_total),
        },
        r_values: ZoneValues {
            interior: Property::new(minimum.r_interior, load_bearing.r_interior),
            exterior: pair(minimum.r_exterior, load_bearing.r_exterior),
            ground: pair(minimum.r_ground, load_bearing.r_ground),
            total: Property::new(minimum.r_total, load_bearing.r_total),
        },
    })
}

fn pair(minimum: Option<f64>, load_bearing: Option<f64>) -> Option<Property> {
    match (minimum, load_bearing) {
        (Some(minimum), Some(load_bearing)) => Some(Property::new(minimum, load_bearing)),
        (None, None) => None,
        // Zone presence is decided by the layer flags, identical for both
        // variants.
        (minimum, load_bearing) => Some(Property::new(
            minimum.unwrap_or(0.0),
            load_bearing.unwrap_or(0.0),
        )),
    }
}

struct VariantProperties {
    mass: f64,
    r_interior: f64,
    r_exterior: Option<f64>,
    r_ground: Option<f64>,
    r_total: f64,
    u_interior: f64,
    u_exterior: Option<f64>,
    u_ground: Option<f64>,
    u_total: f64,
}

/// The zeroth layer straddles the interior/exterior boundary, so it
/// enters every zone sum at half weight.
fn zone_weight(depth: i32) -> f64 {
    if depth == 0 { 0.5 } else { 1.0 }
}

fn variant_properties(
    layers: &[PropertyLayer],
    structure_type: &StructureTypeRow,
    params: &RunParameters,
    pick: impl Fn(Property) -> f64,
) -> VariantProperties {
    let interior_surface = structure_type.interior_surface_resistance;
    let exterior_surface = structure_type.exterior_surface_resistance;
    let node_depth = params.interior_node_depth;

    let zone_sum = |included: fn(&PropertyLayer) -> bool, value: &dyn Fn(&PropertyLayer) -> f64| {
        layers
            .iter()
            .filter(|layer| included(layer))
            .map(|layer| zone_weight(layer.depth) * value(layer))
            .sum::<f64>()
    };

    // Effective thermal mass from the interior side; internal partitions
    // store heat through both faces.
    let interior_capacity = zone_sum(|l| l.is_interior, &|l| pick(l.heat_capacity));
    let mut mass = effective_thermal_mass_correction(
        interior_capacity,
        interior_surface,
        params.variation_period_s,
    );
    if structure_type.is_internal {
        let exterior_capacity = zone_sum(|l| l.is_exterior, &|l| pick(l.heat_capacity));
        mass += effective_thermal_mass_correction(
            exterior_capacity,
            exterior_surface,
            params.variation_period_s,
        );
    }

    let interior_base = zone_sum(|l| l.is_interior, &|l| pick(l.resistance));
    // The zeroth layer alone does not open a zone; a zone exists only
    // when layers lie strictly beyond the interior/exterior boundary.
    let has_exterior = layers.iter().any(|l| l.is_exterior && l.depth > 0);
    let has_ground = layers.iter().any(|l| l.is_ground && l.depth > 0);

    let mut r_exterior = has_exterior.then(|| {
        zone_sum(|l| l.is_exterior, &|l| pick(l.resistance))
            + exterior_surface
            + (1.0 - node_depth) * interior_base
    });
    let mut r_ground = has_ground.then(|| {
        let floor_resistance = zone_sum(|l| l.is_ground, &|l| pick(l.resistance))
            + interior_base
            + interior_surface;
        effective_ground_resistance(floor_resistance, 0.0) - node_depth * interior_base
    });
    let r_interior = node_depth * interior_base + interior_surface;

    // Exterior and ground act as parallel paths from the interior node;
    // rescale each to the effective portion carried by its own share of
    // the parallel conductance.
    if let (Some(exterior), Some(ground)) = (r_exterior, r_ground) {
        let u_exterior = 1.0 / exterior;
        let u_ground = 1.0 / ground;
        let u_parallel = u_exterior + u_ground;
        r_exterior = Some(exterior * u_parallel / u_exterior);
        r_ground = Some(ground * u_parallel / u_ground);
    }

    let u_interior = 1.0 / r_interior;
    let u_exterior = r_exterior.map(|r| 1.0 / r);
    let u_ground = r_ground.map(|r| 1.0 / r);
    let outward_conductance = u_exterior.unwrap_or(0.0) + u_ground.unwrap_or(0.0);
    // Purely internal structures have no outward path; the total
    // degenerates to the interior value.
    let r_total = if outward_conductance > 0.0 {
        r_interior + 1.0 / outward_conductance
    } else {
        r_interior
    };
    let u_total = 1.0 / r_total;

    VariantProperties {
        mass,
        r_interior,
        r_exterior,
        r_ground,
        r_total,
        u_interior,
        u_exterior,
        u_ground,
        u_total,
    }
}
