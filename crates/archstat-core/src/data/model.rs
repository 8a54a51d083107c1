use serde::{Deserialize, Serialize};

/// Assumed heat-flow direction through a ventilation air gap, one of the
/// `ventilation_space_heat_flow_direction` objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatFlowDirection {
    Upwards,
    Horizontal,
    Downwards,
}

/// Purpose tag of one structural layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerTag {
    LoadBearingStructure,
    ThermalInsulation,
    InteriorFinish,
    ExteriorFinish,
    Ground,
    CrawlSpace,
    Other,
}

impl LayerTag {
    /// Tags marking the ambient-facing boundary of a structure.
    pub const fn is_exterior_boundary(self) -> bool {
        matches!(self, Self::ExteriorFinish | Self::CrawlSpace)
    }
}

/// One `structure_material` object: a construction material with its
/// literature min/max property ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRow {
    pub name: String,
    /// [kg/m3]
    pub minimum_density: f64,
    pub maximum_density: f64,
    /// [J/kgK]
    pub minimum_specific_heat_capacity: f64,
    pub maximum_specific_heat_capacity: f64,
    /// [W/mK]
    pub minimum_thermal_conductivity: f64,
    pub maximum_thermal_conductivity: f64,
}

/// One `source` object: a document the structures or ventilation data were
/// taken from, carrying its representative year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRow {
    pub name: String,
    pub year: i32,
}

/// One `structure` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureRow {
    pub name: String,
}

/// One `structure_type` object, e.g. exterior wall, roof, base floor or
/// partition wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureTypeRow {
    pub name: String,
    /// [m2K/W]
    pub interior_surface_resistance: f64,
    pub exterior_surface_resistance: f64,
    /// [W/mK]
    pub linear_thermal_bridge: f64,
    /// True for partitions and separating floors that do not face ambient
    /// air or ground.
    pub is_internal: bool,
    /// False only for the programmatically injected light variants.
    #[serde(default = "default_true")]
    pub is_load_bearing: bool,
    /// Light variants map back to their load-bearing original here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_bearing_original: Option<String>,
    #[serde(default)]
    pub notes: String,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingTypeRow {
    pub name: String,
}

/// One `building_period` object: a construction-year interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingPeriodRow {
    pub name: String,
    pub period_start: i32,
    pub period_end: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRow {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameMaterialRow {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatSourceRow {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingStockRow {
    pub name: String,
}

/// One row of the `source__structure` relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureDescriptionRow {
    pub source: String,
    pub structure: String,
    /// Design U-value as stated by the source document [W/m2K].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design_u_value: Option<f64>,
}

/// One row of the `source__structure__layer__structure_material`
/// relationship: a single material slice of a structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerRow {
    pub source: String,
    pub structure: String,
    pub layer_id: String,
    pub material: String,
    /// Depth index: 0 = primary insulation layer, negative = toward the
    /// interior, positive = toward exterior or ground. Layers sharing an
    /// index are parallel sub-layers.
    pub layer_number: i32,
    pub layer_tag: LayerTag,
    /// Area fraction within a shared depth index; fractions of one index
    /// sum to one.
    pub layer_weight: f64,
    /// [mm]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_thickness_mm: Option<f64>,
    /// [mm], defined only for layers that can carry load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_bearing_thickness_mm: Option<f64>,
}

/// One row of the `source__structure__building_type` relationship: how
/// strongly a structure design applies to a building type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicabilityRow {
    pub source: String,
    pub structure: String,
    pub building_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

/// One row of the `structure__structure_type` relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeAssignmentRow {
    pub structure: String,
    pub structure_type: String,
}

/// One row of the `structure_material__frame_material` relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameMaterialMapRow {
    pub material: String,
    pub frame_material: String,
}

/// One row of the `structure_type__ventilation_space_heat_flow_direction`
/// relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeFlowDirectionRow {
    pub structure_type: String,
    pub direction: HeatFlowDirection,
}

/// One row of the `ventilation_source__building_type` relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VentilationSourceRow {
    pub source: String,
    pub building_type: String,
    /// [1/h]
    #[serde(default)]
    pub minimum_ventilation_rate_1_h: f64,
    #[serde(default)]
    pub maximum_ventilation_rate_1_h: f64,
    /// Air changes at 50 Pa [1/h].
    #[serde(default)]
    pub minimum_n50_infiltration_rate_1_h: f64,
    #[serde(default)]
    pub maximum_n50_infiltration_rate_1_h: f64,
    /// Divisor turning an n50 rate into an infiltration rate.
    #[serde(default)]
    pub minimum_infiltration_factor: f64,
    #[serde(default)]
    pub maximum_infiltration_factor: f64,
    #[serde(default)]
    pub minimum_hru_efficiency: f64,
    #[serde(default)]
    pub maximum_hru_efficiency: f64,
}

/// One row of the `fenestration_source__building_type` relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FenestrationSourceRow {
    pub source: String,
    pub building_type: String,
    /// [W/m2K]
    pub minimum_window_u_value: f64,
    pub maximum_window_u_value: f64,
    /// Fraction of the window area taken by the frame.
    pub frame_area_fraction: f64,
    /// Solar energy transmittance of the glazed part.
    pub notional_solar_energy_transmittance: f64,
}

/// One row of the building-stock census relationship
/// (`building_stock__building_type__building_period__location__heat_source`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CensusRow {
    pub building_stock: String,
    pub building_type: String,
    pub building_period: String,
    pub location: String,
    pub heat_source: String,
    pub number_of_buildings: f64,
}

/// One row of the `building_type__location__building_period` relationship
/// carrying average gross floor areas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorAreaRow {
    pub building_type: String,
    pub location: String,
    pub building_period: String,
    /// [m2] per building.
    pub average_gross_floor_area_m2: f64,
}

/// One row of the `building_type__location__frame_material` relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameShareRow {
    pub building_type: String,
    pub location: String,
    pub frame_material: String,
    /// Share of the building stock framed with this material, in [0, 1];
    /// shares of one (building type, location) sum to one.
    pub share: f64,
}
