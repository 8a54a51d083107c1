//! Pre-flight integrity validation of the raw dataset. Violations are
//! collected into one batch report so a data curator can fix many issues
//! per run; the pipeline itself keeps going.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::data::StockDataset;
use crate::data::model::LayerTag;

/// Tolerance for weight and share sums that must reach one.
pub const SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationCheck {
    ReferentialIntegrity,
    ParameterRange,
    WeightSum,
    LayerShape,
}

impl ValidationCheck {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ReferentialIntegrity => "referential integrity",
            Self::ParameterRange => "parameter range",
            Self::WeightSum => "weight sum",
            Self::LayerShape => "layer shape",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub check: ValidationCheck,
    /// The object or relationship tuple the finding is about.
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IntegrityReport {
    pub violations: Vec<Violation>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    fn push(&mut self, check: ValidationCheck, subject: impl Into<String>, message: impl Into<String>) {
        self.violations.push(Violation {
            check,
            subject: subject.into(),
            message: message.into(),
        });
    }

    /// One line per violation, grouped by check, plus a closing count.
    pub fn render_human_summary(&self) -> String {
        if self.is_clean() {
            return "integrity check passed: no violations".to_string();
        }
        let mut grouped: BTreeMap<ValidationCheck, Vec<&Violation>> = BTreeMap::new();
        for violation in &self.violations {
            grouped.entry(violation.check).or_default().push(violation);
        }
        let mut lines = Vec::with_capacity(self.violations.len() + grouped.len() + 1);
        for (check, violations) in grouped {
            lines.push(format!("{} ({}):", check.label(), violations.len()));
            for violation in violations {
                lines.push(format!("  {}: {}", violation.subject, violation.message));
            }
        }
        lines.push(format!("{} violation(s) total", self.violations.len()));
        lines.join("\n")
    }

    pub fn log_violations(&self) {
        for violation in &self.violations {
            tracing::warn!(
                check = violation.check.label(),
                subject = %violation.subject,
                "{}",
                violation.message
            );
        }
    }
}

pub fn validate_dataset(data: &StockDataset) -> IntegrityReport {
    let mut report = IntegrityReport::default();
    check_materials(data, &mut report);
    check_references(data, &mut report);
    check_layer_parameters(data, &mut report);
    check_layer_shapes(data, &mut report);
    check_frame_shares(data, &mut report);
    check_ventilation_bounds(data, &mut report);
    report
}

fn check_materials(data: &StockDataset, report: &mut IntegrityReport) {
    for material in &data.materials {
        let ranges: [(&str, f64, f64); 3] = [
            ("density", material.minimum_density, material.maximum_density),
            (
                "specific heat capacity",
                material.minimum_specific_heat_capacity,
                material.maximum_specific_heat_capacity,
            ),
            (
                "thermal conductivity",
                material.minimum_thermal_conductivity,
                material.maximum_thermal_conductivity,
            ),
        ];
        for (label, minimum, maximum) in ranges {
            if !minimum.is_finite() || !maximum.is_finite() || minimum < 0.0 {
                report.push(
                    ValidationCheck::ParameterRange,
                    material.name.as_str(),
                    format!("{label} bounds must be finite and non-negative, got [{minimum}, {maximum}]"),
                );
            } else if minimum > maximum {
                report.push(
                    ValidationCheck::ParameterRange,
                    material.name.as_str(),
                    format!("{label} minimum {minimum} exceeds maximum {maximum}"),
                );
            }
        }
        if material.minimum_thermal_conductivity <= 0.0 {
            report.push(
                ValidationCheck::ParameterRange,
                material.name.as_str(),
                format!(
                    "thermal conductivity must be positive, got minimum {}",
                    material.minimum_thermal_conductivity
                ),
            );
        }
    }
}

fn check_references(data: &StockDataset, report: &mut IntegrityReport) {
    let has_structure = |name: &str| data.structures.iter().any(|row| row.name == name);
    let has_building_type = |name: &str| data.building_types.iter().any(|row| row.name == name);
    let has_location = |name: &str| data.locations.iter().any(|row| row.name == name);
    let has_frame_material = |name: &str| data.frame_materials.iter().any(|row| row.name == name);

    for row in &data.layers {
        let subject = format!("{}:{} layer '{}'", row.source, row.structure, row.layer_id);
        if data.source(&row.source).is_none() {
            report.push(
                ValidationCheck::ReferentialIntegrity,
                subject.as_str(),
                format!("unknown source '{}'", row.source),
            );
        }
        if !has_structure(&row.structure) {
            report.push(
                ValidationCheck::ReferentialIntegrity,
                subject.as_str(),
                format!("unknown structure '{}'", row.structure),
            );
        }
        if data.material(&row.material).is_none() {
            report.push(
                ValidationCheck::ReferentialIntegrity,
                subject.as_str(),
                format!("unknown material '{}'", row.material),
            );
        }
    }

    for row in &data.structure_descriptions {
        let subject = format!("{}:{}", row.source, row.structure);
        if data.source(&row.source).is_none() {
            report.push(
                ValidationCheck::ReferentialIntegrity,
                subject.as_str(),
                format!("unknown source '{}'", row.source),
            );
        }
        if !has_structure(&row.structure) {
            report.push(
                ValidationCheck::ReferentialIntegrity,
                subject.as_str(),
                format!("unknown structure '{}'", row.structure),
            );
        }
    }

    for row in &data.applicability {
        if !has_building_type(&row.building_type) {
            report.push(
                ValidationCheck::ReferentialIntegrity,
                format!("{}:{}", row.source, row.structure),
                format!("unknown building type '{}'", row.building_type),
            );
        }
        if let Some(weight) = row.weight
            && !(0.0..=1.0).contains(&weight)
        {
            report.push(
                ValidationCheck::ParameterRange,
                format!("{}:{}", row.source, row.structure),
                format!(
                    "applicability weight for '{}' must lie in [0, 1], got {weight}",
                    row.building_type
                ),
            );
        }
    }

    let mut assignments_per_structure: BTreeMap<&str, usize> = BTreeMap::new();
    for row in &data.type_assignments {
        *assignments_per_structure
            .entry(row.structure.as_str())
            .or_default() += 1;
        if !has_structure(&row.structure) {
            report.push(
                ValidationCheck::ReferentialIntegrity,
                row.structure.as_str(),
                "type assignment for unknown structure",
            );
        }
        if data.structure_type(&row.structure_type).is_none() {
            report.push(
                ValidationCheck::ReferentialIntegrity,
                row.structure.as_str(),
                format!("unknown structure type '{}'", row.structure_type),
            );
        }
    }
    for (structure, count) in assignments_per_structure {
        if count > 1 {
            report.push(
                ValidationCheck::LayerShape,
                structure,
                format!("structure maps to {count} structure types, expected exactly one"),
            );
        }
    }

    for row in &data.frame_material_map {
        if data.material(&row.material).is_none() {
            report.push(
                ValidationCheck::ReferentialIntegrity,
                row.material.as_str(),
                "frame-material mapping for unknown material",
            );
        }
        if !has_frame_material(&row.frame_material) {
            report.push(
                ValidationCheck::ReferentialIntegrity,
                row.material.as_str(),
                format!("unknown frame material '{}'", row.frame_material),
            );
        }
    }

    for row in &data.ventilation_sources {
        if data.source(&row.source).is_none() {
            report.push(
                ValidationCheck::ReferentialIntegrity,
                row.source.as_str(),
                "ventilation data references unknown source",
            );
        }
        if !has_building_type(&row.building_type) {
            report.push(
                ValidationCheck::ReferentialIntegrity,
                row.source.as_str(),
                format!("unknown building type '{}'", row.building_type),
            );
        }
    }
    for row in &data.fenestration_sources {
        if data.source(&row.source).is_none() {
            report.push(
                ValidationCheck::ReferentialIntegrity,
                row.source.as_str(),
                "fenestration data references unknown source",
            );
        }
        if !has_building_type(&row.building_type) {
            report.push(
                ValidationCheck::ReferentialIntegrity,
                row.source.as_str(),
                format!("unknown building type '{}'", row.building_type),
            );
        }
    }

    for row in &data.census {
        let subject = format!(
            "census ({}, {}, {}, {}, {})",
            row.building_stock, row.building_type, row.building_period, row.location, row.heat_source
        );
        if !has_building_type(&row.building_type) {
            report.push(
                ValidationCheck::ReferentialIntegrity,
                subject.as_str(),
                format!("unknown building type '{}'", row.building_type),
            );
        }
        if data.building_period(&row.building_period).is_none() {
            report.push(
                ValidationCheck::ReferentialIntegrity,
                subject.as_str(),
                format!("unknown building period '{}'", row.building_period),
            );
        }
        if !has_location(&row.location) {
            report.push(
                ValidationCheck::ReferentialIntegrity,
                subject.as_str(),
                format!("unknown location '{}'", row.location),
            );
        }
        if row.number_of_buildings < 0.0 || !row.number_of_buildings.is_finite() {
            report.push(
                ValidationCheck::ParameterRange,
                subject.as_str(),
                format!("number of buildings must be non-negative, got {}", row.number_of_buildings),
            );
        }
    }

    for row in &data.frame_shares {
        if !has_building_type(&row.building_type) || !has_location(&row.location) {
            report.push(
                ValidationCheck::ReferentialIntegrity,
                format!("share ({}, {}, {})", row.building_type, row.location, row.frame_material),
                "unknown building type or location",
            );
        }
        if !has_frame_material(&row.frame_material) {
            report.push(
                ValidationCheck::ReferentialIntegrity,
                format!("share ({}, {}, {})", row.building_type, row.location, row.frame_material),
                format!("unknown frame material '{}'", row.frame_material),
            );
        }
    }
}

fn check_layer_parameters(data: &StockDataset, report: &mut IntegrityReport) {
    for row in &data.layers {
        let subject = format!("{}:{} layer '{}'", row.source, row.structure, row.layer_id);
        if !(0.0..=1.0).contains(&row.layer_weight) {
            report.push(
                ValidationCheck::ParameterRange,
                subject.as_str(),
                format!("layer weight must lie in [0, 1], got {}", row.layer_weight),
            );
        }
        if let Some(thickness) = row.minimum_thickness_mm
            && (thickness < 0.0 || !thickness.is_finite())
        {
            report.push(
                ValidationCheck::ParameterRange,
                subject.as_str(),
                format!("minimum thickness must be non-negative, got {thickness} mm"),
            );
        }
        if let (Some(minimum), Some(load_bearing)) =
            (row.minimum_thickness_mm, row.load_bearing_thickness_mm)
            && load_bearing < minimum
        {
            report.push(
                ValidationCheck::ParameterRange,
                subject.as_str(),
                format!(
                    "load-bearing thickness {load_bearing} mm below minimum thickness {minimum} mm"
                ),
            );
        }
    }

    // Weights of layers sharing a depth index must sum to one.
    let mut sums: BTreeMap<(&str, &str, i32), f64> = BTreeMap::new();
    for row in &data.layers {
        *sums
            .entry((row.source.as_str(), row.structure.as_str(), row.layer_number))
            .or_default() += row.layer_weight;
    }
    for ((source, structure, depth), sum) in sums {
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            report.push(
                ValidationCheck::WeightSum,
                format!("{source}:{structure} depth {depth}"),
                format!("layer weights sum to {sum}, expected 1"),
            );
        }
    }
}

fn check_layer_shapes(data: &StockDataset, report: &mut IntegrityReport) {
    let mut pairs: Vec<(&str, &str)> = data
        .layers
        .iter()
        .map(|row| (row.source.as_str(), row.structure.as_str()))
        .collect();
    pairs.sort_unstable();
    pairs.dedup();

    for (source, structure) in pairs {
        let subject = format!("{source}:{structure}");
        let ordered = crate::modules::layers::order_layers(data, source, structure);

        for window in ordered.depths.windows(2) {
            if window[1] - window[0] > 1 {
                report.push(
                    ValidationCheck::LayerShape,
                    subject.as_str(),
                    format!("gap in depth indices between {} and {}", window[0], window[1]),
                );
            }
        }

        let zero_group: Vec<_> = ordered
            .layers
            .iter()
            .filter(|layer| layer.layer_number == 0)
            .collect();
        if zero_group.is_empty() {
            report.push(
                ValidationCheck::LayerShape,
                subject.as_str(),
                "no layer at depth 0",
            );
        } else if !zero_group.iter().any(|layer| {
            matches!(
                layer.layer_tag,
                LayerTag::LoadBearingStructure | LayerTag::ThermalInsulation
            )
        }) {
            report.push(
                ValidationCheck::LayerShape,
                subject.as_str(),
                "depth 0 carries neither a load-bearing nor a thermal insulation layer",
            );
        }

        let boundary_count = ordered
            .layers
            .iter()
            .filter(|layer| {
                layer.layer_tag.is_exterior_boundary() || layer.layer_tag == LayerTag::Ground
            })
            .count();
        if boundary_count > 1 {
            report.push(
                ValidationCheck::LayerShape,
                subject.as_str(),
                format!(
                    "{boundary_count} boundary layers (exterior finish / crawl space / ground), expected at most one"
                ),
            );
        }

        if let Some(&innermost) = ordered.depths.first() {
            let finish_count = ordered
                .layers
                .iter()
                .filter(|layer| {
                    layer.layer_number == innermost && layer.layer_tag == LayerTag::InteriorFinish
                })
                .count();
            if innermost < 0 && finish_count != 1 {
                report.push(
                    ValidationCheck::LayerShape,
                    subject.as_str(),
                    format!(
                        "innermost depth {innermost} carries {finish_count} interior finish layers, expected exactly one"
                    ),
                );
            }
        }
    }
}

fn check_frame_shares(data: &StockDataset, report: &mut IntegrityReport) {
    for row in &data.frame_shares {
        if !(0.0..=1.0).contains(&row.share) {
            report.push(
                ValidationCheck::ParameterRange,
                format!("share ({}, {}, {})", row.building_type, row.location, row.frame_material),
                format!("share must lie in [0, 1], got {}", row.share),
            );
        }
    }
    let mut sums: BTreeMap<(&str, &str), f64> = BTreeMap::new();
    for row in &data.frame_shares {
        *sums
            .entry((row.building_type.as_str(), row.location.as_str()))
            .or_default() += row.share;
    }
    for ((building_type, location), sum) in sums {
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            report.push(
                ValidationCheck::WeightSum,
                format!("shares ({building_type}, {location})"),
                format!("frame material shares sum to {sum}, expected 1"),
            );
        }
    }
}

fn check_ventilation_bounds(data: &StockDataset, report: &mut IntegrityReport) {
    for row in &data.ventilation_sources {
        let bounds = [
            (
                "ventilation rate",
                row.minimum_ventilation_rate_1_h,
                row.maximum_ventilation_rate_1_h,
            ),
            (
                "n50 infiltration rate",
                row.minimum_n50_infiltration_rate_1_h,
                row.maximum_n50_infiltration_rate_1_h,
            ),
            (
                "infiltration factor",
                row.minimum_infiltration_factor,
                row.maximum_infiltration_factor,
            ),
            (
                "HRU efficiency",
                row.minimum_hru_efficiency,
                row.maximum_hru_efficiency,
            ),
        ];
        for (label, minimum, maximum) in bounds {
            if minimum > maximum {
                report.push(
                    ValidationCheck::ParameterRange,
                    format!("ventilation ({}, {})", row.source, row.building_type),
                    format!("{label} minimum {minimum} exceeds maximum {maximum}"),
                );
            }
        }
    }
    for row in &data.fenestration_sources {
        if row.minimum_window_u_value > row.maximum_window_u_value {
            report.push(
                ValidationCheck::ParameterRange,
                format!("fenestration ({}, {})", row.source, row.building_type),
                format!(
                    "window U-value minimum {} exceeds maximum {}",
                    row.minimum_window_u_value, row.maximum_window_u_value
                ),
            );
        }
        if !(0.0..=1.0).contains(&row.frame_area_fraction) {
            report.push(
                ValidationCheck::ParameterRange,
                format!("fenestration ({}, {})", row.source, row.building_type),
                format!("frame area fraction must lie in [0, 1], got {}", row.frame_area_fraction),
            );
        }
    }
}
