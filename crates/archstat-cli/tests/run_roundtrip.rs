//! CLI round trip: dataset JSON in a temp dir, `run` subcommand, parsed
//! output document.

use archstat_cli::{CliError, run};
use archstat_core::data::StockDataset;
use archstat_core::data::model::{
    ApplicabilityRow, BuildingPeriodRow, BuildingStockRow, BuildingTypeRow, CensusRow,
    FenestrationSourceRow, FloorAreaRow, FrameMaterialMapRow, FrameMaterialRow, FrameShareRow,
    HeatFlowDirection, HeatSourceRow, LayerRow, LayerTag, MaterialRow, LocationRow, SourceRow,
    StructureDescriptionRow, StructureRow, StructureTypeRow, TypeAssignmentRow,
    TypeFlowDirectionRow, VentilationSourceRow,
};

fn material(name: &str, conductivity: f64, density: f64, specific_heat: f64) -> MaterialRow {
    MaterialRow {
        name: name.to_string(),
        minimum_density: density,
        maximum_density: density,
        minimum_specific_heat_capacity: specific_heat,
        maximum_specific_heat_capacity: specific_heat,
        minimum_thermal_conductivity: conductivity,
        maximum_thermal_conductivity: conductivity,
    }
}

fn layer(
    layer_id: &str,
    material: &str,
    number: i32,
    tag: LayerTag,
    minimum_mm: f64,
    load_bearing_mm: Option<f64>,
) -> LayerRow {
    LayerRow {
        source: "RT 1970".to_string(),
        structure: "concrete wall".to_string(),
        layer_id: layer_id.to_string(),
        material: material.to_string(),
        layer_number: number,
        layer_tag: tag,
        layer_weight: 1.0,
        minimum_thickness_mm: Some(minimum_mm),
        load_bearing_thickness_mm: load_bearing_mm,
    }
}

fn dataset() -> StockDataset {
    StockDataset {
        materials: vec![
            material("gypsum board", 0.25, 900.0, 1000.0),
            material("concrete", 1.0, 2300.0, 1000.0),
            material("mineral wool", 0.05, 30.0, 850.0),
        ],
        sources: vec![SourceRow {
            name: "RT 1970".to_string(),
            year: 1970,
        }],
        structures: vec![StructureRow {
            name: "concrete wall".to_string(),
        }],
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
        building_types: vec![BuildingTypeRow {
            name: "detached house".to_string(),
        }],
        building_periods: vec![BuildingPeriodRow {
            name: "1970-1979".to_string(),
            period_start: 1970,
            period_end: 1979,
        }],
        locations: vec![LocationRow {
            name: "uusimaa".to_string(),
        }],
        frame_materials: vec![FrameMaterialRow {
            name: "concrete frame".to_string(),
        }],
        heat_sources: vec![HeatSourceRow {
            name: "district".to_string(),
        }],
        building_stocks: vec![BuildingStockRow {
            name: "2020 stock".to_string(),
        }],
        structure_descriptions: vec![StructureDescriptionRow {
            source: "RT 1970".to_string(),
            structure: "concrete wall".to_string(),
            design_u_value: Some(0.4),
        }],
        layers: vec![
            layer("finish", "gypsum board", -1, LayerTag::InteriorFinish, 13.0, None),
            layer(
                "core",
                "concrete",
                0,
                LayerTag::LoadBearingStructure,
                100.0,
                Some(150.0),
            ),
            layer("insulation", "mineral wool", 1, LayerTag::ThermalInsulation, 100.0, None),
            layer("cladding", "concrete", 2, LayerTag::ExteriorFinish, 50.0, None),
        ],
        applicability: vec![ApplicabilityRow {
            source: "RT 1970".to_string(),
            structure: "concrete wall".to_string(),
            building_type: "detached house".to_string(),
            weight: Some(1.0),
        }],
        type_assignments: vec![TypeAssignmentRow {
            structure: "concrete wall".to_string(),
            structure_type: "exterior wall".to_string(),
        }],
        frame_material_map: vec![FrameMaterialMapRow {
            material: "concrete".to_string(),
            frame_material: "concrete frame".to_string(),
        }],
        type_flow_directions: vec![TypeFlowDirectionRow {
            structure_type: "exterior wall".to_string(),
            direction: HeatFlowDirection::Horizontal,
        }],
        ventilation_sources: vec![VentilationSourceRow {
            source: "RT 1970".to_string(),
            building_type: "detached house".to_string(),
            minimum_ventilation_rate_1_h: 0.3,
            maximum_ventilation_rate_1_h: 0.5,
            minimum_n50_infiltration_rate_1_h: 4.0,
            maximum_n50_infiltration_rate_1_h: 8.0,
            minimum_infiltration_factor: 20.0,
            maximum_infiltration_factor: 30.0,
            minimum_hru_efficiency: 0.0,
            maximum_hru_efficiency: 0.0,
        }],
        fenestration_sources: vec![FenestrationSourceRow {
            source: "RT 1970".to_string(),
            building_type: "detached house".to_string(),
            minimum_window_u_value: 1.8,
            maximum_window_u_value: 2.2,
            frame_area_fraction: 0.25,
            notional_solar_energy_transmittance: 0.8,
        }],
        census: vec![CensusRow {
            building_stock: "2020 stock".to_string(),
            building_type: "detached house".to_string(),
            building_period: "1970-1979".to_string(),
            location: "uusimaa".to_string(),
            heat_source: "district".to_string(),
            number_of_buildings: 120.0,
        }],
        floor_areas: vec![FloorAreaRow {
            building_type: "detached house".to_string(),
            location: "uusimaa".to_string(),
            building_period: "1970-1979".to_string(),
            average_gross_floor_area_m2: 130.0,
        }],
        frame_shares: vec![FrameShareRow {
            building_type: "detached house".to_string(),
            location: "uusimaa".to_string(),
            frame_material: "concrete frame".to_string(),
            share: 1.0,
        }],
        ..StockDataset::default()
    }
}

#[test]
fn run_writes_a_parsable_statistics_document() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input_path = dir.path().join("dataset.json");
    let output_path = dir.path().join("statistics.json");

    std::fs::write(
        &input_path,
        serde_json::to_string_pretty(&dataset()).unwrap(),
    )
    .expect("write dataset");

    let code = run([
        "run",
        "--input",
        input_path.to_str().unwrap(),
        "--output",
        output_path.to_str().unwrap(),
    ])
    .expect("run command");
    assert_eq!(code, 0);

    let document: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output_path).expect("read output"))
            .expect("parse output");

    let structural = document["structure_statistics"]
        .as_array()
        .expect("structural rows");
    // One census cell, exterior wall plus its injected light variant.
    assert_eq!(structural.len(), 2);
    let wall_row = structural
        .iter()
        .find(|row| row["structure_type"] == "exterior wall")
        .expect("exterior wall row");
    assert!((wall_row["design_U_value_W_m2K"].as_f64().unwrap() - 0.4).abs() < 1e-12);
    assert!(wall_row["total_U_value_W_m2K"].as_f64().unwrap() > 0.0);

    let ventilation = document["ventilation_and_fenestration_statistics"]
        .as_array()
        .expect("ventilation rows");
    assert_eq!(ventilation.len(), 1);
    assert!((ventilation[0]["window_U_value_W_m2K"].as_f64().unwrap() - 2.0).abs() < 1e-12);

    let stock = document["building_stock_statistics"]
        .as_array()
        .expect("stock rows");
    assert_eq!(stock.len(), 1);
    assert_eq!(
        stock[0]["average_gross_floor_area_m2_per_building"]
            .as_f64()
            .unwrap(),
        130.0
    );
}

#[test]
fn validate_reports_a_clean_dataset() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input_path = dir.path().join("dataset.json");
    std::fs::write(
        &input_path,
        serde_json::to_string_pretty(&dataset()).unwrap(),
    )
    .expect("write dataset");

    let code = run(["validate", "--input", input_path.to_str().unwrap(), "--strict"])
        .expect("validate command");
    assert_eq!(code, 0);
}

#[test]
fn unknown_subcommands_are_usage_errors() {
    let error = run(["frobnicate"]).expect_err("unknown subcommand");
    assert!(matches!(error, CliError::Usage(_)));
}
