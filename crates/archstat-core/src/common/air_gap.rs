//! Thermal resistance of unventilated air layers, tabulated per
//! EN ISO 6946 by gap width and heat-flow direction.

use crate::data::model::HeatFlowDirection;

/// Tabulated gap widths [mm].
pub const AIR_GAP_WIDTHS_MM: [f64; 9] = [0.0, 5.0, 7.0, 10.0, 15.0, 25.0, 50.0, 100.0, 300.0];

/// [m2K/W] per tabulated width, heat flowing upwards.
const RESISTANCE_UPWARDS: [f64; 9] = [0.00, 0.11, 0.13, 0.15, 0.16, 0.16, 0.16, 0.16, 0.16];

/// [m2K/W] per tabulated width, horizontal heat flow.
const RESISTANCE_HORIZONTAL: [f64; 9] = [0.00, 0.11, 0.13, 0.15, 0.17, 0.18, 0.18, 0.18, 0.18];

/// [m2K/W] per tabulated width, heat flowing downwards.
const RESISTANCE_DOWNWARDS: [f64; 9] = [0.00, 0.11, 0.13, 0.15, 0.17, 0.19, 0.21, 0.22, 0.23];

const fn column(direction: HeatFlowDirection) -> &'static [f64; 9] {
    match direction {
        HeatFlowDirection::Upwards => &RESISTANCE_UPWARDS,
        HeatFlowDirection::Horizontal => &RESISTANCE_HORIZONTAL,
        HeatFlowDirection::Downwards => &RESISTANCE_DOWNWARDS,
    }
}

/// Thermal resistance of an air gap of the given width [m2K/W].
///
/// Linear interpolation between tabulated widths; widths outside the
/// tabulated range take the nearest tabulated value.
pub fn air_gap_resistance(width_mm: f64, direction: HeatFlowDirection) -> f64 {
    let resistances = column(direction);

    if width_mm <= AIR_GAP_WIDTHS_MM[0] {
        return resistances[0];
    }
    let last = AIR_GAP_WIDTHS_MM.len() - 1;
    if width_mm >= AIR_GAP_WIDTHS_MM[last] {
        return resistances[last];
    }

    let upper = AIR_GAP_WIDTHS_MM
        .iter()
        .position(|&width| width_mm <= width)
        .expect("width below tabulated maximum");
    let lower = upper - 1;
    let span = AIR_GAP_WIDTHS_MM[upper] - AIR_GAP_WIDTHS_MM[lower];
    let fraction = (width_mm - AIR_GAP_WIDTHS_MM[lower]) / span;
    resistances[lower] + fraction * (resistances[upper] - resistances[lower])
}
