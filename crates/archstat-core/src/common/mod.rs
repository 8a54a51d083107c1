pub mod air_gap;

pub use air_gap::{AIR_GAP_WIDTHS_MM, air_gap_resistance};
