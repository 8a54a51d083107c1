//! Harmonization of heterogeneous building-construction data and
//! building-stock census statistics into physical archetype properties:
//! U-values, effective thermal mass, thermal bridges, infiltration and
//! ventilation rates, and fenestration performance, indexed by building
//! type, construction period, location and structure type.

pub mod common;
pub mod data;
pub mod domain;
pub mod modules;

pub use data::StockDataset;
pub use domain::{
    OnMissingData, Property, RunParameters, StockError, StockErrorCategory, StockResult,
};
pub use modules::pipeline::{ProcessOutcome, StatisticsOutput, process};
pub use modules::validate::{IntegrityReport, validate_dataset};
