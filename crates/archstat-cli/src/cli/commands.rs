use super::CliError;
use anyhow::Context;
use archstat_core::{OnMissingData, RunParameters, StockDataset, process, validate_dataset};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(clap::Args)]
pub(super) struct RunArgs {
    /// Input dataset document (JSON)
    #[arg(long)]
    input: PathBuf,

    /// Output statistics document (JSON)
    #[arg(long)]
    output: PathBuf,

    /// Run settings document (JSON); defaults apply when omitted
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Skip aggregation cells without applicable data instead of aborting
    #[arg(long)]
    skip_missing: bool,

    /// Cap on the number of locations processed, for test runs
    #[arg(long)]
    location_limit: Option<usize>,
}

#[derive(clap::Args)]
pub(super) struct ValidateArgs {
    /// Input dataset document (JSON)
    #[arg(long)]
    input: PathBuf,

    /// Exit non-zero when any violation is found
    #[arg(long)]
    strict: bool,
}

pub(super) fn run_command(args: RunArgs) -> Result<i32, CliError> {
    let mut params = match &args.settings {
        Some(path) => read_json::<RunParameters>(path, "settings")?,
        None => RunParameters::default(),
    };
    if args.skip_missing {
        params.on_missing_data = OnMissingData::Skip;
    }
    if args.location_limit.is_some() {
        params.location_limit = args.location_limit;
    }
    params.validate().map_err(CliError::Compute)?;

    let mut data = read_json::<StockDataset>(&args.input, "dataset")?;
    let outcome = process(&mut data, &params).map_err(CliError::Compute)?;

    if !outcome.report.is_clean() {
        eprintln!("{}", outcome.report.render_human_summary());
    }

    let document = serde_json::to_string_pretty(&outcome.statistics)
        .context("failed to serialize statistics")?;
    fs::write(&args.output, document)
        .with_context(|| format!("failed to write '{}'", args.output.display()))?;

    println!(
        "catalog: {} structures; output: {} structural, {} ventilation/fenestration, {} building-stock rows",
        outcome.catalog_summary.entries,
        outcome.statistics.structure_statistics.len(),
        outcome
            .statistics
            .ventilation_and_fenestration_statistics
            .len(),
        outcome.statistics.building_stock_statistics.len(),
    );
    Ok(0)
}

pub(super) fn validate_command(args: ValidateArgs) -> Result<i32, CliError> {
    let data = read_json::<StockDataset>(&args.input, "dataset")?;
    let report = validate_dataset(&data);
    println!("{}", report.render_human_summary());
    if args.strict && !report.is_clean() {
        return Ok(3);
    }
    Ok(0)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T, CliError> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {what} '{}'", path.display()))?;
    let value = serde_json::from_str(&source)
        .with_context(|| format!("failed to parse {what} '{}'", path.display()))?;
    Ok(value)
}
