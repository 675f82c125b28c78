//! Reshapes a downloaded long-format file into a station x month table.

pub mod table;

use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use tracing::{info, warn};

use crate::{
    error::Result,
    reading::{read_observations, METADATA_COLUMNS},
};

pub use table::{MonthlyAccumulator, MonthlyPivot};

/// Prefix added to the input file name to name the output
pub const OUTPUT_PREFIX: &str = "pivoted_";

/// What a reshape produced and what it had to leave out.
#[derive(Debug, Clone, PartialEq)]
pub struct ReshapeSummary {
    pub output: PathBuf,
    pub records: usize,
    pub rows: usize,
    pub periods: usize,
    pub unparseable_dates: usize,
    pub non_numeric_values: usize,
}

/// Reads `input`, averages `value_column` per station and month, and writes
/// the wide table beside the input. The input file is never modified.
pub fn reshape(input: &Path, value_column: &str) -> Result<ReshapeSummary> {
    let records = read_observations(input, value_column)?;

    let mut accumulator = MonthlyAccumulator::new();
    for record in &records {
        accumulator.add(record);
    }

    let total = accumulator.records();
    let skipped = accumulator.skipped();
    if skipped.unparseable_dates > 0 {
        warn!(
            count = skipped.unparseable_dates,
            total, "records with no recognisable date were left out"
        );
    }
    if skipped.non_numeric_values > 0 {
        warn!(
            count = skipped.non_numeric_values,
            column = value_column,
            "records with a non-numeric value were left out"
        );
    }

    let pivot = accumulator.into_pivot();
    let output = output_path(input);
    save_pivot(&pivot, &output)?;

    info!(
        path = %output.display(),
        rows = pivot.rows.len(),
        periods = pivot.periods.len(),
        "pivot saved"
    );

    Ok(ReshapeSummary {
        output,
        records: total,
        rows: pivot.rows.len(),
        periods: pivot.periods.len(),
        unparseable_dates: skipped.unparseable_dates,
        non_numeric_values: skipped.non_numeric_values,
    })
}

pub fn output_path(input: &Path) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();

    input.with_file_name(format!("{}{}", OUTPUT_PREFIX, file_name))
}

/// Writes the metadata columns followed by one column per month.
pub fn save_pivot(pivot: &MonthlyPivot, file_path: &Path) -> Result<()> {
    let mut writer = WriterBuilder::new().from_path(file_path)?;

    let header = METADATA_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(pivot.periods.iter().map(|p| p.to_string()));
    writer.write_record(header)?;

    for row in &pivot.rows {
        let cells = row
            .station
            .iter()
            .cloned()
            .chain(row.values.iter().map(|v| v.map(format_cell).unwrap_or_default()));
        writer.write_record(cells)?;
    }

    writer.flush()?;

    Ok(())
}

/// Shortest text for the mean; whole numbers keep one decimal place.
fn format_cell(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

// -- Tests -------------------------------------------------------------------
