pub mod date;
pub mod observation;
pub mod period;

use std::path::Path;

use csv::ReaderBuilder;

use crate::error::Result;

pub use observation::{
    ObservationRecord, Schema, StationKey, DEFAULT_VALUE_COLUMN, METADATA_COLUMNS,
};
pub use period::YearMonth;

/// Loads every row of a downloaded CSV file. The header is checked before any row is read.
pub fn read_observations(path: &Path, value_column: &str) -> Result<Vec<ObservationRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let schema = Schema::from_headers(reader.headers()?, value_column)?;

    let mut readings = Vec::new();
    for record in reader.records() {
        readings.push(ObservationRecord::from_record(&record?, &schema));
    }

    Ok(readings)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::error::WrisError;

    #[test]
    fn should_check_header_of_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.csv");
        fs::write(&path, "stationCode,description\n").unwrap();

        let err = read_observations(&path, DEFAULT_VALUE_COLUMN).unwrap_err();

        assert!(matches!(err, WrisError::SchemaMismatch { .. }));
    }
}
