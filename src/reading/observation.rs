//! Long-format observation rows as exported by India-WRIS.

use chrono::NaiveDate;
use csv::StringRecord;

use crate::error::{Result, WrisError};

use super::date::parse_description;

/// Station metadata columns, in output order. Together they key a pivot row.
pub const METADATA_COLUMNS: [&str; 14] = [
    "stationCode",
    "stationName",
    "stationType",
    "latitude",
    "longitude",
    "district",
    "state",
    "tehsil",
    "block",
    "village",
    "unit",
    "well_type",
    "well_depth",
    "well_aquifer_type",
];

/// Free-text column holding the observation timestamp
pub const DESCRIPTION_COLUMN: &str = "description";

/// Column averaged into the pivot cells unless overridden
pub const DEFAULT_VALUE_COLUMN: &str = "datatype_code";

pub type StationKey = [String; 14];

/// Column positions of everything the reshape reads.
#[derive(Debug, Clone)]
pub struct Schema {
    metadata: [usize; 14],
    description: usize,
    value: usize,
}

impl Schema {
    /// Locates the required columns, naming every one that is absent.
    pub fn from_headers(headers: &StringRecord, value_column: &str) -> Result<Self> {
        let names: Vec<&str> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim())
            .collect();
        let position = |column: &str| names.iter().position(|name| *name == column);

        let mut missing = Vec::new();
        let mut lookup = |column: &str| {
            position(column).unwrap_or_else(|| {
                missing.push(column.to_string());
                usize::MAX
            })
        };

        let metadata = METADATA_COLUMNS.map(&mut lookup);
        let description = lookup(DESCRIPTION_COLUMN);
        let value = lookup(value_column);

        if !missing.is_empty() {
            return Err(WrisError::SchemaMismatch { missing });
        }

        Ok(Schema {
            metadata,
            description,
            value,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObservationRecord {
    pub station: StationKey,
    pub description: String,
    /// `None` when the description holds no recognisable date
    pub date: Option<NaiveDate>,
    /// `None` when the value field is empty or not a number
    pub value: Option<f64>,
}

impl ObservationRecord {
    pub fn from_record(record: &StringRecord, schema: &Schema) -> Self {
        let field = |idx: usize| record.get(idx).unwrap_or("").trim();

        let station = std::array::from_fn(|i| field(schema.metadata[i]).to_string());
        let description = field(schema.description).to_string();
        let date = parse_description(&description);
        let value = field(schema.value)
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite());

        ObservationRecord {
            station,
            description,
            date,
            value,
        }
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(skip: &[&str]) -> StringRecord {
        let mut columns: Vec<&str> = METADATA_COLUMNS.to_vec();
        columns.push(DESCRIPTION_COLUMN);
        columns.push(DEFAULT_VALUE_COLUMN);
        columns.retain(|c| !skip.contains(c));

        StringRecord::from(columns)
    }

    #[test]
    fn should_name_missing_latitude() {
        let err = Schema::from_headers(&headers(&["latitude"]), DEFAULT_VALUE_COLUMN).unwrap_err();

        match err {
            WrisError::SchemaMismatch { missing } => assert_eq!(missing, vec!["latitude"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn should_list_all_missing_columns_in_order() {
        let err = Schema::from_headers(&headers(&["tehsil", "description"]), "level")
            .unwrap_err();

        match err {
            WrisError::SchemaMismatch { missing } => {
                assert_eq!(missing, vec!["tehsil", "description", "level"])
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn should_tolerate_bom_and_padding_in_headers() {
        let mut columns: Vec<String> = headers(&[]).iter().map(|c| format!(" {} ", c)).collect();
        columns[0] = format!("\u{feff}{}", METADATA_COLUMNS[0]);

        assert!(Schema::from_headers(&StringRecord::from(columns), DEFAULT_VALUE_COLUMN).is_ok());
    }

    #[test]
    fn should_read_record() {
        let schema = Schema::from_headers(&headers(&[]), DEFAULT_VALUE_COLUMN).unwrap();
        let mut fields: Vec<String> = (0..14).map(|i| format!("m{}", i)).collect();
        fields.push("2022-06-15 00:00:00".to_string());
        fields.push(" 12.5 ".to_string());

        let record = ObservationRecord::from_record(&StringRecord::from(fields), &schema);

        assert_eq!(record.station[0], "m0");
        assert_eq!(record.station[13], "m13");
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2022, 6, 15));
        assert_eq!(record.value, Some(12.5));
    }

    #[test]
    fn should_leave_bad_value_empty() {
        let schema = Schema::from_headers(&headers(&[]), DEFAULT_VALUE_COLUMN).unwrap();
        let mut fields: Vec<&str> = vec![""; 14];
        fields.push("2022-06-15");
        fields.push("NA");

        let record = ObservationRecord::from_record(&StringRecord::from(fields), &schema);

        assert_eq!(record.value, None);
        assert!(record.date.is_some());
    }
}
