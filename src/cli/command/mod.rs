pub mod download;
pub mod pivot;

pub use download::download;
pub use pivot::pivot;

use crate::pivot::ReshapeSummary;

/// Prints what a reshape produced, so the operator can judge the data before using it.
pub fn report_reshape(summary: &ReshapeSummary) {
    println!(
        "Pivoted {} records into {} stations x {} months",
        summary.records, summary.rows, summary.periods
    );
    println!("Failed rows: {}", summary.unparseable_dates);
    if summary.non_numeric_values > 0 {
        println!("Rows without a numeric value: {}", summary.non_numeric_values);
    }
}
