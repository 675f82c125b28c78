//! Station x month aggregation in two passes: accumulate sums and counts,
//! then lay them out as a wide table.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::reading::{ObservationRecord, StationKey, YearMonth};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Tally {
    sum: f64,
    count: u32,
}

impl Tally {
    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Counts of records that did not reach any cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Skipped {
    pub unparseable_dates: usize,
    pub non_numeric_values: usize,
}

/// First pass: running sum and count per (station, month).
#[derive(Debug, Default)]
pub struct MonthlyAccumulator {
    cells: BTreeMap<(StationKey, YearMonth), Tally>,
    records: usize,
    skipped: Skipped,
}

impl MonthlyAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: &ObservationRecord) {
        self.records += 1;

        let Some(date) = record.date else {
            debug!(description = %record.description, "no date found");
            self.skipped.unparseable_dates += 1;
            return;
        };
        let Some(value) = record.value else {
            self.skipped.non_numeric_values += 1;
            return;
        };

        let tally = self
            .cells
            .entry((record.station.clone(), YearMonth::from(date)))
            .or_default();
        tally.sum += value;
        tally.count += 1;
    }

    pub fn records(&self) -> usize {
        self.records
    }

    pub fn skipped(&self) -> Skipped {
        self.skipped
    }

    /// Second pass: one row per station, one column per month seen anywhere.
    pub fn into_pivot(self) -> MonthlyPivot {
        let periods: Vec<YearMonth> = self
            .cells
            .keys()
            .map(|(_, period)| *period)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut by_station: BTreeMap<StationKey, BTreeMap<YearMonth, Tally>> = BTreeMap::new();
        for ((station, period), tally) in self.cells {
            by_station.entry(station).or_default().insert(period, tally);
        }

        let rows = by_station
            .into_iter()
            .map(|(station, tallies)| MonthlyPivotRow {
                values: periods
                    .iter()
                    .map(|p| tallies.get(p).and_then(Tally::mean))
                    .collect(),
                station,
            })
            .collect();

        MonthlyPivot { periods, rows }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyPivotRow {
    pub station: StationKey,
    /// Parallel to `MonthlyPivot::periods`; `None` where the station has no observation
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MonthlyPivot {
    /// Chronological
    pub periods: Vec<YearMonth>,
    /// Ordered by station key
    pub rows: Vec<MonthlyPivotRow>,
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn station(code: &str) -> StationKey {
        std::array::from_fn(|i| if i == 0 { code.to_string() } else { format!("m{}", i) })
    }

    fn record(code: &str, date: Option<(i32, u32, u32)>, value: Option<f64>) -> ObservationRecord {
        ObservationRecord {
            station: station(code),
            description: String::new(),
            date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            value,
        }
    }

    fn cell(pivot: &MonthlyPivot, row: usize, period: &str) -> Option<f64> {
        let column = pivot.periods.iter().position(|p| p.to_string() == period)?;
        pivot.rows.get(row)?.values[column]
    }

    fn run(records: &[ObservationRecord]) -> (MonthlyPivot, Skipped) {
        let mut acc = MonthlyAccumulator::new();
        records.iter().for_each(|r| acc.add(r));
        let skipped = acc.skipped();

        (acc.into_pivot(), skipped)
    }

    #[test]
    fn should_place_single_record() {
        let (pivot, _) = run(&[record("A", Some((2022, 6, 15)), Some(12.5))]);

        assert_eq!(pivot.rows.len(), 1);
        assert_eq!(pivot.periods.len(), 1);
        assert_eq!(cell(&pivot, 0, "2022-06"), Some(12.5));
    }

    #[test]
    fn should_average_duplicates_into_one_row() {
        let (pivot, _) = run(&[
            record("A", Some((2022, 6, 1)), Some(10.0)),
            record("A", Some((2022, 6, 30)), Some(20.0)),
        ]);

        assert_eq!(pivot.rows.len(), 1);
        assert_eq!(cell(&pivot, 0, "2022-06"), Some(15.0));
    }

    #[test]
    fn should_leave_missing_cells_empty() {
        let (pivot, _) = run(&[
            record("B", Some((2021, 3, 5)), Some(4.0)),
            record("A", Some((2022, 6, 15)), Some(1.0)),
        ]);

        let labels: Vec<String> = pivot.periods.iter().map(|p| p.to_string()).collect();
        assert_eq!(labels, vec!["2021-03", "2022-06"]);
        assert_eq!(pivot.rows[0].station[0], "A");
        assert_eq!(pivot.rows[0].values, vec![None, Some(1.0)]);
        assert_eq!(pivot.rows[1].values, vec![Some(4.0), None]);
    }

    #[test]
    fn should_count_and_skip_unusable_records() {
        let (pivot, skipped) = run(&[
            record("A", None, Some(3.0)),
            record("A", Some((2022, 1, 1)), None),
            record("A", Some((2022, 6, 15)), Some(12.5)),
        ]);

        assert_eq!(skipped.unparseable_dates, 1);
        assert_eq!(skipped.non_numeric_values, 1);
        assert_eq!(pivot.periods.len(), 1);
        assert_eq!(cell(&pivot, 0, "2022-06"), Some(12.5));
    }

    #[test]
    fn should_give_empty_pivot_for_no_records() {
        let (pivot, skipped) = run(&[]);

        assert_eq!(pivot, MonthlyPivot::default());
        assert_eq!(skipped, Skipped::default());
    }
}
