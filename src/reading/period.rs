//! Calendar month buckets.

use std::fmt;

use chrono::{Datelike, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// A calendar year-month. Orders chronologically and prints as `YYYY-MM`.
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl From<NaiveDate> for YearMonth {
    fn from(date: NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_label_and_order_periods() {
        let june = YearMonth::from(NaiveDate::from_ymd_opt(2022, 6, 15).unwrap());
        let march = YearMonth::from(NaiveDate::from_ymd_opt(2021, 3, 31).unwrap());
        let december = YearMonth::from(NaiveDate::from_ymd_opt(2021, 12, 1).unwrap());

        assert_eq!(june.to_string(), "2022-06");
        assert!(march < december && december < june);
    }
}
