//! Monthly won-revenue trend.

use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

use crate::model::JoinedDeal;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    /// `YYYY-MM`.
    pub month: String,
    /// Last day of the month; the bucket's timestamp.
    pub month_end: NaiveDate,
    pub total: f64,
}

fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

fn next_month((year, month): (i32, u32)) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// Won rows with a close date, summed per calendar month.
///
/// Months between the first and last bucket with no won deals are
/// included with a total of 0.
pub fn monthly_trend(rows: &[&JoinedDeal]) -> Vec<TrendPoint> {
    let mut buckets: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for row in rows.iter().filter(|r| r.is_won) {
        if let Some(date) = row.close_date {
            *buckets.entry((date.year(), date.month())).or_insert(0.0) +=
                row.close_value.unwrap_or(0.0);
        }
    }

    let (Some(&first), Some(&last)) = (buckets.keys().next(), buckets.keys().next_back()) else {
        return Vec::new();
    };

    let mut points = Vec::new();
    let mut key = first;
    while key <= last {
        if let Some(end) = month_end(key.0, key.1) {
            points.push(TrendPoint {
                month: format!("{:04}-{:02}", key.0, key.1),
                month_end: end,
                total: buckets.get(&key).copied().unwrap_or(0.0),
            });
        }
        key = next_month(key);
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::test_rows::{date, row};

    #[test]
    fn single_won_row() {
        let rows = [row("Won", "X", Some("2024-01-10"), Some(100.0))];
        let refs: Vec<_> = rows.iter().collect();
        let trend = monthly_trend(&refs);
        assert_eq!(
            trend,
            vec![TrendPoint {
                month: "2024-01".into(),
                month_end: date("2024-01-31"),
                total: 100.0,
            }]
        );
    }

    #[test]
    fn gap_months_are_zero_filled() {
        let rows = [
            row("Won", "X", Some("2023-11-30"), Some(10.0)),
            row("Won", "X", Some("2024-02-29"), Some(5.0)),
            row("Won", "X", Some("2024-02-01"), Some(5.0)),
            row("Lost", "X", Some("2023-12-15"), Some(99.0)),
        ];
        let refs: Vec<_> = rows.iter().collect();
        let trend = monthly_trend(&refs);
        let months: Vec<_> = trend.iter().map(|p| (p.month.as_str(), p.total)).collect();
        assert_eq!(
            months,
            vec![("2023-11", 10.0), ("2023-12", 0.0), ("2024-01", 0.0), ("2024-02", 10.0)]
        );
        assert_eq!(trend[3].month_end, date("2024-02-29"));
    }

    #[test]
    fn won_rows_without_close_date_are_skipped() {
        let rows = [row("Won", "X", None, Some(10.0))];
        let refs: Vec<_> = rows.iter().collect();
        assert!(monthly_trend(&refs).is_empty());
    }

    #[test]
    fn month_ends() {
        assert_eq!(month_end(2023, 12), Some(date("2023-12-31")));
        assert_eq!(month_end(2023, 2), Some(date("2023-02-28")));
    }
}
