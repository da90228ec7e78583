//! The four summary metrics.

use serde::Serialize;

use crate::model::JoinedDeal;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    /// Sum of close_value, truncated to whole units.
    pub pipeline_total: i64,
    pub won_revenue: f64,
    /// Percent of filtered rows that are won; 0 for an empty set.
    pub conversion_rate: f64,
    /// Mean deal_age of won rows, rounded; 0 when no won row has an age.
    pub avg_cycle_days: i64,
    pub deal_count: usize,
    pub won_count: usize,
}

impl Metrics {
    pub fn compute(rows: &[&JoinedDeal]) -> Self {
        let mut total = 0.0;
        let mut won_revenue = 0.0;
        let mut won_count = 0usize;
        let mut age_sum = 0i64;
        let mut age_count = 0i64;

        for row in rows {
            let value = row.close_value.unwrap_or(0.0);
            total += value;
            if row.is_won {
                won_count += 1;
                won_revenue += value;
                if let Some(age) = row.deal_age {
                    age_sum += age;
                    age_count += 1;
                }
            }
        }

        let conversion_rate = if rows.is_empty() {
            0.0
        } else {
            won_count as f64 / rows.len() as f64 * 100.0
        };
        let avg_cycle_days = if age_count == 0 {
            0
        } else {
            (age_sum as f64 / age_count as f64).round_ties_even() as i64
        };

        Self {
            pipeline_total: total.trunc() as i64,
            won_revenue,
            conversion_rate,
            avg_cycle_days,
            deal_count: rows.len(),
            won_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::test_rows::row;

    #[test]
    fn empty_set_is_all_zero() {
        let m = Metrics::compute(&[]);
        assert_eq!(m.pipeline_total, 0);
        assert_eq!(m.won_revenue, 0.0);
        assert_eq!(m.conversion_rate, 0.0);
        assert_eq!(m.avg_cycle_days, 0);
    }

    #[test]
    fn no_won_rows_gives_zero_cycle() {
        let rows = [row("Lost", "Amy", Some("2024-01-01"), Some(40.0))];
        let refs: Vec<_> = rows.iter().collect();
        let m = Metrics::compute(&refs);
        assert_eq!(m.avg_cycle_days, 0);
        assert_eq!(m.conversion_rate, 0.0);
        assert_eq!(m.pipeline_total, 40);
    }

    #[test]
    fn mixed_rows() {
        let mut a = row("Won", "Amy", Some("2024-01-10"), Some(100.5));
        a.deal_age = Some(9);
        let mut b = row("Won", "Amy", Some("2024-01-20"), Some(200.0));
        b.deal_age = Some(12);
        let c = row("Won", "Zed", Some("2024-01-21"), None);
        let d = row("Engaging", "Zed", Some("2024-01-22"), Some(10.9));
        let rows = [a, b, c, d];
        let refs: Vec<_> = rows.iter().collect();
        let m = Metrics::compute(&refs);

        assert_eq!(m.pipeline_total, 311);
        assert_eq!(m.won_revenue, 300.5);
        assert_eq!(m.conversion_rate, 75.0);
        // (9 + 12) / 2 = 10.5, ties to even
        assert_eq!(m.avg_cycle_days, 10);
        assert_eq!(m.deal_count, 4);
        assert_eq!(m.won_count, 3);
    }
}
