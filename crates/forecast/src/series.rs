//! Demand series preparation.

use std::collections::BTreeMap;

use chrono::NaiveDate;

/// A contiguous daily demand series.
///
/// Construction aggregates duplicate dates and fills interior gaps with zero
/// so every day between the first and last observation is present.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DemandSeries {
    points: Vec<(NaiveDate, f64)>,
}

impl DemandSeries {
    /// Build a series from raw (date, quantity) observations.
    pub fn from_daily(observations: impl IntoIterator<Item = (NaiveDate, f64)>) -> Self {
        let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for (date, quantity) in observations {
            *by_date.entry(date).or_insert(0.0) += quantity;
        }

        let (Some((&first, _)), Some((&last, _))) =
            (by_date.first_key_value(), by_date.last_key_value())
        else {
            return Self::default();
        };

        let mut points = Vec::new();
        let mut day = first;
        while day <= last {
            points.push((day, by_date.get(&day).copied().unwrap_or(0.0)));
            day += chrono::Duration::days(1);
        }

        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|(date, _)| *date)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|(_, quantity)| *quantity)
    }

    /// The most recent `n` quantities (fewer if the series is shorter).
    pub fn tail_values(&self, n: usize) -> Vec<f64> {
        let start = self.points.len().saturating_sub(n);
        self.points[start..].iter().map(|(_, q)| *q).collect()
    }
}
