//! Descriptive statistics over selected analysis rows.

use crate::analysis::AnalysisRow;
use crate::selection::Metric;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub max: f64,
    pub min: f64,
    /// Sample standard deviation; None with fewer than two values
    pub std_dev: Option<f64>,
}

/// Summarize the non-null values; None when there are none
pub fn describe<I>(values: I) -> Option<Summary>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut values: Vec<f64> = values.into_iter().flatten().filter(|v| !v.is_nan()).collect();
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let median = if count % 2 == 0 {
        (values[count / 2 - 1] + values[count / 2]) / 2.0
    } else {
        values[count / 2]
    };
    let std_dev = (count > 1).then(|| {
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        var.sqrt()
    });

    Some(Summary {
        count,
        mean,
        median,
        max: values[count - 1],
        min: values[0],
        std_dev,
    })
}

/// Summary of one metric over a set of rows
pub fn describe_metric(rows: &[&AnalysisRow], metric: Metric) -> Option<Summary> {
    describe(rows.iter().map(|r| metric.value(r)))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClubSummary {
    pub club_name: String,
    pub metrics: Vec<(Metric, Option<Summary>)>,
}

fn group_by_club<'a>(rows: &[&'a AnalysisRow]) -> Vec<(&'a str, Vec<&'a AnalysisRow>)> {
    let mut groups: Vec<(&'a str, Vec<&'a AnalysisRow>)> = Vec::new();
    for &row in rows {
        match groups.iter_mut().find(|(name, _)| *name == row.club_name) {
            Some((_, members)) => members.push(row),
            None => groups.push((row.club_name.as_str(), vec![row])),
        }
    }
    groups
}

/// Per-club statistics for each metric, clubs in first-seen order
pub fn club_summaries(rows: &[&AnalysisRow], metrics: &[Metric]) -> Vec<ClubSummary> {
    group_by_club(rows)
        .into_iter()
        .map(|(club_name, members)| ClubSummary {
            club_name: club_name.to_string(),
            metrics: metrics
                .iter()
                .map(|&m| (m, describe_metric(&members, m)))
                .collect(),
        })
        .collect()
}

/// Sum of player market values per club name, first-seen order
pub fn total_market_value_per_club(rows: &[&AnalysisRow]) -> Vec<(String, f64)> {
    group_by_club(rows)
        .into_iter()
        .map(|(club_name, members)| {
            let total: f64 = members.iter().map(|r| r.market_value_in_eur).sum();
            (club_name.to_string(), total)
        })
        .collect()
}
