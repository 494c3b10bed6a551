//! Request-scoped selection over an analysis table.
//!
//! A `Selection` is passed explicitly to whatever filters or summarizes the
//! table; nothing here holds state between requests.

use crate::analysis::{AnalysisRow, AnalysisTable};
use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Numeric analysis columns that can be summarized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    SquadSize,
    AverageAge,
    ForeignersPercentage,
    MarketValueInEur,
    Age,
    AvgPlayedMinutes,
    TotalPlayedMinutes,
}

impl Metric {
    pub const ALL: [Metric; 7] = [
        Metric::SquadSize,
        Metric::AverageAge,
        Metric::ForeignersPercentage,
        Metric::MarketValueInEur,
        Metric::Age,
        Metric::AvgPlayedMinutes,
        Metric::TotalPlayedMinutes,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            Metric::SquadSize => "squad_size",
            Metric::AverageAge => "average_age",
            Metric::ForeignersPercentage => "foreigners_percentage",
            Metric::MarketValueInEur => "market_value_in_eur",
            Metric::Age => "age",
            Metric::AvgPlayedMinutes => "avg_played_minutes",
            Metric::TotalPlayedMinutes => "total_played_minutes",
        }
    }

    /// The metric's value on a row; None when the cell is null
    pub fn value(&self, row: &AnalysisRow) -> Option<f64> {
        match self {
            Metric::SquadSize => row.squad_size.map(f64::from),
            Metric::AverageAge => row.average_age,
            Metric::ForeignersPercentage => row.foreigners_percentage,
            Metric::MarketValueInEur => Some(row.market_value_in_eur),
            Metric::Age => row.age,
            Metric::AvgPlayedMinutes => row.avg_played_minutes,
            Metric::TotalPlayedMinutes => row.total_played_minutes.map(|m| m as f64),
        }
    }
}

impl FromStr for Metric {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.column() == s.trim())
            .ok_or_else(|| PipelineError::Config(format!("unknown metric '{s}'")))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// User choices for one filtering/summary request. Empty filters match all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub country: Option<String>,
    pub competition: Option<String>,
    pub clubs: Vec<String>,
    pub metrics: Vec<Metric>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn competition(mut self, competition: impl Into<String>) -> Self {
        self.competition = Some(competition.into());
        self
    }

    pub fn club(mut self, club: impl Into<String>) -> Self {
        self.clubs.push(club.into());
        self
    }

    pub fn metric(mut self, metric: Metric) -> Self {
        self.metrics.push(metric);
        self
    }

    pub fn matches(&self, row: &AnalysisRow) -> bool {
        let country_ok = self
            .country
            .as_deref()
            .map_or(true, |c| row.country_name.as_deref() == Some(c));
        let competition_ok = self
            .competition
            .as_deref()
            .map_or(true, |c| row.domestic_competition_id.as_deref() == Some(c));
        let club_ok = self.clubs.is_empty() || self.clubs.iter().any(|c| *c == row.club_name);
        country_ok && competition_ok && club_ok
    }

    /// Rows of the table this selection keeps, in table order
    pub fn apply<'a>(&self, table: &'a AnalysisTable) -> Vec<&'a AnalysisRow> {
        table.iter().filter(|row| self.matches(row)).collect()
    }

    /// Selected metrics, or every metric when none were chosen
    pub fn metrics_or_all(&self) -> Vec<Metric> {
        if self.metrics.is_empty() {
            Metric::ALL.to_vec()
        } else {
            self.metrics.clone()
        }
    }
}

fn distinct<'a, I>(values: I) -> Vec<String>
where
    I: Iterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

/// Countries present in the table, first-seen order
pub fn countries(table: &AnalysisTable) -> Vec<String> {
    distinct(table.iter().filter_map(|r| r.country_name.as_deref()))
}

/// Competition ids within one country, first-seen order
pub fn competitions_in(table: &AnalysisTable, country: &str) -> Vec<String> {
    distinct(
        table
            .iter()
            .filter(|r| r.country_name.as_deref() == Some(country))
            .filter_map(|r| r.domestic_competition_id.as_deref()),
    )
}

/// Club names kept by the country/competition part of a selection
pub fn clubs_in(table: &AnalysisTable, selection: &Selection) -> Vec<String> {
    let scope = Selection {
        clubs: Vec::new(),
        ..selection.clone()
    };
    distinct(
        table
            .iter()
            .filter(|r| scope.matches(r))
            .map(|r| r.club_name.as_str()),
    )
}
