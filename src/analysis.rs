//! The denormalized per-(club, player) output of the merge pipeline.

use crate::config::PipelineConfig;
use crate::records::Club;
use crate::schema::Capabilities;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output columns in emission order
pub const ANALYSIS_COLUMNS: [&str; 19] = [
    "club_id",
    "name_club",
    "domestic_competition_id",
    "squad_size",
    "average_age",
    "foreigners_percentage",
    "latitude",
    "longitude",
    "coach_name",
    "net_transfer_record",
    "competition_id",
    "country_name",
    "player_id",
    "name_player",
    "date_of_birth",
    "market_value_in_eur",
    "age",
    "avg_played_minutes",
    "total_played_minutes",
];

/// One (club, player) pair. Field order is the column order of exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRow {
    pub club_id: i64,
    #[serde(rename = "name_club")]
    pub club_name: String,
    pub domestic_competition_id: Option<String>,
    pub squad_size: Option<u32>,
    pub average_age: Option<f64>,
    pub foreigners_percentage: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub coach_name: Option<String>,
    pub net_transfer_record: Option<String>,

    pub competition_id: Option<String>,
    pub country_name: Option<String>,

    pub player_id: Option<i64>,
    #[serde(rename = "name_player")]
    pub player_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,

    pub market_value_in_eur: f64,
    pub age: Option<f64>,
    pub avg_played_minutes: Option<f64>,
    pub total_played_minutes: Option<u64>,
}

impl AnalysisRow {
    /// Seed row for a club with every joined column still empty
    pub fn from_club(club: &Club) -> Self {
        Self {
            club_id: club.club_id,
            club_name: club.name.clone(),
            domestic_competition_id: club.domestic_competition_id.clone(),
            squad_size: club.squad_size,
            average_age: club.average_age,
            foreigners_percentage: club.foreigners_percentage,
            latitude: club.latitude,
            longitude: club.longitude,
            coach_name: club.coach_name.clone(),
            net_transfer_record: club.net_transfer_record.clone(),
            competition_id: None,
            country_name: None,
            player_id: None,
            player_name: None,
            date_of_birth: None,
            market_value_in_eur: 0.0,
            age: None,
            avg_played_minutes: None,
            total_played_minutes: None,
        }
    }

    pub fn has_player(&self) -> bool {
        self.player_id.is_some()
    }
}

/// Recoverable conditions noticed during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PipelineWarning {
    /// The target season has no rows in a season-filtered table
    SeasonMissing { table: String, season: i32 },
}

impl fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineWarning::SeasonMissing { table, season } => {
                write!(f, "season {season} has no rows in '{table}'")
            }
        }
    }
}

/// Result of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisTable {
    pub rows: Vec<AnalysisRow>,
    pub capabilities: Capabilities,
    pub warnings: Vec<PipelineWarning>,
    /// Config the table was built with, reference date resolved
    pub config: PipelineConfig,
}

impl AnalysisTable {
    pub fn empty(capabilities: Capabilities, config: PipelineConfig) -> Self {
        Self {
            rows: Vec::new(),
            capabilities,
            warnings: Vec::new(),
            config,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AnalysisRow> {
        self.rows.iter()
    }
}
