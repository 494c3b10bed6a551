use crate::constants::{DEFAULT_DATA_DIR, DEFAULT_SEASON};
use crate::error::{PipelineError, Result};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

pub const ENV_SEASON: &str = "CLUB_ANALYSIS_SEASON";
pub const ENV_DATA_DIR: &str = "CLUB_ANALYSIS_DATA_DIR";
pub const ENV_AGE_UNIT: &str = "CLUB_ANALYSIS_AGE_UNIT";

/// Unit of the derived `age` column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeUnit {
    /// Fractional years rounded to two decimals
    #[default]
    Years,
    Days,
}

impl FromStr for AgeUnit {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "years" | "year" => Ok(AgeUnit::Years),
            "days" | "day" => Ok(AgeUnit::Days),
            other => Err(PipelineError::Config(format!("unknown age unit '{other}'"))),
        }
    }
}

/// What happens to clubs without a player in the target season
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClubPolicy {
    DropEmpty,
    /// Keep one row per empty club with null player fields
    #[default]
    RetainEmpty,
}

/// What happens when the target season has no Player or valuation rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonPolicy {
    #[default]
    Warn,
    Fail,
}

/// Settings for one merge pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub target_season: i32,
    /// Date ages are measured against; today (UTC) when unset
    pub reference_date: Option<NaiveDate>,
    pub age_unit: AgeUnit,
    pub club_policy: ClubPolicy,
    pub season_policy: SeasonPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_season: DEFAULT_SEASON,
            reference_date: None,
            age_unit: AgeUnit::default(),
            club_policy: ClubPolicy::default(),
            season_policy: SeasonPolicy::default(),
        }
    }
}

impl PipelineConfig {
    pub fn for_season(target_season: i32) -> Self {
        Self {
            target_season,
            ..Self::default()
        }
    }

    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    pub fn with_age_unit(mut self, unit: AgeUnit) -> Self {
        self.age_unit = unit;
        self
    }

    pub fn with_club_policy(mut self, policy: ClubPolicy) -> Self {
        self.club_policy = policy;
        self
    }

    pub fn with_season_policy(mut self, policy: SeasonPolicy) -> Self {
        self.season_policy = policy;
        self
    }

    /// Resolve the reference date, falling back to today
    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date.unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Pin an unset reference date so repeated runs agree
    pub fn resolved(&self) -> Self {
        Self {
            reference_date: Some(self.reference_date()),
            ..self.clone()
        }
    }
}

/// Application configuration, usually read from `club_analysis.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    pub pipeline: PipelineConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl Config {
    /// Read the TOML file if it exists, then apply environment overrides
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                PipelineError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
            })?;
            toml::from_str(&content)?
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Config::default()
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process env in practice)
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(season) = lookup(ENV_SEASON) {
            self.pipeline.target_season = season.trim().parse().map_err(|_| {
                PipelineError::Config(format!("{ENV_SEASON} must be a year, got '{season}'"))
            })?;
        }
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(unit) = lookup(ENV_AGE_UNIT) {
            self.pipeline.age_unit = unit.parse()?;
        }
        Ok(())
    }
}
