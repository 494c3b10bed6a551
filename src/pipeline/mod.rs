//! Merge pipeline: five source tables in, one analysis table out.

pub mod steps;

use crate::analysis::{AnalysisRow, AnalysisTable, PipelineWarning};
use crate::config::{PipelineConfig, SeasonPolicy};
use crate::constants::{PLAYERS, PLAYER_VALUATIONS};
use crate::error::{PipelineError, Result};
use crate::loader::SourceTables;
use crate::metrics::PipelineMetrics;
use crate::records::{Appearance, Club, Competition, Player, PlayerValuation};
use crate::schema;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

pub use steps::{
    AgeDerivation, AppearanceJoin, CompetitionJoin, MergeStep, PlayerJoin, ValuationJoin,
};

/// Typed rows of all five sources
#[derive(Debug, Clone)]
struct Records {
    clubs: Vec<Club>,
    competitions: Vec<Competition>,
    players: Vec<Player>,
    valuations: Vec<PlayerValuation>,
    appearances: Vec<Appearance>,
}

impl Records {
    fn from_sources(sources: &SourceTables) -> Result<Self> {
        Ok(Self {
            clubs: Club::from_table(&sources.clubs)?,
            competitions: Competition::from_table(&sources.competitions)?,
            players: Player::from_table(&sources.players)?,
            valuations: PlayerValuation::from_table(&sources.player_valuations)?,
            appearances: Appearance::from_table(&sources.appearances)?,
        })
    }
}

pub struct MergePipeline {
    config: PipelineConfig,
}

impl MergePipeline {
    /// The reference date is pinned here so every run of this pipeline agrees
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config: config.resolved(),
        }
    }

    /// Run the complete merge over one snapshot of the source tables
    #[instrument(skip_all, fields(season = self.config.target_season))]
    pub fn run(&self, sources: &SourceTables) -> Result<AnalysisTable> {
        let started = Instant::now();
        PipelineMetrics::run_started();
        info!("🚀 Starting merge pipeline");

        let result = self.run_inner(sources);

        match &result {
            Ok(table) => {
                PipelineMetrics::rows_emitted(table.len());
                info!(
                    "✅ Merge finished: {} rows ({} warnings)",
                    table.len(),
                    table.warnings.len()
                );
            }
            Err(e) => {
                PipelineMetrics::run_failed();
                warn!("Merge pipeline failed: {}", e);
            }
        }
        PipelineMetrics::run_duration(started.elapsed().as_secs_f64());
        result
    }

    fn run_inner(&self, sources: &SourceTables) -> Result<AnalysisTable> {
        // Step 0: schema, before any row is read
        schema::validate(sources)?;
        let capabilities = schema::detect_capabilities(&sources.clubs);
        debug!(?capabilities, "Detected optional club sections");

        let records = Records::from_sources(sources)?;
        let mut table = AnalysisTable::empty(capabilities, self.config.clone());

        let season = self.config.target_season;
        let players_present = records.players.iter().any(|p| p.last_season == Some(season));
        let valuations_present = records
            .valuations
            .iter()
            .any(|v| v.last_season == Some(season));

        for (present, name) in [(players_present, PLAYERS), (valuations_present, PLAYER_VALUATIONS)] {
            if !present {
                self.season_missing(name, &mut table.warnings)?;
            }
        }
        if !players_present {
            info!("No players for season {}, returning empty table", season);
            return Ok(table);
        }

        let merge_steps: Vec<Box<dyn MergeStep + '_>> = vec![
            Box::new(CompetitionJoin::new(&records.competitions)),
            Box::new(PlayerJoin::new(&records.players, season, self.config.club_policy)),
            Box::new(ValuationJoin::new(&records.valuations, season)),
            Box::new(AgeDerivation::new(self.config.reference_date(), self.config.age_unit)),
            Box::new(AppearanceJoin::new(&records.appearances)),
        ];

        let mut rows: Vec<AnalysisRow> = records.clubs.iter().map(AnalysisRow::from_club).collect();
        for step in &merge_steps {
            let before = rows.len();
            rows = step.apply(rows);
            debug!("{}: {} -> {} rows", step.step_name(), before, rows.len());
        }

        table.rows = rows;
        Ok(table)
    }

    fn season_missing(&self, table: &str, warnings: &mut Vec<PipelineWarning>) -> Result<()> {
        let season = self.config.target_season;
        match self.config.season_policy {
            SeasonPolicy::Fail => Err(PipelineError::Config(format!(
                "target season {season} has no rows in '{table}'"
            ))),
            SeasonPolicy::Warn => {
                warn!("⚠️ Target season {} has no rows in '{}'", season, table);
                PipelineMetrics::season_missing(table);
                warnings.push(PipelineWarning::SeasonMissing {
                    table: table.to_string(),
                    season,
                });
                Ok(())
            }
        }
    }
}

/// Run the pipeline once with the given configuration
pub fn merge(sources: &SourceTables, config: &PipelineConfig) -> Result<AnalysisTable> {
    MergePipeline::new(config.clone()).run(sources)
}
