use anyhow::Context;
use clap::{Parser, Subcommand};
use club_analysis::config::{AgeUnit, ClubPolicy, Config, SeasonPolicy};
use club_analysis::constants::DEFAULT_CONFIG_FILE;
use club_analysis::export::{self, OutputFormat};
use club_analysis::{logging, metrics, schema, selection, stats};
use club_analysis::{AnalysisTable, MergePipeline, Metric, Selection, SourceTables};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "club_analysis")]
#[command(about = "Merge soccer club and player tables into one analysis table")]
#[command(version)]
struct Cli {
    /// Config file (TOML); missing file means defaults
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Directory holding clubs.csv, competitions.csv, players.csv, ...
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Target season (year) for players and valuations
    #[arg(long, global = true)]
    season: Option<i32>,

    /// Age unit: years or days
    #[arg(long, global = true)]
    age_unit: Option<AgeUnit>,

    /// Drop clubs that have no player in the target season
    #[arg(long, global = true)]
    drop_empty_clubs: bool,

    /// Fail instead of warning when the season has no rows
    #[arg(long, global = true)]
    strict_season: bool,

    /// Print a Prometheus metrics snapshot to stderr on exit
    #[arg(long, global = true)]
    print_metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the merge pipeline and export the analysis table
    Merge {
        /// Output format: csv or json
        #[arg(long, default_value = "csv")]
        format: OutputFormat,
        /// Output file; stdout when omitted
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Per-club statistics for a country/competition/club selection
    Summary {
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        competition: Option<String>,
        /// Club name (repeatable)
        #[arg(long = "club")]
        clubs: Vec<String>,
        /// Metric column (repeatable), e.g. market_value_in_eur
        #[arg(long = "metric")]
        metrics: Vec<Metric>,
    },
    /// List the optional sections the club data supports
    Capabilities,
}

impl Cli {
    fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = Config::load(&self.config)
            .with_context(|| format!("loading config from {}", self.config.display()))?;

        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(season) = self.season {
            config.pipeline.target_season = season;
        }
        if let Some(unit) = self.age_unit {
            config.pipeline.age_unit = unit;
        }
        if self.drop_empty_clubs {
            config.pipeline.club_policy = ClubPolicy::DropEmpty;
        }
        if self.strict_season {
            config.pipeline.season_policy = SeasonPolicy::Fail;
        }
        Ok(config)
    }
}

fn run_pipeline(config: &Config) -> anyhow::Result<AnalysisTable> {
    let sources = SourceTables::load(&config.data_dir)
        .with_context(|| format!("loading tables from {}", config.data_dir.display()))?;
    let table = MergePipeline::new(config.pipeline.clone()).run(&sources)?;
    for warning in &table.warnings {
        warn!("{}", warning);
    }
    Ok(table)
}

fn print_summary(table: &AnalysisTable, selection: &Selection) {
    let rows = selection.apply(table);
    if rows.is_empty() {
        println!("No rows match the selection.");
        return;
    }

    let metrics = selection.metrics_or_all();
    for club in stats::club_summaries(&rows, &metrics) {
        println!("\n{} statistics:", club.club_name);
        println!(
            "   {:<24} {:>14} {:>14} {:>14} {:>14} {:>14}",
            "Metric", "Mean", "Median", "Max", "Min", "Std Dev"
        );
        for (metric, summary) in &club.metrics {
            match summary {
                Some(s) => println!(
                    "   {:<24} {:>14.2} {:>14.2} {:>14.2} {:>14.2} {:>14}",
                    metric.column(),
                    s.mean,
                    s.median,
                    s.max,
                    s.min,
                    s.std_dev.map_or_else(|| "-".to_string(), |v| format!("{v:.2}")),
                ),
                None => println!("   {:<24} {:>14}", metric.column(), "no data"),
            }
        }
    }

    println!("\nTotal market value per club (EUR):");
    for (club, total) in stats::total_market_value_per_club(&rows) {
        println!("   {:<32} {:>18.0}", club, total);
    }
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let _guard = logging::init_logging("logs");

    let cli = Cli::parse();
    if cli.print_metrics {
        metrics::init_metrics();
    }
    let config = cli.resolve_config()?;
    info!(
        season = config.pipeline.target_season,
        data_dir = %config.data_dir.display(),
        "Configuration resolved"
    );

    match &cli.command {
        Commands::Merge { format, output } => {
            let table = run_pipeline(&config)?;
            match output {
                Some(path) => export::persist(&table, *format, path)?,
                None => export::write(&table, *format, std::io::stdout().lock())?,
            }
        }
        Commands::Summary {
            country,
            competition,
            clubs,
            metrics,
        } => {
            let table = run_pipeline(&config)?;
            let request = Selection {
                country: country.clone(),
                competition: competition.clone(),
                clubs: clubs.clone(),
                metrics: metrics.clone(),
            };
            if request.country.is_none() {
                let countries = selection::countries(&table);
                info!("Available countries: {}", countries.join(", "));
            }
            print_summary(&table, &request);
        }
        Commands::Capabilities => {
            let sources = SourceTables::load(&config.data_dir)?;
            schema::validate(&sources)?;
            let caps = schema::detect_capabilities(&sources.clubs);
            if caps.is_empty() {
                println!("No optional sections available.");
            }
            for section in caps.sections() {
                println!("{} ({})", section, section.columns().join(", "));
            }
        }
    }

    if let Some(rendered) = metrics::render() {
        eprintln!("{rendered}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(args: &[&str]) -> Config {
        let mut argv = vec!["club_analysis", "--config", "does-not-exist.toml"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().resolve_config().unwrap()
    }

    #[test]
    fn drop_empty_clubs_is_a_bare_flag() {
        let config = resolve(&["--drop-empty-clubs", "capabilities"]);
        assert_eq!(config.pipeline.club_policy, ClubPolicy::DropEmpty);

        // global flags also work after the subcommand
        let config = resolve(&["capabilities", "--drop-empty-clubs"]);
        assert_eq!(config.pipeline.club_policy, ClubPolicy::DropEmpty);
    }

    #[test]
    fn empty_clubs_are_kept_without_the_flag() {
        let config = resolve(&["merge"]);
        assert_eq!(config.pipeline.club_policy, ClubPolicy::RetainEmpty);
    }

    #[test]
    fn strict_season_and_overrides_apply() {
        let config = resolve(&["--season", "2021", "--age-unit", "days", "--strict-season", "merge"]);
        assert_eq!(config.pipeline.target_season, 2021);
        assert_eq!(config.pipeline.age_unit, AgeUnit::Days);
        assert_eq!(config.pipeline.season_policy, SeasonPolicy::Fail);
    }
}
