mod common;

use club_analysis::analysis::ANALYSIS_COLUMNS;
use club_analysis::cache::{fingerprint, PipelineCache};
use club_analysis::export::{self, OutputFormat};
use club_analysis::stats;
use club_analysis::{merge, Metric, PipelineConfig, Selection, SourceTables, Table};
use tempfile::tempdir;

#[test]
fn loading_from_disk_matches_in_memory_tables() {
    let dir = tempdir().unwrap();
    common::write_data_dir(dir.path());

    let loaded = SourceTables::load(dir.path()).unwrap();
    assert_eq!(loaded, common::sources());
}

#[test]
fn csv_export_has_header_in_column_order() {
    let table = merge(&common::sources(), &common::config()).unwrap();
    let mut buf = Vec::new();
    export::write(&table, OutputFormat::Csv, &mut buf).unwrap();

    let exported = Table::from_reader("analysis", buf.as_slice()).unwrap();
    assert_eq!(exported.columns(), ANALYSIS_COLUMNS.map(String::from).as_slice());
    assert_eq!(exported.len(), table.len());

    // nulls are empty cells, market value is never empty
    let value_ix = exported.column_index("market_value_in_eur").unwrap();
    let country_ix = exported.column_index("country_name").unwrap();
    assert!(exported.rows().iter().all(|r| !r[value_ix].is_empty()));
    assert!(exported.rows().iter().any(|r| r[country_ix].is_empty()));
}

#[test]
fn empty_table_still_exports_header() {
    let config = PipelineConfig::for_season(1999).with_reference_date(common::reference_date());
    let table = merge(&common::sources(), &config).unwrap();
    assert!(table.is_empty());

    let mut buf = Vec::new();
    export::write_csv(&table, &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert_eq!(text.trim_end(), ANALYSIS_COLUMNS.join(","));
}

#[test]
fn json_export_uses_suffixed_name_columns() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out").join("analysis.json");
    let table = merge(&common::sources(), &common::config()).unwrap();

    export::persist(&table, OutputFormat::Json, &path).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let rows = value.as_array().unwrap();
    assert_eq!(rows.len(), table.len());
    assert_eq!(rows[0]["name_club"], "Arsenal");
    assert_eq!(rows[0]["name_player"], "Bukayo Saka");
    assert_eq!(rows[0]["total_played_minutes"], 60);
}

#[test]
fn cache_returns_stored_result_for_same_snapshot() {
    let sources = common::sources();
    let config = common::config();
    let mut cache = PipelineCache::new();

    let first = cache.get_or_run(&sources, &config).unwrap().clone();
    let second = cache.get_or_run(&sources, &config).unwrap().clone();
    assert_eq!(first, second);
    assert_eq!(cache.len(), 1);

    let other_season = PipelineConfig {
        target_season: 2021,
        ..config.clone()
    };
    cache.get_or_run(&sources, &other_season).unwrap();
    assert_eq!(cache.len(), 2);
}

#[test]
fn fingerprint_changes_with_any_cell() {
    let config = common::config();
    let base = fingerprint(&common::sources(), &config);

    let mut edited = common::sources();
    edited.appearances = common::table("appearances", "player_id,minutes_played\n10,11\n");
    assert_ne!(base, fingerprint(&edited, &config));
    assert_eq!(base, fingerprint(&common::sources(), &config));
    assert_eq!(base.len(), 64);
}

#[test]
fn club_statistics_for_a_selection() {
    let table = merge(&common::sources(), &common::config()).unwrap();
    let selection = Selection::new()
        .country("England")
        .club("Arsenal")
        .metric(Metric::MarketValueInEur)
        .metric(Metric::AvgPlayedMinutes);
    let rows = selection.apply(&table);

    let summaries = stats::club_summaries(&rows, &selection.metrics);
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].club_name, "Arsenal");

    let (metric, value) = &summaries[0].metrics[0];
    assert_eq!(*metric, Metric::MarketValueInEur);
    let value = value.unwrap();
    assert_eq!(value.count, 2);
    assert_eq!(value.mean, 110_000_000.0);
    assert_eq!(value.max, 120_000_000.0);

    // only Saka has appearances
    let minutes = summaries[0].metrics[1].1.unwrap();
    assert_eq!(minutes.count, 1);
    assert_eq!(minutes.std_dev, None);

    let totals = stats::total_market_value_per_club(&rows);
    assert_eq!(totals, vec![("Arsenal".to_string(), 220_000_000.0)]);
}

#[test]
fn selection_option_lists() {
    let table = merge(&common::sources(), &common::config()).unwrap();

    assert_eq!(
        club_analysis::selection::countries(&table),
        vec!["England".to_string(), "Spain".to_string()]
    );
    assert_eq!(
        club_analysis::selection::competitions_in(&table, "England"),
        vec!["GB1".to_string()]
    );
    let england = Selection::new().country("England");
    assert_eq!(
        club_analysis::selection::clubs_in(&table, &england),
        vec!["Arsenal".to_string(), "Chelsea".to_string()]
    );
}
