mod common;

use club_analysis::schema::Section;
use club_analysis::{
    merge, AgeUnit, AnalysisRow, ClubPolicy, MergePipeline, PipelineError, PipelineWarning,
    SeasonPolicy, Selection, SourceTables, Table,
};

fn player_row(rows: &[AnalysisRow], player_id: i64) -> &AnalysisRow {
    rows.iter()
        .find(|r| r.player_id == Some(player_id))
        .unwrap_or_else(|| panic!("no row for player {player_id}"))
}

#[test]
fn drop_policy_emits_one_row_per_season_player_with_a_club() {
    let config = common::config().with_club_policy(ClubPolicy::DropEmpty);
    let table = merge(&common::sources(), &config).unwrap();

    // Players 10, 11, 13, 14 are in season and at a known club; 12 is an
    // older season and 15 points at a club that does not exist.
    let ids: Vec<_> = table.iter().map(|r| r.player_id).collect();
    assert_eq!(ids, vec![Some(10), Some(11), Some(13), Some(14)]);
    assert!(table.warnings.is_empty());
}

#[test]
fn retain_policy_keeps_empty_clubs_with_null_player_fields() {
    let config = common::config().with_club_policy(ClubPolicy::RetainEmpty);
    let table = merge(&common::sources(), &config).unwrap();

    assert_eq!(table.len(), 5);
    let chelsea = &table.rows[2];
    assert_eq!(chelsea.club_name, "Chelsea");
    assert!(!chelsea.has_player());
    assert_eq!(chelsea.player_name, None);
    assert_eq!(chelsea.age, None);
    assert_eq!(chelsea.market_value_in_eur, 0.0);
    assert_eq!(chelsea.avg_played_minutes, None);
    assert_eq!(chelsea.country_name.as_deref(), Some("England"));
}

#[test]
fn running_twice_gives_identical_output() {
    let sources = common::sources();
    let pipeline = MergePipeline::new(common::config());

    let first = pipeline.run(&sources).unwrap();
    let second = pipeline.run(&sources).unwrap();
    assert_eq!(first, second);
}

#[test]
fn unresolved_competition_leaves_country_null() {
    let table = merge(&common::sources(), &common::config()).unwrap();
    let ghost = player_row(&table.rows, 14);

    assert_eq!(ghost.club_name, "Ghost FC");
    assert_eq!(ghost.domestic_competition_id.as_deref(), Some("XX9"));
    assert_eq!(ghost.competition_id, None);
    assert_eq!(ghost.country_name, None);
    assert_eq!(ghost.squad_size, None);
}

#[test]
fn missing_valuation_defaults_to_zero() {
    let table = merge(&common::sources(), &common::config()).unwrap();

    // Bellingham only has a 2022 valuation
    assert_eq!(player_row(&table.rows, 13).market_value_in_eur, 0.0);
    assert_eq!(player_row(&table.rows, 10).market_value_in_eur, 120_000_000.0);
    assert_eq!(player_row(&table.rows, 14).market_value_in_eur, 1_000_000.0);
}

#[test]
fn appearances_are_aggregated_per_player() {
    let table = merge(&common::sources(), &common::config()).unwrap();

    let saka = player_row(&table.rows, 10);
    assert_eq!(saka.avg_played_minutes, Some(20.0));
    assert_eq!(saka.total_played_minutes, Some(60));

    // a recorded zero-minute appearance is data, no appearance is not
    let bellingham = player_row(&table.rows, 13);
    assert_eq!(bellingham.avg_played_minutes, Some(0.0));
    assert_eq!(bellingham.total_played_minutes, Some(0));

    let rice = player_row(&table.rows, 11);
    assert_eq!(rice.avg_played_minutes, None);
    assert_eq!(rice.total_played_minutes, None);
}

#[test]
fn age_in_years_and_days() {
    let sources = common::sources();

    let years = merge(&sources, &common::config()).unwrap();
    let rice_years = player_row(&years.rows, 11).age.unwrap();
    assert!((rice_years - 24.0).abs() <= 0.01, "got {rice_years}");

    let days = merge(&sources, &common::config().with_age_unit(AgeUnit::Days)).unwrap();
    assert_eq!(player_row(&days.rows, 11).age, Some(8766.0));

    // timestamped birth dates parse too; a blank one stays null
    assert!(player_row(&years.rows, 10).age.is_some());
    assert_eq!(player_row(&years.rows, 14).age, None);
}

#[test]
fn missing_date_of_birth_column_is_a_schema_error() {
    let mut sources = common::sources();
    sources.players = Table::from_rows(
        "players",
        &["player_id", "current_club_id", "name", "last_season"],
        &[&["10", "1", "Bukayo Saka", "2023"]],
    );
    // a malformed later table must not matter; the schema check comes first
    sources.appearances = Table::from_rows("appearances", &["player_id"], &[&["not a number"]]);

    match merge(&sources, &common::config()) {
        Err(PipelineError::Schema { table, column }) => {
            assert_eq!(table, "players");
            assert_eq!(column, "date_of_birth");
        }
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn country_filter_keeps_only_that_country() {
    let table = merge(&common::sources(), &common::config()).unwrap();
    let england = Selection::new().country("England").apply(&table);

    assert!(!england.is_empty());
    assert!(england.iter().all(|r| r.country_name.as_deref() == Some("England")));
    let clubs: Vec<_> = england.iter().map(|r| r.club_name.as_str()).collect();
    assert_eq!(clubs, vec!["Arsenal", "Arsenal", "Chelsea"]);
}

#[test]
fn absent_season_warns_and_returns_empty_table() {
    let config = club_analysis::PipelineConfig::for_season(2030)
        .with_reference_date(common::reference_date());
    let table = merge(&common::sources(), &config).unwrap();

    assert!(table.is_empty());
    assert_eq!(
        table.warnings,
        vec![
            PipelineWarning::SeasonMissing {
                table: "players".to_string(),
                season: 2030
            },
            PipelineWarning::SeasonMissing {
                table: "player_valuations".to_string(),
                season: 2030
            },
        ]
    );
    // the schema part of the output is still there for downstream checks
    assert!(table.capabilities.enabled(Section::Coaches));
}

#[test]
fn absent_season_fails_under_strict_policy() {
    let config = common::config()
        .with_season_policy(SeasonPolicy::Fail);
    let strict_2030 = club_analysis::PipelineConfig {
        target_season: 2030,
        ..config
    };

    let err = merge(&common::sources(), &strict_2030).unwrap_err();
    assert!(err.is_config(), "got {err}");
}

#[test]
fn season_without_valuations_zeroes_market_values() {
    let config = club_analysis::PipelineConfig::for_season(2021)
        .with_reference_date(common::reference_date())
        .with_club_policy(ClubPolicy::DropEmpty);
    let table = merge(&common::sources(), &config).unwrap();

    assert_eq!(table.len(), 1);
    assert_eq!(table.rows[0].player_id, Some(12));
    assert_eq!(table.rows[0].market_value_in_eur, 0.0);
    assert_eq!(
        table.warnings,
        vec![PipelineWarning::SeasonMissing {
            table: "player_valuations".to_string(),
            season: 2021
        }]
    );
}

#[test]
fn capabilities_follow_optional_club_columns() {
    let table = merge(&common::sources(), &common::config()).unwrap();

    assert!(table.capabilities.enabled(Section::Coaches));
    assert!(!table.capabilities.enabled(Section::Geography));
    assert!(!table.capabilities.enabled(Section::TransferMarket));
    assert_eq!(
        player_row(&table.rows, 13).coach_name.as_deref(),
        Some("Carlo Ancelotti")
    );
}

#[test]
fn bad_cell_reports_table_row_and_column() {
    let mut sources: SourceTables = common::sources();
    sources.appearances = common::table("appearances", "player_id,minutes_played\n10,ninety\n");

    match merge(&sources, &common::config()) {
        Err(PipelineError::Parse {
            table,
            row,
            column,
            value,
        }) => {
            assert_eq!(table, "appearances");
            assert_eq!(row, 0);
            assert_eq!(column, "minutes_played");
            assert_eq!(value, "ninety");
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn duplicate_competition_ids_keep_the_first_row() {
    let mut sources = common::sources();
    sources.competitions = common::table(
        "competitions",
        "competition_id,country_name\nGB1,England\nGB1,Scotland\nES1,Spain\n",
    );
    let table = merge(&sources, &common::config()).unwrap();

    assert_eq!(player_row(&table.rows, 10).country_name.as_deref(), Some("England"));
    assert_eq!(player_row(&table.rows, 13).country_name.as_deref(), Some("Spain"));
}

#[test]
fn undated_valuations_resolve_to_the_last_row() {
    let mut sources = common::sources();
    sources.player_valuations = common::table(
        "player_valuations",
        "player_id,last_season,market_value_in_eur\n10,2023,1.0\n10,2023,2.0\n",
    );
    let table = merge(&sources, &common::config()).unwrap();

    let saka_rows = table.iter().filter(|r| r.player_id == Some(10)).count();
    assert_eq!(saka_rows, 1);
    assert_eq!(player_row(&table.rows, 10).market_value_in_eur, 2.0);
}

#[test]
fn valuations_without_a_value_are_ignored() {
    let mut sources = common::sources();
    sources.player_valuations = common::table(
        "player_valuations",
        "player_id,last_season,market_value_in_eur\n10,2023,5.0\n10,2023,\n11,2023,\n",
    );
    let table = merge(&sources, &common::config()).unwrap();

    // the later blank row does not override the earlier value
    assert_eq!(player_row(&table.rows, 10).market_value_in_eur, 5.0);
    assert_eq!(player_row(&table.rows, 11).market_value_in_eur, 0.0);
}

#[test]
fn rows_with_blank_player_ids_are_skipped() {
    let mut sources = common::sources();
    sources.appearances = common::table(
        "appearances",
        "player_id,minutes_played\n,90\n10,10\n10,20\n10,30\n",
    );
    sources.players = common::table(
        "players",
        &format!("{}{}", common::PLAYERS_CSV, ",1,No Id,2000-01-01,2023\n"),
    );
    let config = common::config().with_club_policy(ClubPolicy::DropEmpty);
    let table = merge(&sources, &config).unwrap();

    let ids: Vec<_> = table.iter().map(|r| r.player_id).collect();
    assert_eq!(ids, vec![Some(10), Some(11), Some(13), Some(14)]);
    assert_eq!(player_row(&table.rows, 10).total_played_minutes, Some(60));
}
