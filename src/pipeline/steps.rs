use crate::analysis::AnalysisRow;
use crate::config::{AgeUnit, ClubPolicy};
use crate::records::{Appearance, Competition, Player, PlayerValuation};
use chrono::NaiveDate;
use std::collections::HashMap;

/// One join or derivation over the analysis rows.
///
/// Steps consume the previous row set and return a new one; the source
/// records they were built from are only borrowed.
pub trait MergeStep {
    fn step_name(&self) -> &'static str;

    fn apply(&self, rows: Vec<AnalysisRow>) -> Vec<AnalysisRow>;
}

/// Left join of clubs onto competitions, bringing in `country_name`
pub struct CompetitionJoin<'a> {
    by_id: HashMap<&'a str, &'a Competition>,
}

impl<'a> CompetitionJoin<'a> {
    pub fn new(competitions: &'a [Competition]) -> Self {
        let mut by_id = HashMap::with_capacity(competitions.len());
        for competition in competitions {
            // first row wins on duplicate ids
            by_id.entry(competition.competition_id.as_str()).or_insert(competition);
        }
        Self { by_id }
    }
}

impl MergeStep for CompetitionJoin<'_> {
    fn step_name(&self) -> &'static str {
        "competition_join"
    }

    fn apply(&self, rows: Vec<AnalysisRow>) -> Vec<AnalysisRow> {
        rows.into_iter()
            .map(|row| {
                let found = row
                    .domestic_competition_id
                    .as_deref()
                    .and_then(|id| self.by_id.get(id));
                match found {
                    Some(competition) => AnalysisRow {
                        competition_id: Some(competition.competition_id.clone()),
                        country_name: competition.country_name.clone(),
                        ..row
                    },
                    None => row,
                }
            })
            .collect()
    }
}

/// Join season players onto their current club
pub struct PlayerJoin<'a> {
    by_club: HashMap<i64, Vec<&'a Player>>,
    policy: ClubPolicy,
}

impl<'a> PlayerJoin<'a> {
    pub fn new(players: &'a [Player], season: i32, policy: ClubPolicy) -> Self {
        let mut by_club: HashMap<i64, Vec<&'a Player>> = HashMap::new();
        for player in players.iter().filter(|p| p.last_season == Some(season)) {
            if let Some(club_id) = player.current_club_id {
                by_club.entry(club_id).or_default().push(player);
            }
        }
        Self { by_club, policy }
    }
}

impl MergeStep for PlayerJoin<'_> {
    fn step_name(&self) -> &'static str {
        "player_join"
    }

    fn apply(&self, rows: Vec<AnalysisRow>) -> Vec<AnalysisRow> {
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            match self.by_club.get(&row.club_id) {
                Some(players) => {
                    for player in players {
                        out.push(AnalysisRow {
                            player_id: Some(player.player_id),
                            player_name: player.name.clone(),
                            date_of_birth: player.date_of_birth,
                            ..row.clone()
                        });
                    }
                }
                None if self.policy == ClubPolicy::RetainEmpty => out.push(row),
                None => {}
            }
        }
        out
    }
}

/// Left join of season valuations; a missing value stays 0
pub struct ValuationJoin<'a> {
    by_player: HashMap<i64, &'a PlayerValuation>,
}

impl<'a> ValuationJoin<'a> {
    pub fn new(valuations: &'a [PlayerValuation], season: i32) -> Self {
        let mut by_player: HashMap<i64, &'a PlayerValuation> = HashMap::new();
        let in_season = valuations
            .iter()
            .filter(|v| v.last_season == Some(season) && v.market_value_in_eur.is_some());
        for valuation in in_season {
            // latest dated valuation wins; ties and undated rows go to the later row
            let replace = by_player
                .get(&valuation.player_id)
                .map_or(true, |current| valuation.date >= current.date);
            if replace {
                by_player.insert(valuation.player_id, valuation);
            }
        }
        Self { by_player }
    }
}

impl MergeStep for ValuationJoin<'_> {
    fn step_name(&self) -> &'static str {
        "valuation_join"
    }

    fn apply(&self, rows: Vec<AnalysisRow>) -> Vec<AnalysisRow> {
        rows.into_iter()
            .map(|row| {
                let value = row
                    .player_id
                    .and_then(|id| self.by_player.get(&id))
                    .and_then(|v| v.market_value_in_eur)
                    .unwrap_or(0.0);
                AnalysisRow {
                    market_value_in_eur: value,
                    ..row
                }
            })
            .collect()
    }
}

/// Derive `age` from `date_of_birth`
pub struct AgeDerivation {
    reference_date: NaiveDate,
    unit: AgeUnit,
}

impl AgeDerivation {
    pub fn new(reference_date: NaiveDate, unit: AgeUnit) -> Self {
        Self {
            reference_date,
            unit,
        }
    }
}

/// Age at `reference`; None for a birth date after it
pub fn compute_age(date_of_birth: NaiveDate, reference: NaiveDate, unit: AgeUnit) -> Option<f64> {
    let days = (reference - date_of_birth).num_days();
    if days < 0 {
        return None;
    }
    match unit {
        AgeUnit::Years => Some((days as f64 / 365.25 * 100.0).round() / 100.0),
        AgeUnit::Days => Some(days as f64),
    }
}

impl MergeStep for AgeDerivation {
    fn step_name(&self) -> &'static str {
        "age_derivation"
    }

    fn apply(&self, rows: Vec<AnalysisRow>) -> Vec<AnalysisRow> {
        rows.into_iter()
            .map(|row| {
                let age = row.date_of_birth.and_then(|dob| {
                    let age = compute_age(dob, self.reference_date, self.unit);
                    if age.is_none() {
                        tracing::debug!(
                            player_id = ?row.player_id,
                            %dob,
                            "date of birth after reference date, age left empty"
                        );
                    }
                    age
                });
                AnalysisRow { age, ..row }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MinutesAggregate {
    pub total: u64,
    pub matches: u64,
}

impl MinutesAggregate {
    pub fn average(&self) -> f64 {
        self.total as f64 / self.matches as f64
    }
}

/// Group appearances by player; blank minutes are not counted
pub fn aggregate_minutes(appearances: &[Appearance]) -> HashMap<i64, MinutesAggregate> {
    let mut totals: HashMap<i64, MinutesAggregate> = HashMap::new();
    for appearance in appearances {
        if let Some(minutes) = appearance.minutes_played {
            let entry = totals.entry(appearance.player_id).or_default();
            entry.total += u64::from(minutes);
            entry.matches += 1;
        }
    }
    totals
}

/// Left join of per-player playing time; no appearances means null, not 0
pub struct AppearanceJoin {
    by_player: HashMap<i64, MinutesAggregate>,
}

impl AppearanceJoin {
    pub fn new(appearances: &[Appearance]) -> Self {
        Self {
            by_player: aggregate_minutes(appearances),
        }
    }
}

impl MergeStep for AppearanceJoin {
    fn step_name(&self) -> &'static str {
        "appearance_join"
    }

    fn apply(&self, rows: Vec<AnalysisRow>) -> Vec<AnalysisRow> {
        rows.into_iter()
            .map(|row| match row.player_id.and_then(|id| self.by_player.get(&id)) {
                Some(agg) => AnalysisRow {
                    avg_played_minutes: Some(agg.average()),
                    total_played_minutes: Some(agg.total),
                    ..row
                },
                None => row,
            })
            .collect()
    }
}
