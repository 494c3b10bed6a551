//! Typed source rows.
//!
//! Conversions assume the table already passed [`crate::schema::validate`];
//! required columns are looked up with `require` anyway so a direct caller
//! still gets a schema error instead of a panic.

use crate::constants::{COACH_NAME, LATITUDE, LONGITUDE, NET_TRANSFER_RECORD, VALUATION_DATE};
use crate::error::Result;
use crate::table::{RowRef, Table};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Club {
    pub club_id: i64,
    pub name: String,
    pub domestic_competition_id: Option<String>,
    pub squad_size: Option<u32>,
    pub average_age: Option<f64>,
    pub foreigners_percentage: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub coach_name: Option<String>,
    pub net_transfer_record: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competition {
    pub competition_id: String,
    pub country_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub player_id: i64,
    pub current_club_id: Option<i64>,
    pub name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub last_season: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerValuation {
    pub player_id: i64,
    pub last_season: Option<i32>,
    pub market_value_in_eur: Option<f64>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    pub player_id: i64,
    pub minutes_played: Option<u32>,
}

/// Parse an ISO-8601 date, with or without a time part
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
                .ok()
                .map(|dt| dt.date())
        })
}

/// Parse a join key. A blank key can never match, so the row is skipped.
fn key_cell(row: &RowRef<'_>, column: usize, column_name: &str) -> Result<Option<i64>> {
    let key = row.parse(column, column_name)?;
    if key.is_none() {
        debug!(table = row.table(), row = row.index(), "Skipping row with blank {}", column_name);
    }
    Ok(key)
}

fn date_cell(row: &RowRef<'_>, column: usize, column_name: &str) -> Result<Option<NaiveDate>> {
    match row.get(column) {
        None => Ok(None),
        Some(raw) => parse_date(raw)
            .map(Some)
            .ok_or_else(|| row.parse_error(column_name, raw)),
    }
}

impl Club {
    pub fn from_table(table: &Table) -> Result<Vec<Club>> {
        let club_id = table.require("club_id")?;
        let name = table.require("name")?;
        let competition = table.require("domestic_competition_id")?;
        let squad_size = table.require("squad_size")?;
        let average_age = table.require("average_age")?;
        let foreigners = table.require("foreigners_percentage")?;
        let latitude = table.column_index(LATITUDE);
        let longitude = table.column_index(LONGITUDE);
        let coach = table.column_index(COACH_NAME);
        let transfers = table.column_index(NET_TRANSFER_RECORD);

        table
            .iter()
            .map(|row| -> Result<Option<Club>> {
                let Some(id) = key_cell(&row, club_id, "club_id")? else {
                    return Ok(None);
                };
                Ok(Some(Club {
                    club_id: id,
                    name: row.text(name).unwrap_or_default(),
                    domestic_competition_id: row.text(competition),
                    squad_size: row.parse(squad_size, "squad_size")?,
                    average_age: row.parse(average_age, "average_age")?,
                    foreigners_percentage: row.parse(foreigners, "foreigners_percentage")?,
                    latitude: latitude.map(|i| row.parse(i, LATITUDE)).transpose()?.flatten(),
                    longitude: longitude.map(|i| row.parse(i, LONGITUDE)).transpose()?.flatten(),
                    coach_name: coach.and_then(|i| row.text(i)),
                    net_transfer_record: transfers.and_then(|i| row.text(i)),
                }))
            })
            .filter_map(Result::transpose)
            .collect()
    }
}

impl Competition {
    pub fn from_table(table: &Table) -> Result<Vec<Competition>> {
        let competition_id = table.require("competition_id")?;
        let country_name = table.require("country_name")?;

        // A competition without an id can never be joined
        Ok(table
            .iter()
            .filter_map(|row| {
                row.text(competition_id).map(|id| Competition {
                    competition_id: id,
                    country_name: row.text(country_name),
                })
            })
            .collect())
    }
}

impl Player {
    pub fn from_table(table: &Table) -> Result<Vec<Player>> {
        let player_id = table.require("player_id")?;
        let club = table.require("current_club_id")?;
        let name = table.require("name")?;
        let dob = table.require("date_of_birth")?;
        let season = table.require("last_season")?;

        table
            .iter()
            .map(|row| -> Result<Option<Player>> {
                let Some(id) = key_cell(&row, player_id, "player_id")? else {
                    return Ok(None);
                };
                Ok(Some(Player {
                    player_id: id,
                    current_club_id: row.parse(club, "current_club_id")?,
                    name: row.text(name),
                    date_of_birth: date_cell(&row, dob, "date_of_birth")?,
                    last_season: row.parse(season, "last_season")?,
                }))
            })
            .filter_map(Result::transpose)
            .collect()
    }
}

impl PlayerValuation {
    pub fn from_table(table: &Table) -> Result<Vec<PlayerValuation>> {
        let player_id = table.require("player_id")?;
        let season = table.require("last_season")?;
        let value = table.require("market_value_in_eur")?;
        let date = table.column_index(VALUATION_DATE);

        table
            .iter()
            .map(|row| -> Result<Option<PlayerValuation>> {
                let Some(id) = key_cell(&row, player_id, "player_id")? else {
                    return Ok(None);
                };
                Ok(Some(PlayerValuation {
                    player_id: id,
                    last_season: row.parse(season, "last_season")?,
                    market_value_in_eur: row.parse(value, "market_value_in_eur")?,
                    date: date
                        .map(|i| date_cell(&row, i, VALUATION_DATE))
                        .transpose()?
                        .flatten(),
                }))
            })
            .filter_map(Result::transpose)
            .collect()
    }
}

impl Appearance {
    pub fn from_table(table: &Table) -> Result<Vec<Appearance>> {
        let player_id = table.require("player_id")?;
        let minutes = table.require("minutes_played")?;

        table
            .iter()
            .map(|row| -> Result<Option<Appearance>> {
                let Some(id) = key_cell(&row, player_id, "player_id")? else {
                    return Ok(None);
                };
                Ok(Some(Appearance {
                    player_id: id,
                    minutes_played: row.parse(minutes, "minutes_played")?,
                }))
            })
            .filter_map(Result::transpose)
            .collect()
    }
}
