#![allow(dead_code)]

use chrono::NaiveDate;
use club_analysis::{PipelineConfig, SourceTables, Table};

pub const CLUBS_CSV: &str = "\
club_id,name,domestic_competition_id,squad_size,average_age,foreigners_percentage,coach_name
1,Arsenal,GB1,26,25.1,60.0,Mikel Arteta
2,Chelsea,GB1,30,23.9,55.5,
3,Real Madrid,ES1,24,27.2,41.7,Carlo Ancelotti
4,Ghost FC,XX9,,,,
";

pub const COMPETITIONS_CSV: &str = "\
competition_id,country_name
GB1,England
ES1,Spain
";

pub const PLAYERS_CSV: &str = "\
player_id,current_club_id,name,date_of_birth,last_season
10,1,Bukayo Saka,2001-09-05 00:00:00,2023
11,1,Declan Rice,2000-01-01,2023
12,2,Old Timer,1980-01-01,2021
13,3,Jude Bellingham,2003-06-29,2023
14,4,Nobody,,2023
15,99,Lost Player,2000-01-01,2023
";

pub const VALUATIONS_CSV: &str = "\
player_id,last_season,market_value_in_eur
10,2023,120000000
11,2023,100000000
13,2022,90000000
14,2023,1000000
";

pub const APPEARANCES_CSV: &str = "\
player_id,minutes_played
10,10
10,20
10,30
13,0
";

pub fn table(name: &str, csv: &str) -> Table {
    Table::from_reader(name, csv.as_bytes()).expect("fixture csv")
}

pub fn sources() -> SourceTables {
    SourceTables {
        clubs: table("clubs", CLUBS_CSV),
        competitions: table("competitions", COMPETITIONS_CSV),
        players: table("players", PLAYERS_CSV),
        player_valuations: table("player_valuations", VALUATIONS_CSV),
        appearances: table("appearances", APPEARANCES_CSV),
    }
}

pub fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

pub fn config() -> PipelineConfig {
    PipelineConfig::for_season(2023).with_reference_date(reference_date())
}

/// Write the fixture tables into a directory as CSV files
pub fn write_data_dir(dir: &std::path::Path) {
    for (name, body) in [
        ("clubs", CLUBS_CSV),
        ("competitions", COMPETITIONS_CSV),
        ("players", PLAYERS_CSV),
        ("player_valuations", VALUATIONS_CSV),
        ("appearances", APPEARANCES_CSV),
    ] {
        std::fs::write(dir.join(format!("{name}.csv")), body).expect("write fixture");
    }
}
