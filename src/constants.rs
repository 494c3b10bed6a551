/// Source table names, also used as file stems under the data directory
pub const CLUBS: &str = "clubs";
pub const COMPETITIONS: &str = "competitions";
pub const PLAYERS: &str = "players";
pub const PLAYER_VALUATIONS: &str = "player_valuations";
pub const APPEARANCES: &str = "appearances";

/// All source tables in validation order
pub const SOURCE_TABLES: [&str; 5] = [CLUBS, COMPETITIONS, PLAYERS, PLAYER_VALUATIONS, APPEARANCES];

// Required columns per source table
pub const CLUB_COLUMNS: &[&str] = &[
    "club_id",
    "name",
    "domestic_competition_id",
    "squad_size",
    "average_age",
    "foreigners_percentage",
];
pub const COMPETITION_COLUMNS: &[&str] = &["competition_id", "country_name"];
pub const PLAYER_COLUMNS: &[&str] = &[
    "player_id",
    "current_club_id",
    "name",
    "date_of_birth",
    "last_season",
];
pub const VALUATION_COLUMNS: &[&str] = &["player_id", "last_season", "market_value_in_eur"];
pub const APPEARANCE_COLUMNS: &[&str] = &["player_id", "minutes_played"];

// Optional club columns that switch on downstream sections
pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";
pub const COACH_NAME: &str = "coach_name";
pub const NET_TRANSFER_RECORD: &str = "net_transfer_record";

/// Optional valuation column used to pick the latest valuation in a season
pub const VALUATION_DATE: &str = "date";

pub const DEFAULT_SEASON: i32 = 2023;
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_CONFIG_FILE: &str = "club_analysis.toml";

/// Get the CSV file name for a source table
pub fn file_name(table: &str) -> String {
    format!("{table}.csv")
}

/// Get the required columns for a source table
pub fn required_columns(table: &str) -> &'static [&'static str] {
    match table {
        CLUBS => CLUB_COLUMNS,
        COMPETITIONS => COMPETITION_COLUMNS,
        PLAYERS => PLAYER_COLUMNS,
        PLAYER_VALUATIONS => VALUATION_COLUMNS,
        APPEARANCES => APPEARANCE_COLUMNS,
        _ => &[],
    }
}
