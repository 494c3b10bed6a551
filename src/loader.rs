use crate::constants::{self, APPEARANCES, CLUBS, COMPETITIONS, PLAYERS, PLAYER_VALUATIONS};
use crate::error::Result;
use crate::table::Table;
use std::path::Path;
use tracing::{debug, info, instrument};

/// The five raw inputs of one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct SourceTables {
    pub clubs: Table,
    pub competitions: Table,
    pub players: Table,
    pub player_valuations: Table,
    pub appearances: Table,
}

impl SourceTables {
    /// Load `clubs.csv`, `competitions.csv`, `players.csv`,
    /// `player_valuations.csv` and `appearances.csv` from one directory.
    #[instrument(skip_all, fields(data_dir = %data_dir.display()))]
    pub fn load(data_dir: &Path) -> Result<Self> {
        info!("📂 Loading source tables");
        let read = |name: &str| -> Result<Table> {
            let path = data_dir.join(constants::file_name(name));
            let table = Table::from_path(name, &path)?;
            debug!("Loaded {} rows from {}", table.len(), path.display());
            Ok(table)
        };

        let tables = Self {
            clubs: read(CLUBS)?,
            competitions: read(COMPETITIONS)?,
            players: read(PLAYERS)?,
            player_valuations: read(PLAYER_VALUATIONS)?,
            appearances: read(APPEARANCES)?,
        };
        info!("✅ Loaded {} clubs and {} players", tables.clubs.len(), tables.players.len());
        Ok(tables)
    }

    /// Tables in validation order
    pub fn iter(&self) -> impl Iterator<Item = &Table> {
        [
            &self.clubs,
            &self.competitions,
            &self.players,
            &self.player_valuations,
            &self.appearances,
        ]
        .into_iter()
    }
}
