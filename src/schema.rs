//! Input schema checks and optional-column capability detection.

use crate::constants::{self, COACH_NAME, LATITUDE, LONGITUDE, NET_TRANSFER_RECORD};
use crate::error::Result;
use crate::loader::SourceTables;
use crate::table::Table;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

/// Check every required column of every source table.
///
/// Runs before any row is converted or joined; the first missing column
/// (in table order, then column order) is reported.
pub fn validate(sources: &SourceTables) -> Result<()> {
    for (slot, table) in constants::SOURCE_TABLES.iter().zip(sources.iter()) {
        require_all(table, constants::required_columns(slot))?;
    }
    Ok(())
}

fn require_all(table: &Table, columns: &[&str]) -> Result<()> {
    for column in columns {
        table.require(column)?;
    }
    debug!("Schema ok for {}", table.name());
    Ok(())
}

/// Downstream sections that depend on optional club columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Geography,
    Coaches,
    TransferMarket,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Geography, Section::Coaches, Section::TransferMarket];

    /// Club columns the section needs
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Section::Geography => &[LATITUDE, LONGITUDE],
            Section::Coaches => &[COACH_NAME],
            Section::TransferMarket => &[NET_TRANSFER_RECORD],
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Geography => "geography",
            Section::Coaches => "coaches",
            Section::TransferMarket => "transfer_market",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    sections: BTreeSet<Section>,
}

impl Capabilities {
    pub fn enabled(&self, section: Section) -> bool {
        self.sections.contains(&section)
    }

    pub fn sections(&self) -> impl Iterator<Item = Section> + '_ {
        self.sections.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Negotiate the enabled sections from the club table's columns
pub fn detect_capabilities(clubs: &Table) -> Capabilities {
    let sections = Section::ALL
        .into_iter()
        .filter(|s| s.columns().iter().all(|c| clubs.has_column(c)))
        .collect();
    Capabilities { sections }
}
