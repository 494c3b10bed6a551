use crate::analysis::AnalysisTable;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::loader::SourceTables;
use crate::metrics::PipelineMetrics;
use crate::pipeline::MergePipeline;
use crate::table::Table;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tracing::debug;

const UNIT_SEP: &[u8] = b"\x1f";
const RECORD_SEP: &[u8] = b"\x1e";
const GROUP_SEP: &[u8] = b"\x1d";

/// Cache key for a (snapshot, config) pair.
///
/// Every table contributes its name, header and cells with separators, so
/// moving a value between cells changes the key. The config part includes
/// the resolved reference date.
pub fn fingerprint(sources: &SourceTables, config: &PipelineConfig) -> String {
    let mut hasher = Sha256::new();
    for table in sources.iter() {
        hash_table(&mut hasher, table);
    }

    let config = config.resolved();
    let mut s = String::new();
    s.push_str(&config.target_season.to_string());
    s.push('|');
    s.push_str(&format!("{:?}", config.age_unit));
    s.push('|');
    s.push_str(&format!("{:?}", config.club_policy));
    s.push('|');
    s.push_str(&format!("{:?}", config.season_policy));
    s.push('|');
    s.push_str(&config.reference_date().to_string());
    hasher.update(s.as_bytes());

    hex::encode(hasher.finalize())
}

fn hash_table(hasher: &mut Sha256, table: &Table) {
    hasher.update(table.name().as_bytes());
    hasher.update(RECORD_SEP);
    for column in table.columns() {
        hasher.update(column.as_bytes());
        hasher.update(UNIT_SEP);
    }
    hasher.update(RECORD_SEP);
    for row in table.rows() {
        for cell in row {
            hasher.update(cell.as_bytes());
            hasher.update(UNIT_SEP);
        }
        hasher.update(RECORD_SEP);
    }
    hasher.update(GROUP_SEP);
}

/// Memoized pipeline results keyed by [`fingerprint`]
#[derive(Debug, Default)]
pub struct PipelineCache {
    entries: HashMap<String, AnalysisTable>,
}

impl PipelineCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the cached table for this snapshot, running the pipeline on a miss.
    /// Failed runs are not cached.
    pub fn get_or_run(&mut self, sources: &SourceTables, config: &PipelineConfig) -> Result<&AnalysisTable> {
        let config = config.resolved();
        let key = fingerprint(sources, &config);

        if self.entries.contains_key(&key) {
            PipelineMetrics::cache_hit();
            debug!(key = %key, "Pipeline cache hit");
        } else {
            PipelineMetrics::cache_miss();
            debug!(key = %key, "Pipeline cache miss");
            let table = MergePipeline::new(config).run(sources)?;
            self.entries.insert(key.clone(), table);
        }

        Ok(&self.entries[&key])
    }
}
