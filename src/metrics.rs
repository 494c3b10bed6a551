//! Pipeline metrics.
//!
//! Counters and histograms go through the `metrics` facade; without an
//! installed recorder they are no-ops. The CLI installs a Prometheus
//! recorder when asked to print a snapshot.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use tracing::{info, warn};

pub const RUNS_TOTAL: &str = "club_analysis_pipeline_runs_total";
pub const RUN_FAILURES_TOTAL: &str = "club_analysis_pipeline_failures_total";
pub const ROWS_EMITTED_TOTAL: &str = "club_analysis_rows_emitted_total";
pub const RUN_DURATION_SECONDS: &str = "club_analysis_pipeline_duration_seconds";
pub const SEASON_MISSING_TOTAL: &str = "club_analysis_season_missing_total";
pub const CACHE_HITS_TOTAL: &str = "club_analysis_cache_hits_total";
pub const CACHE_MISSES_TOTAL: &str = "club_analysis_cache_misses_total";

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the global Prometheus recorder. Idempotent.
pub fn init_metrics() -> Option<&'static PrometheusHandle> {
    if let Some(handle) = HANDLE.get() {
        return Some(handle);
    }
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            info!("Prometheus recorder installed");
            Some(HANDLE.get_or_init(|| handle))
        }
        Err(e) => {
            warn!("Failed to install Prometheus recorder: {}", e);
            None
        }
    }
}

/// Render the current snapshot in text exposition format
pub fn render() -> Option<String> {
    HANDLE.get().map(|h| h.render())
}

/// Metrics emitted by the merge pipeline and its cache
pub struct PipelineMetrics;

impl PipelineMetrics {
    pub fn run_started() {
        ::metrics::counter!(RUNS_TOTAL).increment(1);
    }

    pub fn run_failed() {
        ::metrics::counter!(RUN_FAILURES_TOTAL).increment(1);
    }

    pub fn rows_emitted(rows: usize) {
        ::metrics::counter!(ROWS_EMITTED_TOTAL).increment(rows as u64);
    }

    pub fn run_duration(secs: f64) {
        ::metrics::histogram!(RUN_DURATION_SECONDS).record(secs);
    }

    pub fn season_missing(table: &str) {
        ::metrics::counter!(SEASON_MISSING_TOTAL, "table" => table.to_string()).increment(1);
    }

    pub fn cache_hit() {
        ::metrics::counter!(CACHE_HITS_TOTAL).increment(1);
    }

    pub fn cache_miss() {
        ::metrics::counter!(CACHE_MISSES_TOTAL).increment(1);
    }
}
