pub mod analysis;
pub mod cache;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod loader;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod records;
pub mod schema;
pub mod selection;
pub mod stats;
pub mod table;

pub use analysis::{AnalysisRow, AnalysisTable, PipelineWarning};
pub use config::{AgeUnit, ClubPolicy, Config, PipelineConfig, SeasonPolicy};
pub use error::{PipelineError, Result};
pub use loader::SourceTables;
pub use pipeline::{merge, MergePipeline};
pub use selection::{Metric, Selection};
pub use table::Table;
