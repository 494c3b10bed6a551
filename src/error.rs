use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Schema error: table '{table}' is missing required column '{column}'")]
    Schema { table: String, column: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error in '{table}' row {row}, column '{column}': cannot parse {value:?}")]
    Parse {
        table: String,
        row: usize,
        column: String,
        value: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),
}

impl PipelineError {
    pub fn schema(table: &str, column: &str) -> Self {
        PipelineError::Schema {
            table: table.to_string(),
            column: column.to_string(),
        }
    }

    pub fn is_schema(&self) -> bool {
        matches!(self, PipelineError::Schema { .. })
    }

    pub fn is_config(&self) -> bool {
        matches!(self, PipelineError::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
