// errors.rs
use std::fmt;

/// Errors surfaced by the pipeline stages. Row-level problems never appear
/// here; they are absorbed by the validator/transformer. Only batch-shape
/// problems (schema drift, a failed transaction) and environment problems
/// (config, workbook I/O) are fatal to a run.
#[derive(Debug)]
pub enum PipelineError {
    Config(String),
    Network(String),
    JsonParse(String),
    UnexpectedShape(String),
    SchemaDrift(Vec<String>),
    Db(String),
    Xlsx(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Config(msg) => write!(f, "Config error: {msg}"),
            PipelineError::Network(msg) => write!(f, "Network error: {msg}"),
            PipelineError::JsonParse(msg) => write!(f, "JSON parse error: {msg}"),
            PipelineError::UnexpectedShape(msg) => write!(f, "Unexpected data shape: {msg}"),
            PipelineError::SchemaDrift(cols) => {
                write!(f, "Schema drift: missing required columns {}", cols.join(", "))
            }
            PipelineError::Db(msg) => write!(f, "Database error: {msg}"),
            PipelineError::Xlsx(msg) => write!(f, "Xlsx error: {msg}"),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<rusqlite::Error> for PipelineError {
    fn from(e: rusqlite::Error) -> Self {
        PipelineError::Db(e.to_string())
    }
}
