use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to read schema {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("schema is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("schema entry '{family}' is malformed: {source}")]
    InvalidFamily {
        family: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("schema is missing device family '{family}'")]
    MissingFamily { family: &'static str },
    #[error("schema entry '{family}' is missing the '{table}' table")]
    MissingTable {
        family: &'static str,
        table: &'static str,
    },
    #[error("schema entry '{family}' has code '{code}' twice in the '{table}' table (codes are case-insensitive)")]
    DuplicateCode {
        family: &'static str,
        table: &'static str,
        code: String,
    },
    #[error("unknown device family '{name}'")]
    UnknownFamily { name: String },
}
