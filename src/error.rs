use std::path::PathBuf;

use thiserror::Error;

/// gormgen errors
#[derive(Error, Debug)]
pub enum GormgenError {
    #[error("Failed to connect to database: {0}")]
    Connection(String),

    #[error("Catalog query failed for schema '{schema}': {message}")]
    Query { schema: String, message: String },

    #[error("Code generation failed for table '{table}': {message}")]
    CodeGen { table: String, message: String },

    #[error("Column '{table}.{column}' has unmapped type '{db_type}'")]
    UnmappedType {
        table: String,
        column: String,
        db_type: String,
    },

    #[error("Columns '{first}' and '{second}' of table '{table}' both map to field '{field}'")]
    FieldCollision {
        table: String,
        field: String,
        first: String,
        second: String,
    },

    #[error("Failed to write '{}': {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}
