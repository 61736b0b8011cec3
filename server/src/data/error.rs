//! Unified error type for the data layer

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration {version} ({name}) failed: {error}")]
    MigrationFailed {
        version: i32,
        name: String,
        error: String,
    },

    #[error("Cannot read {path}: {source}")]
    RawFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Cannot read workbook {path}: {message}")]
    Workbook { path: PathBuf, message: String },

    /// A declared column could not be coerced to its target type.
    /// Fatal for the whole run; there is no partial-row recovery.
    #[error("Cannot coerce column '{column}' value '{value}' in {file}: {message}")]
    Coercion {
        file: String,
        column: &'static str,
        value: String,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DataError {
    pub fn coercion(
        file: impl Into<String>,
        column: &'static str,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Coercion {
            file: file.into(),
            column,
            value: value.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coercion_error_names_file_and_column() {
        let err = DataError::coercion(
            "orders_api.json",
            "order_timestamp",
            "not-a-date",
            "invalid timestamp",
        );
        assert_eq!(
            err.to_string(),
            "Cannot coerce column 'order_timestamp' value 'not-a-date' in orders_api.json: invalid timestamp"
        );
    }

    #[test]
    fn test_migration_failed_error_display() {
        let err = DataError::MigrationFailed {
            version: 2,
            name: "add_marketing_spend".to_string(),
            error: "syntax error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Migration 2 (add_marketing_spend) failed: syntax error"
        );
    }
}
