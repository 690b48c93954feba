//! Error types for the SIGA normalization pipeline
//!
//! Field-level malformation never produces an error: every bad number,
//! coordinate or category degrades to a default value. [`SigaError`] only
//! covers conditions that abort a whole batch, such as a structurally
//! required column missing from the source header.
//!
//! # Example
//!
//! ```
//! use siga_core::{ColumnMap, Normalizer, GenerationTypeTable, SigaError};
//!
//! let normalizer = Normalizer::new(ColumnMap::default(), GenerationTypeTable::aneel());
//! let err = normalizer.ensure_columns(["NomEmpreendimento"]).unwrap_err();
//! assert!(matches!(err, SigaError::MissingColumn(ref c) if c == "SigTipoGeracao"));
//! ```

use thiserror::Error;

/// Unified error type for batch-level failures.
#[derive(Error, Debug)]
pub enum SigaError {
    /// A column required by downstream consumers is absent from the input
    #[error("required column '{0}' is missing from the input header")]
    MissingColumn(String),

    /// Invalid configuration (column map, code table, source options)
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias for results carrying [`SigaError`].
pub type SigaResult<T> = Result<T, SigaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_message_names_column() {
        let err = SigaError::MissingColumn("SigTipoGeracao".to_string());
        assert_eq!(
            err.to_string(),
            "required column 'SigTipoGeracao' is missing from the input header"
        );
    }

    #[test]
    fn test_config_message() {
        let err = SigaError::Config("unknown field 'tipo' in columns.required".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: unknown field 'tipo' in columns.required"
        );
    }
}
