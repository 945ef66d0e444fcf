//! Rich diagnostic error types for artist-rec.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so users know exactly what
//! went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

use crate::config::ConfigError;

/// Top-level error type for artist-rec.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum RecError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Data errors (TSV readers for interactions and the artist catalog)
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum DataError {
    #[error("failed to open data file: {path}")]
    #[diagnostic(
        code(artist_rec::data::io),
        help(
            "Check that the file exists and is readable. \
             Paths can be set with --interactions / --artists or in the [data] config section."
        )
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("missing column \"{column}\" in header")]
    #[diagnostic(
        code(artist_rec::data::missing_column),
        help(
            "The first line of the file must be a tab-separated header naming the columns. \
             Make sure the file is tab-separated and not comma-separated."
        )
    )]
    MissingColumn { column: String },

    #[error("malformed record at row {row}: {reason}")]
    #[diagnostic(
        code(artist_rec::data::malformed_record),
        help(
            "Row numbers count data rows after the header, starting at 1. \
             Ids must be non-negative integers and weights non-negative numbers."
        )
    )]
    MalformedRecord { row: usize, reason: String },
}

/// Convenience alias for data loading results.
pub type DataResult<T> = std::result::Result<T, DataError>;

// ---------------------------------------------------------------------------
// Catalog errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum CatalogError {
    #[error("unknown item id {item_id}")]
    #[diagnostic(
        code(artist_rec::catalog::unknown_item),
        help(
            "The id is not present in the artist catalog. This usually means the \
             catalog and the interaction log come from different dataset exports."
        )
    )]
    UnknownItemId { item_id: usize },
}

/// Convenience alias for catalog lookups.
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

// ---------------------------------------------------------------------------
// Model errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ModelError {
    #[error("model has not been fitted")]
    #[diagnostic(
        code(artist_rec::model::not_fitted),
        help("Call `fit` with an interaction matrix before asking for recommendations.")
    )]
    NotFitted,

    #[error("cannot fit on an interaction matrix with no entries")]
    #[diagnostic(
        code(artist_rec::model::empty_matrix),
        help("The interaction log contained no data rows. Check the input file.")
    )]
    EmptyMatrix,

    #[error("unknown user {user_id}: matrix has {users} user rows")]
    #[diagnostic(
        code(artist_rec::model::unknown_user),
        help("User ids are the row indices of the interaction matrix. Pick an id below the row count.")
    )]
    UnknownUser { user_id: usize, users: usize },
}

/// Convenience alias for model results.
pub type ModelResult<T> = std::result::Result<T, ModelError>;

/// Convenience alias for functions returning artist-rec results.
pub type RecResult<T> = std::result::Result<T, RecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_error_converts_to_rec_error() {
        let err = CatalogError::UnknownItemId { item_id: 7 };
        let rec: RecError = err.into();
        assert!(matches!(
            rec,
            RecError::Catalog(CatalogError::UnknownItemId { item_id: 7 })
        ));
    }

    #[test]
    fn model_error_converts_to_rec_error() {
        let rec: RecError = ModelError::NotFitted.into();
        assert!(matches!(rec, RecError::Model(ModelError::NotFitted)));
    }

    #[test]
    fn malformed_record_names_the_row() {
        let err = DataError::MalformedRecord {
            row: 42,
            reason: "invalid weight \"abc\"".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("row 42"));
        assert!(msg.contains("abc"));
    }
}
