//! Error types for prelegal-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading the document catalog.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Underlying I/O failure (file not found, permission denied, etc.).
    #[error("I/O error reading catalog at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load; includes the catalog path and line context from serde_yaml.
    #[error("failed to parse catalog at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The catalog file did not exist at the expected path.
    #[error("catalog not found at {path}")]
    CatalogNotFound { path: PathBuf },

    /// Two documents share the same id.
    #[error("duplicate document type '{0}' in catalog")]
    DuplicateDocType(String),

    /// The catalog names a fallback document that it does not define.
    #[error("fallback document type '{0}' is not defined in catalog")]
    MissingFallback(String),

    /// A field name is empty, repeated, or not a plain identifier.
    #[error("document type '{doc_type}' has invalid field '{field}': {reason}")]
    InvalidField {
        doc_type: String,
        field: String,
        reason: &'static str,
    },
}

/// Errors raised when a model reply does not match the structured-response schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The reply was not valid JSON at all.
    #[error("model reply is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Valid JSON, wrong shape (e.g. missing `reply`, non-object `fields`).
    #[error("model reply has unexpected shape: {0}")]
    Shape(String),

    /// A field value was neither a string nor null.
    #[error("field '{field}' must be a string or null, got {found}")]
    FieldType { field: String, found: &'static str },
}
