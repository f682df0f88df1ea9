//! Porting error types.

use std::io::ErrorKind;

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, PortError>;

/// Porting operation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PortError {
    /// No layout registered for the type at any version
    #[error("No layout registered for type '{type_name}'")]
    SchemaNotFound { type_name: String },

    /// Enumerated kind names an unknown enumeration
    #[error("Enumeration '{enum_name}' not registered")]
    EnumNotFound { enum_name: String },

    /// Malformed layout or enumeration at registration time
    #[error("Invalid layout for '{type_name}': {message}")]
    InvalidLayout { type_name: String, message: String },

    /// Layout or enumeration registered twice
    #[error("'{type_name}' already registered")]
    AlreadyRegistered { type_name: String },

    /// Field not carried by the record instance
    #[error("Field '{field}' not found in '{type_name}'")]
    FieldNotFound { type_name: String, field: String },

    /// Value of the wrong kind assigned to a field
    #[error("Type mismatch for field '{field}': expected {expected}, got {got}")]
    TypeMismatch {
        field: String,
        expected: String,
        got: String,
    },

    /// Chunk declares more bytes than its enclosing region holds
    #[error("Chunk '{signature}' declares {declared} bytes but only {remaining} remain")]
    ChunkOverrun {
        signature: String,
        declared: u64,
        remaining: u64,
    },

    /// Read past the end of a bounded region
    #[error("Truncated data: needed {needed} bytes, {remaining} remain")]
    TruncatedHeader { needed: u64, remaining: u64 },

    /// Record array payload is not a whole number of records
    #[error("Chunk '{signature}' size {size} is not a multiple of stride {stride}")]
    StrideMismatch {
        signature: String,
        size: u64,
        stride: usize,
    },

    /// Nested containers deeper than the configured limit
    #[error("Chunk nesting exceeds maximum depth {depth}")]
    ChunkDepthExceeded { depth: usize },

    /// Template name carries no parseable option list
    #[error("Invalid template name '{name}'")]
    InvalidTemplateName { name: String },

    /// Option vector length differs from the family's dimension count
    #[error("Option count mismatch: expected {expected}, got {got}")]
    OptionCountMismatch { expected: usize, got: usize },

    /// Option value without a curated priority
    #[error("Option {option} of dimension {dimension} has no priority rank")]
    UnrankedOption { dimension: usize, option: u16 },

    /// Malformed priority table
    #[error("Invalid priority table for dimension '{dimension}': {message}")]
    InvalidPriorityTable { dimension: String, message: String },

    /// Catalog or instance serialization failure
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(String),
}

/// Classifies I/O errors into [`PortError`] variants.
pub fn classify_io_error(error: std::io::Error, context: &str) -> PortError {
    match error.kind() {
        ErrorKind::InvalidData => PortError::SerializationError(format!("{}: {}", context, error)),
        _ => PortError::Io(format!("{}: {}", context, error)),
    }
}
