use crate::error::SchemaError;

/// Result type alias shared by the story map crates
pub type SchemaResult<T> = Result<T, SchemaError>;
