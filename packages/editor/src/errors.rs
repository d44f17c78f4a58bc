//! Error types for the editor

use storymap_schema::SchemaError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("No document serializer configured for this session")]
    SerializerUnavailable,

    #[error("Serialization failed: {0}")]
    Serialize(#[from] SchemaError),
}

pub type EditorResult<T> = Result<T, EditorError>;
