use thiserror::Error;

/// Errors raised while decoding or encoding a story map document
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document root is missing '{0}'")]
    MissingRoot(&'static str),

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),
}
