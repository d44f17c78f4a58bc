//! # Codecs
//!
//! Conversions between persisted text and the story map model. Two shapes
//! come out of a parse: the untyped tree (`serde_json::Value`) that the
//! validator inspects, and the typed [`Document`] used everywhere else.

use crate::error::SchemaError;
use crate::model::{Document, StoryMapFile};
use crate::result::SchemaResult;
use serde_json::Value;
use std::path::Path;

/// Root key of a persisted story map
pub const ROOT_KEY: &str = "integrated_story_map";

/// Persisted text format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Detect the format from a file extension (`.yaml`, `.yml`, `.json`)
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Some(DocumentFormat::Yaml),
            Some("json") => Some(DocumentFormat::Json),
            _ => None,
        }
    }

    pub fn parse_value(&self, source: &str) -> SchemaResult<Value> {
        match self {
            DocumentFormat::Yaml => YamlCodec::parse_value(source),
            DocumentFormat::Json => JsonCodec::parse_value(source),
        }
    }

    pub fn serializer(&self) -> Box<dyn DocumentSerializer> {
        match self {
            DocumentFormat::Yaml => Box::new(YamlCodec),
            DocumentFormat::Json => Box::new(JsonCodec),
        }
    }
}

/// Turns a finished document into its persisted representation
pub trait DocumentSerializer {
    fn format(&self) -> DocumentFormat;

    fn serialize(&self, document: &Document) -> SchemaResult<String>;
}

/// YAML codec (`serde_yaml`)
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

impl YamlCodec {
    pub fn parse_value(source: &str) -> SchemaResult<Value> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn decode(source: &str) -> SchemaResult<Document> {
        decode_value(Self::parse_value(source)?)
    }
}

impl DocumentSerializer for YamlCodec {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Yaml
    }

    fn serialize(&self, document: &Document) -> SchemaResult<String> {
        Ok(serde_yaml::to_string(&StoryMapFile::new(document.clone()))?)
    }
}

/// JSON codec (`serde_json`)
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    pub fn parse_value(source: &str) -> SchemaResult<Value> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn decode(source: &str) -> SchemaResult<Document> {
        decode_value(Self::parse_value(source)?)
    }
}

impl DocumentSerializer for JsonCodec {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Json
    }

    fn serialize(&self, document: &Document) -> SchemaResult<String> {
        Ok(serde_json::to_string_pretty(&StoryMapFile::new(
            document.clone(),
        ))?)
    }
}

/// Decode an untyped tree into the typed model
pub fn decode_value(value: Value) -> SchemaResult<Document> {
    if value.get(ROOT_KEY).is_none() {
        return Err(SchemaError::MissingRoot(ROOT_KEY));
    }
    let file: StoryMapFile = serde_json::from_value(value)?;
    Ok(file.integrated_story_map)
}

/// Read a file into the untyped tree, picking the codec from its extension
pub fn read_value(path: &Path) -> SchemaResult<Value> {
    let format = DocumentFormat::from_path(path)
        .ok_or_else(|| SchemaError::UnsupportedFormat(path.display().to_string()))?;
    let source = std::fs::read_to_string(path)?;
    format.parse_value(&source)
}

/// Read and decode a file into the typed model
pub fn read_document(path: &Path) -> SchemaResult<Document> {
    decode_value(read_value(path)?)
}
