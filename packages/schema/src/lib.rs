//! # Story Map Schema
//!
//! Typed model of a story map document plus the codecs that move it to and
//! from its persisted YAML/JSON form.
//!
//! The typed [`Document`] is lenient: required fields default to empty values
//! and numeric hints are optional, so partially-invalid documents still load.
//! Structural diagnostics live in `storymap-validator`, which inspects the
//! untyped tree instead.

pub mod codec;
pub mod error;
pub mod model;
pub mod result;
mod wire;

pub use codec::{DocumentFormat, DocumentSerializer, JsonCodec, YamlCodec};
pub use error::*;
pub use model::*;
pub use result::*;
