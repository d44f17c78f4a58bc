//! # Story Map Validator
//!
//! Referential and numeric checks over an untyped story map tree. Checks
//! never stop at the first problem; each one appends what it finds, and the
//! registry order fixes the order of the final list.

mod checks;
mod context;
mod error;
mod validator;
mod violation;

pub use checks::{CheckRegistry, SchemaCheck};
pub use context::{StoryEntry, ValidationContext};
pub use error::ValidationError;
pub use validator::{
    validate, validate_document, validate_or_report, validate_with, ValidateOptions,
};
pub use violation::{Violation, ViolationKind};
