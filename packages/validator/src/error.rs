use crate::violation::Violation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidationError {
    /// The document lacks the minimum structure needed to run any check
    #[error("Fatal document shape: {0}")]
    FatalShape(Violation),

    #[error("Could not encode document for validation: {0}")]
    Encode(#[from] serde_json::Error),
}
