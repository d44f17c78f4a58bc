use serde::{Deserialize, Serialize};

/// Category of a schema violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationKind {
    MissingField,
    UnresolvedReference,
    DuplicateId,
    RangeViolation,
    EnumViolation,
    IncompleteOrdering,
}

impl ViolationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::MissingField => "missing-field",
            ViolationKind::UnresolvedReference => "unresolved-reference",
            ViolationKind::DuplicateId => "duplicate-id",
            ViolationKind::RangeViolation => "range",
            ViolationKind::EnumViolation => "enum",
            ViolationKind::IncompleteOrdering => "incomplete-ordering",
        }
    }
}

/// A single problem found in a story map document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,

    /// The check that produced this violation
    pub check: String,

    /// Location inside the document, e.g. `backbones[2].activity_id`
    pub path: String,

    /// Human-readable message
    pub message: String,
}

impl Violation {
    pub fn new(
        kind: ViolationKind,
        check: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            check: check.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn missing_field(check: &str, path: impl Into<String>, field: &str) -> Self {
        Self::new(
            ViolationKind::MissingField,
            check,
            path,
            format!("required key \"{}\" is missing", field),
        )
    }

    pub fn unresolved(
        check: &str,
        path: impl Into<String>,
        field: &str,
        value: &str,
        target: &str,
    ) -> Self {
        Self::new(
            ViolationKind::UnresolvedReference,
            check,
            path,
            format!("{} \"{}\" does not match any {}", field, value, target),
        )
    }

    pub fn duplicate(
        check: &str,
        path: impl Into<String>,
        what: &str,
        id: &str,
        first_seen: &str,
    ) -> Self {
        Self::new(
            ViolationKind::DuplicateId,
            check,
            path,
            format!("duplicate {} id \"{}\" (first defined at {})", what, id, first_seen),
        )
    }

    pub fn range(check: &str, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ViolationKind::RangeViolation, check, path, message)
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.path, self.message)
    }
}
