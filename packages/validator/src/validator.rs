use crate::checks::CheckRegistry;
use crate::context::ValidationContext;
use crate::error::ValidationError;
use crate::violation::{Violation, ViolationKind};
use serde_json::Value;
use storymap_schema::{codec::ROOT_KEY, Document, StoryMapFile};
use tracing::{debug, info, instrument};

/// Options for configuring validation
#[derive(Debug, Default)]
pub struct ValidateOptions {
    /// Custom check registry (uses the built-in checks if None)
    pub registry: Option<CheckRegistry>,
}

/// Validate an untyped story map tree.
///
/// Content problems are returned as violations in scan order. Only a tree
/// without `integrated_story_map.story_map_structure` fails, with the single
/// root-level violation carried in [`ValidationError::FatalShape`].
pub fn validate(root: &Value) -> Result<Vec<Violation>, ValidationError> {
    validate_with(root, ValidateOptions::default())
}

#[instrument(skip(root, options))]
pub fn validate_with(
    root: &Value,
    options: ValidateOptions,
) -> Result<Vec<Violation>, ValidationError> {
    let registry = options.registry.unwrap_or_default();
    let (story_map, structure) = locate_structure(root)?;
    let ctx = ValidationContext::new(story_map, structure);

    let mut violations = Vec::new();
    for check in registry.checks() {
        let found = check.check(&ctx);
        debug!(check = check.name(), violations = found.len(), "Check complete");
        violations.extend(found);
    }

    info!(violations = violations.len(), "Validation complete");
    Ok(violations)
}

/// Like [`validate`], but folds a fatal shape error into a one-element list
pub fn validate_or_report(root: &Value) -> Vec<Violation> {
    match validate(root) {
        Ok(violations) => violations,
        Err(ValidationError::FatalShape(violation)) => vec![violation],
        Err(other) => vec![Violation::new(
            ViolationKind::MissingField,
            "root",
            "root",
            other.to_string(),
        )],
    }
}

/// Validate an already-decoded document
pub fn validate_document(document: &Document) -> Result<Vec<Violation>, ValidationError> {
    let root = serde_json::to_value(StoryMapFile::new(document.clone()))?;
    validate(&root)
}

fn locate_structure(
    root: &Value,
) -> Result<(&serde_json::Map<String, Value>, &serde_json::Map<String, Value>), ValidationError> {
    let fatal = |path: &str, message: &str| {
        ValidationError::FatalShape(Violation::new(
            ViolationKind::MissingField,
            "root",
            path,
            message,
        ))
    };

    let root = root
        .as_object()
        .ok_or_else(|| fatal("root", "document root is not a mapping"))?;
    let story_map = root
        .get(ROOT_KEY)
        .and_then(Value::as_object)
        .ok_or_else(|| fatal("root", "integrated_story_map is missing"))?;
    let structure = story_map
        .get("story_map_structure")
        .and_then(Value::as_object)
        .ok_or_else(|| fatal(ROOT_KEY, "story_map_structure is missing"))?;

    Ok((story_map, structure))
}
