mod activities;
pub(crate) mod backbones;
mod collections;
mod display_order;
mod stories;
mod story_mapping;

pub use activities::ActivitiesCheck;
pub use backbones::BackbonesCheck;
pub use collections::RequiredCollectionsCheck;
pub use display_order::DisplayOrderCheck;
pub use stories::StoriesCheck;
pub use story_mapping::StoryMappingCheck;

use crate::context::ValidationContext;
use crate::violation::Violation;

/// A single pass over the document that reports violations
pub trait SchemaCheck {
    /// Unique identifier, copied into every violation it reports
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    fn check(&self, ctx: &ValidationContext<'_>) -> Vec<Violation>;
}

/// Ordered set of checks. Violations are reported in registry order, so the
/// order here is part of the output contract.
pub struct CheckRegistry {
    checks: Vec<Box<dyn SchemaCheck>>,
}

impl CheckRegistry {
    /// Create a registry with all built-in checks
    pub fn new() -> Self {
        Self {
            checks: vec![
                Box::new(RequiredCollectionsCheck),
                Box::new(ActivitiesCheck),
                Box::new(BackbonesCheck),
                Box::new(StoriesCheck),
                Box::new(DisplayOrderCheck),
                Box::new(StoryMappingCheck),
            ],
        }
    }

    /// Create an empty registry
    pub fn empty() -> Self {
        Self { checks: Vec::new() }
    }

    pub fn checks(&self) -> &[Box<dyn SchemaCheck>] {
        &self.checks
    }

    /// Append a custom check; it runs after the ones already registered
    pub fn add_check(&mut self, check: Box<dyn SchemaCheck>) {
        self.checks.push(check);
    }
}

impl Default for CheckRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CheckRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckRegistry")
            .field("checks", &format!("{} checks", self.checks.len()))
            .finish()
    }
}

/// Report a duplicate when `id` was already seen, otherwise remember where
pub(crate) fn track_duplicate<'a>(
    seen: &mut std::collections::HashMap<&'a str, String>,
    id: &'a str,
    path: &str,
    check: &str,
    what: &str,
) -> Option<Violation> {
    match seen.get(id) {
        Some(first) => Some(Violation::duplicate(check, path, what, id, first)),
        None => {
            seen.insert(id, path.to_string());
            None
        }
    }
}
