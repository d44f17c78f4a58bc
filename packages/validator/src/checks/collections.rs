use crate::checks::SchemaCheck;
use crate::context::ValidationContext;
use crate::violation::{Violation, ViolationKind};
use serde_json::Value;

/// Top-level collections must be present and have the right shape
pub struct RequiredCollectionsCheck;

const NAME: &str = "required-collections";

impl SchemaCheck for RequiredCollectionsCheck {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "activities, backbones and personas_stories must exist"
    }

    fn check(&self, ctx: &ValidationContext<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();

        for key in ["activities", "backbones"] {
            let path = format!("story_map_structure.{}", key);
            match ctx.structure.get(key) {
                Some(Value::Array(items)) if !items.is_empty() => {}
                Some(Value::Array(_)) => violations.push(Violation::new(
                    ViolationKind::MissingField,
                    NAME,
                    path,
                    format!("{} must be a non-empty list", key),
                )),
                _ => violations.push(Violation::new(
                    ViolationKind::MissingField,
                    NAME,
                    path,
                    format!("{} is missing or not a list", key),
                )),
            }
        }

        if ctx.personas().is_none() {
            violations.push(Violation::new(
                ViolationKind::MissingField,
                NAME,
                "integrated_story_map.personas_stories",
                "personas_stories is missing or not a mapping",
            ));
        }

        if let Some(cross) = ctx.story_map.get("cross_persona_stories") {
            if !cross.is_array() && !cross.is_null() {
                violations.push(Violation::new(
                    ViolationKind::MissingField,
                    NAME,
                    "integrated_story_map.cross_persona_stories",
                    "cross_persona_stories must be a list",
                ));
            }
        }

        violations
    }
}
