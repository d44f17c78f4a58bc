use crate::checks::{track_duplicate, SchemaCheck};
use crate::context::{int_field, non_empty_str, IntField, ValidationContext};
use crate::violation::{Violation, ViolationKind};
use serde_json::Value;
use std::collections::HashMap;
use storymap_schema::StoryStatus;

/// Per-story checks across every persona and the cross-persona list.
/// Story ids are unique across the whole document, not per persona.
pub struct StoriesCheck;

const NAME: &str = "stories";

impl SchemaCheck for StoriesCheck {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Stories have id, text and a known backbone; optional fields are in range"
    }

    fn check(&self, ctx: &ValidationContext<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();
        let mut seen = HashMap::new();

        if let Some(personas) = ctx.personas() {
            for (key, persona) in personas {
                match persona.get("stories") {
                    None | Some(Value::Array(_)) => {}
                    Some(_) => violations.push(Violation::new(
                        ViolationKind::MissingField,
                        NAME,
                        format!("personas_stories.{}.stories", key),
                        "stories must be a list",
                    )),
                }
            }
        }

        for entry in ctx.stories() {
            let story = entry.value;
            let path = entry.path.as_str();

            match non_empty_str(story, "id") {
                Some(id) => violations.extend(track_duplicate(&mut seen, id, path, NAME, "story")),
                None => violations.push(Violation::missing_field(NAME, path, "id")),
            }

            if non_empty_str(story, "story").is_none() {
                violations.push(Violation::missing_field(NAME, path, "story"));
            }

            match non_empty_str(story, "backbone_id") {
                None => violations.push(Violation::missing_field(NAME, path, "backbone_id")),
                Some(backbone_id) if !ctx.backbone_ids.contains(backbone_id) => {
                    violations.push(Violation::unresolved(
                        NAME,
                        format!("{}.backbone_id", path),
                        "backbone_id",
                        backbone_id,
                        "backbones.id",
                    ));
                }
                Some(_) => {}
            }

            if let Some(status) = story.get("status").filter(|v| !v.is_null()) {
                let known = status
                    .as_str()
                    .map(|s| s.parse::<StoryStatus>().is_ok())
                    .unwrap_or(false);
                if !known {
                    let allowed: Vec<&str> = StoryStatus::ALL.iter().map(|s| s.as_str()).collect();
                    violations.push(Violation::new(
                        ViolationKind::EnumViolation,
                        NAME,
                        format!("{}.status", path),
                        format!("status {} is not one of {}", status, allowed.join(", ")),
                    ));
                }
            }

            match int_field(story, "priority", 1) {
                IntField::Absent => {}
                IntField::Valid(p) if p <= 5 => {}
                _ => violations.push(Violation::range(
                    NAME,
                    format!("{}.priority", path),
                    "priority must be an integer from 1 to 5",
                )),
            }

            match int_field(story, "backbone_x_version_sort", 1) {
                IntField::Absent | IntField::Valid(_) => {}
                _ => violations.push(Violation::range(
                    NAME,
                    format!("{}.backbone_x_version_sort", path),
                    "backbone_x_version_sort must be a positive integer",
                )),
            }

            let version = non_empty_str(story, "version");
            if let (Some(order), Some(version)) = (&ctx.version_order, version) {
                if !order.contains(&version) {
                    violations.push(Violation::new(
                        ViolationKind::UnresolvedReference,
                        NAME,
                        format!("{}.version", path),
                        format!(
                            "version \"{}\" is not listed in version_definitions.order",
                            version
                        ),
                    ));
                }
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(story_map: serde_json::Value) -> Vec<Violation> {
        let structure = json!({
            "activities": [{ "id": "ACT-1", "name": "A" }],
            "backbones": [{ "id": "BB-1", "name": "B", "sequence": 1, "activity_id": "ACT-1" }]
        });
        let ctx = ValidationContext::new(
            story_map.as_object().unwrap(),
            structure.as_object().unwrap(),
        );
        StoriesCheck.check(&ctx)
    }

    #[test]
    fn test_duplicate_ids_across_personas_and_cross_list() {
        let violations = run(json!({
            "personas_stories": {
                "P1": {
                    "name": "A",
                    "stories": [{ "id": "ST-1", "story": "x", "backbone_id": "BB-1" }]
                },
                "P2": {
                    "name": "B",
                    "stories": [{ "id": "ST-1", "story": "y", "backbone_id": "BB-1" }]
                }
            },
            "cross_persona_stories": [{ "id": "ST-1", "story": "z", "backbone_id": "BB-1" }]
        }));

        assert_eq!(violations.len(), 2);
        assert!(violations.iter().all(|v| v.kind == ViolationKind::DuplicateId));
        assert_eq!(violations[0].path, "personas_stories.P2.stories[0]");
        assert_eq!(violations[1].path, "cross_persona_stories[0]");
        assert!(violations[0].message.contains("personas_stories.P1.stories[0]"));
    }

    #[test]
    fn test_optional_field_ranges() {
        let violations = run(json!({
            "personas_stories": {
                "P1": { "name": "A", "stories": [{
                    "id": "ST-1", "story": "x", "backbone_id": "BB-1",
                    "status": "DOING", "priority": 6, "backbone_x_version_sort": 0
                }] }
            }
        }));

        let kinds: Vec<ViolationKind> = violations.iter().map(|v| v.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ViolationKind::EnumViolation,
                ViolationKind::RangeViolation,
                ViolationKind::RangeViolation
            ]
        );
    }

    #[test]
    fn test_version_membership_only_when_order_defined() {
        let story = json!({ "id": "ST-1", "story": "x", "backbone_id": "BB-1", "version": "Beta" });

        let without_order = run(json!({
            "personas_stories": { "P1": { "name": "A", "stories": [story.clone()] } }
        }));
        assert!(without_order.is_empty());

        let with_order = run(json!({
            "version_definitions": { "order": ["MVP"] },
            "personas_stories": { "P1": { "name": "A", "stories": [story] } }
        }));
        assert_eq!(with_order.len(), 1);
        assert_eq!(with_order[0].path, "personas_stories.P1.stories[0].version");
    }

    #[test]
    fn test_missing_required_fields() {
        let violations = run(json!({
            "personas_stories": { "P1": { "name": "A", "stories": [{ "backbone_id": "BB-404" }] } }
        }));

        assert_eq!(violations.len(), 3);
        assert_eq!(violations[0].message, "required key \"id\" is missing");
        assert_eq!(violations[1].message, "required key \"story\" is missing");
        assert_eq!(violations[2].kind, ViolationKind::UnresolvedReference);
    }
}
