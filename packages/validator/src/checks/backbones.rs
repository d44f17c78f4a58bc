use crate::checks::{track_duplicate, SchemaCheck};
use crate::context::{int_field, non_empty_str, IntField, ValidationContext};
use crate::violation::Violation;
use std::collections::HashMap;

pub struct BackbonesCheck;

const NAME: &str = "backbones";

impl SchemaCheck for BackbonesCheck {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Every backbone has an id, name, positive sequence and a known activity"
    }

    fn check(&self, ctx: &ValidationContext<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();
        let mut seen = HashMap::new();

        for (index, backbone) in ctx.backbones().iter().enumerate() {
            let path = format!("backbones[{}]", index);

            match non_empty_str(backbone, "id") {
                Some(id) => {
                    violations.extend(track_duplicate(&mut seen, id, &path, NAME, "backbone"))
                }
                None => violations.push(Violation::missing_field(NAME, &path, "id")),
            }

            if non_empty_str(backbone, "name").is_none() {
                violations.push(Violation::missing_field(NAME, &path, "name"));
            }

            violations.extend(sequence_violation(NAME, &path, int_field(backbone, "sequence", 1)));

            match non_empty_str(backbone, "activity_id") {
                None => violations.push(Violation::missing_field(NAME, &path, "activity_id")),
                Some(activity_id) if !ctx.activity_ids.contains(activity_id) => {
                    violations.push(Violation::unresolved(
                        NAME,
                        format!("{}.activity_id", path),
                        "activity_id",
                        activity_id,
                        "activities.id",
                    ));
                }
                Some(_) => {}
            }
        }

        violations
    }
}

/// Shared by every field that must be a present, positive integer `sequence`
pub(crate) fn sequence_violation(check: &str, path: &str, field: IntField) -> Option<Violation> {
    match field {
        IntField::Valid(_) => None,
        IntField::Absent => Some(Violation::missing_field(check, path, "sequence")),
        IntField::NotInteger => Some(Violation::range(
            check,
            format!("{}.sequence", path),
            "sequence must be an integer",
        )),
        IntField::BelowMinimum(n) => Some(Violation::range(
            check,
            format!("{}.sequence", path),
            format!("sequence must be >= 1 (got {})", n),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::violation::ViolationKind;
    use serde_json::json;

    fn run(structure: serde_json::Value) -> Vec<Violation> {
        let story_map = json!({ "personas_stories": {} });
        let ctx = ValidationContext::new(
            story_map.as_object().unwrap(),
            structure.as_object().unwrap(),
        );
        BackbonesCheck.check(&ctx)
    }

    #[test]
    fn test_valid_backbone_passes() {
        let violations = run(json!({
            "activities": [{ "id": "ACT-1", "name": "A" }],
            "backbones": [{ "id": "BB-1", "name": "B", "sequence": 1, "activity_id": "ACT-1" }]
        }));
        assert!(violations.is_empty(), "{:?}", violations);
    }

    #[test]
    fn test_sequence_rules() {
        let violations = run(json!({
            "activities": [{ "id": "ACT-1", "name": "A" }],
            "backbones": [
                { "id": "BB-1", "name": "B", "activity_id": "ACT-1" },
                { "id": "BB-2", "name": "B", "sequence": 0, "activity_id": "ACT-1" },
                { "id": "BB-3", "name": "B", "sequence": 2.5, "activity_id": "ACT-1" }
            ]
        }));

        assert_eq!(violations.len(), 3);
        assert_eq!(violations[0].kind, ViolationKind::MissingField);
        assert_eq!(violations[1].kind, ViolationKind::RangeViolation);
        assert_eq!(violations[1].path, "backbones[1].sequence");
        assert_eq!(violations[2].kind, ViolationKind::RangeViolation);
    }

    #[test]
    fn test_unknown_activity_and_duplicate_id() {
        let violations = run(json!({
            "activities": [{ "id": "ACT-1", "name": "A" }],
            "backbones": [
                { "id": "BB-1", "name": "B", "sequence": 1, "activity_id": "ACT-9" },
                { "id": "BB-1", "name": "C", "sequence": 2, "activity_id": "ACT-1" }
            ]
        }));

        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].kind, ViolationKind::UnresolvedReference);
        assert_eq!(violations[0].path, "backbones[0].activity_id");
        assert_eq!(violations[1].kind, ViolationKind::DuplicateId);
        assert_eq!(violations[1].path, "backbones[1]");
    }
}
