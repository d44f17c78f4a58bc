use crate::checks::backbones::sequence_violation;
use crate::checks::SchemaCheck;
use crate::context::{int_field, non_empty_str, ValidationContext};
use crate::violation::{Violation, ViolationKind};
use serde_json::Value;

pub struct StoryMappingCheck;

const NAME: &str = "story-mapping";

impl SchemaCheck for StoryMappingCheck {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "story_mapping keys are known stories with a known backbone and positive sequence"
    }

    fn check(&self, ctx: &ValidationContext<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();

        let mapping = match ctx.story_map.get("story_mapping") {
            None | Some(Value::Null) => return violations,
            Some(Value::Object(mapping)) => mapping,
            Some(_) => {
                violations.push(Violation::new(
                    ViolationKind::MissingField,
                    NAME,
                    "story_mapping",
                    "story_mapping must be a mapping",
                ));
                return violations;
            }
        };

        for (story_id, placement) in mapping {
            let path = format!("story_mapping.{}", story_id);

            if !ctx.story_ids.contains(story_id.as_str()) {
                violations.push(Violation::unresolved(NAME, &path, "story id", story_id, "story"));
            }

            if !placement.is_object() {
                violations.push(Violation::new(
                    ViolationKind::MissingField,
                    NAME,
                    path,
                    "placement must be a mapping with backbone_id and sequence",
                ));
                continue;
            }

            match non_empty_str(placement, "backbone_id") {
                None => violations.push(Violation::missing_field(NAME, &path, "backbone_id")),
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

            violations.extend(sequence_violation(NAME, &path, int_field(placement, "sequence", 1)));
        }

        violations
    }
}
