use crate::checks::SchemaCheck;
use crate::context::{non_empty_str, ValidationContext};
use crate::violation::{Violation, ViolationKind};
use std::collections::HashSet;

/// `display_order.backbones` must be a permutation of the known backbones.
/// Backbones left out of the list are not rendered, so omissions are errors.
pub struct DisplayOrderCheck;

const NAME: &str = "display-order";

impl SchemaCheck for DisplayOrderCheck {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "display_order.backbones lists every known backbone exactly once"
    }

    fn check(&self, ctx: &ValidationContext<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();

        let Some(list) = ctx.story_map.get("display_order").and_then(|d| d.get("backbones")) else {
            return violations;
        };
        let Some(items) = list.as_array() else {
            violations.push(Violation::new(
                ViolationKind::MissingField,
                NAME,
                "display_order.backbones",
                "display_order.backbones must be a list",
            ));
            return violations;
        };

        let mut listed = HashSet::new();
        for (index, item) in items.iter().enumerate() {
            let path = format!("display_order.backbones[{}]", index);
            let Some(id) = item.as_str() else {
                violations.push(Violation::new(
                    ViolationKind::UnresolvedReference,
                    NAME,
                    path,
                    format!("entry {} is not a backbone id", item),
                ));
                continue;
            };

            if !ctx.backbone_ids.contains(id) {
                violations.push(Violation::unresolved(
                    NAME,
                    &path,
                    "backbone_id",
                    id,
                    "backbones.id",
                ));
            }
            if !listed.insert(id) {
                violations.push(Violation::new(
                    ViolationKind::DuplicateId,
                    NAME,
                    path,
                    format!("backbone \"{}\" is listed more than once", id),
                ));
            }
        }

        for backbone in ctx.backbones() {
            if let Some(id) = non_empty_str(backbone, "id") {
                if !listed.contains(id) {
                    let message = format!(
                        "backbone \"{}\" is missing from display_order and will not be rendered",
                        id
                    );
                    violations.push(Violation::new(
                        ViolationKind::IncompleteOrdering,
                        NAME,
                        "display_order.backbones",
                        message,
                    ));
                }
            }
        }

        violations
    }
}

