use crate::checks::{track_duplicate, SchemaCheck};
use crate::context::{non_empty_str, ValidationContext};
use crate::violation::Violation;
use std::collections::HashMap;

pub struct ActivitiesCheck;

const NAME: &str = "activities";

impl SchemaCheck for ActivitiesCheck {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Every activity has an id and a name; ids are unique"
    }

    fn check(&self, ctx: &ValidationContext<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();
        let mut seen = HashMap::new();

        for (index, activity) in ctx.activities().iter().enumerate() {
            let path = format!("activities[{}]", index);

            match non_empty_str(activity, "id") {
                Some(id) => {
                    violations.extend(track_duplicate(&mut seen, id, &path, NAME, "activity"))
                }
                None => violations.push(Violation::missing_field(NAME, &path, "id")),
            }
            if non_empty_str(activity, "name").is_none() {
                violations.push(Violation::missing_field(NAME, &path, "name"));
            }
        }

        violations
    }
}
