//! Read-only view over the untyped document shared by every check.

use serde_json::{Map, Value};
use std::collections::HashSet;

/// The pieces of a document the checks look at, plus the id sets they
/// resolve references against.
#[derive(Debug)]
pub struct ValidationContext<'a> {
    /// Contents of `integrated_story_map`
    pub story_map: &'a Map<String, Value>,

    /// Contents of `story_map_structure`
    pub structure: &'a Map<String, Value>,

    pub activity_ids: HashSet<&'a str>,
    pub backbone_ids: HashSet<&'a str>,
    pub story_ids: HashSet<&'a str>,

    /// `version_definitions.order`, when the document defines one
    pub version_order: Option<Vec<&'a str>>,
}

/// A story located in the tree, with its path for reporting
#[derive(Debug, Clone)]
pub struct StoryEntry<'a> {
    pub path: String,
    pub value: &'a Value,
}

impl<'a> ValidationContext<'a> {
    pub fn new(story_map: &'a Map<String, Value>, structure: &'a Map<String, Value>) -> Self {
        let mut ctx = Self {
            story_map,
            structure,
            activity_ids: HashSet::new(),
            backbone_ids: HashSet::new(),
            story_ids: HashSet::new(),
            version_order: None,
        };

        ctx.activity_ids = ids_of(ctx.activities());
        ctx.backbone_ids = ids_of(ctx.backbones());
        ctx.story_ids = ctx
            .stories()
            .into_iter()
            .filter_map(|entry| non_empty_str(entry.value, "id"))
            .collect();
        ctx.version_order = story_map
            .get("version_definitions")
            .and_then(|v| v.get("order"))
            .and_then(Value::as_array)
            .map(|order| order.iter().filter_map(Value::as_str).collect());

        ctx
    }

    pub fn activities(&self) -> &'a [Value] {
        array_at(self.structure, "activities")
    }

    pub fn backbones(&self) -> &'a [Value] {
        array_at(self.structure, "backbones")
    }

    pub fn personas(&self) -> Option<&'a Map<String, Value>> {
        self.story_map.get("personas_stories").and_then(Value::as_object)
    }

    /// Every story in scan order: each persona's list, then the cross list
    pub fn stories(&self) -> Vec<StoryEntry<'a>> {
        let mut entries = Vec::new();

        if let Some(personas) = self.personas() {
            for (key, persona) in personas {
                let stories = persona.get("stories").and_then(Value::as_array);
                for (index, value) in stories.into_iter().flatten().enumerate() {
                    entries.push(StoryEntry {
                        path: format!("personas_stories.{}.stories[{}]", key, index),
                        value,
                    });
                }
            }
        }

        for (index, value) in array_at(self.story_map, "cross_persona_stories")
            .iter()
            .enumerate()
        {
            entries.push(StoryEntry {
                path: format!("cross_persona_stories[{}]", index),
                value,
            });
        }

        entries
    }
}

/// A non-empty string field of an object
pub fn non_empty_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Outcome of reading an integer field that must be `>= min`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntField {
    Absent,
    NotInteger,
    BelowMinimum(i64),
    Valid(i64),
}

pub fn int_field(value: &Value, key: &str, min: i64) -> IntField {
    match value.get(key) {
        None | Some(Value::Null) => IntField::Absent,
        Some(v) => match v.as_i64() {
            Some(n) if n >= min => IntField::Valid(n),
            Some(n) => IntField::BelowMinimum(n),
            None => IntField::NotInteger,
        },
    }
}

fn array_at<'a>(map: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    map.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn ids_of(values: &[Value]) -> HashSet<&str> {
    values.iter().filter_map(|v| non_empty_str(v, "id")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_int_field_classification() {
        let value = json!({ "a": 3, "b": 0, "c": 1.5, "d": "2" });

        assert_eq!(int_field(&value, "a", 1), IntField::Valid(3));
        assert_eq!(int_field(&value, "b", 1), IntField::BelowMinimum(0));
        assert_eq!(int_field(&value, "c", 1), IntField::NotInteger);
        assert_eq!(int_field(&value, "d", 1), IntField::NotInteger);
        assert_eq!(int_field(&value, "e", 1), IntField::Absent);
    }
}
