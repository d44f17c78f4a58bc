//! Persisted shapes of the model types with loosely typed hint fields.
//!
//! Numeric hints and labels are read as raw values. A value of the wrong
//! type decodes as `None` on the typed field and is parked in `extra` under
//! its own key, so it is written back unchanged and the validator still sees
//! it. When the typed field is set again, the parked value is dropped.

use crate::model::{Backbone, Extra, Story, StoryPlacement};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Read an integer hint, parking anything else in `extra`
fn take_int(raw: Option<Value>, key: &str, extra: &mut Extra) -> Option<i64> {
    match raw {
        None | Some(Value::Null) => None,
        Some(value) => match value.as_i64() {
            Some(n) => Some(n),
            None => {
                extra.insert(key.to_string(), value);
                None
            }
        },
    }
}

/// Read a string label, parking anything else in `extra`
fn take_str(raw: Option<Value>, key: &str, extra: &mut Extra) -> Option<String> {
    match raw {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(value) => {
            extra.insert(key.to_string(), value);
            None
        }
    }
}

/// Typed value if set, otherwise whatever was parked under `key`
fn put<T: Into<Value>>(typed: Option<T>, key: &str, extra: &mut Extra) -> Option<Value> {
    let parked = extra.remove(key);
    typed.map(Into::into).or(parked)
}

#[derive(Serialize, Deserialize)]
pub(crate) struct BackboneRepr {
    #[serde(default)]
    id: String,

    #[serde(default)]
    activity_id: String,

    #[serde(default)]
    name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    sequence: Option<Value>,

    #[serde(flatten)]
    extra: Extra,
}

impl From<BackboneRepr> for Backbone {
    fn from(repr: BackboneRepr) -> Self {
        let mut extra = repr.extra;
        Backbone {
            id: repr.id,
            activity_id: repr.activity_id,
            name: repr.name,
            description: repr.description,
            sequence: take_int(repr.sequence, "sequence", &mut extra),
            extra,
        }
    }
}

impl From<Backbone> for BackboneRepr {
    fn from(backbone: Backbone) -> Self {
        let mut extra = backbone.extra;
        BackboneRepr {
            id: backbone.id,
            activity_id: backbone.activity_id,
            name: backbone.name,
            description: backbone.description,
            sequence: put(backbone.sequence, "sequence", &mut extra),
            extra,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub(crate) struct StoryPlacementRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    backbone_id: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    sequence: Option<Value>,

    #[serde(flatten)]
    extra: Extra,
}

impl From<StoryPlacementRepr> for StoryPlacement {
    fn from(repr: StoryPlacementRepr) -> Self {
        let mut extra = repr.extra;
        StoryPlacement {
            backbone_id: take_str(repr.backbone_id, "backbone_id", &mut extra),
            sequence: take_int(repr.sequence, "sequence", &mut extra),
            extra,
        }
    }
}

impl From<StoryPlacement> for StoryPlacementRepr {
    fn from(placement: StoryPlacement) -> Self {
        let mut extra = placement.extra;
        StoryPlacementRepr {
            backbone_id: put(placement.backbone_id, "backbone_id", &mut extra),
            sequence: put(placement.sequence, "sequence", &mut extra),
            extra,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub(crate) struct StoryRepr {
    #[serde(default)]
    id: String,

    #[serde(rename = "story", default)]
    text: String,

    #[serde(default)]
    backbone_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    priority: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    acceptance_criteria: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    backbone_x_version_sort: Option<Value>,

    #[serde(flatten)]
    extra: Extra,
}

impl From<StoryRepr> for Story {
    fn from(repr: StoryRepr) -> Self {
        let mut extra = repr.extra;
        Story {
            id: repr.id,
            text: repr.text,
            backbone_id: repr.backbone_id,
            version: take_str(repr.version, "version", &mut extra),
            priority: take_int(repr.priority, "priority", &mut extra),
            acceptance_criteria: repr.acceptance_criteria,
            status: take_str(repr.status, "status", &mut extra),
            backbone_x_version_sort: take_int(
                repr.backbone_x_version_sort,
                "backbone_x_version_sort",
                &mut extra,
            ),
            extra,
        }
    }
}

impl From<Story> for StoryRepr {
    fn from(story: Story) -> Self {
        let mut extra = story.extra;
        StoryRepr {
            id: story.id,
            text: story.text,
            backbone_id: story.backbone_id,
            version: put(story.version, "version", &mut extra),
            priority: put(story.priority, "priority", &mut extra),
            acceptance_criteria: story.acceptance_criteria,
            status: put(story.status, "status", &mut extra),
            backbone_x_version_sort: put(
                story.backbone_x_version_sort,
                "backbone_x_version_sort",
                &mut extra,
            ),
            extra,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_malformed_hints_decode_as_none() {
        let story: Story = serde_json::from_value(json!({
            "id": "ST-1",
            "story": "text",
            "backbone_id": "BB-1",
            "priority": "high",
            "status": 3,
            "backbone_x_version_sort": 1.5,
            "version": "MVP"
        }))
        .unwrap();

        assert_eq!(story.priority, None);
        assert_eq!(story.status, None);
        assert_eq!(story.backbone_x_version_sort, None);
        assert_eq!(story.version.as_deref(), Some("MVP"));
        assert_eq!(story.extra.get("priority"), Some(&json!("high")));
    }

    #[test]
    fn test_malformed_hints_round_trip() {
        let raw = json!({ "backbone_id": "BB-1", "sequence": "n/a", "note": 1 });
        let placement: StoryPlacement = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(placement.sequence, None);
        assert_eq!(serde_json::to_value(&placement).unwrap(), raw);
    }

    #[test]
    fn test_typed_value_replaces_parked_one() {
        let mut backbone: Backbone =
            serde_json::from_value(json!({ "id": "BB-1", "sequence": "first" })).unwrap();
        backbone.sequence = Some(2);

        let written = serde_json::to_value(&backbone).unwrap();
        assert_eq!(written["sequence"], json!(2));
        assert_eq!(written.as_object().unwrap().len(), 4);
    }
}
