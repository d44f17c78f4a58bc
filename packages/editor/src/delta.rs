//! # Staged Delta
//!
//! The pending edits of a session, kept apart from the base document.
//!
//! ## Merge semantics
//!
//! - Patches and moves for the same story merge field by field; the later
//!   value wins, fields left `None` keep what was staged before.
//! - No conflict detection: the session has a single writer.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use storymap_schema::{Extra, Story};

/// Sequence meaning "after everything else" until renormalized
pub const LAST: i64 = i64::MAX;

/// Partial update of a story's fields
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StoryPatch {
    #[serde(rename = "story", default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backbone_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceptance_criteria: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backbone_x_version_sort: Option<i64>,

    /// Fields outside the model, merged key by key
    #[serde(flatten)]
    pub extra: Extra,
}

impl StoryPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn acceptance_criteria(mut self, criteria: Vec<String>) -> Self {
        self.acceptance_criteria = Some(criteria);
        self
    }

    pub fn field(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Fold a later patch into this one
    pub fn merge(&mut self, later: StoryPatch) {
        merge_field(&mut self.text, later.text);
        merge_field(&mut self.backbone_id, later.backbone_id);
        merge_field(&mut self.version, later.version);
        merge_field(&mut self.priority, later.priority);
        merge_field(&mut self.acceptance_criteria, later.acceptance_criteria);
        merge_field(&mut self.status, later.status);
        merge_field(&mut self.backbone_x_version_sort, later.backbone_x_version_sort);
        self.extra.extend(later.extra);
    }

    /// Shallow-merge onto a story
    pub fn apply_to(&self, story: &mut Story) {
        if let Some(text) = &self.text {
            story.text = text.clone();
        }
        if let Some(backbone_id) = &self.backbone_id {
            story.backbone_id = backbone_id.clone();
        }
        if self.version.is_some() {
            story.version = self.version.clone();
        }
        if self.priority.is_some() {
            story.priority = self.priority;
        }
        if self.acceptance_criteria.is_some() {
            story.acceptance_criteria = self.acceptance_criteria.clone();
        }
        if self.status.is_some() {
            story.status = self.status.clone();
        }
        if self.backbone_x_version_sort.is_some() {
            story.backbone_x_version_sort = self.backbone_x_version_sort;
        }
        for (key, value) in &self.extra {
            story.extra.insert(key.clone(), value.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == StoryPatch::default()
    }
}

/// Position override: column, version band and rank
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MoveTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backbone_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<i64>,
}

impl MoveTarget {
    pub fn to_backbone(backbone_id: impl Into<String>) -> Self {
        Self {
            backbone_id: Some(backbone_id.into()),
            ..Default::default()
        }
    }

    pub fn to_version(version: impl Into<String>) -> Self {
        Self {
            version: Some(version.into()),
            ..Default::default()
        }
    }

    pub fn with_sequence(mut self, sequence: i64) -> Self {
        self.sequence = Some(sequence);
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn merge(&mut self, later: MoveTarget) {
        merge_field(&mut self.backbone_id, later.backbone_id);
        merge_field(&mut self.version, later.version);
        merge_field(&mut self.sequence, later.sequence);
    }
}

/// A draft waiting to be inserted into a persona's list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddedStory {
    pub story: Story,
    pub persona_key: String,
}

/// Everything staged in a session, keyed by story id in staging order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Delta {
    #[serde(default)]
    pub added: IndexMap<String, AddedStory>,

    #[serde(default)]
    pub updated: IndexMap<String, StoryPatch>,

    #[serde(default)]
    pub deleted: IndexSet<String>,

    #[serde(default)]
    pub moved: IndexMap<String, MoveTarget>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.updated.is_empty()
            && self.deleted.is_empty()
            && self.moved.is_empty()
    }

    /// Number of staged entries across all four collections
    pub fn len(&self) -> usize {
        self.added.len() + self.updated.len() + self.deleted.len() + self.moved.len()
    }

    pub fn clear(&mut self) {
        self.added.clear();
        self.updated.clear();
        self.deleted.clear();
        self.moved.clear();
    }
}

fn merge_field<T>(current: &mut Option<T>, later: Option<T>) {
    if later.is_some() {
        *current = later;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_patch_merge_is_last_write_wins_per_field() {
        let mut patch = StoryPatch::new().text("first").priority(2);
        patch.merge(StoryPatch::new().text("second").status("DONE"));

        assert_eq!(patch.text.as_deref(), Some("second"));
        assert_eq!(patch.priority, Some(2));
        assert_eq!(patch.status.as_deref(), Some("DONE"));
    }

    #[test]
    fn test_patch_apply_keeps_untouched_fields() {
        let mut story = Story::new("ST-1", "old", "BB-1").with_version("MVP");
        story.priority = Some(1);

        StoryPatch::new()
            .text("new")
            .field("estimate", json!(5))
            .apply_to(&mut story);

        assert_eq!(story.text, "new");
        assert_eq!(story.version.as_deref(), Some("MVP"));
        assert_eq!(story.priority, Some(1));
        assert_eq!(story.extra.get("estimate"), Some(&json!(5)));
    }

    #[test]
    fn test_move_merge() {
        let mut target = MoveTarget::to_backbone("BB-1").with_sequence(4);
        target.merge(MoveTarget::to_version("Release1"));
        target.merge(MoveTarget::default().with_sequence(1));

        assert_eq!(
            target,
            MoveTarget {
                backbone_id: Some("BB-1".into()),
                version: Some("Release1".into()),
                sequence: Some(1),
            }
        );
    }

    #[test]
    fn test_delta_serializes() {
        let mut delta = Delta::default();
        delta.deleted.insert("ST-9".into());
        delta.moved.insert("ST-1".into(), MoveTarget::to_backbone("BB-2").with_sequence(1));

        let json = serde_json::to_string(&delta).unwrap();
        let back: Delta = serde_json::from_str(&json).unwrap();

        assert_eq!(delta, back);
        assert_eq!(back.len(), 2);
    }
}
