//! # Preview Pipeline
//!
//! Applies a [`Delta`] to a copy of the base document:
//! Delete → Add → Update → Move → Renormalize
//!
//! The base document is never touched. Each stage works on the copy left
//! by the previous one, so a story added and then moved in the same delta
//! ends up where the move put it.

use crate::delta::{Delta, MoveTarget};
use indexmap::IndexMap;
use std::collections::HashMap;
use storymap_schema::{Document, Persona, StoryPlacement};
use tracing::{debug, instrument, warn};

/// Sequence given to stories that have not been ranked yet
pub const PENDING_SEQUENCE: i64 = 9999;

/// Build the document that would result from applying `delta` to `base`
#[instrument(skip_all, fields(
    added = delta.added.len(),
    updated = delta.updated.len(),
    deleted = delta.deleted.len(),
    moved = delta.moved.len()
))]
pub fn build_preview(base: &Document, delta: &Delta) -> Document {
    let mut doc = base.clone();

    apply_deletions(&mut doc, delta);
    apply_additions(&mut doc, delta);
    apply_updates(&mut doc, delta);
    apply_moves(&mut doc, delta);
    renormalize_sequences(&mut doc);

    doc
}

fn apply_deletions(doc: &mut Document, delta: &Delta) {
    if delta.deleted.is_empty() {
        return;
    }
    doc.retain_stories(|story| !delta.deleted.contains(&story.id));
    doc.story_mapping.retain(|id, _| !delta.deleted.contains(id));
    debug!(count = delta.deleted.len(), "Applied deletions");
}

fn apply_additions(doc: &mut Document, delta: &Delta) {
    for (id, added) in &delta.added {
        let persona = doc
            .personas
            .entry(added.persona_key.clone())
            .or_insert_with(|| {
                debug!(persona_key = %added.persona_key, "Creating persona for draft");
                Persona {
                    role: Some(String::new()),
                    ..Persona::new(added.persona_key.clone())
                }
            });

        if !persona.stories.iter().any(|s| s.id == *id) {
            persona.stories.push(added.story.clone());
        }

        let placement = doc.story_mapping.entry(id.clone()).or_default();
        placement.backbone_id = Some(added.story.backbone_id.clone());
        placement.sequence = Some(PENDING_SEQUENCE);
    }
}

fn apply_updates(doc: &mut Document, delta: &Delta) {
    for (id, patch) in &delta.updated {
        let mut touched = 0usize;
        for story in doc.stories_mut().filter(|s| s.id == *id) {
            patch.apply_to(story);
            touched += 1;
        }
        if touched == 0 {
            debug!(story_id = %id, "Update targets no story");
        }
    }
}

fn apply_moves(doc: &mut Document, delta: &Delta) {
    for (id, target) in &delta.moved {
        if delta.deleted.contains(id) {
            continue;
        }
        let own_backbone = doc
            .find_story(id)
            .map(|s| s.backbone_id.clone())
            .filter(|b| !b.is_empty());
        if own_backbone.is_none() && !doc.story_mapping.contains_key(id) {
            warn!(story_id = %id, "Move targets unknown story");
            continue;
        }

        apply_move(doc, id, target, own_backbone);
    }
}

fn apply_move(doc: &mut Document, id: &str, target: &MoveTarget, own_backbone: Option<String>) {
    let placement = doc
        .story_mapping
        .entry(id.to_string())
        .or_insert_with(StoryPlacement::default);

    if let Some(backbone_id) = &target.backbone_id {
        placement.backbone_id = Some(backbone_id.clone());
    } else if placement.backbone_id.is_none() {
        placement.backbone_id = own_backbone;
    }
    if let Some(sequence) = target.sequence {
        placement.sequence = Some(sequence);
    }

    for story in doc.stories_mut().filter(|s| s.id == id) {
        if let Some(backbone_id) = &target.backbone_id {
            story.backbone_id = backbone_id.clone();
        }
        if let Some(version) = &target.version {
            story.version = Some(version.clone());
        }
    }
}

/// Rewrite every backbone's mapping sequences to `1..=n` and mirror them
/// into `backbone_x_version_sort`
///
/// Within a backbone, entries keep their relative order (missing sequence
/// ranks as [`PENDING_SEQUENCE`], ties go by id).
pub fn renormalize_sequences(doc: &mut Document) {
    let mut groups: IndexMap<String, Vec<(i64, String)>> = IndexMap::new();
    for (id, placement) in &doc.story_mapping {
        let Some(backbone_id) = placement.backbone_id.as_ref().filter(|b| !b.is_empty()) else {
            continue;
        };
        groups
            .entry(backbone_id.clone())
            .or_default()
            .push((placement.sequence.unwrap_or(PENDING_SEQUENCE), id.clone()));
    }

    let mut ranks: HashMap<String, i64> = HashMap::new();
    for entries in groups.values_mut() {
        entries.sort();
        for (index, (_, id)) in entries.iter().enumerate() {
            ranks.insert(id.clone(), index as i64 + 1);
        }
    }

    for (id, placement) in doc.story_mapping.iter_mut() {
        if let Some(&rank) = ranks.get(id) {
            placement.sequence = Some(rank);
        }
    }
    for story in doc.stories_mut() {
        if let Some(&rank) = ranks.get(&story.id) {
            story.backbone_x_version_sort = Some(rank);
        }
    }

    debug!(backbones = groups.len(), ranked = ranks.len(), "Renormalized sequences");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delta::{AddedStory, StoryPatch};
    use storymap_schema::Story;

    fn doc() -> Document {
        let mut doc = Document::default();
        doc.personas.insert(
            "P001".into(),
            Persona::new("Member").with_stories(vec![
                Story::new("ST-1", "one", "BB-1").with_version("MVP"),
                Story::new("ST-2", "two", "BB-1").with_version("MVP"),
            ]),
        );
        doc.cross_persona_stories.push(Story::new("ST-3", "three", "BB-2"));
        doc.story_mapping.insert("ST-1".into(), StoryPlacement::new("BB-1", 10));
        doc.story_mapping.insert("ST-2".into(), StoryPlacement::new("BB-1", 20));
        doc.story_mapping.insert("ST-3".into(), StoryPlacement::new("BB-2", 5));
        doc
    }

    #[test]
    fn test_empty_delta_only_renormalizes() {
        let preview = build_preview(&doc(), &Delta::default());

        assert_eq!(preview.story_mapping["ST-1"].sequence, Some(1));
        assert_eq!(preview.story_mapping["ST-2"].sequence, Some(2));
        assert_eq!(preview.story_mapping["ST-3"].sequence, Some(1));
        assert_eq!(preview.cross_persona_stories[0].backbone_x_version_sort, Some(1));
    }

    #[test]
    fn test_deletion_reaches_cross_list_and_mapping() {
        let mut delta = Delta::default();
        delta.deleted.insert("ST-3".into());

        let preview = build_preview(&doc(), &delta);

        assert!(preview.cross_persona_stories.is_empty());
        assert!(!preview.story_mapping.contains_key("ST-3"));
    }

    #[test]
    fn test_addition_creates_missing_persona() {
        let mut delta = Delta::default();
        delta.added.insert(
            "DRAFT-1".into(),
            AddedStory {
                story: Story::new("DRAFT-1", "draft", "BB-2"),
                persona_key: "P777".into(),
            },
        );

        let preview = build_preview(&doc(), &delta);

        let persona = &preview.personas["P777"];
        assert_eq!(persona.name, "P777");
        assert_eq!(persona.role.as_deref(), Some(""));
        assert_eq!(persona.stories[0].id, "DRAFT-1");
        // pending sequence sorts after ST-3
        assert_eq!(preview.story_mapping["DRAFT-1"].sequence, Some(2));
    }

    #[test]
    fn test_update_applies_to_cross_story() {
        let mut delta = Delta::default();
        delta.updated.insert("ST-3".into(), StoryPatch::new().status("DONE"));

        let preview = build_preview(&doc(), &delta);
        assert_eq!(preview.cross_persona_stories[0].status.as_deref(), Some("DONE"));
    }

    #[test]
    fn test_move_without_backbone_keeps_column() {
        let mut base = doc();
        base.story_mapping.shift_remove("ST-2");
        let mut delta = Delta::default();
        delta.moved.insert("ST-2".into(), MoveTarget::to_version("Release1").with_sequence(0));

        let preview = build_preview(&base, &delta);

        assert_eq!(preview.story_mapping["ST-2"].backbone_id.as_deref(), Some("BB-1"));
        assert_eq!(preview.story_mapping["ST-2"].sequence, Some(1));
        assert_eq!(preview.story_mapping["ST-1"].sequence, Some(2));
        assert_eq!(preview.find_story("ST-2").unwrap().version.as_deref(), Some("Release1"));
    }

    #[test]
    fn test_move_of_deleted_story_is_ignored() {
        let mut delta = Delta::default();
        delta.deleted.insert("ST-1".into());
        delta.moved.insert("ST-1".into(), MoveTarget::to_backbone("BB-2"));

        let preview = build_preview(&doc(), &delta);
        assert!(!preview.story_mapping.contains_key("ST-1"));
    }
}
