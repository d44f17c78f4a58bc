//! Sort-key normalization for persisted maps.
//!
//! Older maps carry `story_mapping` sequences but no
//! `backbone_x_version_sort`, or sort keys that drifted after hand edits.
//! This rewrites the keys so each `(backbone_id, version)` cell of the
//! grid is ranked `1..n`.

use std::collections::HashMap;
use storymap_schema::Document;
use tracing::{debug, info, instrument};

/// Copy of `doc` with `backbone_x_version_sort` rewritten per
/// `(backbone_id, version)` group
///
/// Stories are ordered by `story_mapping[id].sequence` (missing goes last),
/// then by id. Stories without a version are grouped under
/// `default_version`. Stories without a backbone are left alone. Every
/// story gets its own rank, even when an id appears twice.
#[instrument(skip(doc), fields(stories = doc.stories().count()))]
pub fn normalize_sort_keys(doc: &Document, default_version: &str) -> Document {
    // entries carry the story's position in enumeration order
    let mut groups: HashMap<(&str, &str), Vec<(i64, &str, usize)>> = HashMap::new();
    let mut skipped = 0usize;
    for (position, (_, story)) in doc.stories().enumerate() {
        if story.backbone_id.is_empty() {
            skipped += 1;
            continue;
        }
        let sequence = doc
            .story_mapping
            .get(&story.id)
            .and_then(|p| p.sequence)
            .unwrap_or(i64::MAX);
        groups
            .entry((story.backbone_id.as_str(), story.version_or(default_version)))
            .or_default()
            .push((sequence, story.id.as_str(), position));
    }

    let mut ranks: HashMap<usize, i64> = HashMap::new();
    for ((backbone_id, version), mut entries) in groups {
        entries.sort();
        debug!(backbone_id, version, stories = entries.len(), "Ranking group");
        for (index, (_, _, position)) in entries.into_iter().enumerate() {
            ranks.insert(position, index as i64 + 1);
        }
    }

    let mut normalized = doc.clone();
    let mut changed = 0usize;
    for (position, story) in normalized.stories_mut().enumerate() {
        if let Some(&rank) = ranks.get(&position) {
            if story.backbone_x_version_sort != Some(rank) {
                story.backbone_x_version_sort = Some(rank);
                changed += 1;
            }
        }
    }

    info!(changed, skipped, "Sort keys normalized");
    normalized
}
