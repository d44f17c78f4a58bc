//! # Grid Composer
//!
//! Places every story of a document into a collision-free grid.
//!
//! ## Placement rules
//!
//! 1. Columns follow `display_order.backbones` when present (unknown ids are
//!    skipped), otherwise backbones sorted by `sequence`.
//! 2. Stories are grouped into version buckets; buckets are laid out one
//!    after another so bands never interleave vertically.
//! 3. Inside a bucket, stories are sorted by column, then rank
//!    (`backbone_x_version_sort`, else `story_mapping.sequence`), then id.
//! 4. Each story takes the first free row of its column that is not above
//!    the bucket's start row.
//!
//! Stories whose backbone is not a column are left out. Composition never
//! fails; the validator is responsible for reporting bad references.

use crate::grid::{PlacedStory, RenderGrid, VersionBand};
use crate::version_order::{default_version_preference, order_versions};
use std::collections::HashMap;
use storymap_schema::{Backbone, Document, Story, StoryOwner, DEFAULT_VERSION};
use tracing::{debug, info, instrument, warn};

/// Options for grid composition
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeOptions {
    /// Bucket label for stories without a `version`
    pub default_version: String,

    /// Bucket order used when the document has no `version_definitions.order`
    pub version_preference: Vec<String>,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            default_version: DEFAULT_VERSION.to_string(),
            version_preference: default_version_preference(),
        }
    }
}

/// Composes documents into render grids
#[derive(Debug, Clone, Default)]
pub struct GridComposer {
    options: ComposeOptions,
}

/// A story that resolved to a column, waiting for a row
struct Candidate<'a> {
    story: &'a Story,
    owner: StoryOwner<'a>,
    column: usize,
    rank: i64,
    version: &'a str,
}

/// Compose with default options
pub fn compose(doc: &Document) -> RenderGrid {
    GridComposer::default().compose(doc)
}

/// Columns in display order
pub fn ordered_columns(doc: &Document) -> Vec<&Backbone> {
    match doc.display_order() {
        Some(order) => {
            let by_id: HashMap<&str, &Backbone> =
                doc.backbones().iter().map(|b| (b.id.as_str(), b)).collect();
            let mut columns: Vec<&Backbone> = Vec::with_capacity(order.len());

            for id in order {
                match by_id.get(id.as_str()) {
                    Some(backbone) if !columns.iter().any(|c| c.id == backbone.id) => {
                        columns.push(*backbone)
                    }
                    Some(_) => debug!(backbone_id = %id, "Skipping repeated display_order entry"),
                    None => warn!(backbone_id = %id, "display_order references unknown backbone"),
                }
            }
            columns
        }
        None => {
            let mut columns: Vec<&Backbone> = doc.backbones().iter().collect();
            columns.sort_by(|a, b| {
                let seq_a = a.sequence.unwrap_or(i64::MAX);
                let seq_b = b.sequence.unwrap_or(i64::MAX);
                seq_a.cmp(&seq_b).then_with(|| a.id.cmp(&b.id))
            });
            columns
        }
    }
}

impl GridComposer {
    pub fn new(options: ComposeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ComposeOptions {
        &self.options
    }

    /// Version bucket order for a document: its own order if it has one,
    /// otherwise the configured preference
    pub fn version_preference<'d>(&'d self, doc: &'d Document) -> &'d [String] {
        doc.version_order().unwrap_or(&self.options.version_preference)
    }

    #[instrument(
        skip(self, doc),
        fields(backbones = doc.backbones().len(), personas = doc.personas.len())
    )]
    pub fn compose(&self, doc: &Document) -> RenderGrid {
        info!("Starting grid composition");

        let columns = ordered_columns(doc);
        let column_index: HashMap<&str, usize> = columns
            .iter()
            .enumerate()
            .map(|(index, backbone)| (backbone.id.as_str(), index))
            .collect();

        let activity_by_column: Vec<_> = columns
            .iter()
            .map(|backbone| doc.activity(&backbone.activity_id).cloned())
            .collect();

        let mut candidates = Vec::new();
        let mut dropped = 0usize;
        for (owner, story) in doc.stories() {
            let Some(&column) = column_index.get(story.backbone_id.as_str()) else {
                debug!(
                    story_id = %story.id,
                    backbone_id = %story.backbone_id,
                    "Story has no column"
                );
                dropped += 1;
                continue;
            };
            candidates.push(Candidate {
                story,
                owner,
                column,
                rank: rank_of(doc, story),
                version: story.version_or(&self.options.default_version),
            });
        }
        if dropped > 0 {
            warn!(dropped, "Stories without a resolvable column were left out of the grid");
        }

        let versions = order_versions(
            candidates.iter().map(|c| c.version),
            self.version_preference(doc),
        );

        let mut grid = RenderGrid {
            columns: columns.into_iter().cloned().collect(),
            activity_by_column,
            ..Default::default()
        };
        let column_count = grid.columns.len();
        let mut column_occupied: Vec<i64> = vec![-1; column_count];

        for (bucket_index, version) in versions.iter().enumerate() {
            let tallest = column_occupied.iter().copied().max().unwrap_or(-1);
            let start_row = (tallest + 1).max(0) as usize;
            if bucket_index > 0 {
                grid.slice_boundaries.push(start_row);
            }
            grid.bands.push(VersionBand {
                version: version.clone(),
                start_row,
            });

            let mut bucket: Vec<&Candidate<'_>> =
                candidates.iter().filter(|c| c.version == version.as_str()).collect();
            bucket.sort_by(|a, b| {
                a.column
                    .cmp(&b.column)
                    .then(a.rank.cmp(&b.rank))
                    .then_with(|| a.story.id.cmp(&b.story.id))
            });
            debug!(version = %version, start_row, stories = bucket.len(), "Placing version bucket");

            for candidate in bucket {
                let target_row = ((column_occupied[candidate.column] + 1) as usize).max(start_row);
                while grid.rows.len() <= target_row {
                    grid.rows.push(vec![None; column_count]);
                }
                grid.rows[target_row][candidate.column] = Some(PlacedStory {
                    story: candidate.story.clone(),
                    persona_key: candidate.owner.key().to_string(),
                    persona_name: candidate.owner.name().to_string(),
                    version: version.clone(),
                });
                column_occupied[candidate.column] = target_row as i64;
            }
        }

        info!(
            columns = grid.column_count(),
            rows = grid.row_count(),
            bands = grid.bands.len(),
            "Grid composition complete"
        );
        grid
    }
}

/// Rank inside a column: the story's own sort key, then its mapping sequence
fn rank_of(doc: &Document, story: &Story) -> i64 {
    story
        .backbone_x_version_sort
        .or_else(|| doc.story_mapping.get(&story.id).and_then(|p| p.sequence))
        .unwrap_or(i64::MAX)
}
