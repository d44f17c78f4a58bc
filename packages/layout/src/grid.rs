//! # Render Grid
//!
//! Output of composition: columns, the activity above each column, a
//! row-major story matrix and the rows where a new version band starts.
//! `None` cells are empty placeholders.

use serde::Serialize;
use storymap_schema::{Activity, Backbone, Story};

/// A story placed in a cell, with the persona it belongs to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedStory {
    pub story: Story,
    pub persona_key: String,
    pub persona_name: String,

    /// Version bucket the story was placed in
    pub version: String,
}

/// A version band: its label and the first row it occupies
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionBand {
    pub version: String,
    pub start_row: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RenderGrid {
    pub columns: Vec<Backbone>,
    pub activity_by_column: Vec<Option<Activity>>,
    pub rows: Vec<Vec<Option<PlacedStory>>>,

    /// Row indices that begin a new version band (never includes the first)
    pub slice_boundaries: Vec<usize>,

    pub bands: Vec<VersionBand>,
}

impl RenderGrid {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&PlacedStory> {
        self.rows.get(row)?.get(column)?.as_ref()
    }

    /// Every occupied cell as `(row, column, story)`, row-major
    pub fn placed(&self) -> impl Iterator<Item = (usize, usize, &PlacedStory)> {
        self.rows.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter_map(move |(column, cell)| cell.as_ref().map(|placed| (row, column, placed)))
        })
    }

    pub fn position_of(&self, story_id: &str) -> Option<(usize, usize)> {
        self.placed()
            .find(|(_, _, placed)| placed.story.id == story_id)
            .map(|(row, column, _)| (row, column))
    }

    /// Story ids of one row, `None` for empty cells
    pub fn row_ids(&self, row: usize) -> Vec<Option<&str>> {
        self.rows
            .get(row)
            .map(|cells| {
                cells
                    .iter()
                    .map(|cell| cell.as_ref().map(|p| p.story.id.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }
}
