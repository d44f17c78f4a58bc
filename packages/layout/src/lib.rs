//! # Story Map Layout
//!
//! Deterministic placement of backlog items into a two-dimensional grid
//! partitioned into version bands.
//!
//! ```text
//! Document ──compose──▶ RenderGrid { columns, activity_by_column, rows, slice_boundaries }
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storymap_layout::{compose, GridComposer, ComposeOptions};
//!
//! let grid = compose(&document);
//! for (row, column, placed) in grid.placed() {
//!     println!("{row},{column}: {}", placed.story.id);
//! }
//! ```

mod composer;
mod grid;
mod projection;
mod version_order;

pub use composer::{compose, ordered_columns, ComposeOptions, GridComposer};
pub use grid::{PlacedStory, RenderGrid, VersionBand};
pub use projection::{edit_options, BackboneOption, EditOptions, PersonaOption};
pub use version_order::{default_version_preference, order_versions, DEFAULT_VERSION_PREFERENCE};
