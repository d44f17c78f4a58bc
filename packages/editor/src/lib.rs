//! # Story Map Editor
//!
//! Edit staging for story maps.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ schema: text → Document (immutable base)    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditSession stages a Delta          │
//! │  - drafts, patches, deletions, moves        │
//! │  - preview = base + delta, renormalized     │
//! │  - commit = preview through a serializer    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ layout: preview → RenderGrid                │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Base is never mutated**: every preview starts from a fresh copy
//! 2. **`story_mapping` is authoritative**: sort keys are rewritten to mirror it
//! 3. **Single writer**: staged edits merge last-write-wins, no conflict checks
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storymap_editor::{DraftRequest, EditSession, MoveTarget, StoryPatch};
//! use storymap_schema::YamlCodec;
//!
//! let base = YamlCodec::decode(&source)?;
//! let mut session = EditSession::new().with_serializer(Box::new(YamlCodec));
//!
//! let draft = session.create_draft(&base.personas, DraftRequest::new("BB-002"));
//! session.stage_update(&draft.id, StoryPatch::new().text("I want to export"));
//! session.stage_move("ST-001", MoveTarget::to_backbone("BB-002").with_sequence(1));
//!
//! let preview = session.build_preview(&base);
//! let text = session.build_committed(&base)?;
//! ```

mod delta;
mod errors;
mod normalize;
mod preview;
mod session;

pub use delta::{AddedStory, Delta, MoveTarget, StoryPatch, LAST};
pub use errors::{EditorError, EditorResult};
pub use normalize::normalize_sort_keys;
pub use preview::{build_preview, renormalize_sequences, PENDING_SEQUENCE};
pub use session::{DraftDefaults, DraftRequest, EditSession};
