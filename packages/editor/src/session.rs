//! # Edit Session
//!
//! Stages edits against a story map without touching it.
//!
//! An EditSession holds the pending [`Delta`] for one editing context.
//! Nothing is applied until [`EditSession::build_preview`] derives a fresh
//! document from a base, so discarding the session (or calling
//! [`EditSession::reset`]) discards every staged change.

use crate::delta::{AddedStory, Delta, MoveTarget, StoryPatch, LAST};
use crate::errors::{EditorError, EditorResult};
use crate::preview;
use indexmap::IndexMap;
use std::fmt;
use storymap_schema::{Document, DocumentSerializer, Persona, Story, StoryStatus, DEFAULT_VERSION};
use tracing::{debug, info, instrument};

/// Placeholder values for new drafts
#[derive(Debug, Clone, PartialEq)]
pub struct DraftDefaults {
    pub text: String,
    pub version: String,
    pub priority: i64,

    /// Persona a draft lands in when the document has none
    pub persona_key: String,
}

impl Default for DraftDefaults {
    fn default() -> Self {
        Self {
            text: "I want , So that ".to_string(),
            version: DEFAULT_VERSION.to_string(),
            priority: 3,
            persona_key: "P001".to_string(),
        }
    }
}

/// Where a new draft should go
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftRequest {
    pub backbone_id: String,
    pub version: Option<String>,
    pub persona_key: Option<String>,
}

impl DraftRequest {
    pub fn new(backbone_id: impl Into<String>) -> Self {
        Self {
            backbone_id: backbone_id.into(),
            ..Default::default()
        }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn persona(mut self, persona_key: impl Into<String>) -> Self {
        self.persona_key = Some(persona_key.into());
        self
    }
}

/// Pending edits for one editing context
#[derive(Default)]
pub struct EditSession {
    delta: Delta,

    /// Never rewinds, so draft ids stay unique across resets
    draft_counter: u64,

    defaults: DraftDefaults,

    serializer: Option<Box<dyn DocumentSerializer>>,
}

impl fmt::Debug for EditSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditSession")
            .field("delta", &self.delta)
            .field("draft_counter", &self.draft_counter)
            .field("defaults", &self.defaults)
            .field("serializer", &self.serializer.as_ref().map(|s| s.format()))
            .finish()
    }
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(mut self, defaults: DraftDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_serializer(mut self, serializer: Box<dyn DocumentSerializer>) -> Self {
        self.serializer = Some(serializer);
        self
    }

    pub fn set_serializer(&mut self, serializer: Option<Box<dyn DocumentSerializer>>) {
        self.serializer = serializer;
    }

    pub fn defaults(&self) -> &DraftDefaults {
        &self.defaults
    }

    /// Stage a new placeholder story and return it
    ///
    /// The draft is queued for insertion into the requested persona (or the
    /// first persona of `personas`) and placed last in its column until the
    /// next renormalization.
    pub fn create_draft(
        &mut self,
        personas: &IndexMap<String, Persona>,
        request: DraftRequest,
    ) -> Story {
        let id = self.next_draft_id(personas);
        let version = request.version.unwrap_or_else(|| self.defaults.version.clone());
        let persona_key = request
            .persona_key
            .or_else(|| personas.keys().next().cloned())
            .unwrap_or_else(|| self.defaults.persona_key.clone());

        let story = Story {
            id: id.clone(),
            text: self.defaults.text.clone(),
            backbone_id: request.backbone_id.clone(),
            version: Some(version.clone()),
            priority: Some(self.defaults.priority),
            acceptance_criteria: Some(Vec::new()),
            status: Some(StoryStatus::Todo.to_string()),
            backbone_x_version_sort: Some(0),
            ..Default::default()
        };

        debug!(
            story_id = %id,
            persona_key = %persona_key,
            backbone_id = %request.backbone_id,
            "Staged draft"
        );
        self.delta.added.insert(
            id.clone(),
            AddedStory {
                story: story.clone(),
                persona_key,
            },
        );
        self.delta.moved.insert(
            id,
            MoveTarget {
                backbone_id: Some(request.backbone_id),
                version: Some(version),
                sequence: Some(LAST),
            },
        );

        story
    }

    /// Queue a field patch, merging with any earlier patch for `id`
    pub fn stage_update(&mut self, id: &str, patch: StoryPatch) {
        debug!(story_id = %id, "Staged update");
        match self.delta.updated.get_mut(id) {
            Some(existing) => existing.merge(patch),
            None => {
                self.delta.updated.insert(id.to_string(), patch);
            }
        }
    }

    /// Queue a deletion; an uncommitted draft is dropped outright
    pub fn stage_delete(&mut self, id: &str) {
        if self.delta.added.shift_remove(id).is_some() {
            self.delta.moved.shift_remove(id);
            self.delta.updated.shift_remove(id);
            debug!(story_id = %id, "Dropped draft");
            return;
        }
        debug!(story_id = %id, "Staged deletion");
        self.delta.deleted.insert(id.to_string());
    }

    /// Queue a position override, merging with any earlier one for `id`
    pub fn stage_move(&mut self, id: &str, target: MoveTarget) {
        debug!(story_id = %id, ?target, "Staged move");
        match self.delta.moved.get_mut(id) {
            Some(existing) => existing.merge(target),
            None => {
                self.delta.moved.insert(id.to_string(), target);
            }
        }
    }

    /// Discard everything staged
    pub fn reset(&mut self) {
        debug!(pending = self.delta.len(), "Resetting session");
        self.delta.clear();
    }

    /// Document with every staged edit applied; `base` is left as is
    pub fn build_preview(&self, base: &Document) -> Document {
        preview::build_preview(base, &self.delta)
    }

    /// Serialize the preview through the session's serializer
    #[instrument(skip(self, base), fields(pending = self.delta.len()))]
    pub fn build_committed(&self, base: &Document) -> EditorResult<String> {
        let serializer = self
            .serializer
            .as_ref()
            .ok_or(EditorError::SerializerUnavailable)?;

        let preview = self.build_preview(base);
        let output = serializer.serialize(&preview)?;
        info!(format = ?serializer.format(), bytes = output.len(), "Committed story map");
        Ok(output)
    }

    pub fn delta(&self) -> &Delta {
        &self.delta
    }

    pub fn is_empty(&self) -> bool {
        self.delta.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.delta.len()
    }

    pub fn is_draft(&self, id: &str) -> bool {
        self.delta.added.contains_key(id)
    }

    fn next_draft_id(&mut self, personas: &IndexMap<String, Persona>) -> String {
        loop {
            self.draft_counter += 1;
            let id = format!("DRAFT-{}", self.draft_counter);
            let taken = self.delta.added.contains_key(&id)
                || personas
                    .values()
                    .any(|persona| persona.stories.iter().any(|s| s.id == id));
            if !taken {
                return id;
            }
        }
    }
}
