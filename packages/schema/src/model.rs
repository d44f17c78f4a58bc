//! # Story Map Model
//!
//! Typed view of an `integrated_story_map` document.
//!
//! ```text
//! integrated_story_map
//!  ├─ story_map_structure { activities[], backbones[] }
//!  ├─ version_definitions { order[] }          (optional)
//!  ├─ display_order { backbones[] }            (optional)
//!  ├─ story_mapping { story-id → placement }
//!  ├─ personas_stories { key → persona }
//!  └─ cross_persona_stories[]
//! ```
//!
//! Keys this model does not know about are kept in `extra` maps so a
//! load → edit → save cycle never drops user data.

use crate::wire::{BackboneRepr, StoryPlacementRepr, StoryRepr};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Unknown keys preserved verbatim
pub type Extra = serde_json::Map<String, Value>;

/// Version label used when a story has none
pub const DEFAULT_VERSION: &str = "MVP";

/// Persona key reported for stories in `cross_persona_stories`
pub const CROSS_PERSONA_KEY: &str = "CROSS";

/// Persona name reported for stories in `cross_persona_stories`
pub const CROSS_PERSONA_NAME: &str = "All users";

/// Root envelope of a persisted story map file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StoryMapFile {
    pub integrated_story_map: Document,

    #[serde(flatten)]
    pub extra: Extra,
}

impl StoryMapFile {
    pub fn new(document: Document) -> Self {
        Self {
            integrated_story_map: document,
            extra: Extra::new(),
        }
    }
}

/// The full story map
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub story_map_structure: Structure,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_definitions: Option<VersionDefinitions>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<DisplayOrder>,

    /// Authoritative column + rank per story id
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub story_mapping: IndexMap<String, StoryPlacement>,

    #[serde(rename = "personas_stories", default)]
    pub personas: IndexMap<String, Persona>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cross_persona_stories: Vec<Story>,

    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Structure {
    #[serde(default)]
    pub activities: Vec<Activity>,

    #[serde(default)]
    pub backbones: Vec<Backbone>,

    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VersionDefinitions {
    #[serde(default)]
    pub order: Vec<String>,

    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DisplayOrder {
    #[serde(default)]
    pub backbones: Vec<String>,

    #[serde(flatten)]
    pub extra: Extra,
}

/// Top-level grouping of backbones
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl Activity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }
}

/// A column of the grid
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "BackboneRepr", into = "BackboneRepr")]
pub struct Backbone {
    pub id: String,
    pub activity_id: String,
    pub name: String,
    pub description: Option<String>,

    /// Display-order hint, overridden by `display_order`
    pub sequence: Option<i64>,

    pub extra: Extra,
}

impl Backbone {
    pub fn new(
        id: impl Into<String>,
        activity_id: impl Into<String>,
        name: impl Into<String>,
        sequence: i64,
    ) -> Self {
        Self {
            id: id.into(),
            activity_id: activity_id.into(),
            name: name.into(),
            sequence: Some(sequence),
            ..Default::default()
        }
    }
}

/// Column and rank recorded for a story independently of its own fields
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "StoryPlacementRepr", into = "StoryPlacementRepr")]
pub struct StoryPlacement {
    pub backbone_id: Option<String>,
    pub sequence: Option<i64>,
    pub extra: Extra,
}

impl StoryPlacement {
    pub fn new(backbone_id: impl Into<String>, sequence: i64) -> Self {
        Self {
            backbone_id: Some(backbone_id.into()),
            sequence: Some(sequence),
            extra: Extra::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Persona {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default)]
    pub stories: Vec<Story>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl Persona {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_stories(mut self, stories: Vec<Story>) -> Self {
        self.stories = stories;
        self
    }
}

/// A single backlog item
///
/// Hints of the wrong type load as `None` and keep their raw value in
/// `extra`, so the file is written back as it was read.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "StoryRepr", into = "StoryRepr")]
pub struct Story {
    pub id: String,

    /// Persisted as `story`
    pub text: String,

    pub backbone_id: String,
    pub version: Option<String>,
    pub priority: Option<i64>,
    pub acceptance_criteria: Option<Vec<String>>,

    /// Raw status label; see [`Story::status`]
    pub status: Option<String>,

    pub backbone_x_version_sort: Option<i64>,
    pub extra: Extra,
}

impl Story {
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        backbone_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            backbone_id: backbone_id.into(),
            ..Default::default()
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_sort(mut self, sort: i64) -> Self {
        self.backbone_x_version_sort = Some(sort);
        self
    }

    /// Version bucket this story falls into, an empty label counts as none
    pub fn version_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.version
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }

    /// Parsed status, `None` when absent or not a known label
    pub fn status(&self) -> Option<StoryStatus> {
        self.status.as_deref().and_then(|s| s.parse().ok())
    }
}

/// Workflow state of a story
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StoryStatus {
    Todo,
    InProgress,
    Review,
    Done,
    Cancelled,
}

impl StoryStatus {
    pub const ALL: [StoryStatus; 5] = [
        StoryStatus::Todo,
        StoryStatus::InProgress,
        StoryStatus::Review,
        StoryStatus::Done,
        StoryStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoryStatus::Todo => "TODO",
            StoryStatus::InProgress => "IN_PROGRESS",
            StoryStatus::Review => "REVIEW",
            StoryStatus::Done => "DONE",
            StoryStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for StoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StoryStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown status '{}'", s))
    }
}

/// Who a story belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryOwner<'a> {
    Persona { key: &'a str, name: &'a str },
    Cross,
}

impl<'a> StoryOwner<'a> {
    pub fn key(&self) -> &'a str {
        match self {
            StoryOwner::Persona { key, .. } => key,
            StoryOwner::Cross => CROSS_PERSONA_KEY,
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            StoryOwner::Persona { name, .. } => name,
            StoryOwner::Cross => CROSS_PERSONA_NAME,
        }
    }
}

impl Document {
    pub fn activities(&self) -> &[Activity] {
        &self.story_map_structure.activities
    }

    pub fn backbones(&self) -> &[Backbone] {
        &self.story_map_structure.backbones
    }

    pub fn activity(&self, id: &str) -> Option<&Activity> {
        self.activities().iter().find(|a| a.id == id)
    }

    pub fn backbone(&self, id: &str) -> Option<&Backbone> {
        self.backbones().iter().find(|b| b.id == id)
    }

    /// Explicit version bucket order, if the document defines one
    pub fn version_order(&self) -> Option<&[String]> {
        self.version_definitions.as_ref().map(|v| v.order.as_slice())
    }

    /// Explicit column order, if the document defines one
    pub fn display_order(&self) -> Option<&[String]> {
        self.display_order.as_ref().map(|d| d.backbones.as_slice())
    }

    /// Every story in enumeration order: personas first, then the cross list
    pub fn stories(&self) -> impl Iterator<Item = (StoryOwner<'_>, &Story)> {
        self.personas
            .iter()
            .flat_map(|(key, persona)| {
                persona.stories.iter().map(move |story| {
                    (
                        StoryOwner::Persona {
                            key: key.as_str(),
                            name: persona.name.as_str(),
                        },
                        story,
                    )
                })
            })
            .chain(
                self.cross_persona_stories
                    .iter()
                    .map(|story| (StoryOwner::Cross, story)),
            )
    }

    pub fn stories_mut(&mut self) -> impl Iterator<Item = &mut Story> {
        self.personas
            .values_mut()
            .flat_map(|persona| persona.stories.iter_mut())
            .chain(self.cross_persona_stories.iter_mut())
    }

    pub fn find_story(&self, id: &str) -> Option<&Story> {
        self.stories().map(|(_, s)| s).find(|s| s.id == id)
    }

    /// First story with `id`, searching personas then the cross list
    pub fn find_story_mut(&mut self, id: &str) -> Option<&mut Story> {
        self.stories_mut().find(|s| s.id == id)
    }

    pub fn contains_story(&self, id: &str) -> bool {
        self.find_story(id).is_some()
    }

    /// Keep only the stories for which `keep` returns true, in every list
    pub fn retain_stories<F>(&mut self, mut keep: F)
    where
        F: FnMut(&Story) -> bool,
    {
        for persona in self.personas.values_mut() {
            persona.stories.retain(|s| keep(s));
        }
        self.cross_persona_stories.retain(|s| keep(s));
    }
}
