//! Read-only option lists for editing widgets (persona, backbone and
//! version pickers). Derived from a document on demand; nothing is cached.

use crate::composer::{ordered_columns, ComposeOptions};
use crate::version_order::order_versions;
use serde::Serialize;
use storymap_schema::Document;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonaOption {
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackboneOption {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct EditOptions {
    /// Personas in document order
    pub personas: Vec<PersonaOption>,

    /// Backbones in column order
    pub backbones: Vec<BackboneOption>,

    /// Version labels in bucket order
    pub versions: Vec<String>,
}

pub fn edit_options(doc: &Document, options: &ComposeOptions) -> EditOptions {
    let personas = doc
        .personas
        .iter()
        .map(|(key, persona)| PersonaOption {
            key: key.clone(),
            name: persona.name.clone(),
        })
        .collect();

    let backbones = ordered_columns(doc)
        .into_iter()
        .map(|backbone| BackboneOption {
            id: backbone.id.clone(),
            name: backbone.name.clone(),
        })
        .collect();

    let preference = doc.version_order().unwrap_or(&options.version_preference);
    let labels = doc
        .version_order()
        .unwrap_or_default()
        .iter()
        .map(String::as_str)
        .chain(doc.stories().map(|(_, story)| story.version_or(&options.default_version)))
        .chain(std::iter::once(options.default_version.as_str()));

    EditOptions {
        personas,
        backbones,
        versions: order_versions(labels, preference),
    }
}
