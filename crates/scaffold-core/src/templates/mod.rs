//! Template registry and the file merge engine
//!
//! This module provides:
//! - The static [`TEMPLATES`] registry (first entry is the default)
//! - [`copier::TemplateFiles`], the conflict-checked template copier
//! - Glob [`pattern::Pattern`]s used to select template files

pub mod barebones;
pub mod copier;
pub mod pattern;

use crate::error::Result;
use crate::module::Module;

pub use copier::{CopyRequest, MatchKind, TemplateFiles};
pub use pattern::Pattern;

/// Template trees shipped with the workspace
pub const DEFAULT_TEMPLATE_ROOT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../templates");

/// A selectable project template
#[derive(Debug, Clone, Copy)]
pub struct TemplateEntry {
    pub id: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub module: fn() -> Result<Module>,
}

pub static TEMPLATES: &[TemplateEntry] = &[TemplateEntry {
    id: barebones::ID,
    display_name: "Barebones",
    description: "The bare minimum",
    module: barebones::module,
}];

pub fn find(id: &str) -> Option<&'static TemplateEntry> {
    TEMPLATES.iter().find(|t| t.id == id)
}

pub fn default_template() -> &'static TemplateEntry {
    &TEMPLATES[0]
}

pub fn ids() -> Vec<&'static str> {
    TEMPLATES.iter().map(|t| t.id).collect()
}

/// clap value parser for `--template`
pub fn parse_template_id(value: &str) -> std::result::Result<String, String> {
    match find(value) {
        Some(entry) => Ok(entry.id.to_string()),
        None => Err(format!(
            "Invalid Template: {}. Only the following are allowed: {}",
            value,
            ids().join(", ")
        )),
    }
}
