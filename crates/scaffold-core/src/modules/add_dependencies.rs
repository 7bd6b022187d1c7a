//! Merge dependencies into an existing `package.json`

use super::manifest::{merge_section, update_manifest};
use super::list_field;
use crate::config::Config;
use crate::error::Result;
use crate::module::{Module, StageContext};
use crate::schema::{Field, FieldType, Schema};
use semver::VersionReq;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEPENDENCIES: &str = "dependencies";
pub const DEV_DEPENDENCIES: &str = "devDependencies";

const SPECIFIER_PREFIXES: [&str; 5] = ["workspace:", "npm:", "file:", "link:", "git+"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub name: String,
    pub version: String,
}

impl Dependency {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Accepts semver ranges (`^1.2.3`, `>=1 <2`, `1.x || 2.x`), dist-tags and protocol specifiers
pub fn validate_version_spec(spec: &str) -> std::result::Result<(), String> {
    let spec = spec.trim();
    if spec.is_empty() {
        return Err("Version cannot be empty".to_string());
    }
    if SPECIFIER_PREFIXES.iter().any(|p| spec.starts_with(p)) || is_dist_tag(spec) {
        return Ok(());
    }

    let parses = spec.split("||").all(|alternative| {
        let comparators = alternative.split_whitespace().collect::<Vec<_>>().join(", ");
        VersionReq::parse(&comparators).is_ok()
    });
    if parses {
        Ok(())
    } else {
        Err(format!("Invalid version '{}'", spec))
    }
}

fn is_dist_tag(spec: &str) -> bool {
    spec.starts_with(|c: char| c.is_ascii_alphabetic())
        && spec
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_'))
}

fn dependency_list() -> Result<FieldType> {
    let entry = Schema::new([
        Field::required("name", FieldType::String),
        Field::required("version", FieldType::String)
            .check(|v| v.as_str().map_or(Ok(()), validate_version_spec)),
    ])?;
    Ok(FieldType::list_of(FieldType::Record(entry)))
}

pub fn schema() -> Result<Schema> {
    Schema::new([
        Field::optional(DEPENDENCIES, dependency_list()?),
        Field::optional(DEV_DEPENDENCIES, dependency_list()?),
    ])
}

pub fn module() -> Result<Module> {
    Ok(Module::new("add-dependencies", schema()?).with_apply(apply))
}

async fn apply(state: Config, ctx: StageContext) -> Result<()> {
    let dependencies: Vec<Dependency> = list_field(&state, DEPENDENCIES)?;
    let dev_dependencies: Vec<Dependency> = list_field(&state, DEV_DEPENDENCIES)?;
    if dependencies.is_empty() && dev_dependencies.is_empty() {
        return Ok(());
    }

    debug!(
        dependencies = dependencies.len(),
        dev_dependencies = dev_dependencies.len(),
        "merging dependencies into package.json"
    );
    update_manifest(ctx.target_path(), |manifest| {
        if !dependencies.is_empty() {
            merge_section(manifest, DEPENDENCIES, pairs(dependencies));
        }
        if !dev_dependencies.is_empty() {
            merge_section(manifest, DEV_DEPENDENCIES, pairs(dev_dependencies));
        }
    })
    .await
}

fn pairs(dependencies: Vec<Dependency>) -> impl Iterator<Item = (String, String)> {
    dependencies.into_iter().map(|d| (d.name, d.version))
}
