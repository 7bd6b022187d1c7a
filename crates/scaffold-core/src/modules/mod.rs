//! Concrete modules
//!
//! Primitive modules own one concern each (the package manifest, the IDE,
//! the package manager, git). [`core`] composes them into the base of every
//! template; template modules in [`crate::templates`] wrap `core` with their
//! own files.

pub mod add_dependencies;
pub mod add_scripts;
pub mod core;
pub mod git;
pub mod ide;
pub mod manifest;
pub mod package_json;
pub mod package_manager;
pub mod project_name;
pub mod vscode;

use crate::config::Config;
use crate::error::{Result, ScaffoldError};
use crate::module::{run_with_progress, Module, ProgressMessages, Stage, StageContext, StageOutput};
use crate::schema::Issue;
use crate::templates::copier::CopyRequest;
use serde::de::DeserializeOwned;

/// Run `stage` (init or prompt) on each child in order, merging every
/// child's result into the running state so later children see it
pub(crate) async fn resolve_in_order(
    stage: Stage,
    children: &[&Module],
    state: Config,
    ctx: &StageContext,
) -> Result<Config> {
    let mut state = state;
    for child in children {
        if let StageOutput::State(resolved) = child.run(stage, state.clone(), ctx).await? {
            state = state.merge(resolved);
        }
    }
    Ok(state)
}

/// Custom validation of each child, concatenated
pub(crate) async fn validate_in_order(
    children: &[&Module],
    state: &Config,
    ctx: &StageContext,
) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();
    for child in children {
        issues.extend(child.validate(state.clone(), ctx).await?);
    }
    Ok(issues)
}

pub(crate) async fn apply_in_order(children: &[&Module], state: &Config, ctx: &StageContext) -> Result<()> {
    for child in children {
        child.apply(state.clone(), ctx).await?;
    }
    Ok(())
}

/// Issues for every file of `<module_dir>/template` that already exists in the target
pub(crate) async fn template_conflicts(module_dir: &str, ctx: &StageContext) -> Result<Vec<Issue>> {
    let conflicts = ctx
        .template_files(module_dir)
        .files_that_would_be_overwritten("**/*", "template")
        .await?;
    Ok(overwrite_issues(conflicts))
}

/// Copy `<module_dir>/template` into the target behind a spinner
pub(crate) async fn copy_module_template(module_dir: &str, ctx: &StageContext) -> Result<()> {
    let messages = ProgressMessages::new(
        format!("Copying {} template files", module_dir),
        format!("Copied {} template files", module_dir),
        format!("Failed to copy {} template files", module_dir),
    );
    let files = ctx.template_files(module_dir);
    run_with_progress(ctx.progress(), Some(messages), async move {
        let written = files
            .copy_template_files(CopyRequest::new("**/*", "template"))
            .await?;
        tracing::info!(module = module_dir, files = written.len(), "copied template files");
        Ok(())
    })
    .await
}

pub(crate) fn overwrite_issues(paths: Vec<String>) -> Vec<Issue> {
    paths
        .into_iter()
        .map(|path| {
            Issue::root(format!(
                "The file {} couldn't be created because it would overwrite an existing file",
                path
            ))
        })
        .collect()
}

/// Structured list field (dependencies, scripts); absent means empty
pub(crate) fn list_field<T: DeserializeOwned>(state: &Config, key: &str) -> Result<Vec<T>> {
    state
        .get_as::<Vec<T>>(key)
        .map(Option::unwrap_or_default)
        .map_err(|e| ScaffoldError::Validation(vec![Issue::at(key, e.to_string())]))
}
