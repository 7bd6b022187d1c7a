//! Create or update the project's `package.json`
//!
//! In a new project the manifest is created from the project name and then
//! receives scripts and dependencies. In an existing project only the merge
//! steps run.

use super::manifest::{manifest_exists, write_manifest, Manifest, MANIFEST_FILE};
use super::project_name::{suggest_project_name, validate_project_name};
use super::{add_dependencies, add_scripts, apply_in_order};
use crate::config::Config;
use crate::error::Result;
use crate::module::{Mode, Module, ProgressMessages, StageContext};
use crate::prompt::Question;
use crate::schema::{Field, FieldType, Issue, Schema};
use serde_json::json;
use std::sync::Arc;

pub const NAME: &str = "name";

pub fn schema() -> Result<Schema> {
    Schema::new([Field::required(NAME, FieldType::String).check(|v| match v.as_str() {
        Some(name) => validate_project_name(name).map_err(|problems| problems.join(", ")),
        None => Ok(()),
    })])?
    .merge(&add_scripts::schema()?)?
    .merge(&add_dependencies::schema()?)
}

pub fn module() -> Result<Module> {
    let children = Arc::new([add_scripts::module()?, add_dependencies::module()?]);

    Ok(Module::new("package-json", schema()?)
        .with_prompt(prompt)
        .with_validate(validate)
        .with_apply(move |state: Config, ctx: StageContext| {
            let children = children.clone();
            async move {
                if ctx.mode() == Mode::NewProject {
                    create(&state, &ctx).await?;
                }
                let [scripts, dependencies] = &*children;
                apply_in_order(&[scripts, dependencies], &state, &ctx).await
            }
        })
        .with_progress(|_| {
            Some(ProgressMessages::new(
                "Writing package.json",
                "package.json written",
                "Failed to write package.json",
            ))
        }))
}

async fn prompt(state: Config, ctx: StageContext) -> Result<Config> {
    if ctx.mode() == Mode::Update || state.contains(NAME) {
        return Ok(state);
    }

    let directory = ctx
        .target_path()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let question = Question::input("Enter the project name")
        .default_answer(suggest_project_name(&directory))
        .check(|name| {
            validate_project_name(name)
                .map_err(|problems| format!("Invalid project name: {}", problems[0]))
        });

    let name = ctx.prompter().text(&question)?;
    Ok(state.with(NAME, name))
}

async fn validate(_state: Config, ctx: StageContext) -> Result<Vec<Issue>> {
    let exists = manifest_exists(ctx.target_path()).await?;
    let issue = match ctx.mode() {
        Mode::NewProject if exists => Some("Package.json already exists"),
        Mode::Update if !exists => Some("Package.json doesn't exist to update"),
        _ => None,
    };
    Ok(issue.map(|msg| vec![Issue::at(MANIFEST_FILE, msg)]).unwrap_or_default())
}

async fn create(state: &Config, ctx: &StageContext) -> Result<()> {
    let mut manifest = Manifest::new();
    manifest.insert(NAME.to_string(), json!(state.str(NAME).unwrap_or_default()));
    manifest.insert("version".to_string(), json!("0.0.0"));
    manifest.insert("private".to_string(), json!(true));
    manifest.insert("type".to_string(), json!("module"));
    write_manifest(ctx.target_path(), &manifest).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::Services;
    use crate::modules::manifest::read_manifest;
    use crate::testing::ScriptedPrompter;
    use serde_json::Value;
    use std::path::Path;

    fn ctx(target: &Path, mode: Mode, prompter: Arc<ScriptedPrompter>) -> StageContext {
        StageContext::new(target, mode, Services::new(target).with_prompter(prompter))
    }

    #[tokio::test]
    async fn test_prompt_skips_supplied_name() {
        let dir = tempfile::tempdir().unwrap();
        let prompter = Arc::new(ScriptedPrompter::new());
        let module = module().unwrap();

        let state = module
            .prompt(
                Config::new().with(NAME, "given"),
                &ctx(dir.path(), Mode::NewProject, prompter.clone()),
            )
            .await
            .unwrap();

        assert_eq!(state.str(NAME), Some("given"));
        assert!(prompter.asked().is_empty());
    }

    #[tokio::test]
    async fn test_prompt_defaults_to_directory_name() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("Cool App");
        let prompter = Arc::new(ScriptedPrompter::new());

        let state = module()
            .unwrap()
            .prompt(Config::new(), &ctx(&target, Mode::NewProject, prompter.clone()))
            .await
            .unwrap();

        assert_eq!(state.str(NAME), Some("cool-app"));
        assert_eq!(prompter.asked(), vec!["Enter the project name"]);
    }

    #[tokio::test]
    async fn test_prompt_is_skipped_in_update_mode() {
        let dir = tempfile::tempdir().unwrap();
        let prompter = Arc::new(ScriptedPrompter::new());

        let state = module()
            .unwrap()
            .prompt(Config::new(), &ctx(dir.path(), Mode::Update, prompter.clone()))
            .await
            .unwrap();

        assert!(!state.contains(NAME));
        assert!(prompter.asked().is_empty());
    }

    #[tokio::test]
    async fn test_validate_depends_on_mode() {
        let dir = tempfile::tempdir().unwrap();
        let prompter = Arc::new(ScriptedPrompter::new());
        let module = module().unwrap();

        let issues = module
            .validate(Config::new(), &ctx(dir.path(), Mode::Update, prompter.clone()))
            .await
            .unwrap();
        assert_eq!(issues[0].message, "Package.json doesn't exist to update");

        std::fs::write(dir.path().join(MANIFEST_FILE), "{}").unwrap();
        let issues = module
            .validate(Config::new(), &ctx(dir.path(), Mode::NewProject, prompter))
            .await
            .unwrap();
        assert_eq!(issues[0].message, "Package.json already exists");
    }

    #[tokio::test]
    async fn test_apply_creates_manifest_with_scripts_and_dependencies() {
        let dir = tempfile::tempdir().unwrap();
        let state = Config::new()
            .with(NAME, "test-project")
            .with("scripts", json!([{"name": "dev", "script": "vinxi dev"}]))
            .with("dependencies", json!([{"name": "react", "version": "^18.3.1"}]));

        module()
            .unwrap()
            .apply(
                state,
                &ctx(dir.path(), Mode::NewProject, Arc::new(ScriptedPrompter::new())),
            )
            .await
            .unwrap();

        let manifest = read_manifest(dir.path()).await.unwrap();
        assert_eq!(
            Value::Object(manifest),
            json!({
                "name": "test-project",
                "version": "0.0.0",
                "private": true,
                "type": "module",
                "scripts": {"dev": "vinxi dev"},
                "dependencies": {"react": "^18.3.1"}
            })
        );
    }

    #[test]
    fn test_schema_rejects_invalid_names() {
        let issues = schema().unwrap().issues_for(&json!({"name": "Bad Name"}));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, vec![NAME]);
    }
}
