//! Optional `git init` in the new project

use crate::config::Config;
use crate::error::Result;
use crate::module::{Module, ProgressMessages, StageContext};
use crate::prompt::Question;
use crate::runtime::git_init_command;
use crate::schema::{Field, FieldType, Schema};

pub const SETUP_GIT: &str = "setupGit";

pub fn schema() -> Result<Schema> {
    Schema::new([Field::required(SETUP_GIT, FieldType::Bool)])
}

pub fn module() -> Result<Module> {
    Ok(Module::new("git", schema()?)
        .with_prompt(prompt)
        .with_apply(apply)
        .with_progress(|state| {
            state.bool(SETUP_GIT).filter(|setup| *setup).map(|_| {
                ProgressMessages::new("Initializing git", "Git initialized", "Failed to initialize git")
            })
        }))
}

async fn prompt(state: Config, ctx: StageContext) -> Result<Config> {
    if state.contains(SETUP_GIT) {
        return Ok(state);
    }
    let setup = ctx.prompter().flag(&Question::confirm("Initialize git", true))?;
    Ok(state.with(SETUP_GIT, setup))
}

async fn apply(state: Config, ctx: StageContext) -> Result<()> {
    if state.bool(SETUP_GIT) == Some(true) {
        ctx.runner().run(&git_init_command(ctx.target_path())).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{Mode, Services};
    use crate::testing::{RecordingRunner, ScriptedPrompter};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_prompt_and_apply() {
        let dir = tempfile::tempdir().unwrap();
        let prompter = Arc::new(ScriptedPrompter::new());
        let runner = Arc::new(RecordingRunner::new());
        let ctx = StageContext::new(
            dir.path(),
            Mode::NewProject,
            Services::new(dir.path())
                .with_prompter(prompter.clone())
                .with_runner(runner.clone()),
        );
        let module = module().unwrap();

        let state = module.prompt(Config::new(), &ctx).await.unwrap();
        assert_eq!(state.bool(SETUP_GIT), Some(true));

        module.apply(state, &ctx).await.unwrap();
        assert_eq!(runner.calls()[0].to_string(), "git init");
    }

    #[tokio::test]
    async fn test_declined_git_runs_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let prompter = Arc::new(ScriptedPrompter::new());
        let runner = Arc::new(RecordingRunner::new());
        let ctx = StageContext::new(
            dir.path(),
            Mode::NewProject,
            Services::new(dir.path())
                .with_prompter(prompter.clone())
                .with_runner(runner.clone()),
        );
        let module = module().unwrap();

        let state = module
            .prompt(Config::new().with(SETUP_GIT, false), &ctx)
            .await
            .unwrap();
        module.apply(state, &ctx).await.unwrap();

        assert!(prompter.asked().is_empty());
        assert!(runner.calls().is_empty());
    }
}
