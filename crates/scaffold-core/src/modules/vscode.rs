//! VS Code workspace settings

use super::template_conflicts;
use crate::config::Config;
use crate::error::Result;
use crate::module::{Module, StageContext};
use crate::schema::{Issue, Schema};
use crate::templates::copier::CopyRequest;

pub const TEMPLATE_DIR: &str = "vscode";

pub fn module() -> Result<Module> {
    Ok(Module::new("vscode", Schema::empty())
        .with_validate(validate)
        .with_apply(apply))
}

async fn validate(_state: Config, ctx: StageContext) -> Result<Vec<Issue>> {
    template_conflicts(TEMPLATE_DIR, &ctx).await
}

async fn apply(_state: Config, ctx: StageContext) -> Result<()> {
    ctx.template_files(TEMPLATE_DIR)
        .copy_template_files(CopyRequest::new("**/*", "template"))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{Mode, Services};
    use std::fs;
    use std::path::Path;

    fn ctx(root: &Path) -> StageContext {
        let templates = root.join("templates");
        fs::create_dir_all(templates.join("vscode/template/_dot_vscode")).unwrap();
        fs::write(
            templates.join("vscode/template/_dot_vscode/settings.json"),
            "{\"files.watcherExclude\": {}}",
        )
        .unwrap();
        fs::create_dir_all(root.join("app")).unwrap();
        StageContext::new(root.join("app"), Mode::Update, Services::new(templates))
    }

    #[tokio::test]
    async fn test_copies_settings() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ctx(dir.path());

        let module = module().unwrap();
        assert!(module.validate(Config::new(), &ctx).await.unwrap().is_empty());
        module.apply(Config::new(), &ctx).await.unwrap();

        assert!(ctx.target_path().join(".vscode/settings.json").is_file());
    }

    #[tokio::test]
    async fn test_existing_settings_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ctx(dir.path());
        fs::create_dir_all(ctx.target_path().join(".vscode")).unwrap();
        fs::write(ctx.target_path().join(".vscode/settings.json"), "{}").unwrap();

        let issues = module().unwrap().validate(Config::new(), &ctx).await.unwrap();

        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains(".vscode/settings.json"));
    }
}
