//! Execution driver: turns CLI arguments into a pipeline run
//!
//! Picks the template and the target directory (asking through the
//! [`Prompter`] seam when the flags leave them open), builds the initial
//! configuration and executes the template module in new-project mode.

use crate::config::{Config, Ide, PackageManager};
use crate::module::{Execution, Mode, Services};
use crate::modules::git::SETUP_GIT;
use crate::modules::ide::IDE;
use crate::modules::package_json::NAME;
use crate::modules::package_manager::{INSTALL_DEPS, PACKAGE_MANAGER};
use crate::prompt::{Choice, Prompter, Question};
use crate::templates::{self, TemplateEntry};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

const NON_EMPTY_DIRECTORY: &str =
    "The directory is not empty. New projects can only be scaffolded in empty directories";

/// Arguments of the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Template id from the registry
    pub template: Option<String>,

    /// Project directory to create
    pub directory: Option<PathBuf>,

    pub package_name: Option<String>,
    pub package_manager: Option<PackageManager>,

    /// `Some(false)` for `--no-install-deps`
    pub install_deps: Option<bool>,
    pub init_git: Option<bool>,
    pub ide: Option<Ide>,

    pub hide_logo: bool,

    /// Accept the default answer of every question (non-interactive mode)
    pub yes: bool,

    /// Local template root overriding the built-in trees
    pub template_dir: Option<PathBuf>,
}

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct Created {
    pub template: &'static TemplateEntry,
    pub directory: PathBuf,
    pub config: Config,
}

impl Created {
    pub fn package_manager(&self) -> PackageManager {
        self.config
            .str(PACKAGE_MANAGER)
            .and_then(PackageManager::parse)
            .unwrap_or(PackageManager::Npm)
    }

    pub fn installed(&self) -> bool {
        self.config.bool(INSTALL_DEPS).unwrap_or(false)
    }
}

/// Configuration supplied on the command line; absent flags stay absent
pub fn initial_config(args: &CreateArgs) -> Config {
    Config::new()
        .with_opt(NAME, args.package_name.clone())
        .with_opt(PACKAGE_MANAGER, args.package_manager.map(|pm| pm.as_str()))
        .with_opt(INSTALL_DEPS, args.install_deps)
        .with_opt(SETUP_GIT, args.init_git)
        .with_opt(IDE, args.ide.map(|ide| ide.as_str()))
}

/// First of `./<name>`, `./<name>-1`, `./<name>-2`, ... not taken in `base_dir`
pub fn generate_default_name(base_dir: &Path, name: &str) -> String {
    let mut candidate = name.to_string();
    let mut suffix = 1;
    while base_dir.join(&candidate).exists() {
        candidate = format!("{}-{}", name, suffix);
        suffix += 1;
    }
    format!("./{}", candidate)
}

pub fn select_template(args: &CreateArgs, prompter: &dyn Prompter) -> Result<&'static TemplateEntry> {
    if let Some(id) = &args.template {
        return templates::find(id).with_context(|| {
            format!(
                "Invalid Template: {}. Only the following are allowed: {}",
                id,
                templates::ids().join(", ")
            )
        });
    }

    let choices = templates::TEMPLATES
        .iter()
        .map(|t| Choice::labelled(t.id, t.display_name, t.description))
        .collect();
    let question = Question::select("Which template would you like to use?", choices)
        .default_answer(templates::default_template().id);
    let id = prompter.text(&question)?;

    templates::find(&id).with_context(|| format!("Unknown template selected: {}", id))
}

pub fn select_directory(
    args: &CreateArgs,
    prompter: &dyn Prompter,
    base_dir: &Path,
    default_name: &str,
) -> Result<PathBuf> {
    if let Some(dir) = &args.directory {
        return Ok(dir.clone());
    }

    let owned_base = base_dir.to_path_buf();
    let question = Question::input("Where should the project be created?")
        .default_answer(generate_default_name(base_dir, default_name))
        .check(move |answer| {
            let path = owned_base.join(answer.trim());
            match std::fs::read_dir(&path).map(|mut entries| entries.next().is_some()) {
                Ok(true) => Err(NON_EMPTY_DIRECTORY.to_string()),
                _ => Ok(()),
            }
        });

    let answer = prompter.text(&question)?;
    Ok(PathBuf::from(answer.trim()))
}

/// Resolve template and directory, then scaffold the project
pub async fn create_project(args: &CreateArgs, services: Services, default_name: &str) -> Result<Created> {
    let cwd = std::env::current_dir().context("Failed to read the current directory")?;

    let template = select_template(args, services.prompter())?;
    let directory = select_directory(args, services.prompter(), &cwd, default_name)?;
    debug!(template = template.id, directory = %directory.display(), "creating project");

    let module = (template.module)()
        .with_context(|| format!("Failed to build the {} template", template.id))?;
    let execution = Execution {
        initial_config: initial_config(args),
        target_path: cwd.join(&directory),
        mode: Mode::NewProject,
    };
    let config = module.execute(execution, services).await?;

    Ok(Created {
        template,
        directory,
        config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScaffoldError;
    use crate::testing::ScriptedPrompter;

    #[test]
    fn test_initial_config_keeps_absent_flags_absent() {
        let config = initial_config(&CreateArgs {
            package_manager: Some(PackageManager::Pnpm),
            install_deps: Some(false),
            ..Default::default()
        });

        assert_eq!(config.str(PACKAGE_MANAGER), Some("pnpm"));
        assert_eq!(config.bool(INSTALL_DEPS), Some(false));
        assert!(!config.contains(NAME));
        assert!(!config.contains(SETUP_GIT));
        assert!(!config.contains(IDE));
    }

    #[test]
    fn test_generate_default_name_skips_taken_directories() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(generate_default_name(dir.path(), "my-app"), "./my-app");

        std::fs::create_dir(dir.path().join("my-app")).unwrap();
        std::fs::create_dir(dir.path().join("my-app-1")).unwrap();
        assert_eq!(generate_default_name(dir.path(), "my-app"), "./my-app-2");
    }

    #[test]
    fn test_select_template_from_flag_and_prompt() {
        let prompter = ScriptedPrompter::new();
        let args = CreateArgs {
            template: Some("barebones".into()),
            ..Default::default()
        };
        assert_eq!(select_template(&args, &prompter).unwrap().id, "barebones");
        assert!(prompter.asked().is_empty());

        let picked = select_template(&CreateArgs::default(), &prompter).unwrap();
        assert_eq!(picked.id, "barebones");
        assert_eq!(prompter.asked(), vec!["Which template would you like to use?"]);

        let args = CreateArgs {
            template: Some("nope".into()),
            ..Default::default()
        };
        assert!(select_template(&args, &prompter).is_err());
    }

    #[test]
    fn test_select_directory_rejects_non_empty_answer() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("taken")).unwrap();
        std::fs::write(dir.path().join("taken/file.txt"), "x").unwrap();

        let prompter =
            ScriptedPrompter::new().with_text("Where should the project be created?", "taken");
        let err = select_directory(&CreateArgs::default(), &prompter, dir.path(), "my-app").unwrap_err();
        let err = err.downcast::<ScaffoldError>().unwrap();
        assert!(err.to_string().contains("The directory is not empty"));

        let prompter = ScriptedPrompter::new();
        let picked = select_directory(&CreateArgs::default(), &prompter, dir.path(), "my-app").unwrap();
        assert_eq!(picked, PathBuf::from("./my-app"));
    }

    #[test]
    fn test_select_directory_checks_the_trimmed_answer() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("taken")).unwrap();
        std::fs::write(dir.path().join("taken/file.txt"), "x").unwrap();
        std::fs::create_dir(dir.path().join("empty")).unwrap();

        let prompter =
            ScriptedPrompter::new().with_text("Where should the project be created?", " taken ");
        assert!(select_directory(&CreateArgs::default(), &prompter, dir.path(), "my-app").is_err());

        let prompter =
            ScriptedPrompter::new().with_text("Where should the project be created?", " empty ");
        let picked = select_directory(&CreateArgs::default(), &prompter, dir.path(), "my-app").unwrap();
        assert_eq!(picked, PathBuf::from("empty"));
    }

    #[tokio::test]
    async fn test_create_project_with_every_flag_set() {
        let dir = tempfile::tempdir().unwrap();
        let runner = std::sync::Arc::new(crate::testing::RecordingRunner::new());
        let services = Services::new(templates::DEFAULT_TEMPLATE_ROOT).with_runner(runner.clone());
        let args = CreateArgs {
            template: Some("barebones".into()),
            directory: Some(dir.path().join("app")),
            package_name: Some("app".into()),
            package_manager: Some(PackageManager::Npm),
            install_deps: Some(false),
            init_git: Some(false),
            ide: Some(Ide::Other),
            ..Default::default()
        };

        let created = create_project(&args, services, "my-app").await.unwrap();

        assert_eq!(created.template.id, "barebones");
        assert!(!created.installed());
        assert_eq!(created.package_manager(), PackageManager::Npm);
        assert!(dir.path().join("app/package.json").is_file());
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_project_accepting_every_default() {
        let dir = tempfile::tempdir().unwrap();
        let runner = std::sync::Arc::new(crate::testing::RecordingRunner::new());
        let services = Services::new(templates::DEFAULT_TEMPLATE_ROOT)
            .with_prompter(std::sync::Arc::new(crate::prompt::DefaultsPrompter))
            .with_runner(runner.clone());
        let args = CreateArgs {
            directory: Some(dir.path().join("defaults-app")),
            package_manager: Some(PackageManager::Npm),
            yes: true,
            ..Default::default()
        };

        let created = create_project(&args, services, "my-app").await.unwrap();

        assert_eq!(created.template.id, templates::default_template().id);
        assert_eq!(created.config.str(NAME), Some("defaults-app"));
        assert_eq!(created.config.str(IDE), Some("vscode"));
        assert!(dir.path().join("defaults-app/.vscode/settings.json").is_file());
    }
}
