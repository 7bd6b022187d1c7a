//! Package manager choice and dependency installation

use crate::config::{detect_package_manager, Config, PackageManager};
use crate::error::Result;
use crate::module::{Module, ProgressMessages, StageContext};
use crate::prompt::{Choice, Question};
use crate::runtime::install_command;
use crate::schema::{Field, FieldType, Schema};

pub const PACKAGE_MANAGER: &str = "packageManager";
pub const INSTALL_DEPS: &str = "installDeps";
pub const DEFAULT_PACKAGE_MANAGER: PackageManager = PackageManager::Npm;

pub fn schema() -> Result<Schema> {
    Schema::new([
        Field::required(
            PACKAGE_MANAGER,
            FieldType::one_of(PackageManager::ALL.iter().map(PackageManager::as_str)),
        ),
        Field::required(INSTALL_DEPS, FieldType::Bool),
    ])
}

pub(crate) fn selected(state: &Config) -> Option<PackageManager> {
    state.str(PACKAGE_MANAGER).and_then(PackageManager::parse)
}

pub fn module() -> Result<Module> {
    Ok(Module::new("package-manager", schema()?)
        .with_init(init)
        .with_prompt(prompt)
        .with_apply(apply)
        .with_progress(|state| {
            let pm = selected(state)?;
            state.bool(INSTALL_DEPS).filter(|install| *install)?;
            Some(ProgressMessages::new(
                format!("Installing dependencies with {}", pm),
                format!("Installed dependencies with {}", pm),
                format!("Failed to install dependencies with {}", pm),
            ))
        }))
}

/// Default to the package manager that launched us, if any
async fn init(state: Config, _ctx: StageContext) -> Result<Config> {
    let mut state = state;
    if let Some(detected) = detect_package_manager() {
        state.set_default(PACKAGE_MANAGER, detected.as_str());
    }
    Ok(state)
}

async fn prompt(state: Config, ctx: StageContext) -> Result<Config> {
    let mut state = state;

    if !state.contains(PACKAGE_MANAGER) {
        let question = Question::select(
            "Select a package manager",
            PackageManager::ALL
                .iter()
                .map(|pm| Choice::new(pm.as_str()))
                .collect(),
        )
        .default_answer(detect_package_manager().unwrap_or(DEFAULT_PACKAGE_MANAGER).as_str());
        let answer = ctx.prompter().text(&question)?;
        state.set(PACKAGE_MANAGER, answer);
    }

    if !state.contains(INSTALL_DEPS) {
        let answer = ctx
            .prompter()
            .flag(&Question::confirm("Install dependencies", true))?;
        state.set(INSTALL_DEPS, answer);
    }

    Ok(state)
}

async fn apply(state: Config, ctx: StageContext) -> Result<()> {
    if state.bool(INSTALL_DEPS) != Some(true) {
        return Ok(());
    }
    let Some(pm) = selected(&state) else {
        return Ok(());
    };
    ctx.runner()
        .run(&install_command(pm, ctx.target_path()))
        .await
}
