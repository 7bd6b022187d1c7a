//! Charm-style CLI flow using cliclack

use super::clack::{ClackProgress, ClackPrompter};
use crate::driver::{create_project, CreateArgs, Created};
use crate::error::{format_issues, ScaffoldError};
use crate::module::Services;
use crate::product::ProductConfig;
use crate::prompt::{DefaultsPrompter, Prompter};
use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;

const LOGO: &str = r"
   ___ _ __ ___  __ _| |_ ___        __ _ _ __  _ __
  / __| '__/ _ \/ _` | __/ _ \_____ / _` | '_ \| '_ \
 | (__| | |  __/ (_| | ||  __/_____| (_| | |_) | |_) |
  \___|_|  \___|\__,_|\__\___|      \__,_| .__/| .__/
                                         |_|   |_|
";

/// Run the CLI with interactive prompts
///
/// Failures are reported through cliclack before being returned.
pub async fn run<C: ProductConfig>(config: &C, args: CreateArgs) -> Result<()> {
    if !args.hide_logo {
        println!("{}", LOGO.cyan().bold());
    }

    cliclack::intro(config.display_name())?;

    let template_root = config.template_root(args.template_dir.as_deref());
    if args.template_dir.is_some() {
        cliclack::log::info(format!("Using local templates from {}", template_root.display()))?;
    }
    if !template_root.is_dir() {
        cliclack::log::warning(format!(
            "Template directory {} does not exist (set {} to override)",
            template_root.display(),
            config.template_dir_env()
        ))?;
    }

    let prompter: Arc<dyn Prompter> = if args.yes {
        cliclack::log::info("Accepting the default for every question (--yes)")?;
        Arc::new(DefaultsPrompter)
    } else {
        Arc::new(ClackPrompter)
    };
    let services = Services::new(template_root)
        .with_prompter(prompter)
        .with_progress(Arc::new(ClackProgress));

    match create_project(&args, services, config.default_project_name()).await {
        Ok(created) => {
            cliclack::log::success(format!(
                "Created a {} project in {}",
                created.template.display_name,
                created.directory.display()
            ))?;
            print_next_steps(config, &created)
        }
        Err(e) => {
            report_failure(&e)?;
            Err(e)
        }
    }
}

fn report_failure(error: &anyhow::Error) -> Result<()> {
    match error.downcast_ref::<ScaffoldError>() {
        Some(ScaffoldError::Validation(issues)) => {
            cliclack::log::error(format!("Validation failed:\n{}", format_issues(issues)))?;
            cliclack::outro_cancel("Nothing was written")?;
        }
        Some(e) if e.is_precondition() => {
            cliclack::outro_cancel(e.to_string())?;
        }
        _ => {
            cliclack::outro_cancel(format!("{:#}", error))?;
        }
    }
    Ok(())
}

fn print_next_steps<C: ProductConfig>(config: &C, created: &Created) -> Result<()> {
    let steps = config.next_steps(&created.directory, created.package_manager(), created.installed());

    println!();
    println!("  {}", "Next steps".bold());
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step.cyan());
    }
    println!();
    println!("  Docs: {}", config.docs_url().dimmed());

    cliclack::outro("Happy coding!")?;

    Ok(())
}
