//! create-app - scaffold TanStack Start projects from composable template modules

use anyhow::Result;
use clap::{Args as ClapArgs, Parser, Subcommand};
use scaffold_core::driver::CreateArgs;
use scaffold_core::modules::project_name::parse_project_name;
use scaffold_core::templates::{self, parse_template_id};
use scaffold_core::{Ide, PackageManager, ProductConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Product configuration of the create-app binary
#[derive(Clone)]
pub struct CreateApp;

impl ProductConfig for CreateApp {
    fn name(&self) -> &'static str {
        "create-app"
    }

    fn display_name(&self) -> &'static str {
        "Create App"
    }

    fn cli_description(&self) -> &'static str {
        "CLI for scaffolding TanStack Start projects"
    }

    fn template_dir_env(&self) -> &'static str {
        "CREATE_APP_TEMPLATE_DIR"
    }

    fn docs_url(&self) -> &'static str {
        "https://tanstack.com/start"
    }
}

#[derive(Parser, Debug)]
#[command(name = "create-app")]
#[command(about = "CLI for scaffolding TanStack Start projects")]
#[command(version, args_conflicts_with_subcommands = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub create: CliCreateArgs,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new project (the default)
    Create(CliCreateArgs),
    /// List the available templates
    Templates,
}

#[derive(ClapArgs, Debug, Default)]
pub struct CliCreateArgs {
    /// Template to use
    #[arg(short, long, value_parser = parse_template_id)]
    pub template: Option<String>,

    /// Project directory to create
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Name written to package.json
    #[arg(long = "package-name", value_parser = parse_project_name)]
    pub package_name: Option<String>,

    /// Package manager used to install dependencies
    #[arg(long = "package-manager", value_enum)]
    pub package_manager: Option<PackageManager>,

    /// Install dependencies after scaffolding
    #[arg(long = "install-deps", overrides_with = "no_install_deps")]
    pub install_deps: bool,

    /// Skip dependency installation
    #[arg(long = "no-install-deps", overrides_with = "install_deps")]
    pub no_install_deps: bool,

    /// Initialize a git repository
    #[arg(long = "init-git", overrides_with = "no_init_git")]
    pub init_git: bool,

    /// Skip git initialization
    #[arg(long = "no-init-git", overrides_with = "init_git")]
    pub no_init_git: bool,

    /// Editor to configure the project for
    #[arg(long, value_enum)]
    pub ide: Option<Ide>,

    /// Don't print the logo
    #[arg(long = "hide-logo")]
    pub hide_logo: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,

    /// Local directory to use for templates instead of the bundled ones (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,
}

/// `--flag` / `--no-flag` pair; neither means "ask"
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            template: args.template,
            directory: args.directory,
            package_name: args.package_name,
            package_manager: args.package_manager,
            install_deps: switch(args.install_deps, args.no_install_deps),
            init_git: switch(args.init_git, args.no_init_git),
            ide: args.ide,
            hide_logo: args.hide_logo,
            yes: args.yes,
            template_dir: args.template_dir,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("CREATE_APP_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn list_templates() {
    for template in templates::TEMPLATES {
        println!("{:<12} {}", template.id, template.description);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    init_tracing();

    let args = Args::parse();
    let config = CreateApp;

    let create_args = match args.command {
        Some(Command::Templates) => {
            list_templates();
            return Ok(());
        }
        Some(Command::Create(create_args)) => create_args,
        None => args.create,
    };

    let result = scaffold_core::run(&config, create_args.into()).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    if result.is_err() {
        // Already reported by the TUI
        std::process::exit(1);
    }
    Ok(())
}
