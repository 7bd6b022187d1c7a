//! Scaffold Core - staged module composition for project scaffolding CLIs
//!
//! A project template is a tree of composable [`Module`]s. Each module owns a
//! slice of the configuration [`Schema`] and up to four stages (init, prompt,
//! validate, apply). Parent modules call their children's stages in a fixed
//! order; [`Module::execute`] runs the whole pipeline against a target
//! directory and applies nothing unless validation produced zero issues.
//!
//! # Architecture
//!
//! - **Pipeline** - [`module`], [`schema`], [`config`]: the stage machinery and
//!   the loosely typed configuration record flowing through it
//! - **Building blocks** - [`modules`] (package.json, scripts, dependencies,
//!   package manager, IDE, git, `core`) and [`templates`] (registry, file
//!   merge engine)
//! - **Seams** - [`prompt::Prompter`], [`runtime::ProcessRunner`] and
//!   [`module::ProgressSink`], so stages run the same in a terminal and in tests
//! - **CLI/TUI** - [`driver`] and the cliclack front end (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI
//! - `test-support` (default): Exports [`testing`] doubles
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use scaffold_core::{templates, Config, Execution, Mode, Services};
//!
//! let module = templates::barebones::module()?;
//! let config = module
//!     .execute(
//!         Execution {
//!             initial_config: Config::new().with("name", "my-app"),
//!             target_path: "./my-app".into(),
//!             mode: Mode::NewProject,
//!         },
//!         Services::new(templates::DEFAULT_TEMPLATE_ROOT),
//!     )
//!     .await?;
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod module;
pub mod modules;
pub mod product;
pub mod prompt;
pub mod runtime;
pub mod schema;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

// Re-export main types for convenience
pub use config::{Config, Ide, PackageManager};
pub use driver::{create_project, CreateArgs};
pub use error::{Result, ScaffoldError};
pub use module::{Execution, Mode, Module, Services, Stage, StageContext};
pub use product::ProductConfig;
pub use schema::{Issue, Schema};

#[cfg(feature = "tui")]
pub use tui::run;
