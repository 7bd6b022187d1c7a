//! Product configuration trait for CLI binaries
//!
//! A binary describes its branding, where its templates live and what to
//! print once a project exists. The scaffolding pipeline itself is shared.

use crate::config::PackageManager;
use crate::templates::DEFAULT_TEMPLATE_ROOT;
use std::path::{Path, PathBuf};

/// Configuration trait for scaffolding CLIs
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for the CLI command)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// Environment variable overriding the template root
    fn template_dir_env(&self) -> &'static str;

    fn default_template_dir(&self) -> &'static str {
        DEFAULT_TEMPLATE_ROOT
    }

    /// Base name for generated project directories (`./my-app`, `./my-app-1`, ...)
    fn default_project_name(&self) -> &'static str {
        "my-app"
    }

    fn docs_url(&self) -> &'static str;

    /// Template root: explicit flag, then the environment, then the built-in trees
    fn template_root(&self, override_dir: Option<&Path>) -> PathBuf {
        if let Some(dir) = override_dir {
            return dir.to_path_buf();
        }
        std::env::var(self.template_dir_env())
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(self.default_template_dir()))
    }

    /// Generate the "next steps" instructions after project creation
    fn next_steps(&self, dir: &Path, package_manager: PackageManager, installed: bool) -> Vec<String> {
        let mut steps = Vec::new();

        if std::env::current_dir().ok().as_deref() != Some(dir) {
            steps.push(format!("cd {}", dir.display()));
        }
        if !installed {
            steps.push(format!("{} install", package_manager));
        }
        steps.push(package_manager.run_script("dev"));

        steps
    }
}
