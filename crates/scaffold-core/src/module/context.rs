//! What a stage function can see besides its state

use super::progress::{ProgressSink, SilentProgress};
use crate::prompt::{NoPrompter, Prompter};
use crate::runtime::{ProcessRunner, SystemRunner};
use crate::templates::copier::TemplateFiles;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Whether the run creates a project or modifies an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    NewProject,
    Update,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::NewProject => f.write_str("new-project"),
            Mode::Update => f.write_str("update"),
        }
    }
}

/// External collaborators shared by every stage of a run
#[derive(Clone)]
pub struct Services {
    prompter: Arc<dyn Prompter>,
    runner: Arc<dyn ProcessRunner>,
    progress: Arc<dyn ProgressSink>,
    template_root: Arc<PathBuf>,
}

impl Services {
    /// Non-interactive services: prompts fail, processes run for real, no spinners
    pub fn new(template_root: impl Into<PathBuf>) -> Self {
        Self {
            prompter: Arc::new(NoPrompter),
            runner: Arc::new(SystemRunner),
            progress: Arc::new(SilentProgress),
            template_root: Arc::new(template_root.into()),
        }
    }

    pub fn with_prompter(self, prompter: Arc<dyn Prompter>) -> Self {
        Self { prompter, ..self }
    }

    pub fn with_runner(self, runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner, ..self }
    }

    pub fn with_progress(self, progress: Arc<dyn ProgressSink>) -> Self {
        Self { progress, ..self }
    }

    pub fn prompter(&self) -> &dyn Prompter {
        self.prompter.as_ref()
    }

    pub fn runner(&self) -> &dyn ProcessRunner {
        self.runner.as_ref()
    }

    pub fn progress(&self) -> &dyn ProgressSink {
        self.progress.as_ref()
    }

    /// Directory holding one `<module>/template` tree per file-owning module
    pub fn template_root(&self) -> &Path {
        &self.template_root
    }
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Services")
            .field("template_root", &self.template_root)
            .finish_non_exhaustive()
    }
}

/// Per-run context handed to every stage function
#[derive(Debug, Clone)]
pub struct StageContext {
    target: Arc<PathBuf>,
    mode: Mode,
    services: Services,
}

impl StageContext {
    pub fn new(target: impl Into<PathBuf>, mode: Mode, services: Services) -> Self {
        Self {
            target: Arc::new(target.into()),
            mode,
            services,
        }
    }

    pub fn target_path(&self) -> &Path {
        &self.target
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn prompter(&self) -> &dyn Prompter {
        self.services.prompter()
    }

    pub fn runner(&self) -> &dyn ProcessRunner {
        self.services.runner()
    }

    pub fn progress(&self) -> &dyn ProgressSink {
        self.services.progress()
    }

    /// File helpers scoped to `<template root>/<module_dir>` and the target
    pub fn template_files(&self, module_dir: &str) -> TemplateFiles {
        TemplateFiles::new(
            self.services.template_root().join(module_dir),
            self.target.as_ref().clone(),
        )
    }
}
