//! The composable unit of the scaffolding pipeline
//!
//! A [`Module`] pairs a [`Schema`] with up to four stage functions that run
//! in a fixed order:
//!
//! 1. **init** - derive defaults from the supplied configuration
//! 2. **prompt** - ask for anything still missing (the only interactive stage)
//! 3. **validate** - report [`Issue`]s; any issue stops the run
//! 4. **apply** - mutate the target directory
//!
//! Modules are persistent values: every `with_*` builder returns a new module
//! and leaves the receiver untouched. Parent modules compose children by
//! calling the children's stage methods ([`Module::init`], [`Module::prompt`],
//! ...) from their own stage functions, never [`Module::execute`], so the
//! stages of a composed pipeline interleave level by level.

pub mod context;
pub mod progress;

use crate::config::Config;
use crate::error::{PreconditionError, Result, ScaffoldError};
use crate::schema::{Issue, Schema};
use futures::future::BoxFuture;
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, warn};

pub use context::{Mode, Services, StageContext};
pub use progress::{run_with_progress, ProgressMessages, ProgressSink, ProgressTask, SilentProgress};

/// Stage function that refines the state (init, prompt)
pub type StateFn<S> = Arc<dyn Fn(S, StageContext) -> BoxFuture<'static, Result<S>> + Send + Sync>;
pub type ValidateFn<S> =
    Arc<dyn Fn(S, StageContext) -> BoxFuture<'static, Result<Vec<Issue>>> + Send + Sync>;
pub type ApplyFn<S> = Arc<dyn Fn(S, StageContext) -> BoxFuture<'static, Result<()>> + Send + Sync>;
/// Progress descriptor: messages for the apply spinner, or `None` to stay silent
pub type ProgressFn<S> = Arc<dyn Fn(&S) -> Option<ProgressMessages> + Send + Sync>;

/// Anything that can flow through the stages
pub trait StageState: Serialize + Clone + Send + Sync + 'static {
    /// Fold the result of an init or prompt stage into the state it was run on.
    /// Replaces by default; records with optional fields keep what was already set.
    fn merge_resolved(self, resolved: Self) -> Self {
        resolved
    }
}

impl StageState for Config {
    fn merge_resolved(self, resolved: Self) -> Self {
        self.merge(resolved)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Init,
    Prompt,
    Validate,
    Apply,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Init, Stage::Prompt, Stage::Validate, Stage::Apply];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Init => "init",
            Stage::Prompt => "prompt",
            Stage::Validate => "validate",
            Stage::Apply => "apply",
        };
        f.write_str(name)
    }
}

/// Result of running a single stage through [`Module::run`]
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutput<S> {
    State(S),
    Issues(Vec<Issue>),
    Applied,
}

/// Inputs of a full pipeline run
#[derive(Debug, Clone)]
pub struct Execution<S> {
    pub initial_config: S,
    pub target_path: PathBuf,
    pub mode: Mode,
}

pub struct Module<S = Config> {
    name: Arc<str>,
    schema: Arc<Schema>,
    init: Option<StateFn<S>>,
    prompt: Option<StateFn<S>>,
    validate: Option<ValidateFn<S>>,
    apply: Option<ApplyFn<S>>,
    progress: Option<ProgressFn<S>>,
}

impl<S> Clone for Module<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            schema: self.schema.clone(),
            init: self.init.clone(),
            prompt: self.prompt.clone(),
            validate: self.validate.clone(),
            apply: self.apply.clone(),
            progress: self.progress.clone(),
        }
    }
}

impl<S> fmt::Debug for Module<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name)
            .field("schema", &self.schema)
            .field("init", &self.init.is_some())
            .field("prompt", &self.prompt.is_some())
            .field("validate", &self.validate.is_some())
            .field("apply", &self.apply.is_some())
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

impl<S: StageState> Module<S> {
    pub fn new(name: &str, schema: Schema) -> Self {
        Self {
            name: Arc::from(name),
            schema: Arc::new(schema),
            init: None,
            prompt: None,
            validate: None,
            apply: None,
            progress: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// A module is finalized once it has an apply stage
    pub fn is_finalized(&self) -> bool {
        self.apply.is_some()
    }

    pub fn with_init<F, Fut>(&self, f: F) -> Self
    where
        F: Fn(S, StageContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<S>> + Send + 'static,
    {
        let init: StateFn<S> = Arc::new(move |state: S, ctx: StageContext| -> BoxFuture<'static, Result<S>> {
            Box::pin(f(state, ctx))
        });
        Self {
            init: Some(init),
            ..self.clone()
        }
    }

    pub fn with_prompt<F, Fut>(&self, f: F) -> Self
    where
        F: Fn(S, StageContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<S>> + Send + 'static,
    {
        let prompt: StateFn<S> = Arc::new(move |state: S, ctx: StageContext| -> BoxFuture<'static, Result<S>> {
            Box::pin(f(state, ctx))
        });
        Self {
            prompt: Some(prompt),
            ..self.clone()
        }
    }

    pub fn with_validate<F, Fut>(&self, f: F) -> Self
    where
        F: Fn(S, StageContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<Issue>>> + Send + 'static,
    {
        let validate: ValidateFn<S> = Arc::new(
            move |state: S, ctx: StageContext| -> BoxFuture<'static, Result<Vec<Issue>>> {
                Box::pin(f(state, ctx))
            },
        );
        Self {
            validate: Some(validate),
            ..self.clone()
        }
    }

    pub fn with_apply<F, Fut>(&self, f: F) -> Self
    where
        F: Fn(S, StageContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let apply: ApplyFn<S> = Arc::new(move |state: S, ctx: StageContext| -> BoxFuture<'static, Result<()>> {
            Box::pin(f(state, ctx))
        });
        Self {
            apply: Some(apply),
            ..self.clone()
        }
    }

    pub fn with_progress<F>(&self, f: F) -> Self
    where
        F: Fn(&S) -> Option<ProgressMessages> + Send + Sync + 'static,
    {
        Self {
            progress: Some(Arc::new(f)),
            ..self.clone()
        }
    }

    pub async fn init(&self, state: S, ctx: &StageContext) -> Result<S> {
        debug!(module = %self.name, stage = %Stage::Init, "running stage");
        match &self.init {
            Some(init) => init(state, ctx.clone()).await,
            None => Ok(state),
        }
    }

    pub async fn prompt(&self, state: S, ctx: &StageContext) -> Result<S> {
        debug!(module = %self.name, stage = %Stage::Prompt, "running stage");
        match &self.prompt {
            Some(prompt) => prompt(state, ctx.clone()).await,
            None => Ok(state),
        }
    }

    /// Custom checks only; see [`Module::check`] for schema + custom
    pub async fn validate(&self, state: S, ctx: &StageContext) -> Result<Vec<Issue>> {
        debug!(module = %self.name, stage = %Stage::Validate, "running stage");
        match &self.validate {
            Some(validate) => validate(state, ctx.clone()).await,
            None => Ok(Vec::new()),
        }
    }

    /// Run the apply stage inside the module's progress reporting
    pub async fn apply(&self, state: S, ctx: &StageContext) -> Result<()> {
        let Some(apply) = &self.apply else {
            return Ok(());
        };
        debug!(module = %self.name, stage = %Stage::Apply, "running stage");
        let messages = self.progress.as_ref().and_then(|progress| progress(&state));
        run_with_progress(ctx.progress(), messages, apply(state, ctx.clone())).await
    }

    /// Execute exactly one stage
    pub async fn run(&self, stage: Stage, state: S, ctx: &StageContext) -> Result<StageOutput<S>> {
        Ok(match stage {
            Stage::Init => StageOutput::State(self.init(state, ctx).await?),
            Stage::Prompt => StageOutput::State(self.prompt(state, ctx).await?),
            Stage::Validate => StageOutput::Issues(self.validate(state, ctx).await?),
            Stage::Apply => {
                self.apply(state, ctx).await?;
                StageOutput::Applied
            }
        })
    }

    /// Schema issues followed by custom validation issues; both always run
    pub async fn check(&self, state: &S, ctx: &StageContext) -> Result<Vec<Issue>> {
        let mut issues = self.schema.issues_for(state);
        issues.extend(self.validate(state.clone(), ctx).await?);
        Ok(issues)
    }

    /// Run the whole pipeline against a target directory and return the final state
    pub async fn execute(&self, execution: Execution<S>, services: Services) -> Result<S> {
        let Execution {
            initial_config,
            target_path,
            mode,
        } = execution;

        let target = std::path::absolute(&target_path)
            .map_err(|e| ScaffoldError::io("resolve", &target_path, e))?;
        check_target(&target, mode).await?;

        let supplied = self.schema.partial().issues_for(&initial_config);
        if !supplied.is_empty() {
            return Err(ScaffoldError::Validation(supplied));
        }

        let ctx = StageContext::new(target.clone(), mode, services);

        let resolved = self.init(initial_config.clone(), &ctx).await?;
        let state = initial_config.merge_resolved(resolved);
        let resolved = self.prompt(state.clone(), &ctx).await?;
        let state = state.merge_resolved(resolved);

        let issues = self.check(&state, &ctx).await?;
        if !issues.is_empty() {
            warn!(module = %self.name, count = issues.len(), "validation failed, nothing applied");
            return Err(ScaffoldError::Validation(issues));
        }

        if mode == Mode::NewProject {
            fs::create_dir_all(&target)
                .await
                .map_err(|e| ScaffoldError::io("create directory", &target, e))?;
        }

        self.apply(state.clone(), &ctx).await?;
        Ok(state)
    }
}

async fn check_target(target: &Path, mode: Mode) -> Result<()> {
    let exists = fs::try_exists(target)
        .await
        .map_err(|e| ScaffoldError::io("inspect", target, e))?;

    match mode {
        Mode::NewProject if exists && !is_empty_dir(target).await? => {
            Err(PreconditionError::TargetNotEmpty(target.to_path_buf()).into())
        }
        Mode::Update if !exists => Err(PreconditionError::TargetMissing(target.to_path_buf()).into()),
        _ => Ok(()),
    }
}

/// False for non-directories
pub(crate) async fn is_empty_dir(path: &Path) -> Result<bool> {
    let metadata = fs::metadata(path)
        .await
        .map_err(|e| ScaffoldError::io("inspect", path, e))?;
    if !metadata.is_dir() {
        return Ok(false);
    }
    let mut entries = fs::read_dir(path)
        .await
        .map_err(|e| ScaffoldError::io("read directory", path, e))?;
    let first = entries
        .next_entry()
        .await
        .map_err(|e| ScaffoldError::io("read directory", path, e))?;
    Ok(first.is_none())
}
