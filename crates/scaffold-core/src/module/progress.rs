//! Progress reporting around apply stages

use crate::error::Result;
use std::future::Future;

/// Messages shown while an apply stage runs and after it finishes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressMessages {
    pub in_progress: String,
    pub success: String,
    pub error: String,
}

impl ProgressMessages {
    pub fn new(
        in_progress: impl Into<String>,
        success: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            in_progress: in_progress.into(),
            success: success.into(),
            error: error.into(),
        }
    }
}

/// A running progress indicator
pub trait ProgressTask: Send {
    fn success(self: Box<Self>, message: &str);
    fn error(self: Box<Self>, message: &str);
}

/// Where progress indicators are drawn (a spinner in the TUI)
pub trait ProgressSink: Send + Sync {
    fn start(&self, message: &str) -> Box<dyn ProgressTask>;
}

/// Sink that draws nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

struct SilentTask;

impl ProgressTask for SilentTask {
    fn success(self: Box<Self>, _message: &str) {}
    fn error(self: Box<Self>, _message: &str) {}
}

impl ProgressSink for SilentProgress {
    fn start(&self, _message: &str) -> Box<dyn ProgressTask> {
        Box::new(SilentTask)
    }
}

/// Run `work`, reporting through `sink` when `messages` is set.
/// Failures are reported and then returned unchanged.
pub async fn run_with_progress<T, F>(
    sink: &dyn ProgressSink,
    messages: Option<ProgressMessages>,
    work: F,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let Some(messages) = messages else {
        return work.await;
    };

    let task = sink.start(&messages.in_progress);
    match work.await {
        Ok(value) => {
            task.success(&messages.success);
            Ok(value)
        }
        Err(e) => {
            task.error(&messages.error);
            Err(e)
        }
    }
}
