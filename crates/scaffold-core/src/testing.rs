//! Test doubles for the prompt, process and progress seams
//!
//! Enabled by the `test-support` feature so downstream crates can drive
//! modules without a terminal or real child processes.

use crate::error::{Result, ScaffoldError};
use crate::module::{ProgressSink, ProgressTask};
use crate::prompt::{Answer, Prompter, Question};
use crate::runtime::{ProcessCommand, ProcessRunner};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Answers keyed by question message; unknown questions take their default
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: HashMap<String, Answer>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, message: impl Into<String>, answer: Answer) -> Self {
        self.answers.insert(message.into(), answer);
        self
    }

    pub fn with_text(self, message: impl Into<String>, text: impl Into<String>) -> Self {
        self.answer(message, Answer::Text(text.into()))
    }

    pub fn with_flag(self, message: impl Into<String>, flag: bool) -> Self {
        self.answer(message, Answer::Flag(flag))
    }

    /// Messages of every question asked so far, in order
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().map(|a| a.clone()).unwrap_or_default()
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&self, question: &Question) -> Result<Answer> {
        if let Ok(mut asked) = self.asked.lock() {
            asked.push(question.message().to_string());
        }

        let answer = self
            .answers
            .get(question.message())
            .cloned()
            .or_else(|| question.default_value())
            .ok_or_else(|| ScaffoldError::NonInteractive(question.message().to_string()))?;

        if let (Question::Input { check: Some(check), .. }, Answer::Text(text)) = (question, &answer) {
            check(text).map_err(|reason| {
                ScaffoldError::NonInteractive(format!("{}: {}", question.message(), reason))
            })?;
        }
        Ok(answer)
    }
}

/// Records commands instead of running them
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<ProcessCommand>>,
    exit_code: Option<i32>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every command fails with the given exit code
    pub fn failing(code: i32) -> Self {
        Self {
            exit_code: Some(code),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<ProcessCommand> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ProcessRunner for RecordingRunner {
    async fn run(&self, command: &ProcessCommand) -> Result<()> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(command.clone());
        }
        match self.exit_code {
            None => Ok(()),
            Some(code) => Err(ScaffoldError::ExternalProcessFailed {
                command: command.to_string(),
                code: Some(code),
                stdout: String::new(),
                stderr: "recorded failure".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Started(String),
    Succeeded(String),
    Failed(String),
}

/// Sink that records spinner events
#[derive(Debug, Default)]
pub struct RecordingProgress {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

struct RecordingTask {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl RecordingTask {
    fn push(&self, event: ProgressEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl ProgressTask for RecordingTask {
    fn success(self: Box<Self>, message: &str) {
        self.push(ProgressEvent::Succeeded(message.to_string()));
    }

    fn error(self: Box<Self>, message: &str) {
        self.push(ProgressEvent::Failed(message.to_string()));
    }
}

impl ProgressSink for RecordingProgress {
    fn start(&self, message: &str) -> Box<dyn ProgressTask> {
        let task = RecordingTask {
            events: self.events.clone(),
        };
        task.push(ProgressEvent::Started(message.to_string()));
        Box::new(task)
    }
}
