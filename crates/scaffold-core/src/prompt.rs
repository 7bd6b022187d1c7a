//! The interactive-input seam used by prompt stages
//!
//! Prompt stages never talk to a terminal directly. They hand a [`Question`]
//! to a [`Prompter`], which the TUI implements with cliclack and tests
//! implement with scripted answers.

use crate::error::{Result, ScaffoldError};
use std::fmt;
use std::sync::Arc;

/// Validation callback for free-text answers
pub type InputCheck = Arc<dyn Fn(&str) -> std::result::Result<(), String> + Send + Sync>;

/// One selectable option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: String,
    pub label: String,
    pub hint: String,
}

impl Choice {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
            hint: String::new(),
        }
    }

    pub fn labelled(value: impl Into<String>, label: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            hint: hint.into(),
        }
    }
}

#[derive(Clone)]
pub enum Question {
    Input {
        message: String,
        default: Option<String>,
        check: Option<InputCheck>,
    },
    Select {
        message: String,
        choices: Vec<Choice>,
        default: Option<String>,
    },
    Confirm {
        message: String,
        default: bool,
    },
}

impl Question {
    pub fn input(message: impl Into<String>) -> Self {
        Question::Input {
            message: message.into(),
            default: None,
            check: None,
        }
    }

    pub fn select(message: impl Into<String>, choices: Vec<Choice>) -> Self {
        Question::Select {
            message: message.into(),
            choices,
            default: None,
        }
    }

    pub fn confirm(message: impl Into<String>, default: bool) -> Self {
        Question::Confirm {
            message: message.into(),
            default,
        }
    }

    /// Set the pre-filled answer of an input or select question
    pub fn default_answer(self, value: impl Into<String>) -> Self {
        match self {
            Question::Input { message, check, .. } => Question::Input {
                message,
                default: Some(value.into()),
                check,
            },
            Question::Select {
                message, choices, ..
            } => Question::Select {
                message,
                choices,
                default: Some(value.into()),
            },
            confirm => confirm,
        }
    }

    /// Reject free-text answers the callback refuses
    pub fn check<F>(self, f: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<(), String> + Send + Sync + 'static,
    {
        match self {
            Question::Input {
                message, default, ..
            } => Question::Input {
                message,
                default,
                check: Some(Arc::new(f)),
            },
            other => other,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Question::Input { message, .. }
            | Question::Select { message, .. }
            | Question::Confirm { message, .. } => message,
        }
    }

    /// The answer a non-interactive run would pick
    pub fn default_value(&self) -> Option<Answer> {
        match self {
            Question::Input { default, .. } => default.clone().map(Answer::Text),
            Question::Select {
                default, choices, ..
            } => default
                .clone()
                .or_else(|| choices.first().map(|c| c.value.clone()))
                .map(Answer::Text),
            Question::Confirm { default, .. } => Some(Answer::Flag(*default)),
        }
    }
}

impl fmt::Debug for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Question::Input {
                message, default, ..
            } => f
                .debug_struct("Input")
                .field("message", message)
                .field("default", default)
                .finish(),
            Question::Select {
                message,
                choices,
                default,
            } => f
                .debug_struct("Select")
                .field("message", message)
                .field("choices", choices)
                .field("default", default)
                .finish(),
            Question::Confirm { message, default } => f
                .debug_struct("Confirm")
                .field("message", message)
                .field("default", default)
                .finish(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Text(String),
    Flag(bool),
}

/// Source of interactive answers
pub trait Prompter: Send + Sync {
    fn ask(&self, question: &Question) -> Result<Answer>;

    fn text(&self, question: &Question) -> Result<String> {
        match self.ask(question)? {
            Answer::Text(text) => Ok(text),
            Answer::Flag(flag) => Ok(flag.to_string()),
        }
    }

    fn flag(&self, question: &Question) -> Result<bool> {
        match self.ask(question)? {
            Answer::Flag(flag) => Ok(flag),
            Answer::Text(text) => Err(ScaffoldError::NonInteractive(format!(
                "{} (expected yes/no, got '{}')",
                question.message(),
                text
            ))),
        }
    }
}

/// Prompter for runs without a terminal: every question is an error
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrompter;

impl Prompter for NoPrompter {
    fn ask(&self, question: &Question) -> Result<Answer> {
        Err(ScaffoldError::NonInteractive(question.message().to_string()))
    }
}

/// Prompter that accepts every default without asking (`--yes` style runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultsPrompter;

impl Prompter for DefaultsPrompter {
    fn ask(&self, question: &Question) -> Result<Answer> {
        question
            .default_value()
            .ok_or_else(|| ScaffoldError::NonInteractive(question.message().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_defaults_to_first_choice() {
        let q = Question::select("Pick", vec![Choice::new("a"), Choice::new("b")]);
        assert_eq!(q.default_value(), Some(Answer::Text("a".into())));
        let q = q.default_answer("b");
        assert_eq!(q.default_value(), Some(Answer::Text("b".into())));
    }

    #[test]
    fn test_no_prompter_refuses() {
        let err = NoPrompter.ask(&Question::confirm("Initialize git", true)).unwrap_err();
        assert!(err.to_string().contains("Initialize git"));
    }

    #[test]
    fn test_defaults_prompter_uses_defaults() {
        assert!(DefaultsPrompter.flag(&Question::confirm("Install", true)).unwrap());
        assert!(DefaultsPrompter.text(&Question::input("Name")).is_err());
        assert_eq!(
            DefaultsPrompter
                .text(&Question::input("Name").default_answer("app"))
                .unwrap(),
            "app"
        );
    }

    #[test]
    fn test_check_only_applies_to_input() {
        let q = Question::confirm("ok?", false).check(|_| Err("never".into()));
        assert!(matches!(q, Question::Confirm { .. }));
    }
}
