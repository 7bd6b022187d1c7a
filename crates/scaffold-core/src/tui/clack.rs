//! cliclack implementations of the prompt and progress seams

use crate::error::{Result, ScaffoldError};
use crate::module::{ProgressSink, ProgressTask};
use crate::prompt::{Answer, Prompter, Question};

/// Asks every question inline in the terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct ClackPrompter;

impl Prompter for ClackPrompter {
    fn ask(&self, question: &Question) -> Result<Answer> {
        let answer = match question {
            Question::Input {
                message,
                default,
                check,
            } => {
                let mut input = cliclack::input(message);
                if let Some(default) = default {
                    input = input.placeholder(default).default_input(default);
                }
                if let Some(check) = check.clone() {
                    input = input.validate(move |value: &String| check(value));
                }
                Answer::Text(input.interact().map_err(ScaffoldError::Prompt)?)
            }
            Question::Select {
                message,
                choices,
                default,
            } => {
                let mut select = cliclack::select(message);
                for choice in choices {
                    select = select.item(choice.value.clone(), &choice.label, &choice.hint);
                }
                if let Some(default) = default {
                    select = select.initial_value(default.clone());
                }
                Answer::Text(select.interact().map_err(ScaffoldError::Prompt)?)
            }
            Question::Confirm { message, default } => Answer::Flag(
                cliclack::confirm(message)
                    .initial_value(*default)
                    .interact()
                    .map_err(ScaffoldError::Prompt)?,
            ),
        };
        Ok(answer)
    }
}

/// Draws a cliclack spinner per apply stage
#[derive(Debug, Clone, Copy, Default)]
pub struct ClackProgress;

struct SpinnerTask(cliclack::ProgressBar);

impl ProgressTask for SpinnerTask {
    fn success(self: Box<Self>, message: &str) {
        self.0.stop(message);
    }

    fn error(self: Box<Self>, message: &str) {
        self.0.error(message);
    }
}

impl ProgressSink for ClackProgress {
    fn start(&self, message: &str) -> Box<dyn ProgressTask> {
        let spinner = cliclack::spinner();
        spinner.start(message);
        Box::new(SpinnerTask(spinner))
    }
}
