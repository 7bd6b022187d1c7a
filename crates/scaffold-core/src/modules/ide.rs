//! Editor choice; VS Code gets workspace settings

use super::vscode;
use crate::config::{Config, Ide};
use crate::error::Result;
use crate::module::{Module, ProgressMessages, StageContext};
use crate::prompt::{Choice, Question};
use crate::schema::{Field, FieldType, Schema};
use std::sync::Arc;

pub const IDE: &str = "ide";
pub const DEFAULT_IDE: Ide = Ide::Vscode;

pub fn schema() -> Result<Schema> {
    Schema::new([Field::required(
        IDE,
        FieldType::one_of(Ide::ALL.iter().map(Ide::as_str)),
    )])
}

fn selected(state: &Config) -> Option<Ide> {
    state.str(IDE).and_then(Ide::parse)
}

pub fn module() -> Result<Module> {
    let vscode = Arc::new(vscode::module()?);
    let vscode_apply = vscode.clone();

    Ok(Module::new("ide", schema()?)
        .with_prompt(prompt)
        .with_validate(move |state: Config, ctx: StageContext| {
            let vscode = vscode.clone();
            async move {
                match selected(&state) {
                    Some(Ide::Vscode) => vscode.validate(state, &ctx).await,
                    _ => Ok(Vec::new()),
                }
            }
        })
        .with_apply(move |state: Config, ctx: StageContext| {
            let vscode = vscode_apply.clone();
            async move {
                match selected(&state) {
                    Some(Ide::Vscode) => vscode.apply(state, &ctx).await,
                    _ => Ok(()),
                }
            }
        })
        .with_progress(|state| match selected(state) {
            Some(ide @ Ide::Vscode) => Some(ProgressMessages::new(
                format!("Setting up {}", ide),
                format!("{} set up", ide),
                format!("Failed to set up {}", ide),
            )),
            _ => None,
        }))
}

async fn prompt(state: Config, ctx: StageContext) -> Result<Config> {
    if state.contains(IDE) {
        return Ok(state);
    }
    let question = Question::select(
        "Select an IDE",
        Ide::ALL.iter().map(|ide| Choice::new(ide.as_str())).collect(),
    )
    .default_answer(DEFAULT_IDE.as_str());

    let ide = ctx.prompter().text(&question)?;
    Ok(state.with(IDE, ide))
}
