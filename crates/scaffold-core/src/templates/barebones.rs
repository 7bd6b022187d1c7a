//! Minimal TanStack Start application on top of `core`

use crate::config::Config;
use crate::error::Result;
use crate::module::{Module, StageContext};
use crate::modules::{self, copy_module_template, template_conflicts};
use std::sync::Arc;

pub const ID: &str = "barebones";

pub fn module() -> Result<Module> {
    let base = Arc::new(modules::core::module()?);
    let (for_init, for_prompt, for_validate, for_apply) =
        (base.clone(), base.clone(), base.clone(), base.clone());

    Ok(Module::new(ID, base.schema().clone())
        .with_init(move |state: Config, ctx: StageContext| {
            let base = for_init.clone();
            async move { base.init(state, &ctx).await }
        })
        .with_prompt(move |state: Config, ctx: StageContext| {
            let base = for_prompt.clone();
            async move { base.prompt(state, &ctx).await }
        })
        .with_validate(move |state: Config, ctx: StageContext| {
            let base = for_validate.clone();
            async move {
                let mut issues = template_conflicts(ID, &ctx).await?;
                issues.extend(base.validate(state, &ctx).await?);
                Ok(issues)
            }
        })
        .with_apply(move |state: Config, ctx: StageContext| {
            let base = for_apply.clone();
            async move {
                copy_module_template(ID, &ctx).await?;
                base.apply(state, &ctx).await
            }
        }))
}
