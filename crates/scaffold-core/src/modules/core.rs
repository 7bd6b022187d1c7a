//! The base of every template
//!
//! Owns the shared project files (`templates/core`) and composes the
//! primitive modules. Children run in a fixed order per stage:
//!
//! | stage    | order                                                        |
//! |----------|--------------------------------------------------------------|
//! | init     | defaults, package.json, package manager, ide, git            |
//! | prompt   | ide, package manager, git, package.json                      |
//! | validate | core file conflicts, package.json, ide, package manager, git |
//! | apply    | core files, package.json, ide, git, package manager          |

use super::add_dependencies::{DEPENDENCIES, DEV_DEPENDENCIES};
use super::add_scripts::SCRIPTS;
use super::{
    apply_in_order, copy_module_template, git, ide, package_json, package_manager, resolve_in_order,
    template_conflicts, validate_in_order,
};
use crate::config::Config;
use crate::error::Result;
use crate::module::{Module, Stage, StageContext};
use crate::schema::Schema;
use serde_json::{Map, Value};
use std::sync::Arc;

pub const TEMPLATE_DIR: &str = "core";

const DEFAULT_DEPENDENCIES: [(&str, &str); 5] = [
    ("@tanstack/react-router", "^1.58.3"),
    ("@tanstack/start", "^1.58.3"),
    ("react", "^18.3.1"),
    ("react-dom", "^18.3.1"),
    ("vinxi", "0.4.3"),
];

const DEFAULT_DEV_DEPENDENCIES: [(&str, &str); 3] = [
    ("@types/react", "^18.3.5"),
    ("@types/react-dom", "^18.3.0"),
    ("typescript", "^5.6.2"),
];

const DEFAULT_SCRIPTS: [(&str, &str); 3] = [
    ("dev", "vinxi dev"),
    ("build", "vinxi build"),
    ("start", "vinxi start"),
];

struct Children {
    package_json: Module,
    ide: Module,
    package_manager: Module,
    git: Module,
}

pub fn schema() -> Result<Schema> {
    package_json::schema()?
        .merge(&ide::schema()?)?
        .merge(&package_manager::schema()?)?
        .merge(&git::schema()?)
}

pub fn module() -> Result<Module> {
    let children = Arc::new(Children {
        package_json: package_json::module()?,
        ide: ide::module()?,
        package_manager: package_manager::module()?,
        git: git::module()?,
    });
    let (for_init, for_prompt, for_validate, for_apply) =
        (children.clone(), children.clone(), children.clone(), children);

    Ok(Module::new("core", schema()?)
        .with_init(move |state: Config, ctx: StageContext| {
            let c = for_init.clone();
            async move {
                let order = [&c.package_json, &c.package_manager, &c.ide, &c.git];
                resolve_in_order(Stage::Init, &order, with_defaults(state), &ctx).await
            }
        })
        .with_prompt(move |state: Config, ctx: StageContext| {
            let c = for_prompt.clone();
            async move {
                let order = [&c.ide, &c.package_manager, &c.git, &c.package_json];
                resolve_in_order(Stage::Prompt, &order, state, &ctx).await
            }
        })
        .with_validate(move |state: Config, ctx: StageContext| {
            let c = for_validate.clone();
            async move {
                let mut issues = template_conflicts(TEMPLATE_DIR, &ctx).await?;
                let order = [&c.package_json, &c.ide, &c.package_manager, &c.git];
                issues.extend(validate_in_order(&order, &state, &ctx).await?);
                Ok(issues)
            }
        })
        .with_apply(move |state: Config, ctx: StageContext| {
            let c = for_apply.clone();
            async move {
                copy_module_template(TEMPLATE_DIR, &ctx).await?;
                let order = [&c.package_json, &c.ide, &c.git, &c.package_manager];
                apply_in_order(&order, &state, &ctx).await
            }
        }))
}

/// Default manifest contents; anything the caller supplied wins
pub fn with_defaults(state: Config) -> Config {
    let mut state = state;
    state.set_default(DEPENDENCIES, entries(&DEFAULT_DEPENDENCIES, "version"));
    state.set_default(DEV_DEPENDENCIES, entries(&DEFAULT_DEV_DEPENDENCIES, "version"));
    state.set_default(SCRIPTS, entries(&DEFAULT_SCRIPTS, "script"));
    state
}

fn entries(pairs: &[(&str, &str)], value_key: &str) -> Value {
    pairs
        .iter()
        .map(|(name, value)| {
            let mut entry = Map::new();
            entry.insert("name".to_string(), Value::from(*name));
            entry.insert(value_key.to_string(), Value::from(*value));
            Value::Object(entry)
        })
        .collect()
}
