//! Merge scripts into an existing `package.json`

use super::manifest::{merge_section, update_manifest};
use super::list_field;
use crate::config::Config;
use crate::error::Result;
use crate::module::{Module, StageContext};
use crate::schema::{Field, FieldType, Schema};
use serde::{Deserialize, Serialize};

pub const SCRIPTS: &str = "scripts";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    pub name: String,
    pub script: String,
}

impl Script {
    pub fn new(name: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: script.into(),
        }
    }
}

pub fn schema() -> Result<Schema> {
    let entry = Schema::new([
        Field::required("name", FieldType::String),
        Field::required("script", FieldType::String),
    ])?;
    Schema::new([Field::optional(SCRIPTS, FieldType::list_of(FieldType::Record(entry)))])
}

pub fn module() -> Result<Module> {
    Ok(Module::new("add-scripts", schema()?).with_apply(apply))
}

async fn apply(state: Config, ctx: StageContext) -> Result<()> {
    let scripts: Vec<Script> = list_field(&state, SCRIPTS)?;
    if scripts.is_empty() {
        return Ok(());
    }
    update_manifest(ctx.target_path(), |manifest| {
        merge_section(manifest, SCRIPTS, scripts.into_iter().map(|s| (s.name, s.script)));
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{Mode, Services};
    use crate::modules::manifest::{read_manifest, write_manifest};
    use serde_json::json;

    #[tokio::test]
    async fn test_later_scripts_win() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = StageContext::new(dir.path(), Mode::Update, Services::new(dir.path()));
        write_manifest(dir.path(), json!({"name": "app"}).as_object().unwrap())
            .await
            .unwrap();
        let module = module().unwrap();

        module
            .apply(Config::new().with(SCRIPTS, json!([{"name": "a", "script": "x"}])), &ctx)
            .await
            .unwrap();
        module
            .apply(
                Config::new().with(
                    SCRIPTS,
                    json!([{"name": "a", "script": "y"}, {"name": "b", "script": "z"}]),
                ),
                &ctx,
            )
            .await
            .unwrap();

        let manifest = read_manifest(dir.path()).await.unwrap();
        assert_eq!(manifest[SCRIPTS], json!({"a": "y", "b": "z"}));
    }

    #[test]
    fn test_script_entries_need_both_fields() {
        let issues = schema().unwrap().issues_for(&json!({"scripts": [{"name": "dev"}]}));
        assert_eq!(issues[0].to_string(), "scripts.0.script: Required");
    }
}
