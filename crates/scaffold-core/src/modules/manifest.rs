//! Reading and writing the target's `package.json`

use crate::error::{Result, ScaffoldError};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::fs;

pub const MANIFEST_FILE: &str = "package.json";

pub type Manifest = Map<String, Value>;

pub fn manifest_path(target: &Path) -> PathBuf {
    target.join(MANIFEST_FILE)
}

pub async fn manifest_exists(target: &Path) -> Result<bool> {
    let path = manifest_path(target);
    fs::try_exists(&path)
        .await
        .map_err(|e| ScaffoldError::io("inspect", path, e))
}

pub async fn read_manifest(target: &Path) -> Result<Manifest> {
    let path = manifest_path(target);
    if !manifest_exists(target).await? {
        return Err(ScaffoldError::FileMissing(path));
    }
    let content = fs::read_to_string(&path)
        .await
        .map_err(|e| ScaffoldError::io("read", &path, e))?;
    serde_json::from_str(&content).map_err(|source| ScaffoldError::Json { path, source })
}

/// Pretty-printed with two-space indentation and a trailing newline
pub async fn write_manifest(target: &Path, manifest: &Manifest) -> Result<()> {
    let path = manifest_path(target);
    let mut content =
        serde_json::to_string_pretty(manifest).map_err(|source| ScaffoldError::Json {
            path: path.clone(),
            source,
        })?;
    content.push('\n');
    fs::write(&path, content)
        .await
        .map_err(|e| ScaffoldError::io("write", path, e))
}

/// Read, modify and write back the manifest
pub async fn update_manifest<F>(target: &Path, update: F) -> Result<()>
where
    F: FnOnce(&mut Manifest),
{
    let mut manifest = read_manifest(target).await?;
    update(&mut manifest);
    write_manifest(target, &manifest).await
}

/// Merge name -> value pairs into a section; new values win, other entries stay
pub fn merge_section<I>(manifest: &mut Manifest, section: &str, entries: I)
where
    I: IntoIterator<Item = (String, String)>,
{
    let slot = manifest
        .entry(section)
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    if let Value::Object(map) = slot {
        for (name, value) in entries {
            map.insert(name, Value::String(value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manifest(value: Value) -> Manifest {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_merge_section_new_values_win() {
        let mut m = manifest(json!({"name": "app", "scripts": {"a": "x", "keep": "k"}}));
        merge_section(
            &mut m,
            "scripts",
            [("a".to_string(), "y".to_string()), ("b".to_string(), "z".to_string())],
        );
        assert_eq!(
            Value::Object(m),
            json!({"name": "app", "scripts": {"a": "y", "keep": "k", "b": "z"}})
        );
    }

    #[test]
    fn test_merge_section_creates_missing_section() {
        let mut m = manifest(json!({"name": "app"}));
        merge_section(&mut m, "dependencies", [("react".to_string(), "^18".to_string())]);
        assert_eq!(m["dependencies"], json!({"react": "^18"}));
    }

    #[tokio::test]
    async fn test_round_trip_keeps_key_order() {
        let dir = tempfile::tempdir().unwrap();
        let m = manifest(json!({"name": "app", "version": "0.0.0", "private": true}));
        write_manifest(dir.path(), &m).await.unwrap();

        let text = std::fs::read_to_string(manifest_path(dir.path())).unwrap();
        assert!(text.starts_with("{\n  \"name\": \"app\",\n  \"version\""));
        assert!(text.ends_with("}\n"));
        assert_eq!(read_manifest(dir.path()).await.unwrap(), m);
    }

    #[tokio::test]
    async fn test_missing_and_malformed_manifest() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_manifest(dir.path()).await.unwrap_err(),
            ScaffoldError::FileMissing(_)
        ));

        std::fs::write(manifest_path(dir.path()), "{not json").unwrap();
        assert!(matches!(
            read_manifest(dir.path()).await.unwrap_err(),
            ScaffoldError::Json { .. }
        ));
    }
}
