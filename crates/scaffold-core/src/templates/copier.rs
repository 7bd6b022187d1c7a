//! Copying template trees into the target directory
//!
//! Every module that owns files keeps them under `<template root>/<module>/`.
//! [`TemplateFiles`] is scoped to one such directory and one target, and never
//! overwrites a file unless asked to: conflicts are detected for the whole
//! batch before the first write.

use crate::error::{Result, ScaffoldError};
use crate::templates::pattern::Pattern;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use walkdir::WalkDir;

/// First-line marker removed from copied text files
pub const SUPPRESSION_MARKER: &str = "// @ts-nocheck";

/// Segment prefix standing in for a leading `.` in template trees
pub const DOT_PREFIX: &str = "_dot_";

/// What a copy pattern may select
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchKind {
    /// Files and directories; a matched directory brings its whole subtree
    #[default]
    Any,
    FilesOnly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyRequest {
    pub pattern: String,
    pub template_subdir: String,
    pub target_subdir: String,
    pub overwrite: bool,
    pub kind: MatchKind,
}

impl CopyRequest {
    pub fn new(pattern: impl Into<String>, template_subdir: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            template_subdir: template_subdir.into(),
            target_subdir: String::new(),
            overwrite: false,
            kind: MatchKind::Any,
        }
    }

    pub fn into_subdir(mut self, target_subdir: impl Into<String>) -> Self {
        self.target_subdir = target_subdir.into();
        self
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn files_only(mut self) -> Self {
        self.kind = MatchKind::FilesOnly;
        self
    }
}

/// A template entry selected for copying
#[derive(Debug)]
struct Planned {
    source: PathBuf,
    /// Destination path relative to the target directory
    destination: String,
    is_dir: bool,
}

#[derive(Debug, Clone)]
pub struct TemplateFiles {
    module_dir: PathBuf,
    target_dir: PathBuf,
}

impl TemplateFiles {
    pub fn new(module_dir: impl Into<PathBuf>, target_dir: impl Into<PathBuf>) -> Self {
        Self {
            module_dir: module_dir.into(),
            target_dir: target_dir.into(),
        }
    }

    pub fn module_dir(&self) -> &Path {
        &self.module_dir
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    pub fn target_path(&self, relative: &str) -> PathBuf {
        self.target_dir.join(relative)
    }

    pub async fn target_file_exists(&self, relative: &str) -> Result<bool> {
        let path = self.target_path(relative);
        fs::try_exists(&path)
            .await
            .map_err(|e| ScaffoldError::io("inspect", path, e))
    }

    pub async fn read_target_file(&self, relative: &str) -> Result<String> {
        let path = self.target_path(relative);
        if !self.target_file_exists(relative).await? {
            return Err(ScaffoldError::FileMissing(path));
        }
        fs::read_to_string(&path)
            .await
            .map_err(|e| ScaffoldError::io("read", path, e))
    }

    pub async fn write_target_file(&self, relative: &str, content: &str, overwrite: bool) -> Result<()> {
        if !overwrite && self.target_file_exists(relative).await? {
            return Err(ScaffoldError::OverwriteRefused(vec![relative.to_string()]));
        }
        let path = self.target_path(relative);
        create_parent(&path).await?;
        fs::write(&path, content)
            .await
            .map_err(|e| ScaffoldError::io("write", path, e))
    }

    /// Destination paths a copy of `pattern` from `template_subdir` would clobber
    pub async fn files_that_would_be_overwritten(
        &self,
        pattern: &str,
        template_subdir: &str,
    ) -> Result<Vec<String>> {
        self.conflicts(&CopyRequest::new(pattern, template_subdir)).await
    }

    /// Copy the matched entries and return the destination paths of the files written
    pub async fn copy_template_files(&self, request: CopyRequest) -> Result<Vec<String>> {
        let planned = self.plan(&request)?;

        if !request.overwrite {
            let conflicts = self.existing(&planned).await?;
            if !conflicts.is_empty() {
                return Err(ScaffoldError::OverwriteRefused(conflicts));
            }
        }

        let mut written = Vec::new();
        for entry in planned {
            let destination = self.target_path(&entry.destination);
            if entry.is_dir {
                fs::create_dir_all(&destination)
                    .await
                    .map_err(|e| ScaffoldError::io("create directory", &destination, e))?;
                continue;
            }

            create_parent(&destination).await?;
            let bytes = fs::read(&entry.source)
                .await
                .map_err(|e| ScaffoldError::io("read", &entry.source, e))?;
            fs::write(&destination, strip_suppression_header(bytes))
                .await
                .map_err(|e| ScaffoldError::io("write", &destination, e))?;

            debug!(from = %entry.source.display(), to = %entry.destination, "copied template file");
            written.push(entry.destination);
        }

        Ok(written)
    }

    async fn conflicts(&self, request: &CopyRequest) -> Result<Vec<String>> {
        let planned = self.plan(request)?;
        self.existing(&planned).await
    }

    /// Planned files that already exist, and planned directories blocked by a non-directory
    async fn existing(&self, planned: &[Planned]) -> Result<Vec<String>> {
        let mut found = Vec::new();
        for entry in planned {
            if !self.target_file_exists(&entry.destination).await? {
                continue;
            }
            let blocked = if entry.is_dir {
                let path = self.target_path(&entry.destination);
                let metadata = fs::metadata(&path)
                    .await
                    .map_err(|e| ScaffoldError::io("inspect", &path, e))?;
                !metadata.is_dir()
            } else {
                true
            };
            if blocked {
                found.push(entry.destination.clone());
            }
        }
        Ok(found)
    }

    fn plan(&self, request: &CopyRequest) -> Result<Vec<Planned>> {
        let root = self.module_dir.join(&request.template_subdir);
        if !root.is_dir() {
            return Err(ScaffoldError::TemplateDirMissing(root));
        }

        let pattern = Pattern::new(&request.pattern)?;
        let mut matched_dirs: Vec<String> = Vec::new();
        let mut planned = Vec::new();

        for entry in WalkDir::new(&root).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| ScaffoldError::io("walk", &root, e.into()))?;
            let Ok(relative) = entry.path().strip_prefix(&root) else {
                continue;
            };
            let relative = to_slash(relative);
            let is_dir = entry.file_type().is_dir();

            let inherited = matched_dirs
                .iter()
                .any(|dir| relative.starts_with(&format!("{}/", dir)));
            let selected = match request.kind {
                MatchKind::Any => inherited || pattern.matches(&relative),
                MatchKind::FilesOnly => !is_dir && pattern.matches(&relative),
            };
            if !selected {
                continue;
            }
            if is_dir {
                matched_dirs.push(relative.clone());
            }

            planned.push(Planned {
                source: entry.path().to_path_buf(),
                destination: join_relative(&request.target_subdir, &rewrite_dot_prefix(&relative)),
                is_dir,
            });
        }

        Ok(planned)
    }
}

async fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) => fs::create_dir_all(parent)
            .await
            .map_err(|e| ScaffoldError::io("create directory", parent, e)),
        None => Ok(()),
    }
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn join_relative(base: &str, relative: &str) -> String {
    base.split('/')
        .chain(relative.split('/'))
        .filter(|s| !s.is_empty() && *s != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// `_dot_vscode/settings.json` -> `.vscode/settings.json`
pub fn rewrite_dot_prefix(relative: &str) -> String {
    relative
        .split('/')
        .map(|segment| match segment.strip_prefix(DOT_PREFIX) {
            Some(rest) => format!(".{}", rest),
            None => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Drop a leading [`SUPPRESSION_MARKER`] line; non-UTF-8 content is returned as is
pub fn strip_suppression_header(bytes: Vec<u8>) -> Vec<u8> {
    match String::from_utf8(bytes) {
        Ok(text) => {
            let (first, rest) = text.split_once('\n').unwrap_or((text.as_str(), ""));
            if first.trim() == SUPPRESSION_MARKER {
                return rest.trim_start().as_bytes().to_vec();
            }
            text.into_bytes()
        }
        Err(e) => e.into_bytes(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &[u8]) {
        let path = root.join(relative);
        stdfs::create_dir_all(path.parent().unwrap()).unwrap();
        stdfs::write(path, content).unwrap();
    }

    /// `<tmp>/module/template/...` and an empty `<tmp>/target`
    fn fixture() -> (TempDir, TemplateFiles) {
        let tmp = tempfile::tempdir().unwrap();
        let template = tmp.path().join("module").join("template");
        write(&template, "_dot_vscode/settings.json", b"{}");
        write(&template, "app/client.tsx", b"// @ts-nocheck\n\nexport {}\n");
        write(&template, "app/routes/index.tsx", b"export const a = 1;\n// @ts-nocheck\n");
        write(&template, "tsconfig.json", b"{\"strict\": true}");
        stdfs::create_dir_all(template.join("public")).unwrap();
        stdfs::create_dir_all(tmp.path().join("target")).unwrap();

        let files = TemplateFiles::new(tmp.path().join("module"), tmp.path().join("target"));
        (tmp, files)
    }

    #[tokio::test]
    async fn test_copy_everything() {
        let (_tmp, files) = fixture();

        let written = files
            .copy_template_files(CopyRequest::new("**/*", "template"))
            .await
            .unwrap();

        assert_eq!(
            written,
            vec![
                ".vscode/settings.json",
                "app/client.tsx",
                "app/routes/index.tsx",
                "tsconfig.json"
            ]
        );
        assert!(files.target_path(".vscode/settings.json").is_file());
        assert!(files.target_path("public").is_dir());
    }

    #[tokio::test]
    async fn test_suppression_header_only_stripped_from_first_line() {
        let (_tmp, files) = fixture();
        files
            .copy_template_files(CopyRequest::new("app", "template"))
            .await
            .unwrap();

        let client = stdfs::read_to_string(files.target_path("app/client.tsx")).unwrap();
        assert_eq!(client, "export {}\n");
        let index = stdfs::read_to_string(files.target_path("app/routes/index.tsx")).unwrap();
        assert!(index.ends_with("// @ts-nocheck\n"));
    }

    #[test]
    fn test_binary_content_is_untouched() {
        let bytes = vec![0xff, 0xfe, b'/', b'/'];
        assert_eq!(strip_suppression_header(bytes.clone()), bytes);
    }

    #[test]
    fn test_dot_prefix_rewrite_applies_to_every_segment() {
        assert_eq!(rewrite_dot_prefix("_dot_vscode/settings.json"), ".vscode/settings.json");
        assert_eq!(rewrite_dot_prefix("_dot_gitignore"), ".gitignore");
        assert_eq!(rewrite_dot_prefix("a/_dot_env"), "a/.env");
        assert_eq!(rewrite_dot_prefix("my_dot_file"), "my_dot_file");
    }

    #[tokio::test]
    async fn test_overwrite_refused_writes_nothing() {
        let (_tmp, files) = fixture();
        write(files.target_dir(), "tsconfig.json", b"mine");
        write(files.target_dir(), ".vscode/settings.json", b"mine");

        let err = files
            .copy_template_files(CopyRequest::new("**/*", "template"))
            .await
            .unwrap_err();

        match err {
            ScaffoldError::OverwriteRefused(paths) => {
                assert_eq!(paths, vec![".vscode/settings.json", "tsconfig.json"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!files.target_path("app").exists());
        assert_eq!(stdfs::read_to_string(files.target_path("tsconfig.json")).unwrap(), "mine");
    }

    #[tokio::test]
    async fn test_file_in_place_of_template_directory_is_a_conflict() {
        let (_tmp, files) = fixture();
        write(files.target_dir(), "public", b"not a directory");

        let conflicts = files
            .files_that_would_be_overwritten("**/*", "template")
            .await
            .unwrap();
        assert_eq!(conflicts, vec!["public"]);

        let err = files
            .copy_template_files(CopyRequest::new("**/*", "template"))
            .await
            .unwrap_err();
        assert!(matches!(err, ScaffoldError::OverwriteRefused(ref paths) if paths == &["public"]));
        assert!(!files.target_path("app").exists());
        assert!(!files.target_path(".vscode").exists());
    }

    #[tokio::test]
    async fn test_existing_directories_are_not_conflicts() {
        let (_tmp, files) = fixture();
        stdfs::create_dir_all(files.target_path("public")).unwrap();
        stdfs::create_dir_all(files.target_path("app/routes")).unwrap();

        let conflicts = files
            .files_that_would_be_overwritten("**/*", "template")
            .await
            .unwrap();
        assert!(conflicts.is_empty());
    }

    #[tokio::test]
    async fn test_overwrite_replaces_existing_files() {
        let (_tmp, files) = fixture();
        write(files.target_dir(), "tsconfig.json", b"mine");

        files
            .copy_template_files(CopyRequest::new("*.json", "template").overwrite(true))
            .await
            .unwrap();

        assert_eq!(
            stdfs::read_to_string(files.target_path("tsconfig.json")).unwrap(),
            "{\"strict\": true}"
        );
    }

    #[tokio::test]
    async fn test_conflicts_are_reported_as_destination_paths() {
        let (_tmp, files) = fixture();
        write(files.target_dir(), ".vscode/settings.json", b"{}");

        let conflicts = files
            .files_that_would_be_overwritten("**/*", "template")
            .await
            .unwrap();
        assert_eq!(conflicts, vec![".vscode/settings.json"]);
    }

    #[tokio::test]
    async fn test_missing_template_dir() {
        let (_tmp, files) = fixture();
        let err = files
            .copy_template_files(CopyRequest::new("**/*", "nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, ScaffoldError::TemplateDirMissing(_)));
    }

    #[tokio::test]
    async fn test_files_only_skips_directory_matches() {
        let (_tmp, files) = fixture();

        let written = files
            .copy_template_files(CopyRequest::new("*", "template").files_only())
            .await
            .unwrap();

        assert_eq!(written, vec!["tsconfig.json"]);
        assert!(!files.target_path("public").exists());
    }

    #[tokio::test]
    async fn test_copy_into_target_subdir() {
        let (_tmp, files) = fixture();

        let written = files
            .copy_template_files(CopyRequest::new("_dot_vscode", "template").into_subdir("editor"))
            .await
            .unwrap();

        assert_eq!(written, vec!["editor/.vscode/settings.json"]);
    }

    #[tokio::test]
    async fn test_target_file_helpers() {
        let (_tmp, files) = fixture();

        let err = files.read_target_file("package.json").await.unwrap_err();
        assert!(matches!(err, ScaffoldError::FileMissing(_)));

        files.write_target_file("package.json", "{}", false).await.unwrap();
        assert_eq!(files.read_target_file("package.json").await.unwrap(), "{}");

        let err = files
            .write_target_file("package.json", "[]", false)
            .await
            .unwrap_err();
        assert!(matches!(err, ScaffoldError::OverwriteRefused(_)));
        files.write_target_file("package.json", "[]", true).await.unwrap();
        assert_eq!(files.read_target_file("package.json").await.unwrap(), "[]");
    }
}
