//! Error taxonomy for the scaffolding pipeline

use crate::schema::Issue;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T, E = ScaffoldError> = std::result::Result<T, E>;

/// The target directory is in the wrong state for the requested run mode
#[derive(Debug, Error)]
pub enum PreconditionError {
    #[error("The target folder {} isn't empty", .0.display())]
    TargetNotEmpty(PathBuf),

    #[error("The target folder {} doesn't exist", .0.display())]
    TargetMissing(PathBuf),
}

#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    /// Schema or custom checks failed; every issue from every module is kept
    #[error("Validation failed:\n{}", format_issues(.0))]
    Validation(Vec<Issue>),

    #[error("The template folder {} doesn't exist", .0.display())]
    TemplateDirMissing(PathBuf),

    #[error("Invalid file pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Refusing to overwrite existing files: {}", .0.join(", "))]
    OverwriteRefused(Vec<String>),

    #[error("\"{command}\" failed (exit code {}) {stdout} {stderr}", .code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
    ExternalProcessFailed {
        command: String,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("Failed to spawn \"{command}\": {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Schema field '{field}' is defined twice with incompatible types ({left} vs {right})")]
    SchemaConflict {
        field: String,
        left: String,
        right: String,
    },

    #[error("The file {} doesn't exist", .0.display())]
    FileMissing(PathBuf),

    #[error("Failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Prompt failed: {0}")]
    Prompt(#[source] std::io::Error),

    #[error("Cannot ask \"{0}\" without an interactive terminal")]
    NonInteractive(String),
}

impl ScaffoldError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Issues carried by a validation failure, empty for every other error
    pub fn issues(&self) -> &[Issue] {
        match self {
            Self::Validation(issues) => issues,
            _ => &[],
        }
    }

    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition(_))
    }
}

/// Render issues one per line, the way the driver prints them
pub fn format_issues(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(|issue| format!("  - {}", issue))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_every_issue() {
        let err = ScaffoldError::Validation(vec![
            Issue::at("name", "Required"),
            Issue::root("package.json already exists"),
        ]);
        let message = err.to_string();
        assert!(message.contains("  - name: Required"));
        assert!(message.contains("  - package.json already exists"));
        assert_eq!(err.issues().len(), 2);
    }

    #[test]
    fn test_precondition_is_detected() {
        let err: ScaffoldError = PreconditionError::TargetMissing(PathBuf::from("/tmp/x")).into();
        assert!(err.is_precondition());
        assert!(err.issues().is_empty());
    }

    #[test]
    fn test_process_failure_carries_output() {
        let err = ScaffoldError::ExternalProcessFailed {
            command: "npm install".to_string(),
            code: Some(1),
            stdout: "out".to_string(),
            stderr: "boom".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("\"npm install\" failed (exit code 1)"));
        assert!(message.contains("boom"));
    }
}
