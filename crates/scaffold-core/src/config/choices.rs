//! Enumerated answers shared by the CLI flags, the prompts and the schemas

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Package managers a generated project can be installed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
    Bun,
}

impl PackageManager {
    pub const ALL: [PackageManager; 4] = [
        PackageManager::Npm,
        PackageManager::Yarn,
        PackageManager::Pnpm,
        PackageManager::Bun,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Bun => "bun",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|pm| pm.as_str() == s)
    }

    /// Command line that runs a package.json script
    pub fn run_script(&self, script: &str) -> String {
        match self {
            PackageManager::Npm => format!("npm run {}", script),
            other => format!("{} {}", other.as_str(), script),
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Editors the project can be pre-configured for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ide {
    Vscode,
    Cursor,
    Other,
}

impl Ide {
    pub const ALL: [Ide; 3] = [Ide::Vscode, Ide::Cursor, Ide::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Ide::Vscode => "vscode",
            Ide::Cursor => "cursor",
            Ide::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ide| ide.as_str() == s)
    }
}

impl fmt::Display for Ide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_through_names() {
        for pm in PackageManager::ALL {
            assert_eq!(PackageManager::parse(pm.as_str()), Some(pm));
        }
        assert_eq!(Ide::parse("cursor"), Some(Ide::Cursor));
        assert_eq!(Ide::parse("emacs"), None);
    }

    #[test]
    fn test_run_script_command() {
        assert_eq!(PackageManager::Npm.run_script("dev"), "npm run dev");
        assert_eq!(PackageManager::Pnpm.run_script("dev"), "pnpm dev");
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        assert_eq!(
            serde_json::to_value(PackageManager::Yarn).unwrap(),
            serde_json::json!("yarn")
        );
    }
}
