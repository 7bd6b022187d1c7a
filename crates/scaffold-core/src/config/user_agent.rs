//! Package manager detection from the invoking tool's user agent

use super::choices::PackageManager;

/// Environment variable npm-compatible tools set for child processes
pub const USER_AGENT_ENV: &str = "npm_config_user_agent";

/// User agent prefixes in order of precedence
const USER_AGENTS: &[(&str, PackageManager)] = &[
    ("pnpm", PackageManager::Pnpm),
    ("yarn", PackageManager::Yarn),
    ("bun", PackageManager::Bun),
    ("npm", PackageManager::Npm),
];

/// Detect the package manager that launched this process, if any
pub fn detect_package_manager() -> Option<PackageManager> {
    std::env::var(USER_AGENT_ENV)
        .ok()
        .and_then(|agent| package_manager_from_user_agent(&agent))
}

/// Parse a user agent such as `yarn/1.22.19 npm/? node/v16.18.0 linux x64`
pub fn package_manager_from_user_agent(agent: &str) -> Option<PackageManager> {
    let name = agent.split_whitespace().next()?.split('/').next()?;
    USER_AGENTS
        .iter()
        .find(|(prefix, _)| *prefix == name)
        .map(|(_, pm)| *pm)
}
