//! npm package name rules

pub const MAX_LENGTH: usize = 214;

const RESERVED: [&str; 2] = ["node_modules", "favicon.ico"];
const SPECIAL: [char; 6] = ['~', '\'', '!', '(', ')', '*'];

/// Check `name` against the npm naming rules, collecting every problem
pub fn validate_project_name(name: &str) -> Result<(), Vec<String>> {
    let mut problems = Vec::new();

    if name.is_empty() {
        problems.push("name length must be greater than zero".to_string());
    }
    if name.starts_with('.') {
        problems.push("name cannot start with a period".to_string());
    }
    if name.starts_with('_') {
        problems.push("name cannot start with an underscore".to_string());
    }
    if name.trim() != name {
        problems.push("name cannot contain leading or trailing spaces".to_string());
    }
    if RESERVED.contains(&name.to_lowercase().as_str()) {
        problems.push(format!("{} is not a valid package name", name));
    }
    if name.len() > MAX_LENGTH {
        problems.push(format!("name can no longer contain more than {} characters", MAX_LENGTH));
    }
    if name.to_lowercase() != name {
        problems.push("name can no longer contain capital letters".to_string());
    }
    let last = name.rsplit('/').next().unwrap_or(name);
    if last.contains(SPECIAL) {
        problems.push("name can no longer contain special characters (\"~'!()*\")".to_string());
    }
    if !name.is_empty() && !is_url_friendly(name) {
        problems.push("name can only contain URL-friendly characters".to_string());
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems)
    }
}

/// clap value parser for `--package-name`
pub fn parse_project_name(name: &str) -> Result<String, String> {
    validate_project_name(name)
        .map(|_| name.to_string())
        .map_err(|problems| format!("The project name {} is invalid: {}", name, problems.join(", ")))
}

/// Best-effort valid name derived from a directory name
pub fn suggest_project_name(raw: &str) -> String {
    let mut name: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .filter(|c| unescaped(*c) && !SPECIAL.contains(c))
        .collect();
    while name.starts_with(['.', '_']) {
        name.remove(0);
    }
    name.truncate(MAX_LENGTH);

    match validate_project_name(&name) {
        Ok(()) => name,
        Err(_) => "my-app".to_string(),
    }
}

fn is_url_friendly(name: &str) -> bool {
    if let Some(scoped) = name.strip_prefix('@') {
        return match scoped.split_once('/') {
            Some((scope, package)) => {
                !scope.is_empty()
                    && !package.is_empty()
                    && !package.contains('/')
                    && scope.chars().all(unescaped)
                    && package.chars().all(unescaped)
            }
            None => false,
        };
    }
    name.chars().all(unescaped)
}

/// Characters a URI component keeps as is
fn unescaped(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '!' | '~' | '*' | '\'' | '(' | ')')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        for name in ["my-app", "app.js", "a", "@scope/pkg", "react-dom", "x_y"] {
            assert!(validate_project_name(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn test_invalid_names() {
        for name in [
            "",
            ".hidden",
            "_private",
            " padded",
            "Capital",
            "node_modules",
            "favicon.ico",
            "with space",
            "a/b",
            "@scope/",
            "pkg!",
        ] {
            assert!(validate_project_name(name).is_err(), "{name:?} should be invalid");
        }
    }

    #[test]
    fn test_length_limit() {
        assert!(validate_project_name(&"a".repeat(MAX_LENGTH)).is_ok());
        let problems = validate_project_name(&"a".repeat(MAX_LENGTH + 1)).unwrap_err();
        assert_eq!(problems.len(), 1);
    }

    #[test]
    fn test_all_problems_are_reported() {
        let problems = validate_project_name("_Bad Name").unwrap_err();
        assert!(problems.len() >= 3);
    }

    #[test]
    fn test_parse_for_cli() {
        assert_eq!(parse_project_name("my-app").unwrap(), "my-app");
        assert!(parse_project_name("My App").unwrap_err().contains("is invalid"));
    }

    #[test]
    fn test_suggestions_from_directory_names() {
        assert_eq!(suggest_project_name("My Project"), "my-project");
        assert_eq!(suggest_project_name(".config"), "config");
        assert_eq!(suggest_project_name("???"), "my-app");
    }
}
