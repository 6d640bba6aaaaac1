//! The staged change set handed to classification.

/// Staged changes for one working tree, gathered once per request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Staged paths in git's order.
    pub files: Vec<String>,
    /// Unified diff of the index against HEAD.
    pub diff: String,
    /// Contents of the project rules file, if one exists.
    pub rules_text: Option<String>,
    /// Current branch name (empty on a detached HEAD).
    pub branch: String,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Parse `git diff --name-only -z` output into paths.
///
/// Entries are NUL-terminated and never quoted, so paths come back exactly
/// as stored in the index.
pub fn parse_name_only(output: &str) -> Vec<String> {
    output
        .split('\0')
        .filter(|path| !path.is_empty())
        .map(String::from)
        .collect()
}
