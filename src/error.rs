//! Error types for commitwise modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

use crate::commit::generate::CommitResult;

/// Errors from gathering staged changes through the `git` binary.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("git not found in PATH. Install git and make sure it is on your PATH")]
    GitNotInstalled,

    #[error("git {command} exited with code {code}: {stderr}")]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("Failed to spawn git: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("git {command} timed out after {secs} seconds")]
    Timeout { command: String, secs: u64 },
}

impl ProviderError {
    /// Whether git itself ran and reported failure (as opposed to never finishing).
    pub fn is_command_failure(&self) -> bool {
        matches!(self, ProviderError::CommandFailed { .. })
    }
}

/// Errors that abort the commit message pipeline.
///
/// None of these escape [`crate::generate`]; each one is turned into a
/// fallback [`CommitResult`] at the pipeline boundary.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Not a git repository: {}", .0.display())]
    NotARepository(PathBuf),

    #[error("Could not determine working directory: {0}")]
    WorkingDirectory(#[source] std::io::Error),

    #[error("Git command failed: {0}")]
    Command(#[source] ProviderError),

    #[error("Failed to collect staged changes: {0}")]
    Collection(#[source] ProviderError),
}

impl From<ProviderError> for GenerateError {
    fn from(err: ProviderError) -> Self {
        if err.is_command_failure() {
            GenerateError::Command(err)
        } else {
            GenerateError::Collection(err)
        }
    }
}

impl GenerateError {
    /// The low-confidence result reported in place of a real message.
    pub fn fallback_result(&self) -> CommitResult {
        match self {
            GenerateError::Command(_) => CommitResult::command_fallback(),
            _ => CommitResult::unexpected_fallback(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command_failed() -> ProviderError {
        ProviderError::CommandFailed {
            command: "diff --cached".to_string(),
            code: 128,
            stderr: "fatal: bad revision".to_string(),
        }
    }

    #[test]
    fn test_command_failed_routes_to_command_variant() {
        let err: GenerateError = command_failed().into();
        assert!(matches!(err, GenerateError::Command(_)));
    }

    #[test]
    fn test_timeout_routes_to_collection_variant() {
        let err: GenerateError = ProviderError::Timeout {
            command: "diff --cached".to_string(),
            secs: 30,
        }
        .into();
        assert!(matches!(err, GenerateError::Collection(_)));
    }

    #[test]
    fn test_spawn_failure_routes_to_collection_variant() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no git");
        let err: GenerateError = ProviderError::SpawnFailed(io).into();
        assert!(matches!(err, GenerateError::Collection(_)));
    }

    #[test]
    fn test_command_failed_display_includes_stderr() {
        let msg = command_failed().to_string();
        assert!(msg.contains("diff --cached"));
        assert!(msg.contains("128"));
        assert!(msg.contains("fatal: bad revision"));
    }

    #[test]
    fn test_fallback_results() {
        let command = GenerateError::Command(command_failed()).fallback_result();
        assert_eq!(command.text, "chore: misc changes");
        assert_eq!(command.confidence, 0.2);

        let not_repo = GenerateError::NotARepository(PathBuf::from("/tmp/x")).fallback_result();
        assert_eq!(not_repo.text, "chore: update project files");
        assert_eq!(not_repo.confidence, 0.1);
        assert_eq!(not_repo.files_analyzed, 0);
        assert!(not_repo.has_changes);
    }
}
