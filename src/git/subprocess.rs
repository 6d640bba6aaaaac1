//! `git` process spawning.

use std::env;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::ProviderError;

/// Default timeout for a single git invocation.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable to override the default timeout.
pub const TIMEOUT_ENV_VAR: &str = "COMMITWISE_GIT_TIMEOUT";

/// Get the configured timeout duration.
///
/// Reads from COMMITWISE_GIT_TIMEOUT if set, otherwise uses the default of
/// 30 seconds. Logs a warning if the variable is set but not a valid number.
pub fn get_timeout() -> Duration {
    match env::var(TIMEOUT_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(secs) => Duration::from_secs(secs),
            Err(_) => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, v, DEFAULT_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            }
        },
        _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
}

/// Check that the `git` binary is on PATH.
pub fn check_git_installed() -> Result<(), ProviderError> {
    which::which("git")
        .map(|_| ())
        .map_err(|_| ProviderError::GitNotInstalled)
}

/// Run `git <args>` in `dir` and return stdout.
///
/// The child is killed if `timeout_duration` elapses first.
pub async fn run_git(
    dir: &Path,
    args: &[&str],
    timeout_duration: Duration,
) -> Result<String, ProviderError> {
    let command = args.join(" ");
    debug!("Running git {} in {}", command, dir.display());

    let output = timeout(
        timeout_duration,
        Command::new("git")
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output(),
    )
    .await
    .map_err(|_| ProviderError::Timeout {
        command: command.clone(),
        secs: timeout_duration.as_secs(),
    })?
    .map_err(ProviderError::SpawnFailed)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let code = output.status.code().unwrap_or(-1);
        return Err(ProviderError::CommandFailed {
            command,
            code,
            stderr,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_timeout_default() {
        temp_env::with_var_unset(TIMEOUT_ENV_VAR, || {
            assert_eq!(get_timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        });
    }

    #[test]
    fn test_get_timeout_from_env() {
        temp_env::with_var(TIMEOUT_ENV_VAR, Some("5"), || {
            assert_eq!(get_timeout(), Duration::from_secs(5));
        });
    }

    #[test]
    fn test_get_timeout_invalid_env_uses_default() {
        temp_env::with_var(TIMEOUT_ENV_VAR, Some("soon"), || {
            assert_eq!(get_timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        });
    }

    #[test]
    fn test_get_timeout_empty_env_uses_default() {
        temp_env::with_var(TIMEOUT_ENV_VAR, Some(""), || {
            assert_eq!(get_timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        });
    }

    #[tokio::test]
    async fn test_run_git_version_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let out = run_git(dir.path(), &["--version"], Duration::from_secs(10))
            .await
            .unwrap();
        assert!(out.starts_with("git version"));
    }

    #[tokio::test]
    async fn test_run_git_outside_repo_is_command_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_git(dir.path(), &["diff", "--cached"], Duration::from_secs(10))
            .await
            .unwrap_err();
        match err {
            ProviderError::CommandFailed { command, code, .. } => {
                assert_eq!(command, "diff --cached");
                assert_ne!(code, 0);
            }
            other => panic!("Expected CommandFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_run_git_missing_dir_is_spawn_failure() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let err = run_git(&missing, &["status"], Duration::from_secs(10))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::SpawnFailed(_)));
        assert!(!err.is_command_failure());
    }
}
