//! Staged change collection.
//!
//! [`ChangeSetProvider`] is the seam between the commit pipeline and the
//! version-control tool. [`GitCliProvider`] implements it by shelling out to
//! `git`, inheriting the user's git config.

use std::env;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use git2::Repository;
use tracing::{debug, warn};

use crate::error::ProviderError;

use super::change_set::{ChangeSet, parse_name_only};
use super::subprocess::{DEFAULT_TIMEOUT_SECS, get_timeout, run_git};

/// Default project rules file, relative to the working directory.
pub const DEFAULT_RULES_FILE: &str = "rules.md";

/// Environment variable to override the rules file name.
pub const RULES_FILE_ENV_VAR: &str = "COMMITWISE_RULES_FILE";

/// Trait for gathering staged changes.
///
/// This abstraction allows mocking git in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChangeSetProvider: Send + Sync {
    /// Whether `path` is inside a git working tree.
    async fn is_repository(&self, path: &Path) -> bool;

    /// Collect staged files, staged diff, branch, and rules text for `path`.
    async fn collect(&self, path: &Path) -> Result<ChangeSet, ProviderError>;
}

/// Settings for [`GitCliProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Limit for each git invocation.
    pub timeout: Duration,
    pub rules_file: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            rules_file: DEFAULT_RULES_FILE.to_string(),
        }
    }
}

impl ProviderConfig {
    /// Build from COMMITWISE_GIT_TIMEOUT and COMMITWISE_RULES_FILE.
    pub fn from_env() -> Self {
        let rules_file = match env::var(RULES_FILE_ENV_VAR) {
            Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
            _ => DEFAULT_RULES_FILE.to_string(),
        };

        Self {
            timeout: get_timeout(),
            rules_file,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Provider that runs the system `git` binary.
#[derive(Debug, Clone, Default)]
pub struct GitCliProvider {
    config: ProviderConfig,
}

impl GitCliProvider {
    pub fn new(config: ProviderConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> Self {
        Self::new(ProviderConfig::from_env())
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn git(&self, dir: &Path, args: &[&str]) -> Result<String, ProviderError> {
        run_git(dir, args, self.config.timeout).await
    }

    /// Read the rules file. Missing or unreadable files yield `None`.
    async fn read_rules(&self, dir: &Path) -> Option<String> {
        let path = dir.join(&self.config.rules_file);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Some(text),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Could not read rules file {}: {}", path.display(), e);
                None
            }
        }
    }
}

#[async_trait]
impl ChangeSetProvider for GitCliProvider {
    async fn is_repository(&self, path: &Path) -> bool {
        match Repository::discover(path) {
            Ok(_) => true,
            Err(e) => {
                debug!("No repository at {}: {}", path.display(), e);
                false
            }
        }
    }

    async fn collect(&self, path: &Path) -> Result<ChangeSet, ProviderError> {
        let (names, diff, branch, rules_text) = tokio::try_join!(
            self.git(path, &["diff", "--cached", "--name-only", "-z"]),
            self.git(path, &["diff", "--cached", "--no-color", "--no-ext-diff"]),
            self.git(path, &["branch", "--show-current"]),
            async { Ok::<_, ProviderError>(self.read_rules(path).await) },
        )?;

        Ok(ChangeSet {
            files: parse_name_only(&names),
            diff,
            rules_text,
            branch: branch.trim().to_string(),
        })
    }
}
