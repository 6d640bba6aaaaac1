//! Commit message pipeline: repository check, collection, classification,
//! and composition.
//!
//! [`generate_with`] never fails. Any error on the way is logged and turned
//! into one of two fixed low-confidence results, so callers can always show
//! something.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::commit::classify::{CommitType, classify};
use crate::commit::compose::compose;
use crate::error::GenerateError;
use crate::git::{ChangeSetProvider, GitCliProvider};
use crate::logging::{PipelineLogger, TracingLogger};

const COMMAND_FALLBACK_TEXT: &str = "chore: misc changes";
const COMMAND_FALLBACK_CONFIDENCE: f64 = 0.2;
const UNEXPECTED_FALLBACK_TEXT: &str = "chore: update project files";
const UNEXPECTED_FALLBACK_CONFIDENCE: f64 = 0.1;

/// The outcome of one generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitResult {
    /// Ready-to-use commit message; empty when nothing is staged.
    pub text: String,
    pub confidence: f64,
    pub files_analyzed: usize,
    pub has_changes: bool,
}

impl CommitResult {
    /// Nothing staged.
    pub fn no_changes() -> Self {
        Self {
            text: String::new(),
            confidence: 0.0,
            files_analyzed: 0,
            has_changes: false,
        }
    }

    /// Returned when a git command exits non-zero.
    pub fn command_fallback() -> Self {
        Self {
            text: COMMAND_FALLBACK_TEXT.to_string(),
            confidence: COMMAND_FALLBACK_CONFIDENCE,
            files_analyzed: 0,
            has_changes: true,
        }
    }

    /// Returned for every other failure, including "not a repository".
    pub fn unexpected_fallback() -> Self {
        Self {
            text: UNEXPECTED_FALLBACK_TEXT.to_string(),
            confidence: UNEXPECTED_FALLBACK_CONFIDENCE,
            files_analyzed: 0,
            has_changes: true,
        }
    }
}

/// Commit message dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitStyle {
    #[default]
    Conventional,
}

impl CommitStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitStyle::Conventional => "conventional",
        }
    }

    /// Parse a known style name. Case and surrounding whitespace are ignored;
    /// an empty name means the default.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "conventional" | "" => Some(CommitStyle::Conventional),
            _ => None,
        }
    }

    /// Compose the message text in this style.
    pub fn compose(
        self,
        commit_type: CommitType,
        files: &[String],
        diff: &str,
        confidence: f64,
        rules_text: Option<&str>,
    ) -> String {
        match self {
            CommitStyle::Conventional => compose(commit_type, files, diff, confidence, rules_text),
        }
    }
}

/// Generate a commit message for the staged changes in `working_directory`
/// (the current directory when `None`), using git and `tracing` logging.
pub async fn generate(working_directory: Option<&Path>, style: &str) -> CommitResult {
    generate_with(
        &GitCliProvider::from_env(),
        &TracingLogger,
        working_directory,
        style,
    )
    .await
}

/// Generate a commit message with an explicit provider and log sink.
pub async fn generate_with<P, L>(
    provider: &P,
    logger: &L,
    working_directory: Option<&Path>,
    style: &str,
) -> CommitResult
where
    P: ChangeSetProvider + ?Sized,
    L: PipelineLogger + ?Sized,
{
    let style = CommitStyle::parse(style).unwrap_or_else(|| {
        let fallback = CommitStyle::default();
        logger.warning(&format!(
            "Unknown commit style '{}', using {}",
            style.trim(),
            fallback.as_str()
        ));
        fallback
    });

    match run_pipeline(provider, logger, working_directory, style).await {
        Ok(result) => result,
        Err(e) => {
            match &e {
                GenerateError::Command(_) => logger.error(&format!("Git error: {e}")),
                _ => logger.error(&format!("Unexpected error: {e}")),
            }
            e.fallback_result()
        }
    }
}

fn resolve_directory(working_directory: Option<&Path>) -> Result<PathBuf, GenerateError> {
    match working_directory {
        Some(dir) => Ok(dir.to_path_buf()),
        None => std::env::current_dir().map_err(GenerateError::WorkingDirectory),
    }
}

async fn run_pipeline<P, L>(
    provider: &P,
    logger: &L,
    working_directory: Option<&Path>,
    style: CommitStyle,
) -> Result<CommitResult, GenerateError>
where
    P: ChangeSetProvider + ?Sized,
    L: PipelineLogger + ?Sized,
{
    logger.info("Analyzing staged changes...");

    let dir = resolve_directory(working_directory)?;
    if !provider.is_repository(&dir).await {
        return Err(GenerateError::NotARepository(dir));
    }

    let changes = provider.collect(&dir).await?;

    if changes.is_empty() {
        logger.warning("No staged changes to commit");
        return Ok(CommitResult::no_changes());
    }

    logger.info(&format!("Found {} staged files", changes.files.len()));
    if !changes.branch.is_empty() {
        logger.debug(&format!("Branch: {}", changes.branch));
    }

    let (commit_type, confidence) = classify(&changes.files, &changes.diff);
    logger.info(&format!(
        "Detected type: {commit_type} (confidence: {confidence:.2})"
    ));

    let text = style.compose(
        commit_type,
        &changes.files,
        &changes.diff,
        confidence,
        changes.rules_text.as_deref(),
    );
    let preview: String = text.chars().take(100).collect();
    logger.debug(&format!("Generated commit message: {preview}"));

    Ok(CommitResult {
        text,
        confidence,
        files_analyzed: changes.files.len(),
        has_changes: true,
    })
}
