//! commitwise - drafts conventional commit messages from staged git changes.
//!
//! # Overview
//!
//! commitwise reads the staged file list and diff, scores them against a
//! fixed table of commit types, and composes a `type: description` subject
//! with an optional bullet body and footer. No language model is involved;
//! every decision is a regex or keyword match.

pub mod commit;
pub mod error;
pub mod git;
pub mod logging;
pub mod server;

// Re-export commonly used types
pub use commit::{CommitResult, CommitStyle, CommitType, classify, compose, generate, generate_with};
pub use error::{GenerateError, ProviderError};
pub use git::{ChangeSet, ChangeSetProvider, GitCliProvider, ProviderConfig};
pub use logging::{MemoryLogger, NullLogger, PipelineLogger, TracingLogger};
