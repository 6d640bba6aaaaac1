//! Heuristic commit messages from staged changes.

pub mod classify;
pub mod compose;
pub mod generate;

pub use classify::{CategoryRule, CommitType, RULES, classify, is_docs_only};
pub use compose::{CommitMessage, KeyChange, compose, compose_message, extract_key_changes};
pub use generate::{CommitResult, CommitStyle, generate, generate_with};
