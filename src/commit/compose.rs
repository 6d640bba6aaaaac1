//! Conventional commit message composition from classified changes.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::commit::classify::CommitType;

/// Key changes kept after extraction.
const MAX_KEY_CHANGES: usize = 3;
/// Bullet lines allowed in the body.
const MAX_BODY_LINES: usize = 5;
/// More staged files than this always gets a body.
const BODY_FILE_THRESHOLD: usize = 3;
/// Confidence below this always gets a body.
const BODY_CONFIDENCE_THRESHOLD: f64 = 0.7;
/// Rules-file marker that turns on the footer.
const TODO_MARKER: &str = "TODO.md";
const TODO_FOOTER: &str = "This addresses the requirements from TODO.md";

/// A construct recognised on an added or removed diff line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyChange {
    AddedFunction,
    AddedClass,
    AddedMethod,
    RemovedFunction,
    AddedDependency,
}

impl KeyChange {
    /// Phrase for a construct with the given name.
    pub fn describe(self, name: &str) -> String {
        match self {
            KeyChange::AddedFunction => format!("add {name}() function"),
            KeyChange::AddedClass => format!("create {name} class"),
            KeyChange::AddedMethod => format!("implement {name}() method"),
            KeyChange::RemovedFunction => format!("remove {name}() function"),
            KeyChange::AddedDependency => format!("add {name} dependency"),
        }
    }
}

/// Extraction rules, evaluated in this order.
static KEY_CHANGE_RULES: LazyLock<Vec<(KeyChange, Regex)>> = LazyLock::new(|| {
    [
        (KeyChange::AddedFunction, r"(?im)^\+.*function\s+(\w+)"),
        (KeyChange::AddedClass, r"(?im)^\+.*class\s+(\w+)"),
        (KeyChange::AddedMethod, r"(?im)^\+.*def\s+(\w+)"),
        (KeyChange::RemovedFunction, r"(?im)^-.*function\s+(\w+)"),
        (KeyChange::AddedDependency, r"(?im)^\+.*import\s+(\w+)"),
    ]
    .into_iter()
    .map(|(kind, pattern)| {
        let re = Regex::new(pattern).expect("static key-change pattern must compile");
        (kind, re)
    })
    .collect()
});

/// Count added and removed lines, skipping `+++`/`---` file headers.
fn count_line_changes(diff: &str) -> (usize, usize) {
    let mut added = 0;
    let mut removed = 0;
    for line in diff.lines() {
        if line.starts_with('+') && !line.starts_with("++") {
            added += 1;
        } else if line.starts_with('-') && !line.starts_with("--") {
            removed += 1;
        }
    }
    (added, removed)
}

/// Extract up to three short phrases describing what the diff does.
///
/// Never empty: when no construct is recognised, a single phrase is derived
/// from the ratio of added to removed lines.
pub fn extract_key_changes(diff: &str) -> Vec<String> {
    let mut changes: Vec<String> = Vec::new();

    for (kind, re) in KEY_CHANGE_RULES.iter() {
        for caps in re.captures_iter(diff) {
            let Some(name) = caps.get(1) else { continue };
            let phrase = kind.describe(name.as_str());
            if !changes.contains(&phrase) {
                changes.push(phrase);
            }
        }
    }

    if changes.is_empty() {
        let (added, removed) = count_line_changes(diff);
        let phrase = if added > removed * 2 {
            "add new functionality"
        } else if removed > added * 2 {
            "remove unused code"
        } else {
            "update implementation"
        };
        changes.push(phrase.to_string());
    }

    changes.truncate(MAX_KEY_CHANGES);
    changes
}

/// A composed commit message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessage {
    pub subject: String,
    pub body: Option<String>,
    pub footer: Option<String>,
}

impl CommitMessage {
    /// Format the message for git.
    ///
    /// Produces:
    /// ```text
    /// type: description
    ///
    /// - key change
    /// - key change
    ///
    /// Footer sentence.
    /// ```
    pub fn format(&self) -> String {
        let mut parts = vec![self.subject.clone()];

        if let Some(ref body) = self.body {
            parts.push(String::new());
            parts.push(body.clone());
        }

        if let Some(ref footer) = self.footer {
            parts.push(String::new());
            parts.push(footer.clone());
        }

        parts.join("\n")
    }
}

fn subject_description(key_changes: &[String], files: &[String]) -> String {
    if let Some(first) = key_changes.first() {
        return first.clone();
    }

    match files {
        [only] => {
            let stem = Path::new(only)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| only.clone());
            format!("update {stem}")
        }
        _ => format!("update {} files", files.len()),
    }
}

fn needs_body(files: &[String], confidence: f64) -> bool {
    files.len() > BODY_FILE_THRESHOLD || confidence < BODY_CONFIDENCE_THRESHOLD
}

/// Build the subject, optional body, and optional footer.
pub fn compose_message(
    commit_type: CommitType,
    files: &[String],
    diff: &str,
    confidence: f64,
    rules_text: Option<&str>,
) -> CommitMessage {
    let subject = format!(
        "{commit_type}: {}",
        subject_description(&extract_key_changes(diff), files)
    );

    let body = needs_body(files, confidence).then(|| {
        extract_key_changes(diff)
            .iter()
            .take(MAX_BODY_LINES)
            .map(|change| format!("- {change}"))
            .collect::<Vec<_>>()
            .join("\n")
    });

    let footer = rules_text
        .is_some_and(|rules| rules.contains(TODO_MARKER))
        .then(|| TODO_FOOTER.to_string());

    CommitMessage {
        subject,
        body,
        footer,
    }
}

/// Compose the full commit message text.
pub fn compose(
    commit_type: CommitType,
    files: &[String],
    diff: &str,
    confidence: f64,
    rules_text: Option<&str>,
) -> String {
    compose_message(commit_type, files, diff, confidence, rules_text).format()
}
