//! Commit type classification from staged paths and diff text.
//!
//! Each category is scored against the change set using regex and keyword
//! signals plus a static priority bias. The highest score wins, with ties
//! going to the category listed first in [`RULES`].

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

// Scores are kept in tenths of a point so that equal scores compare equal.

/// Tenths for each content pattern found anywhere in the diff.
const CONTENT_WEIGHT: u32 = 3;
/// Tenths for each (file, file pattern) match.
const FILE_WEIGHT: u32 = 4;
/// Tenths for each keyword present in the lower-cased diff.
const KEYWORD_WEIGHT: u32 = 2;
/// Per-category score cap (1.0).
const MAX_POINTS: u32 = 10;
const POINTS_PER_UNIT: f64 = 10.0;

/// Upper bound on any scored confidence.
pub const MAX_CONFIDENCE: f64 = 0.95;
/// Confidence reported when every staged file is documentation.
pub const DOCS_ONLY_CONFIDENCE: f64 = 0.95;

/// Conventional commit types this tool can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitType {
    Feat,
    Fix,
    Docs,
    Refactor,
    Style,
    Chore,
}

impl CommitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitType::Feat => "feat",
            CommitType::Fix => "fix",
            CommitType::Docs => "docs",
            CommitType::Refactor => "refactor",
            CommitType::Style => "style",
            CommitType::Chore => "chore",
        }
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CommitType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "feat" => Ok(Self::Feat),
            "fix" => Ok(Self::Fix),
            "docs" => Ok(Self::Docs),
            "refactor" => Ok(Self::Refactor),
            "style" => Ok(Self::Style),
            "chore" => Ok(Self::Chore),
            _ => Err(format!("Unknown commit type: {}", s)),
        }
    }
}

/// Scoring signals for one commit type.
#[derive(Debug)]
pub struct CategoryRule {
    pub commit_type: CommitType,
    /// Matched against the whole diff; each contributes at most once.
    pub content_patterns: Vec<Regex>,
    /// Matched against every staged path.
    pub file_patterns: Vec<Regex>,
    /// Lowercase substrings looked up in the lower-cased diff.
    pub keywords: &'static [&'static str],
    pub priority: u8,
}

impl CategoryRule {
    fn new(
        commit_type: CommitType,
        content_patterns: &[&str],
        file_patterns: &[&str],
        keywords: &'static [&'static str],
        priority: u8,
    ) -> Self {
        Self {
            commit_type,
            content_patterns: compile_all(content_patterns),
            file_patterns: compile_all(file_patterns),
            keywords,
            priority,
        }
    }

    /// Static bias (in tenths) added to every score for this category.
    ///
    /// Docs outranks everything on priority, but that rank is spent on the
    /// docs-only short-circuit. In regular scoring docs competes on signals alone.
    fn bias(&self) -> u32 {
        match self.commit_type {
            CommitType::Docs => 0,
            _ => u32::from(self.priority),
        }
    }
}

fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("static classification pattern must compile"))
        .collect()
}

/// The category table, in tie-breaking order.
pub static RULES: LazyLock<Vec<CategoryRule>> = LazyLock::new(|| {
    vec![
        CategoryRule::new(
            CommitType::Feat,
            &[
                r"(?i)class\s+\w+.*\{",
                r"(?i)function\s+\w+.*\{",
                r"(?i)def\s+\w+.*:",
                r"(?i)new.*Controller",
            ],
            &[r"Controller\.php$", r"Model\.php$", r"Service\.py$"],
            &["add", "create", "implement", "introduce"],
            3,
        ),
        CategoryRule::new(
            CommitType::Fix,
            &[
                r"(?i)fix|bug|error|correct",
                r"(?i)null\s+check",
                r"(?i)exception.*handling",
            ],
            &[],
            &["fix", "resolve", "correct", "repair", "patch"],
            4,
        ),
        CategoryRule::new(
            CommitType::Docs,
            &[],
            &[r"\.md$", r"README", r"TODO", r"CHANGELOG"],
            &["docs", "documentation", "readme"],
            5,
        ),
        CategoryRule::new(
            CommitType::Refactor,
            &[r"(?i)rename|move|extract|optimize"],
            &[],
            &["refactor", "restructure", "reorganize", "optimize"],
            2,
        ),
        CategoryRule::new(
            CommitType::Style,
            &[r"(?i)formatting|whitespace|PSR-12"],
            &[],
            &["style", "format", "whitespace"],
            1,
        ),
        CategoryRule::new(
            CommitType::Chore,
            &[],
            &[
                r"composer\.json$",
                r"package\.json$",
                r"pyproject\.toml$",
                r"requirements\.txt$",
                r"\.env",
                r"config/",
            ],
            &["chore", "update", "maintain"],
            0,
        ),
    ]
});

static DOC_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(md|txt|rst)$|README|TODO|CHANGELOG")
        .expect("static documentation pattern must compile")
});

/// Whether every staged path is documentation. False for an empty list.
pub fn is_docs_only(files: &[String]) -> bool {
    !files.is_empty() && files.iter().all(|f| DOC_PATH.is_match(f))
}

/// Score one category in tenths, clamped to [`MAX_POINTS`].
fn score_points(rule: &CategoryRule, files: &[String], diff_lower: &str, diff: &str) -> u32 {
    let content_hits = rule
        .content_patterns
        .iter()
        .filter(|re| re.is_match(diff))
        .count();

    let file_hits: usize = files
        .iter()
        .map(|path| rule.file_patterns.iter().filter(|re| re.is_match(path)).count())
        .sum();

    let keyword_hits = rule
        .keywords
        .iter()
        .filter(|kw| diff_lower.contains(*kw))
        .count();

    let points = content_hits as u32 * CONTENT_WEIGHT
        + file_hits as u32 * FILE_WEIGHT
        + keyword_hits as u32 * KEYWORD_WEIGHT
        + rule.bias();

    points.min(MAX_POINTS)
}

/// Score one category against the change set, clamped to 1.0.
pub fn score_category(rule: &CategoryRule, files: &[String], diff: &str) -> f64 {
    f64::from(score_points(rule, files, &diff.to_lowercase(), diff)) / POINTS_PER_UNIT
}

/// Pick a commit type for the staged change set.
///
/// Returns the winning type and a confidence in `[0, 0.95]`. A change set made
/// up entirely of documentation files is always `(Docs, 0.95)`.
pub fn classify(files: &[String], diff: &str) -> (CommitType, f64) {
    if is_docs_only(files) {
        return (CommitType::Docs, DOCS_ONLY_CONFIDENCE);
    }

    let diff_lower = diff.to_lowercase();
    let mut best: Option<(CommitType, u32)> = None;
    for rule in RULES.iter() {
        let points = score_points(rule, files, &diff_lower, diff);
        // strictly greater: earlier rules keep ties
        if best.is_none_or(|(_, top)| points > top) {
            best = Some((rule.commit_type, points));
        }
    }

    let (commit_type, points) = best.unwrap_or((CommitType::Chore, 0));
    let confidence = (f64::from(points) / POINTS_PER_UNIT).min(MAX_CONFIDENCE);
    (commit_type, confidence)
}
