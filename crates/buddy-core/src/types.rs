//! Common types used across buddybot

use serde::{Deserialize, Serialize};
use std::fmt;

/// Complexity at or above which an error-free file is only "improving"
pub const COMPLEXITY_THRESHOLD: u32 = 10;

/// Fixed confirmation attached to error-free, non-empty analyses
pub const SUCCESS_MESSAGE: &str = "No syntax errors detected";

/// Three-valued heuristic summary of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Good,
    Improving,
    NeedsWork,
}

impl Quality {
    /// Classify from error count, complexity and non-blank line count.
    ///
    /// Precedence: error-free and simple is `Good`, error-free but complex is
    /// `Improving`, anything else (errors, or an empty buffer) is `NeedsWork`.
    pub fn classify(error_count: usize, complexity: u32, line_count: usize) -> Self {
        if error_count == 0 && complexity < COMPLEXITY_THRESHOLD && line_count > 0 {
            Quality::Good
        } else if error_count == 0 && line_count > 0 {
            Quality::Improving
        } else {
            Quality::NeedsWork
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Good => "good",
            Quality::Improving => "improving",
            Quality::NeedsWork => "needs_work",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of analyzing one text buffer
///
/// Built through [`AnalysisResult::from_findings`], which keeps the
/// boolean flags, counts and `last_*` fields consistent with the message
/// lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub has_errors: bool,
    pub error_count: usize,
    pub has_warnings: bool,
    pub warning_count: usize,
    /// Lines whose trimmed form is non-empty
    pub line_count: usize,
    pub complexity: u32,
    pub quality: Quality,
    pub last_error: Option<String>,
    pub last_warning: Option<String>,
    pub last_success: Option<String>,
    /// Every error message, in line order
    pub errors: Vec<String>,
    /// Every warning message, in line order
    pub warnings: Vec<String>,
}

impl AnalysisResult {
    pub fn from_findings(
        errors: Vec<String>,
        warnings: Vec<String>,
        line_count: usize,
        complexity: u32,
    ) -> Self {
        let error_count = errors.len();
        let warning_count = warnings.len();
        let has_errors = error_count > 0;

        let last_success = if !has_errors && line_count > 0 {
            Some(SUCCESS_MESSAGE.to_string())
        } else {
            None
        };

        Self {
            has_errors,
            error_count,
            has_warnings: warning_count > 0,
            warning_count,
            line_count,
            complexity,
            quality: Quality::classify(error_count, complexity, line_count),
            last_error: errors.first().cloned(),
            last_warning: warnings.first().cloned(),
            last_success,
            errors,
            warnings,
        }
    }

    /// Whether this result differs from `previous` in a way worth announcing.
    ///
    /// Only `has_errors`, `error_count` and `line_count` count; complexity,
    /// quality and warnings alone never do.
    pub fn differs_materially(&self, previous: &AnalysisResult) -> bool {
        self.has_errors != previous.has_errors
            || self.error_count != previous.error_count
            || self.line_count != previous.line_count
    }
}

/// Short label driving the buddy's expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    /// Nothing analyzed yet
    #[default]
    Idle,
    Happy,
    Concerned,
    Frustrated,
}

impl Emotion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Idle => "idle",
            Emotion::Happy => "happy",
            Emotion::Concerned => "concerned",
            Emotion::Frustrated => "frustrated",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emotion plus the human-readable reason for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionState {
    pub emotion: Emotion,
    pub reason: String,
}

impl EmotionState {
    pub fn new(emotion: Emotion, reason: impl Into<String>) -> Self {
        Self {
            emotion,
            reason: reason.into(),
        }
    }
}

impl Default for EmotionState {
    fn default() -> Self {
        Self::new(Emotion::Idle, "Waiting for some code to look at")
    }
}

/// What happened to a document in the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentEventKind {
    /// The document became the active one
    Activated,
    /// The document's text was edited
    Changed,
    /// The document was written to disk
    Saved,
}

/// Buffer event delivered by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEvent {
    pub kind: DocumentEventKind,
    /// Stable identity, usually the file path
    pub identity: String,
    /// Language tag reported by the host, if any
    pub language: Option<String>,
    /// Full current text content
    pub text: String,
}

impl DocumentEvent {
    pub fn new(
        kind: DocumentEventKind,
        identity: impl Into<String>,
        language: Option<&str>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            identity: identity.into(),
            language: language.map(str::to_string),
            text: text.into(),
        }
    }

    pub fn activated(identity: impl Into<String>, language: Option<&str>, text: impl Into<String>) -> Self {
        Self::new(DocumentEventKind::Activated, identity, language, text)
    }

    pub fn changed(identity: impl Into<String>, language: Option<&str>, text: impl Into<String>) -> Self {
        Self::new(DocumentEventKind::Changed, identity, language, text)
    }

    pub fn saved(identity: impl Into<String>, language: Option<&str>, text: impl Into<String>) -> Self {
        Self::new(DocumentEventKind::Saved, identity, language, text)
    }
}
