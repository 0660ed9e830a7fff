//! Per-line heuristic checks
//!
//! These are string and regex predicates, not a Python parser. They are
//! deliberately crude and must stay that way: downstream behaviour (the
//! buddy's mood) is tuned against exactly these heuristics.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Lines longer than this many characters earn a warning
pub const MAX_LINE_LENGTH: usize = 120;

/// Leading whitespace wider than this adds to complexity
pub const DEEP_INDENT_WIDTH: usize = 8;

static CONSTRUCT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(def|if|for|while) ").expect("construct regex is valid"));

static NOTE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(TODO|FIXME)\b").expect("note marker regex is valid"));

static MIXED_INDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\t+ | +\t)").expect("mixed indent regex is valid"));

/// Block-opening construct that needs a trailing colon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construct {
    FunctionDefinition,
    IfStatement,
    ForLoop,
    WhileLoop,
}

impl Construct {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "def" => Some(Construct::FunctionDefinition),
            "if" => Some(Construct::IfStatement),
            "for" => Some(Construct::ForLoop),
            "while" => Some(Construct::WhileLoop),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Construct::FunctionDefinition => "function definition",
            Construct::IfStatement => "if statement",
            Construct::ForLoop => "for loop",
            Construct::WhileLoop => "while loop",
        }
    }
}

/// A single heuristic finding on one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineIssue {
    UnclosedPrint,
    MissingColon(Construct),
    TryWithoutExcept,
    UnmatchedQuotes,
    PossibleUndefinedVariable,
    LineTooLong,
    TrailingWhitespace,
    /// `TODO` or `FIXME`, whichever appears first
    Note(&'static str),
    TabIndentation,
    MixedIndentation,
}

impl LineIssue {
    /// Format as `Line {n}: {description}` for a 1-based line number
    pub fn message(&self, line_number: usize) -> String {
        format!("Line {line_number}: {self}")
    }
}

impl fmt::Display for LineIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineIssue::UnclosedPrint => f.write_str("missing closing parenthesis in print statement"),
            LineIssue::MissingColon(construct) => {
                write!(f, "missing colon after {}", construct.description())
            }
            LineIssue::TryWithoutExcept => f.write_str("try block without matching except"),
            LineIssue::UnmatchedQuotes => f.write_str("unmatched quotes"),
            LineIssue::PossibleUndefinedVariable => f.write_str("possible undefined variable usage"),
            LineIssue::LineTooLong => write!(f, "line exceeds {MAX_LINE_LENGTH} characters"),
            LineIssue::TrailingWhitespace => f.write_str("trailing whitespace"),
            LineIssue::Note(marker) => write!(f, "contains {marker} note"),
            LineIssue::TabIndentation => f.write_str("uses tab indentation"),
            LineIssue::MixedIndentation => f.write_str("mixed indentation"),
        }
    }
}

/// Everything the classifier has to say about one physical line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineReport {
    /// 1-based line number
    pub line_number: usize,
    pub errors: Vec<LineIssue>,
    pub warnings: Vec<LineIssue>,
    /// Zero for blank lines
    pub complexity: u32,
}

impl LineReport {
    pub fn error_messages(&self) -> impl Iterator<Item = String> + '_ {
        self.errors.iter().map(|issue| issue.message(self.line_number))
    }

    pub fn warning_messages(&self) -> impl Iterator<Item = String> + '_ {
        self.warnings.iter().map(|issue| issue.message(self.line_number))
    }
}

/// Classify the line at `index` (0-based) of `lines`.
///
/// The full line list is needed because the `try:` check looks ahead.
/// Blank lines are still checked for errors and warnings but never add
/// complexity.
pub fn classify_line(index: usize, lines: &[&str]) -> LineReport {
    let Some(line) = lines.get(index) else {
        return LineReport::default();
    };

    let complexity = if line.trim().is_empty() {
        0
    } else {
        complexity_contribution(line)
    };

    LineReport {
        line_number: index + 1,
        errors: detect_errors(index, lines),
        warnings: detect_warnings(line),
        complexity,
    }
}

/// Error predicates; each is independent and a line may trip several
pub fn detect_errors(index: usize, lines: &[&str]) -> Vec<LineIssue> {
    let mut issues = Vec::new();
    let Some(line) = lines.get(index).copied() else {
        return issues;
    };
    let trimmed = line.trim();

    if line.contains("print(") && !line.contains(')') {
        issues.push(LineIssue::UnclosedPrint);
    }

    if !trimmed.is_empty() && !line.contains(':') {
        if let Some(construct) = CONSTRUCT_TOKEN
            .captures(line)
            .and_then(|caps| Construct::from_keyword(&caps[1]))
        {
            issues.push(LineIssue::MissingColon(construct));
        }
    }

    if trimmed.starts_with("try:") && !has_matching_except(index, lines) {
        issues.push(LineIssue::TryWithoutExcept);
    }

    let single_quotes = line.chars().filter(|&c| c == '\'').count();
    let double_quotes = line.chars().filter(|&c| c == '"').count();
    if single_quotes % 2 != 0 || double_quotes % 2 != 0 {
        issues.push(LineIssue::UnmatchedQuotes);
    }

    // Crude on purpose: flags `x = y + undefined` style lines.
    if line.contains('=') && line.contains('+') && line.contains("undefined") {
        issues.push(LineIssue::PossibleUndefinedVariable);
    }

    issues
}

/// Scan forward from a `try:` line for an `except`, stopping at the next
/// `def`/`class` or the end of the buffer.
fn has_matching_except(try_index: usize, lines: &[&str]) -> bool {
    for line in lines.iter().skip(try_index + 1) {
        let trimmed = line.trim();
        if trimmed.starts_with("except") {
            return true;
        }
        if trimmed.starts_with("def ") || trimmed.starts_with("class ") {
            return false;
        }
    }
    false
}

/// Warning predicates for a single line
pub fn detect_warnings(line: &str) -> Vec<LineIssue> {
    let mut issues = Vec::new();
    let has_content = !line.trim().is_empty();

    if line.chars().count() > MAX_LINE_LENGTH {
        issues.push(LineIssue::LineTooLong);
    }

    if has_content && line.trim_end().len() != line.len() {
        issues.push(LineIssue::TrailingWhitespace);
    }

    if let Some(found) = NOTE_MARKER.find(line) {
        let marker = if found.as_str() == "FIXME" { "FIXME" } else { "TODO" };
        issues.push(LineIssue::Note(marker));
    }

    if line.starts_with('\t') {
        issues.push(LineIssue::TabIndentation);
    }

    if MIXED_INDENT.is_match(line) {
        issues.push(LineIssue::MixedIndentation);
    }

    issues
}

/// Weighted structural score of one non-blank line.
///
/// Contributions accumulate; a `for` line using `and` inside a deeply
/// indented block scores all three.
pub fn complexity_contribution(line: &str) -> u32 {
    let trimmed = line.trim();
    let mut score = 0;

    if trimmed.starts_with("if ") || trimmed.starts_with("elif ") {
        score += 1;
    }
    if trimmed.starts_with("for ") || trimmed.starts_with("while ") {
        score += 2;
    }
    if trimmed.starts_with("try:") || trimmed.starts_with("except ") {
        score += 1;
    }
    if trimmed.starts_with("def ") || trimmed.starts_with("class ") {
        score += 1;
    }
    if trimmed.contains(" and ") || trimmed.contains(" or ") {
        score += 1;
    }
    if trimmed.contains("lambda ") {
        score += 2;
    }

    let indent_width = line.chars().take_while(|c| c.is_whitespace()).count();
    if indent_width > DEEP_INDENT_WIDTH {
        score += 1;
    }

    score
}
