//! Whole-buffer analysis

use buddy_core::AnalysisResult;
use tracing::debug;

use crate::cache::ResultCache;
use crate::classifier::classify_line;

/// Split a buffer into physical lines on `\n`, dropping one trailing `\r`.
///
/// No other trimming happens here so line numbers match the editor.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Analyze a text buffer. Total over any input; never fails.
pub fn analyze_text(text: &str) -> AnalysisResult {
    let lines = split_lines(text);

    let line_count = lines.iter().filter(|line| !line.trim().is_empty()).count();

    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut complexity = 0u32;

    for index in 0..lines.len() {
        let report = classify_line(index, &lines);
        errors.extend(report.error_messages());
        warnings.extend(report.warning_messages());
        complexity = complexity.saturating_add(report.complexity);
    }

    AnalysisResult::from_findings(errors, warnings, line_count, complexity)
}

/// Outcome of analyzing one document, with the entry it replaced
#[derive(Debug, Clone)]
pub struct DocumentAnalysis {
    pub identity: String,
    pub result: AnalysisResult,
    /// Cached result from before this analysis, read before overwriting
    pub previous: Option<AnalysisResult>,
}

/// Buffer-to-result function used by a [`DocumentAnalyzer`]
pub type AnalysisEngine = fn(&str) -> AnalysisResult;

/// Runs an [`AnalysisEngine`] per document and owns the [`ResultCache`]
#[derive(Debug)]
pub struct DocumentAnalyzer {
    engine: AnalysisEngine,
    cache: ResultCache,
}

impl DocumentAnalyzer {
    /// Analyzer backed by the line heuristics in [`analyze_text`]
    pub fn new() -> Self {
        Self::with_engine(analyze_text)
    }

    pub fn with_engine(engine: AnalysisEngine) -> Self {
        Self {
            engine,
            cache: ResultCache::new(),
        }
    }

    /// Analyze `text` for `identity` and record the result.
    ///
    /// The cache is only written once the analysis has completed, so a fault
    /// part-way through leaves the previous entry intact.
    pub fn analyze_document(&mut self, identity: &str, text: &str) -> DocumentAnalysis {
        let result = (self.engine)(text);

        debug!(
            identity,
            errors = result.error_count,
            warnings = result.warning_count,
            lines = result.line_count,
            complexity = result.complexity,
            quality = %result.quality,
            "analyzed document"
        );

        let previous = self.cache.store(identity, result.clone());

        DocumentAnalysis {
            identity: identity.to_string(),
            result,
            previous,
        }
    }

    /// Mark `identity` as the active document
    pub fn activate(&mut self, identity: &str) {
        self.cache.set_active(identity);
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }
}

impl Default for DocumentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buddy_core::{Quality, SUCCESS_MESSAGE};

    #[test]
    fn test_empty_buffer() {
        let result = analyze_text("");

        assert_eq!(result.line_count, 0);
        assert_eq!(result.error_count, 0);
        assert_eq!(result.warning_count, 0);
        assert_eq!(result.complexity, 0);
        assert_eq!(result.quality, Quality::NeedsWork);
        assert_eq!(result.last_success, None);
    }

    #[test]
    fn test_blank_lines_are_not_counted() {
        let result = analyze_text("\n\n\n");
        assert_eq!(result.line_count, 0);
        assert_eq!(result.quality, Quality::NeedsWork);
    }

    #[test]
    fn test_missing_colon_scenario() {
        let result = analyze_text("def foo(\n    print(1)\n");

        assert!(result.has_errors);
        assert_eq!(result.error_count, 1);
        assert_eq!(
            result.last_error.as_deref(),
            Some("Line 1: missing colon after function definition")
        );
        assert_eq!(result.line_count, 2);
    }

    #[test]
    fn test_long_line_scenario() {
        let result = analyze_text(&"a".repeat(130));

        assert!(!result.has_errors);
        assert_eq!(result.warning_count, 1);
        assert_eq!(
            result.last_warning.as_deref(),
            Some("Line 1: line exceeds 120 characters")
        );
        assert_eq!(result.last_success.as_deref(), Some(SUCCESS_MESSAGE));
    }

    #[test]
    fn test_try_without_except_scenario() {
        let result = analyze_text("try:\n    pass\n");

        assert!(result.has_errors);
        assert_eq!(
            result.errors,
            vec!["Line 1: try block without matching except".to_string()]
        );
    }

    #[test]
    fn test_clean_simple_file_is_good() {
        let source = "def greet(name):\n    return 'hi ' + name\n\nprint(greet('bot'))\n";
        let result = analyze_text(source);

        assert!(!result.has_errors);
        assert!(!result.has_warnings);
        assert_eq!(result.line_count, 3);
        assert_eq!(result.complexity, 1);
        assert_eq!(result.quality, Quality::Good);
    }

    #[test]
    fn test_complex_clean_file_is_improving() {
        let source = "\
def walk(items):
    for item in items:
        while item:
            if item and ready:
                item -= 1
            elif item or waiting:
                item = 0
";
        let result = analyze_text(source);

        assert!(!result.has_errors);
        // def 1, for 2, while 2, if 1 + and 1, elif 1 + or 1, four lines deeper than 8 columns
        assert_eq!(result.complexity, 13);
        assert_eq!(result.quality, Quality::Improving);
    }

    #[test]
    fn test_messages_keep_line_order() {
        let source = "x = 'a\nif y\n";
        let result = analyze_text(source);

        assert_eq!(
            result.errors,
            vec![
                "Line 1: unmatched quotes".to_string(),
                "Line 2: missing colon after if statement".to_string(),
            ]
        );
        assert_eq!(result.last_error.as_deref(), Some("Line 1: unmatched quotes"));
    }

    #[test]
    fn test_crlf_does_not_count_as_trailing_whitespace() {
        let result = analyze_text("x = 1\r\ny = 2\r\n");
        assert!(!result.has_warnings);
        assert_eq!(result.line_count, 2);
    }

    #[test]
    fn test_counts_match_message_lists() {
        let source = "\tif x\n# TODO later   \nprint('a'\n";
        let result = analyze_text(source);

        assert_eq!(result.error_count, result.errors.len());
        assert_eq!(result.warning_count, result.warnings.len());
        assert_eq!(result.has_errors, result.error_count > 0);
        assert_eq!(result.has_warnings, result.warning_count > 0);
    }

    #[test]
    fn test_analyze_document_reports_previous() {
        let mut analyzer = DocumentAnalyzer::new();

        let first = analyzer.analyze_document("app.py", "x = 1\n");
        assert!(first.previous.is_none());

        let second = analyzer.analyze_document("app.py", "x = 1\ny = 2\n");
        assert_eq!(second.previous.map(|r| r.line_count), Some(1));
        assert_eq!(analyzer.cache().get("app.py").map(|r| r.line_count), Some(2));
    }

    #[test]
    fn test_reanalysis_is_idempotent() {
        let mut analyzer = DocumentAnalyzer::new();
        let source = "def f():\n    return 1  \n";

        let first = analyzer.analyze_document("f.py", source);
        let second = analyzer.analyze_document("f.py", source);

        assert_eq!(first.result, second.result);
        assert_eq!(second.previous, Some(first.result));
    }

    #[test]
    fn test_binary_like_input_is_analyzed() {
        let text = String::from_utf8_lossy(&[0xff, 0xfe, b'\n', b'x']).into_owned();
        let result = analyze_text(&text);
        assert_eq!(result.line_count, 2);
    }
}
