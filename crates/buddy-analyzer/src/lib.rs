//! Heuristic code-quality engine for buddybot
//!
//! Pipeline, leaves first:
//!
//! - [`classifier`]: per-line error, warning and complexity heuristics
//! - [`analyzer`]: whole-buffer aggregation into an [`AnalysisResult`]
//! - [`cache`]: latest result per document identity
//! - [`emotion`]: result-to-emotion mapping with change suppression
//! - [`session`]: host event filtering and fault isolation

pub mod analyzer;
pub mod cache;
pub mod classifier;
pub mod emotion;
pub mod session;


pub use analyzer::{analyze_text, split_lines, AnalysisEngine, DocumentAnalysis, DocumentAnalyzer};
pub use cache::ResultCache;
pub use classifier::{classify_line, Construct, LineIssue, LineReport, MAX_LINE_LENGTH};
pub use emotion::{select_emotion, should_announce, EmotionSelector};
pub use session::BuddySession;

// Re-export core types for convenience
pub use buddy_core::{
    AnalysisResult, DocumentEvent, DocumentEventKind, Emotion, EmotionListener, EmotionState,
    Error, Quality, Result,
};
