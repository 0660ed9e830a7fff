//! Maps analysis results to the buddy's mood

use buddy_core::{basename, AnalysisResult, Emotion, EmotionListener, EmotionState};
use tracing::debug;

use crate::analyzer::DocumentAnalysis;

/// Pick the emotion and reason for `result` of document `identity`
pub fn select_emotion(result: &AnalysisResult, identity: &str) -> EmotionState {
    let name = basename(identity);

    if result.has_errors {
        EmotionState::new(
            Emotion::Frustrated,
            format!("Found {} syntax error(s) in {}", result.error_count, name),
        )
    } else if result.has_warnings {
        EmotionState::new(Emotion::Concerned, format!("Warnings detected in {name}"))
    } else if result.line_count == 0 {
        EmotionState::new(Emotion::Happy, "Empty file - ready to start coding!")
    } else {
        EmotionState::new(
            Emotion::Happy,
            format!("Great code! {} lines written, no errors found", result.line_count),
        )
    }
}

/// Whether `result` is worth announcing given the document's previous result.
///
/// First results always are. After that only error state and non-blank
/// line count matter, so cosmetic edits do not make the panel flicker.
pub fn should_announce(result: &AnalysisResult, previous: Option<&AnalysisResult>) -> bool {
    match previous {
        None => true,
        Some(previous) => result.differs_materially(previous),
    }
}

/// Decides which analyses reach the single registered listener
#[derive(Default)]
pub struct EmotionSelector {
    listener: Option<Box<dyn EmotionListener>>,
}

impl EmotionSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listener(listener: impl EmotionListener + 'static) -> Self {
        Self {
            listener: Some(Box::new(listener)),
        }
    }

    /// Replace the registered listener
    pub fn set_listener(&mut self, listener: impl EmotionListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Announce `analysis` unless it is suppressed.
    ///
    /// Returns the state that was announced. Without a listener the state is
    /// still returned but nobody hears about it.
    pub fn process(&self, analysis: &DocumentAnalysis) -> Option<EmotionState> {
        if !should_announce(&analysis.result, analysis.previous.as_ref()) {
            debug!(identity = %analysis.identity, "no material change, emotion suppressed");
            return None;
        }

        let state = select_emotion(&analysis.result, &analysis.identity);
        if let Some(listener) = &self.listener {
            listener.on_emotion(&state);
        }
        Some(state)
    }
}

impl std::fmt::Debug for EmotionSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmotionSelector")
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}
