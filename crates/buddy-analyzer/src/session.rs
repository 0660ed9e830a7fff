//! Event-driven session tying the analyzer, cache and selector together

use buddy_core::{
    is_target_document, AnalysisResult, DocumentEvent, DocumentEventKind, EmotionListener,
    EmotionState,
};
use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, info};

use crate::analyzer::DocumentAnalyzer;
use crate::cache::ResultCache;
use crate::emotion::{select_emotion, EmotionSelector};

/// Single-threaded watcher session.
///
/// Each event is analyzed to completion before the next is handled. A
/// stopped session ignores events entirely.
#[derive(Debug)]
pub struct BuddySession {
    analyzer: DocumentAnalyzer,
    selector: EmotionSelector,
    running: bool,
}

impl BuddySession {
    /// New, stopped session
    pub fn new(analyzer: DocumentAnalyzer, selector: EmotionSelector) -> Self {
        Self {
            analyzer,
            selector,
            running: false,
        }
    }

    /// Session with the default analyzer reporting to `listener`
    pub fn with_listener(listener: impl EmotionListener + 'static) -> Self {
        Self::new(DocumentAnalyzer::new(), EmotionSelector::with_listener(listener))
    }

    /// Start handling events. Returns `false` if already running.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        info!("buddy session started");
        true
    }

    /// Stop handling events. Returns `false` if already stopped.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        info!("buddy session stopped");
        true
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_listener(&mut self, listener: impl EmotionListener + 'static) {
        self.selector.set_listener(listener);
    }

    /// Handle one host event.
    ///
    /// Returns the emotion announced to the listener, if any. Events for
    /// other languages, events while stopped, suppressed updates and
    /// analyzer faults all yield `None`.
    pub fn handle_event(&mut self, event: &DocumentEvent) -> Option<EmotionState> {
        if !self.running {
            debug!(identity = %event.identity, "session stopped, ignoring event");
            return None;
        }

        if !is_target_document(event.language.as_deref(), &event.identity) {
            debug!(identity = %event.identity, language = ?event.language, "not a target document");
            return None;
        }

        let analyzer = &mut self.analyzer;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            analyzer.analyze_document(&event.identity, &event.text)
        }));

        match outcome {
            Ok(analysis) => {
                if event.kind == DocumentEventKind::Activated {
                    info!(identity = %event.identity, "active document changed");
                    self.analyzer.activate(&event.identity);
                }
                self.selector.process(&analysis)
            }
            Err(payload) => {
                // The default panic hook has already written the raw panic to
                // stderr; this is the structured record of it.
                error!(
                    identity = %event.identity,
                    fault = %panic_message(payload.as_ref()),
                    "analysis failed, keeping previous result"
                );
                None
            }
        }
    }

    /// Emotion for the active document's latest result, without suppression
    pub fn current_emotion(&self) -> Option<EmotionState> {
        let identity = self.cache().active_identity()?;
        let result = self.cache().get(identity)?;
        Some(select_emotion(result, identity))
    }

    pub fn latest_for_active(&self) -> Option<&AnalysisResult> {
        self.cache().latest_for_active()
    }

    pub fn active_identity(&self) -> Option<&str> {
        self.cache().active_identity()
    }

    pub fn snapshot(&self) -> BTreeMap<String, AnalysisResult> {
        self.cache().snapshot()
    }

    pub fn cache(&self) -> &ResultCache {
        self.analyzer.cache()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buddy_core::Emotion;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn running_session() -> (BuddySession, Rc<RefCell<Vec<EmotionState>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut session =
            BuddySession::with_listener(move |state: &EmotionState| sink.borrow_mut().push(state.clone()));
        session.start();
        (session, seen)
    }

    fn exploding_engine(text: &str) -> AnalysisResult {
        if text.contains("boom") {
            panic!("engine fault");
        }
        crate::analyze_text(text)
    }

    #[test]
    fn test_start_and_stop_are_idempotent() {
        let mut session = BuddySession::new(DocumentAnalyzer::new(), EmotionSelector::new());
        assert!(!session.is_running());
        assert!(session.start());
        assert!(!session.start());
        assert!(session.stop());
        assert!(!session.stop());
    }

    #[test]
    fn test_stopped_session_ignores_events() {
        let (mut session, seen) = running_session();
        session.stop();

        let announced = session.handle_event(&DocumentEvent::changed("app.py", None, "x = 1"));

        assert!(announced.is_none());
        assert!(session.cache().is_empty());
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_other_languages_are_ignored() {
        let (mut session, seen) = running_session();

        session.handle_event(&DocumentEvent::activated("main.rs", Some("rust"), "fn main() {}"));

        assert!(session.cache().is_empty());
        assert!(session.active_identity().is_none());
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_language_tag_or_suffix_selects_documents() {
        let (mut session, _) = running_session();

        session.handle_event(&DocumentEvent::changed("Untitled-1", Some("python"), "x = 1"));
        session.handle_event(&DocumentEvent::saved("tool.py", None, "y = 2"));

        assert_eq!(session.cache().len(), 2);
    }

    #[test]
    fn test_activation_tracks_active_document() {
        let (mut session, seen) = running_session();

        session.handle_event(&DocumentEvent::activated("a.py", None, "x = 1\ny = 2"));
        session.handle_event(&DocumentEvent::changed("b.py", None, "z = 3"));

        assert_eq!(session.active_identity(), Some("a.py"));
        assert_eq!(session.latest_for_active().map(|r| r.line_count), Some(2));
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_unchanged_edit_is_suppressed() {
        let (mut session, seen) = running_session();

        session.handle_event(&DocumentEvent::changed("app.py", None, "x = 1"));
        let announced = session.handle_event(&DocumentEvent::changed("app.py", None, "x = 1   "));

        assert!(announced.is_none());
        assert_eq!(seen.borrow().len(), 1);
        assert!(session.latest_for_active().is_none());
        assert_eq!(session.cache().get("app.py").map(|r| r.warning_count), Some(1));
    }

    #[test]
    fn test_fault_keeps_previous_entry_and_skips_emotion() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut session = BuddySession::new(
            DocumentAnalyzer::with_engine(exploding_engine),
            EmotionSelector::with_listener(move |state: &EmotionState| {
                sink.borrow_mut().push(state.clone())
            }),
        );
        session.start();

        session.handle_event(&DocumentEvent::activated("app.py", None, "x = 1"));
        let announced = session.handle_event(&DocumentEvent::changed("app.py", None, "boom\nmore"));

        assert!(announced.is_none());
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(session.latest_for_active().map(|r| r.line_count), Some(1));

        // The next edit simply retries.
        let recovered = session.handle_event(&DocumentEvent::changed("app.py", None, "x = 1\ny = 2"));
        assert_eq!(recovered.map(|s| s.emotion), Some(Emotion::Happy));
    }

    #[test]
    fn test_failed_activation_keeps_previous_active_document() {
        let mut session = BuddySession::new(
            DocumentAnalyzer::with_engine(exploding_engine),
            EmotionSelector::new(),
        );
        session.start();

        session.handle_event(&DocumentEvent::activated("a.py", None, "x = 1"));
        session.handle_event(&DocumentEvent::activated("b.py", None, "boom"));

        assert_eq!(session.active_identity(), Some("a.py"));
        assert_eq!(session.latest_for_active().map(|r| r.line_count), Some(1));
        assert!(session.cache().get("b.py").is_none());
    }

    #[test]
    fn test_registering_listener_replaces_previous_one() {
        let (mut session, first) = running_session();
        let second = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&second);
        session.set_listener(move |state: &EmotionState| sink.borrow_mut().push(state.clone()));

        session.handle_event(&DocumentEvent::activated("a.py", None, "x = 1"));

        assert!(first.borrow().is_empty());
        assert_eq!(second.borrow().len(), 1);
    }

    #[test]
    fn test_current_emotion_ignores_suppression() {
        let (mut session, _) = running_session();
        assert!(session.current_emotion().is_none());

        session.handle_event(&DocumentEvent::activated("a.py", None, "if x\n"));
        session.handle_event(&DocumentEvent::activated("b.py", None, "y = 1\n"));
        session.handle_event(&DocumentEvent::activated("a.py", None, "if x\n"));

        let current = session.current_emotion().map(|s| s.emotion);
        assert_eq!(current, Some(Emotion::Frustrated));
    }

    #[test]
    fn test_panic_message_extraction() {
        let text: Box<dyn Any + Send> = Box::new("static text");
        assert_eq!(panic_message(text.as_ref()), "static text");

        let owned: Box<dyn Any + Send> = Box::new(String::from("owned text"));
        assert_eq!(panic_message(owned.as_ref()), "owned text");

        let other: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(other.as_ref()), "unknown panic");
    }
}
