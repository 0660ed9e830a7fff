//! Observer seam between the emotion selector and whatever presents it

use crate::EmotionState;

/// Receives emotion updates worth showing to the user.
///
/// The selector holds at most one listener. Any `Fn(&EmotionState)` closure
/// is a listener, so hosts can register a channel sender or a panel update
/// without a dedicated type.
pub trait EmotionListener {
    /// Called at most once per triggering document event
    fn on_emotion(&self, state: &EmotionState);
}

impl<F> EmotionListener for F
where
    F: Fn(&EmotionState),
{
    fn on_emotion(&self, state: &EmotionState) {
        self(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Emotion;
    use std::cell::RefCell;

    #[test]
    fn test_closure_is_listener() {
        let seen = RefCell::new(Vec::new());
        let listener = |state: &EmotionState| seen.borrow_mut().push(state.emotion);

        listener.on_emotion(&EmotionState::new(Emotion::Happy, "clean"));
        listener.on_emotion(&EmotionState::new(Emotion::Frustrated, "broken"));

        assert_eq!(*seen.borrow(), vec![Emotion::Happy, Emotion::Frustrated]);
    }
}
