//! Status panel state and text layout

use buddy_core::{basename, AnalysisResult, Emotion, EmotionState};
use chrono::{DateTime, Local};

/// Narrowest panel ever drawn, in columns
pub const MIN_PANEL_WIDTH: usize = 32;

/// Character face for each emotion
pub fn face(emotion: Emotion) -> &'static str {
    match emotion {
        Emotion::Idle => "(-_-) zzz",
        Emotion::Happy => "(^_^)",
        Emotion::Concerned => "(o_o)",
        Emotion::Frustrated => "(>_<)",
    }
}

/// What the buddy currently shows.
///
/// Emotion updates arrive from the selector; whether they may re-show a
/// hidden panel is the `reveal_on_update` policy.
#[derive(Debug, Clone)]
pub struct StatusPanel {
    state: EmotionState,
    document: Option<String>,
    result: Option<AnalysisResult>,
    visible: bool,
    reveal_on_update: bool,
    updated_at: Option<DateTime<Local>>,
}

impl StatusPanel {
    /// Hidden panel showing the idle face
    pub fn new(reveal_on_update: bool) -> Self {
        Self {
            state: EmotionState::default(),
            document: None,
            result: None,
            visible: false,
            reveal_on_update,
            updated_at: None,
        }
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn state(&self) -> &EmotionState {
        &self.state
    }

    pub fn updated_at(&self) -> Option<DateTime<Local>> {
        self.updated_at
    }

    /// Record a new emotion; returns whether the panel should be redrawn.
    ///
    /// A hidden panel only comes back when `reveal_on_update` is set.
    pub fn apply_emotion(&mut self, state: EmotionState) -> bool {
        self.state = state;
        self.updated_at = Some(Local::now());

        if !self.visible && self.reveal_on_update {
            self.visible = true;
        }
        self.visible
    }

    /// Attach the document the details section describes
    pub fn set_document(&mut self, identity: Option<&str>, result: Option<AnalysisResult>) {
        self.document = identity.map(str::to_string);
        self.result = result;
    }

    /// Plain-text rows of the panel, `width` columns wide including borders
    pub fn render_lines(&self, width: usize) -> Vec<String> {
        let width = width.max(MIN_PANEL_WIDTH);
        let inner = width - 4;

        let mut body = vec![
            format!("{}  {}", face(self.state.emotion), self.state.emotion),
            self.state.reason.clone(),
        ];

        if let Some(result) = &self.result {
            let name = self.document.as_deref().map(basename).unwrap_or("untitled");
            body.push(format!(
                "{} | {} lines | complexity {} | {}",
                name, result.line_count, result.complexity, result.quality
            ));
            if let Some(success) = &result.last_success {
                body.push(format!("ok   {success}"));
            }
            if let Some(error) = &result.last_error {
                body.push(format!("err  {error}"));
            }
            if let Some(warning) = &result.last_warning {
                body.push(format!("warn {warning}"));
            }
        }

        let mut lines = Vec::with_capacity(body.len() + 2);
        lines.push(format!("┌{}┐", "─".repeat(width - 2)));
        for row in body {
            lines.push(format!("│ {} │", fit(&row, inner)));
        }
        lines.push(format!("└{}┘", "─".repeat(width - 2)));
        lines
    }
}

/// Pad or truncate `text` to exactly `width` characters
fn fit(text: &str, width: usize) -> String {
    let length = text.chars().count();
    if length <= width {
        return format!("{text}{}", " ".repeat(width - length));
    }

    let keep = width.saturating_sub(3);
    let truncated: String = text.chars().take(keep).collect();
    format!("{truncated}{}", ".".repeat(width - keep))
}
