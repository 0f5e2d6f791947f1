use crate::egui_app::ui::style;
use egui::Color32;

const MAX_LOG_ENTRIES: usize = 50;

/// Severity of the message shown in the footer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Idle,
    Info,
    Warning,
    Error,
}

impl StatusTone {
    pub fn label(self) -> &'static str {
        match self {
            StatusTone::Idle => "Idle",
            StatusTone::Info => "Info",
            StatusTone::Warning => "Warning",
            StatusTone::Error => "Error",
        }
    }
}

/// Status badge + text shown in the footer.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusBarState {
    pub text: String,
    pub tone: StatusTone,
    pub badge_label: String,
    pub badge_color: Color32,
    /// Rolling status log entries, oldest first.
    pub log: Vec<String>,
}

impl StatusBarState {
    /// Status shown before anyone signs in.
    pub fn idle() -> Self {
        Self {
            text: "Sign in to explore the model".into(),
            tone: StatusTone::Idle,
            badge_label: StatusTone::Idle.label().into(),
            badge_color: style::status_badge_color(StatusTone::Idle),
            log: Vec::new(),
        }
    }

    pub fn set(&mut self, text: impl Into<String>, tone: StatusTone) {
        self.text = text.into();
        self.tone = tone;
        self.badge_label = tone.label().into();
        self.badge_color = style::status_badge_color(tone);
        if tone != StatusTone::Idle {
            self.log.push(format!("[{}] {}", self.badge_label, self.text));
            if self.log.len() > MAX_LOG_ENTRIES {
                let excess = self.log.len() - MAX_LOG_ENTRIES;
                self.log.drain(..excess);
            }
        }
    }

    pub fn log_text(&self) -> String {
        self.log.join("\n")
    }
}
