//! Terminal shell for buddybot
//!
//! Everything here sits outside the analysis engine: configuration, the
//! status panel, the hydration reminder, and a polling file watcher that
//! feeds document events into a [`BuddySession`](buddy_analyzer::BuddySession).

mod app;
mod commands;
mod config;
mod panel;
mod reminder;
mod ui;
mod watcher;


pub use app::{analyze_once, BuddyApp, Flow};
pub use commands::ShellCommand;
pub use config::{BuddyConfig, DEFAULT_POLL_MS, DEFAULT_REMINDER_MINUTES};
pub use panel::{face, StatusPanel, MIN_PANEL_WIDTH};
pub use reminder::{HydrationReminder, Notification, RecurringTask, HYDRATION_MESSAGES};
pub use ui::{display_banner, print_help, print_notification, print_panel};
pub use watcher::{identity_for, read_document, FileWatcher};

// Re-export core types
pub use buddy_core::{Error, Result};
