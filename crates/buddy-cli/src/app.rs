//! Interactive buddybot application loop

use buddy_analyzer::{analyze_text, BuddySession, EmotionState};
use buddy_core::{Error, Result};
use colored::*;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tracing::{debug, info, warn};

use crate::commands::ShellCommand;
use crate::config::BuddyConfig;
use crate::panel::StatusPanel;
use crate::reminder::{HydrationReminder, Notification};
use crate::ui::{print_help, print_notification, print_panel};
use crate::watcher::{identity_for, read_document, FileWatcher};

/// Whether the loop keeps going after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

enum Step {
    Input(Option<String>),
    Poll,
    Emotion(EmotionState),
    Reminder(Notification),
}

/// Ties the session, panel, watcher and reminder together
pub struct BuddyApp {
    config: BuddyConfig,
    session: BuddySession,
    panel: StatusPanel,
    watcher: FileWatcher,
    reminder: Option<HydrationReminder>,
    active_path: Option<PathBuf>,
    emotions: UnboundedReceiver<EmotionState>,
    notifications: UnboundedReceiver<Notification>,
}

impl BuddyApp {
    /// Build the app for `files`; the first one becomes the active document
    pub fn new(config: BuddyConfig, files: Vec<PathBuf>) -> Self {
        let (emotion_tx, emotions) = unbounded_channel();
        let session = BuddySession::with_listener(move |state: &EmotionState| {
            // The receiver only disappears on shutdown.
            let _ = emotion_tx.send(state.clone());
        });

        let (notification_tx, notifications) = unbounded_channel();
        let reminder = config
            .reminder_interval
            .map(|interval| HydrationReminder::new(interval, notification_tx));

        let mut watcher = FileWatcher::new();
        for path in files.iter().skip(1) {
            watcher.watch(path.clone());
        }

        Self {
            panel: StatusPanel::new(config.reveal_on_update),
            config,
            session,
            watcher,
            reminder,
            active_path: files.into_iter().next(),
            emotions,
            notifications,
        }
    }

    pub fn session(&self) -> &BuddySession {
        &self.session
    }

    pub fn panel(&self) -> &StatusPanel {
        &self.panel
    }

    /// Start the session. Returns `false` if it was already running.
    pub async fn start(&mut self) -> Result<bool> {
        if !self.session.start() {
            return Ok(false);
        }

        if let Some(reminder) = self.reminder.as_mut() {
            reminder.start();
        }
        self.panel.show();
        info!(files = self.watcher.len(), "buddy app started");

        if let Some(path) = self.active_path.clone() {
            self.open(&path).await?;
        }
        Ok(true)
    }

    /// Stop the session and its reminder. Returns `false` if already stopped.
    pub fn stop(&mut self) -> bool {
        if let Some(reminder) = self.reminder.as_mut() {
            reminder.stop();
        }
        self.panel.hide();
        self.session.stop()
    }

    /// Make `path` the active document and refresh the panel
    pub async fn open(&mut self, path: &Path) -> Result<()> {
        if !self.session.is_running() {
            return Err(Error::InvalidInput(
                "session is stopped; type 'start' first".to_string(),
            ));
        }

        let event = self.watcher.activate(path).await?;
        self.active_path = Some(path.to_path_buf());

        // An unchanged file produces no announcement, but the panel still has
        // to switch to the newly active document.
        if self.session.handle_event(&event).is_none() {
            if let Some(state) = self.session.current_emotion() {
                self.show_emotion(state);
            }
        }
        Ok(())
    }

    /// Check watched files and feed any changes to the session
    pub async fn poll_files(&mut self) {
        if !self.session.is_running() {
            return;
        }
        for event in self.watcher.poll().await {
            self.session.handle_event(&event);
        }
    }

    /// Redraw the panel for an announced emotion.
    ///
    /// Announcements for watched files other than the active one, and ones
    /// already superseded by a newer result, do not match the active
    /// document's emotion and leave the panel untouched.
    fn show_emotion(&mut self, state: EmotionState) {
        if self.session.current_emotion().as_ref() != Some(&state) {
            debug!(reason = %state.reason, "emotion does not describe the active document");
            return;
        }

        self.panel.set_document(
            self.session.active_identity(),
            self.session.latest_for_active().cloned(),
        );
        if self.panel.apply_emotion(state) {
            print_panel(&self.panel);
        }
    }

    /// Run one shell command
    pub async fn handle_command(&mut self, command: ShellCommand) -> Result<Flow> {
        match command {
            ShellCommand::Start => {
                if !self.start().await? {
                    println!("{} Buddy is already watching", "ℹ️".blue());
                }
            }
            ShellCommand::Stop => {
                if self.stop() {
                    println!("{} Buddy is taking a nap. Type 'start' to wake it up.", "😴".blue());
                } else {
                    println!("{} Buddy is already asleep", "ℹ️".blue());
                }
            }
            ShellCommand::Status => match self.session.latest_for_active() {
                Some(result) => {
                    let mut panel = self.panel.clone();
                    panel.set_document(self.session.active_identity(), Some(result.clone()));
                    print_panel(&panel);
                }
                None => println!("{} No analysis yet", "ℹ️".blue()),
            },
            ShellCommand::StatusAll => {
                let json = serde_json::to_string_pretty(&self.session.snapshot())?;
                println!("{json}");
            }
            ShellCommand::Open(path) => {
                if let Err(e) = self.open(&path).await {
                    println!("{} Cannot open {}: {}", "❌".red(), path.display(), e);
                }
            }
            ShellCommand::Help => print_help(),
            ShellCommand::Exit => return Ok(Flow::Exit),
            ShellCommand::Empty => {}
            ShellCommand::Unknown(input) => {
                println!("{} Unknown command '{}'. Type 'help' for a list.", "⚠️".yellow(), input);
            }
        }
        Ok(Flow::Continue)
    }

    /// Interactive loop over stdin commands, file polls, emotions and reminders
    pub async fn run(mut self) -> Result<()> {
        self.start().await?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut ticker = tokio::time::interval(self.config.poll_interval);

        loop {
            let step = tokio::select! {
                line = lines.next_line() => Step::Input(line?),
                _ = ticker.tick() => Step::Poll,
                Some(state) = self.emotions.recv() => Step::Emotion(state),
                Some(notification) = self.notifications.recv() => Step::Reminder(notification),
            };

            match step {
                Step::Input(None) => break,
                Step::Input(Some(line)) => {
                    if self.handle_command(ShellCommand::parse(&line)).await? == Flow::Exit {
                        break;
                    }
                }
                Step::Poll => self.poll_files().await,
                Step::Emotion(state) => self.show_emotion(state),
                Step::Reminder(notification) => print_notification(&notification),
            }
        }

        self.shutdown();
        println!("{}", "👋 Goodbye!".green());
        Ok(())
    }

    /// Stop everything; always called before the app goes away
    pub fn shutdown(&mut self) {
        self.stop();
        info!("buddybot shut down");
    }
}

/// Analyze each file once and print the results
pub async fn analyze_once(files: &[PathBuf], json: bool) -> Result<()> {
    for path in files {
        let text = match read_document(path).await {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable file");
                continue;
            }
        };

        let identity = identity_for(path);
        let result = analyze_text(&text);

        if json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            let mut panel = StatusPanel::new(false);
            panel.set_document(Some(&identity), Some(result.clone()));
            panel.apply_emotion(buddy_analyzer::select_emotion(&result, &identity));
            print_panel(&panel);
            for message in result.errors.iter().chain(result.warnings.iter()) {
                println!("  {message}");
            }
        }
    }
    Ok(())
}
