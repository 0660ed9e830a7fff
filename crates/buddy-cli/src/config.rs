//! Buddybot configuration

use buddy_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

pub const DEFAULT_REMINDER_MINUTES: u64 = 30;
pub const DEFAULT_POLL_MS: u64 = 500;

/// Runtime settings for the terminal shell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuddyConfig {
    /// Hydration reminder period; `None` disables reminders
    pub reminder_interval: Option<Duration>,
    /// How often watched files are checked for changes
    pub poll_interval: Duration,
    /// Re-show a hidden panel when a background update arrives
    pub reveal_on_update: bool,
}

impl BuddyConfig {
    /// Create configuration from environment variables (and `.env`)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let reminder_minutes = match lookup("BUDDY_REMINDER_MINUTES") {
            Some(value) => parse_u64("BUDDY_REMINDER_MINUTES", &value)?,
            None => DEFAULT_REMINDER_MINUTES,
        };

        let poll_ms = match lookup("BUDDY_POLL_MS") {
            Some(value) => parse_u64("BUDDY_POLL_MS", &value)?,
            None => DEFAULT_POLL_MS,
        };
        if poll_ms == 0 {
            return Err(Error::Configuration(
                "BUDDY_POLL_MS must be greater than zero".to_string(),
            ));
        }

        let reveal_on_update = match lookup("BUDDY_REVEAL_ON_UPDATE") {
            Some(value) => parse_bool("BUDDY_REVEAL_ON_UPDATE", &value)?,
            None => false,
        };

        Ok(Self::default()
            .with_reminder_minutes(reminder_minutes)?
            .with_poll_interval(Duration::from_millis(poll_ms))
            .with_reveal_on_update(reveal_on_update))
    }

    /// Set the reminder period in minutes; zero disables reminders
    pub fn with_reminder_minutes(mut self, minutes: u64) -> Result<Self> {
        self.reminder_interval = if minutes == 0 {
            None
        } else {
            let secs = minutes.checked_mul(60).ok_or_else(|| {
                Error::Configuration(format!("reminder interval of {minutes} minutes is too large"))
            })?;
            Some(Duration::from_secs(secs))
        };
        Ok(self)
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_reveal_on_update(mut self, reveal: bool) -> Self {
        self.reveal_on_update = reveal;
        self
    }
}

impl Default for BuddyConfig {
    fn default() -> Self {
        Self {
            reminder_interval: Some(Duration::from_secs(DEFAULT_REMINDER_MINUTES * 60)),
            poll_interval: Duration::from_millis(DEFAULT_POLL_MS),
            reveal_on_update: false,
        }
    }
}

fn parse_u64(key: &str, value: &str) -> Result<u64> {
    value.trim().parse().map_err(|_| {
        Error::Configuration(format!("{key} must be a non-negative integer, got '{value}'"))
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Configuration(format!(
            "{key} must be a boolean, got '{value}'"
        ))),
    }
}
