//! Core traits and types for buddybot
//!
//! This crate defines the analysis result, emotion and document-event types
//! shared by the analyzer and the terminal shell, plus the listener seam the
//! emotion selector reports through.

pub mod error;
pub mod language;
pub mod listener;
pub mod types;

pub use error::{Error, Result};
pub use language::{basename, detect_language, is_target_document, TARGET_LANGUAGE};
pub use listener::EmotionListener;
pub use types::*;
