//! Target-language detection for incoming document events

use std::path::Path;

/// Language tag the analyzer understands
pub const TARGET_LANGUAGE: &str = "python";

/// File suffixes treated as the target language
pub const TARGET_EXTENSIONS: &[&str] = &["py", "pyw"];

/// Guess a language tag from a document identity's file suffix
pub fn detect_language(identity: &str) -> Option<&'static str> {
    let extension = Path::new(identity).extension()?.to_str()?.to_lowercase();

    if TARGET_EXTENSIONS.contains(&extension.as_str()) {
        Some(TARGET_LANGUAGE)
    } else {
        None
    }
}

/// Whether a document should be analyzed at all.
///
/// Either the host's language tag or the filename suffix is enough.
pub fn is_target_document(language: Option<&str>, identity: &str) -> bool {
    language.is_some_and(|tag| tag.eq_ignore_ascii_case(TARGET_LANGUAGE))
        || detect_language(identity).is_some()
}

/// Last path component of an identity, or the identity itself
pub fn basename(identity: &str) -> &str {
    Path::new(identity)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(identity)
}
