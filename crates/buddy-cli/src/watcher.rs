//! Polling file watcher that turns file edits into document events

use buddy_core::{detect_language, DocumentEvent, Error, Result};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    modified: Option<SystemTime>,
    len: u64,
}

#[derive(Debug)]
struct WatchedFile {
    path: PathBuf,
    fingerprint: Option<Fingerprint>,
}

/// Read a document from disk, decoding invalid UTF-8 lossily
pub async fn read_document(path: &Path) -> Result<String> {
    let bytes = fs::read(path).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Stable identity used for a watched path
pub fn identity_for(path: &Path) -> String {
    path.display().to_string()
}

/// Watches a set of files by modification time and size.
///
/// Stands in for an editor's change notifications: every detected change
/// becomes a [`DocumentEvent`] carrying the full new text.
#[derive(Debug, Default)]
pub struct FileWatcher {
    files: Vec<WatchedFile>,
}

impl FileWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start watching `path`. Returns `false` if it was already watched.
    ///
    /// The first poll after this reports the file as changed.
    pub fn watch(&mut self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        if self.files.iter().any(|file| file.path == path) {
            return false;
        }
        self.files.push(WatchedFile {
            path,
            fingerprint: None,
        });
        true
    }

    /// Make `path` the active document, watching it if needed
    pub async fn activate(&mut self, path: &Path) -> Result<DocumentEvent> {
        let fingerprint = fingerprint(path).await?;
        let text = read_document(path).await?;

        self.watch(path);
        if let Some(file) = self.files.iter_mut().find(|file| file.path == path) {
            file.fingerprint = Some(fingerprint);
        }

        let identity = identity_for(path);
        let language = detect_language(&identity);
        Ok(DocumentEvent::activated(identity, language, text))
    }

    /// Check every watched file once, returning events for those that changed.
    ///
    /// Unreadable files are logged and skipped; they are retried next poll.
    pub async fn poll(&mut self) -> Vec<DocumentEvent> {
        let mut events = Vec::new();

        for file in &mut self.files {
            let current = match fingerprint(&file.path).await {
                Ok(current) => current,
                Err(e) => {
                    warn!(path = %file.path.display(), error = %e, "cannot stat watched file");
                    continue;
                }
            };

            if file.fingerprint == Some(current) {
                continue;
            }

            match read_document(&file.path).await {
                Ok(text) => {
                    debug!(path = %file.path.display(), "watched file changed");
                    file.fingerprint = Some(current);
                    let identity = identity_for(&file.path);
                    let language = detect_language(&identity);
                    events.push(DocumentEvent::changed(identity, language, text));
                }
                Err(e) => {
                    warn!(path = %file.path.display(), error = %e, "cannot read watched file");
                }
            }
        }

        events
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

async fn fingerprint(path: &Path) -> Result<Fingerprint> {
    let metadata = fs::metadata(path).await?;
    if !metadata.is_file() {
        return Err(Error::Watcher(format!("{} is not a regular file", path.display())));
    }
    Ok(Fingerprint {
        modified: metadata.modified().ok(),
        len: metadata.len(),
    })
}
