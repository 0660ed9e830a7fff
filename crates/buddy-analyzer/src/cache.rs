//! Latest analysis per document

use buddy_core::AnalysisResult;
use std::collections::{BTreeMap, HashMap};

/// Document identity to most recent [`AnalysisResult`], last write wins.
///
/// Owned by the [`DocumentAnalyzer`](crate::DocumentAnalyzer); callers outside
/// this crate only get read access. Entries live as long as the cache does.
#[derive(Debug, Clone, Default)]
pub struct ResultCache {
    entries: HashMap<String, AnalysisResult>,
    active: Option<String>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `result` for `identity`, handing back the entry it replaced
    pub(crate) fn store(&mut self, identity: &str, result: AnalysisResult) -> Option<AnalysisResult> {
        self.entries.insert(identity.to_string(), result)
    }

    pub(crate) fn set_active(&mut self, identity: &str) {
        self.active = Some(identity.to_string());
    }

    pub fn get(&self, identity: &str) -> Option<&AnalysisResult> {
        self.entries.get(identity)
    }

    /// Identity of the document currently tracked as active
    pub fn active_identity(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Latest result for the active document, if it has been analyzed
    pub fn latest_for_active(&self) -> Option<&AnalysisResult> {
        self.active.as_deref().and_then(|identity| self.get(identity))
    }

    /// Copy of every tracked entry, ordered by identity
    pub fn snapshot(&self) -> BTreeMap<String, AnalysisResult> {
        self.entries
            .iter()
            .map(|(identity, result)| (identity.clone(), result.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
