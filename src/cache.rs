//! Normalization cache
//!
//! Raw query → normalized text, shared by concurrent readers. Entries never
//! go stale because normalization is pure; `clear` only bounds memory.

use crate::normalizer::normalize;
use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct NormalizationCache {
    entries: DashMap<String, String>,
}

impl NormalizationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalized form of `text`, computed at most once per distinct input
    pub fn get_normalized(&self, text: &str) -> String {
        if let Some(hit) = self.entries.get(text) {
            return hit.value().clone();
        }

        let normalized = normalize(text);
        log::trace!("Normalized {:?} -> {:?}", text, normalized);
        self.entries
            .entry(text.to_string())
            .or_insert(normalized)
            .value()
            .clone()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
