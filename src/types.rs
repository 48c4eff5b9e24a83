//! Farm Intent - Core Data Structures
//!
//! Labeled training examples, detection results and the diagnostic match type.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;
use std::hash::Hash;

/// Parameter template attached to an example (and echoed back on a match)
pub type Params = serde_json::Map<String, Value>;

/// Discrete action an utterance maps to.
///
/// The engine never inspects labels; the host application supplies a closed
/// enum and the engine only clones and compares it.
pub trait ActionLabel: Clone + Debug + Eq + Hash + Send + Sync + 'static {}

impl<T> ActionLabel for T where T: Clone + Debug + Eq + Hash + Send + Sync + 'static {}

/// One labeled training utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example<A> {
    pub text: String,
    pub action: A,
    #[serde(default)]
    pub params: Params,
    pub confidence: f32, // (0.0, 1.0]
    /// Alternative phrasings, expanded by `IntentEngine::enrich_with_variants`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<String>,
}

impl<A> Example<A> {
    /// Create an example with an empty parameter template
    pub fn new(text: impl Into<String>, action: A, confidence: f32) -> Self {
        Self {
            text: text.into(),
            action,
            params: Params::new(),
            confidence,
            variants: Vec::new(),
        }
    }

    /// Add one entry to the parameter template
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Replace the whole parameter template
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn with_variants<I, S>(mut self, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variants = variants.into_iter().map(Into::into).collect();
        self
    }
}

/// Result of a successful detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedIntent<A> {
    pub action: A,
    pub confidence: f32,
    /// Copy of the winning example's template, not values read from the query
    pub params: Params,
}

/// Diagnostic match returned by `find_top_matches`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredExample<A> {
    /// Position of the example in the corpus
    pub index: usize,
    pub example: Example<A>,
    pub similarity: f32,
}

/// Snapshot of engine sizes, for `info` output and monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    pub examples: usize,
    pub indexed_tokens: usize,
    pub stopwords_pruned: usize,
    pub stopword_threshold: usize,
    pub cached_normalizations: usize,
}
