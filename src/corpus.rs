//! Corpus - ordered, append-only example store
//!
//! An example's position is its identity: the inverted index and the
//! per-example normalized texts are keyed by it, so entries are never
//! removed or edited in place.

use crate::error::{IntentError, Result};
use crate::types::Example;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Ordered collection of labeled examples
#[derive(Debug, Clone)]
pub struct Corpus<A> {
    examples: Vec<Example<A>>,
}

impl<A> Corpus<A> {
    pub fn new() -> Self {
        Self {
            examples: Vec::new(),
        }
    }

    /// Build a corpus from merged batches, validating every entry
    pub fn from_examples<I>(examples: I) -> Result<Self>
    where
        I: IntoIterator<Item = Example<A>>,
    {
        let mut corpus = Self::new();
        for example in examples {
            corpus.add_example(example)?;
        }
        Ok(corpus)
    }

    /// Append an example and return its index
    pub fn add_example(&mut self, example: Example<A>) -> Result<usize> {
        validate(&example)?;
        let index = self.examples.len();
        self.examples.push(example);
        Ok(index)
    }

    pub fn get(&self, index: usize) -> Option<&Example<A>> {
        self.examples.get(index)
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Example<A>> {
        self.examples.iter()
    }

    pub fn as_slice(&self) -> &[Example<A>] {
        &self.examples
    }
}

impl<A: DeserializeOwned> Corpus<A> {
    /// Load a JSON array of examples
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        let examples: Vec<Example<A>> = serde_json::from_str(&source)?;
        Self::from_examples(examples)
    }
}

impl<A> Default for Corpus<A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Check an example before it is inserted
pub fn validate<A>(example: &Example<A>) -> Result<()> {
    if example.text.trim().is_empty() {
        return Err(IntentError::InvalidExample {
            reason: "text is empty".to_string(),
        });
    }

    // Also rejects NaN
    if !(example.confidence > 0.0 && example.confidence <= 1.0) {
        return Err(IntentError::InvalidExample {
            reason: format!(
                "confidence {} for {:?} is outside (0, 1]",
                example.confidence, example.text
            ),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_add_returns_previous_length() {
        let mut corpus = Corpus::new();
        assert_eq!(corpus.add_example(Example::new("bilan", 1u8, 0.9)).unwrap(), 0);
        assert_eq!(corpus.add_example(Example::new("stock", 2u8, 0.9)).unwrap(), 1);
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.get(1).map(|e| e.action), Some(2));
    }

    #[test]
    fn test_rejects_empty_text() {
        let mut corpus = Corpus::new();
        let err = corpus.add_example(Example::new("   ", 1u8, 0.9));
        assert!(matches!(err, Err(IntentError::InvalidExample { .. })));
        assert!(corpus.is_empty());
    }

    #[test]
    fn test_rejects_out_of_range_confidence() {
        for confidence in [0.0, -0.2, 1.01, f32::NAN] {
            let err = validate(&Example::new("bilan", 1u8, confidence));
            assert!(matches!(err, Err(IntentError::InvalidExample { .. })));
        }
        assert!(validate(&Example::new("bilan", 1u8, 1.0)).is_ok());
    }

    #[test]
    fn test_from_examples_stops_at_first_invalid() {
        let result = Corpus::from_examples(vec![
            Example::new("bilan", 1u8, 0.9),
            Example::new("stock", 1u8, 2.0),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"text": "statistiques", "action": "get_statistics", "confidence": 0.85}},
                {{"text": "vente de 3 porcs", "action": "create_revenu",
                  "params": {{"nombre": 3}}, "confidence": 0.95}}
            ]"#
        )
        .unwrap();

        let corpus: Corpus<String> = Corpus::load_json(file.path()).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.get(1).unwrap().params["nombre"], 3);
    }

    #[test]
    fn test_load_json_rejects_malformed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();

        let err = Corpus::<String>::load_json(file.path());
        assert!(matches!(err, Err(IntentError::Json(_))));
    }
}
