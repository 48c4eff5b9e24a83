//! Inverted Index - token → example positions
//!
//! Built once from a corpus snapshot, then pruned of tokens too frequent to
//! discriminate between examples. The stopword cut is computed from the
//! corpus size at build time only; `insert` never revisits it, so callers
//! that append many examples should `rebuild` from time to time.

use crate::config::EngineConfig;
use crate::corpus::Corpus;
use crate::normalizer::{normalize, tokens};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Token → sorted set of example indices
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, BTreeSet<usize>>,
    /// Normalized text of every example, by corpus position
    normalized: Vec<String>,
    /// Tokens dropped by the last build
    stopwords: HashSet<String>,
    stopword_threshold: usize,
    min_token_len: usize,
}

impl InvertedIndex {
    /// Index a full corpus snapshot and prune stopwords
    pub fn build<A>(corpus: &Corpus<A>, config: &EngineConfig) -> Self {
        let mut index = Self {
            postings: HashMap::new(),
            normalized: Vec::with_capacity(corpus.len()),
            stopwords: HashSet::new(),
            stopword_threshold: 0,
            min_token_len: config.min_token_len,
        };

        for example in corpus.iter() {
            index.push_normalized(normalize(&example.text));
        }

        // Floor, computed once for this snapshot
        index.stopword_threshold = (corpus.len() as f64 * config.stopword_ratio as f64) as usize;

        let threshold = index.stopword_threshold;
        let stopwords: Vec<String> = index
            .postings
            .iter()
            .filter(|(_, examples)| examples.len() > threshold)
            .map(|(token, _)| token.clone())
            .collect();

        for token in stopwords {
            index.postings.remove(&token);
            index.stopwords.insert(token);
        }

        log::debug!(
            "Indexed {} examples: {} tokens kept, {} pruned (threshold {})",
            corpus.len(),
            index.postings.len(),
            index.stopwords.len(),
            threshold
        );

        index
    }

    /// Index one appended example without touching the stopword cut.
    ///
    /// Every token of the example gets a posting, including tokens the last
    /// build pruned. Returns the example's index.
    pub fn insert(&mut self, text: &str) -> usize {
        self.push_normalized(normalize(text))
    }

    fn push_normalized(&mut self, normalized: String) -> usize {
        let position = self.normalized.len();
        for token in tokens(&normalized, self.min_token_len) {
            self.postings
                .entry(token.to_string())
                .or_default()
                .insert(position);
        }
        self.normalized.push(normalized);
        position
    }

    /// Examples containing `token`, if it is indexed
    pub fn postings(&self, token: &str) -> Option<&BTreeSet<usize>> {
        self.postings.get(token)
    }

    /// Normalized text of the example at `index`
    pub fn normalized_text(&self, index: usize) -> Option<&str> {
        self.normalized.get(index).map(String::as_str)
    }

    /// Whether `token` was pruned as a stopword by the last build
    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// Number of examples indexed (always equal to the corpus length)
    pub fn example_count(&self) -> usize {
        self.normalized.len()
    }

    pub fn token_count(&self) -> usize {
        self.postings.len()
    }

    pub fn stopword_count(&self) -> usize {
        self.stopwords.len()
    }

    pub fn stopword_threshold(&self) -> usize {
        self.stopword_threshold
    }

    pub fn min_token_len(&self) -> usize {
        self.min_token_len
    }
}
