//! Candidate Retriever - narrow the corpus before exact scoring
//!
//! Every distinct query token that survived pruning votes for the examples in
//! its posting list. Examples are ordered by vote count, ties broken by
//! corpus position, and the list is cut at `max_candidates`. A query whose
//! tokens hit nothing degrades to a scan of the whole corpus (still capped).

use crate::index::InvertedIndex;
use crate::normalizer::tokens;
use std::collections::{HashMap, HashSet};

/// Ordered candidate indices for one query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidates {
    pub indices: Vec<usize>,
    /// No token hit the index; `indices` is a corpus prefix
    pub full_scan: bool,
}

impl Candidates {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Find candidate examples for an already-normalized query
pub fn find_candidates(
    index: &InvertedIndex,
    normalized_query: &str,
    max_candidates: usize,
) -> Candidates {
    let mut hits: HashMap<usize, usize> = HashMap::new();
    let mut seen = HashSet::new();

    for token in tokens(normalized_query, index.min_token_len()) {
        if !seen.insert(token) {
            continue;
        }
        if let Some(examples) = index.postings(token) {
            for &example in examples {
                *hits.entry(example).or_insert(0) += 1;
            }
        }
    }

    if hits.is_empty() {
        let indices: Vec<usize> = (0..index.example_count()).take(max_candidates).collect();
        log::trace!("No indexed token in {:?}, scanning {} examples", normalized_query, indices.len());
        return Candidates {
            indices,
            full_scan: true,
        };
    }

    let mut ranked: Vec<(usize, usize)> = hits.into_iter().collect();
    ranked.sort_unstable_by(|(a_index, a_hits), (b_index, b_hits)| {
        b_hits.cmp(a_hits).then(a_index.cmp(b_index))
    });
    ranked.truncate(max_candidates);

    Candidates {
        indices: ranked.into_iter().map(|(index, _)| index).collect(),
        full_scan: false,
    }
}
