//! Ranker - exact similarity and confidence calibration
//!
//! Candidates are scored by Jaccard similarity over token sets, the best one
//! is accepted if it clears the threshold, and its stored confidence is
//! scaled by how far above the threshold it landed.
//!
//! Templated commands often collapse to the same few tokens ("j ai vendu 5
//! porcs a 800000" and "j ai vendu" are both `{vendu}`), so equal scores are
//! ordered by how closely each example matches the query as written:
//! identical literal text first, then templates whose numbers all appear in
//! the query, then identical normalized text, then overlap over every word
//! including placeholders, and finally candidate order.

use crate::config::EngineConfig;
use crate::corpus::Corpus;
use crate::index::InvertedIndex;
use crate::normalizer::{literal_form, literal_numbers, tokens};
use crate::types::{DetectedIntent, Example, Params, ScoredExample};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Jaccard similarity of the token sets of two normalized texts.
///
/// Two texts with no tokens at all score 0.
pub fn jaccard(a: &str, b: &str, min_len: usize) -> f32 {
    let a: HashSet<&str> = tokens(a, min_len).collect();
    let b: HashSet<&str> = tokens(b, min_len).collect();
    set_jaccard(&a, &b)
}

fn set_jaccard<'a>(a: &HashSet<&'a str>, b: &HashSet<&'a str>) -> f32 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f32 / union as f32
}

/// A query prepared for ranking: its normalized form plus the literal
/// values normalization replaced
#[derive(Debug, Clone)]
pub struct RankQuery<'a> {
    normalized: &'a str,
    words: HashSet<&'a str>,
    literal: String,
    numbers: HashSet<u64>,
}

impl<'a> RankQuery<'a> {
    /// `normalized` must be the normalized form of `text`
    pub fn new(text: &str, normalized: &'a str) -> Self {
        let literal = literal_form(text);
        let numbers = literal_numbers(&literal);
        Self {
            normalized,
            words: normalized.split_whitespace().collect(),
            literal,
            numbers,
        }
    }

    pub fn normalized(&self) -> &str {
        self.normalized
    }
}

/// A candidate with its similarity to the query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scored {
    pub index: usize,
    pub similarity: f32,
}

/// Ordering among equally similar candidates; fields compare in order
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
struct TieBreak {
    literal_match: bool,
    numbers_agree: bool,
    same_structure: bool,
    word_overlap: f32,
}

impl TieBreak {
    fn new<A>(query: &RankQuery<'_>, normalized: &str, example: &Example<A>) -> Self {
        // Equal literal forms imply equal normalized forms
        let same_structure = normalized == query.normalized;
        let words: HashSet<&str> = normalized.split_whitespace().collect();

        Self {
            literal_match: same_structure && literal_form(&example.text) == query.literal,
            numbers_agree: numbers_agree(&example.params, &query.numbers),
            same_structure,
            word_overlap: set_jaccard(&query.words, &words),
        }
    }
}

/// Every numeric value of the template is written in the query
fn numbers_agree(params: &Params, numbers: &HashSet<u64>) -> bool {
    params
        .values()
        .filter(|value| value.is_number())
        .all(|value| value.as_u64().is_some_and(|n| numbers.contains(&n)))
}

/// Score candidates against the query, best first.
///
/// Ties on similarity are broken as described in the module docs; fully
/// equal candidates keep their candidate order.
pub fn rank<A>(
    index: &InvertedIndex,
    corpus: &Corpus<A>,
    query: &RankQuery<'_>,
    candidates: &[usize],
) -> Vec<Scored> {
    let min_len = index.min_token_len();
    let mut scored: Vec<(Scored, TieBreak)> = candidates
        .iter()
        .filter_map(|&candidate| {
            let text = index.normalized_text(candidate)?;
            let example = corpus.get(candidate)?;
            let scored = Scored {
                index: candidate,
                similarity: jaccard(query.normalized, text, min_len),
            };
            Some((scored, TieBreak::new(query, text, example)))
        })
        .collect();

    scored.sort_by(|(a, a_tie), (b, b_tie)| {
        b.similarity
            .total_cmp(&a.similarity)
            .then_with(|| b_tie.partial_cmp(a_tie).unwrap_or(Ordering::Equal))
    });
    scored.into_iter().map(|(scored, _)| scored).collect()
}

/// Scale an example's prior confidence by the margin above threshold.
///
/// A match exactly on the threshold keeps `base_weight` of the prior, a
/// perfect match keeps all of it, and the result never exceeds the cap.
pub fn calibrate(similarity: f32, prior: f32, config: &EngineConfig) -> f32 {
    let threshold = config.similarity_threshold;
    let boost = ((similarity - threshold) / (1.0 - threshold)).clamp(0.0, 1.0);
    let weight = config.base_weight + (1.0 - config.base_weight) * boost;
    (prior * weight).min(config.confidence_cap)
}

/// Accept the best ranked match if it clears the threshold
pub fn select_best<A: Clone>(
    ranked: &[Scored],
    corpus: &Corpus<A>,
    config: &EngineConfig,
) -> Option<DetectedIntent<A>> {
    let best = ranked.first()?;
    if best.similarity < config.similarity_threshold {
        return None;
    }

    let example = corpus.get(best.index)?;
    Some(DetectedIntent {
        action: example.action.clone(),
        confidence: calibrate(best.similarity, example.confidence, config),
        params: example.params.clone(),
    })
}

/// Attach corpus entries to the first `n` ranked matches
pub fn top_matches<A: Clone>(ranked: &[Scored], corpus: &Corpus<A>, n: usize) -> Vec<ScoredExample<A>> {
    ranked
        .iter()
        .take(n)
        .filter_map(|scored| {
            corpus.get(scored.index).map(|example| ScoredExample {
                index: scored.index,
                example: example.clone(),
                similarity: scored.similarity,
            })
        })
        .collect()
}
