//! Intent Engine - retrieval pipeline over a labeled corpus
//!
//! raw text → normalize (cached) → candidates (inverted index) → Jaccard rank
//! → calibrated `DetectedIntent`, or `None` when nothing is close enough.
//!
//! Reads take `&self` and are safe to run concurrently. Mutators take
//! `&mut self`; share an engine between threads through
//! [`SharedIntentEngine`], which puts it behind a single-writer lock.

use crate::cache::NormalizationCache;
use crate::config::EngineConfig;
use crate::corpus::Corpus;
use crate::error::Result;
use crate::index::InvertedIndex;
use crate::ranker::{self, RankQuery, Scored};
use crate::retriever::{self, Candidates};
use crate::types::{ActionLabel, DetectedIntent, EngineStats, Example, ScoredExample};

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

/// Corpus, index and normalization cache, kept consistent by construction
#[derive(Debug)]
pub struct IntentEngine<A> {
    config: EngineConfig,
    corpus: Corpus<A>,
    index: InvertedIndex,
    cache: NormalizationCache,
    /// Corpus prefix whose variants are already expanded
    variants_expanded: usize,
}

impl<A: ActionLabel> IntentEngine<A> {
    /// Create new engine from merged example batches
    pub fn new<I>(config: EngineConfig, examples: I) -> Result<Self>
    where
        I: IntoIterator<Item = Example<A>>,
    {
        config.validate()?;
        let corpus = Corpus::from_examples(examples)?;
        Ok(Self::from_corpus(config, corpus))
    }

    /// Create new engine over an already validated corpus
    pub fn from_corpus(config: EngineConfig, corpus: Corpus<A>) -> Self {
        let index = InvertedIndex::build(&corpus, &config);

        log::info!(
            "Intent engine built: {} examples, {} indexed tokens, {} stopwords pruned",
            corpus.len(),
            index.token_count(),
            index.stopword_count()
        );

        Self {
            config,
            corpus,
            index,
            cache: NormalizationCache::new(),
            variants_expanded: 0,
        }
    }

    /// Append one example and index it immediately.
    ///
    /// The stopword cut from the last build is left as is; call
    /// [`rebuild`](Self::rebuild) after large batches of additions.
    pub fn add_example(&mut self, example: Example<A>) -> Result<usize> {
        let position = self.corpus.add_example(example)?;
        let text = &self.corpus.as_slice()[position].text;
        self.index.insert(text);
        debug_assert_eq!(self.index.example_count(), self.corpus.len());
        Ok(position)
    }

    /// Normalized form of `text`, through the cache
    pub fn normalize(&self, text: &str) -> String {
        self.cache.get_normalized(text)
    }

    /// Candidate examples for an already normalized query
    pub fn find_candidates(&self, normalized_query: &str) -> Candidates {
        retriever::find_candidates(&self.index, normalized_query, self.config.max_candidates)
    }

    /// Score `candidates` against `text`, best first
    pub fn rank(&self, text: &str, candidates: &[usize]) -> Vec<Scored> {
        let normalized = self.normalize(text);
        let query = RankQuery::new(text, &normalized);
        ranker::rank(&self.index, &self.corpus, &query, candidates)
    }

    /// Best matching action for `text`, or `None` below the similarity threshold
    pub fn detect(&self, text: &str) -> Option<DetectedIntent<A>> {
        let normalized = self.normalize(text);
        let candidates = self.find_candidates(&normalized);
        let query = RankQuery::new(text, &normalized);
        let ranked = ranker::rank(&self.index, &self.corpus, &query, &candidates.indices);

        log::debug!(
            "detect {:?}: {} candidates (full scan: {}), best similarity {:.3}",
            normalized,
            candidates.len(),
            candidates.full_scan,
            ranked.first().map(|s| s.similarity).unwrap_or(0.0)
        );

        ranker::select_best(&ranked, &self.corpus, &self.config)
    }

    /// The `n` best scored examples for `text`, whatever their similarity
    pub fn top_matches(&self, text: &str, n: usize) -> Vec<ScoredExample<A>> {
        let normalized = self.normalize(text);
        let candidates = self.find_candidates(&normalized);
        let query = RankQuery::new(text, &normalized);
        let ranked = ranker::rank(&self.index, &self.corpus, &query, &candidates.indices);
        ranker::top_matches(&ranked, &self.corpus, n)
    }

    /// Recompute the index and the stopword cut from the current corpus
    pub fn rebuild(&mut self) {
        self.index = InvertedIndex::build(&self.corpus, &self.config);
        log::info!(
            "Index rebuilt: {} examples, {} indexed tokens, {} stopwords pruned",
            self.corpus.len(),
            self.index.token_count(),
            self.index.stopword_count()
        );
    }

    /// Drop memoized normalizations and rebuild the index from scratch
    pub fn clear_cache(&mut self) {
        self.cache.clear();
        self.rebuild();
    }

    /// Append one example per not yet expanded variant.
    ///
    /// Each carries its parent's action and params, with confidence scaled by
    /// `variant_confidence_factor`. Returns the number of examples added.
    pub fn enrich_with_variants(&mut self) -> Result<usize> {
        let factor = self.config.variant_confidence_factor;
        let expanded: Vec<Example<A>> = self.corpus.as_slice()[self.variants_expanded..]
            .iter()
            .flat_map(|parent| {
                parent
                    .variants
                    .iter()
                    .filter(|variant| !variant.trim().is_empty())
                    .map(move |variant| {
                        Example::new(variant.clone(), parent.action.clone(), parent.confidence * factor)
                            .with_params(parent.params.clone())
                    })
            })
            .collect();

        let added = expanded.len();
        for example in expanded {
            self.add_example(example)?;
        }
        self.variants_expanded = self.corpus.len();

        if added > 0 {
            log::info!("Added {} examples from variants", added);
        }
        Ok(added)
    }

    /// Swap the whole knowledge base, then clear the cache and rebuild
    pub fn replace_corpus<I>(&mut self, examples: I) -> Result<()>
    where
        I: IntoIterator<Item = Example<A>>,
    {
        self.corpus = Corpus::from_examples(examples)?;
        self.variants_expanded = 0;
        self.clear_cache();
        Ok(())
    }

    /// Read-only view of every example, in corpus order
    pub fn knowledge_base(&self) -> &[Example<A>] {
        self.corpus.as_slice()
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            examples: self.corpus.len(),
            indexed_tokens: self.index.token_count(),
            stopwords_pruned: self.index.stopword_count(),
            stopword_threshold: self.index.stopword_threshold(),
            cached_normalizations: self.cache.len(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    /// Always `false`: matching is purely lexical
    pub fn is_using_embeddings(&self) -> bool {
        false
    }
}

/// Cloneable handle sharing one engine between threads (many readers, one writer)
#[derive(Debug)]
pub struct SharedIntentEngine<A> {
    inner: Arc<RwLock<IntentEngine<A>>>,
}

impl<A> Clone for SharedIntentEngine<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: ActionLabel> SharedIntentEngine<A> {
    pub fn new(engine: IntentEngine<A>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    pub fn detect(&self, text: &str) -> Option<DetectedIntent<A>> {
        self.inner.read().detect(text)
    }

    pub fn top_matches(&self, text: &str, n: usize) -> Vec<ScoredExample<A>> {
        self.inner.read().top_matches(text, n)
    }

    pub fn add_example(&self, example: Example<A>) -> Result<usize> {
        self.inner.write().add_example(example)
    }

    pub fn rebuild(&self) {
        self.inner.write().rebuild();
    }

    pub fn clear_cache(&self) {
        self.inner.write().clear_cache();
    }

    pub fn stats(&self) -> EngineStats {
        self.inner.read().stats()
    }

    /// Run `f` with shared access
    pub fn read<R>(&self, f: impl FnOnce(&IntentEngine<A>) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run `f` with exclusive access
    pub fn write<R>(&self, f: impl FnOnce(&mut IntentEngine<A>) -> R) -> R {
        f(&mut self.inner.write())
    }
}

/// Async detection surface.
///
/// Implementations never suspend; the trait exists so callers written against
/// an async matcher can swap this engine in.
#[async_trait]
pub trait IntentDetector<A: ActionLabel>: Send + Sync {
    async fn detect_intent(&self, text: &str) -> Option<DetectedIntent<A>>;

    async fn find_top_matches(&self, text: &str, n: usize) -> Vec<ScoredExample<A>>;
}

#[async_trait]
impl<A: ActionLabel> IntentDetector<A> for IntentEngine<A> {
    async fn detect_intent(&self, text: &str) -> Option<DetectedIntent<A>> {
        self.detect(text)
    }

    async fn find_top_matches(&self, text: &str, n: usize) -> Vec<ScoredExample<A>> {
        self.top_matches(text, n)
    }
}

#[async_trait]
impl<A: ActionLabel> IntentDetector<A> for SharedIntentEngine<A> {
    async fn detect_intent(&self, text: &str) -> Option<DetectedIntent<A>> {
        self.detect(text)
    }

    async fn find_top_matches(&self, text: &str, n: usize) -> Vec<ScoredExample<A>> {
        self.top_matches(text, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IntentError;

    fn engine() -> IntentEngine<&'static str> {
        IntentEngine::new(
            EngineConfig::default(),
            vec![
                Example::new("voir mes statistiques", "get_statistics", 0.85),
                Example::new("niveau de stock", "get_stock_status", 0.9),
                Example::new("rappels de vaccination", "get_reminders", 0.9),
                Example::new("enregistrer une vente", "create_revenu", 0.9)
                    .with_variants(["nouvelle vente", "  "]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = EngineConfig {
            similarity_threshold: 0.0,
            ..EngineConfig::default()
        };
        let err = IntentEngine::<&str>::new(config, Vec::new());
        assert!(matches!(err, Err(IntentError::InvalidConfig { .. })));
    }

    #[test]
    fn test_detect_exact_phrase() {
        let engine = engine();
        let detected = engine.detect("Niveau de stock ?").unwrap();
        assert_eq!(detected.action, "get_stock_status");
        assert!((detected.confidence - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_detect_none_on_unrelated_text() {
        assert!(engine().detect("bonjour tout le monde").is_none());
        assert!(engine().detect("").is_none());
    }

    #[test]
    fn test_add_example_keeps_index_in_sync() {
        let mut engine = engine();
        let position = engine
            .add_example(Example::new("analyser la croissance", "analyze_data", 0.9))
            .unwrap();

        assert_eq!(position, 4);
        assert_eq!(engine.index().example_count(), engine.knowledge_base().len());
        assert_eq!(engine.detect("analyser la croissance").unwrap().action, "analyze_data");

        let err = engine.add_example(Example::new("", "analyze_data", 0.9));
        assert!(err.is_err());
        assert_eq!(engine.knowledge_base().len(), 5);
    }

    #[test]
    fn test_enrich_with_variants_runs_once() {
        let mut engine = engine();
        assert_eq!(engine.enrich_with_variants().unwrap(), 1);
        assert_eq!(engine.enrich_with_variants().unwrap(), 0);

        let added = &engine.knowledge_base()[4];
        assert_eq!(added.text, "nouvelle vente");
        assert_eq!(added.action, "create_revenu");
        assert!((added.confidence - 0.81).abs() < 1e-6);

        let detected = engine.detect("nouvelle vente").unwrap();
        assert_eq!(detected.action, "create_revenu");
    }

    #[test]
    fn test_clear_cache_rebuilds() {
        let mut engine = engine();
        engine.detect("niveau de stock");
        assert_eq!(engine.stats().cached_normalizations, 1);

        engine.clear_cache();
        let stats = engine.stats();
        assert_eq!(stats.cached_normalizations, 0);
        assert_eq!(stats.examples, 4);
    }

    #[test]
    fn test_replace_corpus() {
        let mut engine = engine();
        engine
            .replace_corpus(vec![Example::new("mes annonces", "marketplace_get_my_listings", 0.9)])
            .unwrap();

        assert_eq!(engine.knowledge_base().len(), 1);
        assert!(engine.detect("niveau de stock").is_none());
        assert_eq!(
            engine.detect("mes annonces").unwrap().action,
            "marketplace_get_my_listings"
        );
    }

    #[test]
    fn test_top_matches_and_stats() {
        let engine = engine();
        let top = engine.top_matches("voir le stock", 2);
        assert!(top.len() <= 2);
        assert_eq!(top[0].example.action, "get_stock_status");

        let ranked = engine.rank("Niveau de stock", &[0, 1, 2, 3]);
        assert_eq!(ranked[0].index, 1);
        assert_eq!(ranked[0].similarity, 1.0);

        let stats = engine.stats();
        assert_eq!(stats.examples, 4);
        assert!(!engine.is_using_embeddings());
    }

    #[test]
    fn test_shared_engine_writer_visible_to_readers() {
        let shared = SharedIntentEngine::new(engine());
        let reader = shared.clone();

        shared
            .add_example(Example::new("prix du porc", "marketplace_get_price_trends", 0.9))
            .unwrap();

        assert_eq!(
            reader.detect("prix du porc").unwrap().action,
            "marketplace_get_price_trends"
        );
        assert_eq!(reader.read(|engine| engine.knowledge_base().len()), 5);
    }
}
