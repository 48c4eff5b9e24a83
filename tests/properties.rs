use farm_intent::normalizer::{normalize, tokens, PLACEHOLDERS};
use farm_intent::{EngineConfig, Example, IntentEngine};
use proptest::prelude::*;

const WORDS: &[&str] = &[
    "porc", "porcs", "truie", "stock", "provende", "vente", "vendu", "pese", "poids", "fait",
    "nombre", "pour", "prix", "chez", "a", "de", "mes", "bilan", "rappels", "vaccination",
    "kouame", "p001", "b12", "45", "800", "1 500", "kg", "fcfa", "12/05", "2024-06-01",
];

fn utterance() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(WORDS), 0..10).prop_map(|words| words.join(" "))
}

fn corpus() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(utterance().prop_filter("non-empty", |s| !s.trim().is_empty()), 1..40)
}

proptest! {
    #[test]
    fn normalize_is_idempotent(s in "\\PC{0,60}") {
        let once = normalize(&s);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalize_is_idempotent_on_farm_text(s in utterance()) {
        let once = normalize(&s);
        prop_assert_eq!(normalize(&once), once.clone());
        prop_assert_eq!(normalize(&s), once);
    }

    #[test]
    fn tokens_exclude_placeholders(s in utterance()) {
        let normalized = normalize(&s);
        for token in tokens(&normalized, 3) {
            prop_assert!(token.chars().count() >= 3);
            prop_assert!(!PLACEHOLDERS.contains(&token));
        }
    }

    #[test]
    fn every_token_is_indexed_or_pruned(texts in corpus()) {
        let examples = texts.iter().map(|t| Example::new(t.as_str(), 0u8, 0.9));
        let engine = IntentEngine::new(EngineConfig::default(), examples).unwrap();
        let index = engine.index();

        prop_assert_eq!(index.example_count(), texts.len());
        for (i, text) in texts.iter().enumerate() {
            let normalized = normalize(text);
            for token in tokens(&normalized, 3) {
                let indexed = index.postings(token).is_some_and(|p| p.contains(&i));
                prop_assert!(index.is_stopword(token) || indexed, "{} missing from {:?}", i, token);
            }
        }
    }

    #[test]
    fn candidates_are_bounded(texts in corpus(), query in utterance(), max in 1usize..20) {
        let config = EngineConfig { max_candidates: max, ..EngineConfig::default() };
        let examples = texts.iter().map(|t| Example::new(t.as_str(), 0u8, 0.9));
        let engine = IntentEngine::new(config, examples).unwrap();

        let candidates = engine.find_candidates(&engine.normalize(&query));
        prop_assert!(candidates.len() <= max);
        prop_assert!(candidates.indices.iter().all(|&i| i < texts.len()));
    }

    #[test]
    fn detection_is_deterministic_and_bounded(texts in corpus(), query in utterance()) {
        let build = || {
            let examples = texts.iter().map(|t| Example::new(t.as_str(), t.len(), 0.9));
            IntentEngine::new(EngineConfig::default(), examples).unwrap()
        };
        let (a, b) = (build(), build());

        let detected = a.detect(&query);
        prop_assert_eq!(&detected, &a.detect(&query));
        prop_assert_eq!(&detected, &b.detect(&query));
        if let Some(intent) = detected {
            prop_assert!(intent.confidence > 0.0 && intent.confidence <= 0.95);
        }
    }
}
