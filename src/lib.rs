//! Farm Intent - Retrieval-based intent detection
//!
//! Maps a free-form utterance from a pig farmer to one discrete action plus
//! the parameter template of the closest labeled example.
//!
//! # Architecture
//!
//! - **Normalizer**: lowercasing, accent folding, placeholder substitution
//! - **Corpus**: ordered, append-only labeled examples
//! - **Inverted Index**: token → examples, with stopword pruning
//! - **Candidate Retriever**: token-overlap voting, bounded candidate list
//! - **Ranker**: Jaccard similarity, threshold, confidence calibration
//! - **Cache**: memoized normalization for repeated queries
//!
//! # Usage
//!
//! ```rust,no_run
//! use farm_intent::{EngineConfig, FarmAction, IntentEngine};
//!
//! let engine = IntentEngine::<FarmAction>::with_default_corpus(EngineConfig::default())?;
//!
//! match engine.detect("j'ai vendu 5 porcs à 800 000") {
//!     Some(intent) => println!("{} ({:.2}) {:?}", intent.action, intent.confidence, intent.params),
//!     None => println!("Pas compris, pouvez-vous reformuler ?"),
//! }
//! # Ok::<(), farm_intent::IntentError>(())
//! ```

pub mod cache;
pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod generator;
pub mod index;
pub mod knowledge_base;
pub mod normalizer;
pub mod ranker;
pub mod retriever;
pub mod types;

pub use config::{EngineConfig, EngineConfigBuilder};
pub use corpus::Corpus;
pub use engine::{IntentDetector, IntentEngine, SharedIntentEngine};
pub use error::{IntentError, Result};
pub use knowledge_base::{complete_knowledge_base, FarmAction};
pub use normalizer::normalize;
pub use types::*;
