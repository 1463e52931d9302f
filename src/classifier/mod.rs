//! Language classification: a deterministic script heuristic backed by an external
//! probabilistic detector for the cases the heuristic cannot settle.

pub mod cache;
pub mod fallback;
pub mod heuristic;
mod hybrid;
pub mod script;

pub use cache::ClassificationCache;
pub use fallback::{FallbackDetector, LanguageDetector, SharedDetector};
pub use hybrid::HybridClassifier;
