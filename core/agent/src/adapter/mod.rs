//! アダプター（Outbound ポートの実装）

pub mod instant_answer_search;
pub mod json_memory_store;
pub mod logging_memory_store;
pub mod restricted_evaluator;

pub use instant_answer_search::{
    DisabledSearch, InstantAnswerSearch, DEFAULT_SEARCH_ENDPOINT, DEFAULT_TIMEOUT_SECS,
};
pub use json_memory_store::JsonFileMemoryStore;
pub use logging_memory_store::LoggingMemoryStore;
pub use restricted_evaluator::RestrictedEvaluator;
