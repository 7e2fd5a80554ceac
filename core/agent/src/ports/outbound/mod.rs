//! Outbound ポート: アプリが外界（永続化・数式評価・Web 検索）を使うための trait
//!
//! 時刻・ログ・FS は common のポートを使う。

pub mod expression_evaluator;
pub mod memory_store;
pub mod web_search;

pub use expression_evaluator::{EvaluationError, ExpressionEvaluator};
pub use memory_store::MemoryStore;
pub use web_search::{SearchError, WebSearch};
