//! agent: ルールベースの対話ディスパッチャ
//!
//! メッセージを登録順のルールに照合し、最初に一致したハンドラで応答を作る。
//! リマインダー・ノート・タスクは JSON ファイルのメモリに永続化する。

pub mod adapter;
pub mod cli;
pub mod domain;
pub mod ports;
pub mod rule;
pub mod runner;
pub mod usecase;
pub mod wiring;

#[cfg(test)]
mod tests;

pub use ports::inbound::Dispatch;
pub use rule::{IntentContext, IntentError, Rule, RuleRegistry};
pub use usecase::{Dispatcher, DispatcherBuilder};
