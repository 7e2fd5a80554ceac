//! ルール（述語 + ハンドラ）の Ports & Adapters
//!
//! RuleRegistry は登録順に Rule を保持し、Dispatcher が先頭から `matches` を評価して
//! 最初に真になったものの `handle` を呼ぶ。IntentContext はメモリ・時刻・呼び出し側の
//! コンテキストを束ねてハンドラへ渡す。

use crate::domain::{Context, Memory, Response};
use chrono::{DateTime, Utc};
use common::ports::outbound::Clock;
use std::sync::Arc;

/// ハンドラの失敗（ドメイン層）
///
/// `Usage` / `NotFound` / `Failed` はハンドラ境界で stage なしのエラー応答になる。
/// `Internal` は想定外の失敗として `stage = "handler"` のエラー応答になる。
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntentError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Failed(String),
    #[error("{0}")]
    Internal(String),
}

impl IntentError {
    pub fn usage(msg: impl Into<String>) -> Self {
        IntentError::Usage(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        IntentError::NotFound(msg.into())
    }

    pub fn failed(msg: impl Into<String>) -> Self {
        IntentError::Failed(msg.into())
    }
}

/// ハンドラ実行コンテキスト
pub struct IntentContext<'a> {
    /// 呼び出し側が渡したコンテキスト
    pub context: &'a Context,
    /// 作業用のメモリ（成功時のみ確定される）
    pub memory: &'a mut Memory,
    pub clock: &'a dyn Clock,
}

impl<'a> IntentContext<'a> {
    pub fn new(context: &'a Context, memory: &'a mut Memory, clock: &'a dyn Clock) -> Self {
        Self {
            context,
            memory,
            clock,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

/// ルールのトレイト
pub trait Rule: Send + Sync {
    /// ログと `metadata.rule` に出す名前
    fn name(&self) -> &'static str;
    /// 述語。メッセージとコンテキストのみから判定し、副作用を持たない
    fn matches(&self, text: &str, context: &Context) -> bool;
    /// ハンドラ。メモリを更新してよい
    fn handle(&self, text: &str, ctx: &mut IntentContext<'_>) -> Result<Response, IntentError>;
}

/// 登録順を保つルール列
#[derive(Clone, Default)]
pub struct RuleRegistry {
    rules: Vec<Arc<dyn Rule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// 末尾に追加する（既存ルールより優先度は低い）
    pub fn push(&mut self, rule: Arc<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Rule>> {
        self.rules.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
