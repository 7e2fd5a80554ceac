//! 応答（Response）のドメイン型
//!
//! 1 回の `process` 呼び出しにつきちょうど 1 つ作られ、呼び出し側へ所有権ごと返す。

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// 応答に付くメタデータ（JSON 互換の値）
pub type Metadata = BTreeMap<String, Value>;

/// エラー応答の intent
pub const INTENT_ERROR: &str = "error";

/// パイプラインのどの段階で失敗したか（`metadata.stage` に入る）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Preprocessor,
    Handler,
    Postprocessor,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Preprocessor => "preprocessor",
            Stage::Handler => "handler",
            Stage::Postprocessor => "postprocessor",
        }
    }

    fn user_message(&self) -> &'static str {
        match self {
            Stage::Preprocessor => {
                "Sorry, I couldn't read that message. Please try rephrasing it."
            }
            Stage::Handler => {
                "Sorry, something went wrong while handling that. Please try again or type 'help'."
            }
            Stage::Postprocessor => "Sorry, something went wrong while preparing the reply.",
        }
    }
}

/// 構造化された応答
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub text: String,
    pub intent: String,
    /// 0.0〜1.0 に丸めて保持する
    pub confidence: f64,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Response {
    pub fn new(text: impl Into<String>, intent: impl Into<String>, confidence: f64) -> Self {
        Self {
            text: text.into(),
            intent: intent.into(),
            confidence: clamp_confidence(confidence),
            metadata: Metadata::new(),
        }
    }

    /// ハンドラ内で回復したエラー（使い方の誤り・見つからない等）。stage は付けない。
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, INTENT_ERROR, 1.0)
    }

    /// パイプライン段階の失敗。`stage` と `error`（詳細）をメタデータに入れる。
    pub fn stage_error(stage: Stage, detail: impl Into<String>) -> Self {
        Self::error(stage.user_message())
            .with_meta("stage", stage.as_str())
            .with_meta("error", detail.into())
    }

    pub fn with_meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    /// 既に値があれば上書きしない
    pub fn set_meta_if_absent(&mut self, key: &str, value: impl Into<Value>) {
        self.metadata
            .entry(key.to_string())
            .or_insert_with(|| value.into());
    }

    pub fn is_error(&self) -> bool {
        self.intent == INTENT_ERROR
    }

    /// パイプライン段階の失敗なら段階名
    pub fn stage(&self) -> Option<&str> {
        self.metadata.get("stage").and_then(Value::as_str)
    }
}

fn clamp_confidence(c: f64) -> f64 {
    if c.is_nan() {
        0.0
    } else {
        c.clamp(0.0, 1.0)
    }
}
