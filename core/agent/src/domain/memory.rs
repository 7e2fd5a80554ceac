//! 永続メモリのドメイン型
//!
//! ディスク上は 1 つの JSON オブジェクト。既知のキーは型付きフィールド、
//! それ以外のキーは `extra` にそのまま保持して書き戻す。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// メモリ全体（ロード・セーブは常にまるごと）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default)]
    pub reminders: Vec<Reminder>,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// 未知のキー（前方互換）
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Memory {
    /// すべて消す（reset）
    pub fn clear(&mut self) {
        *self = Memory::default();
    }

    pub fn is_empty(&self) -> bool {
        self.user_name.is_none()
            && self.reminders.is_empty()
            && self.notes.is_empty()
            && self.tasks.is_empty()
            && self.extra.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub text: String,
    pub due_time: DateTime<Utc>,
    pub created: DateTime<Utc>,
}

impl Reminder {
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.due_time
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub text: String,
    pub created: DateTime<Utc>,
}

/// タスク。pending → completed の一方向のみ。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            completed: false,
            completed_at: None,
        }
    }

    /// 完了にする。既に完了済みなら何もせず false。
    pub fn complete(&mut self, at: DateTime<Utc>) -> bool {
        if self.completed {
            return false;
        }
        self.completed = true;
        self.completed_at = Some(at);
        true
    }
}
