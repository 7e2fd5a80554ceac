//! テスト用のスタブ（ネットワーク・時刻・ファイルを使わない）

use crate::domain::Memory;
use crate::ports::outbound::{MemoryStore, SearchError, WebSearch};
use crate::usecase::intents::builtin_rules;
use crate::usecase::{Dispatcher, DispatcherBuilder};
use crate::adapter::RestrictedEvaluator;
use common::adapter::FixedClock;
use common::error::Error;
use common::ports::outbound::{Log, LogRecord};
use std::sync::{Arc, Mutex};

pub const NOW: &str = "2024-05-16T12:00:00Z";

/// メモリ上に保存するストア。save の回数と最後の内容を記録する。
#[derive(Default)]
pub struct InMemoryStore {
    pub initial: Memory,
    pub saved: Mutex<Vec<Memory>>,
    pub fail_save: bool,
}

impl InMemoryStore {
    pub fn with(initial: Memory) -> Self {
        Self {
            initial,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_save: true,
            ..Default::default()
        }
    }

    pub fn save_count(&self) -> usize {
        self.saved.lock().unwrap().len()
    }

    pub fn last_saved(&self) -> Option<Memory> {
        self.saved.lock().unwrap().last().cloned()
    }
}

impl MemoryStore for InMemoryStore {
    fn load(&self) -> Memory {
        self.initial.clone()
    }

    fn save(&self, memory: &Memory) -> Result<(), Error> {
        if self.fail_save {
            return Err(Error::io_msg("disk full"));
        }
        self.saved.lock().unwrap().push(memory.clone());
        Ok(())
    }
}

/// 固定の答えを返す検索
pub struct StubSearch(pub Result<String, SearchError>);

impl WebSearch for StubSearch {
    fn search(&self, _query: &str) -> Result<String, SearchError> {
        self.0.clone()
    }
}

/// ログを溜めるだけの Log
#[derive(Default)]
pub struct CaptureLog(pub Mutex<Vec<LogRecord>>);

impl CaptureLog {
    pub fn messages(&self) -> Vec<String> {
        self.0.lock().unwrap().iter().map(|r| r.message.clone()).collect()
    }
}

impl Log for CaptureLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        self.0.lock().unwrap().push(record.clone());
        Ok(())
    }
}

pub fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::at(NOW).unwrap())
}

/// 組み込みルールを並べた builder（検索は固定の答え）
pub fn builtin_builder(store: Arc<InMemoryStore>, clock: Arc<FixedClock>) -> DispatcherBuilder {
    let search = Arc::new(StubSearch(Ok("Stub answer.".to_string())));
    Dispatcher::builder(store, clock)
        .rules(builtin_rules(Arc::new(RestrictedEvaluator::new()), search))
}

pub fn builtin_dispatcher() -> (Dispatcher, Arc<InMemoryStore>, Arc<FixedClock>) {
    let store = Arc::new(InMemoryStore::default());
    let clock = fixed_clock();
    let d = builtin_builder(Arc::clone(&store), Arc::clone(&clock)).build();
    (d, store, clock)
}
