//! 配線: 標準アダプタで Dispatcher を組み立てる

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use common::adapter::{FileJsonLog, NoopLog, StdClock, StdEnvResolver, StdFileSystem};
use common::error::Error;
use common::ports::outbound::{Clock, EnvResolver, FileSystem, Log};

use crate::adapter::{
    DisabledSearch, InstantAnswerSearch, JsonFileMemoryStore, LoggingMemoryStore,
    RestrictedEvaluator, DEFAULT_SEARCH_ENDPOINT, DEFAULT_TIMEOUT_SECS,
};
use crate::cli::Config;
use crate::ports::outbound::{ExpressionEvaluator, MemoryStore, WebSearch};
use crate::usecase::intents::builtin_rules;
use crate::usecase::Dispatcher;

/// 配線で組み立てたポート群（main の Command ディスパッチで利用）
pub struct App {
    pub dispatcher: Arc<Dispatcher>,
    /// 構造化ログ（ファイルへ JSONL）。応答の表示とは別。
    pub logger: Arc<dyn Log>,
    /// 解決済みのメモリファイル（起動ログに出す）
    pub memory_path: PathBuf,
}

/// 配線: 標準アダプタ（環境変数・システム時刻）で App を組み立てる
pub fn wire_agent(config: &Config) -> Result<App, Error> {
    wire_agent_with(config, Arc::new(StdEnvResolver), Arc::new(StdClock))
}

/// 環境変数解決と時計を差し替えて App を組み立てる
pub fn wire_agent_with(
    config: &Config,
    env_resolver: Arc<dyn EnvResolver>,
    clock: Arc<dyn Clock>,
) -> Result<App, Error> {
    let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
    let logger: Arc<dyn Log> = env_resolver
        .resolve_log_file_path()
        .map(|path| Arc::new(FileJsonLog::new(Arc::clone(&fs), path)) as Arc<dyn Log>)
        .unwrap_or_else(|_| Arc::new(NoopLog));

    let memory_path = match &config.memory_path {
        Some(p) => p.clone(),
        None => env_resolver.resolve_memory_file_path()?,
    };
    let store: Arc<dyn MemoryStore> = Arc::new(LoggingMemoryStore::new(
        Arc::new(JsonFileMemoryStore::new(Arc::clone(&fs), &memory_path)),
        Arc::clone(&logger),
    ));

    let search: Arc<dyn WebSearch> = if config.no_search {
        Arc::new(DisabledSearch)
    } else {
        let endpoint = env_resolver
            .search_endpoint_from_env()
            .unwrap_or_else(|| DEFAULT_SEARCH_ENDPOINT.to_string());
        let timeout = env_resolver
            .search_timeout_from_env()
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let search = InstantAnswerSearch::new(endpoint, Duration::from_secs(timeout))
            .map_err(|e| Error::system(e.to_string()))?;
        Arc::new(search)
    };
    let evaluator: Arc<dyn ExpressionEvaluator> = Arc::new(RestrictedEvaluator::new());

    let dispatcher = Dispatcher::builder(store, clock)
        .rules(builtin_rules(evaluator, search))
        .log(Arc::clone(&logger))
        .build();

    Ok(App {
        dispatcher: Arc::new(dispatcher),
        logger,
        memory_path,
    })
}
