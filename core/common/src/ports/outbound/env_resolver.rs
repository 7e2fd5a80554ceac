//! 環境変数解決 Outbound ポート
//!
//! 設定・データ・状態ディレクトリやメモリファイルの場所を環境変数から解決する。
//! usecase / wiring はこの trait 経由でのみ環境変数にアクセスする。

use crate::domain::Dirs;
use crate::error::Error;
use std::path::PathBuf;

/// メモリファイルの既定ファイル名（data_dir 直下）
pub const MEMORY_FILENAME: &str = "memory.json";
/// ログファイルの既定ファイル名（logs_dir 直下）
pub const LOG_FILENAME: &str = "agent.jsonl";

/// 環境変数解決抽象（Outbound ポート）
///
/// 実装は `common::adapter::StdEnvResolver` など。
pub trait EnvResolver: Send + Sync {
    /// 実行時ディレクトリを解決する
    ///
    /// 優先順位:
    /// 1. AGENT_HOME（設定されていれば config / data / state をその配下に置く）
    /// 2. XDG_CONFIG_HOME / XDG_DATA_HOME / XDG_STATE_HOME 配下の agent
    /// 3. $HOME/.config, $HOME/.local/share, $HOME/.local/state 配下の agent
    fn resolve_dirs(&self) -> Result<Dirs, Error>;

    /// AGENT_MEMORY_FILE（空なら None）
    fn memory_file_from_env(&self) -> Option<PathBuf>;

    /// AGENT_SEARCH_ENDPOINT（空なら None）
    fn search_endpoint_from_env(&self) -> Option<String>;

    /// AGENT_SEARCH_TIMEOUT_SECS（数値でなければ None）
    fn search_timeout_from_env(&self) -> Option<u64>;

    /// メモリファイルのパス。環境変数が優先、なければ data_dir/memory.json
    fn resolve_memory_file_path(&self) -> Result<PathBuf, Error> {
        if let Some(p) = self.memory_file_from_env() {
            return Ok(p);
        }
        Ok(self.resolve_dirs()?.data_dir.join(MEMORY_FILENAME))
    }

    /// 構造化ログ（JSONL）のパス
    fn resolve_log_file_path(&self) -> Result<PathBuf, Error> {
        Ok(self.resolve_dirs()?.logs_dir().join(LOG_FILENAME))
    }
}
