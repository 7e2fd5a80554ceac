//! 実行時ディレクトリ（XDG / AGENT_HOME 解決結果）
//!
//! EnvResolver::resolve_dirs() で取得し、メモリファイル・ログのパス計算に使う。

use std::path::PathBuf;

/// 解決済みの config / data / state ディレクトリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dirs {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
    pub state_dir: PathBuf,
}

impl Dirs {
    /// ログ格納ディレクトリ（state/logs）
    pub fn logs_dir(&self) -> PathBuf {
        self.state_dir.join("logs")
    }
}
