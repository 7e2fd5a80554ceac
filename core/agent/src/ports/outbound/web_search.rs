//! Web 検索 Outbound ポート

/// 検索エラー
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    #[error("search timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected response: {0}")]
    Parse(String),
    #[error("search is disabled")]
    Disabled,
}

/// クエリを外部検索に投げ、表示用テキストを返す
pub trait WebSearch: Send + Sync {
    fn search(&self, query: &str) -> Result<String, SearchError>;
}
