//! エラーハンドリング
//!
//! 全レイヤー共通のエラー型。CLI では `exit_code()` で終了コードに変換する。

/// 終了コード: 引数不正（EX_USAGE）
pub const EXIT_USAGE: i32 = 64;
/// 終了コード: システムエラー（EX_SOFTWARE）
pub const EXIT_SYSTEM: i32 = 70;
/// 終了コード: I/O エラー（EX_IOERR）
pub const EXIT_IO: i32 = 74;

/// エラー型
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Io(String),
    #[error("JSON error: {0}")]
    Json(String),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    Env(String),
    #[error("{0}")]
    System(String),
}

impl Error {
    /// I/O エラー
    pub fn io_msg(msg: impl Into<String>) -> Self {
        Error::Io(msg.into())
    }

    /// 引数不正エラー
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// 環境変数まわりのエラー
    pub fn env(msg: impl Into<String>) -> Self {
        Error::Env(msg.into())
    }

    /// システムエラー
    pub fn system(msg: impl Into<String>) -> Self {
        Error::System(msg.into())
    }

    /// 使い方の誤り（main で usage を表示するか）
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidArgument(_) => EXIT_USAGE,
            Error::Io(_) | Error::Json(_) => EXIT_IO,
            Error::Env(_) | Error::System(_) => EXIT_SYSTEM,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e.to_string())
    }
}
