//! Inbound ポート: ドライバ（CLI・組み込み側）がアプリを呼び出すインターフェース

use crate::cli::Config;
use crate::domain::{Context, Response};
use common::error::Error;

/// メッセージを 1 件処理する Inbound ポート
///
/// 失敗はすべて `intent = "error"` の Response に正規化され、呼び出し側へ Err は返らない。
pub trait Dispatch: Send + Sync {
    fn process(&self, message: &str, context: Option<&Context>) -> Response;
}

/// CLI の設定から 1 回分の実行を行う Inbound ポート
///
/// main はこの trait を実装した Runner の run を呼び出す。
pub trait UseCaseRunner {
    fn run(&self, config: Config) -> Result<i32, Error>;
}
