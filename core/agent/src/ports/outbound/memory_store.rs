//! メモリ永続化 Outbound ポート
//!
//! ロード・セーブは常にレコード全体。最後に書いたものが勝つ。

use crate::domain::Memory;
use common::error::Error;

/// メモリの読み書き
pub trait MemoryStore: Send + Sync {
    /// 読み込む。保存先が無い・壊れている場合は空のメモリを返す（失敗しない）
    fn load(&self) -> Memory;

    /// 全体を上書き保存する
    fn save(&self, memory: &Memory) -> Result<(), Error>;
}
