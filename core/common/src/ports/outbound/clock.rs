//! 時刻取得 Outbound ポート
//!
//! usecase はこの trait 経由でのみ「現在時刻」を取得する。
//! リマインダーの期限計算や年齢計算をテストで固定時刻にするため。

use chrono::{DateTime, Utc};

/// 時刻取得の抽象
///
/// 実装は `common::adapter::StdClock` やテスト用の `FixedClock` など。
pub trait Clock: Send + Sync {
    /// 現在時刻（UTC）
    fn now(&self) -> DateTime<Utc>;
}
