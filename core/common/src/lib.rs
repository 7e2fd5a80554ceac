//! 共通ライブラリ
//!
//! `agent` が使うエラー型・ポート（trait）・標準アダプターを提供します。

/// エラーハンドリング
pub mod error;

/// 共通ドメイン型
pub mod domain;

/// Outbound ポート
pub mod ports;

/// ポートの標準実装
pub mod adapter;
