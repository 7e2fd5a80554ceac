//! Ports & Adapters のポート定義
//!
//! - inbound: ドライバ（CLI）がアプリを呼び出すインターフェース
//! - outbound: アプリが外界（永続化・数式評価・Web 検索）を使うための trait

pub mod inbound;
pub mod outbound;
