//! agent コマンドの enum（Command Pattern）
//!
//! 1 件処理して終わるか、標準入力から対話的に読み続けるかを enum で明示する。

/// agent の実行モード
#[derive(Debug, Clone, PartialEq)]
pub enum AgentCommand {
    /// ヘルプ表示
    Help,
    /// 引数のメッセージを 1 件処理して終了
    Message { text: String },
    /// 標準入力から 1 行ずつ処理（EOF / exit / quit で終了）
    Interactive,
}
