//! 組み込みのインテント（ルール実装）
//!
//! `builtin_rules` の登録順がそのままマッチの優先順位になる。

pub mod age;
pub mod calc;
pub mod echo;
pub mod fallback;
pub mod farewell;
pub mod greeting;
pub mod help;
pub mod leap_year;
pub mod notes;
pub mod reminders;
pub mod reset;
pub mod search;
pub mod tasks;

pub use age::AgeRule;
pub use calc::CalcRule;
pub use echo::EchoRule;
pub use fallback::FallbackRule;
pub use farewell::FarewellRule;
pub use greeting::GreetingRule;
pub use help::HelpRule;
pub use leap_year::LeapYearRule;
pub use notes::NotesRule;
pub use reminders::RemindersRule;
pub use reset::ResetRule;
pub use search::SearchRule;
pub use tasks::TasksRule;

use crate::ports::outbound::{ExpressionEvaluator, WebSearch};
use crate::rule::RuleRegistry;
use std::sync::Arc;

/// 組み込みルールを優先順に並べたレジストリ（フォールバックは含まない）
pub fn builtin_rules(
    evaluator: Arc<dyn ExpressionEvaluator>,
    search: Arc<dyn WebSearch>,
) -> RuleRegistry {
    let mut reg = RuleRegistry::new();
    reg.push(Arc::new(GreetingRule::new()));
    reg.push(Arc::new(HelpRule));
    reg.push(Arc::new(FarewellRule::new()));
    reg.push(Arc::new(EchoRule));
    reg.push(Arc::new(CalcRule::new(evaluator)));
    reg.push(Arc::new(AgeRule));
    reg.push(Arc::new(LeapYearRule));
    reg.push(Arc::new(RemindersRule));
    reg.push(Arc::new(NotesRule));
    reg.push(Arc::new(TasksRule));
    reg.push(Arc::new(ResetRule));
    reg.push(Arc::new(SearchRule::new(search)));
    reg
}

/// `token` で始まるコマンドなら残りの引数（前後の空白を除く）を返す。
/// 大文字小文字は区別しない。`token` の直後は空白か終端でなければならない。
pub fn command_arg<'a>(text: &'a str, token: &str) -> Option<&'a str> {
    let text = text.trim();
    let head = text.get(..token.len())?;
    if !head.eq_ignore_ascii_case(token) {
        return None;
    }
    let rest = &text[token.len()..];
    if rest.is_empty() {
        Some("")
    } else if rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

const REMIND_PREFIX: &str = "remind";

/// 引数を取るコマンドの先頭語（`remind` は前方一致で別扱い）
const COMMAND_TOKENS: &[&str] = &[
    "/echo",
    "calc",
    "age",
    "leap",
    "note",
    "notes",
    "task",
    "tasks",
    "done",
    "delete task",
    "search",
];

/// 組み込みコマンドで始まるメッセージか。
/// 挨拶・ヘルプ・別れはこれを見て、コマンド本文中の単語には反応しない。
pub fn starts_with_command(text: &str) -> bool {
    let head = text.trim_start();
    head.get(..REMIND_PREFIX.len())
        .is_some_and(|h| h.eq_ignore_ascii_case(REMIND_PREFIX))
        || COMMAND_TOKENS
            .iter()
            .any(|token| command_arg(head, token).is_some())
}

/// 前後の空白を除いて完全一致（大文字小文字は区別しない）
pub fn is_exact(text: &str, word: &str) -> bool {
    text.trim().eq_ignore_ascii_case(word)
}
