//! ヘルプ: キーワードを含めば機能一覧を返す（コマンドで始まるメッセージは除く）

use super::starts_with_command;
use crate::domain::{Context, Response};
use crate::rule::{IntentContext, IntentError, Rule};

const KEYWORDS: &[&str] = &["help", "what can you do", "commands", "?help"];

pub const HELP_TEXT: &str = "\
Here's what I can do:
  hi / hello / hey            say hello (tell me your name with \"I'm <name>\")
  /echo <text>                repeat text back
  calc <expression>           evaluate math, e.g. calc 2+2*5 or calc sqrt(2)
  age <YYYY-MM-DD>            compute age from a birth date
  leap <year>                 check whether a year is a leap year
  remind me to <task> in <N> minutes|hours|days (or today / tomorrow)
  reminders                   list reminders
  note <text> / notes         save a note / list notes
  task <text> / tasks         add a task / list tasks
  done <n> / delete task <n>  complete or delete task n
  search <query>              look something up on the web
  reset                       forget everything
  bye                         say goodbye";

pub struct HelpRule;

impl Rule for HelpRule {
    fn name(&self) -> &'static str {
        "help"
    }

    fn matches(&self, text: &str, _context: &Context) -> bool {
        if starts_with_command(text) {
            return false;
        }
        let lower = text.to_lowercase();
        KEYWORDS.iter().any(|k| lower.contains(k))
    }

    fn handle(&self, _text: &str, _ctx: &mut IntentContext<'_>) -> Result<Response, IntentError> {
        Ok(Response::new(HELP_TEXT, "help", 0.9))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_keywords_as_substrings() {
        let ctx = Context::new();
        assert!(HelpRule.matches("HELP", &ctx));
        assert!(HelpRule.matches("so, what can you do?", &ctx));
        assert!(HelpRule.matches("list commands", &ctx));
        assert!(HelpRule.matches("helpful", &ctx));
        assert!(!HelpRule.matches("hello", &ctx));
        assert!(!HelpRule.matches("task get help with taxes", &ctx));
        assert!(!HelpRule.matches("search help desk", &ctx));
    }
}
