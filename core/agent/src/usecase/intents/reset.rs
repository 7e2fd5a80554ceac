//! `reset` / `/reset`: メモリを空にする（保存は Dispatcher が行う）

use super::is_exact;
use crate::domain::{Context, Response};
use crate::rule::{IntentContext, IntentError, Rule};

pub struct ResetRule;

impl Rule for ResetRule {
    fn name(&self) -> &'static str {
        "reset"
    }

    fn matches(&self, text: &str, _context: &Context) -> bool {
        is_exact(text, "reset") || is_exact(text, "/reset")
    }

    fn handle(&self, _text: &str, ctx: &mut IntentContext<'_>) -> Result<Response, IntentError> {
        ctx.memory.clear();
        Ok(Response::new("Memory cleared.", "reset", 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Memory, Task};
    use common::adapter::StdClock;

    #[test]
    fn test_reset_clears_everything() {
        let mut memory = Memory {
            user_name: Some("Ada".to_string()),
            ..Default::default()
        };
        memory.tasks.push(Task::new("x"));
        let context = Context::new();
        let clock = StdClock;
        let mut ctx = IntentContext::new(&context, &mut memory, &clock);
        let r = ResetRule.handle("reset", &mut ctx).unwrap();
        assert_eq!(r.text, "Memory cleared.");
        assert_eq!(r.confidence, 1.0);
        assert!(memory.is_empty());
    }

    #[test]
    fn test_matches_exact_only() {
        let ctx = Context::new();
        assert!(ResetRule.matches("/reset", &ctx));
        assert!(ResetRule.matches(" RESET ", &ctx));
        assert!(!ResetRule.matches("reset my password", &ctx));
    }
}
