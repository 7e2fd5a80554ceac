//! 挨拶: `hi` / `hello` / `hey`（単語境界、どこに現れてもよい。コマンドで始まるメッセージは除く）

use super::starts_with_command;
use crate::domain::{context_str, Context, Response};
use crate::rule::{IntentContext, IntentError, Rule};
use regex::Regex;

pub struct GreetingRule {
    trigger: Regex,
    name: Regex,
}

impl GreetingRule {
    pub const NAME: &'static str = "greeting";

    pub fn new() -> Self {
        Self {
            trigger: Regex::new(r"(?i)\b(hi|hello|hey)\b").expect("greeting pattern is valid"),
            // 名前は英字で始まり、英字・ハイフン・アポストロフィで 2〜30 文字
            name: Regex::new(r"(?i)\b(?:i'm|i am|im|my name is)\s+([a-z][a-z'\-]{1,29})(?:[^a-z'\-]|$)")
                .expect("name pattern is valid"),
        }
    }

    fn extract_name(&self, text: &str) -> Option<String> {
        self.name
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }
}

impl Default for GreetingRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for GreetingRule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn matches(&self, text: &str, _context: &Context) -> bool {
        !starts_with_command(text) && self.trigger.is_match(text)
    }

    fn handle(&self, text: &str, ctx: &mut IntentContext<'_>) -> Result<Response, IntentError> {
        let known = ctx
            .memory
            .user_name
            .clone()
            .or_else(|| context_str(ctx.context, "user_name").map(String::from));
        let name = match known {
            Some(n) => Some(n),
            None => {
                let extracted = self.extract_name(text);
                if let Some(ref n) = extracted {
                    ctx.memory.user_name = Some(n.clone());
                }
                extracted
            }
        };
        let reply = match &name {
            Some(n) => format!("Hello, {}! How can I help you today?", n),
            None => "Hello! How can I help you today?".to_string(),
        };
        let mut resp = Response::new(reply, "greet", 0.95);
        if let Some(n) = name {
            resp = resp.with_meta("user_name", n);
        }
        Ok(resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Memory;
    use common::adapter::FixedClock;

    fn run(text: &str, memory: &mut Memory, context: &Context) -> Response {
        let clock = FixedClock::at("2024-05-16T12:00:00Z").unwrap();
        let mut ctx = IntentContext::new(context, memory, &clock);
        GreetingRule::new().handle(text, &mut ctx).unwrap()
    }

    #[test]
    fn test_matches_on_word_boundary_only() {
        let rule = GreetingRule::new();
        let ctx = Context::new();
        assert!(rule.matches("Hi there", &ctx));
        assert!(rule.matches("well, HELLO", &ctx));
        assert!(rule.matches("hey!", &ctx));
        assert!(!rule.matches("this is a test", &ctx));
        assert!(!rule.matches("they said", &ctx));
    }

    #[test]
    fn test_declines_commands_containing_greeting_words() {
        let rule = GreetingRule::new();
        let ctx = Context::new();
        assert!(!rule.matches("note hello world", &ctx));
        assert!(!rule.matches("remind me to say hello in 2 hours", &ctx));
        assert!(!rule.matches("/echo hi", &ctx));
        assert!(rule.matches("hi ... bye", &ctx));
    }

    #[test]
    fn test_anonymous_greeting() {
        let mut memory = Memory::default();
        let r = run("hello", &mut memory, &Context::new());
        assert_eq!(r.text, "Hello! How can I help you today?");
        assert_eq!(r.intent, "greet");
        assert_eq!(r.confidence, 0.95);
        assert!(memory.user_name.is_none());
    }

    #[test]
    fn test_extracts_and_stores_name() {
        let mut memory = Memory::default();
        let r = run("hi, I'm Mary-Jane", &mut memory, &Context::new());
        assert_eq!(r.text, "Hello, Mary-Jane! How can I help you today?");
        assert_eq!(memory.user_name.as_deref(), Some("Mary-Jane"));
    }

    #[test]
    fn test_stored_name_wins_over_context_and_text() {
        let mut memory = Memory {
            user_name: Some("Ada".to_string()),
            ..Default::default()
        };
        let mut context = Context::new();
        context.insert("user_name".to_string(), serde_json::json!("Grace"));
        let r = run("hey I'm Bob", &mut memory, &context);
        assert_eq!(r.text, "Hello, Ada! How can I help you today?");
    }

    #[test]
    fn test_context_name_is_used_but_not_stored() {
        let mut memory = Memory::default();
        let mut context = Context::new();
        context.insert("user_name".to_string(), serde_json::json!("Grace"));
        let r = run("hi", &mut memory, &context);
        assert_eq!(r.text, "Hello, Grace! How can I help you today?");
        assert!(memory.user_name.is_none());
    }

    #[test]
    fn test_name_length_limits() {
        let rule = GreetingRule::new();
        assert_eq!(rule.extract_name("hi I'm X"), None);
        assert_eq!(rule.extract_name("hi I'm Al"), Some("Al".to_string()));
        let long = format!("hi I'm {}", "a".repeat(31));
        assert_eq!(rule.extract_name(&long), None);
    }
}
