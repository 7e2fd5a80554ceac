//! 別れの挨拶

use super::starts_with_command;
use crate::domain::{Context, Response};
use crate::rule::{IntentContext, IntentError, Rule};
use regex::Regex;

pub struct FarewellRule {
    trigger: Regex,
}

impl FarewellRule {
    pub fn new() -> Self {
        Self {
            trigger: Regex::new(r"(?i)\b(bye|goodbye|see ya|ttyl)\b")
                .expect("farewell pattern is valid"),
        }
    }
}

impl Default for FarewellRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for FarewellRule {
    fn name(&self) -> &'static str {
        "farewell"
    }

    fn matches(&self, text: &str, _context: &Context) -> bool {
        !starts_with_command(text) && self.trigger.is_match(text)
    }

    fn handle(&self, _text: &str, _ctx: &mut IntentContext<'_>) -> Result<Response, IntentError> {
        Ok(Response::new(
            "Goodbye! Talk to you soon.",
            "farewell",
            0.9,
        ))
    }
}
