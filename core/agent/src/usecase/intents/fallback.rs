//! どのルールにも当たらなかったときの応答

use crate::domain::{Context, Response};
use crate::rule::{IntentContext, IntentError, Rule};

pub const FALLBACK_TEXT: &str = "I'm not sure I understand. Type 'help' to see what I can do.";

pub struct FallbackRule;

impl Rule for FallbackRule {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn matches(&self, _text: &str, _context: &Context) -> bool {
        true
    }

    fn handle(&self, _text: &str, _ctx: &mut IntentContext<'_>) -> Result<Response, IntentError> {
        Ok(Response::new(FALLBACK_TEXT, "fallback", 0.2))
    }
}
