//! `/echo [text]`: 最初の空白より後ろをそのまま返す

use super::command_arg;
use crate::domain::{Context, Response};
use crate::rule::{IntentContext, IntentError, Rule};

const TOKEN: &str = "/echo";

pub struct EchoRule;

impl Rule for EchoRule {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn matches(&self, text: &str, _context: &Context) -> bool {
        command_arg(text, TOKEN).is_some()
    }

    fn handle(&self, text: &str, _ctx: &mut IntentContext<'_>) -> Result<Response, IntentError> {
        let rest = text.split_once(' ').map(|(_, r)| r).unwrap_or("");
        Ok(Response::new(rest, "echo", 0.99))
    }
}
