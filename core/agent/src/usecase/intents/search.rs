//! `search <query>`: 外部検索に委譲する

use super::command_arg;
use crate::domain::{Context, Response};
use crate::ports::outbound::WebSearch;
use crate::rule::{IntentContext, IntentError, Rule};
use std::sync::Arc;

const TOKEN: &str = "search";

pub struct SearchRule {
    search: Arc<dyn WebSearch>,
}

impl SearchRule {
    pub fn new(search: Arc<dyn WebSearch>) -> Self {
        Self { search }
    }
}

impl Rule for SearchRule {
    fn name(&self) -> &'static str {
        "search"
    }

    fn matches(&self, text: &str, _context: &Context) -> bool {
        command_arg(text, TOKEN).is_some()
    }

    fn handle(&self, text: &str, _ctx: &mut IntentContext<'_>) -> Result<Response, IntentError> {
        let query = command_arg(text, TOKEN).unwrap_or("");
        if query.is_empty() {
            return Err(IntentError::usage("Usage: search <query>"));
        }
        let answer = self
            .search
            .search(query)
            .map_err(|e| IntentError::failed(format!("Search failed: {}", e)))?;
        Ok(Response::new(answer, "search", 0.8).with_meta("query", query))
    }
}
