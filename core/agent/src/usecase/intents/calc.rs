//! `calc <expr>`: 制限付き数式評価に委譲する

use super::command_arg;
use crate::domain::{Context, Response};
use crate::ports::outbound::ExpressionEvaluator;
use crate::rule::{IntentContext, IntentError, Rule};
use std::sync::Arc;

const TOKEN: &str = "calc";

pub struct CalcRule {
    evaluator: Arc<dyn ExpressionEvaluator>,
}

impl CalcRule {
    pub fn new(evaluator: Arc<dyn ExpressionEvaluator>) -> Self {
        Self { evaluator }
    }
}

impl Rule for CalcRule {
    fn name(&self) -> &'static str {
        "calc"
    }

    fn matches(&self, text: &str, _context: &Context) -> bool {
        command_arg(text, TOKEN).is_some()
    }

    fn handle(&self, text: &str, _ctx: &mut IntentContext<'_>) -> Result<Response, IntentError> {
        let expr = command_arg(text, TOKEN).unwrap_or("");
        if expr.is_empty() {
            return Err(IntentError::usage("Usage: calc <expression>  (e.g. calc 2+2*5)"));
        }
        let value = self
            .evaluator
            .evaluate(expr)
            .map_err(|e| IntentError::failed(format!("Calculation error: {}", e)))?;
        Ok(
            Response::new(format!("Result: {}", format_number(value)), "calc", 0.95)
                .with_meta("expression", expr)
                .with_meta("value", value),
        )
    }
}

/// 整数値は小数点なしで表示する
pub fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}
