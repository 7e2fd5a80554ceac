//! ノート: `note <text>` で追記、`notes` で一覧（追記のみ、編集・削除なし）

use super::{command_arg, is_exact};
use crate::domain::time_expr::format_timestamp;
use crate::domain::{Context, Note, Response};
use crate::rule::{IntentContext, IntentError, Rule};

const LIST: &str = "notes";
const TOKEN: &str = "note";

pub struct NotesRule;

impl Rule for NotesRule {
    fn name(&self) -> &'static str {
        "notes"
    }

    fn matches(&self, text: &str, _context: &Context) -> bool {
        is_exact(text, LIST) || command_arg(text, TOKEN).is_some()
    }

    fn handle(&self, text: &str, ctx: &mut IntentContext<'_>) -> Result<Response, IntentError> {
        if is_exact(text, LIST) {
            return Ok(list(ctx));
        }
        let body = command_arg(text, TOKEN).unwrap_or("");
        if body.is_empty() {
            return Err(IntentError::usage("Usage: note <text>"));
        }
        let created = ctx.now();
        ctx.memory.notes.push(Note {
            text: body.to_string(),
            created,
        });
        Ok(Response::new(format!("Note saved: {}", body), "note_add", 0.95)
            .with_meta("index", ctx.memory.notes.len()))
    }
}

fn list(ctx: &IntentContext<'_>) -> Response {
    let notes = &ctx.memory.notes;
    if notes.is_empty() {
        return Response::new("No notes saved.", "note_list", 0.9);
    }
    let mut lines = vec!["Notes:".to_string()];
    lines.extend(notes.iter().enumerate().map(|(i, n)| {
        format!("{}. {} ({})", i + 1, n.text, format_timestamp(n.created))
    }));
    Response::new(lines.join("\n"), "note_list", 0.9).with_meta("count", notes.len())
}
