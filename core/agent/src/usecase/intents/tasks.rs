//! タスク: `task <text>` / `tasks` / `done <n>` / `delete task <n>`
//!
//! 番号は常に保存されている配列上の 1 始まりの位置。一覧で Pending / Completed に
//! 分けて表示しても番号は変わらない。

use super::{command_arg, is_exact};
use crate::domain::{Context, Response, Task};
use crate::rule::{IntentContext, IntentError, Rule};

const LIST: &str = "tasks";
const ADD: &str = "task";
const DONE: &str = "done";
const DELETE: &str = "delete task";

pub struct TasksRule;

enum Command<'a> {
    List,
    Add(&'a str),
    Done(&'a str),
    Delete(&'a str),
}

fn parse(text: &str) -> Option<Command<'_>> {
    if is_exact(text, LIST) {
        return Some(Command::List);
    }
    if let Some(arg) = command_arg(text, DELETE) {
        return Some(Command::Delete(arg));
    }
    if let Some(arg) = command_arg(text, DONE) {
        return Some(Command::Done(arg));
    }
    command_arg(text, ADD).map(Command::Add)
}

impl Rule for TasksRule {
    fn name(&self) -> &'static str {
        "tasks"
    }

    fn matches(&self, text: &str, _context: &Context) -> bool {
        parse(text).is_some()
    }

    fn handle(&self, text: &str, ctx: &mut IntentContext<'_>) -> Result<Response, IntentError> {
        match parse(text) {
            Some(Command::List) => Ok(list(&ctx.memory.tasks)),
            Some(Command::Add(body)) => add(body, ctx),
            Some(Command::Done(arg)) => done(arg, ctx),
            Some(Command::Delete(arg)) => delete(arg, ctx),
            None => Err(IntentError::Internal(format!(
                "tasks rule dispatched for non-task message '{}'",
                text
            ))),
        }
    }
}

fn list(tasks: &[Task]) -> Response {
    if tasks.is_empty() {
        return Response::new("No tasks found.", "task_list", 0.9);
    }
    let line = |(i, t): (usize, &Task)| format!("  {}. {}", i + 1, t.text);
    let pending: Vec<String> = tasks
        .iter()
        .enumerate()
        .filter(|(_, t)| !t.completed)
        .map(line)
        .collect();
    let completed: Vec<String> = tasks
        .iter()
        .enumerate()
        .filter(|(_, t)| t.completed)
        .map(line)
        .collect();

    let mut out = Vec::new();
    if !pending.is_empty() {
        out.push("Pending:".to_string());
        out.extend(pending.iter().cloned());
    }
    if !completed.is_empty() {
        out.push("Completed:".to_string());
        out.extend(completed.iter().cloned());
    }
    Response::new(out.join("\n"), "task_list", 0.9)
        .with_meta("pending", pending.len())
        .with_meta("completed", completed.len())
}

fn add(body: &str, ctx: &mut IntentContext<'_>) -> Result<Response, IntentError> {
    if body.is_empty() {
        return Err(IntentError::usage("Usage: task <text>"));
    }
    ctx.memory.tasks.push(Task::new(body));
    let n = ctx.memory.tasks.len();
    Ok(
        Response::new(format!("Task {} added: {}", n, body), "task_add", 0.95)
            .with_meta("index", n),
    )
}

/// 1 始まりの番号を配列の添字に変換する
fn resolve_index(arg: &str, usage: &str, len: usize) -> Result<usize, IntentError> {
    let n: usize = arg
        .parse()
        .map_err(|_| IntentError::usage(usage.to_string()))?;
    if n == 0 || n > len {
        return Err(IntentError::not_found(format!("Task {} not found.", n)));
    }
    Ok(n - 1)
}

fn done(arg: &str, ctx: &mut IntentContext<'_>) -> Result<Response, IntentError> {
    let idx = resolve_index(arg, "Usage: done <task number>", ctx.memory.tasks.len())?;
    let now = ctx.now();
    let task = &mut ctx.memory.tasks[idx];
    let text = if task.complete(now) {
        format!("Task {} completed: {}", idx + 1, task.text)
    } else {
        format!("Task {} is already completed: {}", idx + 1, task.text)
    };
    Ok(Response::new(text, "task_done", 0.95).with_meta("index", idx + 1))
}

fn delete(arg: &str, ctx: &mut IntentContext<'_>) -> Result<Response, IntentError> {
    let idx = resolve_index(arg, "Usage: delete task <task number>", ctx.memory.tasks.len())?;
    let removed = ctx.memory.tasks.remove(idx);
    Ok(Response::new(
        format!("Task {} deleted: {}", idx + 1, removed.text),
        "task_delete",
        0.95,
    )
    .with_meta("index", idx + 1))
}
