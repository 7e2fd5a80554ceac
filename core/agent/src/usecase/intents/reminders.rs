//! リマインダー: `remind ...` で登録、`reminders` で一覧
//!
//! 一覧の DUE / 残り時間は保存値ではなく、表示のたびに現在時刻から求める。

use super::is_exact;
use crate::domain::time_expr::{
    format_remaining, format_timestamp, parse_reminder, TimeExprError,
};
use crate::domain::{Context, Reminder, Response};
use crate::rule::{IntentContext, IntentError, Rule};

const LIST: &str = "reminders";
const PREFIX: &str = "remind";

const USAGE: &str = "I couldn't find a time in that. Try: remind me to <task> in <N> minutes|hours|days, \
or remind me to <task> today / tomorrow.";

pub struct RemindersRule;

impl Rule for RemindersRule {
    fn name(&self) -> &'static str {
        "reminders"
    }

    fn matches(&self, text: &str, _context: &Context) -> bool {
        is_exact(text, LIST)
            || text
                .trim_start()
                .get(..PREFIX.len())
                .is_some_and(|h| h.eq_ignore_ascii_case(PREFIX))
    }

    fn handle(&self, text: &str, ctx: &mut IntentContext<'_>) -> Result<Response, IntentError> {
        if is_exact(text, LIST) {
            Ok(list(ctx))
        } else {
            set(text, ctx)
        }
    }
}

fn list(ctx: &IntentContext<'_>) -> Response {
    let reminders = &ctx.memory.reminders;
    if reminders.is_empty() {
        return Response::new("No reminders set.", "reminder_list", 0.9);
    }
    let now = ctx.now();
    let mut lines = vec!["Reminders:".to_string()];
    for (i, r) in reminders.iter().enumerate() {
        let status = if r.is_due(now) {
            "DUE".to_string()
        } else {
            format!("in {}", format_remaining(r.due_time - now))
        };
        lines.push(format!(
            "{}. {} (due {}) - {}",
            i + 1,
            r.text,
            format_timestamp(r.due_time),
            status
        ));
    }
    Response::new(lines.join("\n"), "reminder_list", 0.9).with_meta("count", reminders.len())
}

fn set(text: &str, ctx: &mut IntentContext<'_>) -> Result<Response, IntentError> {
    let now = ctx.now();
    let req = parse_reminder(text, now).map_err(|e| match e {
        TimeExprError::Missing => IntentError::usage(USAGE),
        TimeExprError::OutOfRange(_) => {
            IntentError::usage(format!("Sorry, {}. Please pick a nearer time.", e))
        }
    })?;
    let reply = format!(
        "Reminder set: '{}' at {}.",
        req.text,
        format_timestamp(req.due)
    );
    ctx.memory.reminders.push(Reminder {
        text: req.text,
        due_time: req.due,
        created: now,
    });
    Ok(Response::new(reply, "reminder_set", 0.95)
        .with_meta("due_time", req.due.to_rfc3339())
        .with_meta("index", ctx.memory.reminders.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Memory;
    use chrono::{DateTime, Duration, Utc};
    use common::adapter::FixedClock;

    const NOW: &str = "2024-05-16T12:00:00Z";

    fn t(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn handle(text: &str, memory: &mut Memory, clock: &FixedClock) -> Result<Response, IntentError> {
        let context = Context::new();
        let mut ctx = IntentContext::new(&context, memory, clock);
        RemindersRule.handle(text, &mut ctx)
    }

    #[test]
    fn test_matches() {
        let ctx = Context::new();
        assert!(RemindersRule.matches("reminders", &ctx));
        assert!(RemindersRule.matches("Remind me to stretch in 5 minutes", &ctx));
        assert!(!RemindersRule.matches("please remind me", &ctx));
    }

    #[test]
    fn test_set_appends_reminder() {
        let clock = FixedClock::at(NOW).unwrap();
        let mut memory = Memory::default();
        let r = handle("remind me to call mom in 2 hours", &mut memory, &clock).unwrap();
        assert_eq!(r.intent, "reminder_set");
        assert_eq!(r.confidence, 0.95);
        assert!(r.text.contains("call mom"));
        assert!(r.text.contains("2024-05-16 14:00 UTC"));
        assert_eq!(memory.reminders.len(), 1);
        assert_eq!(memory.reminders[0].text, "call mom");
        assert_eq!(memory.reminders[0].due_time, t("2024-05-16T14:00:00Z"));
        assert_eq!(memory.reminders[0].created, t(NOW));
    }

    #[test]
    fn test_set_without_time_leaves_memory_untouched() {
        let clock = FixedClock::at(NOW).unwrap();
        let mut memory = Memory::default();
        let err = handle("remind me to call mom", &mut memory, &clock).unwrap_err();
        assert!(matches!(err, IntentError::Usage(_)));
        assert!(memory.reminders.is_empty());
    }

    #[test]
    fn test_list_empty() {
        let clock = FixedClock::at(NOW).unwrap();
        let mut memory = Memory::default();
        let r = handle("reminders", &mut memory, &clock).unwrap();
        assert_eq!(r.text, "No reminders set.");
    }

    #[test]
    fn test_list_derives_status_from_now() {
        let clock = FixedClock::at(NOW).unwrap();
        let mut memory = Memory::default();
        handle("remind me to stretch in 30 minutes", &mut memory, &clock).unwrap();
        handle("remind me to pay rent in 2 days", &mut memory, &clock).unwrap();
        let before = memory.clone();

        let r = handle("reminders", &mut memory, &clock).unwrap();
        assert_eq!(memory, before);
        let lines: Vec<&str> = r.text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("1. stretch"));
        assert!(lines[1].ends_with("in 30m"));
        assert!(lines[2].ends_with("in 2d 0h"));

        clock.set(t(NOW) + Duration::hours(1));
        let r = handle("reminders", &mut memory, &clock).unwrap();
        let lines: Vec<&str> = r.text.lines().collect();
        assert!(lines[1].ends_with("DUE"));
        assert!(lines[2].ends_with("in 1d 23h"));
    }
}
