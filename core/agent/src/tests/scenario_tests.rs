//! 組み込みルールを通した会話シナリオ

use super::support::{
    builtin_builder, builtin_dispatcher, fixed_clock, InMemoryStore, StubSearch, NOW,
};
use crate::adapter::{JsonFileMemoryStore, RestrictedEvaluator};
use crate::domain::{Context, Response};
use crate::ports::inbound::Dispatch;
use crate::ports::outbound::SearchError;
use crate::rule::{IntentContext, IntentError, Rule};
use crate::usecase::intents::builtin_rules;
use crate::usecase::Dispatcher;
use chrono::{DateTime, Duration, Utc};
use common::adapter::StdFileSystem;
use std::sync::Arc;

fn t(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

#[test]
fn test_builtin_registration_order() {
    let (d, _, _) = builtin_dispatcher();
    assert_eq!(
        d.rule_names(),
        vec![
            "greeting", "help", "farewell", "echo", "calc", "age", "leap_year", "reminders",
            "notes", "tasks", "reset", "search"
        ]
    );
}

#[test]
fn test_greeting_beats_farewell() {
    let (d, _, _) = builtin_dispatcher();
    let r = d.process("hi ... bye", None);
    assert_eq!(r.intent, "greet");
    assert_eq!(r.text, "Hello! How can I help you today?");
    assert_eq!(d.process("ok bye now", None).intent, "farewell");
}

#[test]
fn test_greeting_remembers_name() {
    let (d, store, _) = builtin_dispatcher();
    let r = d.process("hello, I'm Ada", None);
    assert_eq!(r.text, "Hello, Ada! How can I help you today?");
    assert_eq!(store.last_saved().unwrap().user_name.as_deref(), Some("Ada"));
    assert_eq!(d.process("hey", None).text, "Hello, Ada! How can I help you today?");
}

#[test]
fn test_greeting_uses_context_name() {
    let (d, _, _) = builtin_dispatcher();
    let mut ctx = Context::new();
    ctx.insert("user_name".to_string(), serde_json::json!("Grace"));
    let r = d.process("hi", Some(&ctx));
    assert_eq!(r.text, "Hello, Grace! How can I help you today?");
    assert_eq!(d.memory_snapshot().user_name, None);
}

#[test]
fn test_unknown_message_falls_back() {
    let (d, _, _) = builtin_dispatcher();
    let r = d.process("purple elephants", None);
    assert_eq!(r.intent, "fallback");
    assert_eq!(r.confidence, 0.2);
}

#[test]
fn test_echo_keeps_text_verbatim() {
    let (d, _, _) = builtin_dispatcher();
    let r = d.process("/echo  Hello   World", None);
    assert_eq!(r.text, " Hello   World");
    assert_eq!(r.intent, "echo");
    assert_eq!(d.process("/echo", None).text, "");
}

#[test]
fn test_calc() {
    let (d, _, _) = builtin_dispatcher();
    let r = d.process("calc 2+2*5", None);
    assert_eq!(r.text, "Result: 12");
    assert_eq!(r.intent, "calc");
    assert_eq!(r.confidence, 0.95);
}

#[test]
fn test_calc_rejects_code() {
    let (d, _, _) = builtin_dispatcher();
    let r = d.process("calc __import__('os')", None);
    assert!(r.is_error());
    assert_eq!(r.confidence, 1.0);
    assert_eq!(r.stage(), None);
    assert!(r.text.starts_with("Calculation error:"));
}

#[test]
fn test_age_and_leap_year() {
    let (d, _, _) = builtin_dispatcher();
    let r = d.process("age 2000-05-17", None);
    assert_eq!(r.text, "You are 23 years old.");
    assert_eq!(r.intent, "age");
    assert_eq!(d.process("leap 2024", None).text, "2024 is a leap year.");
    assert_eq!(d.process("leap 1900", None).text, "1900 is not a leap year.");
    assert!(d.process("leap soon", None).is_error());
    assert!(d.process("age 2999-01-01", None).is_error());
}

#[test]
fn test_reminder_due_in_two_hours() {
    let (d, store, clock) = builtin_dispatcher();
    let r = d.process("remind me to call mom in 2 hours", None);
    assert_eq!(r.intent, "reminder_set");
    let saved = store.last_saved().unwrap();
    assert_eq!(saved.reminders.len(), 1);
    assert_eq!(saved.reminders[0].text, "call mom");
    assert_eq!(saved.reminders[0].due_time, t(NOW) + Duration::hours(2));

    let r = d.process("reminders", None);
    assert_eq!(r.intent, "reminder_list");
    assert!(r.text.contains("call mom"));
    assert!(r.text.contains("in 2h 0m"));

    clock.set(t(NOW) + Duration::hours(3));
    assert!(d.process("reminders", None).text.contains("DUE"));
}

#[test]
fn test_reminder_without_time_is_usage_error() {
    let (d, _, _) = builtin_dispatcher();
    let r = d.process("remind me to call mom", None);
    assert!(r.is_error());
    assert_eq!(r.stage(), None);
    assert!(d.memory_snapshot().reminders.is_empty());
}

#[test]
fn test_note_round_trip() {
    let (d, _, _) = builtin_dispatcher();
    assert_eq!(d.process("note buy stamps", None).text, "Note saved: buy stamps");
    let r = d.process("notes", None);
    assert!(r.text.contains("1. buy stamps"));
    assert_eq!(r.intent, "note_list");
}

#[test]
fn test_note_with_greeting_word_is_saved() {
    let (d, _, _) = builtin_dispatcher();
    let r = d.process("note hello world", None);
    assert_eq!(r.intent, "note_add");
    let notes = d.memory_snapshot().notes;
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].text, "hello world");
    let r = d.process("notes", None);
    assert_eq!(r.intent, "note_list");
    assert_eq!(r.text.matches("hello world").count(), 1);
}

#[test]
fn test_commands_win_over_conversational_keywords() {
    let (d, _, _) = builtin_dispatcher();
    assert_eq!(
        d.process("remind me to say hello in 2 hours", None).intent,
        "reminder_set"
    );
    assert_eq!(
        d.process("remind me to say bye to Sam in 1 hour", None).intent,
        "reminder_set"
    );
    assert_eq!(d.process("task get help with taxes", None).intent, "task_add");

    let memory = d.memory_snapshot();
    assert_eq!(memory.reminders.len(), 2);
    assert_eq!(memory.reminders[0].text, "say hello");
    assert_eq!(memory.reminders[1].text, "say bye to Sam");
    assert_eq!(memory.tasks.len(), 1);
    assert_eq!(memory.tasks[0].text, "get help with taxes");

    assert_eq!(d.process("hi ... bye", None).intent, "greet");
}

#[test]
fn test_task_done_listed_under_completed() {
    let (d, _, _) = builtin_dispatcher();
    d.process("task buy milk", None);
    d.process("task walk dog", None);
    assert_eq!(d.process("done 1", None).intent, "task_done");
    let r = d.process("tasks", None);
    let completed = r.text.split("Completed:").nth(1).unwrap();
    assert!(completed.contains("buy milk"));
    assert!(!completed.contains("walk dog"));
}

#[test]
fn test_done_out_of_range_does_not_mutate() {
    let (d, _, _) = builtin_dispatcher();
    d.process("task only one", None);
    let before = d.memory_snapshot();
    let r = d.process("done 99", None);
    assert!(r.is_error());
    assert_eq!(r.confidence, 1.0);
    assert_eq!(r.text, "Task 99 not found.");
    assert_eq!(d.memory_snapshot(), before);
}

#[test]
fn test_listings_never_mutate() {
    let (d, _, _) = builtin_dispatcher();
    d.process("task a", None);
    d.process("note b", None);
    d.process("remind me to c tomorrow", None);
    let before = d.memory_snapshot();
    for m in ["tasks", "notes", "reminders", "tasks", "notes", "reminders"] {
        d.process(m, None);
    }
    assert_eq!(d.memory_snapshot(), before);
}

#[test]
fn test_reset_then_listings_are_empty() {
    let (d, store, _) = builtin_dispatcher();
    d.process("hi, my name is Ada", None);
    d.process("task a", None);
    d.process("note b", None);
    d.process("remind me to c in 5 minutes", None);

    let r = d.process("reset", None);
    assert_eq!(r.text, "Memory cleared.");
    assert_eq!(r.intent, "reset");
    assert!(store.last_saved().unwrap().is_empty());

    assert_eq!(d.process("tasks", None).text, "No tasks found.");
    assert_eq!(d.process("notes", None).text, "No notes saved.");
    assert_eq!(d.process("reminders", None).text, "No reminders set.");
    assert_eq!(d.process("hello", None).text, "Hello! How can I help you today?");
}

#[test]
fn test_search_uses_collaborator_and_reports_failures() {
    let (d, _, _) = builtin_dispatcher();
    let r = d.process("search rust", None);
    assert_eq!(r.text, "Stub answer.");
    assert_eq!(r.intent, "search");
    assert_eq!(r.metadata["query"], "rust");

    let failing = Arc::new(StubSearch(Err(SearchError::Timeout)));
    let d = Dispatcher::builder(Arc::new(InMemoryStore::default()), fixed_clock())
        .rules(builtin_rules(Arc::new(RestrictedEvaluator::new()), failing))
        .build();
    let r = d.process("search rust", None);
    assert!(r.is_error());
    assert_eq!(r.stage(), None);
    assert!(r.text.contains("timed out"));
}

#[test]
fn test_help() {
    let (d, _, _) = builtin_dispatcher();
    let r = d.process("what can you do?", None);
    assert_eq!(r.intent, "help");
    assert_eq!(r.confidence, 0.9);
}

#[test]
fn test_custom_rule_goes_before_fallback() {
    struct Weather;
    impl Rule for Weather {
        fn name(&self) -> &'static str {
            "weather"
        }
        fn matches(&self, text: &str, _context: &Context) -> bool {
            text.contains("weather")
        }
        fn handle(&self, _t: &str, _ctx: &mut IntentContext<'_>) -> Result<Response, IntentError> {
            Ok(Response::new("Sunny.", "weather", 0.7))
        }
    }
    let store = Arc::new(InMemoryStore::default());
    let d = builtin_builder(store, fixed_clock())
        .rule(Arc::new(Weather))
        .build();
    assert_eq!(d.process("how is the weather", None).intent, "weather");
    // 組み込みの方が先
    assert_eq!(d.process("hi, weather?", None).intent, "greet");
}

#[test]
fn test_memory_survives_restart_through_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memory.json");
    let build = || {
        Dispatcher::builder(
            Arc::new(JsonFileMemoryStore::new(Arc::new(StdFileSystem), &path)),
            fixed_clock(),
        )
        .rules(builtin_rules(
            Arc::new(RestrictedEvaluator::new()),
            Arc::new(StubSearch(Err(SearchError::Disabled))),
        ))
        .build()
    };

    let d = build();
    d.process("task persist me", None);
    d.process("note keep", None);
    drop(d);

    let d = build();
    let r = d.process("tasks", None);
    assert!(r.text.contains("1. persist me"));
    assert_eq!(d.memory_snapshot().notes[0].text, "keep");
}
