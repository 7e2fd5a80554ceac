//! リマインダー文からの期限と本文の抽出
//!
//! 対応する時刻表現（この順で探す）:
//! - 相対: `in <整数> (minute|minutes|min|mins|hour|hours|hr|hrs|day|days)`
//! - `tomorrow`: 翌日 09:00:00 UTC
//! - `today`: 現在から 1 時間後

use chrono::{DateTime, Duration, TimeZone, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// `today` のときの既定の猶予
pub const TODAY_LEAD_TIME_HOURS: i64 = 1;
/// `tomorrow` のときの時刻（UTC）
pub const TOMORROW_HOUR: u32 = 9;
/// 本文が空になったときの既定テキスト
pub const DEFAULT_REMINDER_TEXT: &str = "Reminder";

/// 抽出結果
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderRequest {
    pub text: String,
    pub due: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimeExprError {
    #[error("no time expression found")]
    Missing,
    #[error("'{0}' is too far in the future")]
    OutOfRange(String),
}

fn lead_in_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*remind(?:er)?(?:\s+me)?(?:\s+to)?(?:\s+|$)")
            .expect("lead-in pattern is valid")
    })
}

fn relative_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\bin\s+(\d+)\s*(minutes?|mins?|hours?|hrs?|days?)\b")
            .expect("relative time pattern is valid")
    })
}

fn anchor_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(tomorrow|today)\b").expect("day anchor pattern is valid")
    })
}

/// "remind me to call mom in 2 hours" のような文から本文と期限を取り出す
pub fn parse_reminder(message: &str, now: DateTime<Utc>) -> Result<ReminderRequest, TimeExprError> {
    let body = lead_in_re().replace(message, "");

    let (due, start, end) = if let Some(caps) = relative_re().captures(&body) {
        let whole = caps.get(0).ok_or(TimeExprError::Missing)?;
        let delta = relative_delta(&caps[1], &caps[2])
            .ok_or_else(|| TimeExprError::OutOfRange(whole.as_str().to_string()))?;
        let due = now
            .checked_add_signed(delta)
            .ok_or_else(|| TimeExprError::OutOfRange(whole.as_str().to_string()))?;
        (due, whole.start(), whole.end())
    } else if let Some(m) = anchor_re().find(&body) {
        let due = if m.as_str().eq_ignore_ascii_case("tomorrow") {
            tomorrow_morning(now)
        } else {
            now.checked_add_signed(Duration::hours(TODAY_LEAD_TIME_HOURS))
        }
        .ok_or_else(|| TimeExprError::OutOfRange(m.as_str().to_string()))?;
        (due, m.start(), m.end())
    } else {
        return Err(TimeExprError::Missing);
    };

    let rest = format!("{} {}", &body[..start], &body[end..]);
    let mut words: Vec<&str> = rest.split_whitespace().collect();
    // "remind me tomorrow to ..." のように時刻表現の後ろに残った "to"
    if words.len() > 1 && words[0].eq_ignore_ascii_case("to") {
        words.remove(0);
    }
    let text = words.join(" ");
    let text = if text.is_empty() {
        DEFAULT_REMINDER_TEXT.to_string()
    } else {
        text
    };
    Ok(ReminderRequest { text, due })
}

fn relative_delta(amount: &str, unit: &str) -> Option<Duration> {
    let n: i64 = amount.parse().ok()?;
    let unit = unit.to_ascii_lowercase();
    if unit.starts_with("min") {
        Duration::try_minutes(n)
    } else if unit.starts_with('h') {
        Duration::try_hours(n)
    } else {
        Duration::try_days(n)
    }
}

fn tomorrow_morning(now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let day = now.checked_add_signed(Duration::days(1))?.date_naive();
    let at = day.and_hms_opt(TOMORROW_HOUR, 0, 0)?;
    Some(Utc.from_utc_datetime(&at))
}

/// 残り時間の表示。1 日以上は `Nd Nh`、1 時間以上は `Nh Nm`、それ未満は `Nm`。
pub fn format_remaining(delta: Duration) -> String {
    let secs = delta.num_seconds().max(0);
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m", minutes)
    } else {
        "<1m".to_string()
    }
}

/// 応答に出す時刻表記
pub fn format_timestamp(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%d %H:%M UTC").to_string()
}
