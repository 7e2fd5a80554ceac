//! `leap <year>`: グレゴリオ暦のうるう年判定

use super::command_arg;
use crate::domain::{Context, Response};
use crate::rule::{IntentContext, IntentError, Rule};

const TOKEN: &str = "leap";

pub struct LeapYearRule;

impl Rule for LeapYearRule {
    fn name(&self) -> &'static str {
        "leap_year"
    }

    fn matches(&self, text: &str, _context: &Context) -> bool {
        command_arg(text, TOKEN).is_some()
    }

    fn handle(&self, text: &str, _ctx: &mut IntentContext<'_>) -> Result<Response, IntentError> {
        let year: i64 = command_arg(text, TOKEN)
            .unwrap_or("")
            .parse()
            .map_err(|_| IntentError::usage("Usage: leap <year>  (e.g. leap 2024)"))?;
        let leap = is_leap_year(year);
        let text = if leap {
            format!("{} is a leap year.", year)
        } else {
            format!("{} is not a leap year.", year)
        };
        Ok(Response::new(text, "leap_year", 0.95).with_meta("leap", leap))
    }
}

pub fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Memory;
    use common::adapter::StdClock;

    fn leap(text: &str) -> Result<Response, IntentError> {
        let context = Context::new();
        let mut memory = Memory::default();
        let mut ctx = IntentContext::new(&context, &mut memory, &StdClock);
        LeapYearRule.handle(text, &mut ctx)
    }

    #[test]
    fn test_rule() {
        assert!(is_leap_year(2024));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
    }

    #[test]
    fn test_replies() {
        assert_eq!(leap("leap 2024").unwrap().text, "2024 is a leap year.");
        assert_eq!(leap("leap 1900").unwrap().text, "1900 is not a leap year.");
        assert!(matches!(leap("leap soon"), Err(IntentError::Usage(_))));
    }
}
