//! `age YYYY-MM-DD`: 今日時点の満年齢

use super::command_arg;
use crate::domain::{Context, Response};
use crate::rule::{IntentContext, IntentError, Rule};
use chrono::{Datelike, NaiveDate};

const TOKEN: &str = "age";
const USAGE: &str = "Usage: age YYYY-MM-DD  (e.g. age 1990-04-23)";

pub struct AgeRule;

impl Rule for AgeRule {
    fn name(&self) -> &'static str {
        "age"
    }

    fn matches(&self, text: &str, _context: &Context) -> bool {
        command_arg(text, TOKEN).is_some()
    }

    fn handle(&self, text: &str, ctx: &mut IntentContext<'_>) -> Result<Response, IntentError> {
        let arg = command_arg(text, TOKEN).unwrap_or("");
        let birth =
            NaiveDate::parse_from_str(arg, "%Y-%m-%d").map_err(|_| IntentError::usage(USAGE))?;
        let today = ctx.now().date_naive();
        let years = age_on(birth, today)
            .ok_or_else(|| IntentError::usage("That birth date is in the future."))?;
        Ok(Response::new(format!("You are {} years old.", years), "age", 0.95)
            .with_meta("years", years))
    }
}

/// `today` 時点の満年齢。誕生日前なら 1 引く。未来の日付なら None
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> Option<i32> {
    if birth > today {
        return None;
    }
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    Some(years)
}
