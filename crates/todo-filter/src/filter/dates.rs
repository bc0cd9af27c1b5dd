//! Resolution of date and time phrases into due-date predicates.
//!
//! A phrase is resolved against a fixed reference instant ("now"). Phrases
//! that leave out the year roll into next year once their date has passed;
//! a bare time-of-day that already passed today rolls to tomorrow.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveTime, SubsecRound};
use tracing::trace;

use super::ast::{DueDateExpr, DueDateOperation};
use super::error::{FilterError, FilterResult};
use crate::clock::localize;

/// A calendar date as written in a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateSpec {
    /// A fully determined date (explicit year or relative keyword).
    Exact(NaiveDate),
    /// Month and day only; the year comes from "now", subject to rollover.
    YearOmitted { month: u32, day: u32 },
}

#[derive(Debug, Clone, Copy)]
enum Meridiem {
    Am,
    Pm,
}

/// Resolves date/time phrases relative to a reference instant.
///
/// # Example
///
/// ```
/// use chrono::{Local, TimeZone};
/// use todo_filter::filter::{DateResolver, DueDateOperation};
///
/// let now = Local.with_ymd_and_hms(2017, 1, 1, 1, 0, 0).unwrap();
/// let due = DateResolver::new(now).resolve("tomorrow").unwrap();
/// assert_eq!(due.operation, DueDateOperation::DueOn);
/// assert_eq!(due.datetime, Local.with_ymd_and_hms(2017, 1, 2, 0, 0, 0).unwrap());
/// assert!(due.all_day);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DateResolver {
    now: DateTime<Local>,
}

impl DateResolver {
    /// Creates a resolver anchored at `now`.
    pub fn new(now: DateTime<Local>) -> Self {
        Self { now }
    }

    /// Returns the reference instant.
    pub fn now(&self) -> DateTime<Local> {
        self.now
    }

    /// Resolves a phrase such as `today`, `Jan 3`, `16:00`,
    /// `due before 10/5/2017` or `no due date`.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::UnknownDateToken` if the phrase has no
    /// recognized shape, and `FilterError::InvalidDate` if it names a day
    /// or time that does not exist.
    pub fn resolve(&self, token: &str) -> FilterResult<DueDateExpr> {
        let lower = token.to_lowercase();
        let words: Vec<&str> = lower.split_whitespace().collect();

        let expr = match words.as_slice() {
            [] => return Err(FilterError::unknown_date_token(token)),
            ["no", "due", "date"] | ["no", "date"] => {
                let start_of_today = self.midnight(self.now.date_naive(), token)?;
                DueDateExpr::new(DueDateOperation::NoDueDate, start_of_today, true)
            }
            ["overdue"] | ["over", "due"] => {
                // Whole seconds, so the rendered filter re-parses to this instant.
                let now = self.now.trunc_subsecs(0);
                DueDateExpr::new(DueDateOperation::DueBefore, now, false)
            }
            ["due", "before", rest @ ..] if !rest.is_empty() => {
                let (datetime, all_day) = self.resolve_point(rest, token)?;
                DueDateExpr::new(DueDateOperation::DueBefore, datetime, all_day)
            }
            ["due", "after", rest @ ..] if !rest.is_empty() => {
                let (datetime, all_day) = self.resolve_point(rest, token)?;
                DueDateExpr::new(DueDateOperation::DueAfter, datetime, all_day)
            }
            _ => {
                let (datetime, all_day) = self.resolve_point(&words, token)?;
                DueDateExpr::on(datetime, all_day)
            }
        };

        trace!(token, ?expr, "resolved date phrase");
        Ok(expr)
    }

    /// Resolves a date and/or time into an instant plus its all-day flag.
    fn resolve_point(&self, words: &[&str], token: &str) -> FilterResult<(DateTime<Local>, bool)> {
        let (date_words, time) = split_time(words, token)?;

        let Some(time) = time else {
            let date = match self.parse_date(date_words, token)? {
                DateSpec::Exact(date) => date,
                DateSpec::YearOmitted { month, day } => {
                    match NaiveDate::from_ymd_opt(self.now.year(), month, day) {
                        Some(date) if date >= self.now.date_naive() => date,
                        _ => self.in_next_year(month, day, token)?,
                    }
                }
            };
            return Ok((self.midnight(date, token)?, true));
        };

        if date_words.is_empty() {
            let today = self.now.date_naive();
            let at = self.at(today, time, token)?;
            if at >= self.now {
                return Ok((at, false));
            }
            trace!(token, "time of day already passed, using tomorrow");
            let tomorrow = today + chrono::Duration::days(1);
            return Ok((self.at(tomorrow, time, token)?, false));
        }

        let at = match self.parse_date(date_words, token)? {
            DateSpec::Exact(date) => self.at(date, time, token)?,
            DateSpec::YearOmitted { month, day } => {
                let this_year = match NaiveDate::from_ymd_opt(self.now.year(), month, day) {
                    Some(date) => Some(self.at(date, time, token)?),
                    None => None,
                };
                match this_year {
                    Some(at) if at >= self.now => at,
                    _ => self.at(self.in_next_year(month, day, token)?, time, token)?,
                }
            }
        };
        Ok((at, false))
    }

    /// Next year's occurrence of a month/day that has passed, or that does
    /// not exist, this year. A `29/02` only rolls one year ahead.
    fn in_next_year(&self, month: u32, day: u32, token: &str) -> FilterResult<NaiveDate> {
        trace!(token, month, day, "date not ahead this year, rolling over");
        NaiveDate::from_ymd_opt(self.now.year() + 1, month, day)
            .ok_or_else(|| FilterError::invalid_date(token))
    }

    fn midnight(&self, date: NaiveDate, token: &str) -> FilterResult<DateTime<Local>> {
        self.at(date, NaiveTime::MIN, token)
    }

    fn at(&self, date: NaiveDate, time: NaiveTime, token: &str) -> FilterResult<DateTime<Local>> {
        localize(date.and_time(time)).ok_or_else(|| FilterError::invalid_date(token))
    }

    /// Parses a relative keyword or one of the absolute date forms.
    fn parse_date(&self, words: &[&str], token: &str) -> FilterResult<DateSpec> {
        if let [word] = words {
            if let Some(date) = self.parse_keyword(word) {
                return Ok(DateSpec::Exact(date));
            }
        }
        parse_absolute_date(words, token)
    }

    fn parse_keyword(&self, word: &str) -> Option<NaiveDate> {
        let today = self.now.date_naive();
        match word {
            "today" | "tod" => Some(today),
            "tomorrow" => Some(today + chrono::Duration::days(1)),
            "yesterday" => Some(today - chrono::Duration::days(1)),
            _ => None,
        }
    }
}

/// Splits a trailing time-of-day off the words, if there is one.
fn split_time<'w, 's>(
    words: &'w [&'s str],
    token: &str,
) -> FilterResult<(&'w [&'s str], Option<NaiveTime>)> {
    let Some((&last, head)) = words.split_last() else {
        return Ok((words, None));
    };

    if let Some(time) = parse_time(last, token)? {
        return Ok((head, Some(time)));
    }

    // "3 pm"
    if matches!(last, "am" | "pm") {
        if let Some((&hour, date_words)) = head.split_last() {
            if let Some(time) = parse_time(&format!("{hour}{last}"), token)? {
                return Ok((date_words, Some(time)));
            }
        }
    }

    Ok((words, None))
}

/// Parses `HH:MM`, `HH:MM:SS`, `Ham`, `Hpm`, `H:MMam` or `H:MMpm`.
///
/// Returns `Ok(None)` for words that are not shaped like a time, and an
/// error for time-shaped words naming no real time (`25:00`, `13pm`).
fn parse_time(word: &str, token: &str) -> FilterResult<Option<NaiveTime>> {
    let (clock, meridiem) = if let Some(clock) = word.strip_suffix("am") {
        (clock, Some(Meridiem::Am))
    } else if let Some(clock) = word.strip_suffix("pm") {
        (clock, Some(Meridiem::Pm))
    } else {
        (word, None)
    };

    let time_shaped = clock.starts_with(|c: char| c.is_ascii_digit())
        && clock.chars().all(|c| c.is_ascii_digit() || c == ':')
        && (meridiem.is_some() || clock.contains(':'));
    if !time_shaped {
        return Ok(None);
    }

    let parts: Option<Vec<u32>> = clock.split(':').map(|part| part.parse().ok()).collect();
    let time = match (meridiem, parts.as_deref()) {
        (None, Some(&[hour, minute])) => NaiveTime::from_hms_opt(hour, minute, 0),
        (None, Some(&[hour, minute, second])) => NaiveTime::from_hms_opt(hour, minute, second),
        (Some(meridiem), Some(&[hour])) => {
            to_24_hour(hour, meridiem).and_then(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
        }
        (Some(meridiem), Some(&[hour, minute])) => {
            to_24_hour(hour, meridiem).and_then(|hour| NaiveTime::from_hms_opt(hour, minute, 0))
        }
        _ => None,
    };

    time.map(Some)
        .ok_or_else(|| FilterError::invalid_date(token))
}

/// Converts a 12-hour clock hour; `12am` is midnight and `12pm` is noon.
fn to_24_hour(hour: u32, meridiem: Meridiem) -> Option<u32> {
    if !(1..=12).contains(&hour) {
        return None;
    }
    Some(match meridiem {
        Meridiem::Am => hour % 12,
        Meridiem::Pm => hour % 12 + 12,
    })
}

/// Tries to parse a month name (short or full form) and returns the month number (1-12).
fn parse_month_name(name: &str) -> Option<u32> {
    match name {
        "jan" | "january" => Some(1),
        "feb" | "february" => Some(2),
        "mar" | "march" => Some(3),
        "apr" | "april" => Some(4),
        "may" => Some(5),
        "jun" | "june" => Some(6),
        "jul" | "july" => Some(7),
        "aug" | "august" => Some(8),
        "sep" | "sept" | "september" => Some(9),
        "oct" | "october" => Some(10),
        "nov" | "november" => Some(11),
        "dec" | "december" => Some(12),
        _ => None,
    }
}

fn parse_number<T: std::str::FromStr>(word: &str) -> Option<T> {
    if word.is_empty() || !word.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    word.parse().ok()
}

/// Reads `D Month` or `Month D`.
fn parse_month_day(first: &str, second: &str) -> Option<(u32, u32)> {
    match (parse_number(first), parse_month_name(second)) {
        (Some(day), Some(month)) => Some((month, day)),
        _ => match (parse_month_name(first), parse_number(second)) {
            (Some(month), Some(day)) => Some((month, day)),
            _ => None,
        },
    }
}

fn exact(year: i32, month: u32, day: u32, token: &str) -> FilterResult<DateSpec> {
    NaiveDate::from_ymd_opt(year, month, day)
        .map(DateSpec::Exact)
        .ok_or_else(|| FilterError::invalid_date(token))
}

/// Parses `MM/DD/YYYY` or `DD/MM`.
fn parse_slash_date(word: &str, token: &str) -> FilterResult<DateSpec> {
    let parts: Vec<&str> = word.split('/').collect();
    match parts.as_slice() {
        [month, day, year] => match (parse_number(month), parse_number(day), parse_number(year)) {
            (Some(month), Some(day), Some(year)) => exact(year, month, day, token),
            _ => Err(FilterError::unknown_date_token(token)),
        },
        [day, month] => match (parse_number(day), parse_number(month)) {
            (Some(day), Some(month)) => Ok(DateSpec::YearOmitted { month, day }),
            _ => Err(FilterError::unknown_date_token(token)),
        },
        _ => Err(FilterError::unknown_date_token(token)),
    }
}

fn parse_absolute_date(words: &[&str], token: &str) -> FilterResult<DateSpec> {
    match words {
        [word] if word.contains('/') => parse_slash_date(word, token),
        [first, second] => match parse_month_day(first, second) {
            Some((month, day)) => Ok(DateSpec::YearOmitted { month, day }),
            None => Err(FilterError::unknown_date_token(token)),
        },
        [first, second, year] => match (parse_month_day(first, second), parse_number(year)) {
            (Some((month, day)), Some(year)) => exact(year, month, day, token),
            _ => Err(FilterError::unknown_date_token(token)),
        },
        _ => Err(FilterError::unknown_date_token(token)),
    }
}
