use std::fmt::{
    self,
    Write
};

use chrono::{
    DateTime,
    NaiveDate,
    NaiveDateTime,
    NaiveTime,
    TimeZone
};

use crate::time::calendarerror::CalendarError;

pub const DEFAULT_DATE_FORMAT: &str = "YYYY-MM-DD";
pub const DEFAULT_DATE_TIME_FORMAT: &str = "YYYY-MM-DD HH:mm:ss";

/// Output formats accepted by the workday listing tools.
pub const WORKDAY_FORMATS: [&str; 6] = [
    "YYYY-MM-DD",
    "MM/DD/YYYY",
    "DD/MM/YYYY",
    "YYYY/MM/DD",
    "YYYY年MM月DD日",
    "MM-DD-YYYY",
];

/// Output formats accepted by `current_time`.
pub const CURRENT_TIME_FORMATS: [&str; 9] = [
    "h:mm A",
    "h:mm:ss A",
    "YYYY-MM-DD HH:mm:ss",
    "YYYY-MM-DD",
    "YYYY-MM",
    "MM/DD/YYYY",
    "MM/DD/YY",
    "YYYY/MM/DD",
    "YYYY/MM",
];

// Longest tokens first so that `YYYY` wins over `YY`, `MMMM` over `MM`, ...
const TOKENS: [(&str, &str); 21] = [
    ("YYYY", "%Y"),
    ("MMMM", "%B"),
    ("dddd", "%A"),
    ("SSS", "%3f"),
    ("MMM", "%b"),
    ("ddd", "%a"),
    ("YY", "%y"),
    ("MM", "%m"),
    ("DD", "%d"),
    ("HH", "%H"),
    ("hh", "%I"),
    ("mm", "%M"),
    ("ss", "%S"),
    ("M", "%-m"),
    ("D", "%-d"),
    ("H", "%-H"),
    ("h", "%-I"),
    ("m", "%-M"),
    ("s", "%-S"),
    ("A", "%p"),
    ("a", "%P"),
];

/// A day.js style format string (`YYYY-MM-DD HH:mm:ss`, `h:mm A`, ...)
/// translated once into the equivalent `chrono` strftime pattern.
///
/// Text inside `[...]` is emitted literally, as is any character that is not
/// a token (so `YYYY年MM月DD日` renders as `2025年03月17日`). `Z` renders the
/// offset as `+08:00`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    source: String,
    strftime: String
}

impl DateFormat {
    pub fn new(source: &str) -> DateFormat {
        DateFormat {
            source: source.to_owned(),
            strftime: translate(source)
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn strftime(&self) -> &str {
        &self.strftime
    }

    /// Renders a calendar date; time-of-day tokens render as midnight.
    pub fn format_date(&self, d: NaiveDate) -> Result<String, CalendarError> {
        self.format_naive(&d.and_time(NaiveTime::MIN))
    }

    pub fn format_naive(&self, dt: &NaiveDateTime) -> Result<String, CalendarError> {
        self.render(dt.format(&self.strftime))
    }

    pub fn format_datetime<Tz: TimeZone>(&self, dt: &DateTime<Tz>) -> Result<String, CalendarError>
    where
        Tz::Offset: fmt::Display,
    {
        self.render(dt.format(&self.strftime))
    }

    // `DelayedFormat` reports unsupported items through fmt::Error, which
    // `to_string()` would turn into a panic.
    fn render<D: fmt::Display>(&self, delayed: D) -> Result<String, CalendarError> {
        let mut out = String::new();
        write!(out, "{}", delayed).map_err(|_| CalendarError::InvalidFormat(self.source.clone()))?;
        Ok(out)
    }
}

impl Default for DateFormat {
    fn default() -> Self {
        DateFormat::new(DEFAULT_DATE_FORMAT)
    }
}

fn translate(source: &str) -> String {
    let mut out = String::with_capacity(source.len() * 2);
    let mut rest = source;
    'outer: while let Some(c) = rest.chars().next() {
        if c == '[' {
            if let Some(close) = rest.find(']') {
                push_literal(&mut out, &rest[1..close]);
                rest = &rest[close + 1..];
                continue;
            }
        }
        if let Some(stripped) = rest.strip_prefix("ZZ") {
            out.push_str("%z");
            rest = stripped;
            continue;
        }
        if let Some(stripped) = rest.strip_prefix('Z') {
            out.push_str("%:z");
            rest = stripped;
            continue;
        }
        for (token, item) in TOKENS.iter() {
            if rest.starts_with(token) {
                out.push_str(item);
                rest = &rest[token.len()..];
                continue 'outer;
            }
        }
        push_literal(&mut out, &rest[..c.len_utf8()]);
        rest = &rest[c.len_utf8()..];
    }
    out
}

fn push_literal(out: &mut String, literal: &str) {
    for c in literal.chars() {
        if c == '%' {
            out.push_str("%%");
        } else {
            out.push(c);
        }
    }
}
