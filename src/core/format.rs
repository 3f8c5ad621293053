//! Pattern-based formatting and parsing.
//!
//! A pattern is compiled once into tokens and can then be shared freely.
//!
//! | Letters | Meaning | Parse width |
//! |---------|---------|-------------|
//! | `yyyy` / `yy` | year / two-digit year (base 2000) | exactly 4 / 2 |
//! | `MM` / `M` | month | 2 / 1-2 |
//! | `dd` / `d` | day of month | 2 / 1-2 |
//! | `HH` / `H` | hour of day (0-23) | 2 / 1-2 |
//! | `hh` / `h` | clock hour (1-12), needs `a` when parsing | 2 / 1-2 |
//! | `mm` / `m`, `ss` / `s` | minute, second | 2 / 1-2 |
//! | `S`..`SSSSSSSSS` | fraction of second | exactly n |
//! | `a` | `AM` / `PM` | |
//! | `E`..`EEE` / `EEEE` | short / full weekday name | |
//! | `XXX` | offset, `Z` for zero | |
//! | `VV` | zone id | |
//!
//! Text in single quotes is literal, `''` is a quote, and any other
//! non-letter character is a literal separator.

use crate::core::resolve::Disambiguation;
use crate::domain::date::CalendarDate;
use crate::domain::ports::Temporal;
use crate::domain::time::{ClockTime, LocalDateTime};
use crate::domain::timestamp::{Instant, OffsetTimestamp, ZonedTimestamp};
use crate::domain::zone::{UtcOffset, ZoneId};
use crate::utils::error::{DateTimeError, Result};
use crate::utils::validation::validate_range;
use chrono::{Datelike, Timelike, Weekday};

pub mod patterns {
    pub const BASIC_ISO_DATE: &str = "yyyyMMdd";
    pub const ISO_LOCAL_DATE: &str = "yyyy-MM-dd";
    pub const ISO_LOCAL_TIME: &str = "HH:mm:ss";
    pub const ISO_LOCAL_DATE_TIME: &str = "yyyy-MM-dd'T'HH:mm:ss";
    pub const ISO_OFFSET_DATE_TIME: &str = "yyyy-MM-dd'T'HH:mm:ssXXX";
    pub const ISO_ZONED_DATE_TIME: &str = "yyyy-MM-dd'T'HH:mm:ssXXX'['VV']'";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Month,
    Day,
    Hour,
    ClockHour,
    Minute,
    Second,
}

impl Field {
    fn name(self) -> &'static str {
        match self {
            Field::Month => "month",
            Field::Day => "day",
            Field::Hour => "hour",
            Field::ClockHour => "clock hour",
            Field::Minute => "minute",
            Field::Second => "second",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Year { width: usize },
    Number { field: Field, width: usize },
    Fraction { digits: usize },
    AmPm,
    Weekday { full: bool },
    Offset,
    Zone,
    Literal(String),
}

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];
const SHORT_WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const FULL_WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

fn compile(pattern: &str) -> Result<Vec<Token>> {
    let invalid = |reason: String| DateTimeError::InvalidPattern {
        pattern: pattern.to_string(),
        reason,
    };

    let chars: Vec<char> = pattern.chars().collect();
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' {
            // '' 代表單引號本身
            if chars.get(i + 1) == Some(&'\'') {
                literal.push('\'');
                i += 2;
                continue;
            }
            let mut j = i + 1;
            loop {
                match chars.get(j) {
                    None => return Err(invalid("unterminated quoted text".to_string())),
                    Some('\'') if chars.get(j + 1) == Some(&'\'') => {
                        literal.push('\'');
                        j += 2;
                    }
                    Some('\'') => break,
                    Some(other) => {
                        literal.push(*other);
                        j += 1;
                    }
                }
            }
            i = j + 1;
            continue;
        }

        if !c.is_ascii_alphabetic() {
            literal.push(c);
            i += 1;
            continue;
        }

        let mut run = 1;
        while chars.get(i + run) == Some(&c) {
            run += 1;
        }

        let token = match (c, run) {
            ('y', 2) | ('y', 4) => Token::Year { width: run },
            ('M', 1..=2) => Token::Number { field: Field::Month, width: run },
            ('d', 1..=2) => Token::Number { field: Field::Day, width: run },
            ('H', 1..=2) => Token::Number { field: Field::Hour, width: run },
            ('h', 1..=2) => Token::Number { field: Field::ClockHour, width: run },
            ('m', 1..=2) => Token::Number { field: Field::Minute, width: run },
            ('s', 1..=2) => Token::Number { field: Field::Second, width: run },
            ('S', 1..=9) => Token::Fraction { digits: run },
            ('a', 1) => Token::AmPm,
            ('E', 1..=3) => Token::Weekday { full: false },
            ('E', 4) => Token::Weekday { full: true },
            ('X', 3) => Token::Offset,
            ('V', 2) => Token::Zone,
            _ => {
                return Err(invalid(format!(
                    "unsupported letter sequence '{}'",
                    c.to_string().repeat(run)
                )))
            }
        };

        if !literal.is_empty() {
            tokens.push(Token::Literal(std::mem::take(&mut literal)));
        }
        tokens.push(token);
        i += run;
    }

    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    Ok(tokens)
}

/// Fields collected while walking the input; resolved into values afterwards.
#[derive(Debug, Default)]
struct Parsed {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    hour: Option<u32>,
    clock_hour: Option<u32>,
    minute: Option<u32>,
    second: Option<u32>,
    nano: Option<u32>,
    pm: Option<bool>,
    weekday: Option<Weekday>,
    offset: Option<UtcOffset>,
    zone: Option<ZoneId>,
}

/// An immutable, compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeFormatter {
    pattern: String,
    tokens: Vec<Token>,
    zone: Option<ZoneId>,
}

impl DateTimeFormatter {
    pub fn of_pattern(pattern: &str) -> Result<Self> {
        let tokens = compile(pattern)?;
        Ok(Self {
            pattern: pattern.to_string(),
            tokens,
            zone: None,
        })
    }

    fn predefined(pattern: &'static str) -> Self {
        Self::of_pattern(pattern).expect("predefined patterns always compile")
    }

    pub fn basic_iso_date() -> Self {
        Self::predefined(patterns::BASIC_ISO_DATE)
    }

    pub fn iso_local_date() -> Self {
        Self::predefined(patterns::ISO_LOCAL_DATE)
    }

    pub fn iso_local_time() -> Self {
        Self::predefined(patterns::ISO_LOCAL_TIME)
    }

    pub fn iso_local_date_time() -> Self {
        Self::predefined(patterns::ISO_LOCAL_DATE_TIME)
    }

    pub fn iso_offset_date_time() -> Self {
        Self::predefined(patterns::ISO_OFFSET_DATE_TIME)
    }

    pub fn iso_zoned_date_time() -> Self {
        Self::predefined(patterns::ISO_ZONED_DATE_TIME)
    }

    /// Zone used by `parse_zoned`/`parse_offset` when the text carries none,
    /// and by `format_instant`.
    pub fn with_zone(self, zone: ZoneId) -> Self {
        Self {
            zone: Some(zone),
            ..self
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn zone(&self) -> Option<ZoneId> {
        self.zone
    }

    fn unsupported(&self, field: &str) -> DateTimeError {
        DateTimeError::UnsupportedField {
            field: field.to_string(),
            pattern: self.pattern.clone(),
        }
    }

    pub fn format<T: Temporal + ?Sized>(&self, value: &T) -> Result<String> {
        let date = value.date_part();
        let time = value.time_part();
        let need_date = || date.ok_or_else(|| self.unsupported("date"));
        let need_time = || time.ok_or_else(|| self.unsupported("time"));

        let mut out = String::with_capacity(self.pattern.len() + 8);
        for token in &self.tokens {
            match token {
                Token::Year { width: 4 } => {
                    let year = need_date()?.year();
                    if (0..=9999).contains(&year) {
                        out.push_str(&format!("{:04}", year));
                    } else if year > 9999 {
                        out.push_str(&format!("+{}", year));
                    } else {
                        out.push_str(&format!("-{:04}", year.unsigned_abs()));
                    }
                }
                Token::Year { .. } => {
                    out.push_str(&format!("{:02}", need_date()?.year().rem_euclid(100)));
                }
                Token::Number { field, width } => {
                    let n = match field {
                        Field::Month => need_date()?.month(),
                        Field::Day => need_date()?.day(),
                        Field::Hour => need_time()?.hour(),
                        Field::ClockHour => match need_time()?.hour() % 12 {
                            0 => 12,
                            h => h,
                        },
                        Field::Minute => need_time()?.minute(),
                        Field::Second => need_time()?.second(),
                    };
                    if *width == 2 {
                        out.push_str(&format!("{:02}", n));
                    } else {
                        out.push_str(&n.to_string());
                    }
                }
                Token::Fraction { digits } => {
                    let nanos = need_time()?.nanosecond().min(999_999_999);
                    out.push_str(&format!("{:09}", nanos)[..*digits]);
                }
                Token::AmPm => {
                    out.push_str(if need_time()?.hour() < 12 { "AM" } else { "PM" });
                }
                Token::Weekday { full } => {
                    let idx = need_date()?.weekday().num_days_from_monday() as usize;
                    out.push_str(if *full {
                        FULL_WEEKDAYS[idx]
                    } else {
                        SHORT_WEEKDAYS[idx]
                    });
                }
                Token::Offset => {
                    let offset = value.offset_part().ok_or_else(|| self.unsupported("offset"))?;
                    let total = offset.total_seconds();
                    if total == 0 {
                        out.push('Z');
                    } else {
                        let sign = if total < 0 { '-' } else { '+' };
                        let abs = total.unsigned_abs();
                        out.push_str(&format!("{}{:02}:{:02}", sign, abs / 3600, (abs % 3600) / 60));
                    }
                }
                Token::Zone => {
                    let zone = value.zone_part().ok_or_else(|| self.unsupported("zone"))?;
                    out.push_str(&zone.id());
                }
                Token::Literal(text) => out.push_str(text),
            }
        }
        Ok(out)
    }

    /// Formats an instant in the formatter's zone.
    pub fn format_instant(&self, instant: Instant) -> Result<String> {
        let zone = self.zone.ok_or_else(|| self.unsupported("zone"))?;
        self.format(&instant.at_zone(zone))
    }

    fn mismatch(&self, input: &str, reason: String) -> DateTimeError {
        DateTimeError::FormatMismatch {
            input: input.to_string(),
            pattern: self.pattern.clone(),
            reason,
        }
    }

    /// Digits claimed by the numeric tokens directly after `idx`, e.g. `MMdd` in `yyyyMMdd`.
    fn adjacent_width(&self, idx: usize) -> usize {
        self.tokens[idx + 1..]
            .iter()
            .map_while(|token| match token {
                Token::Year { width } | Token::Number { width, .. } => Some(*width),
                Token::Fraction { digits } => Some(*digits),
                _ => None,
            })
            .sum()
    }

    /// `yyyy`: exactly four digits, `+` and five or more digits above 9999,
    /// `-` and four or more digits below 0. Inverse of the `yyyy` output.
    fn parse_year(&self, input: &str, pos: usize, reserved: usize) -> Result<(i32, usize)> {
        let expected = || self.mismatch(input, format!("expected 4-digit year at index {}", pos));

        let sign = match input.as_bytes().get(pos) {
            Some(b'+') => Some(false),
            Some(b'-') => Some(true),
            _ => None,
        };
        let start = if sign.is_some() { pos + 1 } else { pos };
        let run = input[start..].bytes().take_while(|b| b.is_ascii_digit()).count();

        let len = match sign {
            None => 4,
            Some(_) => run.saturating_sub(reserved),
        };
        let min = if sign == Some(false) { 5 } else { 4 };
        if len < min || len > 9 || run < len {
            return Err(expected());
        }

        let digits: i32 = input[start..start + len].parse().map_err(|_| expected())?;
        let year = match sign {
            Some(true) if digits == 0 => {
                return Err(self.mismatch(input, format!("year -0 at index {}", pos)))
            }
            Some(false) if digits <= 9999 => {
                return Err(self.mismatch(
                    input,
                    format!("'+' is only used for years above 9999 (index {})", pos),
                ))
            }
            Some(true) => -digits,
            _ => digits,
        };
        Ok((year, start + len))
    }

    fn parse_fields(&self, input: &str) -> Result<Parsed> {
        tracing::trace!("parsing '{}' with pattern '{}'", input, self.pattern);

        let mut parsed = Parsed::default();
        let mut pos = 0;

        let take_digits = |pos: usize, min: usize, max: usize| -> Option<(u32, usize)> {
            let rest = &input[pos..];
            let len = rest
                .bytes()
                .take(max)
                .take_while(|b| b.is_ascii_digit())
                .count();
            if len < min {
                return None;
            }
            rest[..len].parse::<u32>().ok().map(|n| (n, pos + len))
        };

        for (idx, token) in self.tokens.iter().enumerate() {
            match token {
                Token::Year { width: 4 } => {
                    let (year, next) = self.parse_year(input, pos, self.adjacent_width(idx))?;
                    parsed.year = Some(year);
                    pos = next;
                }
                Token::Year { width } => {
                    let (n, next) = take_digits(pos, *width, *width).ok_or_else(|| {
                        self.mismatch(input, format!("expected {}-digit year at index {}", width, pos))
                    })?;
                    parsed.year = Some(if *width == 2 { 2000 + n as i32 } else { n as i32 });
                    pos = next;
                }
                Token::Number { field, width } => {
                    let min = *width;
                    let (n, next) = take_digits(pos, min, 2).ok_or_else(|| {
                        self.mismatch(input, format!("expected {} at index {}", field.name(), pos))
                    })?;
                    let slot = match field {
                        Field::Month => &mut parsed.month,
                        Field::Day => &mut parsed.day,
                        Field::Hour => &mut parsed.hour,
                        Field::ClockHour => &mut parsed.clock_hour,
                        Field::Minute => &mut parsed.minute,
                        Field::Second => &mut parsed.second,
                    };
                    *slot = Some(n);
                    pos = next;
                }
                Token::Fraction { digits } => {
                    let (n, next) = take_digits(pos, *digits, *digits).ok_or_else(|| {
                        self.mismatch(input, format!("expected {}-digit fraction at index {}", digits, pos))
                    })?;
                    parsed.nano = Some(n * 10u32.pow(9 - *digits as u32));
                    pos = next;
                }
                Token::AmPm => {
                    let rest = &input[pos..];
                    if rest.starts_with("AM") {
                        parsed.pm = Some(false);
                    } else if rest.starts_with("PM") {
                        parsed.pm = Some(true);
                    } else {
                        return Err(self.mismatch(input, format!("expected AM or PM at index {}", pos)));
                    }
                    pos += 2;
                }
                Token::Weekday { full } => {
                    let names = if *full { &FULL_WEEKDAYS } else { &SHORT_WEEKDAYS };
                    let rest = &input[pos..];
                    let idx = names
                        .iter()
                        .position(|name| rest.starts_with(name))
                        .ok_or_else(|| self.mismatch(input, format!("expected weekday name at index {}", pos)))?;
                    parsed.weekday = Some(WEEKDAYS[idx]);
                    pos += names[idx].len();
                }
                Token::Offset => {
                    let rest = &input[pos..];
                    if rest.starts_with('Z') {
                        parsed.offset = Some(UtcOffset::utc());
                        pos += 1;
                    } else {
                        let text = rest.get(..6).ok_or_else(|| {
                            self.mismatch(input, format!("expected offset at index {}", pos))
                        })?;
                        let bytes = text.as_bytes();
                        let shaped = (bytes[0] == b'+' || bytes[0] == b'-')
                            && bytes[3] == b':'
                            && [1, 2, 4, 5].iter().all(|&i| bytes[i].is_ascii_digit());
                        if !shaped {
                            return Err(self.mismatch(input, format!("expected ±hh:mm at index {}", pos)));
                        }
                        parsed.offset = Some(UtcOffset::parse(text)?);
                        pos += 6;
                    }
                }
                Token::Zone => {
                    let rest = &input[pos..];
                    let len = rest
                        .chars()
                        .take_while(|c| c.is_ascii_alphanumeric() || "/_+-:".contains(*c))
                        .map(char::len_utf8)
                        .sum::<usize>();
                    if len == 0 {
                        return Err(self.mismatch(input, format!("expected zone id at index {}", pos)));
                    }
                    parsed.zone = Some(ZoneId::of(&rest[..len])?);
                    pos += len;
                }
                Token::Literal(text) => {
                    if !input[pos..].starts_with(text.as_str()) {
                        return Err(self.mismatch(input, format!("expected '{}' at index {}", text, pos)));
                    }
                    pos += text.len();
                }
            }
        }

        if pos != input.len() {
            return Err(self.mismatch(input, format!("unparsed text found at index {}", pos)));
        }
        Ok(parsed)
    }

    fn resolve_date(&self, input: &str, parsed: &Parsed) -> Result<Option<CalendarDate>> {
        let date = match (parsed.year, parsed.month, parsed.day) {
            (None, None, None) => return Ok(None),
            (Some(y), Some(m), Some(d)) => CalendarDate::of(y, m, d)?,
            _ => {
                return Err(self.mismatch(input, "year, month and day are all required".to_string()))
            }
        };
        if let Some(weekday) = parsed.weekday {
            if date.day_of_week() != weekday {
                return Err(self.mismatch(
                    input,
                    format!("{} is a {}, not a {}", date, date.day_of_week(), weekday),
                ));
            }
        }
        Ok(Some(date))
    }

    fn resolve_time(&self, input: &str, parsed: &Parsed) -> Result<Option<ClockTime>> {
        let from_clock = match parsed.clock_hour {
            Some(h) => {
                validate_range("clock hour", h, 1, 12)?;
                let pm = parsed.pm.ok_or_else(|| {
                    self.mismatch(input, "clock hour needs an AM/PM marker".to_string())
                })?;
                Some(h % 12 + if pm { 12 } else { 0 })
            }
            None => None,
        };

        let hour = match (parsed.hour, from_clock) {
            (Some(h), Some(c)) if h != c => {
                return Err(self.mismatch(input, format!("hour {} conflicts with clock hour", h)))
            }
            (Some(h), _) => h,
            (None, Some(c)) => c,
            (None, None) => {
                if parsed.minute.is_some() || parsed.second.is_some() || parsed.nano.is_some() {
                    return Err(self.mismatch(input, "hour is required".to_string()));
                }
                return Ok(None);
            }
        };

        validate_range("hour", hour, 0, 23)?;
        if let Some(pm) = parsed.pm {
            if (hour >= 12) != pm {
                return Err(self.mismatch(
                    input,
                    format!("hour {} conflicts with {}", hour, if pm { "PM" } else { "AM" }),
                ));
            }
        }

        ClockTime::of_nano(
            hour,
            parsed.minute.unwrap_or(0),
            parsed.second.unwrap_or(0),
            parsed.nano.unwrap_or(0),
        )
        .map(Some)
    }

    fn parse_local(&self, input: &str) -> Result<(LocalDateTime, Parsed)> {
        let parsed = self.parse_fields(input)?;
        let date = self
            .resolve_date(input, &parsed)?
            .ok_or_else(|| self.mismatch(input, "pattern has no date".to_string()))?;
        let time = self
            .resolve_time(input, &parsed)?
            .ok_or_else(|| self.mismatch(input, "pattern has no time".to_string()))?;
        Ok((LocalDateTime::of_date_time(date, time), parsed))
    }

    pub fn parse_date(&self, input: &str) -> Result<CalendarDate> {
        let parsed = self.parse_fields(input)?;
        // 有時間欄位也要檢查合法性
        self.resolve_time(input, &parsed)?;
        self.resolve_date(input, &parsed)?
            .ok_or_else(|| self.mismatch(input, "pattern has no date".to_string()))
    }

    pub fn parse_time(&self, input: &str) -> Result<ClockTime> {
        let parsed = self.parse_fields(input)?;
        self.resolve_date(input, &parsed)?;
        self.resolve_time(input, &parsed)?
            .ok_or_else(|| self.mismatch(input, "pattern has no time".to_string()))
    }

    pub fn parse_date_time(&self, input: &str) -> Result<LocalDateTime> {
        self.parse_local(input).map(|(local, _)| local)
    }

    /// Zone comes from `VV`, then `XXX`, then the formatter's zone.
    /// A parsed offset fixes the instant; the result is that instant seen in the zone.
    pub fn parse_zoned(&self, input: &str) -> Result<ZonedTimestamp> {
        let (local, parsed) = self.parse_local(input)?;
        let zone = parsed
            .zone
            .or(parsed.offset.map(ZoneId::Offset))
            .or(self.zone)
            .ok_or_else(|| self.mismatch(input, "no zone in text or formatter".to_string()))?;

        match parsed.offset {
            Some(offset) => {
                let zoned = OffsetTimestamp::of(local, offset).at_zone_same_instant(zone);
                if zoned.offset() != offset {
                    tracing::debug!(
                        "offset {} is not valid for {} at {}, re-expressed as {}",
                        offset,
                        zone,
                        local,
                        zoned
                    );
                }
                Ok(zoned)
            }
            None => ZonedTimestamp::of_local(local, zone, None, Disambiguation::Compatible),
        }
    }

    /// Offset comes from `XXX`, else from the formatter's zone.
    pub fn parse_offset(&self, input: &str) -> Result<OffsetTimestamp> {
        let (local, parsed) = self.parse_local(input)?;
        match (parsed.offset, parsed.zone.or(self.zone)) {
            (Some(offset), _) => Ok(OffsetTimestamp::of(local, offset)),
            (None, Some(zone)) => {
                Ok(ZonedTimestamp::of(local, zone)?.to_offset_timestamp())
            }
            (None, None) => Err(self.mismatch(input, "no offset in text or formatter".to_string())),
        }
    }
}

/// Formats `value` with a one-off pattern.
pub fn format<T: Temporal + ?Sized>(value: &T, pattern: &str) -> Result<String> {
    DateTimeFormatter::of_pattern(pattern)?.format(value)
}

/// Parses a date with a one-off pattern.
pub fn parse(text: &str, pattern: &str) -> Result<CalendarDate> {
    DateTimeFormatter::of_pattern(pattern)?.parse_date(text)
}
