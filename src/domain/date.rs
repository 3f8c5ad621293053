use crate::core::calendar;
use crate::core::clock::SystemClock;
use crate::core::format::DateTimeFormatter;
use crate::domain::period::DateDifference;
use crate::domain::ports::{Clock, Temporal};
use crate::domain::time::{ClockTime, LocalDateTime};
use crate::domain::timestamp::ZonedTimestamp;
use crate::utils::error::{DateTimeError, Result};
use crate::utils::validation::{validate_day_of_month, validate_range};
use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A date without time or zone, always valid in the proleptic Gregorian calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarDate(NaiveDate);

fn overflow(operation: &str) -> DateTimeError {
    DateTimeError::Overflow {
        operation: operation.to_string(),
    }
}

fn validate_year(year: i32) -> Result<()> {
    validate_range("year", year, NaiveDate::MIN.year(), NaiveDate::MAX.year())
}

impl CalendarDate {
    pub fn of(year: i32, month: u32, day: u32) -> Result<Self> {
        validate_year(year)?;
        validate_day_of_month(year, month, day)?;
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| DateTimeError::InvalidDateComponent {
                field: "date".to_string(),
                value: format!("{}-{:02}-{:02}", year, month, day),
                reason: "outside the supported range".to_string(),
            })
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn to_naive(self) -> NaiveDate {
        self.0
    }

    /// Today in the system default zone.
    pub fn now() -> Result<Self> {
        Self::now_with(&SystemClock::system_default_zone())
    }

    pub fn now_with<C: Clock + ?Sized>(clock: &C) -> Result<Self> {
        Ok(ZonedTimestamp::now_with(clock)?.date())
    }

    pub fn parse(text: &str, pattern: &str) -> Result<Self> {
        DateTimeFormatter::of_pattern(pattern)?.parse_date(text)
    }

    pub fn format(&self, pattern: &str) -> Result<String> {
        DateTimeFormatter::of_pattern(pattern)?.format(self)
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> u32 {
        self.0.month()
    }

    pub fn day(self) -> u32 {
        self.0.day()
    }

    pub fn day_of_year(self) -> u32 {
        self.0.ordinal()
    }

    pub fn day_of_week(self) -> Weekday {
        self.0.weekday()
    }

    pub fn is_leap_year(self) -> bool {
        calendar::is_leap_year(self.year())
    }

    pub fn length_of_month(self) -> u32 {
        calendar::days_in_month(self.year(), self.month())
    }

    pub fn length_of_year(self) -> u32 {
        calendar::days_in_year(self.year())
    }

    pub fn plus_days(self, days: i64) -> Result<Self> {
        calendar::add_days(self.0, days)
            .map(Self)
            .ok_or_else(|| overflow("plus_days"))
    }

    pub fn plus_weeks(self, weeks: i64) -> Result<Self> {
        let days = weeks.checked_mul(7).ok_or_else(|| overflow("plus_weeks"))?;
        self.plus_days(days)
    }

    /// Adds months, clamping to the last day of the target month when the day does not exist there.
    pub fn plus_months(self, months: i64) -> Result<Self> {
        calendar::add_months(self.0, months)
            .map(Self)
            .ok_or_else(|| overflow("plus_months"))
    }

    pub fn plus_years(self, years: i64) -> Result<Self> {
        let months = years.checked_mul(12).ok_or_else(|| overflow("plus_years"))?;
        calendar::add_months(self.0, months)
            .map(Self)
            .ok_or_else(|| overflow("plus_years"))
    }

    pub fn minus_days(self, days: i64) -> Result<Self> {
        self.plus_days(days.checked_neg().ok_or_else(|| overflow("minus_days"))?)
    }

    pub fn minus_weeks(self, weeks: i64) -> Result<Self> {
        self.plus_weeks(weeks.checked_neg().ok_or_else(|| overflow("minus_weeks"))?)
    }

    pub fn minus_months(self, months: i64) -> Result<Self> {
        self.plus_months(months.checked_neg().ok_or_else(|| overflow("minus_months"))?)
    }

    pub fn minus_years(self, years: i64) -> Result<Self> {
        self.plus_years(years.checked_neg().ok_or_else(|| overflow("minus_years"))?)
    }

    pub fn is_before(self, other: Self) -> bool {
        self < other
    }

    pub fn is_after(self, other: Self) -> bool {
        self > other
    }

    /// Same month and day, year ignored. Feb 29 only matches Feb 29;
    /// see [`MonthDay::is_anniversary`] for the leap-day aware check.
    pub fn is_same_month_day(self, other: Self) -> bool {
        self.month_day() == other.month_day()
    }

    pub fn month_day(self) -> MonthDay {
        MonthDay {
            month: self.month(),
            day: self.day(),
        }
    }

    pub fn year_month(self) -> YearMonth {
        YearMonth {
            year: self.year(),
            month: self.month(),
        }
    }

    /// Signed day count from `self` to `other`.
    pub fn days_until(self, other: Self) -> i64 {
        other.0.signed_duration_since(self.0).num_days()
    }

    /// Calendar-unit difference from `self` to `other`.
    pub fn until(self, other: Self) -> DateDifference {
        DateDifference::between(self, other)
    }

    pub fn at_time(self, time: ClockTime) -> LocalDateTime {
        LocalDateTime::of_date_time(self, time)
    }

    pub fn at_start_of_day(self) -> LocalDateTime {
        LocalDateTime::of_date_time(self, ClockTime::MIDNIGHT)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Temporal for CalendarDate {
    fn date_part(&self) -> Option<NaiveDate> {
        Some(self.0)
    }

    fn time_part(&self) -> Option<NaiveTime> {
        None
    }
}

/// A month of a year, e.g. a card expiry date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn of(year: i32, month: u32) -> Result<Self> {
        validate_year(year)?;
        validate_range("month", month, 1, 12)?;
        Ok(Self { year, month })
    }

    pub fn now() -> Result<Self> {
        Self::now_with(&SystemClock::system_default_zone())
    }

    pub fn now_with<C: Clock + ?Sized>(clock: &C) -> Result<Self> {
        Ok(CalendarDate::now_with(clock)?.year_month())
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn is_leap_year(self) -> bool {
        calendar::is_leap_year(self.year)
    }

    pub fn length_of_month(self) -> u32 {
        calendar::days_in_month(self.year, self.month)
    }

    pub fn is_before(self, other: Self) -> bool {
        self < other
    }

    pub fn is_after(self, other: Self) -> bool {
        self > other
    }

    pub fn plus_months(self, months: i64) -> Result<Self> {
        let total = (self.year as i64 * 12 + self.month as i64 - 1)
            .checked_add(months)
            .ok_or_else(|| overflow("plus_months"))?;
        let year = i32::try_from(total.div_euclid(12)).map_err(|_| overflow("plus_months"))?;
        let month = total.rem_euclid(12) as u32 + 1;
        Self::of(year, month).map_err(|_| overflow("plus_months"))
    }

    pub fn plus_years(self, years: i64) -> Result<Self> {
        self.plus_months(years.checked_mul(12).ok_or_else(|| overflow("plus_years"))?)
    }

    pub fn at_day(self, day: u32) -> Result<CalendarDate> {
        CalendarDate::of(self.year, self.month, day)
    }

    pub fn at_end_of_month(self) -> Result<CalendarDate> {
        self.at_day(self.length_of_month())
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// A month and day without a year, e.g. a birthday. Feb 29 is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthDay {
    month: u32,
    day: u32,
}

impl MonthDay {
    pub fn of(month: u32, day: u32) -> Result<Self> {
        // 2000 是閏年，所以 02-29 合法
        validate_day_of_month(2000, month, day)?;
        Ok(Self { month, day })
    }

    pub fn from_date(date: CalendarDate) -> Self {
        date.month_day()
    }

    pub fn now_with<C: Clock + ?Sized>(clock: &C) -> Result<Self> {
        Ok(CalendarDate::now_with(clock)?.month_day())
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn day(self) -> u32 {
        self.day
    }

    pub fn is_valid_year(self, year: i32) -> bool {
        self.day <= calendar::days_in_month(year, self.month)
    }

    /// Combines with a year; Feb 29 becomes Feb 28 in a non-leap year.
    pub fn at_year(self, year: i32) -> Result<CalendarDate> {
        let day = self.day.min(calendar::days_in_month(year, self.month));
        CalendarDate::of(year, self.month, day)
    }

    /// Whether the recurring event falls on `date`. A Feb 29 event is
    /// observed on Feb 28 in non-leap years.
    pub fn is_anniversary(self, date: CalendarDate) -> bool {
        match self.at_year(date.year()) {
            Ok(observed) => observed == date,
            Err(_) => false,
        }
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "--{:02}-{:02}", self.month, self.day)
    }
}
