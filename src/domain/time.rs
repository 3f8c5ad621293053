use crate::core::clock::SystemClock;
use crate::core::format::DateTimeFormatter;
use crate::domain::date::CalendarDate;
use crate::domain::ports::{Clock, Temporal};
use crate::domain::timestamp::{OffsetTimestamp, ZonedTimestamp};
use crate::domain::zone::{UtcOffset, ZoneId};
use crate::utils::error::{DateTimeError, Result};
use crate::utils::validation::validate_range;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

const SECONDS_PER_DAY: i64 = 86_400;

/// Time of day with nanosecond precision and no date or zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    pub const MIDNIGHT: ClockTime = ClockTime(NaiveTime::MIN);

    pub fn of(hour: u32, minute: u32, second: u32) -> Result<Self> {
        Self::of_nano(hour, minute, second, 0)
    }

    pub fn of_nano(hour: u32, minute: u32, second: u32, nanosecond: u32) -> Result<Self> {
        validate_range("hour", hour, 0, 23)?;
        validate_range("minute", minute, 0, 59)?;
        validate_range("second", second, 0, 59)?;
        validate_range("nanosecond", nanosecond, 0, 999_999_999)?;
        NaiveTime::from_hms_nano_opt(hour, minute, second, nanosecond)
            .map(Self)
            .ok_or_else(|| DateTimeError::InvalidDateComponent {
                field: "time".to_string(),
                value: format!("{:02}:{:02}:{:02}.{:09}", hour, minute, second, nanosecond),
                reason: "not a valid time of day".to_string(),
            })
    }

    pub fn from_naive(time: NaiveTime) -> Self {
        Self(time)
    }

    pub fn to_naive(self) -> NaiveTime {
        self.0
    }

    pub fn now() -> Result<Self> {
        Self::now_with(&SystemClock::system_default_zone())
    }

    pub fn now_with<C: Clock + ?Sized>(clock: &C) -> Result<Self> {
        Ok(ZonedTimestamp::now_with(clock)?.time())
    }

    pub fn parse(text: &str, pattern: &str) -> Result<Self> {
        DateTimeFormatter::of_pattern(pattern)?.parse_time(text)
    }

    pub fn format(&self, pattern: &str) -> Result<String> {
        DateTimeFormatter::of_pattern(pattern)?.format(self)
    }

    pub fn hour(self) -> u32 {
        self.0.hour()
    }

    pub fn minute(self) -> u32 {
        self.0.minute()
    }

    pub fn second(self) -> u32 {
        self.0.second()
    }

    pub fn nanosecond(self) -> u32 {
        self.0.nanosecond()
    }

    pub fn to_second_of_day(self) -> u32 {
        self.0.num_seconds_from_midnight()
    }

    // 超過午夜時會繞回，不會進位到日期
    pub fn plus_hours(self, hours: i64) -> Self {
        self.plus_seconds((hours % 24) * 3600)
    }

    pub fn plus_minutes(self, minutes: i64) -> Self {
        self.plus_seconds((minutes % 1440) * 60)
    }

    pub fn plus_seconds(self, seconds: i64) -> Self {
        let wrapped = seconds.rem_euclid(SECONDS_PER_DAY);
        let (time, _) = self.0.overflowing_add_signed(TimeDelta::seconds(wrapped));
        Self(time)
    }

    pub fn minus_hours(self, hours: i64) -> Self {
        self.plus_seconds(-((hours % 24) * 3600))
    }

    pub fn is_before(self, other: Self) -> bool {
        self < other
    }

    pub fn is_after(self, other: Self) -> bool {
        self > other
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Temporal for ClockTime {
    fn date_part(&self) -> Option<NaiveDate> {
        None
    }

    fn time_part(&self) -> Option<NaiveTime> {
        Some(self.0)
    }
}

/// Date and time of day without a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalDateTime(NaiveDateTime);

fn overflow(operation: &str) -> DateTimeError {
    DateTimeError::Overflow {
        operation: operation.to_string(),
    }
}

impl LocalDateTime {
    pub fn of(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Result<Self> {
        Ok(Self::of_date_time(
            CalendarDate::of(year, month, day)?,
            ClockTime::of(hour, minute, 0)?,
        ))
    }

    pub fn of_date_time(date: CalendarDate, time: ClockTime) -> Self {
        Self(NaiveDateTime::new(date.to_naive(), time.to_naive()))
    }

    pub fn from_naive(value: NaiveDateTime) -> Self {
        Self(value)
    }

    pub fn to_naive(self) -> NaiveDateTime {
        self.0
    }

    pub fn now() -> Result<Self> {
        Self::now_with(&SystemClock::system_default_zone())
    }

    pub fn now_with<C: Clock + ?Sized>(clock: &C) -> Result<Self> {
        Ok(ZonedTimestamp::now_with(clock)?.local_date_time())
    }

    pub fn parse(text: &str, pattern: &str) -> Result<Self> {
        DateTimeFormatter::of_pattern(pattern)?.parse_date_time(text)
    }

    pub fn format(&self, pattern: &str) -> Result<String> {
        DateTimeFormatter::of_pattern(pattern)?.format(self)
    }

    pub fn date(self) -> CalendarDate {
        CalendarDate::from_naive(self.0.date())
    }

    pub fn time(self) -> ClockTime {
        ClockTime::from_naive(self.0.time())
    }

    fn plus_delta(self, delta: Option<TimeDelta>, operation: &str) -> Result<Self> {
        delta
            .and_then(|d| self.0.checked_add_signed(d))
            .map(Self)
            .ok_or_else(|| overflow(operation))
    }

    pub fn plus_days(self, days: i64) -> Result<Self> {
        Ok(Self::of_date_time(self.date().plus_days(days)?, self.time()))
    }

    pub fn plus_hours(self, hours: i64) -> Result<Self> {
        self.plus_delta(TimeDelta::try_hours(hours), "plus_hours")
    }

    pub fn plus_minutes(self, minutes: i64) -> Result<Self> {
        self.plus_delta(TimeDelta::try_minutes(minutes), "plus_minutes")
    }

    pub fn plus_seconds(self, seconds: i64) -> Result<Self> {
        self.plus_delta(TimeDelta::try_seconds(seconds), "plus_seconds")
    }

    pub fn is_before(self, other: Self) -> bool {
        self < other
    }

    pub fn is_after(self, other: Self) -> bool {
        self > other
    }

    /// Attaches a zone using the compatible disambiguation policy.
    pub fn at_zone(self, zone: ZoneId) -> Result<ZonedTimestamp> {
        ZonedTimestamp::of(self, zone)
    }

    pub fn at_offset(self, offset: UtcOffset) -> OffsetTimestamp {
        OffsetTimestamp::of(self, offset)
    }
}

impl fmt::Display for LocalDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}T{}", self.0.date(), self.0.time())
    }
}

impl Temporal for LocalDateTime {
    fn date_part(&self) -> Option<NaiveDate> {
        Some(self.0.date())
    }

    fn time_part(&self) -> Option<NaiveTime> {
        Some(self.0.time())
    }
}
