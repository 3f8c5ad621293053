use crate::core::clock::SystemClock;
use crate::core::format::DateTimeFormatter;
use crate::core::resolve::{offset_at_utc, resolve_local, Disambiguation};
use crate::domain::date::CalendarDate;
use crate::domain::ports::{Clock, Temporal};
use crate::domain::time::{ClockTime, LocalDateTime};
use crate::domain::zone::{UtcOffset, ZoneId};
use crate::utils::error::{DateTimeError, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

fn overflow(operation: &str) -> DateTimeError {
    DateTimeError::Overflow {
        operation: operation.to_string(),
    }
}

fn rfc3339(local: NaiveDateTime, offset: FixedOffset) -> String {
    DateTime::<FixedOffset>::from_naive_utc_and_offset(local - offset, offset)
        .to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// A point on the UTC time-line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Instant(DateTime<Utc>);

impl Instant {
    pub fn now() -> Result<Self> {
        SystemClock::system_utc().instant()
    }

    pub fn now_with<C: Clock + ?Sized>(clock: &C) -> Result<Self> {
        clock.instant()
    }

    pub fn from_utc(value: DateTime<Utc>) -> Self {
        Self(value)
    }

    pub fn to_utc(self) -> DateTime<Utc> {
        self.0
    }

    pub fn of_epoch_second(seconds: i64, nanos: u32) -> Result<Self> {
        DateTime::from_timestamp(seconds, nanos)
            .map(Self)
            .ok_or_else(|| overflow("of_epoch_second"))
    }

    pub fn of_epoch_milli(millis: i64) -> Result<Self> {
        DateTime::from_timestamp_millis(millis)
            .map(Self)
            .ok_or_else(|| overflow("of_epoch_milli"))
    }

    pub fn to_epoch_milli(self) -> i64 {
        self.0.timestamp_millis()
    }

    pub fn epoch_second(self) -> i64 {
        self.0.timestamp()
    }

    /// Parses RFC 3339 text such as `2024-01-01T00:00:00Z`.
    pub fn parse(text: &str) -> Result<Self> {
        DateTime::parse_from_rfc3339(text)
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|e| DateTimeError::FormatMismatch {
                input: text.to_string(),
                pattern: "RFC 3339".to_string(),
                reason: e.to_string(),
            })
    }

    pub fn plus_seconds(self, seconds: i64) -> Result<Self> {
        TimeDelta::try_seconds(seconds)
            .and_then(|d| self.0.checked_add_signed(d))
            .map(Self)
            .ok_or_else(|| overflow("plus_seconds"))
    }

    pub fn plus_millis(self, millis: i64) -> Result<Self> {
        TimeDelta::try_milliseconds(millis)
            .and_then(|d| self.0.checked_add_signed(d))
            .map(Self)
            .ok_or_else(|| overflow("plus_millis"))
    }

    pub fn is_before(self, other: Self) -> bool {
        self < other
    }

    pub fn is_after(self, other: Self) -> bool {
        self > other
    }

    pub fn at_zone(self, zone: ZoneId) -> ZonedTimestamp {
        ZonedTimestamp::from_instant(self, zone)
    }

    pub fn at_offset(self, offset: UtcOffset) -> OffsetTimestamp {
        OffsetTimestamp::from_instant(self, offset)
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

impl FromStr for Instant {
    type Err = DateTimeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Local date-time in a zone, with the offset its rules give at that instant.
/// Meant for display to people; see [`OffsetTimestamp`] for machine timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZonedTimestamp {
    local: NaiveDateTime,
    offset: UtcOffset,
    zone: ZoneId,
}

impl ZonedTimestamp {
    /// Attaches `zone` using [`Disambiguation::Compatible`].
    pub fn of(local: LocalDateTime, zone: ZoneId) -> Result<Self> {
        Self::resolve(local, zone, Disambiguation::Compatible)
    }

    /// Fails with `ZoneResolution` when `local` is in a gap or an overlap.
    pub fn of_strict(local: LocalDateTime, zone: ZoneId) -> Result<Self> {
        Self::resolve(local, zone, Disambiguation::Strict)
    }

    pub fn resolve(local: LocalDateTime, zone: ZoneId, policy: Disambiguation) -> Result<Self> {
        Self::of_local(local, zone, None, policy)
    }

    /// Like [`ZonedTimestamp::resolve`], but in an overlap keeps `preferred`
    /// when it is one of the two valid offsets.
    pub fn of_local(
        local: LocalDateTime,
        zone: ZoneId,
        preferred: Option<UtcOffset>,
        policy: Disambiguation,
    ) -> Result<Self> {
        let (local, offset) = resolve_local(local.to_naive(), &zone, policy, preferred)?;
        Ok(Self {
            local,
            offset: UtcOffset::from_fixed(offset),
            zone,
        })
    }

    pub fn from_instant(instant: Instant, zone: ZoneId) -> Self {
        let utc = instant.to_utc().naive_utc();
        let offset = offset_at_utc(utc, &zone);
        Self {
            local: utc + offset,
            offset: UtcOffset::from_fixed(offset),
            zone,
        }
    }

    pub fn now() -> Result<Self> {
        Self::now_with(&SystemClock::system_default_zone())
    }

    pub fn now_with<C: Clock + ?Sized>(clock: &C) -> Result<Self> {
        Ok(Self::from_instant(clock.instant()?, clock.zone()))
    }

    pub fn parse(text: &str, pattern: &str) -> Result<Self> {
        DateTimeFormatter::of_pattern(pattern)?.parse_zoned(text)
    }

    pub fn format(&self, pattern: &str) -> Result<String> {
        DateTimeFormatter::of_pattern(pattern)?.format(self)
    }

    pub fn zone(&self) -> ZoneId {
        self.zone
    }

    pub fn offset(&self) -> UtcOffset {
        self.offset
    }

    pub fn local_date_time(&self) -> LocalDateTime {
        LocalDateTime::from_naive(self.local)
    }

    pub fn date(&self) -> CalendarDate {
        CalendarDate::from_naive(self.local.date())
    }

    pub fn time(&self) -> ClockTime {
        ClockTime::from_naive(self.local.time())
    }

    pub fn to_instant(&self) -> Instant {
        Instant::from_utc((self.local - self.offset.to_fixed()).and_utc())
    }

    pub fn to_offset_timestamp(&self) -> OffsetTimestamp {
        OffsetTimestamp::of(self.local_date_time(), self.offset)
    }

    /// Same instant seen from another zone.
    pub fn with_zone_same_instant(&self, zone: ZoneId) -> Self {
        Self::from_instant(self.to_instant(), zone)
    }

    /// Same wall-clock time in another zone, keeping the current offset if it is still valid.
    pub fn with_zone_same_local(&self, zone: ZoneId) -> Result<Self> {
        Self::of_local(
            self.local_date_time(),
            zone,
            Some(self.offset),
            Disambiguation::Compatible,
        )
    }

    /// Moves along the time-line, so a DST transition changes the wall-clock result.
    pub fn plus_hours(&self, hours: i64) -> Result<Self> {
        let instant = self.to_instant().plus_seconds(
            hours.checked_mul(3600).ok_or_else(|| overflow("plus_hours"))?,
        )?;
        Ok(Self::from_instant(instant, self.zone))
    }

    /// Moves the local date, then re-resolves in the zone keeping the offset when possible.
    pub fn plus_days(&self, days: i64) -> Result<Self> {
        let local = self.local_date_time().plus_days(days)?;
        Self::of_local(local, self.zone, Some(self.offset), Disambiguation::Compatible)
    }

    pub fn is_before(&self, other: &Self) -> bool {
        self.to_instant() < other.to_instant()
    }

    pub fn is_after(&self, other: &Self) -> bool {
        self.to_instant() > other.to_instant()
    }

    pub fn is_same_instant(&self, other: &Self) -> bool {
        self.to_instant() == other.to_instant()
    }
}

impl fmt::Display for ZonedTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", rfc3339(self.local, self.offset.to_fixed()))?;
        if !self.zone.is_fixed_offset() {
            write!(f, "[{}]", self.zone)?;
        }
        Ok(())
    }
}

impl Temporal for ZonedTimestamp {
    fn date_part(&self) -> Option<NaiveDate> {
        Some(self.local.date())
    }

    fn time_part(&self) -> Option<NaiveTime> {
        Some(self.local.time())
    }

    fn offset_part(&self) -> Option<UtcOffset> {
        Some(self.offset)
    }

    fn zone_part(&self) -> Option<ZoneId> {
        Some(self.zone)
    }
}

/// Local date-time with a fixed UTC offset and no rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OffsetTimestamp {
    local: NaiveDateTime,
    offset: UtcOffset,
}

impl OffsetTimestamp {
    pub fn of(local: LocalDateTime, offset: UtcOffset) -> Self {
        Self {
            local: local.to_naive(),
            offset,
        }
    }

    pub fn from_instant(instant: Instant, offset: UtcOffset) -> Self {
        Self {
            local: instant.to_utc().naive_utc() + offset.to_fixed(),
            offset,
        }
    }

    pub fn now_with<C: Clock + ?Sized>(clock: &C) -> Result<Self> {
        let zoned = ZonedTimestamp::now_with(clock)?;
        Ok(zoned.to_offset_timestamp())
    }

    pub fn parse(text: &str, pattern: &str) -> Result<Self> {
        DateTimeFormatter::of_pattern(pattern)?.parse_offset(text)
    }

    pub fn format(&self, pattern: &str) -> Result<String> {
        DateTimeFormatter::of_pattern(pattern)?.format(self)
    }

    pub fn offset(&self) -> UtcOffset {
        self.offset
    }

    pub fn local_date_time(&self) -> LocalDateTime {
        LocalDateTime::from_naive(self.local)
    }

    pub fn to_instant(&self) -> Instant {
        Instant::from_utc((self.local - self.offset.to_fixed()).and_utc())
    }

    pub fn with_offset_same_instant(&self, offset: UtcOffset) -> Self {
        Self::from_instant(self.to_instant(), offset)
    }

    pub fn at_zone_same_instant(&self, zone: ZoneId) -> ZonedTimestamp {
        ZonedTimestamp::from_instant(self.to_instant(), zone)
    }

    pub fn is_before(&self, other: &Self) -> bool {
        self.to_instant() < other.to_instant()
    }

    pub fn is_after(&self, other: &Self) -> bool {
        self.to_instant() > other.to_instant()
    }
}

impl fmt::Display for OffsetTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", rfc3339(self.local, self.offset.to_fixed()))
    }
}

impl Temporal for OffsetTimestamp {
    fn date_part(&self) -> Option<NaiveDate> {
        Some(self.local.date())
    }

    fn time_part(&self) -> Option<NaiveTime> {
        Some(self.local.time())
    }

    fn offset_part(&self) -> Option<UtcOffset> {
        Some(self.offset)
    }
}
