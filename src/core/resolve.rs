//! Local date-time to offset resolution against a zone's rules.

use crate::domain::zone::{UtcOffset, ZoneId};
use crate::utils::error::{DateTimeError, Result};
use chrono::{FixedOffset, Local, NaiveDateTime, Offset, TimeDelta, TimeZone};
use std::str::FromStr;

/// How a local time that falls in a DST transition is turned into an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disambiguation {
    /// Gap: shift forward by the length of the gap. Overlap: keep the earlier offset.
    #[default]
    Compatible,
    /// Gap or overlap is a `ZoneResolution` error.
    Strict,
}

impl FromStr for Disambiguation {
    type Err = DateTimeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "compatible" => Ok(Disambiguation::Compatible),
            "strict" => Ok(Disambiguation::Strict),
            other => Err(DateTimeError::ConfigError {
                field: "zone.disambiguation".to_string(),
                message: format!("Unsupported policy '{}'. Valid values: compatible, strict", other),
            }),
        }
    }
}

/// Offset in effect at a UTC instant.
pub(crate) fn offset_at_utc(utc: NaiveDateTime, zone: &ZoneId) -> FixedOffset {
    match zone {
        ZoneId::Region(tz) => tz.offset_from_utc_datetime(&utc).fix(),
        ZoneId::Offset(offset) => offset.to_fixed(),
        ZoneId::System => Local.offset_from_utc_datetime(&utc),
    }
}

/// Earliest and latest valid offsets for a local time: equal when unique,
/// different in an overlap, both `None` in a gap.
fn local_offsets(local: NaiveDateTime, zone: &ZoneId) -> (Option<FixedOffset>, Option<FixedOffset>) {
    match zone {
        ZoneId::Region(tz) => {
            let mapped = tz.offset_from_local_datetime(&local).map(|o| o.fix());
            (mapped.earliest(), mapped.latest())
        }
        ZoneId::Offset(offset) => (Some(offset.to_fixed()), Some(offset.to_fixed())),
        ZoneId::System => {
            let mapped = Local.offset_from_local_datetime(&local);
            (mapped.earliest(), mapped.latest())
        }
    }
}

fn resolution_error(local: NaiveDateTime, zone: &ZoneId, reason: &str) -> DateTimeError {
    DateTimeError::ZoneResolution {
        zone: zone.id(),
        local: local.to_string(),
        reason: reason.to_string(),
    }
}

fn overflow() -> DateTimeError {
    DateTimeError::Overflow {
        operation: "zone resolution".to_string(),
    }
}

/// Resolves `local` in `zone`. In an overlap, `preferred` wins when it is one
/// of the two valid offsets; otherwise `policy` decides.
pub(crate) fn resolve_local(
    local: NaiveDateTime,
    zone: &ZoneId,
    policy: Disambiguation,
    preferred: Option<UtcOffset>,
) -> Result<(NaiveDateTime, FixedOffset)> {
    match local_offsets(local, zone) {
        (Some(earliest), Some(latest)) if earliest == latest => Ok((local, earliest)),
        (Some(earliest), Some(latest)) => {
            if let Some(p) = preferred.map(UtcOffset::to_fixed) {
                if p == earliest || p == latest {
                    return Ok((local, p));
                }
            }
            match policy {
                Disambiguation::Strict => Err(resolution_error(
                    local,
                    zone,
                    "local time is ambiguous (daylight-saving overlap)",
                )),
                Disambiguation::Compatible => {
                    tracing::debug!(
                        "{} is ambiguous in {}, using earlier offset {}",
                        local,
                        zone,
                        earliest
                    );
                    Ok((local, earliest))
                }
            }
        }
        _ => match policy {
            Disambiguation::Strict => Err(resolution_error(
                local,
                zone,
                "local time does not exist (daylight-saving gap)",
            )),
            Disambiguation::Compatible => {
                // 用轉換前的 offset 換算成 UTC，再換回當地時間
                let probe = local
                    .checked_sub_signed(TimeDelta::days(1))
                    .ok_or_else(overflow)?;
                let before = offset_at_utc(probe, zone);
                let utc = local
                    .checked_sub_signed(TimeDelta::seconds(before.local_minus_utc() as i64))
                    .ok_or_else(overflow)?;
                let after = offset_at_utc(utc, zone);
                let shifted = utc
                    .checked_add_signed(TimeDelta::seconds(after.local_minus_utc() as i64))
                    .ok_or_else(overflow)?;
                tracing::debug!(
                    "{} falls in a gap in {}, shifted to {}{}",
                    local,
                    zone,
                    shifted,
                    after
                );
                Ok((shifted, after))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    fn new_york() -> ZoneId {
        ZoneId::Region(chrono_tz::America::New_York)
    }

    #[test]
    fn test_unique_local_time() {
        let (value, offset) =
            resolve_local(local(2024, 7, 1, 12, 0), &new_york(), Disambiguation::Strict, None)
                .unwrap();
        assert_eq!(value, local(2024, 7, 1, 12, 0));
        assert_eq!(offset.local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn test_gap_shifts_forward() {
        let (value, offset) = resolve_local(
            local(2024, 3, 10, 2, 30),
            &new_york(),
            Disambiguation::Compatible,
            None,
        )
        .unwrap();
        assert_eq!(value, local(2024, 3, 10, 3, 30));
        assert_eq!(offset.local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn test_overlap_prefers_offset_when_valid() {
        let est = UtcOffset::of_hours_minutes(-5, 0).unwrap();
        let (_, offset) = resolve_local(
            local(2024, 11, 3, 1, 30),
            &new_york(),
            Disambiguation::Strict,
            Some(est),
        )
        .unwrap();
        assert_eq!(offset.local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn test_disambiguation_from_str() {
        assert_eq!("STRICT".parse::<Disambiguation>().unwrap(), Disambiguation::Strict);
        assert_eq!(Disambiguation::default(), Disambiguation::Compatible);
        assert!("later".parse::<Disambiguation>().is_err());
    }
}
