use crate::utils::error::{DateTimeError, Result};
use chrono::{FixedOffset, Offset, Utc};
use chrono_tz::Tz;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

const MAX_OFFSET_SECONDS: i32 = 18 * 3600;

/// A fixed difference from UTC, between -18:00 and +18:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtcOffset(FixedOffset);

fn offset_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([+-])(\d{1,2})(?:(:?)(\d{2})(?:(:?)(\d{2}))?)?$")
            .expect("offset regex is valid")
    })
}

impl UtcOffset {
    pub fn utc() -> Self {
        Self(Utc.fix())
    }

    pub fn of_total_seconds(seconds: i32) -> Result<Self> {
        if seconds.abs() > MAX_OFFSET_SECONDS {
            return Err(DateTimeError::InvalidOffset {
                offset: seconds.to_string(),
                reason: "must be within ±18:00".to_string(),
            });
        }
        FixedOffset::east_opt(seconds)
            .map(Self)
            .ok_or_else(|| DateTimeError::InvalidOffset {
                offset: seconds.to_string(),
                reason: "out of range".to_string(),
            })
    }

    /// Hours and minutes must share a sign, e.g. (-5, -30).
    pub fn of_hours_minutes(hours: i32, minutes: i32) -> Result<Self> {
        if minutes.abs() > 59 || (hours > 0 && minutes < 0) || (hours < 0 && minutes > 0) {
            return Err(DateTimeError::InvalidOffset {
                offset: format!("{}:{}", hours, minutes),
                reason: "minutes must be 0..=59 and share the sign of hours".to_string(),
            });
        }
        Self::of_total_seconds(hours * 3600 + minutes * 60)
    }

    /// Accepts `Z`, `+h`, `+hh`, `+hh:mm`, `+hhmm`, `+hh:mm:ss` and `+hhmmss`.
    pub fn parse(text: &str) -> Result<Self> {
        if text == "Z" {
            return Ok(Self::utc());
        }

        let invalid = |reason: &str| DateTimeError::InvalidOffset {
            offset: text.to_string(),
            reason: reason.to_string(),
        };

        let caps = offset_regex()
            .captures(text)
            .ok_or_else(|| invalid("expected Z or ±hh[:mm[:ss]]"))?;

        let hour_text = &caps[2];
        let minute_sep = caps.get(3).map(|m| m.as_str());
        let second_sep = caps.get(5).map(|m| m.as_str());
        if hour_text.len() == 1 && caps.get(4).is_some() {
            return Err(invalid("single-digit hours cannot have minutes"));
        }
        if let (Some(a), Some(b)) = (minute_sep, second_sep) {
            if a != b {
                return Err(invalid("separators must be used consistently"));
            }
        }

        let parse_part = |idx: usize| -> i32 {
            caps.get(idx)
                .and_then(|m| m.as_str().parse::<i32>().ok())
                .unwrap_or(0)
        };
        let hours = parse_part(2);
        let minutes = parse_part(4);
        let seconds = parse_part(6);
        if hours > 18 || minutes > 59 || seconds > 59 {
            return Err(invalid("component out of range"));
        }

        let total = hours * 3600 + minutes * 60 + seconds;
        let signed = if &caps[1] == "-" { -total } else { total };
        Self::of_total_seconds(signed).map_err(|_| invalid("must be within ±18:00"))
    }

    pub fn from_fixed(offset: FixedOffset) -> Self {
        Self(offset)
    }

    pub fn to_fixed(self) -> FixedOffset {
        self.0
    }

    pub fn total_seconds(self) -> i32 {
        self.0.local_minus_utc()
    }
}

impl fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.total_seconds();
        if total == 0 {
            return write!(f, "Z");
        }
        let sign = if total < 0 { '-' } else { '+' };
        let abs = total.unsigned_abs();
        write!(f, "{}{:02}:{:02}", sign, abs / 3600, (abs % 3600) / 60)?;
        if abs % 60 != 0 {
            write!(f, ":{:02}", abs % 60)?;
        }
        Ok(())
    }
}

impl FromStr for UtcOffset {
    type Err = DateTimeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Where an instant is turned into local time: an IANA region whose offset
/// follows its rule table, a fixed offset, or the host's own zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneId {
    Region(Tz),
    Offset(UtcOffset),
    System,
}

impl ZoneId {
    /// `Z` and `±hh...` become fixed offsets, `system` selects the host zone,
    /// everything else is looked up in the IANA database.
    pub fn of(id: &str) -> Result<Self> {
        let id = id.trim();
        if id == "Z" || id.starts_with('+') || id.starts_with('-') {
            return UtcOffset::parse(id).map(ZoneId::Offset);
        }
        if id.eq_ignore_ascii_case("system") {
            return Ok(ZoneId::System);
        }
        id.parse::<Tz>()
            .map(ZoneId::Region)
            .map_err(|_| DateTimeError::UnknownZone {
                zone: id.to_string(),
            })
    }

    pub fn utc() -> Self {
        ZoneId::Offset(UtcOffset::utc())
    }

    /// The zone named by `TZ` when it is an IANA id, otherwise the host zone.
    pub fn system_default() -> Self {
        match std::env::var("TZ") {
            Ok(name) if !name.is_empty() => {
                let name = name.trim_start_matches(':');
                match name.parse::<Tz>() {
                    Ok(tz) => ZoneId::Region(tz),
                    Err(_) => {
                        tracing::warn!("TZ={} is not an IANA zone id, using the host zone", name);
                        ZoneId::System
                    }
                }
            }
            _ => ZoneId::System,
        }
    }

    pub fn id(&self) -> String {
        match self {
            ZoneId::Region(tz) => tz.name().to_string(),
            ZoneId::Offset(offset) => offset.to_string(),
            ZoneId::System => "SYSTEM".to_string(),
        }
    }

    pub fn is_fixed_offset(&self) -> bool {
        matches!(self, ZoneId::Offset(_))
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for ZoneId {
    type Err = DateTimeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::of(s)
    }
}

impl From<UtcOffset> for ZoneId {
    fn from(offset: UtcOffset) -> Self {
        ZoneId::Offset(offset)
    }
}
