use crate::domain::ports::Clock;
use crate::domain::timestamp::Instant;
use crate::domain::zone::ZoneId;
use crate::utils::error::{DateTimeError, Result};
use std::time::{SystemTime, UNIX_EPOCH};

/// Reads the host wall clock and interprets it in `zone`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemClock {
    zone: ZoneId,
}

impl SystemClock {
    pub fn new(zone: ZoneId) -> Self {
        Self { zone }
    }

    pub fn system_utc() -> Self {
        Self::new(ZoneId::utc())
    }

    pub fn system_default_zone() -> Self {
        Self::new(ZoneId::system_default())
    }
}

impl Clock for SystemClock {
    fn instant(&self) -> Result<Instant> {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| DateTimeError::ClockUnavailable {
                message: format!("system clock is before the Unix epoch: {}", e),
            })?;
        let seconds = i64::try_from(elapsed.as_secs()).map_err(|_| {
            DateTimeError::ClockUnavailable {
                message: "system clock is beyond the supported range".to_string(),
            }
        })?;

        let instant = Instant::of_epoch_second(seconds, elapsed.subsec_nanos()).map_err(|_| {
            DateTimeError::ClockUnavailable {
                message: "system clock is beyond the supported range".to_string(),
            }
        })?;
        tracing::trace!("system clock read {} ({})", instant, self.zone);
        Ok(instant)
    }

    fn zone(&self) -> ZoneId {
        self.zone
    }
}

/// Always reports the same instant. Used to make "now"-based checks deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    instant: Instant,
    zone: ZoneId,
}

impl FixedClock {
    pub fn new(instant: Instant, zone: ZoneId) -> Self {
        Self { instant, zone }
    }

    /// Convenience for tests and configuration: RFC 3339 instant plus zone id.
    pub fn parse(instant: &str, zone: &str) -> Result<Self> {
        Ok(Self::new(Instant::parse(instant)?, ZoneId::of(zone)?))
    }

    pub fn with_zone(self, zone: ZoneId) -> Self {
        Self { zone, ..self }
    }
}

impl Clock for FixedClock {
    fn instant(&self) -> Result<Instant> {
        Ok(self.instant)
    }

    fn zone(&self) -> ZoneId {
        self.zone
    }
}
