use crate::domain::timestamp::Instant;
use crate::domain::zone::{UtcOffset, ZoneId};
use crate::utils::error::Result;
use chrono::{NaiveDate, NaiveTime};
use std::sync::Arc;

/// Source of the current instant and the zone used to interpret it.
pub trait Clock: Send + Sync {
    fn instant(&self) -> Result<Instant>;
    fn zone(&self) -> ZoneId;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn instant(&self) -> Result<Instant> {
        (**self).instant()
    }

    fn zone(&self) -> ZoneId {
        (**self).zone()
    }
}

/// Fields a value can hand to the formatter. Parts a value does not carry return `None`.
pub trait Temporal {
    fn date_part(&self) -> Option<NaiveDate>;
    fn time_part(&self) -> Option<NaiveTime>;

    fn offset_part(&self) -> Option<UtcOffset> {
        None
    }

    fn zone_part(&self) -> Option<ZoneId> {
        None
    }
}
