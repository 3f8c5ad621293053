pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::config::DateTimeConfig;
pub use crate::core::clock::{FixedClock, SystemClock};
pub use crate::core::format::{patterns, DateTimeFormatter};
pub use crate::core::resolve::Disambiguation;
pub use crate::core::{Clock, Temporal};
pub use crate::domain::date::{CalendarDate, MonthDay, YearMonth};
pub use crate::domain::period::DateDifference;
pub use crate::domain::time::{ClockTime, LocalDateTime};
pub use crate::domain::timestamp::{Instant, OffsetTimestamp, ZonedTimestamp};
pub use crate::domain::zone::{UtcOffset, ZoneId};
pub use crate::utils::error::{DateTimeError, Result};

pub use chrono::Weekday;
