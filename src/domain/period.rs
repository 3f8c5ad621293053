use crate::core::calendar;
use crate::domain::date::CalendarDate;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A date-based amount of time in years, months and days, e.g. "10 years, 1 month and 24 days".
/// The fields are independent; 14 months is not normalised to 1 year 2 months unless produced by [`DateDifference::between`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DateDifference {
    years: i32,
    months: i32,
    days: i32,
}

impl DateDifference {
    pub const ZERO: DateDifference = DateDifference {
        years: 0,
        months: 0,
        days: 0,
    };

    pub fn of(years: i32, months: i32, days: i32) -> Self {
        Self {
            years,
            months,
            days,
        }
    }

    /// Whole years, then whole months of the remainder, then the remaining days.
    /// Negative when `end` is before `start`.
    pub fn between(start: CalendarDate, end: CalendarDate) -> Self {
        let start_naive = start.to_naive();
        let end_naive = end.to_naive();

        let mut total_months =
            calendar::proleptic_month(end_naive) - calendar::proleptic_month(start_naive);
        let mut days = end.day() as i64 - start.day() as i64;

        if total_months > 0 && days < 0 {
            total_months -= 1;
            // 回推到最後一個完整月份，再計算剩餘天數
            days = match calendar::add_months(start_naive, total_months) {
                Some(anchor) => end_naive.signed_duration_since(anchor).num_days(),
                None => days,
            };
        } else if total_months < 0 && days > 0 {
            total_months += 1;
            days -= end.length_of_month() as i64;
        }

        Self {
            years: (total_months / 12) as i32,
            months: (total_months % 12) as i32,
            days: days as i32,
        }
    }

    pub fn years(self) -> i32 {
        self.years
    }

    pub fn months(self) -> i32 {
        self.months
    }

    pub fn days(self) -> i32 {
        self.days
    }

    pub fn to_total_months(self) -> i64 {
        self.years as i64 * 12 + self.months as i64
    }

    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    pub fn is_negative(self) -> bool {
        self.years < 0 || self.months < 0 || self.days < 0
    }

    pub fn negated(self) -> Self {
        Self {
            years: -self.years,
            months: -self.months,
            days: -self.days,
        }
    }

    /// Adds months first (clamping at month end), then days.
    pub fn add_to(self, date: CalendarDate) -> Result<CalendarDate> {
        date.plus_months(self.to_total_months())?
            .plus_days(self.days as i64)
    }
}

impl fmt::Display for DateDifference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "P0D");
        }
        write!(f, "P")?;
        if self.years != 0 {
            write!(f, "{}Y", self.years)?;
        }
        if self.months != 0 {
            write!(f, "{}M", self.months)?;
        }
        if self.days != 0 {
            write!(f, "{}D", self.days)?;
        }
        Ok(())
    }
}
