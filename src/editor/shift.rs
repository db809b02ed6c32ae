//! Shifting date and time values.
//!
//! A header value is recognised, in this order, as
//!
//! | granularity | format (`chrono`)          | example                      |
//! |-------------|----------------------------|------------------------------|
//! | date-time   | `%Y-%m-%dT%H:%M:%S%.f`     | `2021-03-04T22:15:07.250`    |
//! | date        | `%Y-%m-%d`                 | `2021-03-04`                 |
//! | time        | `%H:%M:%S%.f`              | `22:15:07`                   |
//!
//! and only the components of the shift that make sense for that granularity are applied:
//! a date ignores hours and below, a time ignores years, months and days and wraps around
//! midnight. Years and months go first, clamping to the end of the month (`2021-01-31` plus
//! one month is `2021-02-28`), then days, then the time of day.
use chrono::{Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::edit_errors::HeaderEditError;
use crate::header::record::normalize_keyword;
use crate::header::value::HeaderValue;
use crate::header::HeaderStore;
use crate::params::EditorParams;

use super::{ensure_unprotected, prepare_record};

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S%.f";

/// Signed offsets applied by a shift. Missing fields default to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeShift {
    pub years: i64,
    pub months: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub nanoseconds: i64,
}

impl TimeShift {
    /// Calendar part in months, `None` on overflow.
    fn total_months(&self) -> Option<i64> {
        self.years.checked_mul(12)?.checked_add(self.months)
    }

    /// Time-of-day part, `None` on overflow.
    fn time_delta(&self) -> Option<TimeDelta> {
        TimeDelta::try_hours(self.hours)?
            .checked_add(&TimeDelta::try_minutes(self.minutes)?)?
            .checked_add(&TimeDelta::try_seconds(self.seconds)?)?
            .checked_add(&TimeDelta::nanoseconds(self.nanoseconds))
    }
}

/// A date/time value with its detected granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Temporal {
    DateTime(NaiveDateTime),
    Date(NaiveDate),
    Time(NaiveTime),
}

impl Temporal {
    /// Parse a header value; the first format that matches wins.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        NaiveDateTime::parse_from_str(text, DATETIME_FORMAT)
            .map(Temporal::DateTime)
            .or_else(|_| NaiveDate::parse_from_str(text, DATE_FORMAT).map(Temporal::Date))
            .or_else(|_| NaiveTime::parse_from_str(text, TIME_FORMAT).map(Temporal::Time))
            .ok()
    }

    /// Canonical text form, in the format the value was recognised with.
    pub fn format(&self) -> String {
        match self {
            Temporal::DateTime(dt) => dt.format(DATETIME_FORMAT).to_string(),
            Temporal::Date(d) => d.format(DATE_FORMAT).to_string(),
            Temporal::Time(t) => t.format(TIME_FORMAT).to_string(),
        }
    }

    /// Apply a shift, `None` if the result leaves the supported range.
    pub fn shifted(&self, shift: &TimeShift) -> Option<Self> {
        match self {
            Temporal::DateTime(dt) => {
                let dt = add_months(*dt, shift.total_months()?)?
                    .checked_add_signed(TimeDelta::try_days(shift.days)?)?
                    .checked_add_signed(shift.time_delta()?)?;
                Some(Temporal::DateTime(dt))
            }
            Temporal::Date(d) => {
                let d = add_months(*d, shift.total_months()?)?
                    .checked_add_signed(TimeDelta::try_days(shift.days)?)?;
                Some(Temporal::Date(d))
            }
            Temporal::Time(t) => {
                let (t, _days) = t.overflowing_add_signed(shift.time_delta()?);
                Some(Temporal::Time(t))
            }
        }
    }
}

/// Month arithmetic shared by [`NaiveDate`] and [`NaiveDateTime`].
trait MonthArithmetic: Sized {
    fn checked_add_months(self, months: Months) -> Option<Self>;
    fn checked_sub_months(self, months: Months) -> Option<Self>;
}

impl MonthArithmetic for NaiveDate {
    fn checked_add_months(self, months: Months) -> Option<Self> {
        NaiveDate::checked_add_months(self, months)
    }
    fn checked_sub_months(self, months: Months) -> Option<Self> {
        NaiveDate::checked_sub_months(self, months)
    }
}

impl MonthArithmetic for NaiveDateTime {
    fn checked_add_months(self, months: Months) -> Option<Self> {
        NaiveDateTime::checked_add_months(self, months)
    }
    fn checked_sub_months(self, months: Months) -> Option<Self> {
        NaiveDateTime::checked_sub_months(self, months)
    }
}

fn add_months<T: MonthArithmetic>(value: T, months: i64) -> Option<T> {
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        value.checked_add_months(magnitude)
    } else {
        value.checked_sub_months(magnitude)
    }
}

pub(crate) fn shift_time<S: HeaderStore + ?Sized>(
    store: &mut S,
    keyword: &str,
    shift: &TimeShift,
    params: &EditorParams,
) -> Result<String, HeaderEditError> {
    let keyword = normalize_keyword(keyword);
    let pos = store
        .position_of(&keyword)
        .ok_or_else(|| HeaderEditError::KeywordNotFound(keyword.clone()))?;
    ensure_unprotected(&keyword)?;

    let (value, comment) = match store.get(pos) {
        Some(record) => (
            record.value().clone(),
            record.comment().map(str::to_string),
        ),
        None => return Err(HeaderEditError::KeywordNotFound(keyword)),
    };
    let unparsable = || HeaderEditError::UnparsableDateTime {
        keyword: keyword.clone(),
        value: value.to_string(),
    };

    let original = value.as_text().and_then(Temporal::parse).ok_or_else(unparsable)?;
    let shifted = original
        .shifted(shift)
        .ok_or_else(|| HeaderEditError::ShiftOverflow(keyword.clone()))?
        .format();

    let record = prepare_record(
        &keyword,
        HeaderValue::Text(shifted.clone()),
        comment.as_deref(),
        params,
    )?;
    debug!(keyword = %keyword, from = %value, to = %shifted, "shift time");
    store.replace_at(pos, record);
    Ok(format!("Value of {keyword} shifted from {value} to {shifted}"))
}
