use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode};
use chrono::{Datelike, NaiveDateTime, TimeDelta, Timelike};

use crate::constants::{JulianDate, Second, NANOS_PER_SECOND, SECONDS_PER_DAY};
use crate::edit_errors::HeaderEditError;

/// Julian Date of a Gregorian calendar date and time.
///
/// Standard Gregorian → Julian Date algorithm (Meeus, *Astronomical Algorithms*, ch. 7).
/// The fields are **not** validated: month 13 or day 99 are accepted and give a result
/// consistent with the formula, even though it is calendrically meaningless.
///
/// Arguments
/// ---------
/// * `year`, `month`, `day`: calendar date
/// * `hour`, `minute`, `second`, `nanosecond`: time of day
///
/// Return
/// ------
/// * the Julian Date, with the time of day as a day fraction
pub fn julian_date(
    year: i64,
    month: i64,
    day: i64,
    hour: i64,
    minute: i64,
    second: i64,
    nanosecond: i64,
) -> JulianDate {
    let (y, m) = if month <= 2 {
        (year - 1, month + 12)
    } else {
        (year, month)
    };

    let a = (y as f64 / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();

    let seconds = second as f64 + nanosecond as f64 / NANOS_PER_SECOND;
    let day_fraction = (hour as f64 + minute as f64 / 60.0 + seconds / 3600.0) / 24.0;

    (365.25 * (y as f64 + 4716.0)).floor() + (30.6001 * (m as f64 + 1.0)).floor()
        + day as f64
        + day_fraction
        + b
        - 1524.5
}

/// Julian Date of a [`NaiveDateTime`], interpreted in the time scale of the header (usually UTC).
pub fn datetime_to_jd(datetime: &NaiveDateTime) -> JulianDate {
    julian_date(
        datetime.year() as i64,
        datetime.month() as i64,
        datetime.day() as i64,
        datetime.hour() as i64,
        datetime.minute() as i64,
        datetime.second() as i64,
        datetime.nanosecond() as i64,
    )
}

/// Middle of an exposure window: `start + exposure / 2`.
///
/// Arguments
/// ---------
/// * `start`: start of the exposure
/// * `exposure`: exposure duration in seconds (negative values move the instant backwards)
///
/// Return
/// ------
/// * the mid-exposure instant, [`HeaderEditError::NonFiniteValue`] if `exposure` is NaN or
///   infinite, or [`HeaderEditError::ShiftOverflow`] if the result leaves the supported range.
pub fn mid_exposure(
    start: &NaiveDateTime,
    exposure: Second,
) -> Result<NaiveDateTime, HeaderEditError> {
    if !exposure.is_finite() {
        return Err(HeaderEditError::NonFiniteValue(exposure));
    }
    let half_nanos = (exposure * NANOS_PER_SECOND / 2.0).round();
    if half_nanos.abs() > i64::MAX as f64 {
        return Err(HeaderEditError::ShiftOverflow("exposure".into()));
    }
    start
        .checked_add_signed(TimeDelta::nanoseconds(half_nanos as i64))
        .ok_or_else(|| HeaderEditError::ShiftOverflow("exposure".into()))
}

/// Round a Julian Date for storage, half-up, to `places` fractional digits.
///
/// The shortest decimal representation of the `f64` is rounded, so `x.xxxxxx5` always rounds
/// up regardless of the binary approximation.
///
/// Return
/// ------
/// * the rounded decimal, or [`HeaderEditError::NonFiniteValue`] for NaN and infinities.
pub fn round_julian_date(jd: JulianDate, places: u32) -> Result<BigDecimal, HeaderEditError> {
    if !jd.is_finite() {
        return Err(HeaderEditError::NonFiniteValue(jd));
    }
    let exact =
        BigDecimal::from_str(&jd.to_string()).map_err(|_| HeaderEditError::NonFiniteValue(jd))?;
    Ok(exact.with_scale_round(places as i64, RoundingMode::HalfUp))
}

/// Length of a day fraction in seconds, handy for log messages.
pub fn day_fraction_to_seconds(days: f64) -> Second {
    days * SECONDS_PER_DAY
}
