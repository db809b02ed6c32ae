//! Sexagesimal angles: right ascension in hours, declination in degrees.
//!
//! No range checks are made anywhere in this module. Components may overflow (`75` minutes)
//! or be negative; [`Sexagesimal::normalized`] folds them back into a canonical triple.
use serde::{Deserialize, Serialize};

use crate::constants::{Degree, Hour, DEG_PER_HOUR};

/// An angle written as three components `(units, minutes, seconds)`.
///
/// The leading unit is hours for a right ascension and degrees for a declination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sexagesimal {
    pub units: f64,
    pub minutes: f64,
    pub seconds: f64,
}

impl Sexagesimal {
    pub fn new(units: f64, minutes: f64, seconds: f64) -> Self {
        Sexagesimal {
            units,
            minutes,
            seconds,
        }
    }

    /// Split a decimal angle into whole units, whole minutes and seconds.
    /// All three components share the sign of `value`, so that `to_decimal` gives it back.
    pub fn from_decimal(value: f64) -> Self {
        let sign = if value < 0.0 { -1.0 } else { 1.0 };
        let abs = value.abs();
        let units = abs.trunc();
        let minutes = ((abs - units) * 60.0).trunc();
        let seconds = (abs - units - minutes / 60.0) * 3600.0;
        Sexagesimal::new(sign * units, sign * minutes, sign * seconds)
    }

    /// `units + minutes/60 + seconds/3600`
    pub fn to_decimal(&self) -> f64 {
        self.units + self.minutes / 60.0 + self.seconds / 3600.0
    }

    /// Carry the overflow of seconds and minutes into the leading component.
    ///
    /// `(455.365, 322.87, 245.789)` becomes `(460, 48, 51.989)`.
    pub fn normalized(&self) -> Self {
        Self::from_decimal(self.to_decimal())
    }

    /// Format as `UU:MM:SS.sss`.
    ///
    /// The first two components are zero-padded to width 2 and the seconds keep exactly three
    /// decimals. Rounding the seconds carries into minutes and units, so `59.9996` seconds never
    /// prints as `60.000`. Negative angles get a leading `-`.
    pub fn format(&self) -> String {
        let value = self.to_decimal();
        let sign = if value < 0.0 { "-" } else { "" };
        let total_millis = (value.abs() * 3_600_000.0).round() as u64;

        let units = total_millis / 3_600_000;
        let minutes = total_millis / 60_000 % 60;
        let millis = total_millis % 60_000;

        format!(
            "{sign}{units:02}:{minutes:02}:{:02}.{:03}",
            millis / 1000,
            millis % 1000
        )
    }

    /// Parse `UU:MM:SS.s` or `UU MM SS.s`. A leading sign applies to the whole angle.
    pub fn parse(text: &str) -> Option<Self> {
        let parts: Vec<&str> = text
            .split(|c: char| c == ':' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();
        if parts.len() != 3 {
            return None;
        }

        let negative = parts[0].starts_with('-');
        let units: f64 = parts[0].trim_start_matches(&['-', '+'][..]).parse().ok()?;
        let minutes: f64 = parts[1].parse().ok()?;
        let seconds: f64 = parts[2].parse().ok()?;

        let sexa = Sexagesimal::new(units, minutes, seconds);
        Some(if negative {
            Sexagesimal::from_decimal(-sexa.to_decimal())
        } else {
            sexa
        })
    }
}

/// Right ascension in degrees: `15 × (h + m/60 + s/3600)`.
pub fn ra_to_deg(ra: &Sexagesimal) -> Degree {
    DEG_PER_HOUR * ra.to_decimal()
}

/// Declination in degrees: `d + m/60 + s/3600`.
pub fn dec_to_deg(dec: &Sexagesimal) -> Degree {
    dec.to_decimal()
}

/// Right ascension in degrees back to hours.
pub fn deg_to_ra_hours(ra: Degree) -> Hour {
    ra / DEG_PER_HOUR
}
