//! # Constants and type definitions for fitsedit
//!
//! This module centralizes the **astronomical constants**, **conversion factors**, **header
//! limits**, and **default output keywords** used throughout the crate.
//!
//! ## Overview
//!
//! - Astronomical constants used by the heliocentric correction
//! - Unit conversions (degrees ↔ radians, hours ↔ degrees, days ↔ seconds)
//! - Geometry of a FITS header (card and block sizes, default length limits)
//! - Keywords and comments written by the compute operations
//! - Core type aliases used across the crate

// -------------------------------------------------------------------------------------------------
// Astronomical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of minutes in a Julian day
pub const MINUTES_PER_DAY: f64 = 1_440.0;

/// Nanoseconds in one second
pub const NANOS_PER_SECOND: f64 = 1e9;

/// Julian Date of the J2000.0 epoch (2000-01-01 12:00:00)
pub const JD2000: f64 = 2_451_545.0;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Hours of right ascension → degrees
pub const DEG_PER_HOUR: f64 = 15.0;

/// Mean obliquity of the ecliptic at J2000.0 in degrees
pub const OBLIQUITY_J2000: Degree = 23.439292;

/// Light travel time across one astronomical unit, in minutes
pub const LIGHT_MINUTES_PER_AU: f64 = 8.3168775;

// -------------------------------------------------------------------------------------------------
// FITS header geometry
// -------------------------------------------------------------------------------------------------

/// Length of one header card
pub const CARD_SIZE: usize = 80;

/// Length of one FITS logical block
pub const BLOCK_SIZE: usize = 2880;

/// Number of cards in one header block
pub const CARDS_PER_BLOCK: usize = BLOCK_SIZE / CARD_SIZE;

/// Default maximum keyword length
pub const MAX_KEYWORD_LEN: usize = 8;

/// Default maximum length of a string value (without the enclosing quotes)
pub const MAX_STRING_VALUE_LEN: usize = 68;

/// Default maximum length of a comment
pub const MAX_COMMENT_LEN: usize = 72;

/// Default maximum combined length of a string value and its comment on one card
pub const MAX_STRING_WITH_COMMENT_LEN: usize = 65;

// -------------------------------------------------------------------------------------------------
// Default output keywords
// -------------------------------------------------------------------------------------------------

/// Keyword receiving the Julian Date
pub const JD_KEYWORD: &str = "JD";

/// Keyword receiving the Heliocentric Julian Date
pub const HJD_KEYWORD: &str = "HJD";

/// Keyword receiving the right ascension of the target
pub const RA_KEYWORD: &str = "RA";

/// Keyword receiving the declination of the target
pub const DEC_KEYWORD: &str = "DEC";

pub const JD_COMMENT: &str = "Julian Date at mid-exposure";
pub const HJD_COMMENT: &str = "Heliocentric Julian Date at mid-exposure";
pub const RA_COMMENT: &str = "Right ascension of the target (hh:mm:ss.sss)";
pub const DEC_COMMENT: &str = "Declination of the target (dd:mm:ss.sss)";

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Angle in hours of right ascension
pub type Hour = f64;
/// Julian Date (days)
pub type JulianDate = f64;
/// Duration in seconds
pub type Second = f64;
