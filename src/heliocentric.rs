//! # Heliocentric light-time correction
//!
//! The Heliocentric Julian Date (HJD) is the Julian Date an observation would carry if it had
//! been made from the centre of the Sun. The difference with the geocentric JD is the light
//! travel time along the projection of the Earth–Sun vector on the line of sight:
//!
//! ```text
//! HJD = JD + (τ / 1440) · (û_earth · û_target)
//! ```
//!
//! with `τ = 8.3168775` light-minutes per astronomical unit.
//!
//! ## Earth position
//!
//! Earth's heliocentric position comes from mean Keplerian elements, linear in the number of
//! days `d = JD − 2451545.0` since J2000.0:
//!
//! | element                    | value at J2000 | rate per day      |
//! |----------------------------|----------------|-------------------|
//! | semi-major axis `a` (AU)   | 1.00000011     | −1.36893e-12      |
//! | eccentricity `e`           | 0.01671022     | −1.04148e-9       |
//! | mean longitude `L` (deg)   | 100.46435      | +0.985609101      |
//! | perihelion longitude `ϖ`   | 102.94719      | +0.00000911309    |
//!
//! Kepler's equation is solved for `M = L − ϖ`, the position is built in the ecliptic plane,
//! rotated to equatorial coordinates with the J2000 obliquity, and the apparent right
//! ascension/declination of the Earth gives `û_earth`.
use nalgebra::{Rotation3, Vector3};

use crate::constants::{
    Degree, JulianDate, Radian, JD2000, LIGHT_MINUTES_PER_AU,
    MINUTES_PER_DAY, OBLIQUITY_J2000, RADEG,
};
use crate::edit_errors::HeaderEditError;
use crate::kepler::{principal_angle, solve_kepler_equation, true_anomaly};
use crate::params::EditorParams;

/// Mean orbital elements of the Earth at a given date.
#[derive(Debug, Clone, PartialEq)]
pub struct EarthElements {
    pub perihelion_longitude: Degree,
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub mean_longitude: Degree,
}

impl EarthElements {
    pub fn at(jd: JulianDate) -> Self {
        let d = jd - JD2000;
        EarthElements {
            perihelion_longitude: 102.94719 + 0.00000911309 * d,
            semi_major_axis: 1.00000011 - 1.36893e-12 * d,
            eccentricity: 0.01671022 - 1.04148e-9 * d,
            mean_longitude: 100.46435 + 0.985609101 * d,
        }
    }

    pub fn mean_anomaly(&self) -> Radian {
        principal_angle((self.mean_longitude - self.perihelion_longitude) * RADEG)
    }
}

/// Unit vector pointing at equatorial coordinates (radians).
fn unit_vector(ra: Radian, dec: Radian) -> Vector3<f64> {
    Vector3::new(dec.cos() * ra.cos(), dec.cos() * ra.sin(), dec.sin())
}

/// Heliocentric equatorial position of the Earth in AU.
///
/// Arguments
/// -----------------
/// * `jd`: Julian Date.
/// * `params`: Kepler solver tolerance and iteration cap.
///
/// Return
/// ----------
/// * The position vector, or [`HeaderEditError::KeplerNoConvergence`].
pub fn earth_position(
    jd: JulianDate,
    params: &EditorParams,
) -> Result<Vector3<f64>, HeaderEditError> {
    let elements = EarthElements::at(jd);
    let ecc = elements.eccentricity;

    let ecc_anomaly = solve_kepler_equation(
        elements.mean_anomaly(),
        ecc,
        params.kepler_eps,
        params.kepler_max_iter,
    )?;
    let nu = true_anomaly(ecc_anomaly, ecc);
    let radius = elements.semi_major_axis * (1.0 - ecc * ecc_anomaly.cos());

    let longitude = nu + elements.perihelion_longitude * RADEG;
    let ecliptic = Vector3::new(radius * longitude.cos(), radius * longitude.sin(), 0.0);

    let ecl_to_equ = Rotation3::from_axis_angle(&Vector3::x_axis(), OBLIQUITY_J2000 * RADEG);
    Ok(ecl_to_equ * ecliptic)
}

/// Light-time correction from the Earth to the Sun along a line of sight, in days.
///
/// Arguments
/// -----------------
/// * `jd`: Julian Date of the observation.
/// * `ra`, `dec`: coordinates of the target in degrees.
/// * `params`: Kepler solver settings.
///
/// Return
/// ----------
/// * The correction to add to `jd`, between −τ/1440 and +τ/1440 days.
pub fn heliocentric_correction(
    jd: JulianDate,
    ra: Degree,
    dec: Degree,
    params: &EditorParams,
) -> Result<f64, HeaderEditError> {
    let earth = earth_position(jd, params)?;

    let earth_ra = earth.y.atan2(earth.x);
    let earth_dec = earth.z.atan2(earth.x.hypot(earth.y));

    let cos_angle = unit_vector(earth_ra, earth_dec).dot(&unit_vector(ra * RADEG, dec * RADEG));
    Ok(LIGHT_MINUTES_PER_AU * cos_angle / MINUTES_PER_DAY)
}

/// Heliocentric Julian Date: `jd` plus the [`heliocentric_correction`].
pub fn heliocentric_julian_date(
    jd: JulianDate,
    ra: Degree,
    dec: Degree,
    params: &EditorParams,
) -> Result<JulianDate, HeaderEditError> {
    Ok(jd + heliocentric_correction(jd, ra, dec, params)?)
}
