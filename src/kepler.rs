use super::constants::{Radian, DPI};
use crate::edit_errors::HeaderEditError;

/// Principal value of an angle in radians, in [0, 2π).
pub(crate) fn principal_angle(a: f64) -> f64 {
    a.rem_euclid(DPI)
}

/// Solve Kepler's equation `E − e·sin(E) = M` for the eccentric anomaly `E`.
///
/// Newton iteration starting at `E₀ = M`:
///
/// ```text
/// E ← E − (E − e·sin E − M) / (1 − e·cos E)
/// ```
///
/// The iteration stops as soon as the residual `|E − e·sin E − M|` drops below `eps`.
///
/// Arguments
/// -----------------
/// * `mean_anomaly`: `M` in radians.
/// * `eccentricity`: `e`, elliptic orbits only (`0 <= e < 1`).
/// * `eps`: residual tolerance.
/// * `max_iter`: maximum number of Newton steps.
///
/// Return
/// ----------
/// * `E` in radians, or [`HeaderEditError::KeplerNoConvergence`] when the residual is still
///   above `eps` after `max_iter` steps (or became NaN).
pub fn solve_kepler_equation(
    mean_anomaly: Radian,
    eccentricity: f64,
    eps: f64,
    max_iter: usize,
) -> Result<Radian, HeaderEditError> {
    let residual = |e_anom: f64| e_anom - eccentricity * e_anom.sin() - mean_anomaly;

    let mut e_anom = mean_anomaly;
    for _ in 0..max_iter {
        let f = residual(e_anom);
        if f.abs() < eps {
            return Ok(e_anom);
        }
        e_anom -= f / (1.0 - eccentricity * e_anom.cos());
    }

    // the last step may have converged
    if residual(e_anom).abs() < eps {
        Ok(e_anom)
    } else {
        Err(HeaderEditError::KeplerNoConvergence(max_iter))
    }
}

/// True anomaly from the eccentric anomaly, in (−π, π].
pub fn true_anomaly(eccentric_anomaly: Radian, eccentricity: f64) -> Radian {
    let half = eccentric_anomaly / 2.0;
    2.0 * (((1.0 + eccentricity) / (1.0 - eccentricity)).sqrt() * half.sin()).atan2(half.cos())
}
