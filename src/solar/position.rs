//! Apparent ecliptic longitude of the sun.
//!
//! Low-precision series after Meeus, *Astronomical Algorithms*, ch. 25:
//! mean longitude and mean anomaly as degree-2 polynomials in Julian
//! centuries since J2000, a three-term equation of center, and a nutation
//! correction reduced to the lunar ascending-node term. Accurate to a few
//! hundredths of a degree, which keeps term-crossing times well inside a
//! minute, and downstream consumers resolve to the minute.

use crate::instant::Instant;

const UNIX_EPOCH_JD: f64 = 2_440_587.5;
const J2000_JD: f64 = 2_451_545.0;
const DAYS_PER_CENTURY: f64 = 36_525.0;
const MS_PER_DAY: f64 = 86_400_000.0;

/// Apparent ecliptic longitude of the sun at `t`, in degrees `[0, 360)`.
pub fn apparent_longitude(t: Instant) -> f64 {
    apparent_longitude_ms(t.unix_ms() as f64)
}

/// Same as [`apparent_longitude`], over a fractional millisecond count.
///
/// The solver bisects in f64 milliseconds, so the model is evaluated on
/// that representation directly.
pub(crate) fn apparent_longitude_ms(utc_ms: f64) -> f64 {
    let jd = utc_ms / MS_PER_DAY + UNIX_EPOCH_JD;
    let t = (jd - J2000_JD) / DAYS_PER_CENTURY;

    // Geometric mean longitude and mean anomaly of the sun.
    let l0 = normalize_angle(280.46646 + 36000.76983 * t + 0.0003032 * t * t);
    let m = normalize_angle(357.52911 + 35999.05029 * t - 0.0001537 * t * t);

    // Equation of center.
    let c = (1.914602 - 0.004817 * t - 0.000014 * t * t) * m.to_radians().sin()
        + (0.019993 - 0.000101 * t) * (2.0 * m).to_radians().sin()
        + 0.000289 * (3.0 * m).to_radians().sin();

    let true_longitude = l0 + c;

    // Nutation in longitude, ascending-node term only, plus aberration.
    let omega = 125.04 - 1934.136 * t;
    normalize_angle(true_longitude - 0.00569 - 0.00478 * omega.to_radians().sin())
}

/// Reduces an angle in degrees into `[0, 360)`.
pub fn normalize_angle(degrees: f64) -> f64 {
    degrees.rem_euclid(360.0)
}

/// Signed angular difference `current − target` wrapped into `[-180, 180)`.
///
/// The wrap keeps sign changes meaningful across the 0°/360° seam, so a
/// crossing near 0° never looks like a 360° jump.
///
/// # Example
///
/// ```
/// use sajucal::solar::position::angle_diff;
///
/// assert_eq!(20.0, angle_diff(10.0, 350.0));
/// assert_eq!(-20.0, angle_diff(350.0, 10.0));
/// ```
pub fn angle_diff(current: f64, target: f64) -> f64 {
    (current - target + 540.0).rem_euclid(360.0) - 180.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instant::Instant;

    #[test]
    fn longitude_at_j2000() {
        // 2000-01-01 12:00 UTC; the apparent longitude is near 280.37°.
        let t = Instant::from_unix_ms(946_728_000_000);
        assert!((apparent_longitude(t) - 280.37).abs() < 0.05);
    }

    #[test]
    fn longitude_near_march_equinox() {
        // 2000-03-20 07:35 UTC, the instant of the equinox: longitude ~0°.
        let t = Instant::from_unix_ms(953_537_700_000);
        assert!(angle_diff(apparent_longitude(t), 0.0).abs() < 0.1);
    }

    #[test]
    fn longitude_is_normalized() {
        for days in [-40_000i64, -1, 0, 1, 365, 10_000, 70_000] {
            let lon = apparent_longitude(Instant::from_unix_ms(days * 86_400_000));
            assert!((0.0..360.0).contains(&lon), "{days}: {lon}");
        }
    }

    #[test]
    fn normalize_cases() {
        assert_eq!(0.0, normalize_angle(720.0));
        assert_eq!(330.0, normalize_angle(-30.0));
        assert_eq!(359.5, normalize_angle(-0.5));
        assert_eq!(1.0, normalize_angle(361.0));
    }

    #[test]
    fn angle_diff_is_antisymmetric() {
        // Holds exactly away from the ±180° seam.
        for (a, b) in [(0.0, 30.0), (10.0, 350.0), (200.0, 170.0), (285.0, 284.0)] {
            assert_eq!(angle_diff(a, b), -angle_diff(b, a), "{a} {b}");
        }
    }

    #[test]
    fn angle_diff_range_and_seam() {
        assert_eq!(-180.0, angle_diff(0.0, 180.0));
        assert_eq!(0.0, angle_diff(285.0, 285.0));
        let mut a = 0.0;
        while a < 360.0 {
            let d = angle_diff(a, 285.0);
            assert!((-180.0..180.0).contains(&d), "{a}: {d}");
            a += 7.3;
        }
    }
}
