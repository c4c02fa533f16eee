//! Locates the instant at which the sun crosses a term's target longitude.

use tracing::warn;

use crate::instant::Instant;
use crate::solar::position::{angle_diff, apparent_longitude_ms};
use crate::solar::SolarTermDef;

const MS_PER_DAY: f64 = 86_400_000.0;
const MS_PER_HOUR: f64 = 3_600_000.0;

/// Fixed bisection depth; 32 halvings of a ≤20-day bracket resolve below a
/// millisecond, so no dynamic tolerance test is needed and the worst-case
/// cost is bounded.
const BISECT_ITERATIONS: u32 = 32;

/// Finds the instant in `year` at which the sun's apparent longitude crosses
/// `def.longitude`. Total: always returns a value.
///
/// The search starts from the definition's seed guess at 12:00 KST and scans
/// for a sign change of the wrapped angular difference, first over ±6 days
/// at 3-hour steps, then over ±10 days at 6-hour steps. The bracket is then
/// bisected a fixed number of times. If neither pass brackets a crossing the
/// seed instant itself is returned, a documented degraded result, not an
/// error; callers get a usable approximation. The window and step constants
/// are load-bearing for output compatibility and must not be retuned.
pub fn find_crossing(year: i32, def: &SolarTermDef) -> Instant {
    let seed = Instant::from_kst(year, def.guess_month, def.guess_day, 12, 0);
    let seed_ms = seed.unix_ms() as f64;
    let target = def.longitude;

    let bracket = scan_bracket(
        seed_ms - 6.0 * MS_PER_DAY,
        seed_ms + 6.0 * MS_PER_DAY,
        3.0 * MS_PER_HOUR,
        target,
    )
    .or_else(|| {
        scan_bracket(
            seed_ms - 10.0 * MS_PER_DAY,
            seed_ms + 10.0 * MS_PER_DAY,
            6.0 * MS_PER_HOUR,
            target,
        )
    });
    let Some((mut lo, mut hi)) = bracket else {
        warn!(year, term = def.key, "no crossing bracketed, falling back to seed guess");
        return seed;
    };

    for _ in 0..BISECT_ITERATIONS {
        let mid = (lo + hi) / 2.0;
        let diff_lo = angle_diff(apparent_longitude_ms(lo), target);
        let diff_mid = angle_diff(apparent_longitude_ms(mid), target);

        if diff_lo == 0.0 {
            return round_ms(lo);
        }
        if diff_mid == 0.0 {
            return round_ms(mid);
        }

        if diff_lo * diff_mid < 0.0 {
            hi = mid;
        } else {
            lo = mid;
        }
    }

    round_ms((lo + hi) / 2.0)
}

/// Scans `[start, end]` in fixed steps for a sign change of the wrapped
/// difference against `target`. An exact zero collapses the bracket to a
/// point.
fn scan_bracket(start: f64, end: f64, step: f64, target: f64) -> Option<(f64, f64)> {
    let mut prev_t = start;
    let mut prev_diff = angle_diff(apparent_longitude_ms(prev_t), target);

    let mut t = start + step;
    while t <= end {
        let diff = angle_diff(apparent_longitude_ms(t), target);
        if prev_diff == 0.0 {
            return Some((prev_t, prev_t));
        }
        if diff == 0.0 {
            return Some((t, t));
        }
        if prev_diff * diff < 0.0 {
            return Some((prev_t, t));
        }
        prev_t = t;
        prev_diff = diff;
        t += step;
    }
    None
}

fn round_ms(ms: f64) -> Instant {
    Instant::from_unix_ms(ms.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solar::position::apparent_longitude;
    use crate::solar::TERM_DEFS;

    #[test]
    fn ipchun_2024_lands_in_early_february() {
        let ipchun = &TERM_DEFS[1];
        let c = find_crossing(2024, ipchun).kst();
        assert_eq!((2024, 2, 4), (c.year, c.month, c.day));
    }

    #[test]
    fn sohan_2024_lands_on_january_sixth() {
        let sohan = &TERM_DEFS[0];
        let c = find_crossing(2024, sohan).kst();
        assert_eq!((2024, 1, 6), (c.year, c.month, c.day));
    }

    #[test]
    fn daeseol_2023_lands_on_december_seventh() {
        let daeseol = &TERM_DEFS[11];
        let c = find_crossing(2023, daeseol).kst();
        assert_eq!((2023, 12, 7), (c.year, c.month, c.day));
    }

    #[test]
    fn crossing_longitude_matches_target() {
        let ipchun = &TERM_DEFS[1];
        let t = find_crossing(2024, ipchun);
        let residual = angle_diff(apparent_longitude(t), ipchun.longitude);
        assert!(residual.abs() < 1e-6, "residual {residual}");
    }

    #[test]
    fn crossing_is_deterministic() {
        let def = &TERM_DEFS[4];
        assert_eq!(find_crossing(1990, def), find_crossing(1990, def));
    }

    #[test]
    fn unbracketable_target_falls_back_to_seed() {
        // In early January the sun sits near 285° and moves ~20° across even
        // the wide window; a target on the far side of the zodiac can never
        // bracket, which must degrade to the seed instant.
        let unreachable = SolarTermDef {
            key: "test-unreachable",
            name: "없음",
            longitude: 90.0,
            month_index: 0,
            guess_month: 1,
            guess_day: 5,
        };
        let seed = Instant::from_kst(2024, 1, 5, 12, 0);
        assert_eq!(seed, find_crossing(2024, &unreachable));
    }
}
