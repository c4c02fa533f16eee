//! Label formatting for the KST frame.
//!
//! Small pure helpers producing the human-readable strings the rendering
//! layer displays: civil date/time labels, the governing solar-term label,
//! and the "today" header line.

use crate::instant::Instant;
use crate::pillars;
use crate::solar::{SolarTermInstant, TermTable};

/// Civil KST date label.
///
/// ```
/// use sajucal::{pillars, Instant};
///
/// let t = Instant::from_kst(1990, 5, 15, 8, 30);
/// assert_eq!("1990년 5월 15일", pillars::fmt::kst_date(t));
/// ```
pub fn kst_date(t: Instant) -> String {
    let c = t.kst();
    format!("{}년 {}월 {}일", c.year, c.month, c.day)
}

/// Civil KST time label, zero-padded.
///
/// ```
/// use sajucal::{pillars, Instant};
///
/// let t = Instant::from_kst(1990, 5, 15, 8, 30);
/// assert_eq!("08:30", pillars::fmt::kst_time(t));
/// ```
pub fn kst_time(t: Instant) -> String {
    let c = t.kst();
    format!("{:02}:{:02}", c.hour, c.minute)
}

/// Label for one resolved term, e.g. `입춘 (2024년 2월 4일 17:27 KST) 기준`.
pub fn term_label(term: SolarTermInstant) -> String {
    format!(
        "{} ({} {} KST) 기준",
        term.def.name,
        kst_date(term.instant),
        kst_time(term.instant)
    )
}

/// Label for the term governing `t`.
pub fn active_term_label(table: &TermTable, t: Instant) -> String {
    term_label(pillars::active_term(table, t))
}

/// The "today" header line: date, day pillar and governing term.
pub fn today_label(table: &TermTable, now: Instant) -> String {
    format!(
        "오늘 {} • {} 일진 • {}",
        kst_date(now),
        pillars::day_pillar(now),
        active_term_label(table, now)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solar::store::NullStore;

    #[test]
    fn date_and_time_labels() {
        let t = Instant::from_kst(2024, 2, 4, 7, 5);
        assert_eq!("2024년 2월 4일", kst_date(t));
        assert_eq!("07:05", kst_time(t));
    }

    #[test]
    fn active_term_label_names_the_governing_term() {
        let table = TermTable::new(Box::new(NullStore));
        let ipchun = table.terms_for_year(2024)[crate::solar::IPCHUN];
        let label = active_term_label(&table, ipchun.instant + 3_600_000);
        assert!(label.starts_with("입춘 (2024년 2월 4일"), "{label}");
        assert!(label.ends_with("KST) 기준"), "{label}");
    }

    #[test]
    fn today_label_mentions_the_day_pillar() {
        let table = TermTable::new(Box::new(NullStore));
        let now = Instant::from_kst(1984, 2, 2, 10, 0);
        let label = today_label(&table, now);
        assert!(label.starts_with("오늘 1984년 2월 2일 • 갑자 일진 • "), "{label}");
    }
}
