//! Sexagenary pillars (사주): the four stem/branch pairs derived from a
//! birth instant.
//!
//! Each pillar is a pure function of its inputs: the instant, the fixed
//! 1984 anchors, and (for the year and month pillars) the solar-term table.
//! Nothing here is mutated after construction.
//!
//! # Example
//!
//! ```
//! use sajucal::{four_pillars, Instant, NullStore, TermTable};
//!
//! let table = TermTable::new(Box::new(NullStore));
//! let birth = Instant::from_kst(1990, 5, 15, 8, 30);
//! let pillars = four_pillars(&table, birth);
//!
//! assert_eq!("경오", pillars.year.to_string());
//! assert_eq!("기사", pillars.month.to_string());
//! assert_eq!("무인", pillars.day.to_string());
//! assert_eq!("병진", pillars.hour.to_string());
//! ```

pub mod fmt;

use crate::instant::Instant;
use crate::solar::{SolarTermInstant, TermTable, DAESEOL, IPCHUN};

/// The ten heavenly stems (천간), cyclic index 0–9.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Stem {
    Gap,
    Eul,
    Byeong,
    Jeong,
    Mu,
    Gi,
    Gyeong,
    Sin,
    Im,
    Gye,
}

impl Stem {
    pub const ALL: [Stem; 10] = [
        Stem::Gap,
        Stem::Eul,
        Stem::Byeong,
        Stem::Jeong,
        Stem::Mu,
        Stem::Gi,
        Stem::Gyeong,
        Stem::Sin,
        Stem::Im,
        Stem::Gye,
    ];

    /// Stem for a cyclic index (reduced mod 10).
    pub fn from_index(index: u8) -> Self {
        Self::ALL[(index % 10) as usize]
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn hangul(self) -> &'static str {
        ["갑", "을", "병", "정", "무", "기", "경", "신", "임", "계"][self.index() as usize]
    }

    /// The stem's element; two consecutive stems share one.
    ///
    /// ```
    /// use sajucal::{Element, Stem};
    ///
    /// assert_eq!(Element::Wood, Stem::Gap.element());
    /// assert_eq!(Element::Water, Stem::Gye.element());
    /// ```
    pub fn element(self) -> Element {
        Element::ALL[(self.index() / 2) as usize]
    }
}

/// The twelve earthly branches (지지), cyclic index 0–11.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Branch {
    Ja,
    Chuk,
    In,
    Myo,
    Jin,
    Sa,
    O,
    Mi,
    Sin,
    Yu,
    Sul,
    Hae,
}

impl Branch {
    pub const ALL: [Branch; 12] = [
        Branch::Ja,
        Branch::Chuk,
        Branch::In,
        Branch::Myo,
        Branch::Jin,
        Branch::Sa,
        Branch::O,
        Branch::Mi,
        Branch::Sin,
        Branch::Yu,
        Branch::Sul,
        Branch::Hae,
    ];

    /// Branch for a cyclic index (reduced mod 12).
    pub fn from_index(index: u8) -> Self {
        Self::ALL[(index % 12) as usize]
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn hangul(self) -> &'static str {
        ["자", "축", "인", "묘", "진", "사", "오", "미", "신", "유", "술", "해"]
            [self.index() as usize]
    }
}

/// The five elements (오행).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Element {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

impl Element {
    pub const ALL: [Element; 5] = [
        Element::Wood,
        Element::Fire,
        Element::Earth,
        Element::Metal,
        Element::Water,
    ];

    pub fn hangul(self) -> &'static str {
        ["목", "화", "토", "금", "수"][self as usize]
    }
}

/// Branch assigned to each lunar-month index (0 = 인월 through 11 = 축월).
pub const MONTH_BRANCHES: [Branch; 12] = [
    Branch::In,
    Branch::Myo,
    Branch::Jin,
    Branch::Sa,
    Branch::O,
    Branch::Mi,
    Branch::Sin,
    Branch::Yu,
    Branch::Sul,
    Branch::Hae,
    Branch::Ja,
    Branch::Chuk,
];

/// One pillar of the sexagenary cycle, identified by its combined index
/// 0..60 (0 = 갑자, 59 = 계해).
///
/// The stem and branch are read off the combined index, so only the 60
/// historically valid pairings are representable.
///
/// # Example
///
/// ```
/// use sajucal::Pillar;
///
/// let p = Pillar::from_index(0);
/// assert_eq!("갑자", p.to_string());
/// assert_eq!(p, Pillar::from_parts(p.stem(), p.branch()));
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Pillar {
    index: u8,
}

impl Pillar {
    /// Pillar for a combined sexagenary index (reduced mod 60).
    pub fn from_index(index: u8) -> Self {
        Self { index: index % 60 }
    }

    /// Pillar for a (stem, branch) pair.
    ///
    /// Solves `index ≡ stem (mod 10)`, `index ≡ branch (mod 12)`. The pair
    /// must have matching parity; every pairing produced by the pillar
    /// formulas does.
    pub fn from_parts(stem: Stem, branch: Branch) -> Self {
        debug_assert_eq!(
            stem.index() % 2,
            branch.index() % 2,
            "{}{} is not a sexagenary pairing",
            stem.hangul(),
            branch.hangul(),
        );
        let index = (6 * stem.index() as i32 - 5 * branch.index() as i32).rem_euclid(60);
        Self { index: index as u8 }
    }

    pub fn index(self) -> u8 {
        self.index
    }

    pub fn stem(self) -> Stem {
        Stem::from_index(self.index % 10)
    }

    pub fn branch(self) -> Branch {
        Branch::from_index(self.index % 12)
    }

    pub fn element(self) -> Element {
        self.stem().element()
    }
}

impl std::fmt::Display for Pillar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.stem().hangul(), self.branch().hangul())
    }
}

/// The year, month, day and hour pillars of one birth instant.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FourPillars {
    pub year: Pillar,
    pub month: Pillar,
    pub day: Pillar,
    pub hour: Pillar,
}

impl FourPillars {
    /// Count of each element across the four pillars, indexed as
    /// [`Element::ALL`]. The counts sum to 4.
    pub fn element_balance(&self) -> [u8; 5] {
        let mut balance = [0u8; 5];
        for pillar in [self.year, self.month, self.day, self.hour] {
            balance[pillar.element() as usize] += 1;
        }
        balance
    }
}

/// First year of the reference sexagenary cycle (갑자년).
const CYCLE_EPOCH_YEAR: i32 = 1984;

const MS_PER_DAY: i64 = 86_400_000;

/// Midnight KST of the reference 갑자일, 1984-02-02.
fn day_anchor() -> Instant {
    Instant::from_kst(1984, 2, 2, 0, 0)
}

/// Derives all four pillars for a birth instant.
pub fn four_pillars(table: &TermTable, birth: Instant) -> FourPillars {
    let year = year_pillar(table, birth);
    let month = month_pillar(table, birth, year.stem());
    let day = day_pillar(birth);
    let hour = hour_pillar(birth, day.stem());
    FourPillars { year, month, day, hour }
}

/// The solar year of `t`: its civil KST year, or the year before when `t`
/// precedes that year's 입춘. An instant exactly on the 입춘 instant
/// belongs to the new year.
pub fn solar_year(table: &TermTable, t: Instant) -> i32 {
    let civil = t.kst().year;
    let ipchun = table.terms_for_year(civil)[IPCHUN];
    if t < ipchun.instant { civil - 1 } else { civil }
}

/// Year pillar: the solar year's position in the cycle anchored at 1984.
pub fn year_pillar(table: &TermTable, t: Instant) -> Pillar {
    let offset = (solar_year(table, t) - CYCLE_EPOCH_YEAR).rem_euclid(60);
    Pillar::from_index(offset as u8)
}

/// The term governing `t`: the latest month boundary at or before it,
/// chosen among the civil year's twelve terms and the previous year's 대설.
/// Falls back to the earliest boundary for instants before all of them.
pub fn active_term(table: &TermTable, t: Instant) -> SolarTermInstant {
    let year = t.kst().year;
    let mut boundaries = Vec::with_capacity(13);
    boundaries.push(table.terms_for_year(year - 1)[DAESEOL]);
    boundaries.extend(table.terms_for_year(year));
    boundaries.sort_by_key(|term| term.instant);

    match boundaries.partition_point(|term| term.instant <= t) {
        0 => boundaries[0],
        at => boundaries[at - 1],
    }
}

/// Month pillar: branch fixed by the governing term's month index, stem
/// keyed off the year stem.
pub fn month_pillar(table: &TermTable, t: Instant, year_stem: Stem) -> Pillar {
    let month_index = active_term(table, t).def.month_index;
    let stem = Stem::from_index(year_stem.index() * 2 + month_index as u8);
    Pillar::from_parts(stem, MONTH_BRANCHES[month_index])
}

/// Day pillar: whole days since the 1984-02-02 anchor, reduced mod 60.
pub fn day_pillar(t: Instant) -> Pillar {
    let days = (t.kst_midnight() - day_anchor()) / MS_PER_DAY;
    Pillar::from_index(days.rem_euclid(60) as u8)
}

/// Hour pillar: two-hour branch windows, offset so 23:00 opens the 자 window
/// of the next day pairing; stem keyed off the day stem.
pub fn hour_pillar(t: Instant, day_stem: Stem) -> Pillar {
    let branch = Branch::from_index((((t.kst().hour + 1) % 24) / 2) as u8);
    let stem = Stem::from_index(day_stem.index() * 2 + branch.index());
    Pillar::from_parts(stem, branch)
}
