//! Korean four-pillar (사주) calendar calculation backed by astronomical
//! solar terms.
//!
//! The crate computes the twelve month-opening solar terms (절기) of a
//! calendar year by solving for the instants at which the sun's apparent
//! ecliptic longitude crosses each term's target angle, and maps birth
//! instants onto the sexagenary cycle: year, month, day and hour pillars.
//! All civil interpretation happens in a fixed +9:00 (KST) frame; no
//! timezone database is involved.
//!
//! # Examples
//!
//! Deriving the four pillars of a birth instant:
//!
//! ```
//! use sajucal::{four_pillars, Instant, NullStore, TermTable};
//!
//! let table = TermTable::new(Box::new(NullStore));
//! let birth = Instant::from_kst(1990, 5, 15, 8, 30);
//! let pillars = four_pillars(&table, birth);
//!
//! assert_eq!("경오", pillars.year.to_string());
//! assert_eq!("무인", pillars.day.to_string());
//! ```
//!
//! Looking up a solar term:
//!
//! ```
//! use sajucal::{NullStore, TermTable};
//!
//! let table = TermTable::new(Box::new(NullStore));
//! let ipchun = table.terms_for_year(2024)[sajucal::solar::IPCHUN];
//! let c = ipchun.instant.kst();
//! assert_eq!((2024, 2, 4), (c.year, c.month, c.day));
//! ```
//!
//! Computed years are mirrored through a pluggable [`TermStore`]; pass a
//! [`FileStore`] to keep term instants across runs, or [`NullStore`] to
//! recompute them once per process.
//!
//! The term table uses interior mutability and is single-threaded by
//! construction; hosts sharing one across threads wrap it themselves.
//! Recomputing a year redundantly is harmless; the solver is
//! deterministic and side-effect free.

pub mod instant;
pub mod pillars;
pub mod solar;

pub use instant::{CivilDateTime, Instant, KST_OFFSET_MS};
pub use pillars::{
    four_pillars, Branch, Element, FourPillars, Pillar, Stem, MONTH_BRANCHES,
};
pub use solar::store::{FileStore, MemoryStore, NullStore, StoreError, TermStore};
pub use solar::{SolarTermDef, SolarTermInstant, TermTable, TERM_DEFS};
