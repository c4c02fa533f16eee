//! Solar terms (절기): fixed definitions, the crossing solver, and the
//! per-year table with its persistent cache.
//!
//! Only the twelve "major" terms (절, the month-opening half of the 24)
//! are modeled; the mid-month terms (중기) play no role in pillar
//! boundaries. Term instants are computed lazily per calendar year, kept
//! for the process lifetime, and mirrored into an injected [`TermStore`]
//! so later runs skip the solver.

pub mod position;
pub mod solver;
pub mod store;

use std::cell::RefCell;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::instant::Instant;
use self::store::TermStore;

/// A built-in solar-term definition.
///
/// `longitude` is the target apparent longitude of the sun, a multiple of
/// 30°. `month_index` is the lunar month (0 = 인월) the term opens.
/// `guess_month`/`guess_day` seed the solver's bracket search with the
/// term's usual civil date.
#[derive(Debug, PartialEq)]
pub struct SolarTermDef {
    pub key: &'static str,
    pub name: &'static str,
    pub longitude: f64,
    pub month_index: usize,
    pub guess_month: u32,
    pub guess_day: u32,
}

/// The twelve month-opening terms, in calendar order from 소한.
pub static TERM_DEFS: [SolarTermDef; 12] = [
    SolarTermDef { key: "sohan", name: "소한", longitude: 285.0, month_index: 11, guess_month: 1, guess_day: 5 },
    SolarTermDef { key: "ipchun", name: "입춘", longitude: 315.0, month_index: 0, guess_month: 2, guess_day: 4 },
    SolarTermDef { key: "gyeongchip", name: "경칩", longitude: 345.0, month_index: 1, guess_month: 3, guess_day: 5 },
    SolarTermDef { key: "cheongmyeong", name: "청명", longitude: 15.0, month_index: 2, guess_month: 4, guess_day: 4 },
    SolarTermDef { key: "iphwa", name: "입하", longitude: 45.0, month_index: 3, guess_month: 5, guess_day: 5 },
    SolarTermDef { key: "mangjong", name: "망종", longitude: 75.0, month_index: 4, guess_month: 6, guess_day: 5 },
    SolarTermDef { key: "soseo", name: "소서", longitude: 105.0, month_index: 5, guess_month: 7, guess_day: 7 },
    SolarTermDef { key: "ipchu", name: "입추", longitude: 135.0, month_index: 6, guess_month: 8, guess_day: 7 },
    SolarTermDef { key: "baengno", name: "백로", longitude: 165.0, month_index: 7, guess_month: 9, guess_day: 7 },
    SolarTermDef { key: "hanro", name: "한로", longitude: 195.0, month_index: 8, guess_month: 10, guess_day: 8 },
    SolarTermDef { key: "ipdong", name: "입동", longitude: 225.0, month_index: 9, guess_month: 11, guess_day: 7 },
    SolarTermDef { key: "daeseol", name: "대설", longitude: 255.0, month_index: 10, guess_month: 12, guess_day: 7 },
];

/// Index of 입춘 in [`TERM_DEFS`], the term that opens the solar year.
pub const IPCHUN: usize = 1;
/// Index of 대설 in [`TERM_DEFS`], the previous year's last month boundary.
pub const DAESEOL: usize = 11;

impl SolarTermDef {
    /// Looks a definition up by its key.
    pub fn by_key(key: &str) -> Option<&'static SolarTermDef> {
        TERM_DEFS.iter().find(|def| def.key == key)
    }
}

/// A term definition bound to its resolved instant for one calendar year.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SolarTermInstant {
    pub def: &'static SolarTermDef,
    pub instant: Instant,
}

impl SolarTermInstant {
    /// Whether the resolved civil KST month sits within ±1 of the
    /// definition's usual month, the plausibility check for a solved (or
    /// degraded) instant.
    pub fn matches_guess(&self) -> bool {
        let month = self.instant.kst().month as i64;
        (month - self.def.guess_month as i64).abs() <= 1
    }
}

/// The per-year table of term instants.
///
/// The table owns the process-lifetime cache and the injected store. The
/// store is consulted exactly once, at construction; afterwards every newly
/// computed year is written back whole. Years are only ever cached and
/// persisted as complete sets of twelve.
///
/// # Example
///
/// ```
/// use sajucal::{NullStore, TermTable};
///
/// let table = TermTable::new(Box::new(NullStore));
/// let terms = table.terms_for_year(2024);
/// let ipchun = terms[sajucal::solar::IPCHUN];
/// let c = ipchun.instant.kst();
/// assert_eq!((2024, 2), (c.year, c.month));
/// assert!((3..=5).contains(&c.day));
/// ```
pub struct TermTable {
    store: Box<dyn TermStore>,
    cache: RefCell<HashMap<i32, [SolarTermInstant; 12]>>,
}

impl TermTable {
    /// Builds a table over `store`, pre-populating the cache from whatever
    /// the store holds. Read failures and corrupt payloads degrade to an
    /// empty cache.
    pub fn new(store: Box<dyn TermStore>) -> Self {
        let cache = RefCell::new(hydrate(store.as_ref()));
        Self { store, cache }
    }

    /// The twelve term instants of `year`, ordered as [`TERM_DEFS`]
    /// (calendar order from 소한, not chronological within the cached
    /// payload; callers needing chronological order sort by instant).
    ///
    /// Computes and persists the year on first request; afterwards a pure
    /// cache read.
    pub fn terms_for_year(&self, year: i32) -> [SolarTermInstant; 12] {
        if let Some(terms) = self.cache.borrow().get(&year) {
            return *terms;
        }
        let computed = compute_year(year);
        self.cache.borrow_mut().insert(year, computed);
        self.persist();
        computed
    }

    /// Serializes the whole cache through the store; failures are logged
    /// and dropped.
    fn persist(&self) {
        let cache = self.cache.borrow();
        let mut years: Vec<i32> = cache.keys().copied().collect();
        years.sort_unstable();

        let mut payload = serde_json::Map::new();
        for year in years {
            let records: Vec<TermRecord> =
                cache[&year].iter().map(|term| TermRecord::from(*term)).collect();
            match serde_json::to_value(&records) {
                Ok(value) => {
                    payload.insert(year.to_string(), value);
                }
                Err(err) => warn!(%err, year, "failed to serialize term records"),
            }
        }

        if let Err(err) = self.store.save(&Value::Object(payload).to_string()) {
            warn!(%err, "failed to persist term cache");
        }
    }
}

fn compute_year(year: i32) -> [SolarTermInstant; 12] {
    std::array::from_fn(|i| {
        let def = &TERM_DEFS[i];
        SolarTermInstant { def, instant: solver::find_crossing(year, def) }
    })
}

/// One persisted term record. The payload is a JSON object keyed by decimal
/// year, each value an array of these.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TermRecord {
    key: String,
    name: String,
    longitude: f64,
    month_index: usize,
    guess_month: u32,
    guess_day: u32,
    time: f64,
}

impl From<SolarTermInstant> for TermRecord {
    fn from(term: SolarTermInstant) -> Self {
        Self {
            key: term.def.key.to_owned(),
            name: term.def.name.to_owned(),
            longitude: term.def.longitude,
            month_index: term.def.month_index,
            guess_month: term.def.guess_month,
            guess_day: term.def.guess_day,
            time: term.instant.unix_ms() as f64,
        }
    }
}

/// Decodes the persisted payload, tolerantly.
///
/// Malformed records are dropped one by one; a year value that is not an
/// array is skipped; a payload that fails to parse at all discards the
/// whole store. A year survives hydration only when all twelve definitions
/// resolved, so partial years are never observable; an incomplete year is
/// simply recomputed on demand.
fn hydrate(store: &dyn TermStore) -> HashMap<i32, [SolarTermInstant; 12]> {
    let mut cache = HashMap::new();
    let raw = match store.load() {
        Ok(Some(raw)) => raw,
        Ok(None) => return cache,
        Err(err) => {
            warn!(%err, "term store read failed, starting with an empty cache");
            return cache;
        }
    };
    let Ok(Value::Object(years)) = serde_json::from_str::<Value>(&raw) else {
        warn!("persisted term payload is not a JSON object, discarding");
        return cache;
    };

    for (year_key, entry) in years {
        let Ok(year) = year_key.parse::<i32>() else {
            debug!(key = %year_key, "skipping non-numeric year key");
            continue;
        };
        let Some(records) = entry.as_array() else {
            debug!(year, "skipping non-array year entry");
            continue;
        };

        let mut resolved: [Option<Instant>; 12] = [None; 12];
        for record in records {
            let Ok(record) = serde_json::from_value::<TermRecord>(record.clone()) else {
                debug!(year, "dropping malformed term record");
                continue;
            };
            if !record.time.is_finite() {
                debug!(year, key = %record.key, "dropping term record with non-finite time");
                continue;
            }
            if let Some(slot) = TERM_DEFS.iter().position(|def| def.key == record.key) {
                resolved[slot] = Some(Instant::from_unix_ms(record.time.round() as i64));
            }
        }

        if resolved.iter().all(Option::is_some) {
            cache.insert(
                year,
                std::array::from_fn(|i| SolarTermInstant {
                    def: &TERM_DEFS[i],
                    instant: resolved[i].unwrap(),
                }),
            );
        } else {
            debug!(year, "persisted year incomplete, will recompute on demand");
        }
    }
    debug!(years = cache.len(), "hydrated term cache");
    cache
}
