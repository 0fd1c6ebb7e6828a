//! Weighted priority resolution.
//!
//! Rules insert `(weight, code)` pairs into a [`PriorityTable`]; the code at
//! the largest weight wins. An insert at an existing weight replaces the
//! earlier code, so rule order decides ties.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::profiles::FootProfile;
use crate::way::Way;

/// Discrete desirability rank. Stored in the record as `value / 10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityCode {
    Exclude,
    ReachDestination,
    VeryBad,
    Bad,
    AvoidMore,
    Avoid,
    SlightAvoid,
    Unchanged,
    SlightPrefer,
    Prefer,
    VeryNice,
    Best,
}

impl PriorityCode {
    pub const ALL: [PriorityCode; 12] = [
        PriorityCode::Exclude,
        PriorityCode::ReachDestination,
        PriorityCode::VeryBad,
        PriorityCode::Bad,
        PriorityCode::AvoidMore,
        PriorityCode::Avoid,
        PriorityCode::SlightAvoid,
        PriorityCode::Unchanged,
        PriorityCode::SlightPrefer,
        PriorityCode::Prefer,
        PriorityCode::VeryNice,
        PriorityCode::Best,
    ];

    pub fn value(self) -> u32 {
        match self {
            PriorityCode::Exclude => 0,
            PriorityCode::ReachDestination => 1,
            PriorityCode::VeryBad => 3,
            PriorityCode::Bad => 5,
            PriorityCode::AvoidMore => 6,
            PriorityCode::Avoid => 8,
            PriorityCode::SlightAvoid => 9,
            PriorityCode::Unchanged => 10,
            PriorityCode::SlightPrefer => 11,
            PriorityCode::Prefer => 12,
            PriorityCode::VeryNice => 13,
            PriorityCode::Best => 15,
        }
    }

    /// Multiplier a weighting applies; 1.0 for [`PriorityCode::Unchanged`].
    pub fn factor(self) -> f64 {
        self.value() as f64 / 10.0
    }

    /// Inverse of [`PriorityCode::factor`], tolerant of quantization noise.
    pub fn from_factor(factor: f64) -> Option<Self> {
        let value = (factor * 10.0).round();
        Self::ALL.into_iter().find(|c| c.value() as f64 == value)
    }
}

/// Rule weight. Totally ordered so it can key a map.
#[derive(Debug, Clone, Copy)]
pub struct Weight(pub f64);

impl PartialEq for Weight {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Weight {}

impl PartialOrd for Weight {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Weight {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Weight of the seed entry when there is no route bonus.
pub const SEED_WEIGHT: f64 = 0.0;
/// Weight of the seed entry carrying a route bonus.
pub const BONUS_WEIGHT: f64 = 110.0;

/// Ordered `weight -> code` map built per way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorityTable {
    entries: BTreeMap<Weight, PriorityCode>,
}

impl PriorityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table holding only the seed entry: the route bonus at
    /// [`BONUS_WEIGHT`], or `Unchanged` at [`SEED_WEIGHT`].
    pub fn seeded(bonus: Option<PriorityCode>) -> Self {
        let mut table = Self::new();
        match bonus {
            Some(code) => table.insert(BONUS_WEIGHT, code),
            None => table.insert(SEED_WEIGHT, PriorityCode::Unchanged),
        }
        table
    }

    /// Replaces any code already stored at `weight`.
    pub fn insert(&mut self, weight: f64, code: PriorityCode) {
        self.entries.insert(Weight(weight), code);
    }

    pub fn get(&self, weight: f64) -> Option<PriorityCode> {
        self.entries.get(&Weight(weight)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Code at the largest weight, `Unchanged` for an empty table.
    pub fn highest(&self) -> PriorityCode {
        self.entries
            .last_key_value()
            .map(|(_, code)| *code)
            .unwrap_or(PriorityCode::Unchanged)
    }
}

/// Profile-specific rule set run after seeding.
pub type CollectFn = fn(&Way, &FootProfile, &mut PriorityTable);

/// Seed with `bonus`, run `profile`'s rules, return the winning code.
pub fn resolve_priority(way: &Way, profile: &FootProfile, bonus: Option<PriorityCode>) -> PriorityCode {
    let mut table = PriorityTable::seeded(bonus);
    (profile.collect)(way, profile, &mut table);
    table.highest()
}
