//! Hostile categories and the static stats table.
//!
//! Every per-category number (starting health, damage dealt, damage absorbed,
//! decision latency) is read from a single immutable table so the "damage
//! dealt" and "damage received" figures can never drift apart.

use std::time::Duration;

// ============================================================================
// Category
// ============================================================================

/// Closed classification of a hostile actor.
///
/// Ordering follows rank: the leader sorts first.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Category {
    /// Killing the leader collapses the whole hive.
    Leader,
    Lieutenant,
    Grunt,
}

impl Category {
    /// All categories in rank order.
    pub const ALL: [Category; 3] = [Category::Leader, Category::Lieutenant, Category::Grunt];

    /// Looks up the immutable stats for this category.
    pub const fn stats(self) -> &'static CategoryStats {
        &STATS_TABLE[self as usize]
    }

    /// Returns true for the category whose death triggers the hive collapse.
    pub const fn is_leader(self) -> bool {
        matches!(self, Category::Leader)
    }
}

// ============================================================================
// Stats Table
// ============================================================================

/// Fixed numbers for one category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CategoryStats {
    /// Health every entity of this category starts with.
    pub starting_health: u32,
    /// Damage dealt to the player when an attack of this category lands.
    pub damage_inflicted: u32,
    /// Damage absorbed by an entity of this category per player hit.
    pub damage_received: u32,
    /// Lower bound of the synthetic decision latency.
    pub min_decision_latency: Duration,
    /// Upper bound of the synthetic decision latency.
    pub max_decision_latency: Duration,
}

impl CategoryStats {
    /// Number of player hits needed to bring a fresh entity to zero.
    pub const fn hits_to_kill(&self) -> u32 {
        self.starting_health.div_ceil(self.damage_received)
    }

    /// Interpolates a latency inside the bounds from a unit sample in `[0, 1)`.
    pub fn latency_at(&self, sample: f64) -> Duration {
        let span = self
            .max_decision_latency
            .saturating_sub(self.min_decision_latency);
        let sample = if sample.is_finite() {
            sample.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.min_decision_latency + span.mul_f64(sample)
    }
}

/// Indexed by `Category as usize`.
const STATS_TABLE: [CategoryStats; 3] = [
    // Leader
    CategoryStats {
        starting_health: 100,
        damage_inflicted: 10,
        damage_received: 10,
        min_decision_latency: Duration::from_millis(50),
        max_decision_latency: Duration::from_millis(150),
    },
    // Lieutenant
    CategoryStats {
        starting_health: 75,
        damage_inflicted: 5,
        damage_received: 25,
        min_decision_latency: Duration::from_millis(20),
        max_decision_latency: Duration::from_millis(80),
    },
    // Grunt
    CategoryStats {
        starting_health: 60,
        damage_inflicted: 1,
        damage_received: 30,
        min_decision_latency: Duration::from_millis(10),
        max_decision_latency: Duration::from_millis(50),
    },
];
