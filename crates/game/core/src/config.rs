//! Session configuration and validation.

use std::time::Duration;

use crate::category::Category;
use crate::error::ConfigError;

/// Number of hostiles of each category spawned at session start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HiveComposition {
    pub leaders: u32,
    pub lieutenants: u32,
    pub grunts: u32,
}

impl HiveComposition {
    pub const DEFAULT_LEADERS: u32 = 1;
    pub const DEFAULT_LIEUTENANTS: u32 = 5;
    pub const DEFAULT_GRUNTS: u32 = 25;

    pub const fn new(leaders: u32, lieutenants: u32, grunts: u32) -> Self {
        Self {
            leaders,
            lieutenants,
            grunts,
        }
    }

    pub const fn count(&self, category: Category) -> u32 {
        match category {
            Category::Leader => self.leaders,
            Category::Lieutenant => self.lieutenants,
            Category::Grunt => self.grunts,
        }
    }

    /// Total hostiles; saturates at `u32::MAX`.
    pub const fn total(&self) -> u32 {
        self.leaders
            .saturating_add(self.lieutenants)
            .saturating_add(self.grunts)
    }
}

impl Default for HiveComposition {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_LEADERS,
            Self::DEFAULT_LIEUTENANTS,
            Self::DEFAULT_GRUNTS,
        )
    }
}

/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Starting and maximum player health.
    pub player_health: u32,
    /// Probability in `[0, 1]` that a player attack misses.
    pub player_miss_chance: f64,
    /// Probability in `[0, 1]` that an individual hostile decides to miss.
    pub hostile_miss_chance: f64,
    /// Pacing between rounds in automatic play. Advisory only.
    pub auto_delay: Duration,
    pub hive: HiveComposition,
}

impl GameConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_PLAYER_HEALTH: u32 = 100;
    pub const DEFAULT_PLAYER_MISS_CHANCE: f64 = 0.15;
    pub const DEFAULT_HOSTILE_MISS_CHANCE: f64 = 0.20;
    pub const DEFAULT_AUTO_DELAY: Duration = Duration::from_millis(500);

    pub fn new() -> Self {
        Self {
            player_health: Self::DEFAULT_PLAYER_HEALTH,
            player_miss_chance: Self::DEFAULT_PLAYER_MISS_CHANCE,
            hostile_miss_chance: Self::DEFAULT_HOSTILE_MISS_CHANCE,
            auto_delay: Self::DEFAULT_AUTO_DELAY,
            hive: HiveComposition::default(),
        }
    }

    pub fn with_hive(mut self, hive: HiveComposition) -> Self {
        self.hive = hive;
        self
    }

    pub fn with_miss_chances(mut self, player: f64, hostile: f64) -> Self {
        self.player_miss_chance = player;
        self.hostile_miss_chance = hostile;
        self
    }

    /// Rejects configurations that cannot describe a playable session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.player_health == 0 {
            return Err(ConfigError::ZeroPlayerHealth);
        }
        check_probability("player miss chance", self.player_miss_chance)?;
        check_probability("hostile miss chance", self.hostile_miss_chance)?;
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn check_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange { field, value })
    }
}
