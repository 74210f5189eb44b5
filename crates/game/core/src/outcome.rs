//! Value types describing what a turn did.
//!
//! None of these are errors: an empty hive, a miss, or a death are all
//! ordinary results that callers match on.

use std::time::Duration;

use crate::category::Category;
use crate::entity::EntityRef;

// ============================================================================
// Player side
// ============================================================================

/// Actions the player can issue to the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PlayerVerb {
    Hit,
}

/// Result of one player action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerActionOutcome {
    /// No hostile was alive; the turn counter did not advance.
    NoTargets,
    /// The attack roll missed. `turn` is the counter after the increment.
    Missed { turn: u64 },
    /// A hostile absorbed the hit.
    Hit {
        turn: u64,
        target: EntityRef,
        remaining_health: u32,
        killed: bool,
    },
    /// The leader died and took every other hostile with it.
    HiveCollapsed {
        turn: u64,
        leader: EntityRef,
        /// Hostiles zeroed by the collapse, not counting the leader.
        eliminated: usize,
    },
}

impl PlayerActionOutcome {
    /// True when the action consumed a turn.
    pub fn was_attempt(&self) -> bool {
        !matches!(self, PlayerActionOutcome::NoTargets)
    }
}

// ============================================================================
// Hostile side
// ============================================================================

/// One hostile's decision for the current turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecisionRecord {
    pub entity: EntityRef,
    pub will_hit: bool,
    pub latency: Duration,
    /// The worker did not answer within the decision timeout and was scored as a miss.
    pub timed_out: bool,
}

/// Result of one hostile turn. At most one attack lands per turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HostileTurnOutcome {
    /// The game was already over: no hostile alive or the player dead.
    Idle,
    /// The selected attacker landed its attack.
    Stung {
        attacker: EntityRef,
        damage: u32,
        player_health: u32,
        player_died: bool,
        /// How many workers independently decided to hit.
        hits: usize,
        decisions: usize,
    },
    /// Every worker missed; `attacker` is the one reported.
    Missed { attacker: EntityRef, decisions: usize },
}

impl HostileTurnOutcome {
    pub fn damage_dealt(&self) -> u32 {
        match self {
            HostileTurnOutcome::Stung { damage, .. } => *damage,
            _ => 0,
        }
    }
}

// ============================================================================
// Reporting
// ============================================================================

/// Coarse band of a damage amount used by reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum DamageSeverity {
    Low,
    Medium,
    High,
}

impl DamageSeverity {
    pub const HIGH_THRESHOLD: u32 = 10;
    pub const MEDIUM_THRESHOLD: u32 = 5;

    pub const fn from_damage(damage: u32) -> Self {
        if damage >= Self::HIGH_THRESHOLD {
            Self::High
        } else if damage >= Self::MEDIUM_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Point-in-time view of the encounter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HiveStatus {
    pub player_health: u32,
    pub player_max_health: u32,
    /// Alive hostiles per category, in rank order.
    pub alive_by_category: Vec<(Category, usize)>,
    pub alive_total: usize,
    pub hive_size: usize,
    pub turn: u64,
}

impl HiveStatus {
    pub fn alive(&self, category: Category) -> usize {
        self.alive_by_category
            .iter()
            .find(|(candidate, _)| *candidate == category)
            .map_or(0, |(_, count)| *count)
    }

    pub fn outcome(&self) -> GameOutcome {
        if self.player_health == 0 {
            GameOutcome::PlayerDefeated
        } else if self.alive_total == 0 {
            GameOutcome::HiveDestroyed
        } else {
            GameOutcome::InProgress
        }
    }
}

/// How the session stands. Player death takes precedence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum GameOutcome {
    InProgress,
    PlayerDefeated,
    HiveDestroyed,
}

impl GameOutcome {
    pub fn is_over(&self) -> bool {
        !matches!(self, GameOutcome::InProgress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn severity_bands() {
        assert_eq!(DamageSeverity::from_damage(15), DamageSeverity::High);
        assert_eq!(DamageSeverity::from_damage(10), DamageSeverity::High);
        assert_eq!(DamageSeverity::from_damage(7), DamageSeverity::Medium);
        assert_eq!(DamageSeverity::from_damage(2), DamageSeverity::Low);
        assert_eq!(DamageSeverity::from_damage(0), DamageSeverity::Low);
    }

    #[test]
    fn verb_parses_case_insensitively() {
        assert_eq!(PlayerVerb::from_str("HIT").unwrap(), PlayerVerb::Hit);
        assert!(PlayerVerb::from_str("auto").is_err());
    }

    #[test]
    fn player_death_takes_precedence() {
        let status = HiveStatus {
            player_health: 0,
            player_max_health: 100,
            alive_by_category: vec![(Category::Leader, 0)],
            alive_total: 0,
            hive_size: 1,
            turn: 4,
        };
        assert_eq!(status.outcome(), GameOutcome::PlayerDefeated);
        assert!(status.outcome().is_over());
        assert_eq!(status.alive(Category::Grunt), 0);
    }

    #[test]
    fn empty_hive_attempt_is_not_counted() {
        assert!(!PlayerActionOutcome::NoTargets.was_attempt());
        assert!(PlayerActionOutcome::Missed { turn: 1 }.was_attempt());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn status_serializes_for_observers() {
        let status = HiveStatus {
            player_health: 90,
            player_max_health: 100,
            alive_by_category: vec![(Category::Leader, 1)],
            alive_total: 1,
            hive_size: 1,
            turn: 2,
        };
        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains("\"player_health\":90"));
        assert!(json.contains("Leader"));
    }
}
