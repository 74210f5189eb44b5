//! Damage reports broadcast by the notifier.

use serde::{Deserialize, Serialize};

use hive_core::{DamageSeverity, HiveStatus};

/// Statistics derived when the notifier consumes a damage event.
///
/// Health and alive counts come from the store at consumption time, not at
/// the moment the damage was dealt, so they may already include later turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageReport {
    pub damage: u32,
    pub severity: DamageSeverity,
    pub player_health: u32,
    pub player_max_health: u32,
    pub health_percent: f64,
    pub alive_hostiles: usize,
    pub turn: u64,
}

impl DamageReport {
    pub fn from_status(damage: u32, status: &HiveStatus) -> Self {
        let health_percent = if status.player_max_health == 0 {
            0.0
        } else {
            f64::from(status.player_health) / f64::from(status.player_max_health) * 100.0
        };

        Self {
            damage,
            severity: DamageSeverity::from_damage(damage),
            player_health: status.player_health,
            player_max_health: status.player_max_health,
            health_percent,
            alive_hostiles: status.alive_total,
            turn: status.turn,
        }
    }
}
