//! Lock-guarded owner of the hive and player records.
//!
//! [`CombatStore`] is the single source of truth for an encounter. One
//! readers-writer lock guards everything: snapshots take the shared side,
//! mutations take the exclusive side, and every read hands back copies so no
//! caller ever holds a borrow into the records. The lock is acquired only
//! inside these methods and is never held across an await point.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use hive_core::{
    Category, EntityRef, GameConfig, GameOutcome, Hive, HiveComposition, HiveStatus, Player,
};

/// Result of hitting one hostile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntityDamage {
    pub remaining_health: u32,
    /// True only for the hit that brought the entity from alive to dead.
    pub killed: bool,
}

/// Result of damaging the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerDamage {
    pub remaining_health: u32,
    pub died: bool,
}

/// Result of a player strike, including any leader cascade.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Strike {
    pub damage: EntityDamage,
    /// Other hostiles zeroed because the target was a leader that just died.
    pub collapsed: Option<usize>,
}

/// Everything the lock protects.
#[derive(Debug)]
struct CombatState {
    hive: Hive,
    player: Player,
    turn: u64,
}

impl CombatState {
    fn is_game_over(&self) -> bool {
        !self.player.is_alive() || self.hive.alive_count() == 0
    }

    fn damage_entity(&mut self, entity: EntityRef) -> Option<EntityDamage> {
        let change = self.hive.hit(entity)?;
        Some(EntityDamage {
            remaining_health: change.current,
            killed: change.became_depleted(),
        })
    }

    fn status(&self) -> HiveStatus {
        HiveStatus {
            player_health: self.player.health().current(),
            player_max_health: self.player.health().max(),
            alive_by_category: Category::ALL
                .iter()
                .map(|&category| (category, self.hive.alive_count_by_category(category)))
                .collect(),
            alive_total: self.hive.alive_count(),
            hive_size: self.hive.len(),
            turn: self.turn,
        }
    }
}

/// Cloneable handle to the shared combat state.
#[derive(Clone, Debug)]
pub struct CombatStore {
    state: Arc<RwLock<CombatState>>,
}

impl CombatStore {
    /// Spawns the hive and player for a new session.
    pub fn new(player_health: u32, composition: &HiveComposition) -> Self {
        Self {
            state: Arc::new(RwLock::new(CombatState {
                hive: Hive::new(composition),
                player: Player::new(player_health),
                turn: 0,
            })),
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.player_health, &config.hive)
    }

    // ===== shared (read) side =====

    /// Handles to every living hostile. The player is never included.
    pub fn snapshot_alive(&self) -> Vec<EntityRef> {
        self.state.read().hive.alive()
    }

    pub fn snapshot_alive_by_category(&self, category: Category) -> Vec<EntityRef> {
        self.state.read().hive.alive_by_category(category)
    }

    pub fn alive_count(&self) -> usize {
        self.state.read().hive.alive_count()
    }

    pub fn alive_count_by_category(&self, category: Category) -> usize {
        self.state.read().hive.alive_count_by_category(category)
    }

    /// Current health of a hostile, dead or alive.
    pub fn entity_health(&self, entity: EntityRef) -> Option<u32> {
        self.state
            .read()
            .hive
            .get(entity)
            .map(|record| record.health().current())
    }

    pub fn player_health(&self) -> u32 {
        self.state.read().player.health().current()
    }

    pub fn turn(&self) -> u64 {
        self.state.read().turn
    }

    /// True iff the player is dead or no hostile is alive.
    pub fn is_game_over(&self) -> bool {
        self.state.read().is_game_over()
    }

    /// Consistent snapshot of every counter under one read guard.
    pub fn status(&self) -> HiveStatus {
        self.state.read().status()
    }

    pub fn outcome(&self) -> GameOutcome {
        self.status().outcome()
    }

    // ===== exclusive (write) side =====

    /// Applies one player hit to `entity`.
    ///
    /// Hitting a dead hostile is a no-op that reports zero health. Returns
    /// `None` for a handle that does not belong to this hive.
    pub fn apply_damage_to_entity(&self, entity: EntityRef) -> Option<EntityDamage> {
        self.state.write().damage_entity(entity)
    }

    /// Zeroes every hostile in one exclusive section. Returns how many died.
    pub fn eliminate_all_hostiles(&self) -> usize {
        let eliminated = self.state.write().hive.kill_all();
        info!(eliminated, "all hostiles eliminated");
        eliminated
    }

    /// Hits `entity` and, if it was a leader that just died, collapses the
    /// hive under the same write guard.
    ///
    /// Readers observe either the state before the strike or the fully
    /// collapsed hive, never a dead leader beside living hostiles.
    pub fn strike(&self, entity: EntityRef) -> Option<Strike> {
        let mut state = self.state.write();
        let damage = state.damage_entity(entity)?;

        let collapsed =
            (damage.killed && entity.category.is_leader()).then(|| state.hive.kill_all());
        drop(state);

        if let Some(eliminated) = collapsed {
            info!(leader = entity.id.0, eliminated, "leader killed, hive collapsed");
        }

        Some(Strike { damage, collapsed })
    }

    pub fn apply_damage_to_player(&self, amount: u32) -> PlayerDamage {
        let change = self.state.write().player.take_damage(amount);
        debug!(amount, remaining = change.current, "player damaged");
        PlayerDamage {
            remaining_health: change.current,
            died: change.became_depleted(),
        }
    }

    pub fn increment_turn(&self) -> u64 {
        let mut state = self.state.write();
        state.turn += 1;
        state.turn
    }

    /// Read-only handle sharing the same state.
    pub fn view(&self) -> CombatView {
        CombatView {
            store: self.clone(),
        }
    }
}

/// Read-only handle to the shared combat state.
///
/// Observers outside the resolver get this instead of a [`CombatStore`], so
/// only real turn resolution can mutate the hive, the player or the turn.
#[derive(Clone, Debug)]
pub struct CombatView {
    store: CombatStore,
}

impl CombatView {
    pub fn snapshot_alive(&self) -> Vec<EntityRef> {
        self.store.snapshot_alive()
    }

    pub fn snapshot_alive_by_category(&self, category: Category) -> Vec<EntityRef> {
        self.store.snapshot_alive_by_category(category)
    }

    pub fn alive_count(&self) -> usize {
        self.store.alive_count()
    }

    pub fn alive_count_by_category(&self, category: Category) -> usize {
        self.store.alive_count_by_category(category)
    }

    pub fn entity_health(&self, entity: EntityRef) -> Option<u32> {
        self.store.entity_health(entity)
    }

    pub fn player_health(&self) -> u32 {
        self.store.player_health()
    }

    pub fn turn(&self) -> u64 {
        self.store.turn()
    }

    pub fn is_game_over(&self) -> bool {
        self.store.is_game_over()
    }

    pub fn status(&self) -> HiveStatus {
        self.store.status()
    }

    pub fn outcome(&self) -> GameOutcome {
        self.store.outcome()
    }
}
