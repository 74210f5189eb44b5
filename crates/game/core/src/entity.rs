//! Combat entities: health pools for hostiles and the player.
//!
//! Aliveness is always derived from current health, never stored, so the two
//! cannot desynchronize. Health is clamped to `[0, max]`; hitting an entity
//! that is already at zero is a defined no-op.

use crate::category::Category;

// ============================================================================
// Identity
// ============================================================================

/// Stable identifier of a hostile within one hive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

/// Lightweight, copyable handle to a hostile.
///
/// Read operations hand these out instead of references into the hive, so a
/// caller never holds a borrow of the shared records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityRef {
    pub id: EntityId,
    pub category: Category,
}

impl EntityRef {
    /// Damage this hostile deals when its attack is the one that lands.
    pub fn damage_inflicted(&self) -> u32 {
        self.category.stats().damage_inflicted
    }
}

// ============================================================================
// Health
// ============================================================================

/// Clamped health pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Health {
    current: u32,
    max: u32,
}

/// Before/after view of a single damage application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HealthChange {
    pub previous: u32,
    pub current: u32,
}

impl HealthChange {
    /// True only for the application that brought health from positive to zero.
    pub fn became_depleted(&self) -> bool {
        self.previous > 0 && self.current == 0
    }

    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }
}

impl Health {
    /// Full pool of `max` points.
    pub const fn full(max: u32) -> Self {
        Self { current: max, max }
    }

    pub const fn current(&self) -> u32 {
        self.current
    }

    pub const fn max(&self) -> u32 {
        self.max
    }

    pub const fn is_depleted(&self) -> bool {
        self.current == 0
    }

    /// Subtracts `amount`, saturating at zero.
    pub fn apply_damage(&mut self, amount: u32) -> HealthChange {
        let previous = self.current;
        self.current = self.current.saturating_sub(amount);
        HealthChange {
            previous,
            current: self.current,
        }
    }

    /// Drops the pool straight to zero.
    pub fn deplete(&mut self) -> HealthChange {
        self.apply_damage(self.current)
    }

    /// Remaining health as a percentage of the maximum (0 when max is 0).
    pub fn percent(&self) -> f64 {
        if self.max == 0 {
            0.0
        } else {
            f64::from(self.current) / f64::from(self.max) * 100.0
        }
    }
}

// ============================================================================
// Combat Entity
// ============================================================================

/// Mutable record for one hostile.
///
/// Dead entities are never removed; they stay as zero-health records and are
/// filtered out of alive views.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatEntity {
    id: EntityId,
    category: Category,
    health: Health,
}

impl CombatEntity {
    /// Creates an entity at the category's starting health.
    pub fn new(id: EntityId, category: Category) -> Self {
        Self {
            id,
            category,
            health: Health::full(category.stats().starting_health),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn health(&self) -> Health {
        self.health
    }

    pub fn entity_ref(&self) -> EntityRef {
        EntityRef {
            id: self.id,
            category: self.category,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.health.is_depleted()
    }

    /// Applies one player hit worth the category's `damage_received`.
    pub fn take_hit(&mut self) -> HealthChange {
        self.health
            .apply_damage(self.category.stats().damage_received)
    }

    /// Zeroes health regardless of remaining points.
    pub fn eliminate(&mut self) -> HealthChange {
        self.health.deplete()
    }
}

// ============================================================================
// Player
// ============================================================================

/// The single player-controlled entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Player {
    health: Health,
}

impl Player {
    pub fn new(max_health: u32) -> Self {
        Self {
            health: Health::full(max_health),
        }
    }

    pub fn health(&self) -> Health {
        self.health
    }

    pub fn is_alive(&self) -> bool {
        !self.health.is_depleted()
    }

    pub fn take_damage(&mut self, amount: u32) -> HealthChange {
        self.health.apply_damage(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_sequence_reaches_zero_after_ceil_hits() {
        for category in Category::ALL {
            let stats = category.stats();
            let mut entity = CombatEntity::new(EntityId(0), category);
            let k = stats.hits_to_kill();

            for _ in 0..k {
                entity.take_hit();
            }

            let expected = stats
                .starting_health
                .saturating_sub(k * stats.damage_received);
            assert_eq!(entity.health().current(), expected);
            assert_eq!(entity.is_alive(), expected > 0);
            assert!(!entity.is_alive(), "{category} should be dead after {k} hits");
        }
    }

    #[test]
    fn leader_survives_nine_hits_and_dies_on_tenth() {
        let mut leader = CombatEntity::new(EntityId(0), Category::Leader);

        for hit in 1..=9u32 {
            let change = leader.take_hit();
            assert_eq!(change.current, 100 - hit * 10);
            assert!(leader.is_alive(), "leader dead after hit {hit}");
            assert!(!change.became_depleted());
        }

        let last = leader.take_hit();
        assert_eq!(last.current, 0);
        assert!(last.became_depleted());
        assert!(!leader.is_alive());
    }

    #[test]
    fn over_damage_clamps_at_zero() {
        let mut grunt = CombatEntity::new(EntityId(3), Category::Grunt);
        grunt.take_hit();
        grunt.take_hit();
        let again = grunt.take_hit();

        assert_eq!(again.previous, 0);
        assert_eq!(again.current, 0);
        assert!(!again.became_depleted());
    }

    #[test]
    fn player_damage_clamps_and_reports_death() {
        let mut player = Player::new(5);

        let change = player.take_damage(3);
        assert_eq!(change.current, 2);
        assert!(player.is_alive());

        let change = player.take_damage(10);
        assert_eq!(change.current, 0);
        assert!(change.became_depleted());
        assert!(!player.is_alive());
        assert_eq!(player.health().max(), 5);
    }

    #[test]
    fn health_percent_of_full_pool_is_hundred() {
        let mut health = Health::full(80);
        assert_eq!(health.percent(), 100.0);
        health.apply_damage(20);
        assert_eq!(health.percent(), 75.0);
        assert_eq!(Health::full(0).percent(), 0.0);
    }
}
