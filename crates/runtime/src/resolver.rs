//! Turn resolution for both sides of the encounter.
//!
//! A player action resolves synchronously against the store. A hostile turn
//! fans out one [`DecisionWorker`] per living hostile, waits for every
//! decision, and then lets exactly one attack land: many roll, one lands.
//! Damage is never summed across hits.

use std::time::Duration;

use tokio::task::JoinSet;
use tracing::debug;

use hive_core::{
    DecisionRecord, EntityRef, HostileTurnOutcome, PlayerActionOutcome, PlayerVerb, RandomSource,
};

use crate::api::{Result, RuntimeError};
use crate::store::CombatStore;
use crate::workers::{DamageSender, DecisionWorker};

/// Probabilities and limits applied by the resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverConfig {
    pub player_miss_chance: f64,
    pub hostile_miss_chance: f64,
    /// Upper bound on a single decision; `None` waits indefinitely.
    pub decision_timeout: Option<Duration>,
}

/// Serializing resolver. Taking `&mut self` keeps turns from interleaving.
pub struct TurnResolver {
    store: CombatStore,
    damage: DamageSender,
    rng: Box<dyn RandomSource>,
    config: ResolverConfig,
}

impl TurnResolver {
    pub fn new(
        store: CombatStore,
        damage: DamageSender,
        rng: Box<dyn RandomSource>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            store,
            damage,
            rng,
            config,
        }
    }

    pub fn store(&self) -> &CombatStore {
        &self.store
    }

    // ========================================================================
    // Player side
    // ========================================================================

    pub fn resolve_player_action(&mut self, verb: PlayerVerb) -> PlayerActionOutcome {
        match verb {
            PlayerVerb::Hit => self.player_attack(),
        }
    }

    fn player_attack(&mut self) -> PlayerActionOutcome {
        let alive = self.store.snapshot_alive();
        if alive.is_empty() {
            debug!("player attacked an empty hive");
            return PlayerActionOutcome::NoTargets;
        }

        let turn = self.store.increment_turn();
        if self.rng.roll(self.config.player_miss_chance) {
            debug!(turn, "player missed");
            return PlayerActionOutcome::Missed { turn };
        }

        let target = alive[self.rng.next_index(alive.len())];
        // Only this resolver mutates the hive, so the target is still registered.
        let Some(strike) = self.store.strike(target) else {
            return PlayerActionOutcome::Missed { turn };
        };

        debug!(
            turn,
            target = target.id.0,
            category = %target.category,
            remaining = strike.damage.remaining_health,
            "player hit"
        );

        match strike.collapsed {
            Some(eliminated) => PlayerActionOutcome::HiveCollapsed {
                turn,
                leader: target,
                eliminated,
            },
            None => PlayerActionOutcome::Hit {
                turn,
                target,
                remaining_health: strike.damage.remaining_health,
                killed: strike.damage.killed,
            },
        }
    }

    // ========================================================================
    // Hostile side
    // ========================================================================

    /// Resolves one hostile turn.
    ///
    /// Once the game is over the turn is [`HostileTurnOutcome::Idle`] and no
    /// worker is spawned.
    ///
    /// Dropping the returned future before it completes aborts the in-flight
    /// workers; the store is only touched after every decision is in, so an
    /// abandoned turn leaves no trace.
    pub async fn resolve_hostile_turn(&mut self) -> Result<HostileTurnOutcome> {
        let alive = self.store.snapshot_alive();
        if alive.is_empty() || self.store.is_game_over() {
            return Ok(HostileTurnOutcome::Idle);
        }

        let decisions = self.collect_decisions(&alive).await?;
        let total = decisions.len();
        let (hits, misses): (Vec<_>, Vec<_>) =
            decisions.into_iter().partition(|record| record.will_hit);

        if hits.is_empty() {
            let reported = misses[self.rng.next_index(misses.len())];
            debug!(attacker = reported.entity.id.0, total, "every hostile missed");
            return Ok(HostileTurnOutcome::Missed {
                attacker: reported.entity,
                decisions: total,
            });
        }

        let attacker = hits[self.rng.next_index(hits.len())].entity;
        let damage = attacker.damage_inflicted();
        let applied = self.store.apply_damage_to_player(damage);

        debug!(
            attacker = attacker.id.0,
            category = %attacker.category,
            damage,
            hits = hits.len(),
            total,
            "hostile attack landed"
        );

        // Mutation happens-before the enqueue attempt; a full queue drops the event.
        self.damage.try_notify(damage);

        Ok(HostileTurnOutcome::Stung {
            attacker,
            damage,
            player_health: applied.remaining_health,
            player_died: applied.died,
            hits: hits.len(),
            decisions: total,
        })
    }

    /// Fan-out one worker per entity, fan-in every record.
    ///
    /// Records are returned in entity order so a seeded session picks the
    /// same attacker regardless of completion order.
    async fn collect_decisions(&mut self, alive: &[EntityRef]) -> Result<Vec<DecisionRecord>> {
        let mut workers = JoinSet::new();
        for &entity in alive {
            let worker =
                DecisionWorker::new(entity, self.config.hostile_miss_chance, self.rng.fork());
            workers.spawn(worker.run(self.config.decision_timeout));
        }

        let mut decisions = Vec::with_capacity(alive.len());
        while let Some(joined) = workers.join_next().await {
            decisions.push(joined.map_err(RuntimeError::WorkerJoin)?);
        }

        decisions.sort_by_key(|record| record.entity);
        Ok(decisions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workers::{DamageReceiver, damage_queue};
    use hive_core::{Category, HiveComposition, SequenceRng};

    const ALWAYS_HIT: f64 = 0.99;
    const ALWAYS_MISS: f64 = 0.0;

    fn setup(
        composition: HiveComposition,
        player_health: u32,
        rng: SequenceRng,
    ) -> (TurnResolver, DamageReceiver) {
        let store = CombatStore::new(player_health, &composition);
        let (sender, receiver) = damage_queue(10);
        let config = ResolverConfig {
            player_miss_chance: 0.15,
            hostile_miss_chance: 0.20,
            decision_timeout: Some(Duration::from_secs(2)),
        };
        (
            TurnResolver::new(store, sender, Box::new(rng), config),
            receiver,
        )
    }

    #[test]
    fn empty_hive_attack_does_not_consume_a_turn() {
        let (mut resolver, _rx) =
            setup(HiveComposition::new(0, 0, 0), 100, SequenceRng::default());

        assert_eq!(
            resolver.resolve_player_action(PlayerVerb::Hit),
            PlayerActionOutcome::NoTargets
        );
        assert_eq!(resolver.store().turn(), 0);
    }

    #[test]
    fn miss_consumes_a_turn_without_damage() {
        let (mut resolver, _rx) =
            setup(HiveComposition::new(1, 0, 0), 100, SequenceRng::floats([ALWAYS_MISS]));

        let outcome = resolver.resolve_player_action(PlayerVerb::Hit);

        assert_eq!(outcome, PlayerActionOutcome::Missed { turn: 1 });
        assert_eq!(resolver.store().alive_count(), 1);
        let leader = resolver.store().snapshot_alive()[0];
        assert_eq!(resolver.store().entity_health(leader), Some(100));
    }

    #[test]
    fn hit_damages_the_selected_target() {
        let (mut resolver, _rx) =
            setup(HiveComposition::new(0, 1, 0), 100, SequenceRng::floats([ALWAYS_HIT]));

        let outcome = resolver.resolve_player_action(PlayerVerb::Hit);

        match outcome {
            PlayerActionOutcome::Hit {
                turn,
                target,
                remaining_health,
                killed,
            } => {
                assert_eq!(turn, 1);
                assert_eq!(target.category, Category::Lieutenant);
                assert_eq!(remaining_health, 50);
                assert!(!killed);
            }
            other => panic!("expected a hit, got {other:?}"),
        }
    }

    #[test]
    fn leader_kill_reports_collapse() {
        let rng = SequenceRng::new([ALWAYS_HIT], [0]);
        let (mut resolver, _rx) = setup(HiveComposition::new(1, 5, 25), 100, rng);

        let mut last = PlayerActionOutcome::NoTargets;
        for _ in 0..10 {
            last = resolver.resolve_player_action(PlayerVerb::Hit);
        }

        assert!(matches!(
            last,
            PlayerActionOutcome::HiveCollapsed { turn: 10, eliminated: 30, .. }
        ));
        assert_eq!(resolver.store().alive_count(), 0);
        assert_eq!(
            resolver.resolve_player_action(PlayerVerb::Hit),
            PlayerActionOutcome::NoTargets
        );
        assert_eq!(resolver.store().turn(), 10);
    }

    #[tokio::test]
    async fn idle_when_no_hostiles_remain() {
        let (mut resolver, _rx) =
            setup(HiveComposition::new(0, 0, 0), 100, SequenceRng::default());

        let outcome = resolver.resolve_hostile_turn().await.unwrap();

        assert_eq!(outcome, HostileTurnOutcome::Idle);
        assert_eq!(resolver.store().player_health(), 100);
    }

    #[tokio::test]
    async fn only_one_attack_lands_when_everyone_hits() {
        let (mut resolver, mut rx) =
            setup(HiveComposition::new(0, 0, 10), 100, SequenceRng::floats([ALWAYS_HIT]));

        let outcome = resolver.resolve_hostile_turn().await.unwrap();

        match outcome {
            HostileTurnOutcome::Stung {
                damage,
                player_health,
                hits,
                decisions,
                ..
            } => {
                assert_eq!(damage, 1);
                assert_eq!(player_health, 99);
                assert_eq!(hits, 10);
                assert_eq!(decisions, 10);
            }
            other => panic!("expected a sting, got {other:?}"),
        }
        assert_eq!(resolver.store().player_health(), 99);
        assert_eq!(rx.try_recv().map(|event| event.damage), Some(1));
    }

    #[tokio::test]
    async fn all_misses_leave_the_player_untouched() {
        let (mut resolver, mut rx) =
            setup(HiveComposition::new(1, 2, 3), 100, SequenceRng::floats([ALWAYS_MISS]));

        let outcome = resolver.resolve_hostile_turn().await.unwrap();

        assert!(matches!(outcome, HostileTurnOutcome::Missed { decisions: 6, .. }));
        assert_eq!(resolver.store().player_health(), 100);
        assert!(rx.try_recv().is_none());
    }

    #[tokio::test]
    async fn lethal_sting_reports_player_death() {
        let (mut resolver, _rx) =
            setup(HiveComposition::new(0, 0, 1), 1, SequenceRng::floats([ALWAYS_HIT]));

        let outcome = resolver.resolve_hostile_turn().await.unwrap();

        assert!(matches!(
            outcome,
            HostileTurnOutcome::Stung { player_died: true, player_health: 0, .. }
        ));
        assert!(resolver.store().is_game_over());
        assert_eq!(resolver.store().turn(), 0, "hostile turns never advance the counter");
    }

    #[test]
    fn player_targets_the_drawn_living_hostile() {
        let rng = SequenceRng::new([ALWAYS_HIT], [4]);
        let (mut resolver, _rx) = setup(HiveComposition::new(1, 2, 3), 100, rng);
        let alive = resolver.store().snapshot_alive();

        let outcome = resolver.resolve_player_action(PlayerVerb::Hit);

        match outcome {
            PlayerActionOutcome::Hit {
                target,
                remaining_health,
                ..
            } => {
                assert_eq!(target, alive[4]);
                assert_eq!(target.category, Category::Grunt);
                assert_eq!(remaining_health, 30);
            }
            other => panic!("expected a hit, got {other:?}"),
        }
        assert_eq!(resolver.store().entity_health(alive[0]), Some(100));
        assert_eq!(resolver.store().entity_health(alive[4]), Some(30));
    }

    #[tokio::test]
    async fn drawn_hit_record_lands_in_entity_order() {
        let rng = SequenceRng::new([ALWAYS_HIT], [1]);
        let (mut resolver, mut rx) = setup(HiveComposition::new(1, 2, 0), 100, rng);
        let alive = resolver.store().snapshot_alive();

        let outcome = resolver.resolve_hostile_turn().await.unwrap();

        match outcome {
            HostileTurnOutcome::Stung {
                attacker,
                damage,
                player_health,
                hits,
                ..
            } => {
                assert_eq!(hits, 3);
                assert_eq!(attacker, alive[1]);
                assert_eq!(attacker.category, Category::Lieutenant);
                assert_eq!(damage, 5);
                assert_eq!(player_health, 95);
            }
            other => panic!("expected a sting, got {other:?}"),
        }
        assert_eq!(rx.try_recv().map(|event| event.damage), Some(5));
    }

    #[tokio::test]
    async fn hostile_turn_is_idle_once_the_player_is_dead() {
        let (mut resolver, mut rx) =
            setup(HiveComposition::new(0, 0, 2), 1, SequenceRng::floats([ALWAYS_HIT]));

        let first = resolver.resolve_hostile_turn().await.unwrap();
        assert!(matches!(first, HostileTurnOutcome::Stung { player_died: true, .. }));

        let second = resolver.resolve_hostile_turn().await.unwrap();

        assert_eq!(second, HostileTurnOutcome::Idle);
        assert_eq!(resolver.store().player_health(), 0);
        assert!(rx.try_recv().is_some());
        assert!(rx.try_recv().is_none(), "no damage event after the game ended");
    }
}
