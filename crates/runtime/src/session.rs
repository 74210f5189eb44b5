//! Session facade and builder.
//!
//! The session owns the store, the resolver and the notifier task, and
//! exposes the operations an outer loop needs: query the hive, perform a
//! player action, perform a hostile turn, subscribe to damage reports, and
//! shut down.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tracing::{debug, info};

use hive_core::{
    Category, GameConfig, GameOutcome, HiveStatus, HostileTurnOutcome, PlayerActionOutcome,
    PlayerVerb, RandomSource, SeededRng,
};

use crate::api::{DamageReport, Result, RuntimeError};
use crate::resolver::{ResolverConfig, TurnResolver};
use crate::store::{CombatStore, CombatView};
use crate::workers::{DamageSender, Notifier, NotifierMetrics, damage_queue};

/// Runtime configuration shared across the session and its workers.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    /// Pending damage events held before new ones are dropped.
    pub notifier_capacity: usize,
    /// Reports buffered per subscriber before slow subscribers lag.
    pub report_buffer_size: usize,
    /// Upper bound on a single hostile decision; `None` disables the bound.
    pub decision_timeout: Option<Duration>,
    /// Seed for reproducible sessions; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl RuntimeConfig {
    pub const DEFAULT_NOTIFIER_CAPACITY: usize = 10;
    pub const DEFAULT_REPORT_BUFFER_SIZE: usize = 64;
    pub const DEFAULT_DECISION_TIMEOUT: Duration = Duration::from_secs(2);
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            notifier_capacity: Self::DEFAULT_NOTIFIER_CAPACITY,
            report_buffer_size: Self::DEFAULT_REPORT_BUFFER_SIZE,
            decision_timeout: Some(Self::DEFAULT_DECISION_TIMEOUT),
            seed: None,
        }
    }
}

/// One player-versus-hive encounter.
pub struct Session {
    resolver: TurnResolver,
    store: CombatStore,
    damage: DamageSender,
    report_tx: broadcast::Sender<DamageReport>,
    notifier: Notifier,
    auto_delay: Duration,
}

impl Session {
    /// Create a new session builder
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Read-only handle for observers running beside the session.
    pub fn view(&self) -> CombatView {
        self.store.view()
    }

    pub fn alive_count(&self) -> usize {
        self.store.alive_count()
    }

    pub fn alive_count_by_category(&self, category: Category) -> usize {
        self.store.alive_count_by_category(category)
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

    pub fn turn(&self) -> u64 {
        self.store.turn()
    }

    /// Resolves one player action, including any leader cascade.
    pub fn perform_player_action(&mut self, verb: PlayerVerb) -> PlayerActionOutcome {
        self.resolver.resolve_player_action(verb)
    }

    /// Resolves one hostile turn: fan-out, barrier, single landed attack.
    pub async fn perform_hostile_turn(&mut self) -> Result<HostileTurnOutcome> {
        self.resolver.resolve_hostile_turn().await
    }

    /// Subscribe to damage reports produced by the notifier.
    pub fn subscribe_reports(&self) -> broadcast::Receiver<DamageReport> {
        self.report_tx.subscribe()
    }

    pub fn notifier_metrics(&self) -> Arc<NotifierMetrics> {
        self.damage.metrics()
    }

    /// Alternates player action and hostile turn until the game ends or
    /// `stop` turns true.
    ///
    /// A stop request abandons the hostile turn in flight; no state is
    /// mutated before its barrier completes. A dropped sender counts as a
    /// stop request.
    pub async fn run_auto(&mut self, mut stop: watch::Receiver<bool>) -> Result<GameOutcome> {
        let delay = self.auto_delay;

        loop {
            if *stop.borrow() || self.is_game_over() {
                break;
            }

            let action = self.perform_player_action(PlayerVerb::Hit);
            debug!(?action, "auto player action");
            if self.is_game_over() {
                break;
            }

            tokio::select! {
                biased;
                _ = stop.wait_for(|stop| *stop) => break,
                turn = self.perform_hostile_turn() => {
                    let turn = turn?;
                    debug!(?turn, "auto hostile turn");
                }
            }

            if self.is_game_over() {
                break;
            }

            if !delay.is_zero() {
                tokio::select! {
                    biased;
                    _ = stop.wait_for(|stop| *stop) => break,
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }

        let outcome = self.outcome();
        info!(%outcome, turn = self.turn(), "auto play finished");
        Ok(outcome)
    }

    /// Shutdown the session gracefully, joining the notifier task.
    pub async fn shutdown(self) -> Result<()> {
        let metrics = self.damage.metrics().snapshot();
        self.notifier.shutdown().await?;
        info!(
            enqueued = metrics.enqueued,
            dropped = metrics.dropped,
            processed = metrics.processed,
            "session shut down"
        );
        Ok(())
    }
}

/// Builder for [`Session`] with flexible configuration.
pub struct SessionBuilder {
    config: RuntimeConfig,
    rng: Option<Box<dyn RandomSource>>,
}

impl SessionBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            rng: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Override only the gameplay configuration
    pub fn game_config(mut self, game_config: GameConfig) -> Self {
        self.config.game_config = game_config;
        self
    }

    /// Seed the default randomness source
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Inject a randomness source; takes precedence over any seed.
    pub fn rng(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    /// Build the session and start its notifier.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn build(self) -> Result<Session> {
        let config = self.config;
        config.game_config.validate()?;
        if config.notifier_capacity == 0 {
            return Err(RuntimeError::ZeroNotifierCapacity);
        }

        let rng: Box<dyn RandomSource> = match (self.rng, config.seed) {
            (Some(rng), _) => rng,
            (None, Some(seed)) => Box::new(SeededRng::new(seed)),
            (None, None) => Box::new(SeededRng::from_entropy()),
        };

        let store = CombatStore::from_config(&config.game_config);
        let (damage, queue) = damage_queue(config.notifier_capacity);
        let (report_tx, _report_rx) = broadcast::channel(config.report_buffer_size.max(1));

        let notifier = Notifier::spawn(queue, &damage, store.clone(), report_tx.clone());

        let resolver = TurnResolver::new(
            store.clone(),
            damage.clone(),
            rng,
            ResolverConfig {
                player_miss_chance: config.game_config.player_miss_chance,
                hostile_miss_chance: config.game_config.hostile_miss_chance,
                decision_timeout: config.decision_timeout,
            },
        );

        info!(
            hive = config.game_config.hive.total(),
            player_health = config.game_config.player_health,
            seed = ?config.seed,
            "session started"
        );

        Ok(Session {
            resolver,
            store,
            damage,
            report_tx,
            notifier,
            auto_delay: config.game_config.auto_delay,
        })
    }
}
