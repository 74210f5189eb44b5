//! Per-hostile decision task for one hostile turn.
//!
//! A worker reads only the immutable category attributes of its entity and
//! draws from its own randomness stream, so any number of them can run in
//! parallel without touching the store or each other.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use hive_core::{DecisionRecord, EntityRef, RandomSource};

/// Simulates one hostile deciding whether to attack this turn.
pub struct DecisionWorker {
    entity: EntityRef,
    miss_chance: f64,
    rng: Box<dyn RandomSource>,
}

impl DecisionWorker {
    pub fn new(entity: EntityRef, miss_chance: f64, rng: Box<dyn RandomSource>) -> Self {
        Self {
            entity,
            miss_chance,
            rng,
        }
    }

    /// Sleeps for a latency sampled from the category's range, then rolls.
    ///
    /// `will_hit` is `uniform[0,1) >= miss_chance`.
    pub async fn decide(mut self) -> DecisionRecord {
        let stats = self.entity.category.stats();
        let latency = stats.latency_at(self.rng.next_f64());

        let started = Instant::now();
        tokio::time::sleep(latency).await;
        let will_hit = self.rng.next_f64() >= self.miss_chance;

        debug!(
            entity = self.entity.id.0,
            category = %self.entity.category,
            will_hit,
            ?latency,
            "decision made"
        );

        DecisionRecord {
            entity: self.entity,
            will_hit,
            latency: started.elapsed(),
            timed_out: false,
        }
    }

    /// Runs [`decide`](Self::decide) bounded by `limit`.
    ///
    /// A worker that does not answer in time is scored as a miss so the
    /// turn's barrier always completes.
    pub async fn run(self, limit: Option<Duration>) -> DecisionRecord {
        let Some(limit) = limit else {
            return self.decide().await;
        };

        let entity = self.entity;
        match tokio::time::timeout(limit, self.decide()).await {
            Ok(record) => record,
            Err(_) => {
                warn!(
                    entity = entity.id.0,
                    ?limit,
                    "decision timed out, scoring as miss"
                );
                DecisionRecord {
                    entity,
                    will_hit: false,
                    latency: limit,
                    timed_out: true,
                }
            }
        }
    }
}
