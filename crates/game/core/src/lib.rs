//! Pure combat rules shared by the runtime and the client.
//!
//! `hive-core` defines the canonical data of an encounter between one player
//! and a hive of hostile actors: the per-category stats table, combat
//! entities, the hive container, configuration, and the value types that
//! describe turn outcomes. Nothing here is async or locked; the concurrency
//! model lives in the runtime crate, which owns these records behind its
//! store.
pub mod category;
pub mod config;
pub mod entity;
pub mod error;
pub mod hive;
pub mod outcome;
pub mod rng;

pub use category::{Category, CategoryStats};
pub use config::{GameConfig, HiveComposition};
pub use entity::{CombatEntity, EntityId, EntityRef, Health, HealthChange, Player};
pub use error::ConfigError;
pub use hive::Hive;
pub use outcome::{
    DamageSeverity, DecisionRecord, GameOutcome, HiveStatus, HostileTurnOutcome,
    PlayerActionOutcome, PlayerVerb,
};
pub use rng::{RandomSource, SeededRng, SequenceRng};
