//! Concurrent turn resolution for a player versus a hive of hostiles.
//!
//! This crate wires the pure rules of `hive-core` into a concurrency model:
//! a lock-guarded [`CombatStore`], per-hostile decision workers fanned out
//! and joined on every hostile turn, and a bounded damage queue drained by a
//! standing notifier task. Consumers embed [`Session`] to drive turns and
//! subscribe to damage reports.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the facade and builder
//! - [`api`] exposes errors and report types downstream clients consume
//! - [`store`] owns the shared hive and player records
//! - [`resolver`] runs player actions and hostile turns
//! - [`workers`] keeps background and per-turn tasks
pub mod api;
pub mod resolver;
pub mod session;
pub mod store;
pub mod workers;

pub use api::{DamageReport, Result, RuntimeError};
pub use resolver::{ResolverConfig, TurnResolver};
pub use session::{RuntimeConfig, Session, SessionBuilder};
pub use store::{CombatStore, CombatView, EntityDamage, PlayerDamage, Strike};
pub use workers::{DamageSender, DecisionWorker, Notifier, NotifierMetrics, damage_queue};
