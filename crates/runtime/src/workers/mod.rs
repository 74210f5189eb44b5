//! Tasks that back turn resolution.
//!
//! Decision workers are spawned and joined within one hostile turn, while the
//! notifier runs for the whole session.

mod decision;
mod metrics;
mod notifier;

pub use decision::DecisionWorker;
pub use metrics::{MetricsSnapshot, NotifierMetrics};
pub use notifier::{DamageEvent, DamageReceiver, DamageSender, Notifier, damage_queue};
