//! Types surfaced to runtime consumers.
mod errors;
mod events;

pub use errors::{Result, RuntimeError};
pub use events::DamageReport;
