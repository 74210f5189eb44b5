//! Client configuration loaded from the process environment.
use std::env;
use std::time::Duration;

use hive_runtime::RuntimeConfig;

/// Configuration required to bootstrap an automatic session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClientConfig {
    pub runtime: RuntimeConfig,
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `HIVE_PLAYER_HP` - Starting player health (default: 100)
    /// - `HIVE_PLAYER_MISS` - Player miss chance, 0.0-1.0 (default: 0.15)
    /// - `HIVE_HOSTILE_MISS` - Hostile miss chance, 0.0-1.0 (default: 0.20)
    /// - `HIVE_AUTO_DELAY_MS` - Pause between rounds (default: 500)
    /// - `HIVE_LEADERS` / `HIVE_LIEUTENANTS` / `HIVE_GRUNTS` - Hive composition (default: 1/5/25)
    /// - `HIVE_SEED` - Seed for a reproducible session (default: entropy)
    /// - `HIVE_NOTIFIER_CAPACITY` - Pending damage events before dropping (default: 10)
    /// - `HIVE_DECISION_TIMEOUT_MS` - Per-decision bound, 0 disables (default: 2000)
    ///
    /// Unparseable values are ignored; range checks happen when the session is built.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(read: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let runtime = &mut config.runtime;
        let game = &mut runtime.game_config;

        if let Some(health) = parse(read("HIVE_PLAYER_HP")) {
            game.player_health = health;
        }
        if let Some(chance) = parse(read("HIVE_PLAYER_MISS")) {
            game.player_miss_chance = chance;
        }
        if let Some(chance) = parse(read("HIVE_HOSTILE_MISS")) {
            game.hostile_miss_chance = chance;
        }
        if let Some(delay) = parse(read("HIVE_AUTO_DELAY_MS")) {
            game.auto_delay = Duration::from_millis(delay);
        }

        // Hive composition
        if let Some(count) = parse(read("HIVE_LEADERS")) {
            game.hive.leaders = count;
        }
        if let Some(count) = parse(read("HIVE_LIEUTENANTS")) {
            game.hive.lieutenants = count;
        }
        if let Some(count) = parse(read("HIVE_GRUNTS")) {
            game.hive.grunts = count;
        }

        runtime.seed = parse(read("HIVE_SEED"));

        if let Some(capacity) = parse(read("HIVE_NOTIFIER_CAPACITY")) {
            runtime.notifier_capacity = capacity;
        }
        if let Some(millis) = parse::<u64>(read("HIVE_DECISION_TIMEOUT_MS")) {
            runtime.decision_timeout = (millis > 0).then(|| Duration::from_millis(millis));
        }

        config
    }
}

fn parse<T>(value: Option<String>) -> Option<T>
where
    T: std::str::FromStr,
{
    value?.trim().parse().ok()
}
