use std::time::{Duration, Instant};

use hive_core::{
    Category, GameConfig, GameOutcome, HiveComposition, HostileTurnOutcome, PlayerActionOutcome,
    PlayerVerb, SequenceRng,
};
use hive_runtime::{RuntimeConfig, Session};
use tokio::sync::watch;

const ALWAYS_HIT: f64 = 0.99;

async fn session_with(composition: HiveComposition, seed: u64) -> Session {
    Session::builder()
        .game_config(GameConfig::default().with_hive(composition))
        .seed(seed)
        .build()
        .await
        .expect("session should build")
}

#[tokio::test]
async fn exactly_one_attack_lands_per_hostile_turn() {
    let mut session = Session::builder()
        .rng(SequenceRng::floats([ALWAYS_HIT]))
        .build()
        .await
        .unwrap();

    let before = session.status().player_health;
    let outcome = session.perform_hostile_turn().await.unwrap();
    let after = session.status().player_health;

    match outcome {
        HostileTurnOutcome::Stung {
            attacker,
            damage,
            hits,
            decisions,
            ..
        } => {
            assert_eq!(decisions, 31);
            assert_eq!(hits, 31, "every worker decided to hit");
            assert_eq!(damage, attacker.category.stats().damage_inflicted);
            assert_eq!(before - after, damage, "damage must not be summed across hits");
        }
        other => panic!("expected a landed attack, got {other:?}"),
    }

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn each_turn_either_damages_or_reports_a_miss() {
    let mut session = session_with(HiveComposition::default(), 77).await;

    for _ in 0..5 {
        let before = session.status().player_health;
        let outcome = session.perform_hostile_turn().await.unwrap();
        let lost = before - session.status().player_health;

        match outcome {
            HostileTurnOutcome::Stung { damage, .. } => {
                assert!(damage > 0);
                assert_eq!(lost, damage.min(before));
            }
            HostileTurnOutcome::Missed { decisions, .. } => {
                assert_eq!(decisions, 31);
                assert_eq!(lost, 0);
            }
            HostileTurnOutcome::Idle => panic!("hive is not empty"),
        }
        if session.is_game_over() {
            break;
        }
    }

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn decisions_run_concurrently() {
    let mut session = session_with(HiveComposition::default(), 3).await;

    let started = Instant::now();
    session.perform_hostile_turn().await.unwrap();
    let elapsed = started.elapsed();

    // The leader always deliberates for at least 50ms
    assert!(elapsed >= Duration::from_millis(50));
    // Sequential execution of 31 workers would take well over a second
    assert!(elapsed < Duration::from_secs(1), "turn took {elapsed:?}");

    session.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn leader_death_is_observed_atomically() {
    let mut session = Session::builder()
        .rng(SequenceRng::new([ALWAYS_HIT], [0]))
        .build()
        .await
        .unwrap();
    let store = session.view();
    let (done_tx, done_rx) = watch::channel(false);

    let observers: Vec<_> = (0..3)
        .map(|_| {
            let store = store.clone();
            let done_rx = done_rx.clone();
            tokio::spawn(async move {
                let mut seen = Vec::new();
                while !*done_rx.borrow() {
                    let status = store.status();
                    let leader_alive = status.alive(Category::Leader) == 1;
                    assert!(
                        leader_alive || status.alive_total == 0,
                        "observed dead leader with {} hostiles alive",
                        status.alive_total
                    );
                    seen.push(status.alive_total);
                    tokio::task::yield_now().await;
                }
                seen
            })
        })
        .collect();

    // Index 0 always targets the leader, who dies on the tenth hit
    let mut last = PlayerActionOutcome::NoTargets;
    for _ in 0..10 {
        last = session.perform_player_action(PlayerVerb::Hit);
        tokio::task::yield_now().await;
    }
    let _ = done_tx.send(true);

    assert!(matches!(
        last,
        PlayerActionOutcome::HiveCollapsed { eliminated: 30, .. }
    ));
    assert_eq!(session.alive_count(), 0);

    for observer in observers {
        let seen = observer.await.unwrap();
        assert!(seen.iter().all(|&alive| alive == 31 || alive == 0));
    }

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn turn_counter_tracks_only_real_attempts() {
    let mut session = session_with(HiveComposition::new(0, 0, 2), 5).await;

    let mut attempts = 0;
    while !session.is_game_over() {
        let outcome = session.perform_player_action(PlayerVerb::Hit);
        assert!(outcome.was_attempt());
        attempts += 1;
        assert_eq!(session.turn(), attempts);
    }

    assert_eq!(
        session.perform_player_action(PlayerVerb::Hit),
        PlayerActionOutcome::NoTargets
    );
    assert_eq!(session.turn(), attempts);
    assert_eq!(session.outcome(), GameOutcome::HiveDestroyed);

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn subscribers_receive_damage_reports() {
    let mut session = Session::builder()
        .rng(SequenceRng::floats([ALWAYS_HIT]))
        .game_config(GameConfig::default().with_hive(HiveComposition::new(0, 1, 0)))
        .build()
        .await
        .unwrap();
    let mut reports = session.subscribe_reports();

    session.perform_player_action(PlayerVerb::Hit);
    let outcome = session.perform_hostile_turn().await.unwrap();
    assert_eq!(outcome.damage_dealt(), 5);

    let report = tokio::time::timeout(Duration::from_secs(1), reports.recv())
        .await
        .expect("report should arrive")
        .unwrap();
    assert_eq!(report.damage, 5);
    assert_eq!(report.player_health, 95);
    assert_eq!(report.health_percent, 95.0);
    assert_eq!(report.alive_hostiles, 1);
    assert_eq!(report.turn, 1);
    assert_eq!(session.notifier_metrics().processed(), 1);

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn stalled_decisions_time_out_as_misses() {
    let config = RuntimeConfig {
        decision_timeout: Some(Duration::from_millis(1)),
        game_config: GameConfig::default().with_hive(HiveComposition::new(1, 0, 0)),
        ..RuntimeConfig::default()
    };
    let mut session = Session::builder()
        .config(config)
        .rng(SequenceRng::floats([ALWAYS_HIT]))
        .build()
        .await
        .unwrap();

    let outcome = session.perform_hostile_turn().await.unwrap();

    assert!(matches!(outcome, HostileTurnOutcome::Missed { decisions: 1, .. }));
    assert_eq!(session.status().player_health, 100);

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn seeded_sessions_replay_identically() {
    async fn play(seed: u64) -> Vec<(PlayerActionOutcome, HostileTurnOutcome)> {
        let mut session = session_with(HiveComposition::new(1, 2, 4), seed).await;
        let mut rounds = Vec::new();
        for _ in 0..4 {
            let action = session.perform_player_action(PlayerVerb::Hit);
            let turn = session.perform_hostile_turn().await.unwrap();
            rounds.push((action, turn));
        }
        session.shutdown().await.unwrap();
        rounds
    }

    assert_eq!(play(2024).await, play(2024).await);
}

#[tokio::test]
async fn auto_play_runs_to_completion() {
    let game_config = GameConfig {
        auto_delay: Duration::ZERO,
        player_health: 1_000,
        ..GameConfig::default()
    }
    .with_hive(HiveComposition::new(1, 1, 2));
    let mut session = Session::builder()
        .game_config(game_config)
        .seed(11)
        .build()
        .await
        .unwrap();
    let (_stop_tx, stop_rx) = watch::channel(false);

    let outcome = tokio::time::timeout(Duration::from_secs(30), session.run_auto(stop_rx))
        .await
        .expect("auto play should finish")
        .unwrap();

    assert!(outcome.is_over());
    assert_eq!(outcome, GameOutcome::HiveDestroyed);
    assert!(session.turn() > 0);

    session.shutdown().await.unwrap();
}
